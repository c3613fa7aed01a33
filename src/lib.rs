mod catalog;
mod combine;
mod error;
mod evaluate;
pub mod parse;
mod serial;
#[cfg(feature = "binary-cache")]
mod snapshot;
mod types;

pub use catalog::RuleCatalog;
pub use combine::combine;
pub use error::{CatalogError, RuleError};
pub use evaluate::{evaluate, evaluate_detailed};
pub use parse::{
    Condition, SyntaxError, Token, build, tokenize, validate_condition, validate_syntax,
};
pub use serial::{deserialize, serialize};
#[cfg(feature = "binary-cache")]
pub use snapshot::SnapshotError;
pub use types::{
    CompareOp, ConditionCheck, Connective, EvaluationReport, Node, Record, Rule, RuleId, Value,
};
