mod node;
mod ops;
mod record;
mod report;
mod rule;
mod value;

pub use node::Node;
pub use ops::{CompareOp, Connective};
pub use record::Record;
pub use report::{ConditionCheck, EvaluationReport};
pub use rule::{Rule, RuleId};
pub use value::Value;
