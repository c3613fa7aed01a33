use std::fmt;

use super::node::Node;
use crate::RuleError;

/// Catalog-assigned identifier of a stored rule. Ids start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RuleId(u64);

impl RuleId {
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored rule: unique name, the text it was built from, and the JSON
/// serialized form of its tree.
///
/// The serialized tree is kept as an opaque string, the same shape a
/// database row would hold. [`tree()`](Rule::tree) rebuilds the [`Node`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub(crate) id: RuleId,
    pub(crate) name: String,
    pub(crate) text: String,
    pub(crate) ast: String,
}

impl Rule {
    #[must_use]
    pub fn id(&self) -> RuleId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The serialized tree as stored.
    #[must_use]
    pub fn ast(&self) -> &str {
        &self.ast
    }

    /// Deserialize the stored tree.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::MalformedTree`] or
    /// [`RuleError::UnsupportedOperator`] if the stored form is corrupt.
    pub fn tree(&self) -> Result<Node, RuleError> {
        Node::from_json(&self.ast)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}: {}", self.id, self.name, self.text)
    }
}
