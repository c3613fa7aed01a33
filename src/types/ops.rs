use std::cmp::Ordering;
use std::fmt;

/// Comparison operators accepted inside a condition.
///
/// `=` is equality, not assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
}

/// Logical connective carried by an operator node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Connective {
    And,
    Or,
}

impl CompareOp {
    /// Every operator, longest symbols first so prefix matching stays unambiguous.
    pub const ALL: [CompareOp; 6] = [
        CompareOp::Lte,
        CompareOp::Gte,
        CompareOp::Neq,
        CompareOp::Eq,
        CompareOp::Gt,
        CompareOp::Lt,
    ];

    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Neq => "!=",
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
        }
    }

    /// Whether an ordering of (record value, literal) satisfies the operator.
    #[must_use]
    pub fn accepts(self, ordering: Ordering) -> bool {
        match self {
            CompareOp::Eq => ordering.is_eq(),
            CompareOp::Neq => ordering.is_ne(),
            CompareOp::Gt => ordering.is_gt(),
            CompareOp::Gte => ordering.is_ge(),
            CompareOp::Lt => ordering.is_lt(),
            CompareOp::Lte => ordering.is_le(),
        }
    }

    /// Look up an operator by its exact symbol.
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<CompareOp> {
        Self::ALL.into_iter().find(|op| op.symbol() == symbol)
    }
}

impl Connective {
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            Connective::And => "AND",
            Connective::Or => "OR",
        }
    }

    /// Keywords are case-sensitive: only `AND` and `OR` are connectives.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Connective> {
        match keyword {
            "AND" => Some(Connective::And),
            "OR" => Some(Connective::Or),
            _ => None,
        }
    }

    #[must_use]
    pub fn apply(self, left: bool, right: bool) -> bool {
        match self {
            Connective::And => left && right,
            Connective::Or => left || right,
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl fmt::Display for Connective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}
