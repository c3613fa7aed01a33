use std::fmt;
use std::time::Duration;

/// One condition visited during [`evaluate_detailed()`](crate::evaluate_detailed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionCheck {
    condition: String,
    field_present: bool,
    matched: bool,
}

impl ConditionCheck {
    pub(crate) fn new(condition: &str, field_present: bool, matched: bool) -> Self {
        Self {
            condition: condition.to_owned(),
            field_present,
            matched,
        }
    }

    /// The operand text as stored in the tree.
    #[must_use]
    pub fn condition(&self) -> &str {
        &self.condition
    }

    /// Whether the record held the condition's field.
    #[must_use]
    pub fn field_present(&self) -> bool {
        self.field_present
    }

    #[must_use]
    pub fn matched(&self) -> bool {
        self.matched
    }
}

/// Detailed evaluation report returned by
/// [`evaluate_detailed()`](crate::evaluate_detailed).
///
/// Contains the outcome, every condition checked in evaluation order, and
/// the wall-clock duration of the evaluation. Operators never skip a side,
/// so `checks` holds one entry per operand of the tree.
#[derive(Debug, Clone)]
#[must_use]
pub struct EvaluationReport {
    result: bool,
    checks: Vec<ConditionCheck>,
    duration: Duration,
}

impl EvaluationReport {
    pub(crate) fn new(result: bool, checks: Vec<ConditionCheck>, duration: Duration) -> Self {
        Self {
            result,
            checks,
            duration,
        }
    }

    /// The evaluation outcome, same as [`evaluate()`](crate::evaluate).
    #[must_use]
    pub fn result(&self) -> bool {
        self.result
    }

    #[must_use]
    pub fn checks(&self) -> &[ConditionCheck] {
        &self.checks
    }

    /// Conditions that held, in evaluation order.
    #[must_use]
    pub fn matched(&self) -> Vec<&str> {
        self.checks
            .iter()
            .filter(|c| c.matched)
            .map(ConditionCheck::condition)
            .collect()
    }

    /// Conditions whose field was absent from the record.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&str> {
        self.checks
            .iter()
            .filter(|c| !c.field_present)
            .map(ConditionCheck::condition)
            .collect()
    }

    /// Wall-clock duration of the evaluation.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "result: {}", self.result)?;
        write!(f, ", matched: [{}]", self.matched().join(", "))?;
        write!(f, ", checked: {}", self.checks.len())?;
        write!(f, ", duration: {:?}", self.duration)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> EvaluationReport {
        EvaluationReport::new(
            true,
            vec![
                ConditionCheck::new("age > 30", true, true),
                ConditionCheck::new("salary > 50000", false, false),
            ],
            Duration::from_nanos(500),
        )
    }

    #[test]
    fn report_accessors() {
        let report = report();
        assert!(report.result());
        assert_eq!(report.checks().len(), 2);
        assert_eq!(report.matched(), vec!["age > 30"]);
        assert_eq!(report.missing_fields(), vec!["salary > 50000"]);
        assert_eq!(report.duration(), Duration::from_nanos(500));
    }

    #[test]
    fn check_accessors() {
        let check = ConditionCheck::new("department = 'Sales'", true, false);
        assert_eq!(check.condition(), "department = 'Sales'");
        assert!(check.field_present());
        assert!(!check.matched());
    }

    #[test]
    fn report_display() {
        let s = report().to_string();
        assert!(s.contains("result: true"));
        assert!(s.contains("matched: [age > 30]"));
        assert!(s.contains("checked: 2"));
    }
}
