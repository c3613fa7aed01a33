use std::collections::HashMap;

use super::Value;
use crate::RuleError;

/// The key→value data a rule is evaluated against.
///
/// Keys are plain identifiers; a key that is absent simply fails every
/// condition that mentions it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    data: HashMap<String, Value>,
}

impl Record {
    /// Create an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, replacing any previous one.
    #[must_use]
    pub fn set(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert a value (mutable reference version).
    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.data.insert(key.to_owned(), value.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Build a record from a JSON object.
    ///
    /// `null` members count as absent. Arrays and nested objects are not
    /// primitives and are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::InvalidRecord`] if `json` is not an object or a
    /// member holds a non-primitive value.
    pub fn from_json(json: &serde_json::Value) -> Result<Self, RuleError> {
        let object = json.as_object().ok_or_else(|| RuleError::InvalidRecord {
            field: "<root>".to_owned(),
        })?;

        let mut record = Record::new();
        for (key, member) in object {
            let value = match member {
                serde_json::Value::Null => continue,
                serde_json::Value::Bool(b) => Value::Bool(*b),
                serde_json::Value::String(s) => Value::String(s.clone()),
                serde_json::Value::Number(n) => match n.as_i64() {
                    Some(i) => Value::Int(i),
                    None => n
                        .as_f64()
                        .map(Value::Float)
                        .ok_or_else(|| RuleError::InvalidRecord { field: key.clone() })?,
                },
                serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
                    return Err(RuleError::InvalidRecord { field: key.clone() });
                }
            };
            record.insert(key, value);
        }
        Ok(record)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            data: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
