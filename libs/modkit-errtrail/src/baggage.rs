//! Free-form contextual fields attached to a single chain link

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// String-keyed map of arbitrary JSON values.
///
/// Keys are unique; iteration order is not part of the contract.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Baggage(Map<String, Value>);

impl Baggage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Inserts a single field, returning the value it replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Overlays `other` onto `self`; keys from `other` win on conflict.
    pub fn merge(&mut self, other: Self) {
        self.0.extend(other.0);
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl<K, V> FromIterator<(K, V)> for Baggage
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

impl IntoIterator for Baggage {
    type Item = (String, Value);
    type IntoIter = serde_json::map::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl From<Map<String, Value>> for Baggage {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<Baggage> for Value {
    fn from(baggage: Baggage) -> Self {
        Value::Object(baggage.0)
    }
}

/// Renders the fields as compact JSON.
impl fmt::Display for Baggage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(&self.0).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn merge_overwrites_existing_keys() {
        let mut baggage = Baggage::new()
            .with("key1", "value1")
            .with("key2", json!(["value1_1", "value1_2"]));
        baggage.merge(Baggage::new().with("key2", "value3").with("key3", json!([1, 2, 3])));

        assert_eq!(baggage.len(), 3);
        assert_eq!(baggage.get("key1"), Some(&json!("value1")));
        assert_eq!(baggage.get("key2"), Some(&json!("value3")));
        assert_eq!(baggage.get("key3"), Some(&json!([1, 2, 3])));
    }

    #[test]
    fn collects_from_pairs() {
        let baggage: Baggage = [("user_id", json!(42)), ("tenant", json!("acme"))]
            .into_iter()
            .collect();
        assert!(baggage.contains_key("tenant"));
        let rendered: Value = serde_json::from_str(&baggage.to_string()).unwrap();
        assert_eq!(rendered, json!({"tenant": "acme", "user_id": 42}));
    }

    #[test]
    fn insert_returns_replaced_value() {
        let mut baggage = Baggage::new();
        assert_eq!(baggage.insert("attempt", 1), None);
        assert_eq!(baggage.insert("attempt", 2), Some(json!(1)));
    }
}
