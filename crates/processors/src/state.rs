//! `WizardState` — the shared, mutable, string-keyed field mapping.
//!
//! The wizard/session layer owns the lifecycle of every key; processors and
//! the engine only read and write values. Values are weakly typed
//! (`serde_json::Value`) because the external schema, not this crate, decides
//! what each field holds.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The wizard's field mapping.
///
/// A thin wrapper over an ordered map so that iteration (and therefore
/// change-dispatch order) is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WizardState(BTreeMap<String, Value>);

impl WizardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a field's raw value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Look up a field as a string slice; `None` if absent or not a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Set a field's value, creating the key if needed.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Whether a field holds a meaningful value.
    ///
    /// Missing keys, `null`, the empty string, and empty arrays/objects all
    /// count as unfilled. Processors use this to honor manual input: a filled
    /// field is never overwritten by an auto-computed value.
    pub fn is_filled(&self, key: &str) -> bool {
        match self.0.get(key) {
            None | Some(Value::Null) => false,
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Array(a)) => !a.is_empty(),
            Some(Value::Object(o)) => !o.is_empty(),
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(_)) => true,
        }
    }

    /// Seed every named key with `""` unless it already exists.
    ///
    /// Mirrors the wizard's session initializer: all schema keys exist from
    /// the first render onward, so processors can read any of them without a
    /// presence check.
    pub fn ensure_keys<'a>(&mut self, keys: impl IntoIterator<Item = &'a str>) {
        for key in keys {
            self.0.entry(key.to_owned()).or_insert_with(|| Value::String(String::new()));
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Value)> for WizardState {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
