//! Records
//!
//! A [`Record`] is a dynamic, string-keyed model for state that does not
//! warrant its own struct. It deserializes from the same shape as a plain
//! object model:
//!
//! ```json
//! { "count": 0, "text": "", "observableProperties": ["count", "text"] }
//! ```
//!
//! # Key Policies
//!
//! By default only declared keys are observable, exactly as for struct
//! models. [`KeyPolicy::AllOwnKeys`] opts into a looser rule for records
//! that declare nothing: every key present when the wrapper is built counts
//! as declared. Keys added later are not covered unless they are path-like.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::proxy::{Observed, WriteOutcome};
use super::watchable::{ObservableSet, StrictEq, Watchable};
use crate::error::{Error, Result};

/// How a [`Record`] decides which of its keys are observable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyPolicy {
    /// Only keys listed in `observableProperties`.
    #[default]
    Declared,
    /// Every own key, when nothing is declared.
    AllOwnKeys,
}

/// A dynamic keyed model backed by a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(
        rename = "observableProperties",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    declared: Vec<String>,

    #[serde(skip)]
    policy: KeyPolicy,

    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl Record {
    /// An empty record that declares nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from a JSON object, reading `observableProperties`
    /// from it when present.
    pub fn from_json(source: Value) -> Result<Self> {
        if !source.is_object() {
            return Err(Error::NotAnObject {
                found: json_kind(&source),
            });
        }
        Ok(serde_json::from_value(source)?)
    }

    /// Build a record from JSON text.
    pub fn from_json_str(source: &str) -> Result<Self> {
        Self::from_json(serde_json::from_str(source)?)
    }

    /// Replace the declared keys.
    pub fn with_declared<S: Into<String>>(mut self, keys: impl IntoIterator<Item = S>) -> Self {
        self.declared = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Set the key policy.
    pub fn with_policy(mut self, policy: KeyPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Insert a field directly, bypassing observation. Intended for building
    /// the record before it is wrapped.
    pub fn insert(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Current value of a field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Field names, in the JSON map's own order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// The key policy.
    pub fn policy(&self) -> KeyPolicy {
        self.policy
    }

    /// The record's fields as a JSON object, without the declarations.
    pub fn to_json(&self) -> Value {
        Value::Object(self.fields.clone())
    }
}

impl Watchable for Record {
    fn observable_properties(&self) -> ObservableSet {
        match self.policy {
            KeyPolicy::AllOwnKeys if self.declared.is_empty() => {
                self.fields.keys().cloned().collect()
            }
            _ => self.declared.iter().cloned().collect(),
        }
    }
}

impl Observed<Record> {
    /// Current value of a field, cloned out of the record.
    pub fn value(&self, key: &str) -> Option<Value> {
        self.get(|record| record.fields.get(key).cloned())
    }

    /// Write a field with the usual rules: the key must be observable or
    /// path-like, and the value must differ under [`StrictEq`]. A missing
    /// field differs from every value, including `null`.
    pub fn set_value(&self, key: &str, value: impl Into<Value>) -> WriteOutcome {
        if !self.accepts(key) {
            return self.dropped(key, WriteOutcome::Undeclared);
        }

        let value = value.into();
        let mut record = self.target_mut();
        if record
            .fields
            .get(key)
            .is_some_and(|current| current.strict_eq(&value))
        {
            drop(record);
            return self.dropped(key, WriteOutcome::Unchanged);
        }

        record.fields.insert(key.to_owned(), value);
        WriteOutcome::Applied
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
