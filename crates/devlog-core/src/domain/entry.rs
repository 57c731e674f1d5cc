//! Log entry type and the validation rules for client payloads.
//!
//! A log entry is an opaque JSON object supplied by a client. The only rule
//! is structural: it must be an object with at least one key. Conventional
//! fields such as `sessionId`, `time`, `type` and `data` are never inspected.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// A single client-supplied log record.
///
/// Serialized transparently as the underlying JSON object, so a collection
/// of entries round-trips as a plain JSON array of objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogEntry(Map<String, Value>);

impl LogEntry {
    /// Build an entry from an arbitrary JSON value.
    ///
    /// Returns `None` exactly when [`is_valid_entry`] rejects the value.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) if !fields.is_empty() => Some(Self(fields)),
            _ => None,
        }
    }

    /// The entry's fields, in the order the client sent them.
    pub const fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Look up a single field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Convert back into a plain JSON value.
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

/// Returned by [`validate_batch`] for the first candidate that is not a valid entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid log entry structure")]
pub struct InvalidEntry {
    /// Position of the rejected candidate within the normalized batch.
    pub index: usize,
}

/// Decide whether a JSON value qualifies as a log entry.
///
/// Accepts non-empty objects. Rejects null, scalars, arrays and `{}`.
pub fn is_valid_entry(candidate: &Value) -> bool {
    candidate.as_object().is_some_and(|fields| !fields.is_empty())
}

/// Turn a parsed request body into a list of candidates.
///
/// An array contributes its elements; any other value becomes a
/// one-element list.
pub fn normalize_payload(payload: Value) -> Vec<Value> {
    match payload {
        Value::Array(items) => items,
        other => vec![other],
    }
}

/// Validate a whole batch, all-or-nothing.
///
/// Either every candidate becomes a [`LogEntry`] or the batch is rejected
/// at the first invalid member.
pub fn validate_batch(candidates: Vec<Value>) -> Result<Vec<LogEntry>, InvalidEntry> {
    candidates
        .into_iter()
        .enumerate()
        .map(|(index, candidate)| LogEntry::from_value(candidate).ok_or(InvalidEntry { index }))
        .collect()
}
