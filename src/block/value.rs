//! Reference-counted tuple values

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// A single tuple value held in a register slot.
///
/// Values are JSON documents behind an `Arc`: cloning a `RowValue` bumps a
/// refcount, so whole-row copy-through between blocks never deep-copies.
#[derive(Debug, Clone)]
pub struct RowValue(Arc<Value>);

impl RowValue {
    /// Creates a value from a JSON document
    pub fn new(value: Value) -> Self {
        Self(Arc::new(value))
    }

    /// The JSON null value
    pub fn null() -> Self {
        Self(Arc::new(Value::Null))
    }

    /// Returns the underlying JSON document
    pub fn json(&self) -> &Value {
        &self.0
    }

    /// Returns true if this value is JSON null
    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }
}

impl From<Value> for RowValue {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

impl PartialEq for RowValue {
    fn eq(&self, other: &Self) -> bool {
        // Pointer equality first: shared handles from a row copy compare cheap
        Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

impl Eq for RowValue {}

impl fmt::Display for RowValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
