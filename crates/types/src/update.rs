//! Changelist entries

use serde::{Deserialize, Serialize};

use crate::value::FieldValue;

/// A single reported change: a field key and its new value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Update {
    pub key: String,
    pub value: FieldValue,
}

impl Update {
    pub fn new(key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}
