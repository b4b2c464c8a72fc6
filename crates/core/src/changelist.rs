//! Ordered changelist produced by one poll cycle

use cncsnap_types::{FieldValue, Update};

/// Updates in the order collectors appended them.
///
/// Cleared at the start of each cycle; the allocation is kept.
#[derive(Debug, Default, Clone)]
pub struct Changelist {
    updates: Vec<Update>,
}

impl Changelist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            updates: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, key: impl Into<String>, value: FieldValue) {
        self.updates.push(Update::new(key, value));
    }

    pub fn clear(&mut self) {
        self.updates.clear();
    }

    pub fn as_slice(&self) -> &[Update] {
        &self.updates
    }

    pub fn len(&self) -> usize {
        self.updates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.updates.capacity()
    }

    /// First update reported for `key`, if any
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.updates.iter().find(|u| u.key == key).map(|u| &u.value)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.updates.iter().any(|u| u.key == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.updates.iter().map(|u| u.key.as_str())
    }
}
