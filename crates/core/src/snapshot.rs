//! Snapshots and two-generation rotation

use cncsnap_types::FieldValue;
use std::collections::BTreeMap;

/// One generation of observed field values, keyed by field key.
///
/// A key appears at most once; setting an existing key replaces its value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    values: BTreeMap<String, FieldValue>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.values.get(key)
    }

    /// Store `value` under `key`, returning the value it replaced
    pub fn set(&mut self, key: impl Into<String>, value: FieldValue) -> Option<FieldValue> {
        self.values.insert(key.into(), value)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// The two retained generations: the last completed snapshot and the one
/// being built by the current cycle.
#[derive(Debug, Default)]
pub struct Generations {
    previous: Snapshot,
    next: Snapshot,
}

impl Generations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn previous(&self) -> &Snapshot {
        &self.previous
    }

    pub fn next(&self) -> &Snapshot {
        &self.next
    }

    /// Split borrow used while collectors run
    pub(crate) fn split_mut(&mut self) -> (&Snapshot, &mut Snapshot) {
        (&self.previous, &mut self.next)
    }

    /// Drop the partially built generation, keeping `previous` intact
    pub(crate) fn discard_next(&mut self) {
        self.next.clear();
    }

    /// Promote `next` to `previous` and start an empty `next`.
    ///
    /// The old `previous` generation is discarded.
    pub fn rotate(&mut self) {
        self.previous = std::mem::take(&mut self.next);
    }
}
