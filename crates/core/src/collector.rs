//! Collector trait and the per-cycle context collectors run against

use crate::{Changelist, CollectError, DeviceReader, Snapshot};
use cncsnap_types::{keys, FieldMetadata, FieldValue, ReportPolicy};

/// Trait for all field collectors
///
/// A collector fetches (or derives) one field, or a small related group of
/// fields, each cycle and decides whether the value is reportable. Collectors
/// run strictly in registration order, so a collector may read anything an
/// earlier collector wrote into the current generation.
pub trait Collector: Send {
    /// Registered collector id
    fn id(&self) -> &str;

    /// Field keys this collector writes, with metadata
    fn fields(&self) -> Vec<FieldMetadata>;

    /// Reportability applied to this collector's fields
    fn policy(&self) -> ReportPolicy;

    /// Override the default reportability (registration-time only)
    fn set_policy(&mut self, policy: ReportPolicy);

    /// Fetch or derive the fields for this cycle
    fn collect(&mut self, ctx: &mut CollectContext<'_>) -> Result<(), CollectError>;

    /// Keys of [`Collector::fields`]
    fn keys(&self) -> Vec<String> {
        self.fields().into_iter().map(|f| f.key).collect()
    }
}

/// Type-erased collector for dynamic dispatch
pub type BoxedCollector = Box<dyn Collector>;

/// What a collector sees while it runs: the device, both generations and
/// the changelist being assembled.
pub struct CollectContext<'a> {
    reader: &'a mut (dyn DeviceReader + 'a),
    previous: &'a Snapshot,
    next: &'a mut Snapshot,
    changelist: &'a mut Changelist,
    max_axes: usize,
}

impl<'a> CollectContext<'a> {
    pub fn new(
        reader: &'a mut (dyn DeviceReader + 'a),
        previous: &'a Snapshot,
        next: &'a mut Snapshot,
        changelist: &'a mut Changelist,
        max_axes: usize,
    ) -> Self {
        Self {
            reader,
            previous,
            next,
            changelist,
            max_axes,
        }
    }

    pub fn reader(&mut self) -> &mut (dyn DeviceReader + 'a) {
        &mut *self.reader
    }

    /// Last completed generation
    pub fn previous(&self) -> &Snapshot {
        self.previous
    }

    /// Generation being built by this cycle
    pub fn next(&self) -> &Snapshot {
        self.next
    }

    pub fn max_axes(&self) -> usize {
        self.max_axes
    }

    /// Axis count for position fields.
    ///
    /// Taken from the axis name list of the current generation, else the
    /// previous one, else the configured maximum. Never exceeds the maximum.
    pub fn axis_count(&self) -> usize {
        self.next
            .get(keys::AXIS_NAMES)
            .or_else(|| self.previous.get(keys::AXIS_NAMES))
            .and_then(FieldValue::as_text_list)
            .map(|names| names.len())
            .unwrap_or(self.max_axes)
            .min(self.max_axes)
    }

    /// Store `value` for this cycle and append an update if `policy` says so.
    ///
    /// Returns `true` if an update was appended.
    pub fn report(&mut self, key: &str, value: FieldValue, policy: ReportPolicy) -> bool {
        let changed = match policy {
            ReportPolicy::Unconditional => true,
            ReportPolicy::ChangeGated => self.previous.get(key) != Some(&value),
        };
        if changed {
            self.changelist.push(key, value.clone());
        }
        self.next.set(key, value);
        changed
    }

    pub fn report_if_changed(&mut self, key: &str, value: FieldValue) -> bool {
        self.report(key, value, ReportPolicy::ChangeGated)
    }

    pub fn report_always(&mut self, key: &str, value: FieldValue) -> bool {
        self.report(key, value, ReportPolicy::Unconditional)
    }

    /// Derive `key` from `source_key` of the current generation.
    ///
    /// Change gating compares the value derived from each generation's
    /// `source_key`, not the stored derived values, so parts of the source
    /// the derivation ignores never produce an update. Returns `None` if the
    /// current generation has nothing to derive from.
    pub fn report_derived<F>(
        &mut self,
        key: &str,
        source_key: &str,
        policy: ReportPolicy,
        derive: F,
    ) -> Option<bool>
    where
        F: Fn(&FieldValue) -> Option<FieldValue>,
    {
        let current = self.next.get(source_key).and_then(|v| derive(v))?;
        let changed = match policy {
            ReportPolicy::Unconditional => true,
            ReportPolicy::ChangeGated => {
                let before = self.previous.get(source_key).and_then(|v| derive(v));
                before.as_ref() != Some(&current)
            }
        };
        if changed {
            self.changelist.push(key, current.clone());
        }
        self.next.set(key, current);
        Some(changed)
    }

    /// Keep the previous generation's value for `key` when this cycle has none.
    ///
    /// Returns `true` if a value was carried over.
    pub fn carry_forward(&mut self, key: &str) -> bool {
        if self.next.contains(key) {
            return false;
        }
        match self.previous.get(key) {
            Some(value) => {
                self.next.set(key, value.clone());
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedReader;
    use cncsnap_types::RawStatus;

    struct Fixture {
        reader: ScriptedReader,
        previous: Snapshot,
        next: Snapshot,
        changelist: Changelist,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                reader: ScriptedReader::default(),
                previous: Snapshot::new(),
                next: Snapshot::new(),
                changelist: Changelist::new(),
            }
        }

        fn ctx(&mut self) -> CollectContext<'_> {
            CollectContext::new(
                &mut self.reader,
                &self.previous,
                &mut self.next,
                &mut self.changelist,
                32,
            )
        }
    }

    #[test]
    fn test_change_gated_first_report() {
        let mut fx = Fixture::new();
        assert!(fx.ctx().report_if_changed("id", FieldValue::from("abc")));
        assert_eq!(fx.changelist.len(), 1);
        assert_eq!(fx.next.get("id"), Some(&FieldValue::from("abc")));
    }

    #[test]
    fn test_change_gated_unchanged_still_stored() {
        let mut fx = Fixture::new();
        fx.previous.set("id", FieldValue::from("abc"));
        assert!(!fx.ctx().report_if_changed("id", FieldValue::from("abc")));
        assert!(fx.changelist.is_empty());
        // Stored so the next cycle compares against it
        assert_eq!(fx.next.get("id"), Some(&FieldValue::from("abc")));
    }

    #[test]
    fn test_unconditional_reports_equal_value() {
        let mut fx = Fixture::new();
        fx.previous.set("axis_names", FieldValue::from(vec!["X".to_string()]));
        assert!(fx
            .ctx()
            .report_always("axis_names", FieldValue::from(vec!["X".to_string()])));
        assert_eq!(fx.changelist.len(), 1);
    }

    #[test]
    fn test_vector_length_change_is_reported() {
        let mut fx = Fixture::new();
        fx.previous.set("absolute", FieldValue::from(vec![1i64, 2]));
        assert!(fx
            .ctx()
            .report_if_changed("absolute", FieldValue::from(vec![1i64, 2, 0])));
    }

    #[test]
    fn test_derived_compares_rederived_values() {
        let mut fx = Fixture::new();
        fx.previous.set(
            "raw_status",
            FieldValue::from(RawStatus {
                run: 0,
                alarm: 0,
                ..Default::default()
            }),
        );
        // Stored derived value is stale; gating must ignore it
        fx.previous.set("execution", FieldValue::from("active"));
        fx.next.set(
            "raw_status",
            FieldValue::from(RawStatus {
                run: 0,
                alarm: 1,
                ..Default::default()
            }),
        );
        let derive =
            |v: &FieldValue| v.as_raw_status().map(|s| FieldValue::from(s.execution().as_str()));
        let changed = fx
            .ctx()
            .report_derived("execution", "raw_status", ReportPolicy::ChangeGated, derive);
        assert_eq!(changed, Some(false));
        assert_eq!(fx.next.get("execution"), Some(&FieldValue::from("stopped")));
    }

    #[test]
    fn test_derived_without_source() {
        let mut fx = Fixture::new();
        let changed = fx.ctx().report_derived(
            "execution",
            "raw_status",
            ReportPolicy::ChangeGated,
            |v: &FieldValue| Some(v.clone()),
        );
        assert_eq!(changed, None);
        assert!(fx.next.is_empty());
    }

    #[test]
    fn test_axis_count_sources() {
        let mut fx = Fixture::new();
        assert_eq!(fx.ctx().axis_count(), 32);

        fx.previous.set(
            "axis_names",
            FieldValue::from(vec!["X".to_string(), "Y".to_string(), "Z".to_string()]),
        );
        assert_eq!(fx.ctx().axis_count(), 3);

        fx.next
            .set("axis_names", FieldValue::from(vec!["X".to_string(), "Y".to_string()]));
        assert_eq!(fx.ctx().axis_count(), 2);
    }

    #[test]
    fn test_carry_forward() {
        let mut fx = Fixture::new();
        fx.previous.set("id", FieldValue::from("abc"));
        assert!(fx.ctx().carry_forward("id"));
        assert!(!fx.ctx().carry_forward("id"));
        assert!(!fx.ctx().carry_forward("missing"));
        assert!(fx.changelist.is_empty());
    }
}
