//! Raw status collector and the status fields derived from it

use cncsnap_core::{keys, CollectContext, CollectError, Collector};
use cncsnap_types::{
    Emergency, Execution, FieldMetadata, FieldPurpose, FieldType, FieldValue, Mode, RawStatus,
    ReportPolicy,
};
use log::debug;

/// Reports the raw status record under `raw_status`
pub struct RawStatusCollector {
    policy: ReportPolicy,
}

impl RawStatusCollector {
    pub fn new() -> Self {
        Self {
            policy: ReportPolicy::ChangeGated,
        }
    }
}

impl Default for RawStatusCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl Collector for RawStatusCollector {
    fn id(&self) -> &str {
        "raw_status"
    }

    fn fields(&self) -> Vec<FieldMetadata> {
        vec![FieldMetadata::new(
            keys::RAW_STATUS,
            "Raw Status",
            "Alarm, mode, run, motion and strobe flags",
            FieldType::Record,
            FieldPurpose::Status,
        )]
    }

    fn policy(&self) -> ReportPolicy {
        self.policy
    }

    fn set_policy(&mut self, policy: ReportPolicy) {
        self.policy = policy;
    }

    fn collect(&mut self, ctx: &mut CollectContext<'_>) -> Result<(), CollectError> {
        let status = ctx
            .reader()
            .read_status()
            .map_err(|e| CollectError::from_device(keys::RAW_STATUS, e))?;
        ctx.report(keys::RAW_STATUS, status.into(), self.policy);
        Ok(())
    }
}

/// A status string derived from `raw_status` without touching the device.
///
/// Must be registered after the raw status collector. Change gating
/// re-derives the value from each generation's raw status and compares
/// the two strings, so raw flags the classification ignores never cause
/// an update.
pub struct DerivedStatusCollector {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    classify: fn(&RawStatus) -> &'static str,
    policy: ReportPolicy,
}

impl DerivedStatusCollector {
    /// `execution`: active, interrupted, stopped or ready
    pub fn execution() -> Self {
        Self {
            id: keys::EXECUTION,
            name: "Execution",
            description: "Program execution state derived from run, motion and strobe flags",
            classify: |status| Execution::classify(status).as_str(),
            policy: ReportPolicy::ChangeGated,
        }
    }

    /// `mode`: manual, manual_data_input or automatic
    pub fn mode() -> Self {
        Self {
            id: keys::MODE,
            name: "Mode",
            description: "Operating mode derived from the automatic mode code",
            classify: |status| Mode::classify(status).as_str(),
            policy: ReportPolicy::ChangeGated,
        }
    }

    /// `emergency`: triggered or armed
    pub fn emergency() -> Self {
        Self {
            id: keys::EMERGENCY,
            name: "Emergency",
            description: "Emergency stop state",
            classify: |status| Emergency::classify(status).as_str(),
            policy: ReportPolicy::ChangeGated,
        }
    }
}

impl Collector for DerivedStatusCollector {
    fn id(&self) -> &str {
        self.id
    }

    fn fields(&self) -> Vec<FieldMetadata> {
        vec![FieldMetadata::new(
            self.id,
            self.name,
            self.description,
            FieldType::Text,
            FieldPurpose::Derived,
        )]
    }

    fn policy(&self) -> ReportPolicy {
        self.policy
    }

    fn set_policy(&mut self, policy: ReportPolicy) {
        self.policy = policy;
    }

    fn collect(&mut self, ctx: &mut CollectContext<'_>) -> Result<(), CollectError> {
        let classify = self.classify;
        let derived = ctx.report_derived(self.id, keys::RAW_STATUS, self.policy, |value| {
            value
                .as_raw_status()
                .map(|status| FieldValue::from(classify(status)))
        });
        if derived.is_none() {
            debug!("No raw status available, '{}' not derived", self.id);
        }
        Ok(())
    }
}
