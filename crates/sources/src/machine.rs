//! Machine info and axis name collectors.
//!
//! Both fields are mostly static, so they default to unconditional
//! reporting: every successful read is published.

use cncsnap_core::{keys, CollectContext, CollectError, Collector};
use cncsnap_types::{FieldMetadata, FieldPurpose, FieldType, FieldValue, ReportPolicy};
use log::trace;

/// Reports the static controller description under `machine_info`
pub struct MachineInfoCollector {
    policy: ReportPolicy,
}

impl MachineInfoCollector {
    pub fn new() -> Self {
        Self {
            policy: ReportPolicy::Unconditional,
        }
    }
}

impl Default for MachineInfoCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl Collector for MachineInfoCollector {
    fn id(&self) -> &str {
        "machine_info"
    }

    fn fields(&self) -> Vec<FieldMetadata> {
        vec![FieldMetadata::new(
            keys::MACHINE_INFO,
            "Machine Info",
            "Controller type, series, version and axis counts",
            FieldType::Record,
            FieldPurpose::Static,
        )]
    }

    fn policy(&self) -> ReportPolicy {
        self.policy
    }

    fn set_policy(&mut self, policy: ReportPolicy) {
        self.policy = policy;
    }

    fn collect(&mut self, ctx: &mut CollectContext<'_>) -> Result<(), CollectError> {
        let info = ctx
            .reader()
            .read_machine_info()
            .map_err(|e| CollectError::from_device(keys::MACHINE_INFO, e))?;
        trace!("Machine info: series {} version {}", info.series, info.version);
        ctx.report(keys::MACHINE_INFO, info.into(), self.policy);
        Ok(())
    }
}

/// Reports the axis name list under `axis_names`.
///
/// The list length is the axis count every position field uses, so this
/// collector should run before the dynamic collector.
pub struct AxisNamesCollector {
    policy: ReportPolicy,
}

impl AxisNamesCollector {
    pub fn new() -> Self {
        Self {
            policy: ReportPolicy::Unconditional,
        }
    }
}

impl Default for AxisNamesCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl Collector for AxisNamesCollector {
    fn id(&self) -> &str {
        "axis_names"
    }

    fn fields(&self) -> Vec<FieldMetadata> {
        vec![FieldMetadata::new(
            keys::AXIS_NAMES,
            "Axis Names",
            "Names of the controlled axes",
            FieldType::TextList,
            FieldPurpose::Static,
        )]
    }

    fn policy(&self) -> ReportPolicy {
        self.policy
    }

    fn set_policy(&mut self, policy: ReportPolicy) {
        self.policy = policy;
    }

    fn collect(&mut self, ctx: &mut CollectContext<'_>) -> Result<(), CollectError> {
        let mut names = ctx
            .reader()
            .read_axis_names()
            .map_err(|e| CollectError::from_device(keys::AXIS_NAMES, e))?;
        names.truncate(ctx.max_axes());
        ctx.report(keys::AXIS_NAMES, FieldValue::TextList(names), self.policy);
        Ok(())
    }
}
