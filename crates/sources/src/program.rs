//! Program upload collector

use cncsnap_core::{keys, CollectContext, CollectError, Collector};
use cncsnap_types::{FieldMetadata, FieldPurpose, FieldType, FieldValue, ReportPolicy};

/// Reports the selected program under `program` and its size under
/// `program_size`.
///
/// Program text is free-form and can be large, so comparison is skipped by
/// default and both fields are published on every successful upload.
pub struct ProgramCollector {
    policy: ReportPolicy,
}

impl ProgramCollector {
    pub fn new() -> Self {
        Self {
            policy: ReportPolicy::Unconditional,
        }
    }
}

impl Default for ProgramCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl Collector for ProgramCollector {
    fn id(&self) -> &str {
        "program"
    }

    fn fields(&self) -> Vec<FieldMetadata> {
        vec![
            FieldMetadata::new(
                keys::PROGRAM,
                "Program",
                "Contents of the selected program",
                FieldType::Text,
                FieldPurpose::Program,
            ),
            FieldMetadata::new(
                keys::PROGRAM_SIZE,
                "Program Size",
                "Size of the uploaded program in bytes",
                FieldType::Integer,
                FieldPurpose::Program,
            ),
        ]
    }

    fn policy(&self) -> ReportPolicy {
        self.policy
    }

    fn set_policy(&mut self, policy: ReportPolicy) {
        self.policy = policy;
    }

    fn collect(&mut self, ctx: &mut CollectContext<'_>) -> Result<(), CollectError> {
        let program = ctx
            .reader()
            .read_program()
            .map_err(|e| CollectError::from_device(keys::PROGRAM, e))?;
        let size = i64::try_from(program.size).unwrap_or(i64::MAX);
        ctx.report(keys::PROGRAM, FieldValue::Text(program.text()), self.policy);
        ctx.report(keys::PROGRAM_SIZE, FieldValue::Integer(size), self.policy);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DeviceCall, SimulatedDevice};
    use cncsnap_core::{BoxedCollector, DeviceError, PollConfig, PollCoordinator};
    use std::sync::atomic::AtomicBool;

    fn coordinator(config: &PollConfig) -> PollCoordinator {
        let collectors: Vec<BoxedCollector> = vec![Box::new(ProgramCollector::new())];
        PollCoordinator::new(collectors, config)
    }

    #[test]
    fn test_unchanged_program_reported_every_cycle() {
        let mut device = SimulatedDevice::new();
        let mut coord = coordinator(&PollConfig::default());
        let cancel = AtomicBool::new(false);

        for _ in 0..2 {
            let report = coord.run_cycle(&mut device, &cancel).unwrap();
            let keys: Vec<&str> = report.updates.iter().map(|u| u.key.as_str()).collect();
            assert_eq!(keys, vec!["program", "program_size"]);
        }

        let size = coord.previous().get("program_size").and_then(FieldValue::as_integer);
        assert_eq!(size, Some(device.state().program.len() as i64));
    }

    #[test]
    fn test_recurring_upload_errors_escalate() {
        let mut device = SimulatedDevice::new();
        device.state_mut().upload_buffer_too_small = 6;
        let config = PollConfig {
            protocol_error_limit: 2,
            ..PollConfig::default()
        };
        let mut coord = coordinator(&config);
        let cancel = AtomicBool::new(false);

        let report = coord.run_cycle(&mut device, &cancel).unwrap();
        assert!(report.field_errors[0].is_protocol());

        let err = coord.run_cycle(&mut device, &cancel).unwrap_err();
        assert!(err.is_session());
    }

    #[test]
    fn test_timeout_is_field_error() {
        let mut device = SimulatedDevice::new();
        device.fail_next(DeviceCall::Program, DeviceError::Timeout);
        let mut coord = coordinator(&PollConfig::default());
        let report = coord.run_cycle(&mut device, &AtomicBool::new(false)).unwrap();
        assert!(report.updates.is_empty());
        assert_eq!(report.field_errors.len(), 1);
    }
}
