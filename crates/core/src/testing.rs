//! In-crate test doubles: a scripted device reader and two minimal collectors.

use crate::{CollectContext, CollectError, Collector, DeviceError, DeviceReader};
use cncsnap_types::{
    keys, DynamicData, FieldMetadata, FieldPurpose, FieldType, MachineInfo, ParameterValue,
    ProgramData, RawStatus, ReportPolicy,
};
use std::collections::{HashMap, VecDeque};

/// Device reader returning fixed values, with queued one-shot failures per call
pub(crate) struct ScriptedReader {
    pub identifier: String,
    pub status: RawStatus,
    failures: HashMap<&'static str, VecDeque<DeviceError>>,
}

impl Default for ScriptedReader {
    fn default() -> Self {
        Self {
            identifier: "cnc-0001".to_string(),
            status: RawStatus::default(),
            failures: HashMap::new(),
        }
    }
}

impl ScriptedReader {
    /// Make the next call to `call` fail with `err`
    pub fn fail(&mut self, call: &'static str, err: DeviceError) {
        self.failures.entry(call).or_default().push_back(err);
    }

    fn check(&mut self, call: &'static str) -> Result<(), DeviceError> {
        match self.failures.get_mut(call).and_then(VecDeque::pop_front) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl DeviceReader for ScriptedReader {
    fn read_identifier(&mut self) -> Result<String, DeviceError> {
        self.check("read_identifier")?;
        Ok(self.identifier.clone())
    }

    fn read_parameter(&mut self, number: i32) -> Result<ParameterValue, DeviceError> {
        self.check("read_parameter")?;
        Ok(ParameterValue::Integer(number as i64))
    }

    fn read_machine_info(&mut self) -> Result<MachineInfo, DeviceError> {
        self.check("read_machine_info")?;
        Ok(MachineInfo::default())
    }

    fn read_axis_names(&mut self) -> Result<Vec<String>, DeviceError> {
        self.check("read_axis_names")?;
        Ok(vec!["X".to_string(), "Y".to_string()])
    }

    fn read_program(&mut self) -> Result<ProgramData, DeviceError> {
        self.check("read_program")?;
        Ok(ProgramData::new(b"%\nM30\n%".to_vec()))
    }

    fn read_status(&mut self) -> Result<RawStatus, DeviceError> {
        self.check("read_status")?;
        Ok(self.status)
    }

    fn read_dynamic(&mut self, _axis_count: usize) -> Result<DynamicData, DeviceError> {
        self.check("read_dynamic")?;
        Ok(DynamicData::default())
    }
}

pub(crate) struct IdCollector {
    policy: ReportPolicy,
}

impl IdCollector {
    pub fn new() -> Self {
        Self {
            policy: ReportPolicy::ChangeGated,
        }
    }
}

impl Collector for IdCollector {
    fn id(&self) -> &str {
        "identifier"
    }

    fn fields(&self) -> Vec<FieldMetadata> {
        vec![FieldMetadata::new(
            keys::ID,
            "Identifier",
            "Controller identifier",
            FieldType::Text,
            FieldPurpose::Identity,
        )]
    }

    fn policy(&self) -> ReportPolicy {
        self.policy
    }

    fn set_policy(&mut self, policy: ReportPolicy) {
        self.policy = policy;
    }

    fn collect(&mut self, ctx: &mut CollectContext<'_>) -> Result<(), CollectError> {
        let id = ctx
            .reader()
            .read_identifier()
            .map_err(|e| CollectError::from_device(keys::ID, e))?;
        ctx.report(keys::ID, id.into(), self.policy);
        Ok(())
    }
}

pub(crate) struct StatusCollector {
    policy: ReportPolicy,
}

impl StatusCollector {
    pub fn new() -> Self {
        Self {
            policy: ReportPolicy::ChangeGated,
        }
    }
}

impl Collector for StatusCollector {
    fn id(&self) -> &str {
        "raw_status"
    }

    fn fields(&self) -> Vec<FieldMetadata> {
        vec![FieldMetadata::new(
            keys::RAW_STATUS,
            "Raw Status",
            "Controller status flags",
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
