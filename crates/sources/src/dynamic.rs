//! Dynamic data collector: feed, speed, program counters and positions.
//!
//! One device round trip per cycle, fanned out into individually
//! change-gated keys. Position vectors are sized to the axis count taken
//! from `axis_names` (current generation first, then previous).

use cncsnap_core::{keys, CollectContext, CollectError, Collector};
use cncsnap_types::{FieldMetadata, FieldPurpose, FieldType, FieldValue, ReportPolicy};
use log::trace;

const SCALAR_FIELDS: [(&str, &str, &str); 5] = [
    (keys::ACTUAL_FEED, "Actual Feed", "Actual feed rate"),
    (keys::ACTUAL_SPEED, "Actual Speed", "Actual spindle speed"),
    (keys::PROGRAM_NUMBER, "Program Number", "Running program number"),
    (
        keys::SUB_PROGRAM_NUMBER,
        "Sub Program Number",
        "Running sub program number",
    ),
    (keys::SEQUENCE_NUMBER, "Sequence Number", "Current sequence number"),
];

const POSITION_FIELDS: [(&str, &str, &str); 4] = [
    (keys::ABSOLUTE, "Absolute Position", "Absolute position per axis"),
    (keys::MACHINE, "Machine Position", "Machine position per axis"),
    (keys::RELATIVE, "Relative Position", "Relative position per axis"),
    (keys::DISTANCE, "Distance to Go", "Remaining distance per axis"),
];

/// Reports feed, speed, program counters and positions.
///
/// All nine keys come from one read, so a failed read is reported once,
/// under the collector id `dynamic`, rather than per key.
pub struct DynamicCollector {
    policy: ReportPolicy,
}

impl DynamicCollector {
    pub fn new() -> Self {
        Self {
            policy: ReportPolicy::ChangeGated,
        }
    }
}

impl Default for DynamicCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl Collector for DynamicCollector {
    fn id(&self) -> &str {
        "dynamic"
    }

    fn fields(&self) -> Vec<FieldMetadata> {
        let scalars = SCALAR_FIELDS.iter().map(|(key, name, description)| {
            FieldMetadata::new(
                *key,
                *name,
                *description,
                FieldType::Integer,
                FieldPurpose::Motion,
            )
        });
        let positions = POSITION_FIELDS.iter().map(|(key, name, description)| {
            FieldMetadata::new(
                *key,
                *name,
                *description,
                FieldType::IntegerList,
                FieldPurpose::Motion,
            )
        });
        scalars.chain(positions).collect()
    }

    fn policy(&self) -> ReportPolicy {
        self.policy
    }

    fn set_policy(&mut self, policy: ReportPolicy) {
        self.policy = policy;
    }

    fn collect(&mut self, ctx: &mut CollectContext<'_>) -> Result<(), CollectError> {
        let axis_count = ctx.axis_count();
        let data = ctx
            .reader()
            .read_dynamic(axis_count)
            .map_err(|e| CollectError::from_device(self.id(), e))?;
        trace!("Dynamic data read for {} axes", axis_count);

        let mut positions = data.positions;
        positions.truncate(axis_count);

        let policy = self.policy;
        ctx.report(keys::ACTUAL_FEED, FieldValue::Integer(data.actual_feed), policy);
        ctx.report(keys::ACTUAL_SPEED, FieldValue::Integer(data.actual_speed), policy);
        ctx.report(keys::PROGRAM_NUMBER, FieldValue::Integer(data.program_number), policy);
        ctx.report(
            keys::SUB_PROGRAM_NUMBER,
            FieldValue::Integer(data.sub_program_number),
            policy,
        );
        ctx.report(keys::SEQUENCE_NUMBER, FieldValue::Integer(data.sequence_number), policy);
        ctx.report(keys::ABSOLUTE, FieldValue::IntegerList(positions.absolute), policy);
        ctx.report(keys::MACHINE, FieldValue::IntegerList(positions.machine), policy);
        ctx.report(keys::RELATIVE, FieldValue::IntegerList(positions.relative), policy);
        ctx.report(keys::DISTANCE, FieldValue::IntegerList(positions.distance), policy);
        Ok(())
    }
}
