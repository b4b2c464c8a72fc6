//! Controller parameter collector

use cncsnap_core::{keys, CollectContext, CollectError, Collector};
use cncsnap_types::{FieldMetadata, FieldPurpose, FieldType, ReportPolicy};
use log::warn;
use std::collections::HashSet;

/// Reads a configured list of parameters, each under `parameter_<n>`.
///
/// A failed parameter does not stop the others from being read. Once the
/// whole list has been tried, the first protocol error is returned, else the
/// first read failure, so recurring protocol errors still count towards
/// escalation. A session failure stops immediately.
pub struct ParameterCollector {
    numbers: Vec<i32>,
    policy: ReportPolicy,
}

impl ParameterCollector {
    /// Repeated numbers are read once, at their first position
    pub fn new(numbers: Vec<i32>) -> Self {
        let mut seen = HashSet::new();
        let numbers = numbers
            .into_iter()
            .filter(|&number| {
                let first = seen.insert(number);
                if !first {
                    warn!("Parameter {} listed more than once, reading it once", number);
                }
                first
            })
            .collect();

        Self {
            numbers,
            policy: ReportPolicy::ChangeGated,
        }
    }
}

impl Collector for ParameterCollector {
    fn id(&self) -> &str {
        "parameter"
    }

    fn fields(&self) -> Vec<FieldMetadata> {
        self.numbers
            .iter()
            .map(|&number| {
                FieldMetadata::new(
                    keys::parameter_key(number),
                    format!("Parameter {}", number),
                    "Controller parameter (integer or per-axis record)",
                    FieldType::IntegerOrRecord,
                    FieldPurpose::Parameter,
                )
            })
            .collect()
    }

    fn policy(&self) -> ReportPolicy {
        self.policy
    }

    fn set_policy(&mut self, policy: ReportPolicy) {
        self.policy = policy;
    }

    fn collect(&mut self, ctx: &mut CollectContext<'_>) -> Result<(), CollectError> {
        let mut first_error: Option<CollectError> = None;

        for &number in &self.numbers {
            let key = keys::parameter_key(number);
            match ctx.reader().read_parameter(number) {
                Ok(value) => {
                    ctx.report(&key, value.into(), self.policy);
                }
                Err(e) => {
                    let err = CollectError::from_device(key.as_str(), e);
                    if err.is_session() {
                        return Err(err);
                    }
                    ctx.carry_forward(&key);
                    let replace = match &first_error {
                        None => true,
                        Some(prior) => err.is_protocol() && !prior.is_protocol(),
                    };
                    if replace {
                        first_error = Some(err);
                    }
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
