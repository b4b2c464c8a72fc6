//! Controller identifier collector

use cncsnap_core::{keys, CollectContext, CollectError, Collector};
use cncsnap_types::{FieldMetadata, FieldPurpose, FieldType, ReportPolicy};

/// Format the four identifier words a controller reports
/// (e.g., `0a1b2c3d-00000000-00000001-deadbeef`)
pub fn format_identifier(words: [u32; 4]) -> String {
    format!(
        "{:08x}-{:08x}-{:08x}-{:08x}",
        words[0], words[1], words[2], words[3]
    )
}

/// Reports the controller identifier under `id`
pub struct IdentifierCollector {
    policy: ReportPolicy,
}

impl IdentifierCollector {
    pub fn new() -> Self {
        Self {
            policy: ReportPolicy::ChangeGated,
        }
    }
}

impl Default for IdentifierCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl Collector for IdentifierCollector {
    fn id(&self) -> &str {
        "identifier"
    }

    fn fields(&self) -> Vec<FieldMetadata> {
        vec![FieldMetadata::new(
            keys::ID,
            "Identifier",
            "Unique controller identifier",
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
