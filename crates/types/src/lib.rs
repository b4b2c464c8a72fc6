//! cncsnap-types: Shared data types for the cncsnap change poller.
//!
//! This crate contains pure data types (field values, device records,
//! derived classifications, configuration) shared by every cncsnap crate.
//! Nothing here talks to a device, which keeps it usable by sinks and
//! tooling that only consume changelists.

pub mod config;
pub mod field;
pub mod keys;
pub mod machine;
pub mod status;
pub mod update;
pub mod value;

// Re-export commonly used types at the crate root for convenience
pub use config::{CollectorConfig, DeviceConfig, PollConfig, MAX_AXES};
pub use field::{FieldMetadata, FieldPurpose, FieldType, ReportPolicy};
pub use machine::{
    AxisPositions, DynamicData, MachineInfo, ParameterRecord, ParameterValue, ProgramData,
    RawStatus,
};
pub use status::{Emergency, Execution, Mode};
pub use update::Update;
pub use value::{FieldValue, Record};
