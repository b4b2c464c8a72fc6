//! cncsnap-core: Snapshot/diff engine for cncsnap.
//!
//! This crate contains the fundamental traits (Collector, DeviceReader),
//! the two-generation snapshot store, the poll cycle coordinator that turns
//! collector output into an ordered changelist, and the collector Registry.

mod changelist;
mod collector;
pub mod constants;
mod coordinator;
mod device;
mod error;
mod program;
mod registry;
mod snapshot;

#[cfg(test)]
pub(crate) mod testing;

pub use changelist::Changelist;
pub use collector::{BoxedCollector, CollectContext, Collector};
pub use constants::{MAX_UPLOAD_RETRIES, PROGRAM_SENTINEL, UPLOAD_CHUNK_SIZE};
pub use coordinator::{CycleReport, CycleState, PollCoordinator};
pub use device::{BoxedDeviceReader, DeviceReader};
pub use error::{CollectError, DeviceError, PollError};
pub use program::{upload_program, UploadChannel};
pub use registry::{CollectorFactory, CollectorInfo, Registry};
pub use snapshot::{Generations, Snapshot};

// Re-export types used in trait signatures for convenience
pub use cncsnap_types::keys;
pub use cncsnap_types::{
    CollectorConfig, FieldMetadata, FieldPurpose, FieldType, FieldValue, PollConfig, ReportPolicy,
    Update,
};
