//! Device reader trait

use crate::DeviceError;
use cncsnap_types::{DynamicData, MachineInfo, ParameterValue, ProgramData, RawStatus};

/// Imperative access to one controller session.
///
/// Every call is one request/response round trip (the program upload is
/// several) and can fail independently of the others. A reader is a single
/// stateful handle and is never called concurrently.
pub trait DeviceReader: Send {
    /// Controller identifier (e.g., "0a1b2c3d-...")
    fn read_identifier(&mut self) -> Result<String, DeviceError>;

    /// Parameter `number`, either a plain integer or a per-axis record
    fn read_parameter(&mut self, number: i32) -> Result<ParameterValue, DeviceError>;

    /// Static controller description
    fn read_machine_info(&mut self) -> Result<MachineInfo, DeviceError>;

    /// Names of the controlled axes, one per discovered axis
    fn read_axis_names(&mut self) -> Result<Vec<String>, DeviceError>;

    /// Contents of the currently selected program
    fn read_program(&mut self) -> Result<ProgramData, DeviceError>;

    /// Raw status flags
    fn read_status(&mut self) -> Result<RawStatus, DeviceError>;

    /// Feed, speed, program counters and positions for `axis_count` axes
    fn read_dynamic(&mut self, axis_count: usize) -> Result<DynamicData, DeviceError>;
}

/// Type-erased device reader for dynamic dispatch
pub type BoxedDeviceReader = Box<dyn DeviceReader>;
