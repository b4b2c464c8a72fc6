//! Simulated controller for demonstration and testing
//!
//! Answers every device call from an in-memory [`SimulatedState`]. While
//! motion is enabled and the controller is running, each dynamic read moves
//! the axes by a fixed step, so consecutive cycles produce position updates.

use crate::format_identifier;
use cncsnap_core::{upload_program, DeviceError, DeviceReader, UploadChannel};
use cncsnap_types::{
    AxisPositions, DynamicData, MachineInfo, ParameterRecord, ParameterValue, ProgramData,
    RawStatus,
};
use std::collections::{BTreeMap, HashMap, VecDeque};

const SAMPLE_PROGRAM: &str = "O0001 (SIMULATED)
G90 G54 G00 X0 Y0 Z50.
S1200 M03
G01 Z-2. F300
X120.
Y80.
X0
Y0
G00 Z50.
M30
%";

/// Device calls that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceCall {
    Identifier,
    Parameter,
    MachineInfo,
    AxisNames,
    Program,
    Status,
    Dynamic,
}

/// Everything the simulated controller reports
#[derive(Debug, Clone)]
pub struct SimulatedState {
    pub identifier: String,
    pub machine_info: MachineInfo,
    pub axis_names: Vec<String>,
    pub status: RawStatus,
    pub dynamic: DynamicData,
    pub program: Vec<u8>,
    pub parameters: BTreeMap<i32, ParameterValue>,
    /// Advance positions on every dynamic read while running
    pub motion: bool,
    /// Position increment per dynamic read, in controller units
    pub feed_step: i64,
    /// "Buffer too small" answers given at the start of each program upload
    pub upload_buffer_too_small: u32,
    /// Bytes handed out per upload chunk
    pub upload_chunk: usize,
}

impl Default for SimulatedState {
    fn default() -> Self {
        let axis_names: Vec<String> = ["X", "Y", "Z"].iter().map(|s| s.to_string()).collect();
        let axis_count = axis_names.len();

        let mut parameters = BTreeMap::new();
        parameters.insert(6711, ParameterValue::Integer(0));
        parameters.insert(
            1320,
            ParameterValue::Record(ParameterRecord {
                number: 1320,
                data_type: 2,
                values: vec![520_000, 410_000, 0],
            }),
        );

        Self {
            identifier: format_identifier([0x5e1f_0a01, 0x0000_0031, 0x0000_0000, 0x0000_2a17]),
            machine_info: MachineInfo {
                addinfo: 1154,
                max_axis: 32,
                cnc_type: "31".to_string(),
                mt_type: " M".to_string(),
                series: "G421".to_string(),
                version: "30.0".to_string(),
                axes: format!("{:02}", axis_count),
            },
            axis_names,
            status: RawStatus {
                aut: 1,
                run: 3,
                motion: 1,
                ..Default::default()
            },
            dynamic: DynamicData {
                actual_feed: 300,
                actual_speed: 1200,
                program_number: 1,
                sub_program_number: 1,
                sequence_number: 0,
                positions: AxisPositions {
                    absolute: vec![0; axis_count],
                    machine: vec![0; axis_count],
                    relative: vec![0; axis_count],
                    distance: vec![120_000; axis_count],
                },
            },
            program: SAMPLE_PROGRAM.as_bytes().to_vec(),
            parameters,
            motion: true,
            feed_step: 250,
            upload_buffer_too_small: 0,
            upload_chunk: 64,
        }
    }
}

/// In-memory device reader
pub struct SimulatedDevice {
    state: SimulatedState,
    failures: HashMap<DeviceCall, VecDeque<DeviceError>>,
    dynamic_reads: u64,
}

impl SimulatedDevice {
    pub fn new() -> Self {
        Self::with_state(SimulatedState::default())
    }

    pub fn with_state(state: SimulatedState) -> Self {
        Self {
            state,
            failures: HashMap::new(),
            dynamic_reads: 0,
        }
    }

    pub fn state(&self) -> &SimulatedState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SimulatedState {
        &mut self.state
    }

    /// Make the next `call` fail with `err`. Failures queue per call.
    pub fn fail_next(&mut self, call: DeviceCall, err: DeviceError) {
        self.failures.entry(call).or_default().push_back(err);
    }

    fn check(&mut self, call: DeviceCall) -> Result<(), DeviceError> {
        match self.failures.get_mut(&call).and_then(VecDeque::pop_front) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn advance(&mut self) {
        let step = self.state.feed_step;
        let positions = &mut self.state.dynamic.positions;
        for (axis, value) in positions.absolute.iter_mut().enumerate() {
            *value += step * (axis as i64 + 1);
        }
        for (axis, value) in positions.machine.iter_mut().enumerate() {
            *value += step * (axis as i64 + 1);
        }
        for (axis, value) in positions.relative.iter_mut().enumerate() {
            *value += step * (axis as i64 + 1);
        }
        for value in positions.distance.iter_mut() {
            *value = (*value - step).max(0);
        }
        self.state.dynamic.sequence_number += 1;
    }
}

impl Default for SimulatedDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceReader for SimulatedDevice {
    fn read_identifier(&mut self) -> Result<String, DeviceError> {
        self.check(DeviceCall::Identifier)?;
        Ok(self.state.identifier.clone())
    }

    fn read_parameter(&mut self, number: i32) -> Result<ParameterValue, DeviceError> {
        self.check(DeviceCall::Parameter)?;
        self.state
            .parameters
            .get(&number)
            .cloned()
            .ok_or(DeviceError::BadResponse { code: 2 })
    }

    fn read_machine_info(&mut self) -> Result<MachineInfo, DeviceError> {
        self.check(DeviceCall::MachineInfo)?;
        Ok(self.state.machine_info.clone())
    }

    fn read_axis_names(&mut self) -> Result<Vec<String>, DeviceError> {
        self.check(DeviceCall::AxisNames)?;
        Ok(self.state.axis_names.clone())
    }

    fn read_program(&mut self) -> Result<ProgramData, DeviceError> {
        self.check(DeviceCall::Program)?;
        let mut channel = SimulatedUpload {
            program: &self.state.program,
            offset: 0,
            chunk: self.state.upload_chunk.max(1),
            buffer_too_small: self.state.upload_buffer_too_small,
        };
        upload_program(&mut channel)
    }

    fn read_status(&mut self) -> Result<RawStatus, DeviceError> {
        self.check(DeviceCall::Status)?;
        Ok(self.state.status)
    }

    fn read_dynamic(&mut self, axis_count: usize) -> Result<DynamicData, DeviceError> {
        self.check(DeviceCall::Dynamic)?;
        self.dynamic_reads += 1;
        let running = matches!(self.state.status.run, 3 | 4);
        if self.state.motion && running && self.dynamic_reads > 1 {
            self.advance();
        }

        let mut data = self.state.dynamic.clone();
        let positions = &mut data.positions;
        positions.absolute.resize(axis_count, 0);
        positions.machine.resize(axis_count, 0);
        positions.relative.resize(axis_count, 0);
        positions.distance.resize(axis_count, 0);
        Ok(data)
    }
}

/// Chunked view of the simulated program
struct SimulatedUpload<'a> {
    program: &'a [u8],
    offset: usize,
    chunk: usize,
    buffer_too_small: u32,
}

impl UploadChannel for SimulatedUpload<'_> {
    fn begin(&mut self) -> Result<(), DeviceError> {
        self.offset = 0;
        Ok(())
    }

    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize, DeviceError> {
        if self.buffer_too_small > 0 {
            self.buffer_too_small -= 1;
            return Err(DeviceError::BufferTooSmall);
        }
        let remaining = &self.program[self.offset..];
        let n = remaining.len().min(self.chunk).min(buf.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        self.offset += n;
        Ok(n)
    }

    fn end(&mut self) -> Result<(), DeviceError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_upload_in_chunks() {
        let mut device = SimulatedDevice::new();
        device.state_mut().upload_chunk = 7;
        device.state_mut().upload_buffer_too_small = 2;
        let program = device.read_program().unwrap();
        assert_eq!(program.text(), SAMPLE_PROGRAM);
        assert_eq!(program.size, SAMPLE_PROGRAM.len());
    }

    #[test]
    fn test_program_without_terminator_is_protocol_error() {
        let mut device = SimulatedDevice::new();
        device.state_mut().program = b"O0001\nM30\n".to_vec();
        let err = device.read_program().unwrap_err();
        assert!(err.is_protocol());
    }

    #[test]
    fn test_positions_advance_while_running() {
        let mut device = SimulatedDevice::new();
        let first = device.read_dynamic(3).unwrap();
        let second = device.read_dynamic(3).unwrap();
        assert_eq!(first.positions.absolute, vec![0, 0, 0]);
        assert_eq!(second.positions.absolute, vec![250, 500, 750]);
        assert_eq!(second.positions.distance, vec![119_750; 3]);
    }

    #[test]
    fn test_positions_hold_when_stopped() {
        let mut device = SimulatedDevice::new();
        device.state_mut().status.run = 0;
        device.read_dynamic(3).unwrap();
        let second = device.read_dynamic(3).unwrap();
        assert_eq!(second.positions.absolute, vec![0, 0, 0]);
    }

    #[test]
    fn test_scripted_failures_queue() {
        let mut device = SimulatedDevice::new();
        device.fail_next(DeviceCall::Status, DeviceError::Timeout);
        device.fail_next(DeviceCall::Status, DeviceError::BadResponse { code: -16 });
        assert_eq!(device.read_status().unwrap_err(), DeviceError::Timeout);
        assert_eq!(
            device.read_status().unwrap_err(),
            DeviceError::BadResponse { code: -16 }
        );
        assert!(device.read_status().is_ok());
    }

    #[test]
    fn test_unknown_parameter() {
        let mut device = SimulatedDevice::new();
        assert!(device.read_parameter(9999).is_err());
        assert_eq!(device.read_parameter(6711).unwrap(), ParameterValue::Integer(0));
    }
}
