//! Records returned by the device reader.
//!
//! These mirror what the controller reports, already normalized: per-axis
//! data is always a plain sequence, one element per discovered axis.

use serde::{Deserialize, Serialize};

/// Static controller description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MachineInfo {
    /// Additional info flags
    pub addinfo: i32,
    /// Maximum number of controlled axes
    pub max_axis: i32,
    /// Controller type (e.g., "30")
    pub cnc_type: String,
    /// Machine type (e.g., " M" for machining center)
    pub mt_type: String,
    /// Software series
    pub series: String,
    /// Software version
    pub version: String,
    /// Current number of controlled axes, as reported
    pub axes: String,
}

/// Raw status flags of the controller.
///
/// The sole input to every derived classification. Codes are the
/// controller's own numbering and are passed through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RawStatus {
    /// Alarm status
    pub alarm: i32,
    /// Automatic/manual mode selection code
    pub aut: i32,
    /// Program editing status
    pub edit: i32,
    /// Emergency stop status
    pub emergency: i32,
    /// Handle retrace / manual data status
    pub hdck: i32,
    /// Axis movement / dwell status
    pub motion: i32,
    /// M, S, T, B function strobe status
    pub mstb: i32,
    /// Automatic operation status
    pub run: i32,
    /// Tool measurement mode
    pub tmmode: i32,
}

/// Parameter data that is not a single integer (e.g., per-axis values)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterRecord {
    /// Parameter number
    pub number: i32,
    /// Controller data type code
    pub data_type: i32,
    /// Values, one per axis for axis-type parameters
    pub values: Vec<i64>,
}

/// Result of a parameter read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterValue {
    Integer(i64),
    Record(ParameterRecord),
}

/// Per-axis position groups
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AxisPositions {
    pub absolute: Vec<i64>,
    pub machine: Vec<i64>,
    pub relative: Vec<i64>,
    pub distance: Vec<i64>,
}

impl AxisPositions {
    /// All four groups zeroed for `axis_count` axes
    pub fn zeroed(axis_count: usize) -> Self {
        Self {
            absolute: vec![0; axis_count],
            machine: vec![0; axis_count],
            relative: vec![0; axis_count],
            distance: vec![0; axis_count],
        }
    }

    /// Truncate every group to at most `axis_count` elements
    pub fn truncate(&mut self, axis_count: usize) {
        self.absolute.truncate(axis_count);
        self.machine.truncate(axis_count);
        self.relative.truncate(axis_count);
        self.distance.truncate(axis_count);
    }
}

/// Dynamic data read in a single round trip
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DynamicData {
    pub actual_feed: i64,
    pub actual_speed: i64,
    pub program_number: i64,
    pub sub_program_number: i64,
    pub sequence_number: i64,
    pub positions: AxisPositions,
}

/// Uploaded program contents
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProgramData {
    pub contents: Vec<u8>,
    pub size: usize,
}

impl ProgramData {
    pub fn new(contents: Vec<u8>) -> Self {
        let size = contents.len();
        Self { contents, size }
    }

    /// Program text, with any invalid bytes replaced
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.contents).into_owned()
    }
}
