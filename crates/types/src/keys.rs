//! Stable field keys shared by collectors and sinks.

pub const ID: &str = "id";
pub const MACHINE_INFO: &str = "machine_info";
pub const AXIS_NAMES: &str = "axis_names";
pub const RAW_STATUS: &str = "raw_status";
pub const EXECUTION: &str = "execution";
pub const MODE: &str = "mode";
pub const EMERGENCY: &str = "emergency";
pub const ACTUAL_FEED: &str = "actual_feed";
pub const ACTUAL_SPEED: &str = "actual_speed";
pub const PROGRAM_NUMBER: &str = "program_number";
pub const SUB_PROGRAM_NUMBER: &str = "sub_program_number";
pub const SEQUENCE_NUMBER: &str = "sequence_number";
pub const ABSOLUTE: &str = "absolute";
pub const MACHINE: &str = "machine";
pub const RELATIVE: &str = "relative";
pub const DISTANCE: &str = "distance";
pub const PROGRAM: &str = "program";
pub const PROGRAM_SIZE: &str = "program_size";

/// Key under which parameter `number` is reported (e.g. `parameter_6711`)
pub fn parameter_key(number: i32) -> String {
    format!("parameter_{}", number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_key() {
        assert_eq!(parameter_key(6711), "parameter_6711");
        assert_eq!(parameter_key(0), "parameter_0");
    }
}
