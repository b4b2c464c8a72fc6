//! Configuration types for the device, the poll cycle and collectors.

use serde::{Deserialize, Serialize};

use crate::field::ReportPolicy;

/// Largest axis count a controller can report
pub const MAX_AXES: usize = 32;

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    8193
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_simulated() -> bool {
    true
}

/// Device connection settings, handed to the device reader
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Poll the built-in simulated controller instead of real hardware
    #[serde(default = "default_simulated")]
    pub simulated: bool,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            timeout_secs: default_timeout_secs(),
            simulated: default_simulated(),
        }
    }
}

fn default_interval_ms() -> u64 {
    1000
}

fn default_protocol_error_limit() -> u32 {
    3
}

fn default_max_axes() -> usize {
    MAX_AXES
}

/// Poll cycle settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollConfig {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Back-to-back cycles in which one collector fails with a protocol
    /// error before that failure is treated as a session failure. Any other
    /// outcome for the collector starts the count over.
    #[serde(default = "default_protocol_error_limit")]
    pub protocol_error_limit: u32,
    /// Upper bound on the axis count used for position fields
    #[serde(default = "default_max_axes")]
    pub max_axes: usize,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            protocol_error_limit: default_protocol_error_limit(),
            max_axes: default_max_axes(),
        }
    }
}

/// One entry of the ordered collector registration list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectorConfig {
    /// Registered collector id (e.g., "raw_status")
    pub id: String,
    /// Overrides the collector's default reportability
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<ReportPolicy>,
    /// Parameter numbers, for the parameter collector
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<i32>,
}

impl CollectorConfig {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            policy: None,
            parameters: Vec::new(),
        }
    }

    pub fn with_policy(mut self, policy: ReportPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    pub fn with_parameters(mut self, parameters: Vec<i32>) -> Self {
        self.parameters = parameters;
        self
    }

    /// The registration list used when no configuration says otherwise.
    ///
    /// Raw fields come before the derived fields that read them.
    pub fn default_list() -> Vec<CollectorConfig> {
        [
            "identifier",
            "machine_info",
            "axis_names",
            "raw_status",
            "execution",
            "mode",
            "emergency",
            "dynamic",
            "program",
        ]
        .into_iter()
        .map(CollectorConfig::new)
        .collect()
    }
}
