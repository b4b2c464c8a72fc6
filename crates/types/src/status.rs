//! Derived status classifications.
//!
//! Each classification is a pure function of [`RawStatus`], evaluated as the
//! first matching rule in priority order.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::machine::RawStatus;

/// Program execution state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Execution {
    Active,
    Interrupted,
    Stopped,
    Ready,
}

impl Execution {
    /// Classify from the run, motion and strobe codes only
    pub fn classify(status: &RawStatus) -> Self {
        if matches!(status.run, 3 | 4) {
            Execution::Active
        } else if status.run == 2 || status.motion == 2 || status.mstb != 0 {
            Execution::Interrupted
        } else if status.run == 0 {
            Execution::Stopped
        } else {
            Execution::Ready
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Execution::Active => "active",
            Execution::Interrupted => "interrupted",
            Execution::Stopped => "stopped",
            Execution::Ready => "ready",
        }
    }
}

/// Controller operating mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Manual,
    ManualDataInput,
    Automatic,
}

impl Mode {
    pub fn classify(status: &RawStatus) -> Self {
        match status.aut {
            5 | 6 => Mode::Manual,
            0 | 3 => Mode::ManualDataInput,
            _ => Mode::Automatic,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Manual => "manual",
            Mode::ManualDataInput => "manual_data_input",
            Mode::Automatic => "automatic",
        }
    }
}

/// Emergency stop state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Emergency {
    Triggered,
    Armed,
}

impl Emergency {
    pub fn classify(status: &RawStatus) -> Self {
        if status.emergency == 1 {
            Emergency::Triggered
        } else {
            Emergency::Armed
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Emergency::Triggered => "triggered",
            Emergency::Armed => "armed",
        }
    }
}

impl fmt::Display for Execution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Emergency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl RawStatus {
    pub fn execution(&self) -> Execution {
        Execution::classify(self)
    }

    pub fn mode(&self) -> Mode {
        Mode::classify(self)
    }

    pub fn emergency_state(&self) -> Emergency {
        Emergency::classify(self)
    }
}
