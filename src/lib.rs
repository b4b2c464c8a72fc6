//! cncsnap: change-driven state poller for CNC controllers
//!
//! This library provides the application layer around the poll engine:
//! - Configuration loading and validation
//! - Changelist sinks (JSON lines, log)
//! - The timed poll loop with Ctrl-C shutdown

pub mod config;
pub mod poller;
pub mod sink;

// Re-export commonly used types
pub use config::AppConfig;
pub use poller::PollLoop;
pub use sink::{ChangelistSink, CycleRecord, JsonLinesSink, LogSink};
