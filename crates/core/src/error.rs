//! Error types for device access and poll cycles.

/// Failure of a single device round trip, as reported by a device reader
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeviceError {
    /// The controller did not answer in time
    #[error("device request timed out")]
    Timeout,

    /// The controller answered with a non-success return code
    #[error("device returned error code {code}")]
    BadResponse { code: i16 },

    /// The response did not fit the supplied buffer; the request may be retried
    #[error("response buffer too small")]
    BufferTooSmall,

    /// The response had an unexpected shape
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The connection handle is no longer usable
    #[error("device session lost: {0}")]
    SessionLost(String),
}

impl DeviceError {
    /// Returns `true` if the session must be re-established
    pub fn is_session_fatal(&self) -> bool {
        matches!(self, DeviceError::SessionLost(_))
    }

    /// Returns `true` for malformed or unexpected response shapes
    pub fn is_protocol(&self) -> bool {
        matches!(self, DeviceError::BufferTooSmall | DeviceError::Malformed(_))
    }
}

/// Failure of one collector, classified by how the cycle should react.
///
/// `key` names the field that failed, or the collector id when a single
/// device read feeds several fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollectError {
    /// One field could not be read; the cycle continues without it
    #[error("failed to read {key}: {source}")]
    FieldRead { key: String, source: DeviceError },

    /// Unexpected response shape; treated like a field read failure unless it recurs
    #[error("protocol error reading {key}: {source}")]
    Protocol { key: String, source: DeviceError },

    /// The session is unusable; the cycle is abandoned
    #[error("session failure reading {key}: {source}")]
    Session { key: String, source: DeviceError },
}

impl CollectError {
    /// Classify a device error raised while reading `key`
    pub fn from_device(key: impl Into<String>, source: DeviceError) -> Self {
        let key = key.into();
        if source.is_session_fatal() {
            CollectError::Session { key, source }
        } else if source.is_protocol() {
            CollectError::Protocol { key, source }
        } else {
            CollectError::FieldRead { key, source }
        }
    }

    pub fn key(&self) -> &str {
        match self {
            CollectError::FieldRead { key, .. }
            | CollectError::Protocol { key, .. }
            | CollectError::Session { key, .. } => key,
        }
    }

    pub fn device_error(&self) -> &DeviceError {
        match self {
            CollectError::FieldRead { source, .. }
            | CollectError::Protocol { source, .. }
            | CollectError::Session { source, .. } => source,
        }
    }

    pub fn is_session(&self) -> bool {
        matches!(self, CollectError::Session { .. })
    }

    pub fn is_protocol(&self) -> bool {
        matches!(self, CollectError::Protocol { .. })
    }

    /// Promote to a session failure, keeping key and cause
    pub fn escalate(self) -> Self {
        match self {
            CollectError::FieldRead { key, source }
            | CollectError::Protocol { key, source }
            | CollectError::Session { key, source } => CollectError::Session { key, source },
        }
    }
}

/// A poll cycle that did not complete
#[derive(Debug, thiserror::Error)]
pub enum PollError {
    /// Shutdown was requested at a collector boundary
    #[error("cycle {cycle} cancelled before collector '{collector}'")]
    Cancelled { cycle: u64, collector: String },

    /// The device session failed; the caller must reconnect
    #[error("session failure in cycle {cycle}: {source}")]
    Session { cycle: u64, source: CollectError },

    /// A completed cycle's changelist could not be delivered
    #[error("failed to publish cycle {cycle}: {detail}")]
    Sink { cycle: u64, detail: String },
}

impl PollError {
    pub fn is_session(&self) -> bool {
        matches!(self, PollError::Session { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, PollError::Cancelled { .. })
    }
}
