//! Shared constants for the engine

/// Trailing byte that marks the end of an uploaded program
pub const PROGRAM_SENTINEL: u8 = b'%';

/// Consecutive "buffer too small" responses tolerated during one upload
pub const MAX_UPLOAD_RETRIES: u32 = 5;

/// Bytes requested per upload round trip
pub const UPLOAD_CHUNK_SIZE: usize = 1280;
