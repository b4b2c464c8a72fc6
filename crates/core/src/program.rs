//! Multi-round-trip program upload.
//!
//! Controllers hand out a program in chunks. The upload is complete when a
//! chunk ends with the `%` terminator; a "buffer too small" answer means the
//! same chunk must be requested again.

use crate::constants::{MAX_UPLOAD_RETRIES, PROGRAM_SENTINEL, UPLOAD_CHUNK_SIZE};
use crate::DeviceError;
use cncsnap_types::ProgramData;
use log::trace;

/// Low-level upload session exposed by a device reader
pub trait UploadChannel {
    /// Start an upload of the selected program
    fn begin(&mut self) -> Result<(), DeviceError>;

    /// Read the next chunk into `buf`, returning the number of bytes written
    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize, DeviceError>;

    /// Finish the upload session
    fn end(&mut self) -> Result<(), DeviceError>;
}

/// Run a complete upload over `channel`.
///
/// `end` is always called once `begin` succeeded, even if reading failed.
pub fn upload_program<C: UploadChannel + ?Sized>(
    channel: &mut C,
) -> Result<ProgramData, DeviceError> {
    channel.begin()?;
    let read = read_until_sentinel(channel);
    let ended = channel.end();
    let contents = read?;
    ended?;
    Ok(ProgramData::new(contents))
}

fn read_until_sentinel<C: UploadChannel + ?Sized>(channel: &mut C) -> Result<Vec<u8>, DeviceError> {
    let mut contents = Vec::new();
    let mut buf = vec![0u8; UPLOAD_CHUNK_SIZE];
    let mut retries = 0u32;

    loop {
        match channel.read_chunk(&mut buf) {
            Ok(0) => {
                return Err(DeviceError::Malformed(
                    "upload ended before the program terminator".to_string(),
                ));
            }
            Ok(n) => {
                retries = 0;
                let chunk = &buf[..n.min(buf.len())];
                contents.extend_from_slice(chunk);
                if chunk.last() == Some(&PROGRAM_SENTINEL) {
                    trace!("Program upload complete: {} bytes", contents.len());
                    return Ok(contents);
                }
            }
            Err(DeviceError::BufferTooSmall) => {
                retries += 1;
                if retries > MAX_UPLOAD_RETRIES {
                    return Err(DeviceError::Malformed(format!(
                        "buffer too small on {} consecutive reads",
                        retries
                    )));
                }
                trace!("Upload buffer too small, retry {}", retries);
            }
            Err(e) => return Err(e),
        }
    }
}
