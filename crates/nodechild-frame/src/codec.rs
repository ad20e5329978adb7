use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};

/// Frame delimiter: `\n`, as appended by Node after each serialized
/// message.
pub const DELIMITER: u8 = b'\n';

/// Default maximum payload size: 16 MiB.
pub const DEFAULT_MAX_PAYLOAD: usize = 16 * 1024 * 1024;

/// Encode a payload into the wire format.
///
/// Wire format:
/// ```text
/// ┌────────────────────────────┬─────────────┐
/// │ Payload (serialized value) │ 0x0A (`\n`) │
/// └────────────────────────────┴─────────────┘
/// ```
///
/// The payload must not contain the delimiter; a serialized JSON value
/// never does, but arbitrary bytes are rejected up front so a bad caller
/// cannot smuggle two frames into one write.
pub fn encode_frame(payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    if payload.contains(&DELIMITER) {
        return Err(FrameError::DelimiterInPayload);
    }
    dst.reserve(payload.len() + 1);
    dst.put_slice(payload);
    dst.put_u8(DELIMITER);
    Ok(())
}

/// Decode one frame from a buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete frame yet.
/// On success, consumes the payload and its delimiter from the buffer.
/// A complete or still-growing line longer than `max_payload` fails with
/// [`FrameError::PayloadTooLarge`] before any further buffering.
pub fn decode_frame(src: &mut BytesMut, max_payload: usize) -> Result<Option<Bytes>> {
    match src.iter().position(|&b| b == DELIMITER) {
        Some(idx) => {
            if idx > max_payload {
                return Err(FrameError::PayloadTooLarge {
                    size: idx,
                    max: max_payload,
                });
            }
            let payload = src.split_to(idx).freeze();
            src.advance(1); // delimiter
            Ok(Some(payload))
        }
        None => {
            if src.len() > max_payload {
                return Err(FrameError::PayloadTooLarge {
                    size: src.len(),
                    max: max_payload,
                });
            }
            Ok(None) // Need more data
        }
    }
}

/// Configuration for the frame codec.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Maximum payload size in bytes. Default: 16 MiB.
    pub max_payload_size: usize,
    /// Read timeout for blocking operations.
    pub read_timeout: Option<std::time::Duration>,
    /// Write timeout for blocking operations.
    pub write_timeout: Option<std::time::Duration>,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_payload_size: DEFAULT_MAX_PAYLOAD,
            read_timeout: None,
            write_timeout: None,
        }
    }
}
