//! Message framing matching the Node.js child-process IPC wire format.
//!
//! Node's `"json"` serialization mode frames every message as its JSON
//! text followed by a single `\n` byte. This crate converts between that
//! continuous byte stream and discrete payloads:
//! - the delimiter terminates a frame; a zero-length payload is valid
//! - `JSON.stringify` never emits a raw newline, so the delimiter cannot
//!   legally appear inside a payload
//! - lines longer than the configured maximum are a protocol violation,
//!   rejected before any unbounded allocation
//!
//! No partial reads, no buffer management in user code.

pub mod codec;
pub mod error;
pub mod reader;
pub mod writer;

pub use codec::{decode_frame, encode_frame, FrameConfig, DEFAULT_MAX_PAYLOAD, DELIMITER};
pub use error::{FrameError, Result};
pub use reader::FrameReader;
pub use writer::FrameWriter;
