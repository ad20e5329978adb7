//! Message-level channel to a Node.js parent process.
//!
//! This is the "just works" layer. Resolve the inherited descriptor (or
//! hand in any [`ChannelStream`]), then exchange JSON messages with the
//! parent the same way `process.send` / the `message` event do on the
//! Node side. Framing, partial reads, and write serialization are handled
//! underneath.

pub mod channel;
pub mod control;
pub mod error;

pub use channel::{ChannelConfig, Messages, NodeChannel};
pub use control::{
    internal_command, is_internal, INTERNAL_PREFIX, NODE_CLOSE, NODE_HANDLE, NODE_HANDLE_ACK,
    NODE_HANDLE_NACK,
};
pub use error::{ChannelError, Result};

#[cfg(unix)]
pub use nodechild_transport::ChannelStream;
