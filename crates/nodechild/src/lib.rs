//! Run a process as a Node.js IPC child.
//!
//! When Node.js spawns a child with an IPC channel (`fork`, or `spawn`
//! with an `"ipc"` stdio entry), it passes the channel endpoint as an
//! inherited descriptor advertised via `NODE_CHANNEL_FD`. nodechild
//! resolves that descriptor and exchanges JSON messages with the parent,
//! byte-compatible with `process.send` and the `message` event.
//!
//! # Crate Structure
//!
//! - [`transport`] — Descriptor resolution and the raw channel stream
//! - [`frame`] — Newline-delimited framing matching Node's json IPC mode
//! - [`channel`] — The message-level [`channel::NodeChannel`]

/// Re-export transport types.
pub mod transport {
    pub use nodechild_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use nodechild_frame::*;
}

/// Re-export channel types.
pub mod channel {
    pub use nodechild_channel::*;
}
