//! Raw channel handle for Node.js child-process IPC.
//!
//! A Node.js parent that spawns a child with an IPC channel passes the
//! channel endpoint as an inherited file descriptor, advertised through the
//! `NODE_CHANNEL_FD` environment variable. This crate resolves that
//! descriptor into a [`ChannelStream`], the byte-stream handle everything
//! else builds on. It never creates or dups the descriptor — it only adopts
//! the one the parent handed over.

pub mod error;

#[cfg(unix)]
pub mod resolve;
#[cfg(unix)]
pub mod stream;

pub use error::{Result, TransportError};

#[cfg(unix)]
pub use resolve::{parse_descriptor, resolve_channel_stream, NODE_CHANNEL_FD};
#[cfg(unix)]
pub use stream::ChannelStream;
