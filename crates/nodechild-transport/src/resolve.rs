use std::os::fd::RawFd;

use tracing::info;

use crate::error::{Result, TransportError};
use crate::stream::ChannelStream;

/// Environment variable Node.js uses to advertise the IPC descriptor.
pub const NODE_CHANNEL_FD: &str = "NODE_CHANNEL_FD";

/// Parse an environment value into a channel descriptor number.
///
/// Node writes the descriptor as a bare decimal integer. Anything else —
/// empty, non-numeric, negative — is a configuration error, not an I/O
/// fault.
pub fn parse_descriptor(value: &str) -> Result<RawFd> {
    let fd: RawFd = value
        .trim()
        .parse()
        .map_err(|_| TransportError::InvalidDescriptor {
            key: NODE_CHANNEL_FD,
            value: value.to_string(),
        })?;
    if fd < 0 {
        return Err(TransportError::InvalidDescriptor {
            key: NODE_CHANNEL_FD,
            value: value.to_string(),
        });
    }
    Ok(fd)
}

/// Resolve the inherited IPC descriptor into a [`ChannelStream`].
///
/// Fails with [`TransportError::MissingDescriptor`] when the variable is
/// absent and [`TransportError::InvalidDescriptor`] when it does not hold
/// a descriptor number. No handle is opened in either case.
pub fn resolve_channel_stream() -> Result<ChannelStream> {
    let value =
        std::env::var(NODE_CHANNEL_FD).map_err(|_| TransportError::MissingDescriptor {
            key: NODE_CHANNEL_FD,
        })?;
    let fd = parse_descriptor(&value)?;
    let stream = ChannelStream::from_descriptor(fd)?;
    info!(fd, "resolved node channel descriptor");
    Ok(stream)
}
