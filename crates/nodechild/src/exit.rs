use std::fmt;
use std::io;

use nodechild_channel::ChannelError;
use nodechild_frame::FrameError;
use nodechild_transport::TransportError;

// Exit code constants aligned with rsfulmen/DDR-0002 semantics.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
#[allow(dead_code)]
pub const TRANSPORT_ERROR: i32 = 3;
pub const HEALTH_CHECK_FAILED: i32 = 30;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::ConnectionRefused | io::ErrorKind::BrokenPipe => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    match err {
        // Missing/invalid descriptor is a startup configuration problem.
        TransportError::MissingDescriptor { .. } | TransportError::InvalidDescriptor { .. } => {
            CliError::new(USAGE, format!("{context}: {err}"))
        }
        TransportError::BadDescriptor { source, .. } | TransportError::Io(source) => {
            io_error(context, source)
        }
    }
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    match err {
        FrameError::Io(source) => io_error(context, source),
        FrameError::PayloadTooLarge { .. } | FrameError::DelimiterInPayload => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        FrameError::ConnectionClosed | FrameError::TruncatedFrame { .. } => {
            CliError::new(FAILURE, format!("{context}: {err}"))
        }
    }
}

pub fn channel_error(context: &str, err: ChannelError) -> CliError {
    match err {
        ChannelError::Transport(err) => transport_error(context, err),
        ChannelError::Frame(err) => frame_error(context, err),
        ChannelError::Json(err) => CliError::new(DATA_INVALID, format!("{context}: {err}")),
        ChannelError::Closed => CliError::new(FAILURE, format!("{context}: {err}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_descriptor_maps_to_usage() {
        let err = channel_error(
            "channel setup failed",
            ChannelError::Transport(TransportError::MissingDescriptor {
                key: "NODE_CHANNEL_FD",
            }),
        );
        assert_eq!(err.code, USAGE);
        assert!(err.message.contains("NODE_CHANNEL_FD"));
    }

    #[test]
    fn timeout_io_maps_to_timeout_code() {
        let err = frame_error(
            "receive failed",
            FrameError::Io(io::Error::from(io::ErrorKind::TimedOut)),
        );
        assert_eq!(err.code, TIMEOUT);
    }

    #[test]
    fn oversized_payload_maps_to_data_invalid() {
        let err = frame_error(
            "send failed",
            FrameError::PayloadTooLarge { size: 32, max: 16 },
        );
        assert_eq!(err.code, DATA_INVALID);
    }
}
