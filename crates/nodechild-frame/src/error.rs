/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The payload contains the frame delimiter and cannot be represented
    /// on the wire.
    #[error("payload contains the frame delimiter (0x0A)")]
    DelimiterInPayload,

    /// The payload (or a buffered line) exceeds the configured maximum.
    ///
    /// On the read side this is a protocol violation: the stream is
    /// desynchronized or the peer is not speaking the convention, and the
    /// channel should be closed rather than read further.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// The stream ended in the middle of a frame.
    #[error("stream ended mid-frame ({buffered} bytes without delimiter)")]
    TruncatedFrame { buffered: usize },

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream was closed cleanly at a frame boundary.
    #[error("connection closed")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, FrameError>;
