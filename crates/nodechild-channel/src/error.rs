/// Errors that can occur in channel operations.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// Transport-level error (descriptor resolution or the raw stream).
    #[error("transport error: {0}")]
    Transport(#[from] nodechild_transport::TransportError),

    /// Frame-level error.
    #[error("frame error: {0}")]
    Frame(#[from] nodechild_frame::FrameError),

    /// JSON serialization/deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The channel was used after [`close`](crate::NodeChannel::close).
    #[error("channel is closed")]
    Closed,
}

pub type Result<T> = std::result::Result<T, ChannelError>;
