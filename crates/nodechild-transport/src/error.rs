/// Errors that can occur while resolving or using the channel handle.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The channel descriptor environment variable is not set.
    ///
    /// This process was not spawned by a Node.js parent with an IPC
    /// channel, or the variable was stripped from the environment.
    #[error("{key} is not set; this process has no inherited IPC channel")]
    MissingDescriptor { key: &'static str },

    /// The environment variable is present but is not a descriptor number.
    #[error("{key} is not a valid descriptor number: {value:?}")]
    InvalidDescriptor { key: &'static str, value: String },

    /// The descriptor number does not refer to an open handle.
    #[error("descriptor {fd} cannot be adopted: {source}")]
    BadDescriptor { fd: i32, source: std::io::Error },

    /// An I/O error occurred on the channel stream.
    #[error("channel I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TransportError>;
