use std::io::ErrorKind;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use nodechild_frame::{FrameConfig, FrameError, FrameReader, FrameWriter, DEFAULT_MAX_PAYLOAD};
use nodechild_transport::{resolve_channel_stream, ChannelStream, TransportError};

use crate::control;
use crate::error::{ChannelError, Result};

/// Configuration for a [`NodeChannel`].
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// Maximum payload size in bytes for either direction. Default: 16 MiB.
    pub max_payload_size: usize,
    /// Deliver Node-internal `NODE_*` control messages to `recv` instead
    /// of skipping them. Default: false, matching Node's own behavior of
    /// not surfacing them to user `message` handlers.
    pub deliver_internal: bool,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            max_payload_size: DEFAULT_MAX_PAYLOAD,
            deliver_internal: false,
        }
    }
}

/// Bidirectional message channel to the Node.js parent process.
///
/// Wraps exactly one [`ChannelStream`]. Safe for one receiver and any
/// number of senders: sends are serialized through an internal lock so
/// concurrent callers can never interleave bytes of two frames, and the
/// read path uses an independent lock so a blocked receive does not stall
/// senders.
///
/// The channel is Open until [`close`](Self::close) or a terminal
/// transport error; it is not reusable after that.
pub struct NodeChannel {
    reader: Mutex<FrameReader<ChannelStream>>,
    writer: Mutex<FrameWriter<ChannelStream>>,
    /// Extra clone of the stream, kept only to shut the socket down on
    /// close without taking either I/O lock.
    control: ChannelStream,
    closed: AtomicBool,
    deliver_internal: bool,
}

impl NodeChannel {
    /// Wrap a resolved channel stream with default configuration.
    pub fn new(stream: ChannelStream) -> Result<Self> {
        Self::with_config(stream, ChannelConfig::default())
    }

    /// Wrap a resolved channel stream with explicit configuration.
    pub fn with_config(stream: ChannelStream, config: ChannelConfig) -> Result<Self> {
        let write_half = stream.try_clone()?;
        let control = stream.try_clone()?;

        let frame_config = FrameConfig {
            max_payload_size: config.max_payload_size,
            ..FrameConfig::default()
        };

        Ok(Self {
            reader: Mutex::new(FrameReader::with_config(stream, frame_config.clone())),
            writer: Mutex::new(FrameWriter::with_config(write_half, frame_config)),
            control,
            closed: AtomicBool::new(false),
            deliver_internal: config.deliver_internal,
        })
    }

    /// Resolve the inherited `NODE_CHANNEL_FD` descriptor and wrap it.
    ///
    /// This is the entry point for a process that was spawned by a Node.js
    /// parent with an IPC channel.
    pub fn from_env() -> Result<Self> {
        let stream = resolve_channel_stream()?;
        Self::new(stream)
    }

    /// Resolve the inherited descriptor with explicit configuration.
    pub fn from_env_with_config(config: ChannelConfig) -> Result<Self> {
        let stream = resolve_channel_stream()?;
        Self::with_config(stream, config)
    }

    /// Send one message to the parent.
    ///
    /// Returns once the frame is fully written; no acknowledgment from the
    /// peer is implied. Concurrent calls are serialized internally.
    pub fn send<T: Serialize + ?Sized>(&self, message: &T) -> Result<()> {
        if self.is_closed() {
            return Err(ChannelError::Closed);
        }

        let payload = serde_json::to_vec(message)?;
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writer.send(&payload)?;
        Ok(())
    }

    /// Receive the next message from the parent (blocking).
    ///
    /// Returns `Ok(None)` when the parent closed the channel cleanly, and
    /// after a local [`close`](Self::close). Node-internal `NODE_*`
    /// messages are skipped unless
    /// [`deliver_internal`](ChannelConfig::deliver_internal) is set.
    ///
    /// A frame that is not valid JSON terminates the sequence with
    /// [`ChannelError::Json`]: a corrupt frame means the peer is not
    /// speaking the convention and later frame boundaries cannot be
    /// trusted.
    pub fn recv(&self) -> Result<Option<Value>> {
        let mut reader = self.reader.lock().unwrap_or_else(PoisonError::into_inner);
        loop {
            let payload = match reader.read_frame() {
                Ok(payload) => payload,
                Err(FrameError::ConnectionClosed) => return Ok(None),
                Err(_) if self.is_closed() => return Ok(None),
                Err(err) => return Err(err.into()),
            };

            let message: Value = serde_json::from_slice(&payload)?;

            if !self.deliver_internal {
                if let Some(cmd) = control::internal_command(&message) {
                    debug!(cmd, "skipping node-internal message");
                    continue;
                }
            }

            return Ok(Some(message));
        }
    }

    /// Iterate over incoming messages.
    ///
    /// The iterator ends after a clean close (local or remote) and is
    /// fused after the first terminal error.
    pub fn messages(&self) -> Messages<'_> {
        Messages {
            channel: self,
            done: false,
        }
    }

    /// Close the channel.
    ///
    /// The first call shuts the underlying socket down in both directions,
    /// which unblocks any pending `recv` promptly; calls after the first
    /// are a no-op returning `Ok(())`. The descriptor itself is released
    /// when the channel drops.
    pub fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        debug!("closing node channel");
        match self.control.shutdown() {
            Ok(()) => Ok(()),
            // Peer already tore the connection down; closed is closed.
            Err(TransportError::Io(err)) if err.kind() == ErrorKind::NotConnected => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    /// Whether [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for NodeChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeChannel")
            .field("closed", &self.is_closed())
            .field("deliver_internal", &self.deliver_internal)
            .finish()
    }
}

/// Lazy sequence of incoming messages, created by
/// [`NodeChannel::messages`].
pub struct Messages<'a> {
    channel: &'a NodeChannel,
    done: bool,
}

impl Iterator for Messages<'_> {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.channel.recv() {
            Ok(Some(message)) => Some(Ok(message)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}
