//! Node-internal control messages.
//!
//! The Node.js parent uses the same channel for its own bookkeeping:
//! messages whose payload is an object with a `cmd` field starting with
//! `NODE_`. Node never delivers these to user `message` handlers, and
//! [`NodeChannel`](crate::NodeChannel) skips them by default.

use serde_json::Value;

/// `cmd` prefix marking a message as Node-internal.
pub const INTERNAL_PREFIX: &str = "NODE_";

/// Internal command: the parent is transferring a handle.
pub const NODE_HANDLE: &str = "NODE_HANDLE";
/// Internal command: handle transfer acknowledged.
pub const NODE_HANDLE_ACK: &str = "NODE_HANDLE_ACK";
/// Internal command: handle transfer refused.
pub const NODE_HANDLE_NACK: &str = "NODE_HANDLE_NACK";
/// Internal command: the parent is closing its end of a transferred handle.
pub const NODE_CLOSE: &str = "NODE_CLOSE";

/// Returns the internal command name, or `None` for an application message.
pub fn internal_command(message: &Value) -> Option<&str> {
    message
        .get("cmd")
        .and_then(Value::as_str)
        .filter(|cmd| cmd.starts_with(INTERNAL_PREFIX))
}

/// Returns true if the message is Node-internal bookkeeping.
pub fn is_internal(message: &Value) -> bool {
    internal_command(message).is_some()
}
