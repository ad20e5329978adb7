#![cfg(all(unix, feature = "cli"))]

use std::io;
use std::net::Shutdown;
use std::os::fd::{IntoRawFd, RawFd};
use std::os::unix::net::UnixStream;
use std::os::unix::process::CommandExt;
use std::process::{Child, Command, Stdio};

use nodechild_frame::{FrameReader, FrameWriter};

/// Spawn the CLI as if Node.js had forked it: a socketpair end is
/// inherited by the child and advertised through NODE_CHANNEL_FD.
///
/// Returns the child process and the parent's end of the channel.
fn spawn_with_channel(args: &[&str]) -> (Child, UnixStream) {
    let (parent, child_end) = UnixStream::pair().expect("socketpair should be creatable");
    let child_fd: RawFd = child_end.into_raw_fd();

    let mut cmd = Command::new(env!("CARGO_BIN_EXE_nodechild"));
    cmd.arg("--log-level")
        .arg("error")
        .args(args)
        .env("NODE_CHANNEL_FD", child_fd.to_string())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    // Rust opens descriptors close-on-exec; clear the flag in the child
    // so the channel end survives exec, the way Node's fork() passes it.
    unsafe {
        cmd.pre_exec(move || {
            if libc::fcntl(child_fd, libc::F_SETFD, 0) == -1 {
                return Err(io::Error::last_os_error());
            }
            Ok(())
        });
    }

    let child = cmd.spawn().expect("nodechild binary should start");

    // Drop the parent's copy of the child's end so EOF propagates once
    // the child exits or closes.
    // SAFETY: child_fd was detached via into_raw_fd and is owned here.
    unsafe { libc::close(child_fd) };

    (child, parent)
}

#[test]
fn listen_prints_one_message_and_ends_cleanly() {
    let (child, parent) = spawn_with_channel(&["--format", "raw", "listen", "--count", "1"]);

    let mut writer = FrameWriter::new(parent);
    writer
        .send(br#"{"type":"ping"}"#)
        .expect("parent should be able to send");

    let output = child.wait_with_output().expect("child should exit");
    assert!(
        output.status.success(),
        "listen should exit 0, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8(output.stdout).expect("stdout should be utf-8");
    let printed: serde_json::Value = serde_json::from_str(stdout.trim())
        .expect("raw output should be one JSON message");
    assert_eq!(printed, serde_json::json!({ "type": "ping" }));
}

#[test]
fn echo_sends_each_message_back() {
    let (mut child, parent) = spawn_with_channel(&["echo"]);
    let parent_clone = parent.try_clone().expect("stream should clone");

    let mut writer = FrameWriter::new(parent);
    let mut reader = FrameReader::new(parent_clone);

    writer.send(br#"{"n":1}"#).expect("send should succeed");
    let reply = reader.read_frame().expect("echo reply should arrive");
    let reply: serde_json::Value =
        serde_json::from_slice(&reply).expect("reply should be JSON");
    assert_eq!(reply, serde_json::json!({ "n": 1 }));

    // Closing the parent's write side ends the child's message stream.
    writer
        .get_ref()
        .shutdown(Shutdown::Write)
        .expect("shutdown should succeed");

    let status = child.wait().expect("child should exit");
    assert!(status.success(), "echo should exit 0 after clean close");
}

#[test]
fn send_delivers_one_message_to_the_parent() {
    let (mut child, parent) = spawn_with_channel(&["send", "--json", r#"{"type":"ready"}"#]);

    let mut reader = FrameReader::new(parent);
    let payload = reader.read_frame().expect("message should arrive");
    let message: serde_json::Value =
        serde_json::from_slice(&payload).expect("payload should be JSON");
    assert_eq!(message, serde_json::json!({ "type": "ready" }));

    let status = child.wait().expect("child should exit");
    assert!(status.success());
}

#[test]
fn missing_descriptor_is_a_usage_error() {
    let output = Command::new(env!("CARGO_BIN_EXE_nodechild"))
        .arg("--log-level")
        .arg("error")
        .arg("listen")
        .env_remove("NODE_CHANNEL_FD")
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .expect("nodechild binary should run");

    assert_eq!(output.status.code(), Some(64), "configuration error exits 64");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("NODE_CHANNEL_FD"),
        "error should name the missing variable, got: {stderr}"
    );
}

#[test]
fn doctor_passes_without_a_channel() {
    let output = Command::new(env!("CARGO_BIN_EXE_nodechild"))
        .arg("--log-level")
        .arg("error")
        .arg("--format")
        .arg("raw")
        .arg("doctor")
        .env_remove("NODE_CHANNEL_FD")
        .output()
        .expect("nodechild binary should run");

    // Absence of the variable is a warning, not a failed check.
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "pass");
}
