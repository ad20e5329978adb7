//! Minimal Node.js IPC child — echoes every parent message back.
//!
//! Build it, then fork it from Node:
//!   cargo build --example echo-child
//!
//!   const { fork } = require("node:child_process");
//!   const child = fork("target/debug/examples/echo-child");
//!   child.on("message", (m) => console.log("echoed:", m));
//!   child.send({ hello: "world" });

use nodechild::channel::NodeChannel;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let channel = NodeChannel::from_env()?;
    eprintln!("Connected to parent over NODE_CHANNEL_FD");

    for message in channel.messages() {
        let message = message?;
        eprintln!("Received {} bytes", message.to_string().len());
        channel.send(&message)?;
    }

    eprintln!("Parent closed the channel");
    Ok(())
}
