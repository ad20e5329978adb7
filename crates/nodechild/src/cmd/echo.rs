use std::sync::Arc;

use nodechild_channel::NodeChannel;

use crate::cmd::EchoArgs;
use crate::exit::{channel_error, CliResult, SUCCESS};
use crate::output::OutputFormat;

pub fn run(args: EchoArgs, _format: OutputFormat) -> CliResult<i32> {
    let channel =
        NodeChannel::from_env().map_err(|err| channel_error("channel setup failed", err))?;
    let channel = Arc::new(channel);

    super::listen::install_ctrlc_handler(Arc::clone(&channel))?;

    let mut echoed = 0usize;
    for message in channel.messages() {
        let message = message.map_err(|err| channel_error("receive failed", err))?;

        tracing::info!(size = message.to_string().len(), "echoing message");
        channel
            .send(&message)
            .map_err(|err| channel_error("echo send failed", err))?;
        echoed = echoed.saturating_add(1);

        if let Some(count) = args.count {
            if echoed >= count {
                return Ok(SUCCESS);
            }
        }
    }

    Ok(SUCCESS)
}
