use std::sync::Arc;

use nodechild_channel::{ChannelConfig, NodeChannel};

use crate::cmd::ListenArgs;
use crate::exit::{channel_error, CliError, CliResult, SUCCESS};
use crate::output::{print_message, OutputFormat};

pub fn run(args: ListenArgs, format: OutputFormat) -> CliResult<i32> {
    let channel = NodeChannel::from_env_with_config(ChannelConfig {
        deliver_internal: args.internal,
        ..ChannelConfig::default()
    })
    .map_err(|err| channel_error("channel setup failed", err))?;
    let channel = Arc::new(channel);

    install_ctrlc_handler(Arc::clone(&channel))?;

    let mut printed = 0usize;
    for message in channel.messages() {
        let message = message.map_err(|err| channel_error("receive failed", err))?;
        print_message(&message, format);
        printed = printed.saturating_add(1);

        if let Some(count) = args.count {
            if printed >= count {
                return Ok(SUCCESS);
            }
        }
    }

    Ok(SUCCESS)
}

/// Ctrl-C closes the channel, which unblocks the receive loop instead of
/// leaving it stuck on a silent parent.
pub(crate) fn install_ctrlc_handler(channel: Arc<NodeChannel>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        let _ = channel.close();
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}
