use std::fs;
use std::time::Duration;

use nodechild_channel::NodeChannel;
use nodechild_transport::resolve_channel_stream;
use serde_json::Value;

use crate::cmd::SendArgs;
use crate::exit::{channel_error, transport_error, CliError, CliResult, FAILURE, SUCCESS, USAGE};
use crate::output::{print_message, OutputFormat};

pub fn run(args: SendArgs, format: OutputFormat) -> CliResult<i32> {
    let wait_timeout = parse_duration(&args.wait_timeout)?;
    let message = resolve_payload(&args)?;

    let stream =
        resolve_channel_stream().map_err(|err| transport_error("channel setup failed", err))?;
    if args.wait {
        stream
            .set_read_timeout(Some(wait_timeout))
            .map_err(|err| transport_error("channel setup failed", err))?;
    }
    let channel =
        NodeChannel::new(stream).map_err(|err| channel_error("channel setup failed", err))?;

    channel
        .send(&message)
        .map_err(|err| channel_error("send failed", err))?;

    if args.wait {
        match channel
            .recv()
            .map_err(|err| channel_error("receive failed", err))?
        {
            Some(reply) => print_message(&reply, format),
            None => {
                return Err(CliError::new(
                    FAILURE,
                    "channel closed before a reply arrived",
                ))
            }
        }
    }

    Ok(SUCCESS)
}

fn resolve_payload(args: &SendArgs) -> CliResult<Value> {
    if let Some(json) = &args.json {
        return serde_json::from_str(json)
            .map_err(|err| CliError::new(USAGE, format!("--json is not valid JSON: {err}")));
    }
    if let Some(data) = &args.data {
        return Ok(Value::String(data.clone()));
    }
    if let Some(path) = &args.file {
        let raw = fs::read(path).map_err(|err| {
            crate::exit::io_error(&format!("failed reading {}", path.display()), err)
        })?;
        return serde_json::from_slice(&raw).map_err(|err| {
            CliError::new(
                crate::exit::DATA_INVALID,
                format!("{} is not valid JSON: {err}", path.display()),
            )
        });
    }
    Err(CliError::new(
        USAGE,
        "one of --json, --data or --file is required",
    ))
}

fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        _ => Err(CliError::new(
            USAGE,
            format!("unsupported duration unit: {unit}"),
        )),
    }
}
