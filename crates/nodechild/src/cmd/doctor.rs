use nodechild_transport::{parse_descriptor, NODE_CHANNEL_FD};
use serde::Serialize;

use crate::cmd::DoctorArgs;
use crate::exit::{CliResult, HEALTH_CHECK_FAILED, SUCCESS};
use crate::output::OutputFormat;

#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
enum CheckStatus {
    Pass,
    Fail,
    Warn,
    Info,
    Skip,
}

#[derive(Debug, Serialize)]
struct CheckResult {
    name: String,
    status: CheckStatus,
    detail: String,
}

#[derive(Debug, Serialize)]
struct DoctorOutput {
    schema_id: &'static str,
    checks: Vec<CheckResult>,
    overall: &'static str,
}

pub fn run(_args: DoctorArgs, format: OutputFormat) -> CliResult<i32> {
    let checks = vec![
        platform_check(),
        channel_fd_check(),
        descriptor_probe_check(),
        compiled_features_check(),
    ];

    let has_fail = checks.iter().any(|c| matches!(c.status, CheckStatus::Fail));
    let overall = if has_fail { "fail" } else { "pass" };

    let output = DoctorOutput {
        schema_id: "https://schemas.3leaps.dev/nodechild/cli/v1/doctor-report.schema.json",
        checks,
        overall,
    };

    print_doctor(&output, format);

    if has_fail {
        Ok(HEALTH_CHECK_FAILED)
    } else {
        Ok(SUCCESS)
    }
}

fn print_doctor(output: &DoctorOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(output).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table | OutputFormat::Pretty => {
            println!("nodechild doctor\n");
            for c in &output.checks {
                println!(
                    "  [{:>4}] {:<22} {}",
                    status_text(c.status),
                    c.name,
                    c.detail
                );
            }
            if output.overall == "pass" {
                println!("\n  Result: all checks passed");
            } else {
                println!("\n  Result: one or more checks failed");
            }
        }
        OutputFormat::Raw => {
            println!("{}", output.overall);
        }
    }
}

fn status_text(status: CheckStatus) -> &'static str {
    match status {
        CheckStatus::Pass => "PASS",
        CheckStatus::Fail => "FAIL",
        CheckStatus::Warn => "WARN",
        CheckStatus::Info => "INFO",
        CheckStatus::Skip => "SKIP",
    }
}

fn platform_check() -> CheckResult {
    #[cfg(unix)]
    {
        CheckResult {
            name: "platform".to_string(),
            status: CheckStatus::Pass,
            detail: "Unix descriptor inheritance available".to_string(),
        }
    }

    #[cfg(not(unix))]
    {
        CheckResult {
            name: "platform".to_string(),
            status: CheckStatus::Fail,
            detail: "NODE_CHANNEL_FD descriptor inheritance requires a Unix platform".to_string(),
        }
    }
}

fn channel_fd_check() -> CheckResult {
    let value = match std::env::var(NODE_CHANNEL_FD) {
        Ok(value) => value,
        Err(_) => {
            return CheckResult {
                name: "node_channel_fd".to_string(),
                status: CheckStatus::Warn,
                detail: format!("{NODE_CHANNEL_FD} not set; not running as a Node.js IPC child"),
            }
        }
    };

    match parse_descriptor(&value) {
        Ok(fd) => CheckResult {
            name: "node_channel_fd".to_string(),
            status: CheckStatus::Pass,
            detail: format!("{NODE_CHANNEL_FD}={fd}"),
        },
        Err(err) => CheckResult {
            name: "node_channel_fd".to_string(),
            status: CheckStatus::Fail,
            detail: err.to_string(),
        },
    }
}

/// Probe without adopting: adoption takes ownership and would close the
/// descriptor when dropped, breaking the channel for the real commands.
fn descriptor_probe_check() -> CheckResult {
    let fd = match std::env::var(NODE_CHANNEL_FD)
        .ok()
        .and_then(|value| parse_descriptor(&value).ok())
    {
        Some(fd) => fd,
        None => {
            return CheckResult {
                name: "descriptor_probe".to_string(),
                status: CheckStatus::Skip,
                detail: "no valid descriptor to probe".to_string(),
            }
        }
    };

    #[cfg(unix)]
    {
        // SAFETY: read-only flag query; an invalid fd yields EBADF.
        let flags = unsafe { libc::fcntl(fd, libc::F_GETFD) };
        if flags < 0 {
            CheckResult {
                name: "descriptor_probe".to_string(),
                status: CheckStatus::Fail,
                detail: format!(
                    "descriptor {fd} is not open: {}",
                    std::io::Error::last_os_error()
                ),
            }
        } else {
            CheckResult {
                name: "descriptor_probe".to_string(),
                status: CheckStatus::Pass,
                detail: format!("descriptor {fd} is open"),
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = fd;
        CheckResult {
            name: "descriptor_probe".to_string(),
            status: CheckStatus::Skip,
            detail: "descriptor probe not implemented on this platform".to_string(),
        }
    }
}

fn compiled_features_check() -> CheckResult {
    let mut features = Vec::new();
    if cfg!(feature = "cli") {
        features.push("cli");
    }

    CheckResult {
        name: "compiled_features".to_string(),
        status: CheckStatus::Info,
        detail: features.join(", "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doctor_output_has_overall_status() {
        let checks = vec![CheckResult {
            name: "x".to_string(),
            status: CheckStatus::Pass,
            detail: "ok".to_string(),
        }];
        let output = DoctorOutput {
            schema_id: "x",
            checks,
            overall: "pass",
        };
        let json = serde_json::to_string(&output).expect("doctor output should serialize");
        assert!(json.contains("\"overall\":\"pass\""));
    }
}
