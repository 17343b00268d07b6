//! Probe backed by the `lsof`, `ps` and `kill` command-line tools.

use crate::common::ports::parse_listening_sockets;
use crate::common::process::cwd_from_lsof;
use crate::common::types::PortRecord;
use crate::probe::{ProbeError, ProcessProbe};
use async_trait::async_trait;
use std::process::Output;
use tokio::process::Command;
use tracing::debug;

/// lsof's exit code when it found nothing to report
const LSOF_NOTHING_FOUND: i32 = 1;

pub struct CommandProbe;

impl CommandProbe {
    /// List every internet socket and keep the LISTEN rows.
    pub async fn list_with_lsof() -> Result<Vec<PortRecord>, ProbeError> {
        let output = run("lsof", &["-i", "-P", "-n"]).await?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        classify_listing(output.status.code(), &stdout, &stderr)
    }
}

#[async_trait]
impl ProcessProbe for CommandProbe {
    async fn listening_sockets(&self) -> Result<Vec<PortRecord>, ProbeError> {
        Self::list_with_lsof().await
    }

    async fn working_directory(&self, pid: u32) -> Option<String> {
        let pid = pid.to_string();
        let output = run("lsof", &["-a", "-p", pid.as_str(), "-d", "cwd"]).await.ok()?;
        if !output.status.success() {
            return None;
        }
        cwd_from_lsof(&String::from_utf8_lossy(&output.stdout))
    }

    async fn command_line(&self, pid: u32) -> Option<String> {
        let pid = pid.to_string();
        let output = run("ps", &["-ww", "-p", pid.as_str(), "-o", "args="]).await.ok()?;
        if !output.status.success() {
            return None;
        }
        let args = String::from_utf8_lossy(&output.stdout).trim().to_string();
        (!args.is_empty()).then_some(args)
    }

    async fn terminate(&self, pid: u32) -> Result<(), ProbeError> {
        let pid = pid.to_string();
        let output = run("kill", &[pid.as_str()]).await?;
        if output.status.success() {
            Ok(())
        } else {
            Err(ProbeError::Failed {
                program: "kill",
                status: output.status.to_string(),
                details: failure_details(&String::from_utf8_lossy(&output.stderr)),
            })
        }
    }
}

/// Run a tool to completion, capturing stdout and stderr.
async fn run(program: &'static str, args: &[&str]) -> Result<Output, ProbeError> {
    debug!(program, ?args, "running introspection command");
    Command::new(program)
        .args(args)
        .output()
        .await
        .map_err(|source| ProbeError::Spawn { program, source })
}

/// Decide what an lsof listing means.
///
/// Exit 0 or any LISTEN rows are results. Exit 1 with nothing but warnings
/// on stderr is lsof reporting an empty host. Everything else is a failure.
fn classify_listing(
    code: Option<i32>,
    stdout: &str,
    stderr: &str,
) -> Result<Vec<PortRecord>, ProbeError> {
    let records = parse_listening_sockets(stdout);
    if code == Some(0) || !records.is_empty() {
        return Ok(records);
    }

    let only_warnings = stderr
        .lines()
        .all(|line| line.trim().is_empty() || line.contains("WARNING"));
    if code == Some(LSOF_NOTHING_FOUND) && only_warnings {
        return Ok(Vec::new());
    }

    Err(ProbeError::Failed {
        program: "lsof",
        status: match code {
            Some(c) => format!("exit status: {}", c),
            None => "a signal".to_string(),
        },
        details: failure_details(stderr),
    })
}

fn failure_details(stderr: &str) -> String {
    let stderr = stderr.trim();
    if stderr.is_empty() {
        "no output".to_string()
    } else {
        stderr.to_string()
    }
}
