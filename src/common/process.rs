//! Formatting of per-process details: working directory and command summary.

use crate::common::types::extract_filename;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static NODE_SCRIPT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"node\s+(.+?)(?:\s|$)").expect("valid node pattern"));

static PYTHON_SCRIPT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[Pp]ython.*?\s+([^\s]+\.py)").expect("valid python pattern"));

/// Number of leading tokens kept for generic commands
const SUMMARY_TOKENS: usize = 3;

/// Pull the cwd path out of `lsof -a -p <pid> -d cwd` output.
///
/// The path is the final token of the last non-empty line. When lsof can't
/// read the link it prints `... unknown /proc/<pid>/cwd (readlink: ...)`
/// instead, so anything that isn't an absolute path is discarded.
pub fn cwd_from_lsof(output: &str) -> Option<String> {
    let last = output.lines().rev().find(|line| !line.trim().is_empty())?;
    last.split_whitespace()
        .last()
        .filter(|path| path.starts_with('/'))
        .map(str::to_string)
}

/// Replace a leading home directory with `~`.
///
/// Only whole path components match, so `/home/al` is not a prefix of
/// `/home/alice`.
pub fn abbreviate_home(cwd: &str, home: Option<&Path>) -> String {
    let Some(home) = home.filter(|h| !h.as_os_str().is_empty()) else {
        return cwd.to_string();
    };

    match Path::new(cwd).strip_prefix(home) {
        Ok(rest) if rest.as_os_str().is_empty() => "~".to_string(),
        Ok(rest) => format!("~/{}", rest.display()),
        Err(_) => cwd.to_string(),
    }
}

/// Shorten a full argument list into something readable in a table.
///
/// Node and Python invocations collapse to the script filename; anything
/// else keeps its first three tokens.
pub fn summarize_command(raw: &str) -> Option<String> {
    let full = raw.trim();
    if full.is_empty() {
        return None;
    }

    if full.contains("node ") {
        if let Some(caps) = NODE_SCRIPT.captures(full) {
            let name = extract_filename(&caps[1]);
            return Some(if name.is_empty() { full } else { name }.to_string());
        }
    } else if full.contains("python") || full.contains("Python") {
        if let Some(caps) = PYTHON_SCRIPT.captures(full) {
            return Some(extract_filename(&caps[1]).to_string());
        }
    }

    let tokens: Vec<&str> = full.split_whitespace().collect();
    if tokens.len() > 1 {
        let mut summary = tokens[..tokens.len().min(SUMMARY_TOKENS)].join(" ");
        if tokens.len() > SUMMARY_TOKENS {
            summary.push_str("...");
        }
        return Some(summary);
    }

    Some(full.to_string())
}
