//! Shared data types for port discovery and the HTTP API.

use serde::{Serialize, Serializer};
use std::fmt::Display;

/// Outcome of a best-effort lookup performed during enrichment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Lookup {
    /// Enrichment has not run for this field yet
    #[default]
    Pending,
    /// Enrichment ran but the process gave nothing back
    Unavailable,
    Found(String),
}

impl Lookup {
    pub fn is_pending(&self) -> bool {
        matches!(self, Lookup::Pending)
    }

    pub fn as_deref(&self) -> Option<&str> {
        match self {
            Lookup::Found(value) => Some(value),
            _ => None,
        }
    }
}

impl From<Option<String>> for Lookup {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(v) => Lookup::Found(v),
            None => Lookup::Unavailable,
        }
    }
}

/// Both pending and unavailable lookups serialize as `null`.
impl Serialize for Lookup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Lookup::Found(value) => serializer.serialize_str(value),
            _ => serializer.serialize_none(),
        }
    }
}

/// One listening socket, keyed by (pid, port).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortRecord {
    #[serde(serialize_with = "as_string")]
    pub port: u16,
    #[serde(serialize_with = "as_string")]
    pub pid: u32,
    /// Short process name as reported by the socket listing
    pub command: String,
    pub user: String,
    /// Raw `address:port` field
    pub address: String,
    pub cwd: Lookup,
    pub full_command: Lookup,
}

impl PortRecord {
    pub fn new(port: u16, pid: u32, command: &str, user: &str, address: &str) -> Self {
        Self {
            port,
            pid,
            command: command.to_string(),
            user: user.to_string(),
            address: address.to_string(),
            cwd: Lookup::Pending,
            full_command: Lookup::Pending,
        }
    }
}

/// Body of `GET /api/ports`
#[derive(Debug, Serialize)]
pub struct PortsResponse {
    pub ports: Vec<PortRecord>,
}

/// Body of a successful `POST /api/kill/:pid`
#[derive(Debug, Serialize)]
pub struct KillResponse {
    pub success: bool,
    pub message: String,
}

impl KillResponse {
    pub fn terminated(pid: u32) -> Self {
        Self {
            success: true,
            message: format!("Process {} terminated", pid),
        }
    }
}

fn as_string<T: Display, S: Serializer>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

/// Extract filename from a full path
pub fn extract_filename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_serializes_ids_as_strings() {
        let record = PortRecord::new(3000, 1234, "node", "alice", "127.0.0.1:3000");
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({
                "port": "3000",
                "pid": "1234",
                "command": "node",
                "user": "alice",
                "address": "127.0.0.1:3000",
                "cwd": null,
                "fullCommand": null,
            })
        );
    }

    #[test]
    fn test_found_lookup_serializes_as_string() {
        let mut record = PortRecord::new(80, 1, "nginx", "root", "*:80");
        record.cwd = Lookup::Found("~/site".to_string());
        record.full_command = Lookup::Unavailable;
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["cwd"], "~/site");
        assert!(value["fullCommand"].is_null());
    }

    #[test]
    fn test_lookup_from_option() {
        assert_eq!(Lookup::from(None), Lookup::Unavailable);
        assert_eq!(
            Lookup::from(Some("x".to_string())),
            Lookup::Found("x".to_string())
        );
        assert!(Lookup::default().is_pending());
        assert!(!Lookup::Unavailable.is_pending());
    }

    #[test]
    fn test_kill_response_message() {
        let value = serde_json::to_value(KillResponse::terminated(12345)).unwrap();
        assert_eq!(
            value,
            json!({"success": true, "message": "Process 12345 terminated"})
        );
    }

    #[test]
    fn test_extract_filename() {
        assert_eq!(extract_filename("/home/u/app/server.js"), "server.js");
        assert_eq!(extract_filename("server.js"), "server.js");
        assert_eq!(extract_filename("/opt/dir/"), "");
    }
}
