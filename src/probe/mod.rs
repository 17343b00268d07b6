//! Host introspection backends.
//!
//! A [`ProcessProbe`] answers four questions about the host: which sockets
//! are listening, where a process is running from, how it was invoked, and
//! whether it can be terminated.

pub mod command;
pub mod native;
pub mod scan;

use crate::common::types::PortRecord;
use async_trait::async_trait;
use std::sync::Arc;

pub use command::CommandProbe;
pub use native::SysinfoProbe;

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}: {details}")]
    Failed {
        program: &'static str,
        status: String,
        details: String,
    },

    #[error("failed to signal process {pid}: {source}")]
    Signal {
        pid: u32,
        #[source]
        source: std::io::Error,
    },
}

#[async_trait]
pub trait ProcessProbe: Send + Sync {
    /// All listening sockets on the host, deduplicated by (pid, port).
    ///
    /// An empty host is `Ok(vec![])`, never an error.
    async fn listening_sockets(&self) -> Result<Vec<PortRecord>, ProbeError>;

    /// Raw working directory of `pid`, `None` when it can't be read.
    async fn working_directory(&self, pid: u32) -> Option<String>;

    /// Raw argument list of `pid` joined by spaces, `None` when it can't be read.
    async fn command_line(&self, pid: u32) -> Option<String>;

    /// Send SIGTERM to `pid`.
    async fn terminate(&self, pid: u32) -> Result<(), ProbeError>;
}

/// Which backend answers the per-process questions
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ProbeKind {
    /// lsof, ps and kill
    Command,
    /// sysinfo for process details and a direct SIGTERM
    Sysinfo,
}

/// Construct the probe selected in the config
pub fn build_probe(kind: ProbeKind) -> Arc<dyn ProcessProbe> {
    match kind {
        ProbeKind::Command => Arc::new(CommandProbe),
        ProbeKind::Sysinfo => Arc::new(SysinfoProbe::new()),
    }
}
