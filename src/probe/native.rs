//! Probe that reads process details through sysinfo instead of spawning tools.

use crate::common::types::PortRecord;
use crate::probe::{CommandProbe, ProbeError, ProcessProbe};
use async_trait::async_trait;
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System, UpdateKind};

/// Socket discovery still goes through lsof; sysinfo has no socket table.
#[derive(Default)]
pub struct SysinfoProbe;

impl SysinfoProbe {
    pub fn new() -> Self {
        Self
    }

    /// Refresh a single process with the requested details and read from it.
    async fn with_process<T, F>(pid: u32, refresh: ProcessRefreshKind, read: F) -> Option<T>
    where
        T: Send + 'static,
        F: FnOnce(&sysinfo::Process) -> Option<T> + Send + 'static,
    {
        tokio::task::spawn_blocking(move || {
            let pid = Pid::from_u32(pid);
            let mut sys = System::new();
            sys.refresh_processes_specifics(ProcessesToUpdate::Some(&[pid]), true, refresh);
            sys.process(pid).and_then(read)
        })
        .await
        .ok()
        .flatten()
    }
}

#[async_trait]
impl ProcessProbe for SysinfoProbe {
    async fn listening_sockets(&self) -> Result<Vec<PortRecord>, ProbeError> {
        CommandProbe::list_with_lsof().await
    }

    async fn working_directory(&self, pid: u32) -> Option<String> {
        let refresh = ProcessRefreshKind::new().with_cwd(UpdateKind::Always);
        Self::with_process(pid, refresh, |p| {
            let cwd = p.cwd()?.to_string_lossy().to_string();
            (!cwd.is_empty()).then_some(cwd)
        })
        .await
    }

    async fn command_line(&self, pid: u32) -> Option<String> {
        let refresh = ProcessRefreshKind::new().with_cmd(UpdateKind::Always);
        Self::with_process(pid, refresh, |p| {
            let cmd = p
                .cmd()
                .iter()
                .map(|s| s.to_string_lossy().to_string())
                .collect::<Vec<_>>()
                .join(" ");
            (!cmd.trim().is_empty()).then_some(cmd)
        })
        .await
    }

    async fn terminate(&self, pid: u32) -> Result<(), ProbeError> {
        send_sigterm(pid)
    }
}

#[cfg(unix)]
fn send_sigterm(pid: u32) -> Result<(), ProbeError> {
    let raw = libc::pid_t::try_from(pid).map_err(|_| ProbeError::Signal {
        pid,
        source: std::io::Error::from_raw_os_error(libc::ESRCH),
    })?;

    // SAFETY: kill(2) has no memory-safety preconditions.
    let rc = unsafe { libc::kill(raw, libc::SIGTERM) };
    if rc == 0 {
        Ok(())
    } else {
        Err(ProbeError::Signal {
            pid,
            source: std::io::Error::last_os_error(),
        })
    }
}

#[cfg(not(unix))]
fn send_sigterm(pid: u32) -> Result<(), ProbeError> {
    let sys = System::new_all();
    match sys.process(Pid::from_u32(pid)) {
        Some(p) if p.kill() => Ok(()),
        _ => Err(ProbeError::Signal {
            pid,
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "process not found"),
        }),
    }
}
