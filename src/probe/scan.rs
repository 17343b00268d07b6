//! Discovery plus enrichment: the full `GET /api/ports` pipeline.

use crate::common::process::{abbreviate_home, summarize_command};
use crate::common::types::{Lookup, PortRecord};
use crate::probe::{ProbeError, ProcessProbe};
use std::path::Path;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Discover listening sockets, enrich every record, and sort by port.
pub async fn scan_ports(
    probe: &Arc<dyn ProcessProbe>,
    home: Option<&Path>,
) -> Result<Vec<PortRecord>, ProbeError> {
    let mut records = probe.listening_sockets().await?;
    debug!(count = records.len(), "discovered listening sockets");

    enrich(probe, &mut records, home).await;
    records.sort_by_key(|r| r.port);
    Ok(records)
}

/// Resolve `cwd` and `full_command` for every record concurrently.
///
/// Both lookups for one record run together, and all records run at once.
/// Returns only after every lookup has settled; a lookup that fails for any
/// reason leaves its field [`Lookup::Unavailable`].
pub async fn enrich(probe: &Arc<dyn ProcessProbe>, records: &mut [PortRecord], home: Option<&Path>) {
    let mut tasks = JoinSet::new();

    for (idx, record) in records.iter().enumerate() {
        let probe = Arc::clone(probe);
        let pid = record.pid;
        tasks.spawn(async move {
            let (cwd, args) = tokio::join!(probe.working_directory(pid), probe.command_line(pid));
            (idx, cwd, args)
        });
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((idx, cwd, args)) => {
                let record = &mut records[idx];
                record.cwd = cwd.map(|c| abbreviate_home(&c, home)).into();
                record.full_command = args.as_deref().and_then(summarize_command).into();
                debug!(
                    pid = record.pid,
                    cwd = ?record.cwd.as_deref(),
                    command = ?record.full_command.as_deref(),
                    "enriched"
                );
            }
            Err(e) => warn!("Enrichment task failed: {}", e),
        }
    }

    // Anything still pending belonged to a task that never reported back
    for record in records.iter_mut() {
        if record.cwd.is_pending() {
            record.cwd = Lookup::Unavailable;
        }
        if record.full_command.is_pending() {
            record.full_command = Lookup::Unavailable;
        }
    }
}
