//! Route handlers.

use crate::api::error::ApiError;
use crate::api::server::AppState;
use crate::common::types::{KillResponse, PortsResponse};
use crate::probe::scan::scan_ports;
use axum::extract::{Path, State};
use axum::Json;
use tracing::info;

/// `GET /api/ports`
pub async fn list_ports(State(state): State<AppState>) -> Result<Json<PortsResponse>, ApiError> {
    let ports = scan_ports(&state.probe, state.home_dir.as_deref())
        .await
        .map_err(ApiError::Scan)?;
    Ok(Json(PortsResponse { ports }))
}

/// `POST /api/kill/:pid`
pub async fn kill_process(
    State(state): State<AppState>,
    Path(pid): Path<String>,
) -> Result<Json<KillResponse>, ApiError> {
    let pid = parse_pid(&pid).ok_or(ApiError::InvalidPid)?;

    state.probe.terminate(pid).await.map_err(ApiError::Kill)?;
    info!(pid, "terminated process");

    Ok(Json(KillResponse::terminated(pid)))
}

/// Accept only plain decimal pids that name a real process.
///
/// `0` would signal our own process group, and anything past `i32::MAX`
/// wraps to a negative `pid_t` inside `kill`, so both are rejected.
fn parse_pid(raw: &str) -> Option<u32> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse::<i32>()
        .ok()
        .filter(|&pid| pid > 0)
        .map(|pid| pid as u32)
}
