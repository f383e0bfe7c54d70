//! Health check endpoints for container probes.
//!
//! - `/health` - Liveness probe (restart if fails)
//! - `/ready` - Readiness probe (remove from LB if fails)

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::AppState;

/// Health status response.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    /// Overall status: "healthy" or "unhealthy"
    pub status: &'static str,
    /// Server version
    pub version: &'static str,
    /// Individual component checks (readiness only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<HealthChecks>,
}

/// Individual health checks.
#[derive(Debug, Serialize)]
pub struct HealthChecks {
    /// Board lock acquired and canvas dimensions sane
    pub board: bool,
}

/// Liveness probe - is the server running?
///
/// Returns 200 OK if the process is alive.
#[tracing::instrument(name = "liveness_probe")]
pub async fn liveness() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        checks: None,
    })
}

/// Readiness probe - is the server ready to accept traffic?
///
/// Takes the board lock and checks the canvas is present; that
/// exercises the same path every paint request depends on.
#[tracing::instrument(name = "readiness_probe", skip(state))]
pub async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<HealthStatus>) {
    let counters = state.board.status();
    let board_ok = counters.width > 0 && counters.height > 0;

    let status = HealthStatus {
        status: if board_ok { "healthy" } else { "unhealthy" },
        version: env!("CARGO_PKG_VERSION"),
        checks: Some(HealthChecks { board: board_ok }),
    };

    let code = if board_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (code, Json(status))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_status_serialization() {
        let status = HealthStatus {
            status: "healthy",
            version: "0.2.0",
            checks: Some(HealthChecks { board: true }),
        };

        let json = serde_json::to_string(&status).expect("should serialize");
        assert!(json.contains("healthy"));
        assert!(json.contains("0.2.0"));
        assert!(json.contains("board"));
    }

    #[test]
    fn test_liveness_payload_omits_checks() {
        let status = HealthStatus {
            status: "healthy",
            version: "0.2.0",
            checks: None,
        };

        let json = serde_json::to_string(&status).expect("should serialize");
        assert!(!json.contains("checks"));
    }
}
