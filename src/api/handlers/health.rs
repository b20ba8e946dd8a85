//! Liveness and dependency probe.

use std::time::Instant;

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{ComponentCheck, ComponentStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// `GET /health`
///
/// Pings the user store and reports how long it took.
///
/// - **200 OK**: the store answered
/// - **503 Service Unavailable**: it did not; the cause is logged, not returned
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": { "database": { "status": "ok", "latency_ms": 2 } }
/// }
/// ```
pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let response = HealthResponse::from_checks(HealthChecks {
        database: check_database(&state).await,
    });

    let status = if response.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}

async fn check_database(state: &AppState) -> ComponentCheck {
    let started = Instant::now();
    let result = state.auth_service.health_check().await;
    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    match result {
        Ok(()) => ComponentCheck {
            status: ComponentStatus::Ok,
            latency_ms,
            message: None,
        },
        Err(e) => {
            tracing::warn!(error = %e, latency_ms, "health check: user store unreachable");
            ComponentCheck {
                status: ComponentStatus::Error,
                latency_ms,
                message: Some("Database unreachable"),
            }
        }
    }
}
