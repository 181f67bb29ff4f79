use axum::extract::State;
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::services::conditions::ConditionStore;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status ("ok" once the condition catalog is loaded, "degraded" before)
    pub status: String,
    /// API version
    pub version: String,
    /// Whether the weather condition catalog has been fetched
    pub conditions_loaded: bool,
}

/// Health check endpoint.
///
/// Returns the service status and version. The catalog is loaded lazily by
/// the first page view, so "degraded" (still 200) right after start-up is
/// expected and only means forecast sentences are not available yet.
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse),
    )
)]
pub async fn health_check(State(conditions): State<ConditionStore>) -> Json<HealthResponse> {
    let loaded = conditions.is_loaded().await;

    Json(HealthResponse {
        status: if loaded {
            "ok".to_string()
        } else {
            "degraded".to_string()
        },
        version: env!("CARGO_PKG_VERSION").to_string(),
        conditions_loaded: loaded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_before_catalog_load() {
        let Json(health) = health_check(State(ConditionStore::new())).await;

        assert_eq!(health.status, "degraded");
        assert!(!health.conditions_loaded);
        assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
    }
}
