//! Readiness endpoint

use axum::{Router, extract::State, response::Response, routing::get};
use axum_helpers::{HealthCheckFuture, run_health_checks};
use database::mongodb::check_health;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(readiness_check))
        .with_state(state)
}

/// 200 once MongoDB answers a ping, 503 otherwise
async fn readiness_check(State(state): State<AppState>) -> Response {
    let checks: Vec<(&str, HealthCheckFuture)> = vec![(
        "mongodb",
        Box::pin(async {
            check_health(&state.mongo_client)
                .await
                .map_err(|e| e.to_string())
        }),
    )];

    run_health_checks(checks).await
}
