use crate::api::infra::AppState;
use crate::dashboard::{dashboard_router, DashboardDefaults};
use crate::signup::{signup_router, AdminGuard, SignupNotifier, SignupService, WaitlistRepository};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde_json::json;
use std::sync::atomic::Ordering;
use std::sync::Arc;

/// Full public surface: intake and dashboard routes plus health, readiness and metrics.
/// `/ready` and `/metrics` expect an [`AppState`] extension layer.
pub fn app_router<R, N>(
    signup: Arc<SignupService<R, N>>,
    admin: AdminGuard,
    dashboard: Arc<DashboardDefaults>,
) -> Router
where
    R: WaitlistRepository + 'static,
    N: SignupNotifier + 'static,
{
    signup_router(signup, admin)
        .merge(dashboard_router(dashboard))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
