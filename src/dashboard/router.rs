use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use super::{DashboardConfig, DashboardDefaults, DashboardEnvelope, DashboardState};
use crate::error::AppError;
use crate::finance::{MarketingSupportScenario, Projection, ProjectionRequest};

/// Per-request overrides layered over the default dashboard state.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DashboardQuery {
    pub marketing_support_scenario: Option<MarketingSupportScenario>,
    pub optimizations: Option<bool>,
    pub pilots_planned: Option<u32>,
    pub cost_per_pilot_usd: Option<f64>,
    pub expected_conversion_pct: Option<f64>,
}

impl DashboardQuery {
    pub fn apply(&self, mut state: DashboardState) -> DashboardState {
        let toggles = &mut state.settings.toggles;
        if let Some(scenario) = self.marketing_support_scenario {
            toggles.marketing_support_scenario = scenario;
        }
        if let Some(optimizations) = self.optimizations {
            toggles.optimizations = optimizations;
        }

        let pilot = &mut state.pilot_program;
        if let Some(planned) = self.pilots_planned {
            pilot.pilots_planned = planned;
        }
        if let Some(cost) = self.cost_per_pilot_usd {
            pilot.cost_per_pilot_usd = cost;
        }
        if let Some(conversion) = self.expected_conversion_pct {
            pilot.expected_conversion_pct = conversion;
        }
        state
    }
}

/// Router builder exposing the dashboard payload and the raw projection endpoint.
pub fn dashboard_router(defaults: Arc<DashboardDefaults>) -> Router {
    Router::new()
        .route(
            "/api/dashboard-config",
            get(config_handler).patch(update_handler),
        )
        .route("/api/v1/projection", post(projection_handler))
        .with_state(defaults)
}

pub(crate) async fn config_handler(
    State(defaults): State<Arc<DashboardDefaults>>,
    query: Result<Query<DashboardQuery>, QueryRejection>,
) -> Result<Json<DashboardEnvelope>, AppError> {
    let Query(query) = query?;
    let state = query.apply(DashboardState::default());
    let config = DashboardConfig::build(&defaults, state)?;
    Ok(Json(DashboardEnvelope::new(config)))
}

pub(crate) async fn update_handler(
    update: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(update) = update?;
    info!(%update, "dashboard configuration update received");
    Ok(Json(json!({
        "success": true,
        "message": "Configuration updated successfully",
        "timestamp": Utc::now(),
    })))
}

pub(crate) async fn projection_handler(
    request: Result<Json<ProjectionRequest>, JsonRejection>,
) -> Result<Json<Projection>, AppError> {
    let Json(request) = request?;
    Ok(Json(Projection::run(&request)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finance::{AssumptionConfig, PaybackPeriod};

    #[test]
    fn query_overrides_only_what_it_names() {
        let query = DashboardQuery {
            optimizations: Some(false),
            pilots_planned: Some(10),
            ..DashboardQuery::default()
        };
        let state = query.apply(DashboardState::default());

        assert!(!state.settings.toggles.optimizations);
        assert_eq!(
            state.settings.toggles.marketing_support_scenario,
            MarketingSupportScenario::On
        );
        assert_eq!(state.pilot_program.pilots_planned, 10);
        assert_eq!(state.pilot_program.cost_per_pilot_usd, 35.0);
    }

    #[tokio::test]
    async fn config_handler_reflects_pilot_overrides() {
        let query = DashboardQuery {
            expected_conversion_pct: Some(0.0),
            ..DashboardQuery::default()
        };
        let Json(envelope) = config_handler(State(Arc::default()), Ok(Query(query)))
            .await
            .expect("dashboard builds");

        assert!(envelope.success);
        assert_eq!(envelope.version, "1.0.0");
        assert_eq!(envelope.data.calc.pilot.paying, 0);
        assert_eq!(envelope.data.calc.pilot.payback_months, PaybackPeriod::Undefined);
    }

    #[tokio::test]
    async fn projection_handler_rejects_invalid_assumptions() {
        let request = ProjectionRequest {
            assumptions: AssumptionConfig {
                months: 0,
                ..AssumptionConfig::default()
            },
            ..ProjectionRequest::default()
        };

        let err = projection_handler(Ok(Json(request)))
            .await
            .expect_err("empty horizon rejected");
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
    }
}
