//! Dashboard configuration payload: static market fixtures plus the live
//! burn-down projection for the current scenario toggles.

pub mod fixtures;
pub mod router;

use crate::finance::{
    AssumptionConfig, DerivedMetrics, MarketingSupportScenario, PilotEconomics, PilotProgram,
    Projection, ProjectionError, ProjectionRequest, ScenarioToggles, UnitEconomics,
};
use chrono::{DateTime, Utc};
use fixtures::{
    Alerts, Analytics, Billing, Competitor, CostModel, Jobs, RankedCompetitor, Recommendations,
};
use serde::{Deserialize, Serialize};

pub use router::{dashboard_router, DashboardQuery};

pub const DASHBOARD_CONFIG_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardToggles {
    pub marketing_support_scenario: MarketingSupportScenario,
    pub founders_pricing_active: bool,
    pub pilot_program_enabled: bool,
    pub optimizations: bool,
}

impl Default for DashboardToggles {
    fn default() -> Self {
        Self {
            marketing_support_scenario: MarketingSupportScenario::On,
            founders_pricing_active: true,
            pilot_program_enabled: true,
            optimizations: true,
        }
    }
}

impl DashboardToggles {
    pub fn scenario(&self) -> ScenarioToggles {
        ScenarioToggles {
            marketing_support_scenario: self.marketing_support_scenario,
            optimizations: self.optimizations,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSettings {
    pub toggles: DashboardToggles,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardState {
    pub settings: DashboardSettings,
    pub pilot_program: PilotProgram,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardCalc {
    pub pilot: PilotEconomics,
}

/// Everything the dashboard renders in one payload.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardConfig {
    pub analytics: Analytics,
    pub competitors: Vec<Competitor>,
    pub competitors_sorted_by_qvi: Vec<RankedCompetitor>,
    pub billing: Billing,
    pub alerts: Alerts,
    pub recommendations: Recommendations,
    pub jobs: Jobs,
    pub cost: CostModel,
    pub state: DashboardState,
    pub derived: DerivedMetrics,
    pub calc: DashboardCalc,
    pub slos: Vec<&'static str>,
}

/// Projection inputs the dashboard combines with per-request state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardDefaults {
    pub assumptions: AssumptionConfig,
    pub unit_economics: UnitEconomics,
}

impl DashboardConfig {
    pub fn build(
        defaults: &DashboardDefaults,
        state: DashboardState,
    ) -> Result<Self, ProjectionError> {
        let projection = Projection::run(&ProjectionRequest {
            assumptions: defaults.assumptions.clone(),
            toggles: state.settings.toggles.scenario(),
            pilot_program: state.pilot_program,
            unit_economics: defaults.unit_economics,
        })?;

        Ok(Self {
            analytics: fixtures::analytics(),
            competitors: fixtures::competitors(),
            competitors_sorted_by_qvi: fixtures::qvi_ranking(),
            billing: fixtures::billing(),
            alerts: fixtures::alerts(),
            recommendations: fixtures::recommendations(),
            jobs: fixtures::jobs(),
            cost: fixtures::cost_model(),
            state,
            derived: projection.derived,
            calc: DashboardCalc {
                pilot: projection.pilot,
            },
            slos: fixtures::slos(),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardEnvelope {
    pub success: bool,
    pub data: DashboardConfig,
    pub timestamp: DateTime<Utc>,
    pub version: &'static str,
}

impl DashboardEnvelope {
    pub fn new(data: DashboardConfig) -> Self {
        Self {
            success: true,
            data,
            timestamp: Utc::now(),
            version: DASHBOARD_CONFIG_VERSION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finance::PaybackPeriod;

    #[test]
    fn default_dashboard_matches_mock_state() {
        let config =
            DashboardConfig::build(&DashboardDefaults::default(), DashboardState::default())
                .expect("defaults build");

        assert_eq!(config.derived.timeseries.len(), 24);
        assert_eq!(config.derived.timeseries[0].mrr, 1_593.0);
        assert_eq!(config.calc.pilot.spend, 840.0);
        assert_eq!(config.calc.pilot.payback_months, PaybackPeriod::Months(0.7));
        assert!(config.state.settings.toggles.founders_pricing_active);
    }

    #[test]
    fn scenario_toggles_flow_into_the_timeseries() {
        let mut state = DashboardState::default();
        state.settings.toggles.marketing_support_scenario = MarketingSupportScenario::Off;

        let config =
            DashboardConfig::build(&DashboardDefaults::default(), state).expect("builds");
        assert!(config
            .derived
            .timeseries
            .iter()
            .all(|month| month.marketing == 0.0 && month.support == 0.0));

        let json = serde_json::to_value(&config).expect("serializes");
        assert_eq!(
            json["state"]["settings"]["toggles"]["marketing_support_scenario"],
            "off"
        );
    }

    #[test]
    fn state_deserializes_partial_documents() {
        let state: DashboardState =
            serde_json::from_str(r#"{ "pilot_program": { "pilots_planned": 10 } }"#)
                .expect("partial state parses");
        assert_eq!(state.pilot_program.pilots_planned, 10);
        assert_eq!(state.pilot_program.cost_per_pilot_usd, 35.0);
        assert!(state.settings.toggles.optimizations);
    }
}
