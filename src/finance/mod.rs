//! Scenario-driven burn-down projection.
//!
//! Assumptions are resolved against scenario toggles, projected month by
//! month, folded into a running cash balance and finally summarized into the
//! unit-economics block the dashboard renders. Everything here is pure and
//! recomputed from scratch per call.

pub mod assumptions;
pub mod burndown;
pub mod metrics;
pub mod projector;
pub mod scenario;

pub use assumptions::{
    AssumptionConfig, AssumptionInputs, AssumptionLoadError, AssumptionSet, StartMonth,
    SupportSchedule, SupportStep, Tier, TierMix, TierTable,
};
pub use burndown::{aggregate, summarize, BurndownSummary, CashPoint};
pub use metrics::{
    pilot_economics, DerivedMetrics, PaybackPeriod, PilotEconomics, PilotProgram, UnitEconomics,
};
pub use projector::{project, round_half_up, AllocationMode, MonthlySnapshot, TierCounts};
pub use scenario::{resolve, MarketingSupportScenario, ScenarioToggles};

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Assumption set rejected before any month is projected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProjectionError {
    #[error("projection horizon must cover at least one month")]
    EmptyHorizon,
    #[error("projection horizon of {months} months exceeds the {max} month limit")]
    HorizonTooLong { months: u32, max: u32 },
    #[error("{per_month} new customers per month over {months} months exceeds the supported customer count")]
    CustomerOverflow { months: u32, per_month: u64 },
    #[error("expected_conversion_pct must be within 0-100 (found {value})")]
    InvalidConversion { value: f64 },
    #[error("tier mix must be within 0-100 and sum to 100 (starter {starter}, growth {growth}, enterprise {enterprise})")]
    InvalidMix {
        starter: f64,
        growth: f64,
        enterprise: f64,
    },
    #[error("{field} must be a finite, non-negative amount (found {value})")]
    InvalidAmount { field: &'static str, value: f64 },
    #[error("support schedule needs at least one step")]
    EmptySupportSchedule,
    #[error("support step {index} does not raise the customer threshold of the step before it")]
    UnorderedSupportSteps { index: usize },
}

/// Inputs for one projection run; every part falls back to its defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionRequest {
    pub assumptions: AssumptionConfig,
    pub toggles: ScenarioToggles,
    pub pilot_program: PilotProgram,
    pub unit_economics: UnitEconomics,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
    pub toggles: ScenarioToggles,
    pub summary: BurndownSummary,
    pub derived: DerivedMetrics,
    pub pilot: PilotEconomics,
}

impl Projection {
    pub fn run(request: &ProjectionRequest) -> Result<Self, ProjectionError> {
        request.pilot_program.validate()?;
        request.unit_economics.validate()?;
        let assumptions = resolve(&request.assumptions, &request.toggles)?;
        let timeseries = aggregate(&assumptions);
        let summary = summarize(&timeseries, assumptions.starting_cash_usd);
        let pilot = pilot_economics(&request.pilot_program, &request.unit_economics);

        debug!(
            months = assumptions.months,
            ending_cash = summary.ending_cash,
            marketing_support = %request.toggles.marketing_support_scenario,
            optimizations = request.toggles.optimizations,
            "projection computed"
        );

        Ok(Self {
            toggles: request.toggles,
            summary,
            derived: DerivedMetrics::new(&request.unit_economics, timeseries),
            pilot,
        })
    }

    pub fn timeseries(&self) -> &[MonthlySnapshot] {
        &self.derived.timeseries
    }
}
