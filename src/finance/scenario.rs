use super::assumptions::{AssumptionConfig, AssumptionInputs, AssumptionSet, SupportSchedule};
use super::ProjectionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Whether paid marketing and the tiered support team are part of the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketingSupportScenario {
    #[default]
    On,
    Off,
}

impl MarketingSupportScenario {
    pub fn is_on(self) -> bool {
        matches!(self, MarketingSupportScenario::On)
    }
}

impl fmt::Display for MarketingSupportScenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketingSupportScenario::On => f.write_str("on"),
            MarketingSupportScenario::Off => f.write_str("off"),
        }
    }
}

impl FromStr for MarketingSupportScenario {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "on" => Ok(Self::On),
            "off" => Ok(Self::Off),
            other => Err(format!("expected 'on' or 'off', found '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioToggles {
    pub marketing_support_scenario: MarketingSupportScenario,
    pub optimizations: bool,
}

impl Default for ScenarioToggles {
    fn default() -> Self {
        Self {
            marketing_support_scenario: MarketingSupportScenario::On,
            optimizations: true,
        }
    }
}

/// Apply scenario toggles to the injected configuration and validate the
/// resulting assumption set.
pub fn resolve(
    config: &AssumptionConfig,
    toggles: &ScenarioToggles,
) -> Result<AssumptionSet, ProjectionError> {
    let with_marketing_support = toggles.marketing_support_scenario.is_on();

    let (marketing_monthly_usd, support) = if with_marketing_support {
        (
            config.marketing_monthly_usd,
            SupportSchedule::new(config.support_steps.clone())?,
        )
    } else {
        (0.0, SupportSchedule::free())
    };

    let tier_cogs = if toggles.optimizations {
        config.optimized_cogs
    } else {
        config.base_cogs
    };

    AssumptionSet::new(AssumptionInputs {
        start_month: config.start_month,
        months: config.months,
        starting_cash_usd: config.starting_cash_usd,
        fixed_monthly_usd: config.fixed_monthly_usd,
        marketing_monthly_usd,
        new_customers_per_month: config.new_customers_per_month,
        mix: config.mix,
        tier_prices: config.tier_prices,
        tier_cogs,
        support,
        allocation: config.allocation,
    })
}
