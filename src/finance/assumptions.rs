use super::projector::AllocationMode;
use super::ProjectionError;
use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Pricing tiers in the order they are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Starter,
    Growth,
    Enterprise,
}

impl Tier {
    pub fn ordered() -> [Tier; 3] {
        [Tier::Starter, Tier::Growth, Tier::Enterprise]
    }

    pub fn label(self) -> &'static str {
        match self {
            Tier::Starter => "Starter",
            Tier::Growth => "Growth",
            Tier::Enterprise => "Enterprise",
        }
    }
}

/// One value per pricing tier.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TierTable<T> {
    pub starter: T,
    pub growth: T,
    pub enterprise: T,
}

impl<T: Copy> TierTable<T> {
    pub fn new(starter: T, growth: T, enterprise: T) -> Self {
        Self {
            starter,
            growth,
            enterprise,
        }
    }

    pub fn get(&self, tier: Tier) -> T {
        match tier {
            Tier::Starter => self.starter,
            Tier::Growth => self.growth,
            Tier::Enterprise => self.enterprise,
        }
    }

    pub fn set(&mut self, tier: Tier, value: T) {
        match tier {
            Tier::Starter => self.starter = value,
            Tier::Growth => self.growth = value,
            Tier::Enterprise => self.enterprise = value,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Tier, T)> + '_ {
        Tier::ordered().into_iter().map(|tier| (tier, self.get(tier)))
    }
}

impl TierTable<u64> {
    pub fn total(&self) -> u64 {
        self.starter + self.growth + self.enterprise
    }
}

/// Percentage split of customers across tiers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierMix {
    pub starter_pct: f64,
    pub growth_pct: f64,
    pub enterprise_pct: f64,
}

impl TierMix {
    const SUM_TOLERANCE: f64 = 1e-6;

    pub fn share(&self, tier: Tier) -> f64 {
        match tier {
            Tier::Starter => self.starter_pct,
            Tier::Growth => self.growth_pct,
            Tier::Enterprise => self.enterprise_pct,
        }
    }

    fn validate(&self) -> Result<(), ProjectionError> {
        let shares = [self.starter_pct, self.growth_pct, self.enterprise_pct];
        let in_range = shares
            .iter()
            .all(|pct| pct.is_finite() && (0.0..=100.0).contains(pct));
        let total: f64 = shares.iter().sum();

        if !in_range || (total - 100.0).abs() > Self::SUM_TOLERANCE {
            return Err(ProjectionError::InvalidMix {
                starter: self.starter_pct,
                growth: self.growth_pct,
                enterprise: self.enterprise_pct,
            });
        }
        Ok(())
    }
}

impl Default for TierMix {
    fn default() -> Self {
        Self {
            starter_pct: 60.0,
            growth_pct: 30.0,
            enterprise_pct: 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SupportStep {
    pub until_customers: u64,
    pub monthly_usd: f64,
}

impl SupportStep {
    pub const UNBOUNDED: u64 = 999_999;
}

/// Ordered support-cost thresholds. The final step is the catch-all.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SupportSchedule {
    steps: Vec<SupportStep>,
}

impl SupportSchedule {
    pub fn new(steps: Vec<SupportStep>) -> Result<Self, ProjectionError> {
        if steps.is_empty() {
            return Err(ProjectionError::EmptySupportSchedule);
        }

        for (index, step) in steps.iter().enumerate() {
            ensure_amount("support_steps.monthly_usd", step.monthly_usd)?;
            if index > 0 && steps[index - 1].until_customers >= step.until_customers {
                return Err(ProjectionError::UnorderedSupportSteps { index });
            }
        }

        Ok(Self { steps })
    }

    /// Single zero-cost step covering every customer count.
    pub fn free() -> Self {
        Self {
            steps: vec![SupportStep {
                until_customers: SupportStep::UNBOUNDED,
                monthly_usd: 0.0,
            }],
        }
    }

    pub fn steps(&self) -> &[SupportStep] {
        &self.steps
    }

    /// First step whose threshold covers `customers`; past the last threshold the
    /// last step keeps applying.
    pub fn cost_for(&self, customers: u64) -> f64 {
        self.steps
            .iter()
            .find(|step| customers <= step.until_customers)
            .or_else(|| self.steps.last())
            .map(|step| step.monthly_usd)
            .unwrap_or_default()
    }
}

/// Calendar year-month anchor, serialized as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct StartMonth(NaiveDate);

impl StartMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }

    pub fn parse(raw: &str) -> Result<Self, String> {
        let trimmed = raw.trim();
        NaiveDate::parse_from_str(&format!("{trimmed}-01"), "%Y-%m-%d")
            .map(Self)
            .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM ({err})"))
    }

    pub fn offset(&self, months: u32) -> Option<Self> {
        self.0.checked_add_months(Months::new(months)).map(Self)
    }
}

impl Default for StartMonth {
    fn default() -> Self {
        Self(NaiveDate::from_ymd_opt(2025, 9, 1).unwrap_or(NaiveDate::MIN))
    }
}

impl fmt::Display for StartMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m"))
    }
}

impl Serialize for StartMonth {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for StartMonth {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        StartMonth::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Injected business assumptions. Every field falls back to its documented
/// default so callers can override fields independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssumptionConfig {
    pub start_month: StartMonth,
    pub months: u32,
    pub starting_cash_usd: f64,
    pub fixed_monthly_usd: f64,
    pub marketing_monthly_usd: f64,
    pub new_customers_per_month: u64,
    pub mix: TierMix,
    pub tier_prices: TierTable<f64>,
    pub base_cogs: TierTable<f64>,
    pub optimized_cogs: TierTable<f64>,
    pub support_steps: Vec<SupportStep>,
    pub allocation: AllocationMode,
}

impl Default for AssumptionConfig {
    fn default() -> Self {
        Self {
            start_month: StartMonth::default(),
            months: 24,
            starting_cash_usd: 30_000.0,
            fixed_monthly_usd: 5_000.0,
            marketing_monthly_usd: 1_800.0,
            new_customers_per_month: 6,
            mix: TierMix::default(),
            tier_prices: TierTable::new(149.0, 249.0, 499.0),
            base_cogs: TierTable::new(45.0, 90.0, 240.0),
            optimized_cogs: TierTable::new(39.0, 62.0, 210.0),
            support_steps: vec![
                SupportStep {
                    until_customers: 66,
                    monthly_usd: 0.0,
                },
                SupportStep {
                    until_customers: 120,
                    monthly_usd: 3_000.0,
                },
                SupportStep {
                    until_customers: SupportStep::UNBOUNDED,
                    monthly_usd: 6_000.0,
                },
            ],
            allocation: AllocationMode::default(),
        }
    }
}

impl AssumptionConfig {
    /// Load a (possibly partial) JSON assumption document.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, AssumptionLoadError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| AssumptionLoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| AssumptionLoadError::Parse {
            path: path.display().to_string(),
            source,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AssumptionLoadError {
    #[error("unable to read assumptions from {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("assumptions at {path} are not valid JSON: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

/// Effective, validated assumptions for one projection run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssumptionSet {
    pub start_month: StartMonth,
    pub months: u32,
    pub starting_cash_usd: f64,
    pub fixed_monthly_usd: f64,
    pub marketing_monthly_usd: f64,
    pub new_customers_per_month: u64,
    pub mix: TierMix,
    pub tier_prices: TierTable<f64>,
    pub tier_cogs: TierTable<f64>,
    pub support: SupportSchedule,
    pub allocation: AllocationMode,
}

/// Raw inputs for [`AssumptionSet::new`].
#[derive(Debug, Clone)]
pub struct AssumptionInputs {
    pub start_month: StartMonth,
    pub months: u32,
    pub starting_cash_usd: f64,
    pub fixed_monthly_usd: f64,
    pub marketing_monthly_usd: f64,
    pub new_customers_per_month: u64,
    pub mix: TierMix,
    pub tier_prices: TierTable<f64>,
    pub tier_cogs: TierTable<f64>,
    pub support: SupportSchedule,
    pub allocation: AllocationMode,
}

impl AssumptionSet {
    /// Longest horizon a single run will project (50 years).
    pub const MAX_MONTHS: u32 = 600;
    /// Largest cumulative customer count; tier arithmetic stays exact in `f64` below it.
    pub const MAX_CUSTOMERS: u64 = 1 << 53;

    pub fn new(inputs: AssumptionInputs) -> Result<Self, ProjectionError> {
        if inputs.months == 0 {
            return Err(ProjectionError::EmptyHorizon);
        }
        if inputs.months > Self::MAX_MONTHS {
            return Err(ProjectionError::HorizonTooLong {
                months: inputs.months,
                max: Self::MAX_MONTHS,
            });
        }
        let final_customers =
            u64::from(inputs.months).checked_mul(inputs.new_customers_per_month);
        if !matches!(final_customers, Some(total) if total <= Self::MAX_CUSTOMERS) {
            return Err(ProjectionError::CustomerOverflow {
                months: inputs.months,
                per_month: inputs.new_customers_per_month,
            });
        }
        if !inputs.starting_cash_usd.is_finite() {
            return Err(ProjectionError::InvalidAmount {
                field: "starting_cash_usd",
                value: inputs.starting_cash_usd,
            });
        }
        ensure_amount("fixed_monthly_usd", inputs.fixed_monthly_usd)?;
        ensure_amount("marketing_monthly_usd", inputs.marketing_monthly_usd)?;
        inputs.mix.validate()?;
        for (_, price) in inputs.tier_prices.iter() {
            ensure_amount("tier_prices", price)?;
        }
        for (_, cogs) in inputs.tier_cogs.iter() {
            ensure_amount("tier_cogs", cogs)?;
        }

        Ok(Self {
            start_month: inputs.start_month,
            months: inputs.months,
            starting_cash_usd: inputs.starting_cash_usd,
            fixed_monthly_usd: inputs.fixed_monthly_usd,
            marketing_monthly_usd: inputs.marketing_monthly_usd,
            new_customers_per_month: inputs.new_customers_per_month,
            mix: inputs.mix,
            tier_prices: inputs.tier_prices,
            tier_cogs: inputs.tier_cogs,
            support: inputs.support,
            allocation: inputs.allocation,
        })
    }
}

pub(super) fn ensure_amount(field: &'static str, value: f64) -> Result<(), ProjectionError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ProjectionError::InvalidAmount { field, value })
    }
}
