use super::assumptions::{AssumptionSet, StartMonth, Tier, TierMix, TierTable};
use serde::{Deserialize, Serialize};

pub type TierCounts = TierTable<u64>;

/// How cumulative customers are split across tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationMode {
    /// Each tier is rounded on its own; tier counts may not add up to the total.
    #[default]
    Independent,
    /// Largest-remainder apportionment; tier counts always add up to the total.
    LargestRemainder,
}

/// One month of the projection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySnapshot {
    pub month: String,
    pub customers: u64,
    pub tiers: TierCounts,
    pub mrr: f64,
    pub var_cogs: f64,
    pub fixed: f64,
    pub marketing: f64,
    pub support: f64,
    pub net_cash: f64,
    pub cumulative_cash: f64,
}

/// Rounds halves toward positive infinity.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Project a single month. `cumulative_cash` assumes this is the only month;
/// [`super::burndown::aggregate`] threads the running balance.
pub fn project(assumptions: &AssumptionSet, month_index: u32) -> MonthlySnapshot {
    let customers =
        (u64::from(month_index) + 1).saturating_mul(assumptions.new_customers_per_month);
    let tiers = allocate(customers, &assumptions.mix, assumptions.allocation);

    let mrr = weighted_sum(&tiers, &assumptions.tier_prices);
    let var_cogs = weighted_sum(&tiers, &assumptions.tier_cogs);
    let support = assumptions.support.cost_for(customers);
    let fixed = assumptions.fixed_monthly_usd;
    let marketing = assumptions.marketing_monthly_usd;
    let net_cash = mrr - var_cogs - fixed - marketing - support;

    MonthlySnapshot {
        month: month_label(assumptions.start_month, month_index),
        customers,
        tiers,
        mrr,
        var_cogs,
        fixed,
        marketing,
        support,
        net_cash,
        cumulative_cash: round_half_up(assumptions.starting_cash_usd + net_cash),
    }
}

pub fn allocate(customers: u64, mix: &TierMix, mode: AllocationMode) -> TierCounts {
    match mode {
        AllocationMode::Independent => {
            let mut counts = TierCounts::default();
            for tier in Tier::ordered() {
                let share = customers as f64 * mix.share(tier) / 100.0;
                counts.set(tier, round_half_up(share).max(0.0) as u64);
            }
            counts
        }
        AllocationMode::LargestRemainder => largest_remainder(customers, mix),
    }
}

fn largest_remainder(customers: u64, mix: &TierMix) -> TierCounts {
    let mut counts = TierCounts::default();
    let mut remainders = Vec::with_capacity(3);

    for tier in Tier::ordered() {
        let share = customers as f64 * mix.share(tier) / 100.0;
        let floor = share.floor().max(0.0);
        counts.set(tier, floor as u64);
        remainders.push((tier, share - floor));
    }

    // stable sort keeps tier order on ties
    remainders.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut leftover = customers.saturating_sub(counts.total());
    for (tier, _) in remainders.into_iter().cycle() {
        if leftover == 0 {
            break;
        }
        counts.set(tier, counts.get(tier) + 1);
        leftover -= 1;
    }

    counts
}

fn weighted_sum(counts: &TierCounts, per_customer: &TierTable<f64>) -> f64 {
    Tier::ordered()
        .into_iter()
        .map(|tier| counts.get(tier) as f64 * per_customer.get(tier))
        .sum()
}

fn month_label(start: StartMonth, month_index: u32) -> String {
    match start.offset(month_index) {
        Some(month) => month.to_string(),
        None => format!("{start}+{month_index}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finance::assumptions::AssumptionConfig;
    use crate::finance::scenario::{resolve, ScenarioToggles};

    fn default_set() -> AssumptionSet {
        resolve(&AssumptionConfig::default(), &ScenarioToggles::default()).expect("defaults")
    }

    #[test]
    fn first_month_reproduces_rounding_drift() {
        let snapshot = project(&default_set(), 0);

        assert_eq!(snapshot.month, "2025-09");
        assert_eq!(snapshot.customers, 6);
        assert_eq!(snapshot.tiers, TierTable::new(4, 2, 1));
        assert_eq!(snapshot.tiers.total(), 7);
        assert_eq!(snapshot.mrr, 1_593.0);
        assert_eq!(snapshot.var_cogs, 490.0);
        assert_eq!(snapshot.support, 0.0);
        assert_eq!(snapshot.net_cash, 1_593.0 - 490.0 - 5_000.0 - 1_800.0);
    }

    #[test]
    fn support_cost_steps_up_with_customers() {
        let set = default_set();
        // month 11 -> 72 customers, month 20 -> 126 customers
        assert_eq!(project(&set, 10).support, 0.0);
        assert_eq!(project(&set, 11).support, 3_000.0);
        assert_eq!(project(&set, 19).support, 3_000.0);
        assert_eq!(project(&set, 20).support, 6_000.0);
    }

    #[test]
    fn largest_remainder_allocation_sums_to_total() {
        let mix = TierMix::default();
        let counts = allocate(6, &mix, AllocationMode::LargestRemainder);
        assert_eq!(counts.total(), 6);
        assert_eq!(counts, TierTable::new(4, 2, 0));

        for customers in 0..200 {
            let counts = allocate(customers, &mix, AllocationMode::LargestRemainder);
            assert_eq!(counts.total(), customers, "customers={customers}");
        }
    }

    #[test]
    fn round_half_up_matches_dashboard_rounding() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(0.6), 1.0);
        assert_eq!(round_half_up(8.4), 8.0);
    }
}
