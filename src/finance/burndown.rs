use super::assumptions::AssumptionSet;
use super::projector::{project, round_half_up, MonthlySnapshot};
use serde::Serialize;

/// Month-by-month cash projection over the full horizon.
pub fn aggregate(assumptions: &AssumptionSet) -> Vec<MonthlySnapshot> {
    let mut running_cash = assumptions.starting_cash_usd;

    (0..assumptions.months)
        .map(|month_index| {
            let mut snapshot = project(assumptions, month_index);
            running_cash += snapshot.net_cash;
            snapshot.cumulative_cash = round_half_up(running_cash);
            snapshot
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CashPoint {
    pub month: String,
    pub amount: f64,
}

/// Runway highlights over an aggregated series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BurndownSummary {
    pub starting_cash: f64,
    pub ending_cash: f64,
    pub lowest_cash: Option<CashPoint>,
    pub first_negative_month: Option<String>,
    pub breakeven_month: Option<String>,
}

pub fn summarize(series: &[MonthlySnapshot], starting_cash: f64) -> BurndownSummary {
    let ending_cash = series
        .last()
        .map(|snapshot| snapshot.cumulative_cash)
        .unwrap_or(starting_cash);

    let lowest_cash = series
        .iter()
        .min_by(|a, b| a.cumulative_cash.total_cmp(&b.cumulative_cash))
        .map(|snapshot| CashPoint {
            month: snapshot.month.clone(),
            amount: snapshot.cumulative_cash,
        });

    let first_negative_month = series
        .iter()
        .find(|snapshot| snapshot.cumulative_cash < 0.0)
        .map(|snapshot| snapshot.month.clone());

    let breakeven_month = series
        .iter()
        .find(|snapshot| snapshot.net_cash >= 0.0)
        .map(|snapshot| snapshot.month.clone());

    BurndownSummary {
        starting_cash,
        ending_cash,
        lowest_cash,
        first_negative_month,
        breakeven_month,
    }
}
