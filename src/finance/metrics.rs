use super::assumptions::ensure_amount;
use super::projector::{round_half_up, MonthlySnapshot};
use super::ProjectionError;
use serde::{Deserialize, Serialize, Serializer};

/// Flat per-customer economics used by the dashboard. These are configured
/// inputs, not values recomputed from the projected tier mix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitEconomics {
    pub arpu: f64,
    pub gross_margin_per_customer: f64,
}

impl UnitEconomics {
    pub fn validate(&self) -> Result<(), ProjectionError> {
        ensure_amount("arpu", self.arpu)?;
        ensure_amount("gross_margin_per_customer", self.gross_margin_per_customer)
    }
}

impl Default for UnitEconomics {
    fn default() -> Self {
        Self {
            arpu: 214.0,
            gross_margin_per_customer: 146.68,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PilotProgram {
    pub pilots_planned: u32,
    pub cost_per_pilot_usd: f64,
    pub expected_conversion_pct: f64,
}

impl PilotProgram {
    /// Cost must be a finite non-negative amount and conversion a percentage.
    pub fn validate(&self) -> Result<(), ProjectionError> {
        ensure_amount("cost_per_pilot_usd", self.cost_per_pilot_usd)?;
        let conversion = self.expected_conversion_pct;
        if !(conversion.is_finite() && (0.0..=100.0).contains(&conversion)) {
            return Err(ProjectionError::InvalidConversion { value: conversion });
        }
        let spend = f64::from(self.pilots_planned) * self.cost_per_pilot_usd;
        ensure_amount("pilot_spend", spend)
    }
}

impl Default for PilotProgram {
    fn default() -> Self {
        Self {
            pilots_planned: 24,
            cost_per_pilot_usd: 35.0,
            expected_conversion_pct: 35.0,
        }
    }
}

/// Months of gross margin needed to recover pilot spend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaybackPeriod {
    Months(f64),
    /// No converting customers (or no margin) to recover the spend from.
    Undefined,
}

impl PaybackPeriod {
    pub const UNDEFINED_LABEL: &'static str = "N/A";

    pub fn months(self) -> Option<f64> {
        match self {
            PaybackPeriod::Months(months) => Some(months),
            PaybackPeriod::Undefined => None,
        }
    }
}

impl Serialize for PaybackPeriod {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            PaybackPeriod::Months(months) if months.is_finite() => {
                serializer.serialize_f64(*months)
            }
            _ => serializer.serialize_str(Self::UNDEFINED_LABEL),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PilotEconomics {
    pub spend: f64,
    pub paying: u64,
    pub added_mrr: f64,
    pub payback_months: PaybackPeriod,
}

pub fn pilot_economics(pilot: &PilotProgram, unit: &UnitEconomics) -> PilotEconomics {
    let spend = f64::from(pilot.pilots_planned) * pilot.cost_per_pilot_usd;
    let paying = round_half_up(
        f64::from(pilot.pilots_planned) * pilot.expected_conversion_pct / 100.0,
    )
    .max(0.0) as u64;
    let added_mrr = round_half_up(paying as f64 * unit.arpu);

    let recovered_per_month = paying as f64 * unit.gross_margin_per_customer;
    let payback_months = if paying == 0
        || !(recovered_per_month.is_finite() && recovered_per_month > 0.0)
    {
        PaybackPeriod::Undefined
    } else {
        let months = round_half_up(spend / recovered_per_month * 10.0) / 10.0;
        if months.is_finite() {
            PaybackPeriod::Months(months)
        } else {
            PaybackPeriod::Undefined
        }
    };

    PilotEconomics {
        spend,
        paying,
        added_mrr,
        payback_months,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedMetrics {
    pub arpu: f64,
    pub gm_dollars_per_customer: f64,
    pub timeseries: Vec<MonthlySnapshot>,
}

impl DerivedMetrics {
    pub fn new(unit: &UnitEconomics, timeseries: Vec<MonthlySnapshot>) -> Self {
        Self {
            arpu: unit.arpu,
            gm_dollars_per_customer: unit.gross_margin_per_customer,
            timeseries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pilot_program_pays_back_in_under_a_month() {
        let economics = pilot_economics(&PilotProgram::default(), &UnitEconomics::default());

        assert_eq!(economics.spend, 840.0);
        assert_eq!(economics.paying, 8);
        assert_eq!(economics.added_mrr, 1_712.0);
        assert_eq!(economics.payback_months, PaybackPeriod::Months(0.7));
    }

    #[test]
    fn zero_conversions_leave_payback_undefined() {
        let pilot = PilotProgram {
            expected_conversion_pct: 0.0,
            ..PilotProgram::default()
        };
        let economics = pilot_economics(&pilot, &UnitEconomics::default());

        assert_eq!(economics.paying, 0);
        assert_eq!(economics.added_mrr, 0.0);
        assert_eq!(economics.payback_months, PaybackPeriod::Undefined);

        let json = serde_json::to_value(economics).expect("serializes");
        assert_eq!(json["payback_months"], "N/A");
    }

    #[test]
    fn zero_margin_leaves_payback_undefined() {
        let unit = UnitEconomics {
            gross_margin_per_customer: 0.0,
            ..UnitEconomics::default()
        };
        let economics = pilot_economics(&PilotProgram::default(), &unit);
        assert_eq!(economics.payback_months.months(), None);
    }

    #[test]
    fn pilot_validation_rejects_negative_and_unbounded_inputs() {
        assert!(PilotProgram::default().validate().is_ok());

        let negative_cost = PilotProgram {
            cost_per_pilot_usd: -35.0,
            ..PilotProgram::default()
        };
        assert!(matches!(
            negative_cost.validate(),
            Err(ProjectionError::InvalidAmount {
                field: "cost_per_pilot_usd",
                ..
            })
        ));

        let overflowing_spend = PilotProgram {
            cost_per_pilot_usd: 1e308,
            ..PilotProgram::default()
        };
        assert!(matches!(
            overflowing_spend.validate(),
            Err(ProjectionError::InvalidAmount {
                field: "pilot_spend",
                ..
            })
        ));

        let over_converted = PilotProgram {
            expected_conversion_pct: 250.0,
            ..PilotProgram::default()
        };
        assert_eq!(
            over_converted.validate(),
            Err(ProjectionError::InvalidConversion { value: 250.0 })
        );
    }

    #[test]
    fn unit_economics_must_be_non_negative() {
        let unit = UnitEconomics {
            arpu: f64::NAN,
            ..UnitEconomics::default()
        };
        assert!(matches!(
            unit.validate(),
            Err(ProjectionError::InvalidAmount { field: "arpu", .. })
        ));
    }

    #[test]
    fn payback_serializes_as_number() {
        let json = serde_json::to_value(PaybackPeriod::Months(2.5)).expect("serializes");
        assert_eq!(json, serde_json::json!(2.5));
    }
}
