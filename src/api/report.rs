use crate::api::cli::{OutputFormat, ProjectionArgs};
use crate::config::AppConfig;
use crate::error::AppError;
use crate::finance::{
    AssumptionConfig, MonthlySnapshot, PilotProgram, Projection, ProjectionRequest,
    ScenarioToggles, Tier,
};
use serde::Serialize;
use std::io::{self, Write};

pub(crate) fn run_projection(args: ProjectionArgs) -> Result<(), AppError> {
    let format = args.format;
    let request = projection_request(args)?;
    let projection = Projection::run(&request)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Table => render_table(&projection, &mut out)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &projection)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => render_csv(projection.timeseries(), &mut out)?,
    }
    Ok(())
}

fn projection_request(args: ProjectionArgs) -> Result<ProjectionRequest, AppError> {
    let path = match args.assumptions {
        Some(path) => Some(path),
        None => AppConfig::load()?.projection.assumptions_path,
    };
    let mut assumptions = match path {
        Some(path) => AssumptionConfig::from_path(path)?,
        None => AssumptionConfig::default(),
    };

    if let Some(months) = args.months {
        assumptions.months = months;
    }
    if let Some(cash) = args.starting_cash {
        assumptions.starting_cash_usd = cash;
    }
    if let Some(allocation) = args.allocation {
        assumptions.allocation = allocation.into();
    }

    let mut pilot_program = PilotProgram::default();
    if let Some(pilots) = args.pilots {
        pilot_program.pilots_planned = pilots;
    }
    if let Some(cost) = args.cost_per_pilot {
        pilot_program.cost_per_pilot_usd = cost;
    }
    if let Some(conversion) = args.conversion_pct {
        pilot_program.expected_conversion_pct = conversion;
    }

    Ok(ProjectionRequest {
        assumptions,
        toggles: ScenarioToggles {
            marketing_support_scenario: args.marketing_support,
            optimizations: !args.no_optimizations,
        },
        pilot_program,
        ..ProjectionRequest::default()
    })
}

pub(crate) fn render_table(projection: &Projection, out: &mut impl Write) -> io::Result<()> {
    let toggles = &projection.toggles;
    writeln!(out, "PlateTrend burn-down projection")?;
    writeln!(
        out,
        "Marketing/support: {} | Optimizations: {}",
        toggles.marketing_support_scenario,
        if toggles.optimizations { "on" } else { "off" }
    )?;

    writeln!(
        out,
        "\n{:<8} {:>9} {:>8} {:>8} {:>10} {:>10} {:>10} {:>9} {:>9} {:>9} {:>10} {:>12}",
        "Month",
        "Customers",
        Tier::Starter.label(),
        Tier::Growth.label(),
        Tier::Enterprise.label(),
        "MRR",
        "Var COGS",
        "Fixed",
        "Mktg",
        "Support",
        "Net",
        "Cumulative"
    )?;
    for month in projection.timeseries() {
        writeln!(
            out,
            "{:<8} {:>9} {:>8} {:>8} {:>10} {:>10.0} {:>10.0} {:>9.0} {:>9.0} {:>9.0} {:>10.0} {:>12.0}",
            month.month,
            month.customers,
            month.tiers.starter,
            month.tiers.growth,
            month.tiers.enterprise,
            month.mrr,
            month.var_cogs,
            month.fixed,
            month.marketing,
            month.support,
            month.net_cash,
            month.cumulative_cash
        )?;
    }

    let summary = &projection.summary;
    writeln!(
        out,
        "\nCash: {:.0} -> {:.0}",
        summary.starting_cash, summary.ending_cash
    )?;
    if let Some(lowest) = &summary.lowest_cash {
        writeln!(out, "Lowest balance: {:.0} ({})", lowest.amount, lowest.month)?;
    }
    writeln!(
        out,
        "First negative month: {}",
        summary.first_negative_month.as_deref().unwrap_or("none")
    )?;
    writeln!(
        out,
        "Breakeven month: {}",
        summary.breakeven_month.as_deref().unwrap_or("not reached")
    )?;

    let pilot = &projection.pilot;
    let payback = match pilot.payback_months.months() {
        Some(months) => format!("{months} months"),
        None => "N/A".to_string(),
    };
    writeln!(
        out,
        "Pilot program: spend {:.0}, {} paying, +{:.0} MRR, payback {}",
        pilot.spend, pilot.paying, pilot.added_mrr, payback
    )?;
    Ok(())
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    month: &'a str,
    customers: u64,
    starter: u64,
    growth: u64,
    enterprise: u64,
    mrr: f64,
    var_cogs: f64,
    fixed: f64,
    marketing: f64,
    support: f64,
    net_cash: f64,
    cumulative_cash: f64,
}

impl<'a> From<&'a MonthlySnapshot> for CsvRow<'a> {
    fn from(month: &'a MonthlySnapshot) -> Self {
        Self {
            month: &month.month,
            customers: month.customers,
            starter: month.tiers.starter,
            growth: month.tiers.growth,
            enterprise: month.tiers.enterprise,
            mrr: month.mrr,
            var_cogs: month.var_cogs,
            fixed: month.fixed,
            marketing: month.marketing,
            support: month.support,
            net_cash: month.net_cash,
            cumulative_cash: month.cumulative_cash,
        }
    }
}

pub(crate) fn render_csv(series: &[MonthlySnapshot], out: impl Write) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(out);
    for month in series {
        writer.serialize(CsvRow::from(month))?;
    }
    writer.flush()?;
    Ok(())
}
