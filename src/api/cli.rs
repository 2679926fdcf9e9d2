use crate::api::report::run_projection;
use crate::api::server;
use crate::error::AppError;
use crate::finance::{AllocationMode, MarketingSupportScenario};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "PlateTrend",
    about = "Run the PlateTrend service or print burn-down projections from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print the monthly burn-down projection for a scenario
    Projection(ProjectionArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

#[derive(Args, Debug)]
pub(crate) struct ProjectionArgs {
    /// JSON assumptions document (defaults to APP_ASSUMPTIONS_PATH, then built-in defaults)
    #[arg(long)]
    pub(crate) assumptions: Option<PathBuf>,
    /// Include paid marketing and the support team (on/off)
    #[arg(long, default_value = "on")]
    pub(crate) marketing_support: MarketingSupportScenario,
    /// Project with base COGS instead of the optimized figures
    #[arg(long)]
    pub(crate) no_optimizations: bool,
    /// Override the projection horizon in months
    #[arg(long)]
    pub(crate) months: Option<u32>,
    /// Override the starting cash balance (USD)
    #[arg(long)]
    pub(crate) starting_cash: Option<f64>,
    /// How customers are split across pricing tiers
    #[arg(long, value_enum)]
    pub(crate) allocation: Option<AllocationArg>,
    /// Number of pilots planned
    #[arg(long)]
    pub(crate) pilots: Option<u32>,
    /// Cost per pilot (USD)
    #[arg(long)]
    pub(crate) cost_per_pilot: Option<f64>,
    /// Expected pilot conversion (percent)
    #[arg(long)]
    pub(crate) conversion_pct: Option<f64>,
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub(crate) format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum AllocationArg {
    Independent,
    LargestRemainder,
}

impl From<AllocationArg> for AllocationMode {
    fn from(value: AllocationArg) -> Self {
        match value {
            AllocationArg::Independent => AllocationMode::Independent,
            AllocationArg::LargestRemainder => AllocationMode::LargestRemainder,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Table,
    Json,
    Csv,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Projection(args) => run_projection(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_serve_without_a_subcommand() {
        let cli = Cli::try_parse_from(["platetrend"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn projection_flags_parse() {
        let cli = Cli::try_parse_from([
            "platetrend",
            "projection",
            "--marketing-support",
            "off",
            "--no-optimizations",
            "--allocation",
            "largest-remainder",
            "--format",
            "csv",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Projection(args)) => {
                assert_eq!(args.marketing_support, MarketingSupportScenario::Off);
                assert!(args.no_optimizations);
                assert_eq!(args.allocation, Some(AllocationArg::LargestRemainder));
                assert_eq!(args.format, OutputFormat::Csv);
            }
            other => panic!("expected projection command, got {other:?}"),
        }
    }
}
