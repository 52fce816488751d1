use std::path::PathBuf;

use clap::{Parser, Subcommand};
use reqwest::Url;

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
pub struct Args {
    /// Directory holding the optimizer outputs.
    #[clap(long = "results-dir", env = "POWER_RESULTS_DIR")]
    pub results_dir: Option<PathBuf>,

    /// Base URL of the results API, consulted only when no static outputs
    /// are found.
    #[clap(long = "api-url", env = "POWER_API_URL")]
    pub api_url: Option<Url>,

    /// TOML configuration file (defaults to `powerboard.toml` if present).
    #[clap(long = "config", env = "POWERBOARD_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the discovered scenarios.
    #[clap(name = "scenarios")]
    Scenarios,

    /// Scalar results, capacity, and generation for one scenario.
    #[clap(name = "summary")]
    Summary(ScenarioArgs),

    /// Hourly dispatch, windowed or rolled up by day.
    #[clap(name = "dispatch")]
    Dispatch(DispatchArgs),

    /// The cost breakdown waterfall.
    #[clap(name = "costs")]
    Costs(CostsArgs),

    /// Assumptions the optimizer ran with.
    #[clap(name = "assumptions")]
    Assumptions(ScenarioArgs),

    /// Fetch every scenario's summary and compare them.
    #[clap(name = "compare")]
    Compare(CompareArgs),
}

#[derive(Parser)]
pub struct CompareArgs {
    /// Write the chart-ready series to a JSON file.
    #[clap(long = "export")]
    pub export: Option<PathBuf>,
}

#[derive(Parser)]
pub struct ScenarioArgs {
    /// Scenario id; defaults to the catalog's default scenario.
    #[clap(long = "scenario", env = "POWER_SCENARIO")]
    pub scenario: Option<String>,
}

#[derive(Parser)]
pub struct DispatchArgs {
    #[clap(flatten)]
    pub scenario: ScenarioArgs,

    /// Window size in hours (default one week). `8784` selects the full-year
    /// daily rollup.
    #[clap(long = "window")]
    pub window_hours: Option<usize>,

    /// Window start offset in hours.
    #[clap(long = "start", default_value_t = 0)]
    pub start_hour: usize,

    /// Write the chart-ready series to a JSON file.
    #[clap(long = "export")]
    pub export: Option<PathBuf>,
}

#[derive(Parser)]
pub struct CostsArgs {
    #[clap(flatten)]
    pub scenario: ScenarioArgs,

    /// Report costs per MWh of served energy instead of absolute USD.
    #[clap(long = "per-mwh")]
    pub per_mwh: bool,

    /// Write the chart-ready series to a JSON file.
    #[clap(long = "export")]
    pub export: Option<PathBuf>,
}
