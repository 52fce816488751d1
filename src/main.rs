#![doc = include_str!("../README.md")]

mod aggregate;
mod cli;
mod compare;
mod config;
mod dashboard;
mod fmt;
mod model;
mod prelude;
mod render;
mod source;
mod state;
mod tables;
mod waterfall;

use std::path::PathBuf;

use clap::{Parser, crate_version};
use reqwest::Url;

use crate::{
    cli::{Args, Command},
    config::Config,
    dashboard::Dashboard,
    prelude::*,
    waterfall::UnitMode,
};

const DEFAULT_WINDOW_HOURS: usize = 168;
const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().init();
    info!(version = crate_version!(), "starting…");

    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;

    let results_dir = args
        .results_dir
        .or(config.results_dir)
        .unwrap_or_else(|| PathBuf::from("outputs"));
    let api_url = match (args.api_url, &config.api_url) {
        (Some(url), _) => url,
        (None, Some(url)) => {
            Url::parse(url).with_context(|| format!("bad API URL in the config: `{url}`"))?
        }
        (None, None) => Url::parse(DEFAULT_API_URL)?,
    };

    let (catalog, backend) = source::resolve(&results_dir, &api_url).await?;
    let mut dashboard = Dashboard::new(catalog, backend);

    match args.command {
        Command::Scenarios => {
            println!("{}", tables::build_catalog_table(dashboard.catalog()));
            println!("* default scenario");
        }

        Command::Summary(scenario_args) => {
            let scenario_id =
                dashboard.scenario_or_default(scenario_args.scenario.as_deref()).to_string();
            let data = dashboard.select_scenario(&scenario_id).await?;
            println!("{}", tables::build_summary_table(data));
            println!("{}", tables::build_technology_table(data));
        }

        Command::Dispatch(dispatch_args) => {
            let window_hours = dispatch_args
                .window_hours
                .or(config.window_hours)
                .unwrap_or(DEFAULT_WINDOW_HOURS);
            let scenario_id = dashboard
                .scenario_or_default(dispatch_args.scenario.scenario.as_deref())
                .to_string();
            let data = dashboard.select_scenario(&scenario_id).await?;
            let rows = aggregate::display_rows(&data.hourly, window_hours, dispatch_args.start_hour);
            println!("{}", tables::build_dispatch_table(&rows));
            if let Some(path) = dispatch_args.export {
                render::dispatch_chart(data, &rows).write_json(&path)?;
            }
        }

        Command::Costs(costs_args) => {
            let unit_mode =
                if costs_args.per_mwh { UnitMode::PerMwhServed } else { UnitMode::Total };
            let scenario_id = dashboard
                .scenario_or_default(costs_args.scenario.scenario.as_deref())
                .to_string();
            let data = dashboard.select_scenario(&scenario_id).await?;
            let steps = waterfall::build(&data.costs, unit_mode, data.summary.served_energy_mwh);
            println!("{}", tables::build_waterfall_table(&steps, unit_mode));
            if let Some(path) = costs_args.export {
                render::waterfall_chart(data, &steps, unit_mode).write_json(&path)?;
            }
        }

        Command::Assumptions(scenario_args) => {
            let scenario_id =
                dashboard.scenario_or_default(scenario_args.scenario.as_deref()).to_string();
            let data = dashboard.select_scenario(&scenario_id).await?;
            if data.assumptions.is_empty() {
                println!("No assumptions recorded for `{}`.", data.scenario_id);
            } else {
                println!("{}", tables::build_assumptions_table(&data.assumptions));
            }
        }

        Command::Compare(compare_args) => {
            let comparison = dashboard.refresh_comparison().await?;
            println!("{}", tables::build_comparison_table(comparison));
            if comparison.failed > 0 {
                println!("{} scenario(s) failed to load and were skipped.", comparison.failed);
            }
            if let Some(path) = compare_args.export {
                render::comparison_chart(comparison).write_json(&path)?;
            }
        }
    }

    Ok(())
}
