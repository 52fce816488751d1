//! Chart-ready payloads for the drawing collaborator.
//!
//! The dashboard never draws anything itself: it hands named series plus a
//! layout to whatever charting frontend consumes the exported JSON, and it
//! never reads back from it.

use std::{fs::File, io::BufWriter, path::Path};

use serde::Serialize;

use crate::{
    compare::Comparison,
    dashboard::ScenarioData,
    model::{HourlyRow, Summary},
    prelude::*,
    waterfall::{UnitMode, WaterfallStep},
};

/// One named series: parallel x/y arrays plus a color key the frontend maps
/// to its own palette.
#[derive(bon::Builder, Clone, Debug, Serialize)]
pub struct Series {
    #[builder(into)]
    pub name: String,

    pub x: Vec<String>,

    pub y: Vec<f64>,

    #[builder(into)]
    pub color_key: String,
}

#[derive(bon::Builder, Clone, Debug, Serialize)]
pub struct ChartPayload {
    #[builder(into)]
    pub title: String,

    #[builder(into)]
    pub x_label: String,

    #[builder(into)]
    pub y_label: String,

    pub series: Vec<Series>,
}

impl ChartPayload {
    pub fn write_json(&self, path: &Path) -> Result {
        let file = File::create(path)
            .with_context(|| format!("failed to create `{}`", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)
            .with_context(|| format!("failed to write `{}`", path.display()))?;
        info!(path = %path.display(), "exported");
        Ok(())
    }
}

/// Dispatch view: generation stack, demand, battery behavior, unserved energy.
pub fn dispatch_chart(data: &ScenarioData, rows: &[HourlyRow]) -> ChartPayload {
    let x: Vec<String> = rows.iter().map(|row| row.timestamp.clone()).collect();
    let series = |name: &str, color_key: &str, f: fn(&HourlyRow) -> f64| {
        Series::builder()
            .name(name)
            .x(x.clone())
            .y(rows.iter().map(f).collect())
            .color_key(color_key)
            .build()
    };

    ChartPayload::builder()
        .title(format!("Dispatch: {}", data.scenario_id))
        .x_label("Time")
        .y_label("MWh")
        .series(vec![
            series("Solar", "solar", |row| row.gen_solar_mwh),
            series("Diesel", "diesel", |row| row.gen_diesel_mwh),
            series("CCGT", "ccgt", |row| row.gen_ccgt_mwh),
            series("Coal", "coal", |row| row.gen_coal_mwh),
            series("Battery discharge", "battery", |row| row.battery_discharge_mwh),
            series("Battery charge", "battery", |row| -row.battery_charge_mwh),
            series("Battery SOC", "soc", |row| row.battery_soc_mwh),
            series("Demand", "demand", |row| row.demand_mwh),
            series("Unserved", "penalty", |row| row.unserved_mwh),
            series("Solar curtailment", "curtailment", |row| row.solar_curtailment_mwh),
        ])
        .build()
}

/// Waterfall view: one series of step values, one of their running bases.
pub fn waterfall_chart(
    data: &ScenarioData,
    steps: &[WaterfallStep],
    unit_mode: UnitMode,
) -> ChartPayload {
    let x: Vec<String> = steps.iter().map(|step| step.label.clone()).collect();
    ChartPayload::builder()
        .title(format!("Cost breakdown: {}", data.scenario_id))
        .x_label("Cost step")
        .y_label(unit_mode.to_string())
        .series(vec![
            Series::builder()
                .name("Base")
                .x(x.clone())
                .y(steps.iter().map(|step| step.base).collect())
                .color_key("base")
                .build(),
            Series::builder()
                .name("Cost")
                .x(x)
                .y(steps.iter().map(|step| step.value).collect())
                .color_key("cost")
                .build(),
        ])
        .build()
}

/// Comparison view: one series per scalar, scenario labels on the x axis.
pub fn comparison_chart(comparison: &Comparison) -> ChartPayload {
    let x: Vec<String> =
        comparison.rows.iter().map(|row| row.scenario_label.clone()).collect();
    let series = |name: &str, color_key: &str, f: fn(&Summary) -> f64| {
        Series::builder()
            .name(name)
            .x(x.clone())
            .y(comparison.rows.iter().map(|row| f(&row.summary)).collect())
            .color_key(color_key)
            .build()
    };

    ChartPayload::builder()
        .title("Scenario comparison")
        .x_label("Scenario")
        .y_label("Mixed units")
        .series(vec![
            series("Non-fossil share (served)", "share", |summary| {
                summary
                    .achieved_non_fossil_share_served_primary
                    .or(summary.achieved_non_fossil_share)
                    .unwrap_or(0.0)
            }),
            series("LCOE ($/MWh served)", "lcoe", |summary| summary.lcoe_usd_per_mwh_served),
            series("Unserved energy (MWh)", "penalty", |summary| summary.unserved_energy_mwh),
        ])
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CostTable;

    #[test]
    fn test_dispatch_chart_series_are_aligned() {
        let data = ScenarioData {
            scenario_id: "nf80".to_string(),
            summary: crate::source::testing::FlakyBackend::summary("nf80"),
            hourly: vec![
                HourlyRow {
                    timestamp: "2024-01-01 00:00:00".to_string(),
                    demand_mwh: 10.0,
                    battery_charge_mwh: 2.0,
                    ..HourlyRow::default()
                },
                HourlyRow {
                    timestamp: "2024-01-01 01:00:00".to_string(),
                    demand_mwh: 11.0,
                    ..HourlyRow::default()
                },
            ],
            costs: CostTable::Coarse(Vec::new()),
            assumptions: Vec::new(),
        };
        let chart = dispatch_chart(&data, &data.hourly);
        assert!(chart.series.iter().all(|series| series.x.len() == 2 && series.y.len() == 2));

        let charge = chart.series.iter().find(|series| series.name == "Battery charge").unwrap();
        assert_eq!(charge.y[0], -2.0); // charging drawn below the axis
    }
}
