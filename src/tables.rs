//! Terminal renderings of the core data, in the same spirit as the chart
//! payloads: the tables consume the data model, never the other way around.

use comfy_table::{Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::{
    compare::Comparison,
    dashboard::ScenarioData,
    fmt::{FormattedMwh, FormattedShare, FormattedUsd},
    model::{AssumptionRow, Catalog, HourlyRow},
    waterfall::{UnitMode, WaterfallStep},
};

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.enforce_styling();
    table
}

fn numeric(text: impl Into<String>) -> Cell {
    Cell::new(text.into()).set_alignment(CellAlignment::Right)
}

fn status_cell(status: Option<&str>) -> Cell {
    let status = status.unwrap_or("-");
    Cell::new(status).fg(if status.eq_ignore_ascii_case("optimal") {
        Color::Green
    } else {
        Color::Red
    })
}

pub fn build_catalog_table(catalog: &Catalog) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Id", "Label", "Source", "Target share", "Achieved share", "LCOE", "Status"]);
    for descriptor in &catalog.scenarios {
        let id_cell = if descriptor.id == catalog.default_scenario {
            Cell::new(format!("{} *", descriptor.id)).fg(Color::Cyan)
        } else {
            Cell::new(&descriptor.id)
        };
        table.add_row(vec![
            id_cell,
            Cell::new(descriptor.label()),
            Cell::new(descriptor.source.to_string()),
            numeric(FormattedShare(descriptor.min_non_fossil_share).to_string()),
            numeric(
                FormattedShare(
                    descriptor
                        .achieved_non_fossil_share_served_primary
                        .or(descriptor.achieved_non_fossil_share),
                )
                .to_string(),
            ),
            numeric(
                descriptor
                    .lcoe_usd_per_mwh_served
                    .map_or_else(|| "-".to_string(), |lcoe| format!("{lcoe:.2} $/MWh")),
            ),
            status_cell(descriptor.status.as_deref()),
        ]);
    }
    table
}

pub fn build_summary_table(data: &ScenarioData) -> Table {
    let summary = &data.summary;
    let mut table = new_table();
    table.set_header(vec!["Result", "Value"]);
    if let Some(name) = &summary.scenario_name {
        table.add_row(vec![Cell::new("Scenario"), Cell::new(name)]);
    }
    table.add_row(vec![Cell::new("Status"), status_cell(Some(summary.status.as_str()))]);
    table.add_row(vec![
        Cell::new("Objective cost"),
        numeric(FormattedUsd(summary.objective_usd).to_string()),
    ]);
    table.add_row(vec![
        Cell::new("LCOE"),
        numeric(format!("{:.2} $/MWh served", summary.lcoe_usd_per_mwh_served)),
    ]);
    table.add_row(vec![
        Cell::new("Total demand"),
        numeric(FormattedMwh(summary.total_demand_mwh).to_string()),
    ]);
    table.add_row(vec![
        Cell::new("Served energy"),
        numeric(FormattedMwh(summary.served_energy_mwh).to_string()),
    ]);
    table.add_row(vec![
        Cell::new("Unserved energy"),
        numeric(FormattedMwh(summary.unserved_energy_mwh).to_string())
            .fg(if summary.unserved_energy_mwh > 0.0 { Color::Red } else { Color::Green }),
    ]);
    table.add_row(vec![
        Cell::new("Non-fossil share target"),
        numeric(FormattedShare(summary.min_non_fossil_share_target).to_string()),
    ]);
    table.add_row(vec![
        Cell::new("Non-fossil share (served)"),
        numeric(FormattedShare(summary.achieved_non_fossil_share_served_primary).to_string()),
    ]);
    table.add_row(vec![
        Cell::new("Fossil share (served)"),
        numeric(FormattedShare(summary.achieved_fossil_share_served_primary).to_string()),
    ]);
    table.add_row(vec![
        Cell::new("Solar share (served)"),
        numeric(FormattedShare(summary.achieved_solar_share_served).to_string()),
    ]);
    if let Some(penalty) = summary.unserved_penalty_usd {
        table.add_row(vec![
            Cell::new("Unserved penalty"),
            numeric(FormattedUsd(penalty).to_string()),
        ]);
    }
    if let Some(voll) = summary.voll_usd_per_mwh {
        table.add_row(vec![Cell::new("Value of lost load"), numeric(format!("{voll:.0} $/MWh"))]);
    }
    if let (Some(start), Some(end)) = (&summary.timestamp_start, &summary.timestamp_end) {
        table.add_row(vec![Cell::new("Time range"), Cell::new(format!("{start} .. {end}"))]);
    }
    if let Some(hours) = summary.hours_modeled {
        table.add_row(vec![Cell::new("Hours modeled"), numeric(hours.to_string())]);
    }
    table
}

/// Capacity and annual generation, one row per technology.
pub fn build_technology_table(data: &ScenarioData) -> Table {
    let summary = &data.summary;
    let mut table = new_table();
    table.set_header(vec!["Technology", "Capacity (MW)", "Generation (MWh)"]);
    for (technology, capacity) in &summary.capacity_mw {
        table.add_row(vec![
            Cell::new(technology),
            numeric(format!("{capacity:.1}")),
            numeric(
                summary
                    .annual_generation_mwh
                    .get(technology)
                    .map_or_else(|| "-".to_string(), |generation| format!("{generation:.0}")),
            ),
        ]);
    }
    table
}

pub fn build_dispatch_table(rows: &[HourlyRow]) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        "Time", "Demand", "Solar", "Diesel", "CCGT", "Coal", "Charge", "Discharge", "SOC",
        "Unserved",
    ]);
    for row in rows {
        table.add_row(vec![
            Cell::new(&row.timestamp),
            numeric(format!("{:.1}", row.demand_mwh)),
            numeric(format!("{:.1}", row.gen_solar_mwh)),
            numeric(format!("{:.1}", row.gen_diesel_mwh)),
            numeric(format!("{:.1}", row.gen_ccgt_mwh)),
            numeric(format!("{:.1}", row.gen_coal_mwh)),
            numeric(format!("{:.1}", row.battery_charge_mwh)),
            numeric(format!("{:.1}", row.battery_discharge_mwh)),
            numeric(format!("{:.1}", row.battery_soc_mwh)),
            numeric(format!("{:.1}", row.unserved_mwh))
                .fg(if row.unserved_mwh > 0.0 { Color::Red } else { Color::Reset }),
        ]);
    }
    table
}

pub fn build_waterfall_table(steps: &[WaterfallStep], unit_mode: UnitMode) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        "Step".to_string(),
        format!("Value ({unit_mode})"),
        "Running base".to_string(),
    ]);
    for step in steps {
        let value_cell = match unit_mode {
            UnitMode::Total => numeric(FormattedUsd(step.value).to_string()),
            UnitMode::PerMwhServed => numeric(format!("{:.2}", step.value)),
        };
        table.add_row(vec![
            Cell::new(&step.label),
            value_cell,
            match unit_mode {
                UnitMode::Total => numeric(FormattedUsd(step.base).to_string()),
                UnitMode::PerMwhServed => numeric(format!("{:.2}", step.base)),
            },
        ]);
    }
    table
}

pub fn build_assumptions_table(rows: &[AssumptionRow]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Assumption", "Value", "Unit"]);
    for row in rows {
        table.add_row(vec![
            Cell::new(&row.assumption),
            numeric(row.value.to_string()),
            Cell::new(row.unit.as_deref().unwrap_or("")),
        ]);
    }
    table
}

/// Comparison mode, sorted by achieved non-fossil share.
pub fn build_comparison_table(comparison: &Comparison) -> Table {
    use ordered_float::OrderedFloat;

    let mut rows: Vec<_> = comparison.rows.iter().collect();
    rows.sort_by_key(|row| {
        OrderedFloat(
            row.summary
                .achieved_non_fossil_share_served_primary
                .or(row.summary.achieved_non_fossil_share)
                .unwrap_or(f64::NEG_INFINITY),
        )
    });

    let mut table = new_table();
    table.set_header(vec![
        "Scenario",
        "Status",
        "Non-fossil share",
        "LCOE ($/MWh)",
        "Objective",
        "Unserved",
    ]);
    for row in rows {
        let summary = &row.summary;
        table.add_row(vec![
            Cell::new(&row.scenario_label),
            status_cell(Some(summary.status.as_str())),
            numeric(
                FormattedShare(
                    summary
                        .achieved_non_fossil_share_served_primary
                        .or(summary.achieved_non_fossil_share),
                )
                .to_string(),
            ),
            numeric(format!("{:.2}", summary.lcoe_usd_per_mwh_served)),
            numeric(FormattedUsd(summary.objective_usd).to_string()),
            numeric(FormattedMwh(summary.unserved_energy_mwh).to_string()),
        ]);
    }
    table
}
