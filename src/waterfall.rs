//! Reconstructs the ordered cost waterfall from flat cost rows.

use serde::Serialize;

use crate::model::{CoarseCostRow, CostBucket, CostComponent, CostTable, DetailedCostRow, Technology};

/// Steps whose summed magnitude stays under half a dollar are dropped from
/// the detailed waterfall; they would render as invisible clutter.
pub const MIN_STEP_USD: f64 = 0.5;

#[derive(Copy, Clone, Debug, Eq, PartialEq, derive_more::Display)]
pub enum UnitMode {
    /// Absolute USD.
    #[display("USD")]
    Total,

    /// USD per MWh of served energy.
    #[display("USD/MWh served")]
    PerMwhServed,
}

/// One bar of the waterfall: `base` is the running total of all prior steps,
/// so the chart collaborator can stack bars without recomputing offsets.
#[derive(Clone, Debug, Serialize)]
pub struct WaterfallStep {
    pub label: String,
    pub value: f64,
    pub base: f64,
    pub color_key: &'static str,
}

/// Build the ordered breakdown plus a final synthetic "Total" step.
///
/// In [`UnitMode::PerMwhServed`] every value and every base is divided by the
/// served energy; the scaling must stay uniform or the stacked bars misalign.
/// Zero or negative served energy falls back to absolute USD.
pub fn build(costs: &CostTable, unit_mode: UnitMode, served_energy_mwh: f64) -> Vec<WaterfallStep> {
    let scale = match unit_mode {
        UnitMode::PerMwhServed if served_energy_mwh > 0.0 => served_energy_mwh.recip(),
        _ => 1.0,
    };
    match costs {
        CostTable::Coarse(rows) => coarse_steps(rows, scale),
        CostTable::Detailed(rows) => detailed_steps(rows, scale),
    }
}

/// Only three categories and one group, so the coarse schema renders as a
/// simple stacked total without running offsets.
fn coarse_steps(rows: &[CoarseCostRow], scale: f64) -> Vec<WaterfallStep> {
    let mut steps = Vec::with_capacity(CostBucket::ORDER.len() + 1);
    let mut total_usd = 0.0;
    for bucket in CostBucket::ORDER {
        let sum_usd: f64 =
            rows.iter().filter(|row| row.bucket == bucket).map(|row| row.cost_usd).sum();
        steps.push(WaterfallStep {
            label: bucket.to_string(),
            value: sum_usd * scale,
            base: 0.0,
            color_key: bucket.color_key(),
        });
        total_usd += sum_usd;
    }
    steps.push(total_step(total_usd, scale));
    steps
}

fn detailed_steps(rows: &[DetailedCostRow], scale: f64) -> Vec<WaterfallStep> {
    let mut steps = Vec::new();
    let mut running_usd = 0.0;

    for technology in Technology::DISPLAY_ORDER {
        for component in CostComponent::WATERFALL_ORDER {
            let sum_usd: f64 = rows
                .iter()
                .filter(|row| row.technology == technology && row.component == component)
                .map(|row| row.cost_usd)
                .sum();
            if sum_usd.abs() < MIN_STEP_USD {
                continue;
            }
            steps.push(WaterfallStep {
                label: format!("{technology} {component}"),
                value: sum_usd * scale,
                base: running_usd * scale,
                color_key: technology.color_key(),
            });
            running_usd += sum_usd;
        }
    }

    let penalty_usd: f64 = rows
        .iter()
        .filter(|row| row.component == CostComponent::UnservedPenalty)
        .map(|row| row.cost_usd)
        .sum();
    if penalty_usd.abs() >= MIN_STEP_USD {
        steps.push(WaterfallStep {
            label: "Unserved energy penalty".to_string(),
            value: penalty_usd * scale,
            base: running_usd * scale,
            color_key: "penalty",
        });
        running_usd += penalty_usd;
    }

    steps.push(total_step(running_usd, scale));
    steps
}

fn total_step(total_usd: f64, scale: f64) -> WaterfallStep {
    WaterfallStep {
        label: "Total".to_string(),
        value: total_usd * scale,
        base: 0.0,
        color_key: "total",
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn detailed_row(technology: Technology, component: CostComponent, cost_usd: f64) -> DetailedCostRow {
        DetailedCostRow { technology, component, cost_usd }
    }

    fn sample_table() -> CostTable {
        CostTable::Detailed(vec![
            detailed_row(Technology::Solar, CostComponent::CapexAnnualized, 60_000.0),
            detailed_row(Technology::Solar, CostComponent::FixedOm, 10_000.0),
            // Negligible: must be dropped.
            detailed_row(Technology::Solar, CostComponent::VarOm, 0.2),
            detailed_row(Technology::Battery, CostComponent::CapexAnnualized, 25_000.0),
            detailed_row(Technology::System, CostComponent::UnservedPenalty, 5_000.0),
        ])
    }

    #[test]
    fn test_detailed_steps_drop_below_threshold() {
        let steps = build(&sample_table(), UnitMode::Total, 1_000.0);
        let labels: Vec<_> = steps.iter().map(|step| step.label.as_str()).collect();
        assert_eq!(labels, [
            "Solar capex (annualized)",
            "Solar fixed O&M",
            "Battery capex (annualized)",
            "Unserved energy penalty",
            "Total",
        ]);
    }

    #[test]
    fn test_detailed_bases_are_running_totals() {
        let steps = build(&sample_table(), UnitMode::Total, 1_000.0);
        assert_abs_diff_eq!(steps[0].base, 0.0);
        assert_abs_diff_eq!(steps[1].base, 60_000.0);
        assert_abs_diff_eq!(steps[2].base, 70_000.0);
        assert_abs_diff_eq!(steps[3].base, 95_000.0);

        let total = steps.last().unwrap();
        assert_abs_diff_eq!(total.value, 100_000.0);
        assert_abs_diff_eq!(total.base, 0.0);
    }

    #[test]
    fn test_per_unit_scaling_applies_to_values_and_bases() {
        let steps = build(&sample_table(), UnitMode::PerMwhServed, 1_000.0);
        assert_abs_diff_eq!(steps[1].base, 60.0);
        assert_abs_diff_eq!(steps.last().unwrap().value, 100.0);
    }

    #[test]
    fn test_per_unit_scaling_skipped_for_zero_served_energy() {
        let steps = build(&sample_table(), UnitMode::PerMwhServed, 0.0);
        assert_abs_diff_eq!(steps.last().unwrap().value, 100_000.0);
    }

    #[test]
    fn test_coarse_steps_are_stacked_from_zero() {
        let table = CostTable::Coarse(vec![
            CoarseCostRow { bucket: CostBucket::Fixed, cost_usd: 70_000.0 },
            CoarseCostRow { bucket: CostBucket::Fixed, cost_usd: 25_000.0 },
            CoarseCostRow { bucket: CostBucket::Variable, cost_usd: 4_000.0 },
            CoarseCostRow { bucket: CostBucket::Penalty, cost_usd: 1_000.0 },
        ]);
        let steps = build(&table, UnitMode::Total, 1_000.0);
        assert_eq!(steps.len(), 4);
        assert!(steps.iter().all(|step| step.base == 0.0));
        assert_abs_diff_eq!(steps[0].value, 95_000.0);
        assert_abs_diff_eq!(steps[1].value, 4_000.0);
        assert_abs_diff_eq!(steps[2].value, 1_000.0);
        assert_abs_diff_eq!(steps[3].value, 100_000.0);
    }
}
