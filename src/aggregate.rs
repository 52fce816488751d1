//! Derived views over the hourly dispatch series: contiguous sub-ranges for
//! chart windows, and a daily rollup for the full-year view.

use itertools::Itertools;

use crate::model::HourlyRow;

/// Window size that triggers the daily rollup (a leap year of hours).
pub const FULL_YEAR_HOURS: usize = 8_784;

/// Contiguous slice `[start, min(len, start + window))`, clamped so that it
/// never runs past the end of the series.
pub fn window(rows: &[HourlyRow], window_hours: usize, start_hour: usize) -> &[HourlyRow] {
    let start = start_hour.min(rows.len());
    let end = rows.len().min(start.saturating_add(window_hours));
    &rows[start..end]
}

/// The display-ready view for the given window: the daily rollup when the
/// whole year is selected, a plain sub-range otherwise.
pub fn display_rows(rows: &[HourlyRow], window_hours: usize, start_hour: usize) -> Vec<HourlyRow> {
    if window_hours == FULL_YEAR_HOURS {
        daily_rollup(rows)
    } else {
        window(rows, window_hours, start_hour).to_vec()
    }
}

/// Roll consecutive hours up into calendar days, keyed by the timestamp's
/// day prefix.
///
/// Flow quantities are summed. State of charge is a stock, so the rollup
/// keeps the last hour's value as an end-of-day snapshot instead.
pub fn daily_rollup(rows: &[HourlyRow]) -> Vec<HourlyRow> {
    let mut days = Vec::new();
    for (day, hours) in &rows.iter().chunk_by(|row| row.day()) {
        let mut rollup = HourlyRow { timestamp: day.to_string(), ..HourlyRow::default() };
        for hour in hours {
            rollup.demand_mwh += hour.demand_mwh;
            rollup.gen_solar_mwh += hour.gen_solar_mwh;
            rollup.gen_diesel_mwh += hour.gen_diesel_mwh;
            rollup.gen_ccgt_mwh += hour.gen_ccgt_mwh;
            rollup.gen_coal_mwh += hour.gen_coal_mwh;
            rollup.battery_charge_mwh += hour.battery_charge_mwh;
            rollup.battery_discharge_mwh += hour.battery_discharge_mwh;
            rollup.battery_net_mwh += hour.battery_net_mwh;
            rollup.unserved_mwh += hour.unserved_mwh;
            rollup.solar_potential_mwh += hour.solar_potential_mwh;
            rollup.solar_curtailment_mwh += hour.solar_curtailment_mwh;
            rollup.battery_soc_mwh = hour.battery_soc_mwh;
        }
        days.push(rollup);
    }
    days
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn hourly_rows(n_rows: usize) -> Vec<HourlyRow> {
        (0..n_rows)
            .map(|hour| HourlyRow {
                timestamp: format!("2024-01-{:02} {:02}:00:00", 1 + hour / 24, hour % 24),
                demand_mwh: hour as f64,
                battery_soc_mwh: 1_000.0 + hour as f64,
                ..HourlyRow::default()
            })
            .collect()
    }

    #[test]
    fn test_window_is_clamped() {
        let rows = hourly_rows(100);
        assert_eq!(window(&rows, 10, 95).len(), 5);
        assert_eq!(window(&rows, 10, 0).len(), 10);
        assert_eq!(window(&rows, 200, 0).len(), 100);
        assert_eq!(window(&rows, 10, 100).len(), 0);
    }

    #[test]
    fn test_window_of_empty_series() {
        assert!(window(&[], 24, 0).is_empty());
        assert!(daily_rollup(&[]).is_empty());
    }

    #[test]
    fn test_daily_rollup_of_two_days() {
        let rows = hourly_rows(48);
        let days = daily_rollup(&rows);
        assert_eq!(days.len(), 2);

        assert_eq!(days[0].timestamp, "2024-01-01");
        assert_eq!(days[1].timestamp, "2024-01-02");

        // Sums of 0..=23 and 24..=47:
        assert_abs_diff_eq!(days[0].demand_mwh, 276.0);
        assert_abs_diff_eq!(days[1].demand_mwh, 852.0);

        // End-of-day snapshots, not sums:
        assert_abs_diff_eq!(days[0].battery_soc_mwh, 1_023.0);
        assert_abs_diff_eq!(days[1].battery_soc_mwh, 1_047.0);
    }

    #[test]
    fn test_full_year_window_triggers_rollup() {
        let rows = hourly_rows(48);
        assert_eq!(display_rows(&rows, FULL_YEAR_HOURS, 0).len(), 2);
        assert_eq!(display_rows(&rows, 24, 0).len(), 24);
    }
}
