use serde::{Deserialize, Serialize};

/// One simulated hour of dispatch.
///
/// Timestamps stay as strings on purpose: the optimizer writes them in
/// `%Y-%m-%d %H:%M:%S`, which sorts lexicographically, and the daily rollup
/// only ever needs the calendar-day prefix.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct HourlyRow {
    pub timestamp: String,

    #[serde(default)]
    pub demand_mwh: f64,

    #[serde(default)]
    pub gen_solar_mwh: f64,

    #[serde(default)]
    pub gen_diesel_mwh: f64,

    #[serde(default)]
    pub gen_ccgt_mwh: f64,

    #[serde(default)]
    pub gen_coal_mwh: f64,

    #[serde(default)]
    pub battery_charge_mwh: f64,

    #[serde(default)]
    pub battery_discharge_mwh: f64,

    #[serde(default)]
    pub battery_net_mwh: f64,

    /// Battery state of charge: a stock, not a flow.
    #[serde(default)]
    pub battery_soc_mwh: f64,

    #[serde(default)]
    pub unserved_mwh: f64,

    #[serde(default)]
    pub solar_potential_mwh: f64,

    #[serde(default)]
    pub solar_curtailment_mwh: f64,
}

impl HourlyRow {
    /// The calendar-day prefix of the timestamp.
    pub fn day(&self) -> &str {
        let end = self.timestamp.len().min(10);
        &self.timestamp[..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_prefix() {
        let row = HourlyRow { timestamp: "2024-03-01 13:00:00".to_string(), ..HourlyRow::default() };
        assert_eq!(row.day(), "2024-03-01");
    }

    #[test]
    fn test_day_prefix_of_short_timestamp() {
        let row = HourlyRow { timestamp: "2024".to_string(), ..HourlyRow::default() };
        assert_eq!(row.day(), "2024");
    }
}
