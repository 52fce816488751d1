use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Per-scenario scalar results from `summary.json` or `/api/summary`.
///
/// Unknown fields are ignored: the optimizer writes a lot of run metadata
/// that the dashboard has no use for.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Summary {
    /// Reported by the API backend; overrides the requested id when present.
    #[serde(default)]
    pub scenario_id: Option<String>,

    #[serde(default)]
    pub scenario_name: Option<String>,

    pub status: String,

    pub objective_usd: f64,

    pub lcoe_usd_per_mwh_served: f64,

    pub total_demand_mwh: f64,

    pub served_energy_mwh: f64,

    pub unserved_energy_mwh: f64,

    #[serde(default)]
    pub min_non_fossil_share_target: Option<f64>,

    #[serde(default)]
    pub achieved_fossil_share_served_primary: Option<f64>,

    #[serde(default)]
    pub achieved_non_fossil_share_served_primary: Option<f64>,

    #[serde(default)]
    pub achieved_solar_share_served: Option<f64>,

    #[serde(default)]
    pub achieved_non_fossil_share: Option<f64>,

    /// Installed capacity per technology, megawatts.
    #[serde(default)]
    pub capacity_mw: BTreeMap<String, f64>,

    /// Annual generation per technology, megawatt-hours.
    #[serde(default)]
    pub annual_generation_mwh: BTreeMap<String, f64>,

    #[serde(default)]
    pub unserved_penalty_usd: Option<f64>,

    /// Value of lost load.
    #[serde(default)]
    pub voll_usd_per_mwh: Option<f64>,

    #[serde(default)]
    pub hours_modeled: Option<usize>,

    #[serde(default)]
    pub timestamp_start: Option<String>,

    #[serde(default)]
    pub timestamp_end: Option<String>,
}
