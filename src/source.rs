//! Result-source resolution: static pre-generated files first, live API as
//! the fallback.

mod api;
mod static_files;

use std::path::Path;

use async_trait::async_trait;
use reqwest::Url;

pub use self::{api::ApiSource, static_files::StaticSource};
use crate::{
    model::{AssumptionRow, Catalog, CostTable, HourlyRow, Summary},
    prelude::*,
};

/// One of the two retrieval strategies, fixed for the whole session by
/// whichever discovery branch produced the catalog.
#[async_trait]
pub trait ResultsBackend {
    async fn fetch_summary(&self, scenario_id: &str) -> Result<Summary>;

    async fn fetch_hourly(&self, scenario_id: &str) -> Result<Vec<HourlyRow>>;

    async fn fetch_costs(&self, scenario_id: &str) -> Result<CostTable>;

    async fn fetch_assumptions(&self, scenario_id: &str) -> Result<Vec<AssumptionRow>>;
}

/// Discover the scenario catalog and fix the session backend.
///
/// Static discovery runs first; the API is only consulted when the static
/// probes yield zero scenarios. A malformed-but-present static file is a hard
/// failure on purpose and does not trigger the fallback.
#[instrument(skip_all, fields(results_dir = %results_dir.display()))]
pub async fn resolve(
    results_dir: &Path,
    api_url: &Url,
) -> Result<(Catalog, Box<dyn ResultsBackend>)> {
    let static_source = StaticSource::new(results_dir);
    let scenarios = static_source.discover().await?;
    if !scenarios.is_empty() {
        let catalog = Catalog::try_new(scenarios, None)?;
        info!(n_scenarios = catalog.scenarios.len(), "discovered static scenario outputs");
        return Ok((catalog, Box::new(static_source)));
    }

    info!(api_url = %api_url, "no static outputs found, falling back to the API");
    let api_source = ApiSource::try_new(api_url.clone())?;
    let catalog = api_source
        .fetch_catalog()
        .await
        .context("no static outputs found and the API catalog is unavailable")?;
    ensure!(
        !catalog.scenarios.is_empty(),
        "no scenario outputs found: `{}` holds none and the API returned an empty catalog",
        results_dir.display(),
    );
    info!(n_scenarios = catalog.scenarios.len(), "fetched the API scenario catalog");
    Ok((catalog, Box::new(api_source)))
}

#[cfg(test)]
pub mod testing {
    //! In-memory backend for unit tests.

    use std::collections::BTreeMap;

    use super::*;
    use crate::model::ScenarioDescriptor;

    /// Serves a canned summary per scenario and rejects one designated id.
    pub struct FlakyBackend {
        failing_id: String,
    }

    impl FlakyBackend {
        pub fn failing_for(failing_id: &str) -> Self {
            Self { failing_id: failing_id.to_string() }
        }

        pub fn catalog(ids: &[&str]) -> Catalog {
            let scenarios = ids
                .iter()
                .map(|id| ScenarioDescriptor {
                    id: (*id).to_string(),
                    label: None,
                    ..ScenarioDescriptor::base()
                })
                .collect();
            Catalog::try_new(scenarios, None).unwrap()
        }

        pub fn summary(scenario_id: &str) -> Summary {
            Summary {
                scenario_id: Some(scenario_id.to_string()),
                scenario_name: Some(scenario_id.to_string()),
                status: "Optimal".to_string(),
                objective_usd: 100_000.0,
                lcoe_usd_per_mwh_served: 100.0,
                total_demand_mwh: 1_100.0,
                served_energy_mwh: 1_000.0,
                unserved_energy_mwh: 100.0,
                min_non_fossil_share_target: None,
                achieved_fossil_share_served_primary: None,
                achieved_non_fossil_share_served_primary: Some(0.8),
                achieved_solar_share_served: None,
                achieved_non_fossil_share: None,
                capacity_mw: BTreeMap::new(),
                annual_generation_mwh: BTreeMap::new(),
                unserved_penalty_usd: None,
                voll_usd_per_mwh: None,
                hours_modeled: None,
                timestamp_start: None,
                timestamp_end: None,
            }
        }
    }

    #[async_trait]
    impl ResultsBackend for FlakyBackend {
        async fn fetch_summary(&self, scenario_id: &str) -> Result<Summary> {
            ensure!(scenario_id != self.failing_id, "scenario `{scenario_id}` is unavailable");
            Ok(Self::summary(scenario_id))
        }

        async fn fetch_hourly(&self, scenario_id: &str) -> Result<Vec<HourlyRow>> {
            ensure!(scenario_id != self.failing_id, "scenario `{scenario_id}` is unavailable");
            Ok(vec![HourlyRow {
                timestamp: "2024-01-01 00:00:00".to_string(),
                demand_mwh: 1.0,
                ..HourlyRow::default()
            }])
        }

        async fn fetch_costs(&self, scenario_id: &str) -> Result<CostTable> {
            ensure!(scenario_id != self.failing_id, "scenario `{scenario_id}` is unavailable");
            Ok(CostTable::Coarse(Vec::new()))
        }

        async fn fetch_assumptions(&self, scenario_id: &str) -> Result<Vec<AssumptionRow>> {
            ensure!(scenario_id != self.failing_id, "scenario `{scenario_id}` is unavailable");
            Ok(Vec::new())
        }
    }
}
