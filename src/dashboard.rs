//! Session state: the resolved catalog, the session backend, and the
//! atomically replaced "current scenario" data.

use crate::{
    compare::{self, Comparison},
    model::{AssumptionRow, Catalog, CostTable, HourlyRow, Summary},
    prelude::*,
    source::ResultsBackend,
    state::{CurrentCell, LoadTicket},
};

/// Everything the dashboard knows about one scenario. The four parts are
/// loaded together and swapped together; readers never see a torn mix.
#[derive(Debug)]
pub struct ScenarioData {
    pub scenario_id: String,
    pub summary: Summary,
    pub hourly: Vec<HourlyRow>,
    pub costs: CostTable,
    pub assumptions: Vec<AssumptionRow>,
}

/// An initiated scenario switch: carries the target id and the staleness
/// ticket taken before the retrievals started.
#[derive(Debug)]
pub struct PendingLoad {
    scenario_id: String,
    ticket: LoadTicket,
}

/// Run the four per-scenario retrievals concurrently. All four must resolve
/// for the load to count; any single failure fails the whole load.
pub async fn load_scenario(
    backend: &dyn ResultsBackend,
    scenario_id: &str,
) -> Result<ScenarioData> {
    let (summary, hourly, costs, assumptions) = tokio::try_join!(
        backend.fetch_summary(scenario_id),
        backend.fetch_hourly(scenario_id),
        backend.fetch_costs(scenario_id),
        backend.fetch_assumptions(scenario_id),
    )
    .with_context(|| format!("failed to load scenario `{scenario_id}`"))?;

    // The backend may normalize the id; its own report wins.
    let scenario_id =
        summary.scenario_id.clone().unwrap_or_else(|| scenario_id.to_string());
    info!(scenario_id, n_hours = hourly.len(), n_cost_rows = costs.len(), "loaded");
    Ok(ScenarioData { scenario_id, summary, hourly, costs, assumptions })
}

pub struct Dashboard {
    catalog: Catalog,
    backend: Box<dyn ResultsBackend>,
    current: CurrentCell<ScenarioData>,
    comparison: CurrentCell<Comparison>,
}

impl Dashboard {
    pub fn new(catalog: Catalog, backend: Box<dyn ResultsBackend>) -> Self {
        Self {
            catalog,
            backend,
            current: CurrentCell::default(),
            comparison: CurrentCell::default(),
        }
    }

    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The requested scenario id, or the catalog default when none is given.
    pub fn scenario_or_default<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        requested.unwrap_or(&self.catalog.default_scenario)
    }

    pub fn current(&self) -> Option<&ScenarioData> {
        self.current.get()
    }

    /// Initiate a scenario switch: validate the id against the catalog and
    /// take a staleness ticket. Any switch initiated later invalidates it.
    pub fn begin_load(&mut self, scenario_id: &str) -> Result<PendingLoad> {
        ensure!(
            self.catalog.contains(scenario_id),
            "unknown scenario `{scenario_id}` (known: {})",
            self.catalog
                .scenarios
                .iter()
                .map(|descriptor| descriptor.id.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        );
        Ok(PendingLoad { scenario_id: scenario_id.to_string(), ticket: self.current.begin() })
    }

    pub async fn fetch(&self, pending: &PendingLoad) -> Result<ScenarioData> {
        load_scenario(self.backend.as_ref(), &pending.scenario_id).await
    }

    /// Publish a completed load unless a newer switch was initiated in the
    /// meantime; stale results are discarded, the previous data stays.
    pub fn publish(&mut self, pending: PendingLoad, data: ScenarioData) -> bool {
        let published = self.current.publish(pending.ticket, data);
        if !published {
            warn!(scenario_id = pending.scenario_id, "discarding a stale scenario load");
        }
        published
    }

    /// The one-shot path: initiate, fetch, publish, and borrow the result.
    pub async fn select_scenario(&mut self, scenario_id: &str) -> Result<&ScenarioData> {
        let pending = self.begin_load(scenario_id)?;
        let data = self.fetch(&pending).await?;
        self.publish(pending, data);
        self.current().context("no scenario data published")
    }

    /// Refresh comparison mode: best-effort summaries across the whole
    /// catalog, replacing the previous comparison wholesale.
    pub async fn refresh_comparison(&mut self) -> Result<&Comparison> {
        let ticket = self.comparison.begin();
        let comparison = compare::fetch_all(self.backend.as_ref(), &self.catalog).await;
        self.comparison.publish(ticket, comparison);
        self.comparison.get().context("no comparison data published")
    }
}
