//! Live-API backend: the same payloads the static files hold, already shaped
//! as row arrays by the results server.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, de::DeserializeOwned};

use crate::{
    model::{AssumptionRow, Catalog, CostTable, HourlyRow, ScenarioSource, Summary},
    prelude::*,
    source::ResultsBackend,
};

pub struct ApiSource {
    client: Client,
    base_url: Url,
}

/// Envelope wrapping every per-scenario row payload.
#[derive(Deserialize)]
struct RowsPayload<R> {
    #[serde(default)]
    rows: Vec<R>,
}

impl ApiSource {
    pub fn try_new(base_url: Url) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self { client, base_url })
    }

    /// Fetch the scenario catalog, which must already carry the
    /// `{default_scenario, scenarios}` shape.
    #[instrument(skip_all)]
    pub async fn fetch_catalog(&self) -> Result<Catalog> {
        #[derive(Deserialize)]
        struct CatalogPayload {
            #[serde(default)]
            default_scenario: Option<String>,

            #[serde(default)]
            scenarios: Vec<crate::model::ScenarioDescriptor>,
        }

        let payload: CatalogPayload = self.get("api/scenarios", &[]).await?;
        let scenarios = payload
            .scenarios
            .into_iter()
            .map(|descriptor| descriptor.with_source(ScenarioSource::Api))
            .collect();
        Catalog::try_new(scenarios, payload.default_scenario)
    }

    #[instrument(skip_all, level = Level::DEBUG, fields(path = path))]
    async fn get<R: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<R> {
        let url = self.base_url.join(path).with_context(|| format!("bad endpoint path `{path}`"))?;
        self.client
            .get(url)
            .query(query)
            .send()
            .await
            .with_context(|| format!("failed to call `{path}`"))?
            .error_for_status()
            .with_context(|| format!("`{path}` request failed"))?
            .json()
            .await
            .with_context(|| format!("failed to deserialize the `{path}` response JSON"))
    }
}

#[async_trait]
impl ResultsBackend for ApiSource {
    #[instrument(skip_all, fields(scenario_id = scenario_id))]
    async fn fetch_summary(&self, scenario_id: &str) -> Result<Summary> {
        self.get("api/summary", &[("scenario", scenario_id)]).await
    }

    #[instrument(skip_all, fields(scenario_id = scenario_id))]
    async fn fetch_hourly(&self, scenario_id: &str) -> Result<Vec<HourlyRow>> {
        let payload: RowsPayload<HourlyRow> =
            self.get("api/hourly", &[("scenario", scenario_id)]).await?;
        Ok(payload.rows)
    }

    #[instrument(skip_all, fields(scenario_id = scenario_id))]
    async fn fetch_costs(&self, scenario_id: &str) -> Result<CostTable> {
        let payload: RowsPayload<serde_json::Value> =
            self.get("api/cost-breakdown", &[("scenario", scenario_id)]).await?;
        CostTable::from_json_rows(&payload.rows)
    }

    #[instrument(skip_all, fields(scenario_id = scenario_id))]
    async fn fetch_assumptions(&self, scenario_id: &str) -> Result<Vec<AssumptionRow>> {
        let payload: RowsPayload<AssumptionRow> =
            self.get("api/assumptions", &[("scenario", scenario_id)]).await?;
        Ok(payload
            .rows
            .into_iter()
            .map(AssumptionRow::normalize)
            .filter(|row| !row.assumption.trim().is_empty())
            .collect())
    }
}
