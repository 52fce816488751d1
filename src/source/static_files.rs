//! Static-file backend over a directory of optimizer outputs:
//!
//! ```text
//! outputs/
//!   summary.json                 <- base case
//!   hourly_dispatch.csv
//!   cost_breakdown.csv
//!   assumptions_used.csv         <- optional
//!   scenarios/
//!     scenario_index.json
//!     nf80/
//!       summary.json
//!       ...
//! ```

use std::{
    io,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::{
    model::{AssumptionRow, Catalog, CostTable, HourlyRow, ScenarioDescriptor, ScenarioIndex, ScenarioSource, Summary},
    prelude::*,
    source::ResultsBackend,
};

pub struct StaticSource {
    results_dir: PathBuf,
}

impl StaticSource {
    pub const SUMMARY_FILE: &'static str = "summary.json";
    pub const HOURLY_FILE: &'static str = "hourly_dispatch.csv";
    pub const COST_FILE: &'static str = "cost_breakdown.csv";
    pub const ASSUMPTIONS_FILE: &'static str = "assumptions_used.csv";
    pub const INDEX_FILE: &'static str = "scenario_index.json";

    pub fn new(results_dir: impl Into<PathBuf>) -> Self {
        Self { results_dir: results_dir.into() }
    }

    /// Probe the well-known static paths and list every scenario they
    /// advertise, in discovery order. Missing files yield zero scenarios,
    /// not an error; a present-but-malformed index is a hard failure.
    #[instrument(skip_all)]
    pub async fn discover(&self) -> Result<Vec<ScenarioDescriptor>> {
        let mut scenarios = Vec::new();

        if read_optional(&self.results_dir.join(Self::SUMMARY_FILE)).await?.is_some() {
            scenarios.push(ScenarioDescriptor::base());
        }

        let index_path = self.results_dir.join("scenarios").join(Self::INDEX_FILE);
        if let Some(text) = read_optional(&index_path).await? {
            let index: ScenarioIndex = serde_json::from_str(&text)
                .with_context(|| format!("failed to parse `{}`", index_path.display()))?;
            debug!(
                generated_at = ?index.generated_at_utc,
                hours = ?index.hours,
                n_scenarios = index.scenarios.len(),
                "parsed the scenario index",
            );
            scenarios.extend(
                index
                    .scenarios
                    .into_iter()
                    .filter(|descriptor| !descriptor.id.trim().is_empty())
                    .map(|descriptor| descriptor.with_source(ScenarioSource::StaticIndex)),
            );
        }

        Ok(scenarios)
    }

    /// The base case lives at the results root, every other scenario in its
    /// own directory under `scenarios/`.
    fn scenario_dir(&self, scenario_id: &str) -> PathBuf {
        if scenario_id == Catalog::BASE_SCENARIO_ID {
            self.results_dir.clone()
        } else {
            self.results_dir.join("scenarios").join(scenario_id)
        }
    }

    async fn read_required(&self, scenario_id: &str, file_name: &str) -> Result<String> {
        let path = self.scenario_dir(scenario_id).join(file_name);
        read_optional(&path).await?.with_context(|| {
            format!("scenario `{scenario_id}` has no `{file_name}` at `{}`", path.display())
        })
    }
}

#[async_trait]
impl ResultsBackend for StaticSource {
    #[instrument(skip_all, fields(scenario_id = scenario_id))]
    async fn fetch_summary(&self, scenario_id: &str) -> Result<Summary> {
        let text = self.read_required(scenario_id, Self::SUMMARY_FILE).await?;
        serde_json::from_str(&text)
            .with_context(|| format!("failed to parse the `{scenario_id}` summary"))
    }

    #[instrument(skip_all, fields(scenario_id = scenario_id))]
    async fn fetch_hourly(&self, scenario_id: &str) -> Result<Vec<HourlyRow>> {
        let text = self.read_required(scenario_id, Self::HOURLY_FILE).await?;
        parse_rows(&text)
            .with_context(|| format!("failed to parse the `{scenario_id}` hourly dispatch"))
    }

    #[instrument(skip_all, fields(scenario_id = scenario_id))]
    async fn fetch_costs(&self, scenario_id: &str) -> Result<CostTable> {
        let text = self.read_required(scenario_id, Self::COST_FILE).await?;
        parse_cost_table(&text)
            .with_context(|| format!("failed to parse the `{scenario_id}` cost breakdown"))
    }

    /// The assumptions file is optional: absence yields an empty list.
    #[instrument(skip_all, fields(scenario_id = scenario_id))]
    async fn fetch_assumptions(&self, scenario_id: &str) -> Result<Vec<AssumptionRow>> {
        let path = self.scenario_dir(scenario_id).join(Self::ASSUMPTIONS_FILE);
        let Some(text) = read_optional(&path).await? else {
            debug!(scenario_id, "no assumptions file");
            return Ok(Vec::new());
        };
        let rows: Vec<AssumptionRow> = parse_rows(&text)
            .with_context(|| format!("failed to parse the `{scenario_id}` assumptions"))?;
        Ok(rows
            .into_iter()
            .map(AssumptionRow::normalize)
            .filter(|row| !row.assumption.trim().is_empty())
            .collect())
    }
}

/// Read a file, mapping "not found" to `None` and any other I/O failure to
/// an error, so that callers can treat optional resources as empty without
/// swallowing real transport problems.
async fn read_optional(path: &Path) -> Result<Option<String>> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => Ok(Some(text)),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(error) => {
            Err(Error::from(error).context(format!("failed to read `{}`", path.display())))
        }
    }
}

fn parse_rows<R: DeserializeOwned>(text: &str) -> Result<Vec<R>> {
    csv::Reader::from_reader(text.as_bytes())
        .into_deserialize()
        .collect::<Result<Vec<R>, csv::Error>>()
        .map_err(Error::from)
}

/// Infer the cost schema from the header row: a `component` column means the
/// detailed technology × component schema.
fn parse_cost_table(text: &str) -> Result<CostTable> {
    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let is_detailed = reader.headers()?.iter().any(|header| header == "component");
    if is_detailed {
        Ok(CostTable::Detailed(reader.into_deserialize().collect::<Result<Vec<_>, _>>()?))
    } else {
        Ok(CostTable::Coarse(reader.into_deserialize().collect::<Result<Vec<_>, _>>()?))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::model::{AssumptionValue, CostComponent, Technology};

    const SUMMARY_JSON: &str = r#"{
        "scenario_name": "nf80",
        "status": "Optimal",
        "objective_usd": 100000.0,
        "lcoe_usd_per_mwh_served": 100.0,
        "total_demand_mwh": 1100.0,
        "served_energy_mwh": 1000.0,
        "unserved_energy_mwh": 100.0,
        "capacity_mw": {"solar": 12.0, "battery": 4.0},
        "annual_generation_mwh": {"solar": 900.0}
    }"#;

    #[test]
    fn test_parse_hourly_rows() -> Result {
        let rows: Vec<HourlyRow> = parse_rows(
            "timestamp,demand_mwh,gen_solar_mwh,battery_soc_mwh,unserved_mwh\n\
             2024-01-01 00:00:00,10.5,0.0,3.2,0.0\n\
             2024-01-01 01:00:00,11.0,0.5,2.8,0.1\n",
        )?;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].timestamp, "2024-01-01 01:00:00");
        assert_eq!(rows[1].demand_mwh, 11.0);
        // Columns absent from the file default to zero:
        assert_eq!(rows[1].gen_coal_mwh, 0.0);
        Ok(())
    }

    #[test]
    fn test_cost_schema_inference() -> Result {
        let detailed = parse_cost_table(
            "bucket,technology,component,cost_usd\n\
             fixed,solar,capex_annualized,60000.0\n\
             penalty,system,unserved_penalty,5000.0\n",
        )?;
        let CostTable::Detailed(rows) = detailed else {
            panic!("expected the detailed schema");
        };
        assert_eq!(rows[0].technology, Technology::Solar);
        assert_eq!(rows[1].component, CostComponent::UnservedPenalty);

        let coarse = parse_cost_table("bucket,cost_usd\nfixed,60000.0\nvariable,4000.0\n")?;
        assert!(matches!(coarse, CostTable::Coarse(_)));
        Ok(())
    }

    #[test]
    fn test_assumption_header_aliases() -> Result {
        let canonical: Vec<AssumptionRow> =
            parse_rows("assumption,value,unit\nWACC,0.08,fraction\n")?;
        let readable: Vec<AssumptionRow> =
            parse_rows("Assumption,Value,Unit / Notes\nWACC,0.08,fraction\n")?;
        assert_eq!(canonical, readable);
        assert_eq!(canonical[0].value, AssumptionValue::Number(0.08));
        assert_eq!(canonical[0].unit.as_deref(), Some("fraction"));
        Ok(())
    }

    #[tokio::test]
    async fn test_discover_empty_directory() -> Result {
        let dir = tempfile::tempdir()?;
        let source = StaticSource::new(dir.path());
        assert!(source.discover().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_discover_base_and_index() -> Result {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join(StaticSource::SUMMARY_FILE), SUMMARY_JSON)?;
        fs::create_dir_all(dir.path().join("scenarios"))?;
        fs::write(
            dir.path().join("scenarios").join(StaticSource::INDEX_FILE),
            r#"{
                "generated_at_utc": "2024-06-01T00:00:00+00:00",
                "scenarios": [
                    {"id": "nf80", "label": "Non-fossil 80%", "status": "Optimal", "lcoe_usd_per_mwh_served": 101.5},
                    {"id": "", "label": "bogus"},
                    {"id": "nf90"}
                ]
            }"#,
        )?;

        let scenarios = StaticSource::new(dir.path()).discover().await?;
        let ids: Vec<_> = scenarios.iter().map(|descriptor| descriptor.id.as_str()).collect();
        assert_eq!(ids, ["base", "nf80", "nf90"]);
        assert_eq!(scenarios[0].source, ScenarioSource::StaticBase);
        assert_eq!(scenarios[1].source, ScenarioSource::StaticIndex);
        assert_eq!(scenarios[1].lcoe_usd_per_mwh_served, Some(101.5));
        Ok(())
    }

    #[tokio::test]
    async fn test_malformed_index_is_a_hard_failure() -> Result {
        let dir = tempfile::tempdir()?;
        fs::create_dir_all(dir.path().join("scenarios"))?;
        fs::write(dir.path().join("scenarios").join(StaticSource::INDEX_FILE), "not json")?;
        assert!(StaticSource::new(dir.path()).discover().await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_assumptions_yield_empty_list() -> Result {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join(StaticSource::SUMMARY_FILE), SUMMARY_JSON)?;
        let source = StaticSource::new(dir.path());
        assert!(source.fetch_assumptions("base").await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_hourly_is_an_error() -> Result {
        let dir = tempfile::tempdir()?;
        let source = StaticSource::new(dir.path());
        assert!(source.fetch_hourly("base").await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_summary() -> Result {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join(StaticSource::SUMMARY_FILE), SUMMARY_JSON)?;
        let summary = StaticSource::new(dir.path()).fetch_summary("base").await?;
        assert_eq!(summary.status, "Optimal");
        assert_eq!(summary.capacity_mw.get("solar"), Some(&12.0));
        Ok(())
    }
}
