use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// One optimization run under a fixed policy configuration,
/// as listed by the scenario index or the API catalog.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ScenarioDescriptor {
    pub id: String,

    #[serde(default)]
    pub label: Option<String>,

    /// Which discovery branch produced this entry. Never read from payloads:
    /// the resolver stamps it after the fact.
    #[serde(skip_deserializing)]
    pub source: ScenarioSource,

    #[serde(default)]
    pub min_non_fossil_share: Option<f64>,

    #[serde(default)]
    pub threshold_non_fossil_share: Option<f64>,

    #[serde(default)]
    pub enforced_min_non_fossil_share: Option<f64>,

    #[serde(default)]
    pub achieved_non_fossil_share: Option<f64>,

    #[serde(default)]
    pub achieved_non_fossil_share_served_primary: Option<f64>,

    #[serde(default)]
    pub achieved_fossil_share_served_primary: Option<f64>,

    #[serde(default)]
    pub achieved_solar_share_served: Option<f64>,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub lcoe_usd_per_mwh_served: Option<f64>,
}

impl ScenarioDescriptor {
    /// Descriptor for the base-case outputs living at the results root.
    pub fn base() -> Self {
        Self {
            id: Catalog::BASE_SCENARIO_ID.to_string(),
            label: Some("Base case".to_string()),
            source: ScenarioSource::StaticBase,
            ..Self::default()
        }
    }

    pub fn with_source(mut self, source: ScenarioSource) -> Self {
        self.source = source;
        self
    }

    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioSource {
    /// Base-case outputs at the results root.
    #[display("static (base)")]
    StaticBase,

    /// Listed by the static scenario index document.
    #[display("static (index)")]
    StaticIndex,

    /// Returned by the live API catalog.
    #[default]
    #[display("api")]
    Api,
}

/// Shape of `scenarios/scenario_index.json`.
#[derive(Debug, Deserialize)]
pub struct ScenarioIndex {
    #[serde(default)]
    pub generated_at_utc: Option<DateTime<Utc>>,

    #[serde(default)]
    pub hours: Option<usize>,

    #[serde(default)]
    pub scenarios: Vec<ScenarioDescriptor>,
}

/// The scenario catalog: built once at startup, read-only afterward.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Catalog {
    pub default_scenario: String,
    pub scenarios: Vec<ScenarioDescriptor>,
}

impl Catalog {
    pub const BASE_SCENARIO_ID: &'static str = "base";

    /// Deduplicate the descriptors and pick a default scenario.
    ///
    /// An explicitly provided default (from the API catalog payload) wins over
    /// the local policy. Fails when no scenarios remain after deduplication.
    pub fn try_new(scenarios: Vec<ScenarioDescriptor>, default: Option<String>) -> Result<Self> {
        let scenarios = dedup_by_id(scenarios);
        let default_scenario = default
            .or_else(|| default_scenario_id(&scenarios).map(ToOwned::to_owned))
            .context("no scenario outputs found")?;
        Ok(Self { default_scenario, scenarios })
    }

    pub fn get(&self, id: &str) -> Option<&ScenarioDescriptor> {
        self.scenarios.iter().find(|descriptor| descriptor.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }
}

/// Keep the first occurrence of each id, preserving discovery order.
pub fn dedup_by_id(scenarios: Vec<ScenarioDescriptor>) -> Vec<ScenarioDescriptor> {
    let mut seen = Vec::<String>::new();
    scenarios
        .into_iter()
        .filter(|descriptor| {
            if seen.iter().any(|id| *id == descriptor.id) {
                false
            } else {
                seen.push(descriptor.id.clone());
                true
            }
        })
        .collect()
}

/// Prefer the first non-base entry, so that a scenario picker defaults to a
/// substantive scenario rather than the trivial base case.
pub fn default_scenario_id(scenarios: &[ScenarioDescriptor]) -> Option<&str> {
    scenarios
        .iter()
        .find(|descriptor| descriptor.id != Catalog::BASE_SCENARIO_ID)
        .or_else(|| scenarios.first())
        .map(|descriptor| descriptor.id.as_str())
}
