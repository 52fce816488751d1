//! Best-effort comparison fan-out: one summary per catalog entry, partial
//! failures absorbed and counted instead of failing the batch.

use futures_util::future::join_all;

use crate::{
    model::{Catalog, Summary},
    prelude::*,
    source::ResultsBackend,
};

/// A scenario's summary tagged with its catalog identity.
#[derive(Clone, Debug)]
pub struct ComparisonRow {
    pub scenario_id: String,
    pub scenario_label: String,
    pub summary: Summary,
}

#[derive(Debug)]
pub struct Comparison {
    pub rows: Vec<ComparisonRow>,
    pub failed: usize,
}

/// Fetch every catalog entry's summary concurrently. A rejected entry is
/// logged and counted; it never fails the aggregate operation.
#[instrument(skip_all, fields(n_scenarios = catalog.scenarios.len()))]
pub async fn fetch_all(backend: &dyn ResultsBackend, catalog: &Catalog) -> Comparison {
    let fetches = catalog.scenarios.iter().map(|descriptor| async move {
        match backend.fetch_summary(&descriptor.id).await {
            Ok(summary) => Ok(ComparisonRow {
                scenario_id: descriptor.id.clone(),
                scenario_label: descriptor.label().to_string(),
                summary,
            }),
            Err(error) => Err((descriptor.id.clone(), error)),
        }
    });

    let mut rows = Vec::with_capacity(catalog.scenarios.len());
    let mut failed = 0;
    for outcome in join_all(fetches).await {
        match outcome {
            Ok(row) => rows.push(row),
            Err((scenario_id, error)) => {
                failed += 1;
                warn!(
                    scenario_id,
                    error = format!("{error:#}"),
                    "failed to fetch the scenario summary",
                );
            }
        }
    }
    Comparison { rows, failed }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::testing::FlakyBackend;

    #[tokio::test]
    async fn test_partial_failure_is_absorbed() {
        let catalog = FlakyBackend::catalog(&["base", "nf70", "nf80", "nf90", "nf95"]);
        let backend = FlakyBackend::failing_for("nf80");

        let comparison = fetch_all(&backend, &catalog).await;
        assert_eq!(comparison.rows.len(), 4);
        assert_eq!(comparison.failed, 1);
        assert!(comparison.rows.iter().all(|row| row.scenario_id != "nf80"));
    }

    #[tokio::test]
    async fn test_all_successes() {
        let catalog = FlakyBackend::catalog(&["base", "nf80"]);
        let backend = FlakyBackend::failing_for("");

        let comparison = fetch_all(&backend, &catalog).await;
        assert_eq!(comparison.rows.len(), 2);
        assert_eq!(comparison.failed, 0);
        assert_eq!(comparison.rows[0].scenario_label, "base");
    }
}
