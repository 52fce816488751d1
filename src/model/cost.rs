use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// Cost bucket of the coarse breakdown schema.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize, Serialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum CostBucket {
    #[display("Fixed")]
    Fixed,

    #[display("Variable")]
    Variable,

    #[display("Unserved penalty")]
    Penalty,
}

impl CostBucket {
    /// Display order of the coarse breakdown.
    pub const ORDER: [Self; 3] = [Self::Fixed, Self::Variable, Self::Penalty];

    pub const fn color_key(self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Variable => "variable",
            Self::Penalty => "penalty",
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize, Serialize, derive_more::Display)]
#[serde(rename_all = "lowercase")]
pub enum Technology {
    #[display("Solar")]
    Solar,

    #[display("Battery")]
    Battery,

    #[display("Diesel")]
    Diesel,

    #[display("CCGT")]
    Ccgt,

    #[display("Coal")]
    Coal,

    /// The system-wide pseudo-technology carrying the unserved-energy penalty.
    #[display("System")]
    System,
}

impl Technology {
    /// Fixed display order of the detailed waterfall.
    pub const DISPLAY_ORDER: [Self; 5] =
        [Self::Solar, Self::Battery, Self::Diesel, Self::Ccgt, Self::Coal];

    pub const fn color_key(self) -> &'static str {
        match self {
            Self::Solar => "solar",
            Self::Battery => "battery",
            Self::Diesel => "diesel",
            Self::Ccgt => "ccgt",
            Self::Coal => "coal",
            Self::System => "system",
        }
    }
}

/// Cost component of the detailed breakdown schema.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize, Serialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum CostComponent {
    #[display("capex (annualized)")]
    CapexAnnualized,

    #[display("fixed O&M")]
    FixedOm,

    #[display("variable O&M")]
    VarOm,

    #[display("unserved penalty")]
    UnservedPenalty,
}

impl CostComponent {
    /// Per-technology components, in waterfall order. The unserved penalty is
    /// system-wide and handled separately.
    pub const WATERFALL_ORDER: [Self; 3] = [Self::CapexAnnualized, Self::FixedOm, Self::VarOm];
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CoarseCostRow {
    pub bucket: CostBucket,
    pub cost_usd: f64,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct DetailedCostRow {
    pub technology: Technology,
    pub component: CostComponent,
    pub cost_usd: f64,
}

/// Flat cost rows under one of two schemas, inferred per scenario from the
/// presence of a `component` column. A scenario never mixes schemas.
#[derive(Clone, Debug)]
pub enum CostTable {
    Coarse(Vec<CoarseCostRow>),
    Detailed(Vec<DetailedCostRow>),
}

impl CostTable {
    /// Classify and parse row objects coming from the API backend.
    pub fn from_json_rows(rows: &[serde_json::Value]) -> Result<Self> {
        let is_detailed = rows
            .first()
            .is_some_and(|row| row.get("component").is_some_and(|value| !value.is_null()));
        if is_detailed {
            let rows = rows
                .iter()
                .map(|row| serde_json::from_value(row.clone()))
                .collect::<Result<Vec<DetailedCostRow>, _>>()
                .context("failed to parse detailed cost rows")?;
            Ok(Self::Detailed(rows))
        } else {
            let rows = rows
                .iter()
                .map(|row| serde_json::from_value(row.clone()))
                .collect::<Result<Vec<CoarseCostRow>, _>>()
                .context("failed to parse coarse cost rows")?;
            Ok(Self::Coarse(rows))
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Coarse(rows) => rows.len(),
            Self::Detailed(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_json_rows_with_component_are_detailed() -> Result {
        let rows = [
            json!({"bucket": "fixed", "technology": "solar", "component": "capex_annualized", "cost_usd": 1.0}),
            json!({"bucket": "penalty", "technology": "system", "component": "unserved_penalty", "cost_usd": 2.0}),
        ];
        let table = CostTable::from_json_rows(&rows)?;
        assert!(matches!(table, CostTable::Detailed(_)));
        assert_eq!(table.len(), 2);
        Ok(())
    }

    #[test]
    fn test_json_rows_without_component_are_coarse() -> Result {
        let rows = [
            json!({"bucket": "fixed", "cost_usd": 1.0}),
            json!({"bucket": "variable", "cost_usd": 2.0}),
        ];
        let table = CostTable::from_json_rows(&rows)?;
        assert!(matches!(table, CostTable::Coarse(_)));
        Ok(())
    }

    #[test]
    fn test_empty_rows_are_coarse_and_empty() -> Result {
        let table = CostTable::from_json_rows(&[])?;
        assert!(table.is_empty());
        Ok(())
    }
}
