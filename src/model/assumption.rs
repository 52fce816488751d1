use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Free-form assumption triple from `assumptions_used.csv`, the source
/// workbook, or `/api/assumptions`.
///
/// The static files carry canonical lowercase headers, while workbook-derived
/// exports carry human-readable ones; the aliases accept either.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct AssumptionRow {
    #[serde(alias = "Assumption")]
    pub assumption: String,

    #[serde(default, alias = "Value")]
    pub value: AssumptionValue,

    #[serde(default, alias = "Unit / Notes")]
    pub unit: Option<String>,
}

impl AssumptionRow {
    /// Drop placeholder values the way the upstream exporter does.
    pub fn normalize(mut self) -> Self {
        self.value = self.value.normalize();
        self.unit = self.unit.filter(|unit| !unit.trim().is_empty());
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum AssumptionValue {
    #[default]
    Null,
    Number(f64),
    Text(String),
}

impl AssumptionValue {
    /// Map empty and `nan` placeholder strings to [`Self::Null`].
    pub fn normalize(self) -> Self {
        match self {
            Self::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
                    Self::Null
                } else if trimmed.len() == text.len() {
                    Self::Text(text)
                } else {
                    Self::Text(trimmed.to_string())
                }
            }
            other => other,
        }
    }
}

impl Display for AssumptionValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_maps_nan_to_null() {
        assert_eq!(AssumptionValue::Text("nan".to_string()).normalize(), AssumptionValue::Null);
        assert_eq!(AssumptionValue::Text("  ".to_string()).normalize(), AssumptionValue::Null);
        assert_eq!(
            AssumptionValue::Text(" 8 hours ".to_string()).normalize(),
            AssumptionValue::Text("8 hours".to_string()),
        );
    }

    #[test]
    fn test_json_value_types() {
        let row: AssumptionRow =
            serde_json::from_str(r#"{"assumption": "WACC", "value": 0.08, "unit": "fraction"}"#)
                .unwrap();
        assert_eq!(row.value, AssumptionValue::Number(0.08));

        let row: AssumptionRow =
            serde_json::from_str(r#"{"assumption": "Battery ramp rate", "value": null}"#).unwrap();
        assert_eq!(row.value, AssumptionValue::Null);
    }
}
