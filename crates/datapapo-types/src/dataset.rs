//! Dataset profile types for Datapapo.
//!
//! A loaded CSV is summarized into a [`DatasetProfile`]: per-column type,
//! null/distinct counts, descriptive statistics, and a bounded sample of
//! head rows. The profile is what the analysis agent sees -- the raw table
//! itself never leaves the process.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of sample values captured per column profile.
pub const SAMPLE_VALUES: usize = 3;

/// Number of head rows captured in a dataset profile.
pub const SAMPLE_ROWS: usize = 10;

/// Inferred dominant type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Int,
    Float,
    Bool,
    Text,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Int => write!(f, "int"),
            ColumnType::Float => write!(f, "float"),
            ColumnType::Bool => write!(f, "bool"),
            ColumnType::Text => write!(f, "text"),
        }
    }
}

impl FromStr for ColumnType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "int" => Ok(ColumnType::Int),
            "float" => Ok(ColumnType::Float),
            "bool" => Ok(ColumnType::Bool),
            "text" => Ok(ColumnType::Text),
            other => Err(format!("invalid column type: '{other}'")),
        }
    }
}

/// Descriptive statistics for a numeric column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Population standard deviation.
    pub std_dev: f64,
}

/// Profile of a single column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub name: String,
    pub column_type: ColumnType,
    pub null_count: usize,
    pub distinct_count: usize,
    /// Min/max as display strings (lexicographic for text columns).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_value: Option<String>,
    /// Present only for int/float columns with at least one value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numeric: Option<NumericStats>,
    /// Up to [`SAMPLE_VALUES`] non-null example values.
    pub sample_values: Vec<String>,
}

/// Summary of a loaded dataset, as presented to the analysis agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetProfile {
    /// Source name (file name or upload name).
    pub source: String,
    pub row_count: usize,
    pub column_count: usize,
    /// Number of fully duplicated rows.
    pub duplicate_rows: usize,
    pub columns: Vec<ColumnProfile>,
    /// Up to [`SAMPLE_ROWS`] head rows, as display strings.
    pub head: Vec<Vec<String>>,
}

impl DatasetProfile {
    /// Column names in table order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Names of columns inferred as numeric (int or float).
    pub fn numeric_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| matches!(c.column_type, ColumnType::Int | ColumnType::Float))
            .map(|c| c.name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_profile() -> DatasetProfile {
        DatasetProfile {
            source: "vendas.csv".to_string(),
            row_count: 100,
            column_count: 2,
            duplicate_rows: 0,
            columns: vec![
                ColumnProfile {
                    name: "idade".to_string(),
                    column_type: ColumnType::Int,
                    null_count: 2,
                    distinct_count: 40,
                    min_value: Some("18".to_string()),
                    max_value: Some("77".to_string()),
                    numeric: Some(NumericStats {
                        min: 18.0,
                        max: 77.0,
                        mean: 41.5,
                        std_dev: 12.3,
                    }),
                    sample_values: vec!["34".to_string(), "51".to_string()],
                },
                ColumnProfile {
                    name: "cidade".to_string(),
                    column_type: ColumnType::Text,
                    null_count: 0,
                    distinct_count: 12,
                    min_value: Some("Aracaju".to_string()),
                    max_value: Some("Vitória".to_string()),
                    numeric: None,
                    sample_values: vec!["Recife".to_string()],
                },
            ],
            head: vec![vec!["34".to_string(), "Recife".to_string()]],
        }
    }

    #[test]
    fn test_column_type_roundtrip() {
        for ct in [ColumnType::Int, ColumnType::Float, ColumnType::Bool, ColumnType::Text] {
            let s = ct.to_string();
            let parsed: ColumnType = s.parse().unwrap();
            assert_eq!(ct, parsed);
        }
    }

    #[test]
    fn test_numeric_columns() {
        let profile = sample_profile();
        assert_eq!(profile.numeric_columns(), vec!["idade"]);
        assert_eq!(profile.column_names(), vec!["idade", "cidade"]);
    }

    #[test]
    fn test_profile_serde_roundtrip() {
        let profile = sample_profile();
        let json = serde_json::to_string(&profile).unwrap();
        let parsed: DatasetProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.row_count, 100);
        assert_eq!(parsed.columns.len(), 2);
        assert_eq!(parsed.columns[0].column_type, ColumnType::Int);
    }

    #[test]
    fn test_text_column_omits_numeric_stats() {
        let profile = sample_profile();
        let json = serde_json::to_value(&profile).unwrap();
        assert!(json["columns"][1].get("numeric").is_none());
    }
}
