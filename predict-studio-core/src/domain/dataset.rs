use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::column::ColumnType;

/// Schema and summary of the currently uploaded tabular file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub filename: String,
    pub rows: u64,
    pub shape: (u64, u64),
    pub columns: Vec<String>,
    pub dtypes: HashMap<String, String>,
    pub null_counts: HashMap<String, u64>,
    /// Rendered preview of the first rows, as returned by the backend.
    pub head: String,
    /// Rendered descriptive statistics, as returned by the backend.
    pub statistics: String,
}

impl Dataset {
    pub fn new(filename: impl Into<String>, columns: Vec<String>, rows: u64) -> Self {
        let cols = columns.len() as u64;
        Self {
            filename: filename.into(),
            rows,
            shape: (rows, cols),
            columns,
            dtypes: HashMap::new(),
            null_counts: HashMap::new(),
            head: String::new(),
            statistics: String::new(),
        }
    }

    pub fn with_dtypes(mut self, dtypes: HashMap<String, String>) -> Self {
        self.dtypes = dtypes;
        self
    }

    pub fn with_null_counts(mut self, null_counts: HashMap<String, u64>) -> Self {
        self.null_counts = null_counts;
        self
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Declared dtype of a column; columns without one decode as `Other("")`.
    pub fn column_type(&self, column: &str) -> ColumnType {
        self.dtypes
            .get(column)
            .map(|d| ColumnType::from_dtype(d))
            .unwrap_or_else(|| ColumnType::Other(String::new()))
    }

    /// Columns with at least one missing value, in column order.
    pub fn missing_columns(&self) -> Vec<(String, u64)> {
        self.columns
            .iter()
            .filter_map(|c| match self.null_counts.get(c) {
                Some(&n) if n > 0 => Some((c.clone(), n)),
                _ => None,
            })
            .collect()
    }

    pub fn shape_label(&self) -> String {
        format!("{} rows × {} cols", self.shape.0, self.shape.1)
    }
}
