use serde_json::Value;

use crate::access::{array, num, text, truthy};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DatasetInfo {
    pub source_path: Option<String>,
    pub columns: Option<f64>,
    pub header_present: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColumnStat {
    pub name: Option<String>,
    pub non_null_count: Option<f64>,
    pub null_count: Option<f64>,
}

/// Snapshot of `profile.json`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DatasetProfile {
    pub version: Option<String>,
    pub dataset: DatasetInfo,
    pub columns: Vec<ColumnStat>,
}

impl DatasetProfile {
    pub fn from_value(v: &Value) -> Self {
        let ds = v.get("dataset").unwrap_or(&Value::Null);
        Self {
            version: text(v, "version"),
            dataset: DatasetInfo {
                source_path: text(ds, "source_path"),
                columns: num(ds, "columns"),
                header_present: truthy(ds, "header_present"),
            },
            columns: array(v, "columns")
                .iter()
                .map(|c| ColumnStat {
                    name: text(c, "name"),
                    non_null_count: num(c, "non_null_count"),
                    null_count: num(c, "null_count"),
                })
                .collect(),
        }
    }

    /// Declared column count as written, falling back to the length of the column list
    /// when it is absent, zero or negative.
    pub fn column_count(&self) -> f64 {
        match self.dataset.columns {
            Some(n) if n > 0.0 => n,
            _ => self.columns.len() as f64,
        }
    }
}
