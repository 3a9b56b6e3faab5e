use serde_json::Value;

use crate::access::{array, label, text};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DagEdge {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Snapshot of `dag.json`. Node records are opaque; only their count is used.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DagSummary {
    pub version: Option<String>,
    pub nodes: Vec<Value>,
    pub edges: Vec<DagEdge>,
}

impl DagSummary {
    pub fn from_value(v: &Value) -> Self {
        Self {
            version: text(v, "version"),
            nodes: array(v, "nodes").to_vec(),
            edges: array(v, "edges")
                .iter()
                .map(|e| DagEdge {
                    from: label(e, "from"),
                    to: label(e, "to"),
                })
                .collect(),
        }
    }
}
