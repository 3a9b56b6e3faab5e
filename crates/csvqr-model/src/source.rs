use serde::Deserialize;
use serde_json::Value;

use crate::decode::decode_or_empty;
use crate::{DagSummary, DatasetProfile, RunReport};

/// Anything that can hand out the raw text of an embedded block by id.
pub trait DocumentSource {
    fn raw_block(&self, id: &str) -> Option<String>;
}

impl DocumentSource for std::collections::HashMap<String, String> {
    fn raw_block(&self, id: &str) -> Option<String> {
        self.get(id).cloned()
    }
}

/// Element ids of the three embedded JSON blocks.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BlockIds {
    pub run: String,
    pub profile: String,
    pub dag: String,
}

impl Default for BlockIds {
    fn default() -> Self {
        Self {
            run: "run_json".into(),
            profile: "profile_json".into(),
            dag: "dag_json".into(),
        }
    }
}

/// The three decoded documents for one page. Read-only after construction.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DocumentSet {
    pub run: RunReport,
    pub profile: DatasetProfile,
    pub dag: DagSummary,
}

impl DocumentSet {
    pub fn load(source: &dyn DocumentSource, ids: &BlockIds) -> Self {
        let run = decode_or_empty(&ids.run, source.raw_block(&ids.run).as_deref());
        let profile = decode_or_empty(&ids.profile, source.raw_block(&ids.profile).as_deref());
        let dag = decode_or_empty(&ids.dag, source.raw_block(&ids.dag).as_deref());
        Self::from_values(&run, &profile, &dag)
    }

    pub fn from_values(run: &Value, profile: &Value, dag: &Value) -> Self {
        Self {
            run: RunReport::from_value(run),
            profile: DatasetProfile::from_value(profile),
            dag: DagSummary::from_value(dag),
        }
    }
}
