//! Report documents embedded in a csvqr page, decoded defensively.
#![forbid(unsafe_code)]

pub mod access;
pub mod dag;
pub mod decode;
pub mod profile;
pub mod run;
pub mod source;

pub use dag::{DagEdge, DagSummary};
pub use decode::{DecodeError, decode, decode_or_empty};
pub use profile::{ColumnStat, DatasetInfo, DatasetProfile};
pub use run::{ResourceSample, RunReport, StageStat};
pub use source::{BlockIds, DocumentSet, DocumentSource};
