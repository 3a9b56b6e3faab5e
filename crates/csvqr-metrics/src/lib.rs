//! Chart-ready series derived from decoded run and profile documents.
#![forbid(unsafe_code)]

pub mod derive;
pub mod series;
pub mod time;

pub use derive::{
    DerivedCharts, ResourceField, derive_all, null_ratio, resource_over_time, stage_latency,
    throughput_rate,
};
pub use series::{
    ChartKind, NullRatioRow, ResourcePoint, Series, StageLatencyRow, ThroughputPoint,
};
pub use time::{normalize, normalize_samples};
