//! Pure derivations from decoded documents to chart rows.
//!
//! Every function here is a function of its inputs only, so a resize can re-run them
//! against the cached documents and get the same rows back.

use csvqr_model::{ColumnStat, DocumentSet, ResourceSample, StageStat};

use crate::series::{
    NullRatioRow, ResourcePoint, Series, StageLatencyRow, ThroughputPoint,
};
use crate::time::normalize_samples;

const BYTES_PER_MB: f64 = 1_048_576.0;

pub const NOT_ENOUGH_SAMPLES: &str = "Not enough samples.";
pub const NO_STAGE_METRICS: &str = "No stage metrics.";
pub const NO_COLUMN_PROFILE: &str = "No column profile data.";
pub const NO_MEMORY_SAMPLES: &str = "No memory samples.";
pub const NO_CPU_SAMPLES: &str = "No CPU samples.";

/// Input rate in MB/s between consecutive samples.
///
/// A missing `bytes_in` counts as 0, so a gap in the counter shows up as a negative or
/// zero delta rather than being skipped. Pairs with no time between them, or whose rate
/// overflows, report 0.
pub fn throughput_rate(
    samples: &[ResourceSample],
    wall_time_ms: Option<f64>,
) -> Series<ThroughputPoint> {
    if samples.len() < 2 {
        return Series::Placeholder(NOT_ENOUGH_SAMPLES);
    }
    let t = normalize_samples(samples, wall_time_ms);
    let bytes = |i: usize| samples[i].bytes_in.unwrap_or(0.0);
    let rows = (1..samples.len())
        .map(|i| {
            let dt = t[i] - t[i - 1];
            let rate = (bytes(i) - bytes(i - 1)) / BYTES_PER_MB / dt;
            let mbps = if dt > 0.0 && rate.is_finite() { rate } else { 0.0 };
            ThroughputPoint { t: t[i], mbps }
        })
        .collect();
    Series::Rows(rows)
}

pub fn stage_latency(stages: &[StageStat]) -> Series<StageLatencyRow> {
    let rows = stages
        .iter()
        .map(|s| StageLatencyRow {
            name: s.name.clone().unwrap_or_else(|| "(unnamed)".to_string()),
            v: s.p95_ms.unwrap_or(0.0),
            calls: s.calls.unwrap_or(0.0),
        })
        .collect();
    Series::or_placeholder(rows, NO_STAGE_METRICS)
}

pub fn null_ratio(columns: &[ColumnStat]) -> Series<NullRatioRow> {
    let rows = columns
        .iter()
        .map(|c| {
            let non_null = c.non_null_count.unwrap_or(0.0);
            let nulls = c.null_count.unwrap_or(0.0);
            let total = non_null + nulls;
            NullRatioRow {
                name: c.name.clone().unwrap_or_else(|| "(unknown)".to_string()),
                ratio: if total > 0.0 { nulls / total } else { 0.0 },
                null_count: nulls,
                non_null_count: non_null,
            }
        })
        .collect();
    Series::or_placeholder(rows, NO_COLUMN_PROFILE)
}

/// Which per-sample reading a resource chart plots.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResourceField {
    Memory,
    Cpu,
}

impl ResourceField {
    fn read(self, s: &ResourceSample) -> Option<f64> {
        match self {
            ResourceField::Memory => s.rss_mb,
            ResourceField::Cpu => s.cpu_pct,
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            ResourceField::Memory => NO_MEMORY_SAMPLES,
            ResourceField::Cpu => NO_CPU_SAMPLES,
        }
    }
}

/// Samples carrying a finite `field`, at the normalized time of the same sample.
pub fn resource_over_time(
    samples: &[ResourceSample],
    wall_time_ms: Option<f64>,
    field: ResourceField,
) -> Series<ResourcePoint> {
    let t = normalize_samples(samples, wall_time_ms);
    let rows = samples
        .iter()
        .zip(t)
        .filter_map(|(s, t)| {
            field
                .read(s)
                .filter(|v| v.is_finite())
                .map(|value| ResourcePoint { t, value })
        })
        .collect();
    Series::or_placeholder(rows, field.placeholder())
}

/// Row sets for all five charts of one render pass.
#[derive(Clone, Debug, PartialEq)]
pub struct DerivedCharts {
    pub throughput: Series<ThroughputPoint>,
    pub stage_latency: Series<StageLatencyRow>,
    pub null_ratio: Series<NullRatioRow>,
    pub memory: Series<ResourcePoint>,
    pub cpu: Series<ResourcePoint>,
}

pub fn derive_all(docs: &DocumentSet) -> DerivedCharts {
    let run = &docs.run;
    DerivedCharts {
        throughput: throughput_rate(&run.samples, run.wall_time_ms),
        stage_latency: stage_latency(&run.stages),
        null_ratio: null_ratio(&docs.profile.columns),
        memory: resource_over_time(&run.samples, run.wall_time_ms, ResourceField::Memory),
        cpu: resource_over_time(&run.samples, run.wall_time_ms, ResourceField::Cpu),
    }
}
