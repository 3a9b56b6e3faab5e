use serde_json::Value;

use crate::access::{array, num, text};

/// One timestamped resource observation. Any field may be missing.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ResourceSample {
    pub ts_ms: Option<f64>,
    pub bytes_in: Option<f64>,
    pub rss_mb: Option<f64>,
    pub cpu_pct: Option<f64>,
}

impl ResourceSample {
    pub fn from_value(v: &Value) -> Self {
        Self {
            ts_ms: num(v, "ts_ms"),
            bytes_in: num(v, "bytes_in"),
            rss_mb: num(v, "rss_mb"),
            cpu_pct: num(v, "cpu_pct"),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct StageStat {
    pub name: Option<String>,
    pub calls: Option<f64>,
    pub p50_ms: Option<f64>,
    pub p95_ms: Option<f64>,
}

impl StageStat {
    pub fn from_value(v: &Value) -> Self {
        Self {
            name: text(v, "name"),
            calls: num(v, "calls"),
            p50_ms: num(v, "p50_ms"),
            p95_ms: num(v, "p95_ms"),
        }
    }
}

/// Snapshot of `run.json`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunReport {
    pub version: Option<String>,
    pub rows: Option<f64>,
    pub errors: Option<f64>,
    pub wall_time_ms: Option<f64>,
    pub started_at: Option<String>,
    pub ended_at: Option<String>,
    pub throughput_input_mb_s: Option<f64>,
    pub input_bytes: Option<f64>,
    pub rss_peak_mb: Option<f64>,
    pub stages: Vec<StageStat>,
    pub samples: Vec<ResourceSample>,
}

impl RunReport {
    pub fn from_value(v: &Value) -> Self {
        Self {
            version: text(v, "version"),
            rows: num(v, "rows"),
            errors: num(v, "errors"),
            wall_time_ms: num(v, "wall_time_ms"),
            started_at: text(v, "started_at"),
            ended_at: text(v, "ended_at"),
            throughput_input_mb_s: num(v, "throughput_input_mb_s"),
            input_bytes: num(v, "input_bytes"),
            rss_peak_mb: num(v, "rss_peak_mb"),
            stages: array(v, "stages").iter().map(StageStat::from_value).collect(),
            samples: array(v, "samples")
                .iter()
                .map(ResourceSample::from_value)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_generated_run_document() {
        let v = json!({
            "version": "1",
            "started_at": "2024-05-01T10:00:00Z",
            "ended_at": "2024-05-01T10:00:02Z",
            "wall_time_ms": 1834.25,
            "rows": 120000,
            "input_bytes": 7340032,
            "throughput_input_mb_s": 3.816,
            "rss_peak_mb": 0.0,
            "errors": 0,
            "cache_hit_pct": null,
            "stages": [{"name": "read_chunks", "calls": 28}, {"name": "tokenize_csv", "calls": 28, "p50_ms": 1.5, "p95_ms": 4.0}],
            "samples": [{"ts_ms": 0, "bytes_in": 0, "rss_mb": 12.5}, {"ts_ms": 100, "bytes_in": 1024, "cpu_pct": 88}]
        });
        let run = RunReport::from_value(&v);
        assert_eq!(run.version.as_deref(), Some("1"));
        assert_eq!(run.rows, Some(120000.0));
        assert_eq!(run.stages.len(), 2);
        assert_eq!(run.stages[0].p95_ms, None);
        assert_eq!(run.stages[1].p95_ms, Some(4.0));
        assert_eq!(run.samples[0].cpu_pct, None);
        assert_eq!(run.samples[1].cpu_pct, Some(88.0));
    }

    #[test]
    fn wrong_shapes_degrade_field_by_field() {
        let v = json!({"rows": "many", "stages": {"name": "x"}, "samples": [7, {"ts_ms": "0"}]});
        let run = RunReport::from_value(&v);
        assert_eq!(run.rows, None);
        assert!(run.stages.is_empty());
        // Non-object samples still count as samples, with every field absent.
        assert_eq!(run.samples, vec![ResourceSample::default(); 2]);
    }
}
