//! Relative sample times in seconds.

use csvqr_model::ResourceSample;

/// Shortest span the synthesized timeline may cover, in seconds.
pub const MIN_SPAN_SECS: f64 = 0.001;

/// Maps raw sample timestamps to seconds since the first sample.
///
/// The output has one entry per input. When every timestamp is finite and they are not
/// all equal, times are offsets from the minimum. Otherwise (any timestamp absent or
/// non-finite, or all identical) an evenly spaced timeline over the run's wall time is
/// synthesized so the charts stay plottable.
pub fn normalize(ts_ms: &[Option<f64>], wall_time_ms: Option<f64>) -> Vec<f64> {
    let n = ts_ms.len();
    if n == 0 {
        return Vec::new();
    }

    let finite: Option<Vec<f64>> = ts_ms
        .iter()
        .map(|t| t.filter(|v| v.is_finite()))
        .collect();

    if let Some(ts) = finite {
        let min = ts.iter().copied().fold(f64::INFINITY, f64::min);
        let max = ts.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        // A span that overflows f64 cannot be scaled; treat it like unusable stamps.
        if max > min && (max - min).is_finite() {
            return ts.iter().map(|&t| ((t - min) / 1000.0).max(0.0)).collect();
        }
    }

    synthesize(n, wall_time_ms)
}

pub fn normalize_samples(samples: &[ResourceSample], wall_time_ms: Option<f64>) -> Vec<f64> {
    let ts: Vec<Option<f64>> = samples.iter().map(|s| s.ts_ms).collect();
    normalize(&ts, wall_time_ms)
}

fn synthesize(n: usize, wall_time_ms: Option<f64>) -> Vec<f64> {
    let wall = wall_time_ms.filter(|w| w.is_finite()).unwrap_or(0.0);
    let span = (wall / 1000.0).max(MIN_SPAN_SECS);
    if n == 1 {
        return vec![span];
    }
    let step = span / (n - 1) as f64;
    (0..n).map(|i| i as f64 * step).collect()
}
