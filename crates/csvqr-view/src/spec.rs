//! Declarative chart specifications (Vega-Lite v5 shape) built from derived rows.

use csvqr_metrics::{ChartKind, DerivedCharts, Series};
use serde::Deserialize;
use serde_json::{Value, json};

const SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutConfig {
    /// Width forced on a chart whose container still measures 0 at render time.
    pub fallback_width: f64,
    pub line_chart_height: u32,
    pub bar_chart_height: u32,
    /// How many DAG edges the edge list shows.
    pub edge_display_limit: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            fallback_width: 640.0,
            line_chart_height: 160,
            bar_chart_height: 180,
            edge_display_limit: 20,
        }
    }
}

/// A chart specification handed to the engine. Width is `"container"` unless forced.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartSpec {
    kind: ChartKind,
    body: Value,
}

impl ChartSpec {
    pub fn kind(&self) -> ChartKind {
        self.kind
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    pub fn into_body(self) -> Value {
        self.body
    }

    pub fn width(&self) -> Option<&Value> {
        self.body.get("width")
    }

    /// Deep copy with a fixed pixel width; the original is left untouched.
    pub fn with_fixed_width(&self, width: f64) -> ChartSpec {
        let mut body = self.body.clone();
        if let Some(obj) = body.as_object_mut() {
            obj.insert("width".to_string(), json!(width));
        }
        ChartSpec {
            kind: self.kind,
            body,
        }
    }

    pub fn row_count(&self) -> usize {
        self.body
            .pointer("/data/values")
            .and_then(Value::as_array)
            .map_or(0, Vec::len)
    }
}

/// What one chart region gets in a render pass.
#[derive(Clone, Debug, PartialEq)]
pub enum ChartPlan {
    Render(ChartSpec),
    Placeholder(&'static str),
}

fn line_spec(values: Value, height: u32, y_field: &str, y_title: &str, y_format: &str) -> Value {
    json!({
        "$schema": SCHEMA,
        "width": "container",
        "height": height,
        "data": { "values": values },
        "mark": { "type": "line", "interpolate": "monotone" },
        "encoding": {
            "x": { "field": "t", "type": "quantitative", "title": "time (s)" },
            "y": { "field": y_field, "type": "quantitative", "title": y_title },
            "tooltip": [
                { "field": "t", "title": "s", "format": ".3f" },
                { "field": y_field, "title": y_title, "format": y_format }
            ]
        }
    })
}

fn plan<T: serde::Serialize>(
    kind: ChartKind,
    series: &Series<T>,
    build: impl FnOnce(Value) -> Value,
) -> ChartPlan {
    match series {
        Series::Rows(rows) => ChartPlan::Render(ChartSpec {
            kind,
            body: build(json!(rows)),
        }),
        Series::Placeholder(p) => ChartPlan::Placeholder(p),
    }
}

pub fn plan_chart(kind: ChartKind, derived: &DerivedCharts, layout: &LayoutConfig) -> ChartPlan {
    let line_h = layout.line_chart_height;
    let bar_h = layout.bar_chart_height;
    match kind {
        ChartKind::Throughput => plan(kind, &derived.throughput, |v| {
            line_spec(v, line_h, "mbps", "MB/s", ".2f")
        }),
        ChartKind::StageLatency => plan(kind, &derived.stage_latency, |v| {
            json!({
                "$schema": SCHEMA,
                "width": "container",
                "height": bar_h,
                "data": { "values": v },
                "mark": "bar",
                "encoding": {
                    "x": { "field": "name", "type": "nominal", "title": null },
                    "y": { "field": "v", "type": "quantitative", "title": "p95 (ms)" },
                    "tooltip": [
                        { "field": "name", "title": "stage" },
                        { "field": "v", "title": "p95 (ms)", "format": ".3f" },
                        { "field": "calls", "title": "calls" }
                    ]
                }
            })
        }),
        ChartKind::NullRatio => plan(kind, &derived.null_ratio, |v| {
            json!({
                "$schema": SCHEMA,
                "width": "container",
                "height": bar_h,
                "data": { "values": v },
                "mark": "bar",
                "encoding": {
                    "x": { "field": "name", "type": "nominal", "title": null },
                    "y": {
                        "field": "ratio", "type": "quantitative", "title": "null ratio",
                        "axis": { "format": ".0%" }
                    },
                    "tooltip": [
                        { "field": "name", "title": "column" },
                        { "field": "ratio", "title": "null ratio", "format": ".1%" },
                        { "field": "null_count", "title": "nulls" },
                        { "field": "non_null_count", "title": "non-nulls" }
                    ]
                }
            })
        }),
        ChartKind::Memory => plan(kind, &derived.memory, |v| {
            line_spec(v, line_h, "value", "RSS (MB)", ".2f")
        }),
        ChartKind::Cpu => plan(kind, &derived.cpu, |v| {
            line_spec(v, line_h, "value", "CPU (%)", ".1f")
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use csvqr_metrics::derive_all;
    use csvqr_model::DocumentSet;

    #[test]
    fn fixed_width_copy_leaves_original_alone() {
        let mut docs = DocumentSet::default();
        docs.run.stages = vec![Default::default()];
        let derived = derive_all(&docs);
        let ChartPlan::Render(spec) =
            plan_chart(ChartKind::StageLatency, &derived, &LayoutConfig::default())
        else {
            panic!("expected a spec");
        };
        let fixed = spec.with_fixed_width(640.0);
        assert_eq!(spec.width(), Some(&json!("container")));
        assert_eq!(fixed.width(), Some(&json!(640.0)));
        assert_eq!(fixed.row_count(), 1);
        assert_eq!(fixed.body()["data"]["values"][0]["name"], "(unnamed)");
    }

    #[test]
    fn empty_series_plan_placeholders() {
        let derived = derive_all(&DocumentSet::default());
        let layout = LayoutConfig::default();
        for kind in ChartKind::ALL {
            assert!(matches!(
                plan_chart(kind, &derived, &layout),
                ChartPlan::Placeholder(_)
            ));
        }
    }
}
