//! Final page dump, one entry per region.

use csvqr_runtime::{ControllerState, ControllerStats};
use csvqr_view::{MemorySurface, RegionContent, TableRow};
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Serialize)]
pub struct PageReport {
    pub state: ControllerState,
    pub elapsed_ms: u64,
    pub stats: ControllerStats,
    pub regions: Map<String, Value>,
    #[serde(skip)]
    lines: Vec<String>,
}

impl PageReport {
    pub fn new(
        page: &MemorySurface,
        state: ControllerState,
        stats: ControllerStats,
        elapsed_ms: u64,
    ) -> Self {
        let mut regions = Map::new();
        let mut lines = Vec::new();
        for (id, content) in page.regions() {
            let value = content
                .and_then(|c| serde_json::to_value(c).ok())
                .unwrap_or(Value::Null);
            regions.insert(id.to_string(), value);
            describe(id, content, &mut lines);
        }
        Self {
            state,
            elapsed_ms,
            stats,
            regions,
            lines,
        }
    }

    pub fn to_text(&self) -> String {
        let mut out = format!(
            "state: {:?} after {} ms ({} passes, {} polls, {} rendered, {} failed, {} stale)\n",
            self.state,
            self.elapsed_ms,
            self.stats.passes,
            self.stats.polls,
            self.stats.rendered,
            self.stats.failed,
            self.stats.stale
        );
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn describe(id: &str, content: Option<&RegionContent>, lines: &mut Vec<String>) {
    match content {
        None => lines.push(format!("{id}: (empty)")),
        Some(RegionContent::Text(t)) => lines.push(format!("{id}: {t}")),
        Some(RegionContent::TableRows(rows)) => {
            lines.push(format!("{id}:"));
            for row in rows {
                match row {
                    TableRow::Cells { cells } => lines.push(format!("  {}", cells.join(" | "))),
                    TableRow::Note { text, .. } => lines.push(format!("  {text}")),
                }
            }
        }
        Some(RegionContent::ListItems(items)) => {
            lines.push(format!("{id}:"));
            for item in items {
                lines.push(format!("  - {item}"));
            }
        }
        Some(RegionContent::Chart(body)) => {
            let rows = body
                .pointer("/data/values")
                .and_then(Value::as_array)
                .map_or(0, Vec::len);
            let mark = body
                .pointer("/mark/type")
                .or_else(|| body.get("mark"))
                .and_then(Value::as_str)
                .unwrap_or("?");
            lines.push(format!("{id}: [{mark} chart, {rows} rows]"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use csvqr_metrics::ChartKind;
    use csvqr_view::{Region, RegionHandle, RegionIds, RegionRegistry, Surface};
    use serde_json::json;

    fn page() -> MemorySurface {
        let mut page = MemorySurface::new();
        for id in ["kpi-rows", "stages-table", "chart-cpu", "dag-edges"] {
            page.add_region(id, 100.0);
        }
        let reg = RegionRegistry::resolve(&RegionIds::default(), &page);
        let handle = |r: Region| -> RegionHandle { reg.get(r).cloned().unwrap() };
        page.write(&handle(Region::KpiRows), RegionContent::Text("1,200".into()));
        page.write(
            &handle(Region::StagesTable),
            RegionContent::TableRows(vec![TableRow::Cells {
                cells: vec!["parse".into(), "4".into()],
            }]),
        );
        page.write(
            &handle(Region::Chart(ChartKind::Cpu)),
            RegionContent::Chart(json!({"mark": {"type": "line"}, "data": {"values": [1, 2, 3]}})),
        );
        page
    }

    #[test]
    fn text_lists_regions_in_id_order() {
        let report = PageReport::new(&page(), ControllerState::Idle, ControllerStats::default(), 0);
        let text = report.to_text();
        let lines: Vec<&str> = text.lines().skip(1).collect();
        assert_eq!(
            lines,
            vec![
                "chart-cpu: [line chart, 3 rows]",
                "dag-edges: (empty)",
                "kpi-rows: 1,200",
                "stages-table:",
                "  parse | 4",
            ]
        );
        assert!(text.starts_with("state: Idle after 0 ms"));
    }

    #[test]
    fn json_carries_state_and_regions() {
        let report = PageReport::new(&page(), ControllerState::GaveUp, ControllerStats::default(), 3200);
        let v: Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(v["state"]["state"], "gave_up");
        assert_eq!(v["elapsed_ms"], 3200);
        assert_eq!(v["regions"]["kpi-rows"], json!({"kind": "text", "value": "1,200"}));
        assert!(v["regions"]["dag-edges"].is_null());
    }
}
