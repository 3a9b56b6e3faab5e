//! Non-chart regions: meta line, KPIs, stage table, DAG summary.

use csvqr_model::DocumentSet;

use crate::format::{DASH, fixed_or_dash, fixed_or_zero, grouped, megabytes, number};
use crate::region::{Region, RegionContent, RegionRegistry, Surface, TableRow};

pub const NO_STAGES_RECORDED: &str = "No stages recorded.";
pub const NO_EDGES: &str = "No edges";

const STAGE_TABLE_COLUMNS: u32 = 4;

/// Display values for every non-chart region, computed up front from the documents.
#[derive(Clone, Debug, PartialEq)]
pub struct DashboardView {
    texts: Vec<(Region, String)>,
    stage_rows: Vec<TableRow>,
    edge_items: Vec<String>,
}

impl DashboardView {
    pub fn new(docs: &DocumentSet, edge_limit: usize) -> Self {
        let run = &docs.run;
        let ds = &docs.profile.dataset;

        let source = ds.source_path.as_deref().unwrap_or("(unknown)");
        let rows = run.rows.unwrap_or(0.0);
        let cols = docs.profile.column_count();

        let mut texts = Vec::with_capacity(11);
        texts.push((
            Region::Meta,
            format!(
                "Source: {} • Rows: {} • Cols: {}",
                source,
                number(rows),
                number(cols)
            ),
        ));
        texts.push((Region::KpiRows, grouped(rows)));
        texts.push((
            Region::KpiCols,
            if cols > 0.0 {
                format!("{} columns", number(cols))
            } else {
                DASH.to_string()
            },
        ));
        texts.push((Region::KpiErrors, number(run.errors.unwrap_or(0.0))));
        texts.push((Region::KpiWall, fixed_or_zero(run.wall_time_ms, 3)));
        texts.push((
            Region::KpiStartEnd,
            match (&run.started_at, &run.ended_at) {
                (Some(s), Some(e)) => format!("{} → {}", s, e),
                _ => DASH.to_string(),
            },
        ));
        texts.push((Region::KpiMbps, fixed_or_zero(run.throughput_input_mb_s, 3)));
        let bytes = run.input_bytes.unwrap_or(0.0);
        texts.push((
            Region::KpiBytes,
            if bytes != 0.0 {
                format!("{} ({} bytes)", megabytes(bytes), grouped(bytes))
            } else {
                DASH.to_string()
            },
        ));
        texts.push((Region::KpiRss, fixed_or_zero(run.rss_peak_mb, 2)));
        texts.push((
            Region::KpiHeader,
            if ds.header_present { "Yes" } else { "No" }.to_string(),
        ));

        let stage_rows = if run.stages.is_empty() {
            vec![TableRow::Note {
                text: NO_STAGES_RECORDED.to_string(),
                colspan: STAGE_TABLE_COLUMNS,
            }]
        } else {
            run.stages
                .iter()
                .map(|s| TableRow::Cells {
                    cells: vec![
                        s.name.clone().unwrap_or_else(|| "(unnamed)".to_string()),
                        number(s.calls.unwrap_or(0.0)),
                        fixed_or_dash(s.p50_ms, 3),
                        fixed_or_dash(s.p95_ms, 3),
                    ],
                })
                .collect()
        };

        let dag = &docs.dag;
        texts.push((
            Region::DagOverview,
            format!("{} nodes • {} edges", dag.nodes.len(), dag.edges.len()),
        ));
        let edge_items = if dag.edges.is_empty() {
            vec![NO_EDGES.to_string()]
        } else {
            dag.edges
                .iter()
                .take(edge_limit)
                .map(|e| {
                    format!(
                        "{} → {}",
                        e.from.as_deref().unwrap_or("?"),
                        e.to.as_deref().unwrap_or("?")
                    )
                })
                .collect()
        };

        Self {
            texts,
            stage_rows,
            edge_items,
        }
    }

    pub fn text(&self, region: Region) -> Option<&str> {
        self.texts
            .iter()
            .find(|(r, _)| *r == region)
            .map(|(_, t)| t.as_str())
    }

    pub fn stage_rows(&self) -> &[TableRow] {
        &self.stage_rows
    }

    pub fn edge_items(&self) -> &[String] {
        &self.edge_items
    }

    /// Writes every value whose region exists. Returns how many regions were written.
    pub fn write(&self, regions: &RegionRegistry, surface: &mut dyn Surface) -> usize {
        let mut written = 0;
        let mut put = |region: Region, content: RegionContent| {
            if let Some(target) = regions.get(region) {
                surface.write(target, content);
                written += 1;
            }
        };
        for (region, text) in &self.texts {
            put(*region, RegionContent::Text(text.clone()));
        }
        put(
            Region::StagesTable,
            RegionContent::TableRows(self.stage_rows.clone()),
        );
        put(
            Region::DagEdges,
            RegionContent::ListItems(self.edge_items.clone()),
        );
        written
    }
}

/// Fills the non-chart regions from `docs`.
pub fn populate(
    docs: &DocumentSet,
    regions: &RegionRegistry,
    surface: &mut dyn Surface,
    edge_limit: usize,
) -> usize {
    let view = DashboardView::new(docs, edge_limit);
    let written = view.write(regions, surface);
    log::debug!(target: "populate", "wrote {} regions", written);
    written
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::{MemorySurface, RegionIds};
    use csvqr_model::{BlockIds, DagEdge};
    use serde_json::json;
    use std::collections::HashMap;

    fn page() -> (MemorySurface, RegionRegistry) {
        let ids = RegionIds::default();
        let page = MemorySurface::with_regions(&ids, 800.0);
        let reg = RegionRegistry::resolve(&ids, &page);
        (page, reg)
    }

    #[test]
    fn malformed_documents_render_placeholders() {
        let mut src = HashMap::new();
        for id in ["run_json", "profile_json", "dag_json"] {
            src.insert(id.to_string(), "{not json".to_string());
        }
        let docs = DocumentSet::load(&src, &BlockIds::default());
        let (mut page, reg) = page();
        let written = populate(&docs, &reg, &mut page, 20);
        assert_eq!(written, 13);

        assert_eq!(page.text("meta"), Some("Source: (unknown) • Rows: 0 • Cols: 0"));
        assert_eq!(page.text("kpi-rows"), Some("0"));
        assert_eq!(page.text("kpi-cols"), Some(DASH));
        assert_eq!(page.text("kpi-errors"), Some("0"));
        assert_eq!(page.text("kpi-wall"), Some("0.000"));
        assert_eq!(page.text("kpi-startend"), Some(DASH));
        assert_eq!(page.text("kpi-mbps"), Some("0.000"));
        assert_eq!(page.text("kpi-bytes"), Some(DASH));
        assert_eq!(page.text("kpi-rss"), Some("0.00"));
        assert_eq!(page.text("kpi-header"), Some("No"));
        assert_eq!(page.text("dag-overview"), Some("0 nodes • 0 edges"));
        assert_eq!(
            page.content("stages-table"),
            Some(&RegionContent::TableRows(vec![TableRow::Note {
                text: NO_STAGES_RECORDED.into(),
                colspan: 4
            }]))
        );
        assert_eq!(
            page.content("dag-edges"),
            Some(&RegionContent::ListItems(vec![NO_EDGES.into()]))
        );
    }

    #[test]
    fn full_documents_render_formatted_kpis() {
        let docs = DocumentSet::from_values(
            &json!({
                "rows": 1234567, "errors": 2, "wall_time_ms": 1834.25,
                "started_at": "2024-05-01T10:00:00Z", "ended_at": "2024-05-01T10:00:02Z",
                "throughput_input_mb_s": 3.8166, "input_bytes": 7340032, "rss_peak_mb": 41.456,
                "stages": [
                    {"name": "read_chunks", "calls": 28},
                    {"name": "tokenize_csv", "calls": 28, "p50_ms": 1.25, "p95_ms": "slow"}
                ]
            }),
            &json!({"dataset": {"columns": 6, "header_present": true, "source_path": "in.csv"}}),
            &json!({"nodes": [{}, {}], "edges": [{"from": "n1", "to": "n2"}]}),
        );
        let view = DashboardView::new(&docs, 20);
        assert_eq!(view.text(Region::Meta), Some("Source: in.csv • Rows: 1234567 • Cols: 6"));
        assert_eq!(view.text(Region::KpiRows), Some("1,234,567"));
        assert_eq!(view.text(Region::KpiCols), Some("6 columns"));
        assert_eq!(view.text(Region::KpiErrors), Some("2"));
        assert_eq!(view.text(Region::KpiWall), Some("1834.250"));
        assert_eq!(
            view.text(Region::KpiStartEnd),
            Some("2024-05-01T10:00:00Z → 2024-05-01T10:00:02Z")
        );
        assert_eq!(view.text(Region::KpiMbps), Some("3.817"));
        assert_eq!(view.text(Region::KpiBytes), Some("7.00 MB (7,340,032 bytes)"));
        assert_eq!(view.text(Region::KpiRss), Some("41.46"));
        assert_eq!(view.text(Region::KpiHeader), Some("Yes"));
        assert_eq!(
            view.stage_rows(),
            &[
                TableRow::Cells {
                    cells: vec!["read_chunks".into(), "28".into(), DASH.into(), DASH.into()]
                },
                TableRow::Cells {
                    cells: vec!["tokenize_csv".into(), "28".into(), "1.250".into(), DASH.into()]
                },
            ]
        );
        assert_eq!(view.edge_items(), &["n1 → n2".to_string()]);
    }

    #[test]
    fn edge_list_is_capped_but_count_is_not() {
        let mut docs = DocumentSet::default();
        docs.dag.edges = (0..25)
            .map(|i| DagEdge {
                from: Some(format!("n{}", i)),
                to: Some(format!("n{}", i + 1)),
            })
            .collect();
        let view = DashboardView::new(&docs, 20);
        assert_eq!(view.edge_items().len(), 20);
        assert_eq!(view.text(Region::DagOverview), Some("0 nodes • 25 edges"));
    }

    #[test]
    fn edges_missing_an_endpoint_show_question_marks() {
        let mut docs = DocumentSet::default();
        docs.dag.edges = vec![
            DagEdge { from: Some("read".into()), to: None },
            DagEdge { from: None, to: Some("parse".into()) },
            DagEdge { from: None, to: None },
        ];
        let view = DashboardView::new(&docs, 20);
        assert_eq!(
            view.edge_items(),
            &["read → ?".to_string(), "? → parse".to_string(), "? → ?".to_string()]
        );
    }

    #[test]
    fn fractional_column_count_is_shown_as_declared() {
        let docs = DocumentSet::from_values(
            &json!({}),
            &json!({"dataset": {"columns": 2.5}}),
            &json!({}),
        );
        let view = DashboardView::new(&docs, 20);
        assert_eq!(view.text(Region::KpiCols), Some("2.5 columns"));
        assert_eq!(view.text(Region::Meta), Some("Source: (unknown) • Rows: 0 • Cols: 2.5"));
    }

    #[test]
    fn missing_regions_are_skipped() {
        let ids = RegionIds::default();
        let mut page = MemorySurface::new();
        page.add_region("kpi-rows", 100.0);
        let reg = RegionRegistry::resolve(&ids, &page);
        let written = populate(&DocumentSet::default(), &reg, &mut page, 20);
        assert_eq!(written, 1);
        assert_eq!(page.text("kpi-rows"), Some("0"));
    }
}
