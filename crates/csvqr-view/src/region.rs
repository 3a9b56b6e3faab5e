//! Logical page regions and the surface they are written to.
//!
//! The page template and this crate agree on a fixed set of element ids. Ids are
//! resolved once into [`RegionHandle`]s; a region the page does not carry simply has no
//! handle and every write aimed at it is skipped.

use std::sync::Arc;

use csvqr_metrics::ChartKind;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Region {
    Meta,
    KpiRows,
    KpiCols,
    KpiErrors,
    KpiWall,
    KpiStartEnd,
    KpiMbps,
    KpiBytes,
    KpiRss,
    KpiHeader,
    StagesTable,
    DagOverview,
    DagEdges,
    Chart(ChartKind),
}

impl Region {
    pub const ALL: [Region; 18] = [
        Region::Meta,
        Region::KpiRows,
        Region::KpiCols,
        Region::KpiErrors,
        Region::KpiWall,
        Region::KpiStartEnd,
        Region::KpiMbps,
        Region::KpiBytes,
        Region::KpiRss,
        Region::KpiHeader,
        Region::StagesTable,
        Region::DagOverview,
        Region::DagEdges,
        Region::Chart(ChartKind::Throughput),
        Region::Chart(ChartKind::StageLatency),
        Region::Chart(ChartKind::NullRatio),
        Region::Chart(ChartKind::Memory),
        Region::Chart(ChartKind::Cpu),
    ];

    pub fn id(self, ids: &RegionIds) -> &str {
        match self {
            Region::Meta => &ids.meta,
            Region::KpiRows => &ids.kpi_rows,
            Region::KpiCols => &ids.kpi_cols,
            Region::KpiErrors => &ids.kpi_errors,
            Region::KpiWall => &ids.kpi_wall,
            Region::KpiStartEnd => &ids.kpi_startend,
            Region::KpiMbps => &ids.kpi_mbps,
            Region::KpiBytes => &ids.kpi_bytes,
            Region::KpiRss => &ids.kpi_rss,
            Region::KpiHeader => &ids.kpi_header,
            Region::StagesTable => &ids.stages_table,
            Region::DagOverview => &ids.dag_overview,
            Region::DagEdges => &ids.dag_edges,
            Region::Chart(ChartKind::Throughput) => &ids.chart_throughput,
            Region::Chart(ChartKind::StageLatency) => &ids.chart_stage,
            Region::Chart(ChartKind::NullRatio) => &ids.chart_null,
            Region::Chart(ChartKind::Memory) => &ids.chart_mem,
            Region::Chart(ChartKind::Cpu) => &ids.chart_cpu,
        }
    }
}

/// Element ids the page template uses for each region.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RegionIds {
    pub meta: String,
    pub kpi_rows: String,
    pub kpi_cols: String,
    pub kpi_errors: String,
    pub kpi_wall: String,
    pub kpi_startend: String,
    pub kpi_mbps: String,
    pub kpi_bytes: String,
    pub kpi_rss: String,
    pub kpi_header: String,
    pub stages_table: String,
    pub dag_overview: String,
    pub dag_edges: String,
    pub chart_throughput: String,
    pub chart_stage: String,
    pub chart_null: String,
    pub chart_mem: String,
    pub chart_cpu: String,
}

impl Default for RegionIds {
    fn default() -> Self {
        Self {
            meta: "meta".into(),
            kpi_rows: "kpi-rows".into(),
            kpi_cols: "kpi-cols".into(),
            kpi_errors: "kpi-errors".into(),
            kpi_wall: "kpi-wall".into(),
            kpi_startend: "kpi-startend".into(),
            kpi_mbps: "kpi-mbps".into(),
            kpi_bytes: "kpi-bytes".into(),
            kpi_rss: "kpi-rss".into(),
            kpi_header: "kpi-header".into(),
            stages_table: "stages-table".into(),
            dag_overview: "dag-overview".into(),
            dag_edges: "dag-edges".into(),
            chart_throughput: "chart-throughput".into(),
            chart_stage: "chart-stage".into(),
            chart_null: "chart-null".into(),
            chart_mem: "chart-mem".into(),
            chart_cpu: "chart-cpu".into(),
        }
    }
}

/// Opaque, cheap-to-clone reference to a region that exists on the page.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RegionHandle {
    region: Region,
    id: Arc<str>,
}

impl RegionHandle {
    pub fn region(&self) -> Region {
        self.region
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TableRow {
    Cells { cells: Vec<String> },
    /// A single cell spanning the whole row.
    Note { text: String, colspan: u32 },
}

/// What a region shows after a write replaces its previous content.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RegionContent {
    Text(String),
    TableRows(Vec<TableRow>),
    ListItems(Vec<String>),
    /// A chart the engine finished drawing, described by the spec it drew.
    Chart(Value),
}

impl RegionContent {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RegionContent::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// The page as seen by the populator and the chart adapter.
pub trait Surface {
    fn has_region(&self, id: &str) -> bool;
    /// Laid-out width of the region; 0 while it is hidden or not yet painted.
    fn measure_width(&self, target: &RegionHandle) -> f64;
    fn write(&mut self, target: &RegionHandle, content: RegionContent);
}

/// Handles for every region the page carries, resolved once at boot.
#[derive(Clone, Debug, Default)]
pub struct RegionRegistry {
    handles: HashMap<Region, RegionHandle>,
}

impl RegionRegistry {
    pub fn resolve(ids: &RegionIds, surface: &dyn Surface) -> Self {
        let mut handles = HashMap::new();
        for region in Region::ALL {
            let id = region.id(ids);
            if surface.has_region(id) {
                handles.insert(
                    region,
                    RegionHandle {
                        region,
                        id: Arc::from(id),
                    },
                );
            } else {
                log::trace!(target: "populate", "region #{} not on page", id);
            }
        }
        Self { handles }
    }

    #[inline]
    pub fn get(&self, region: Region) -> Option<&RegionHandle> {
        self.handles.get(&region)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

#[derive(Clone, Debug, Default)]
struct RegionSlot {
    width: f64,
    content: Option<RegionContent>,
    writes: u32,
}

/// In-memory page used for headless rendering and tests.
#[derive(Clone, Debug, Default)]
pub struct MemorySurface {
    slots: HashMap<String, RegionSlot>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// A page carrying every region in `ids`, all laid out at `width`.
    pub fn with_regions(ids: &RegionIds, width: f64) -> Self {
        let mut s = Self::new();
        for region in Region::ALL {
            s.add_region(region.id(ids), width);
        }
        s
    }

    pub fn add_region(&mut self, id: &str, width: f64) {
        self.slots.entry(id.to_string()).or_default().width = width;
    }

    pub fn remove_region(&mut self, id: &str) {
        self.slots.remove(id);
    }

    pub fn set_width(&mut self, id: &str, width: f64) {
        if let Some(slot) = self.slots.get_mut(id) {
            slot.width = width;
        }
    }

    pub fn set_all_widths(&mut self, width: f64) {
        for slot in self.slots.values_mut() {
            slot.width = width;
        }
    }

    pub fn content(&self, id: &str) -> Option<&RegionContent> {
        self.slots.get(id).and_then(|s| s.content.as_ref())
    }

    pub fn text(&self, id: &str) -> Option<&str> {
        self.content(id).and_then(RegionContent::as_text)
    }

    pub fn writes(&self, id: &str) -> u32 {
        self.slots.get(id).map_or(0, |s| s.writes)
    }

    /// Region ids in sorted order with their current content.
    pub fn regions(&self) -> Vec<(&str, Option<&RegionContent>)> {
        let mut out: Vec<_> = self
            .slots
            .iter()
            .map(|(id, slot)| (id.as_str(), slot.content.as_ref()))
            .collect();
        out.sort_by(|a, b| a.0.cmp(b.0));
        out
    }
}

impl Surface for MemorySurface {
    fn has_region(&self, id: &str) -> bool {
        self.slots.contains_key(id)
    }

    fn measure_width(&self, target: &RegionHandle) -> f64 {
        self.slots.get(target.id()).map_or(0.0, |s| s.width)
    }

    fn write(&mut self, target: &RegionHandle, content: RegionContent) {
        if let Some(slot) = self.slots.get_mut(target.id()) {
            slot.content = Some(content);
            slot.writes += 1;
        }
    }
}
