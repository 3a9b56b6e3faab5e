use serde::Serialize;

/// Output of one deriver: rows for the chart, or the text shown in its place.
#[derive(Clone, Debug, PartialEq)]
pub enum Series<T> {
    Rows(Vec<T>),
    Placeholder(&'static str),
}

impl<T> Series<T> {
    pub(crate) fn or_placeholder(rows: Vec<T>, placeholder: &'static str) -> Self {
        if rows.is_empty() {
            Series::Placeholder(placeholder)
        } else {
            Series::Rows(rows)
        }
    }

    pub fn rows(&self) -> Option<&[T]> {
        match self {
            Series::Rows(r) => Some(r),
            Series::Placeholder(_) => None,
        }
    }

    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            Series::Rows(_) => None,
            Series::Placeholder(p) => Some(p),
        }
    }

    pub fn len(&self) -> usize {
        self.rows().map_or(0, <[T]>::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ThroughputPoint {
    pub t: f64,
    pub mbps: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StageLatencyRow {
    pub name: String,
    pub v: f64,
    pub calls: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NullRatioRow {
    pub name: String,
    pub ratio: f64,
    pub null_count: f64,
    pub non_null_count: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ResourcePoint {
    pub t: f64,
    pub value: f64,
}

/// The five chart families, in render order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChartKind {
    Throughput,
    StageLatency,
    NullRatio,
    Memory,
    Cpu,
}

impl ChartKind {
    pub const ALL: [ChartKind; 5] = [
        ChartKind::Throughput,
        ChartKind::StageLatency,
        ChartKind::NullRatio,
        ChartKind::Memory,
        ChartKind::Cpu,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ChartKind::Throughput => "throughput",
            ChartKind::StageLatency => "stage",
            ChartKind::NullRatio => "null",
            ChartKind::Memory => "mem",
            ChartKind::Cpu => "cpu",
        }
    }
}
