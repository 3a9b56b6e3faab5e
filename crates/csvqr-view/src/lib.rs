//! Page regions, value formatting, chart specs, and the chart engine adapter.
#![forbid(unsafe_code)]

pub mod chart;
pub mod format;
pub mod pass;
pub mod populate;
pub mod region;
pub mod spec;

pub use chart::{
    CHARTS_UNAVAILABLE, ChartAdapter, ChartSink, Completion, DrainReport, NullSink,
    RENDER_FAILED, RenderError, RenderOutcome, RenderStep,
};
pub use pass::{DeferredChart, PassReport, render_charts};
pub use populate::{DashboardView, populate};
pub use region::{
    MemorySurface, Region, RegionContent, RegionHandle, RegionIds, RegionRegistry, Surface,
    TableRow,
};
pub use spec::{ChartPlan, ChartSpec, LayoutConfig, plan_chart};
