//! One chart render pass over all five chart regions.

use csvqr_metrics::{ChartKind, derive_all};
use csvqr_model::DocumentSet;

use crate::chart::{CHARTS_UNAVAILABLE, ChartAdapter, RenderStep};
use crate::region::{Region, RegionRegistry, Surface};
use crate::spec::{ChartPlan, ChartSpec, LayoutConfig, plan_chart};

/// A chart waiting for its region to get a width.
#[derive(Clone, Debug, PartialEq)]
pub struct DeferredChart {
    pub kind: ChartKind,
    pub spec: ChartSpec,
    pub generation: u64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PassReport {
    pub generation: u64,
    pub engine_available: bool,
    pub submitted: usize,
    pub placeholders: usize,
    pub deferred: Vec<DeferredChart>,
}

/// Derives every chart from `docs` and renders them in declared order.
///
/// With no engine loaded, every chart region shows [`CHARTS_UNAVAILABLE`] and nothing
/// is derived.
pub fn render_charts(
    docs: &DocumentSet,
    regions: &RegionRegistry,
    surface: &mut dyn Surface,
    adapter: &mut ChartAdapter,
    layout: &LayoutConfig,
    generation: u64,
) -> PassReport {
    let mut report = PassReport {
        generation,
        engine_available: adapter.engine_available(),
        ..Default::default()
    };

    if !report.engine_available {
        for kind in ChartKind::ALL {
            if let Some(target) = regions.get(Region::Chart(kind)) {
                if adapter.show_placeholder(surface, target, CHARTS_UNAVAILABLE, generation) {
                    report.placeholders += 1;
                }
            }
        }
        return report;
    }

    let derived = derive_all(docs);
    for kind in ChartKind::ALL {
        let target = regions.get(Region::Chart(kind));
        match plan_chart(kind, &derived, layout) {
            ChartPlan::Placeholder(text) => {
                if let Some(target) = target {
                    if adapter.show_placeholder(surface, target, text, generation) {
                        report.placeholders += 1;
                    }
                }
            }
            ChartPlan::Render(spec) => match adapter.render(surface, target, &spec, generation) {
                RenderStep::Submitted => report.submitted += 1,
                RenderStep::Deferred => report.deferred.push(DeferredChart {
                    kind,
                    spec,
                    generation,
                }),
                RenderStep::Unavailable => report.placeholders += 1,
                RenderStep::Skipped => {}
            },
        }
    }
    log::debug!(
        target: "charts",
        "pass {}: {} submitted, {} deferred, {} placeholders",
        generation,
        report.submitted,
        report.deferred.len(),
        report.placeholders
    );
    report
}
