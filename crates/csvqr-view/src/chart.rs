//! Adapter between the dashboard and an injected chart engine.
//!
//! The engine renders asynchronously: [`ChartSink::render`] starts the work and the
//! sink reports back through the [`Completion`] it was given. Outcomes queue up on a
//! channel and are applied by [`ChartAdapter::drain_completions`].

use crossbeam_channel::{Receiver, Sender, unbounded};
use hashbrown::HashMap;

use crate::region::{Region, RegionContent, RegionHandle, Surface};
use crate::spec::ChartSpec;

pub const CHARTS_UNAVAILABLE: &str = "Charts unavailable (chart engine not loaded).";
pub const RENDER_FAILED: &str = "Failed to render chart.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderError {
    /// The engine refused the specification.
    Rejected(String),
    /// The engine went away before the render finished.
    EngineGone,
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderError::Rejected(msg) => write!(f, "spec rejected: {}", msg),
            RenderError::EngineGone => write!(f, "chart engine unavailable"),
        }
    }
}

impl std::error::Error for RenderError {}

#[derive(Clone, Debug)]
pub struct RenderOutcome {
    pub target: RegionHandle,
    pub generation: u64,
    pub result: Result<ChartSpec, RenderError>,
}

/// Single-use callback a sink fires when one render finishes.
#[derive(Debug)]
pub struct Completion {
    tx: Sender<RenderOutcome>,
    target: RegionHandle,
    generation: u64,
    spec: ChartSpec,
}

impl Completion {
    pub fn target(&self) -> &RegionHandle {
        &self.target
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn succeed(self) {
        self.finish(Ok(()));
    }

    pub fn fail(self, err: RenderError) {
        self.finish(Err(err));
    }

    fn finish(self, result: Result<(), RenderError>) {
        let outcome = RenderOutcome {
            target: self.target,
            generation: self.generation,
            result: result.map(|()| self.spec),
        };
        // The adapter owns the receiver; if it is gone nobody is waiting.
        let _ = self.tx.send(outcome);
    }
}

/// A chart engine. Implementations draw `spec` into `target` and fire `done`.
pub trait ChartSink {
    /// Whether the engine has loaded. Polled while charts are pending.
    fn is_available(&self) -> bool;
    fn render(&mut self, target: &RegionHandle, spec: &ChartSpec, done: Completion);
}

/// Stand-in for an engine that never loads.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl ChartSink for NullSink {
    fn is_available(&self) -> bool {
        false
    }

    fn render(&mut self, _target: &RegionHandle, _spec: &ChartSpec, done: Completion) {
        done.fail(RenderError::EngineGone);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderStep {
    /// Region missing from the page, or the request was from a superseded pass.
    Skipped,
    /// Engine not loaded; the region shows [`CHARTS_UNAVAILABLE`].
    Unavailable,
    /// Region has no width yet; retry on the next frame.
    Deferred,
    /// Handed to the engine; the outcome arrives later.
    Submitted,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrainReport {
    pub rendered: usize,
    pub failed: usize,
    pub stale: usize,
}

pub struct ChartAdapter {
    sink: Box<dyn ChartSink>,
    tx: Sender<RenderOutcome>,
    rx: Receiver<RenderOutcome>,
    fallback_width: f64,
    // Newest pass that targeted each chart region; older outcomes are dropped.
    latest: HashMap<Region, u64>,
}

impl ChartAdapter {
    pub fn new(sink: Box<dyn ChartSink>, fallback_width: f64) -> Self {
        let (tx, rx) = unbounded();
        Self {
            sink,
            tx,
            rx,
            fallback_width,
            latest: HashMap::new(),
        }
    }

    #[inline]
    pub fn engine_available(&self) -> bool {
        self.sink.is_available()
    }

    fn is_stale(&self, region: Region, generation: u64) -> bool {
        self.latest
            .get(&region)
            .is_some_and(|&newest| generation < newest)
    }

    /// Writes placeholder text for pass `generation`, which then supersedes any render
    /// still in flight for that region. Returns false if a newer pass owns the region.
    pub fn show_placeholder(
        &mut self,
        surface: &mut dyn Surface,
        target: &RegionHandle,
        text: &str,
        generation: u64,
    ) -> bool {
        if self.is_stale(target.region(), generation) {
            return false;
        }
        self.latest.insert(target.region(), generation);
        surface.write(target, RegionContent::Text(text.to_string()));
        true
    }

    /// Starts rendering `spec` into `target`, or reports why it cannot yet.
    pub fn render(
        &mut self,
        surface: &mut dyn Surface,
        target: Option<&RegionHandle>,
        spec: &ChartSpec,
        generation: u64,
    ) -> RenderStep {
        let Some(target) = target else {
            return RenderStep::Skipped;
        };
        if self.is_stale(target.region(), generation) {
            return RenderStep::Skipped;
        }
        if !self.engine_available() {
            self.show_placeholder(surface, target, CHARTS_UNAVAILABLE, generation);
            return RenderStep::Unavailable;
        }
        self.latest.insert(target.region(), generation);
        if surface.measure_width(target) <= 0.0 {
            log::trace!(target: "charts", "#{} has no width yet, deferring", target.id());
            return RenderStep::Deferred;
        }
        self.render_now(surface, target, spec, generation)
    }

    /// Submits to the engine without waiting for layout. A region that still has no
    /// width gets a copy of the spec pinned to the fallback width.
    pub fn render_now(
        &mut self,
        surface: &mut dyn Surface,
        target: &RegionHandle,
        spec: &ChartSpec,
        generation: u64,
    ) -> RenderStep {
        if self.is_stale(target.region(), generation) {
            log::debug!(
                target: "charts",
                "#{} dropping deferred render from pass {}",
                target.id(),
                generation
            );
            return RenderStep::Skipped;
        }
        if !self.engine_available() {
            self.show_placeholder(surface, target, CHARTS_UNAVAILABLE, generation);
            return RenderStep::Unavailable;
        }
        self.latest.insert(target.region(), generation);
        let spec = if surface.measure_width(target) <= 0.0 {
            log::debug!(
                target: "charts",
                "#{} still 0 wide, using {}px",
                target.id(),
                self.fallback_width
            );
            spec.with_fixed_width(self.fallback_width)
        } else {
            spec.clone()
        };
        let done = Completion {
            tx: self.tx.clone(),
            target: target.clone(),
            generation,
            spec: spec.clone(),
        };
        self.sink.render(target, &spec, done);
        RenderStep::Submitted
    }

    /// Applies every finished render that has arrived so far.
    pub fn drain_completions(&mut self, surface: &mut dyn Surface) -> DrainReport {
        let mut report = DrainReport::default();
        while let Ok(outcome) = self.rx.try_recv() {
            let RenderOutcome {
                target,
                generation,
                result,
            } = outcome;
            if self.is_stale(target.region(), generation) {
                log::debug!(
                    target: "charts",
                    "#{} ignoring outcome of superseded pass {}",
                    target.id(),
                    generation
                );
                report.stale += 1;
                continue;
            }
            match result {
                Ok(spec) => {
                    surface.write(&target, RegionContent::Chart(spec.into_body()));
                    report.rendered += 1;
                }
                Err(err) => {
                    log::error!(target: "charts", "chart error on #{}: {}", target.id(), err);
                    surface.write(&target, RegionContent::Text(RENDER_FAILED.to_string()));
                    report.failed += 1;
                }
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::{MemorySurface, RegionIds, RegionRegistry};
    use crate::spec::{ChartPlan, LayoutConfig, plan_chart};
    use csvqr_metrics::{ChartKind, derive_all};
    use csvqr_model::DocumentSet;
    use serde_json::{Value, json};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records every spec it is asked to draw and finishes immediately.
    #[derive(Default, Clone)]
    struct Recorder {
        seen: Rc<RefCell<Vec<(String, Value)>>>,
        reject: Option<&'static str>,
    }

    impl ChartSink for Recorder {
        fn is_available(&self) -> bool {
            true
        }

        fn render(&mut self, target: &RegionHandle, spec: &ChartSpec, done: Completion) {
            self.seen
                .borrow_mut()
                .push((target.id().to_string(), spec.body().clone()));
            if Some(target.id()) == self.reject {
                done.fail(RenderError::Rejected("bad encoding".into()));
            } else {
                done.succeed();
            }
        }
    }

    fn stage_spec() -> ChartSpec {
        let mut docs = DocumentSet::default();
        docs.run.stages = vec![Default::default()];
        match plan_chart(
            ChartKind::StageLatency,
            &derive_all(&docs),
            &LayoutConfig::default(),
        ) {
            ChartPlan::Render(s) => s,
            ChartPlan::Placeholder(p) => panic!("unexpected placeholder {}", p),
        }
    }

    fn setup(width: f64) -> (MemorySurface, RegionRegistry) {
        let ids = RegionIds::default();
        let page = MemorySurface::with_regions(&ids, width);
        let reg = RegionRegistry::resolve(&ids, &page);
        (page, reg)
    }

    #[test]
    fn zero_width_region_defers_then_forces_fallback_width() {
        let (mut page, reg) = setup(0.0);
        let rec = Recorder::default();
        let mut adapter = ChartAdapter::new(Box::new(rec.clone()), 640.0);
        let target = reg.get(Region::Chart(ChartKind::StageLatency));
        let spec = stage_spec();

        assert_eq!(
            adapter.render(&mut page, target, &spec, 1),
            RenderStep::Deferred
        );
        assert!(rec.seen.borrow().is_empty());

        let step = adapter.render_now(&mut page, target.unwrap(), &spec, 1);
        assert_eq!(step, RenderStep::Submitted);
        let seen = rec.seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].1["width"], json!(640.0));
    }

    #[test]
    fn measured_region_keeps_container_width() {
        let (mut page, reg) = setup(900.0);
        let rec = Recorder::default();
        let mut adapter = ChartAdapter::new(Box::new(rec.clone()), 640.0);
        let target = reg.get(Region::Chart(ChartKind::StageLatency));
        assert_eq!(
            adapter.render(&mut page, target, &stage_spec(), 1),
            RenderStep::Submitted
        );
        assert_eq!(rec.seen.borrow()[0].1["width"], json!("container"));
        let report = adapter.drain_completions(&mut page);
        assert_eq!(report.rendered, 1);
        assert!(matches!(
            page.content("chart-stage"),
            Some(RegionContent::Chart(_))
        ));
    }

    #[test]
    fn missing_region_is_a_silent_noop() {
        let (mut page, _) = setup(900.0);
        let rec = Recorder::default();
        let mut adapter = ChartAdapter::new(Box::new(rec.clone()), 640.0);
        assert_eq!(
            adapter.render(&mut page, None, &stage_spec(), 1),
            RenderStep::Skipped
        );
        assert!(rec.seen.borrow().is_empty());
    }

    #[test]
    fn absent_engine_writes_unavailable_placeholder() {
        let (mut page, reg) = setup(900.0);
        let mut adapter = ChartAdapter::new(Box::new(NullSink), 640.0);
        let step = adapter.render(
            &mut page,
            reg.get(Region::Chart(ChartKind::StageLatency)),
            &stage_spec(),
            1,
        );
        assert_eq!(step, RenderStep::Unavailable);
        assert_eq!(page.text("chart-stage"), Some(CHARTS_UNAVAILABLE));
    }

    #[test]
    fn failure_is_isolated_to_one_chart() {
        let (mut page, reg) = setup(900.0);
        let rec = Recorder {
            reject: Some("chart-stage"),
            ..Default::default()
        };
        let mut adapter = ChartAdapter::new(Box::new(rec), 640.0);
        let spec = stage_spec();
        adapter.render(&mut page, reg.get(Region::Chart(ChartKind::StageLatency)), &spec, 1);
        adapter.render(&mut page, reg.get(Region::Chart(ChartKind::NullRatio)), &spec, 1);
        let report = adapter.drain_completions(&mut page);
        assert_eq!(report, DrainReport { rendered: 1, failed: 1, stale: 0 });
        assert_eq!(page.text("chart-stage"), Some(RENDER_FAILED));
        assert!(matches!(
            page.content("chart-null"),
            Some(RegionContent::Chart(_))
        ));
    }

    #[test]
    fn placeholder_from_newer_pass_is_not_overwritten() {
        let (mut page, reg) = setup(900.0);
        let mut adapter = ChartAdapter::new(Box::new(Recorder::default()), 640.0);
        let target = reg.get(Region::Chart(ChartKind::StageLatency));
        adapter.render(&mut page, target, &stage_spec(), 1);
        assert!(adapter.show_placeholder(&mut page, target.unwrap(), "No stage metrics.", 2));

        let report = adapter.drain_completions(&mut page);
        assert_eq!(report, DrainReport { rendered: 0, failed: 0, stale: 1 });
        assert_eq!(page.text("chart-stage"), Some("No stage metrics."));
        assert!(!adapter.show_placeholder(&mut page, target.unwrap(), "late", 1));
        assert_eq!(page.text("chart-stage"), Some("No stage metrics."));
    }

    #[test]
    fn outcome_from_older_pass_is_dropped() {
        let (mut page, reg) = setup(900.0);
        let rec = Recorder::default();
        let mut adapter = ChartAdapter::new(Box::new(rec), 640.0);
        let target = reg.get(Region::Chart(ChartKind::StageLatency));
        let spec = stage_spec();
        adapter.render(&mut page, target, &spec, 1);
        adapter.render(&mut page, target, &spec, 2);
        let report = adapter.drain_completions(&mut page);
        assert_eq!(report.stale, 1);
        assert_eq!(report.rendered, 1);
        assert_eq!(page.writes("chart-stage"), 1);
    }
}
