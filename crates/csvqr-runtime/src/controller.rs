//! Dashboard lifecycle.
//!
//! ```text
//! Booting -> RenderedOnce -> Idle
//!                         -> ChartsPending { attempts } -> Idle    (engine appeared)
//!                                                       -> GaveUp  (attempts exhausted)
//! ```
//! Resizes are debounced and re-render charts only; they never change the state.

use std::sync::Arc;

use csvqr_model::{DocumentSet, DocumentSource};
use csvqr_view::{
    ChartAdapter, ChartSink, DrainReport, PassReport, Region, RegionRegistry, Surface, populate,
    render_charts,
};
use serde::Serialize;

use crate::config::DashConfig;
use crate::event::{Event, EventEnvelope, EventQueue};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ControllerState {
    Booting,
    RenderedOnce,
    /// Engine missing at boot; polling. `attempts` polls have failed so far.
    ChartsPending { attempts: u32 },
    Idle,
    /// Polling ran out. Placeholders stay; resizes still re-run the pass.
    GaveUp,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ControllerStats {
    pub passes: u32,
    pub polls: u32,
    pub resizes: u32,
    pub resize_renders: u32,
    pub deferred_frames: u32,
    pub rendered: usize,
    pub failed: usize,
    pub stale: usize,
}

impl ControllerStats {
    fn absorb(&mut self, r: DrainReport) {
        self.rendered += r.rendered;
        self.failed += r.failed;
        self.stale += r.stale;
    }
}

pub struct Controller<S: Surface> {
    state: ControllerState,
    queue: EventQueue,
    docs: Arc<DocumentSet>,
    regions: RegionRegistry,
    surface: S,
    adapter: ChartAdapter,
    config: DashConfig,
    generation: u64,
    resize_token: u64,
    stats: ControllerStats,
}

impl<S: Surface> Controller<S> {
    pub fn new(surface: S, sink: Box<dyn ChartSink>, config: DashConfig) -> Self {
        let adapter = ChartAdapter::new(sink, config.layout.fallback_width);
        Self {
            state: ControllerState::Booting,
            queue: EventQueue::new(),
            docs: Arc::new(DocumentSet::default()),
            regions: RegionRegistry::default(),
            surface,
            adapter,
            config,
            generation: 0,
            resize_token: 0,
            stats: ControllerStats::default(),
        }
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn stats(&self) -> ControllerStats {
        self.stats
    }

    pub fn now_ms(&self) -> u64 {
        self.queue.now()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn documents(&self) -> &Arc<DocumentSet> {
        &self.docs
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// No timers left to fire.
    pub fn is_quiet(&self) -> bool {
        self.queue.is_empty()
    }

    /// Decodes the documents, fills every region, and makes the first chart pass.
    pub fn boot(&mut self, source: &dyn DocumentSource) {
        self.state = ControllerState::Booting;
        self.docs = Arc::new(DocumentSet::load(source, &self.config.blocks));
        self.regions = RegionRegistry::resolve(&self.config.regions, &self.surface);
        log::info!(
            target: "controller",
            "boot: {} of {} regions present, {} samples, {} stages",
            self.regions.len(),
            Region::ALL.len(),
            self.docs.run.samples.len(),
            self.docs.run.stages.len()
        );

        populate(
            &self.docs,
            &self.regions,
            &mut self.surface,
            self.config.layout.edge_display_limit,
        );
        self.state = ControllerState::RenderedOnce;

        let report = self.chart_pass();
        if report.engine_available {
            self.state = ControllerState::Idle;
        } else {
            log::info!(target: "controller", "chart engine not loaded; polling");
            self.state = ControllerState::ChartsPending { attempts: 0 };
            self.queue.emit_after(
                self.config.timing.poll_interval_ms,
                Event::PollEngine { attempt: 1 },
            );
        }
        self.drain();
    }

    /// Records a viewport resize. Charts re-render once resizes stop for the debounce
    /// interval.
    pub fn notify_resize(&mut self) {
        if matches!(
            self.state,
            ControllerState::Booting | ControllerState::RenderedOnce
        ) {
            return;
        }
        self.stats.resizes += 1;
        self.resize_token += 1;
        self.queue.emit_after(
            self.config.timing.resize_debounce_ms,
            Event::ResizeSettled {
                token: self.resize_token,
            },
        );
    }

    /// Handles everything due now, then applies finished renders.
    pub fn step(&mut self) {
        while let Some(env) = self.queue.pop_ready() {
            self.handle_event(env);
            self.drain();
        }
        self.drain();
    }

    /// Runs the clock forward by `ms`, firing timers in order.
    pub fn advance_by(&mut self, ms: u64) {
        let until = self.queue.now().saturating_add(ms);
        self.step();
        while let Some(due) = self.queue.next_due().filter(|&t| t <= until) {
            self.queue.advance_to(due);
            self.step();
        }
        self.queue.advance_to(until);
    }

    /// Runs until no timers remain or `limit_ms` passes. Returns the time advanced.
    pub fn settle(&mut self, limit_ms: u64) -> u64 {
        let start = self.queue.now();
        let until = start.saturating_add(limit_ms);
        self.step();
        while let Some(due) = self.queue.next_due().filter(|&t| t <= until) {
            self.queue.advance_to(due);
            self.step();
        }
        self.queue.now() - start
    }

    /// Applies render outcomes that have arrived since the last call.
    pub fn drain(&mut self) -> DrainReport {
        let report = self.adapter.drain_completions(&mut self.surface);
        self.stats.absorb(report);
        report
    }

    fn handle_event(&mut self, env: EventEnvelope) {
        log::trace!(
            target: "controller",
            "[{}ms] {} #{}",
            env.at_ms,
            env.kind.name(),
            env.id
        );
        match env.kind {
            Event::PollEngine { attempt } => self.poll_engine(attempt),
            Event::ResizeSettled { token } => {
                if token != self.resize_token {
                    return;
                }
                log::debug!(target: "controller", "resize settled; re-rendering charts");
                self.stats.resize_renders += 1;
                self.chart_pass();
            }
            Event::AnimationFrame { chart } => {
                self.stats.deferred_frames += 1;
                let Some(target) = self.regions.get(Region::Chart(chart.kind)) else {
                    return;
                };
                self.adapter
                    .render_now(&mut self.surface, target, &chart.spec, chart.generation);
            }
        }
    }

    fn poll_engine(&mut self, attempt: u32) {
        if !matches!(self.state, ControllerState::ChartsPending { .. }) {
            return;
        }
        self.stats.polls += 1;
        if self.adapter.engine_available() {
            log::info!(
                target: "controller",
                "chart engine loaded after {} polls",
                attempt
            );
            self.state = ControllerState::Idle;
            self.chart_pass();
        } else if attempt >= self.config.timing.poll_max_attempts {
            log::info!(
                target: "controller",
                "chart engine still missing after {} polls; giving up",
                attempt
            );
            self.state = ControllerState::GaveUp;
        } else {
            self.state = ControllerState::ChartsPending { attempts: attempt };
            self.queue.emit_after(
                self.config.timing.poll_interval_ms,
                Event::PollEngine {
                    attempt: attempt + 1,
                },
            );
        }
    }

    fn chart_pass(&mut self) -> PassReport {
        self.generation += 1;
        self.stats.passes += 1;
        let mut report = render_charts(
            &self.docs,
            &self.regions,
            &mut self.surface,
            &mut self.adapter,
            &self.config.layout,
            self.generation,
        );
        for chart in report.deferred.drain(..) {
            self.queue
                .emit_after(self.config.timing.frame_ms, Event::AnimationFrame { chart });
        }
        report
    }
}
