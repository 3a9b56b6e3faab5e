use std::collections::{BTreeMap, VecDeque};

use csvqr_view::DeferredChart;

pub enum Event {
    // Engine availability poll; `attempt` counts from 1
    PollEngine { attempt: u32 },

    // Debounced resize; only the newest token triggers a re-render
    ResizeSettled { token: u64 },

    // Next animation frame for a chart whose region had no width
    AnimationFrame { chart: DeferredChart },
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::PollEngine { .. } => "PollEngine",
            Event::ResizeSettled { .. } => "ResizeSettled",
            Event::AnimationFrame { .. } => "AnimationFrame",
        }
    }
}

pub struct EventEnvelope {
    pub id: u64,
    pub at_ms: u64,
    pub kind: Event,
}

/// Timer queue keyed by virtual milliseconds. Events due at the same instant run FIFO.
pub struct EventQueue {
    by_tick: BTreeMap<u64, VecDeque<EventEnvelope>>,
    now: u64,
    next_id: u64,
}

impl Default for EventQueue {
    fn default() -> Self {
        Self {
            by_tick: BTreeMap::new(),
            now: 0,
            next_id: 1,
        }
    }
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn now(&self) -> u64 {
        self.now
    }

    #[inline]
    fn alloc_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1).max(1);
        id
    }

    pub fn emit_at(&mut self, at_ms: u64, kind: Event) -> u64 {
        let id = self.alloc_id();
        let env = EventEnvelope { id, at_ms, kind };
        self.by_tick.entry(at_ms).or_default().push_back(env);
        id
    }

    pub fn emit_now(&mut self, kind: Event) -> u64 {
        self.emit_at(self.now, kind)
    }

    pub fn emit_after(&mut self, delta_ms: u64, kind: Event) -> u64 {
        self.emit_at(self.now.saturating_add(delta_ms), kind)
    }

    /// Next event due at or before the current time.
    pub fn pop_ready(&mut self) -> Option<EventEnvelope> {
        let mut bucket = self.by_tick.first_entry()?;
        if *bucket.key() > self.now {
            return None;
        }
        let env = bucket.get_mut().pop_front();
        if bucket.get().is_empty() {
            bucket.remove();
        }
        env
    }

    /// Time of the earliest pending event.
    pub fn next_due(&self) -> Option<u64> {
        self.by_tick.keys().next().copied()
    }

    /// Moves the clock forward; never backwards.
    pub fn advance_to(&mut self, at_ms: u64) {
        self.now = self.now.max(at_ms);
    }

    pub fn len(&self) -> usize {
        self.by_tick.values().map(VecDeque::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_tick.is_empty()
    }
}
