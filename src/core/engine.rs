//! Phase engine controller
//!
//! Owns the session state record and the three evaluation stages. One engine
//! per page-view session: construct at session start, drop at teardown.
//! Timestamps are caller-supplied engine-clock milliseconds; scroll
//! notifications and evaluation ticks run on a single logical thread and
//! never preempt each other.

use chrono::Utc;

use crate::core::classifier::Classifier;
use crate::core::landmark::{landmark_visibility, LandmarkDetector};
use crate::core::sampler::Sampler;
use crate::types::{
    EngineConfig, EngineSnapshot, EngineState, EventSink, LandmarkVisibility, NullSink,
    ReasonCode, TickOutput,
};

/// Scroll-driven phase transition engine
pub struct PhaseEngine {
    config: EngineConfig,
    state: EngineState,
    sampler: Sampler,
    classifier: Classifier,
    landmark: LandmarkDetector,
    sink: Box<dyn EventSink>,
}

impl std::fmt::Debug for PhaseEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhaseEngine")
            .field("config", &self.config)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Default for PhaseEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl PhaseEngine {
    /// Create an engine with a no-op event sink
    pub fn new(config: EngineConfig) -> Self {
        Self::with_sink(config, Box::new(NullSink))
    }

    /// Create an engine publishing events to the given sink
    pub fn with_sink(config: EngineConfig, sink: Box<dyn EventSink>) -> Self {
        let state = EngineState::new(&config);
        let sampler = Sampler::new(&config);
        Self {
            config,
            state,
            sampler,
            classifier: Classifier::new(),
            landmark: LandmarkDetector::new(),
            sink,
        }
    }

    /// Feed one scroll notification
    pub fn on_scroll(&mut self, offset: f64, now_ms: f64) {
        if self.config.reduced_motion {
            return;
        }
        self.sampler
            .observe(&mut self.state, offset, now_ms, &self.config);
        tracing::trace!(offset, now_ms, velocity = self.state.velocity, "scroll");
    }

    /// Feed a viewport resize: update the scrollable extent and recompute
    /// the derived progress
    pub fn on_resize(&mut self, scroll_extent: f64) {
        self.state.scroll_extent = scroll_extent.max(0.0);
        self.state.scroll_percent = if self.state.scroll_extent > 0.0 {
            (self.state.last_scroll_y / self.state.scroll_extent).clamp(0.0, 1.0)
        } else {
            0.0
        };
    }

    /// Run one evaluation tick. The driver owns the cadence.
    pub fn tick(&mut self, now_ms: f64) -> TickOutput {
        if self.config.reduced_motion {
            self.state.clock_ms = now_ms;
            return self.output(ReasonCode::R006_REDUCED_MOTION);
        }

        let reason = self
            .classifier
            .evaluate(&mut self.state, now_ms, &self.config, self.sink.as_ref());
        self.landmark
            .check(&mut self.state, now_ms, &self.config, self.sink.as_ref());

        self.output(reason)
    }

    /// Read-only snapshot of the current state.
    ///
    /// Pure read: two snapshots without an intervening scroll event or tick
    /// compare equal.
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot::capture(&self.state, &self.config)
    }

    /// The active configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Named-landmark visibility at the current scroll position
    pub fn landmarks(&self) -> Vec<LandmarkVisibility> {
        landmark_visibility(&self.state, &self.config)
    }

    /// Contents of the velocity smoothing window, oldest first
    pub fn velocity_window(&self) -> Vec<f64> {
        self.sampler.window()
    }

    fn output(&self, reason: ReasonCode) -> TickOutput {
        TickOutput {
            timestamp: Utc::now(),
            clock_ms: self.state.clock_ms,
            phase: self.config.phases.label(self.state.phase).to_string(),
            phase_rank: self.state.phase,
            phase_count: self.config.phases.len(),
            velocity: self.state.velocity,
            scroll_percent: self.state.scroll_percent,
            crystal_depth: self.state.crystal_depth,
            landmark_active: self.state.landmark_active,
            reason,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn engine() -> PhaseEngine {
        let mut e = PhaseEngine::new(EngineConfig::thermal());
        e.on_resize(10_000.0);
        e
    }

    #[test]
    fn test_starts_neutral() {
        let e = engine();
        let snap = e.snapshot();
        assert_eq!(snap.phase, "warm");
        assert_eq!(snap.crystal_depth, 1);
        assert_eq!(snap.velocity, 0.0);
    }

    #[test]
    fn test_snapshot_idempotent_between_mutations() {
        let mut e = engine();
        e.on_scroll(500.0, 100.0);
        e.tick(200.0);

        let a = e.snapshot();
        let b = e.snapshot();
        assert_eq!(a, b);

        e.tick(300.0);
        let c = e.snapshot();
        assert_eq!(c, e.snapshot());
    }

    #[test]
    fn test_scroll_then_tick_full_path() {
        let mut e = engine();
        // Sustained fast scrolling: 80 px every 100 ms = 800 px/s
        let mut offset = 0.0;
        let mut now = 0.0;
        for _ in 0..6 {
            now += 100.0;
            offset += 80.0;
            e.on_scroll(offset, now);
        }
        let out = e.tick(now + 10.0);
        assert_eq!(out.reason, ReasonCode::R005_SHIFT_FASTER_SCHEDULED);
        assert_eq!(out.phase, "warm");

        // Keep scrolling through the latent delay; warm -> hot is 150 ms
        for _ in 0..3 {
            now += 100.0;
            offset += 80.0;
            e.on_scroll(offset, now);
            e.tick(now + 10.0);
        }
        assert_eq!(e.snapshot().phase, "hot");
    }

    #[test]
    fn test_resize_recomputes_progress() {
        let mut e = engine();
        e.on_scroll(5_000.0, 100.0);
        assert_eq!(e.snapshot().scroll_percent, 0.5);

        e.on_resize(20_000.0);
        assert_eq!(e.snapshot().scroll_percent, 0.25);

        e.on_resize(0.0);
        assert_eq!(e.snapshot().scroll_percent, 0.0);
    }

    #[test]
    fn test_reduced_motion_pins_neutral_and_ignores_input() {
        let mut cfg = EngineConfig::thermal();
        cfg.reduced_motion = true;
        let mut e = PhaseEngine::new(cfg);
        e.on_resize(10_000.0);

        let mut offset = 0.0;
        for i in 1..20 {
            offset += 200.0;
            e.on_scroll(offset, i as f64 * 50.0);
        }
        let out = e.tick(2_000.0);
        assert_eq!(out.reason, ReasonCode::R006_REDUCED_MOTION);
        assert_eq!(out.phase, "warm");
        assert_eq!(e.snapshot().velocity, 0.0);
    }

    #[test]
    fn test_config_accessor_mirrors_active_config() {
        let e = PhaseEngine::new(EngineConfig::fine());
        assert_eq!(e.config().phases.len(), 5);
    }
}
