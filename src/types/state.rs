//! Engine state record and its read-only snapshot view

use serde::{Deserialize, Serialize};

use crate::types::EngineConfig;

/// The single mutable record behind a page-view session.
///
/// Created once by the engine controller, mutated only by the sampler on
/// scroll events and the classifier/landmark detector on evaluation ticks.
/// All timestamps are engine-clock milliseconds; zero means "never".
#[derive(Debug, Clone)]
pub struct EngineState {
    /// Current phase rank (index into the configured phase ladder)
    pub phase: usize,
    /// Smoothed velocity (px/s)
    pub velocity: f64,
    /// Normalized scroll progress in [0, 1]
    pub scroll_percent: f64,
    /// Scrollable extent (document height minus viewport, px)
    pub scroll_extent: f64,
    /// Last observed scroll offset (px)
    pub last_scroll_y: f64,
    /// Engine-clock time of the last scroll event (ms)
    pub last_scroll_ms: f64,
    /// When the viewport became stationary; zero while moving (ms)
    pub stationary_since_ms: f64,
    /// Crystallization depth, 1 up to the configured cap
    pub crystal_depth: u8,
    /// Triple point pulse currently active
    pub landmark_active: bool,
    /// When the active pulse was triggered (ms)
    pub landmark_since_ms: f64,
    /// Latest engine-clock time observed by any input (ms)
    pub clock_ms: f64,
}

impl EngineState {
    /// Fresh session state for a configuration
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            phase: config.phases.neutral(),
            velocity: 0.0,
            scroll_percent: 0.0,
            scroll_extent: 0.0,
            last_scroll_y: 0.0,
            last_scroll_ms: 0.0,
            stationary_since_ms: 0.0,
            crystal_depth: 1,
            landmark_active: false,
            landmark_since_ms: 0.0,
            clock_ms: 0.0,
        }
    }

    /// Milliseconds the viewport has been stationary, per the stored clock
    pub fn stationary_ms(&self) -> f64 {
        if self.stationary_since_ms > 0.0 {
            self.clock_ms - self.stationary_since_ms
        } else {
            0.0
        }
    }
}

/// Read-only snapshot handed to the presentation layer.
///
/// Built purely from stored state so that two snapshots taken without an
/// intervening scroll event or tick compare equal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    /// Phase label
    pub phase: String,
    /// Phase rank, fastest = 0
    pub phase_rank: usize,
    /// Smoothed velocity (px/s)
    pub velocity: f64,
    /// Normalized scroll progress in [0, 1]
    pub scroll_percent: f64,
    /// Crystallization depth
    pub crystal_depth: u8,
    /// Milliseconds stationary
    pub stationary_ms: f64,
    /// Triple point pulse active
    pub landmark_active: bool,
    /// Engine clock at snapshot time (ms)
    pub clock_ms: f64,
}

impl EngineSnapshot {
    /// Capture the current state against its configuration
    pub fn capture(state: &EngineState, config: &EngineConfig) -> Self {
        Self {
            phase: config.phases.label(state.phase).to_string(),
            phase_rank: state.phase,
            velocity: state.velocity,
            scroll_percent: state.scroll_percent,
            crystal_depth: state.crystal_depth,
            stationary_ms: state.stationary_ms(),
            landmark_active: state.landmark_active,
            clock_ms: state.clock_ms,
        }
    }
}
