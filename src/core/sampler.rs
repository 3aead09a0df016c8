//! Scroll telemetry sampler: instantaneous velocity into a smoothing window
//!
//! Converts raw scroll offsets into the smoothed velocity and normalized
//! progress the classifier runs on. Defensive guards only, no failure modes.

use std::collections::VecDeque;

use crate::types::{EngineConfig, EngineState};

/// Fixed-capacity window of instantaneous velocity samples.
///
/// Length never exceeds capacity; the mean is recomputed on every append.
#[derive(Debug)]
pub struct VelocityBuffer {
    samples: VecDeque<f64>,
    capacity: usize,
}

impl VelocityBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity.max(1)),
            capacity: capacity.max(1),
        }
    }

    /// Append a sample, evicting the oldest past capacity; returns the mean
    pub fn push(&mut self, sample: f64) -> f64 {
        self.samples.push_back(sample);
        if self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
        self.mean()
    }

    /// Arithmetic mean of the window; zero when empty
    pub fn mean(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples.iter().sum::<f64>() / self.samples.len() as f64
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Window contents, oldest first
    pub fn samples(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().copied()
    }
}

/// Per-event telemetry stage
#[derive(Debug)]
pub struct Sampler {
    buffer: VelocityBuffer,
}

impl Sampler {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            buffer: VelocityBuffer::new(config.sample_capacity),
        }
    }

    /// Fold one scroll event into the state record.
    ///
    /// Velocity is only sampled when the elapsed time is positive, fresher
    /// than the stale bound, and the document actually scrolls; position and
    /// time tracking update regardless. Movement past the noise floor clears
    /// the stationary timer and resets crystallization.
    pub fn observe(
        &mut self,
        state: &mut EngineState,
        offset: f64,
        now_ms: f64,
        config: &EngineConfig,
    ) {
        let delta_t = now_ms - state.last_scroll_ms;
        let delta_y = (offset - state.last_scroll_y).abs();

        if delta_t > 0.0 && delta_t < config.stale_event_ms && state.scroll_extent > 0.0 {
            let instant = delta_y / delta_t * 1000.0;
            state.velocity = self.buffer.push(instant);
        }

        state.scroll_percent = if state.scroll_extent > 0.0 {
            (offset / state.scroll_extent).clamp(0.0, 1.0)
        } else {
            0.0
        };

        state.last_scroll_y = offset;
        state.last_scroll_ms = now_ms;
        state.clock_ms = now_ms;

        if delta_y > config.noise_floor_px {
            state.stationary_since_ms = 0.0;
            state.crystal_depth = 1;
        }
    }

    /// Window contents, oldest first (verbose display)
    pub fn window(&self) -> Vec<f64> {
        self.buffer.samples().collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================
