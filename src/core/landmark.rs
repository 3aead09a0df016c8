//! Triple point detection and φ landmark proximity
//!
//! The triple point is a narrow simultaneous match of scroll position and
//! velocity around the balance landmark. It produces an edge-triggered pulse:
//! once active it runs its full configured duration no matter what the
//! telemetry does, and re-qualifying while active never restarts the timer.

use crate::types::{
    EngineConfig, EngineEvent, EngineState, EventSink, LandmarkVisibility,
};

/// Triple point pulse stage
#[derive(Debug, Default)]
pub struct LandmarkDetector {
    /// Engine-clock deadline for the active pulse; zero when inactive
    expires_at_ms: f64,
}

impl LandmarkDetector {
    pub fn new() -> Self {
        Self { expires_at_ms: 0.0 }
    }

    /// Run one evaluation tick: expire a due pulse, or arm a new one
    pub fn check(
        &mut self,
        state: &mut EngineState,
        now_ms: f64,
        config: &EngineConfig,
        sink: &dyn EventSink,
    ) {
        if state.landmark_active {
            if now_ms >= self.expires_at_ms {
                state.landmark_active = false;
                self.expires_at_ms = 0.0;
                sink.emit(&EngineEvent::LandmarkExpired { at_ms: now_ms });
                tracing::debug!(at_ms = now_ms, "triple point expired");
            }
            // Active pulses ignore re-entry; the timer never restarts
            return;
        }

        let tp = &config.triple_point;
        let near = (state.scroll_percent - tp.target).abs() < tp.tolerance;
        let in_band = state.velocity >= tp.velocity_min && state.velocity <= tp.velocity_max;

        if near && in_band {
            state.landmark_active = true;
            state.landmark_since_ms = now_ms;
            self.expires_at_ms = now_ms + tp.pulse_ms;
            sink.emit(&EngineEvent::LandmarkActivated {
                at_ms: now_ms,
                scroll_percent: state.scroll_percent,
            });
            tracing::debug!(
                at_ms = now_ms,
                scroll_percent = state.scroll_percent,
                "triple point activated"
            );
        }
    }
}

/// Which named landmarks sit within the proximity band of the current
/// scroll position
pub fn landmark_visibility(state: &EngineState, config: &EngineConfig) -> Vec<LandmarkVisibility> {
    config
        .landmarks
        .iter()
        .map(|lm| LandmarkVisibility {
            name: lm.name.clone(),
            position: lm.position,
            visible: (state.scroll_percent - lm.position).abs() < config.landmark_proximity,
        })
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================
