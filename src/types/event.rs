//! Engine events and the observer capability

use serde::{Deserialize, Serialize};

/// Notable engine occurrences, published to an optional observer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EngineEvent {
    /// Committed phase changed
    PhaseCommitted {
        from: String,
        to: String,
        at_ms: f64,
    },
    /// Latent transition toward a faster phase scheduled
    ShiftScheduled {
        from: String,
        to: String,
        fire_at_ms: f64,
    },
    /// Pending latent transition cancelled before firing
    ShiftCancelled {
        from: String,
        to: String,
        at_ms: f64,
    },
    /// Triple point pulse triggered
    LandmarkActivated { at_ms: f64, scroll_percent: f64 },
    /// Triple point pulse expired on schedule
    LandmarkExpired { at_ms: f64 },
    /// Crystallization deepened one level
    DepthAdvanced { depth: u8, at_ms: f64 },
}

/// Observer capability the engine publishes events through.
///
/// The engine always holds a sink; embedders that do not care get
/// [`NullSink`]. Implementations must not block: `emit` runs inline on the
/// engine's single logical thread.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &EngineEvent);
}

/// Sink that drops everything
#[derive(Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: &EngineEvent) {}
}
