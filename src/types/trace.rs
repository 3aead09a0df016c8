//! Scroll trace records
//!
//! A trace is a JSON-lines file of scroll events with engine-clock
//! timestamps, recorded from a live session and replayable deterministically.

use serde::{Deserialize, Serialize};

/// One recorded scroll event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEvent {
    /// Engine-clock time of the event (ms)
    pub t_ms: f64,
    /// Scroll offset (px from top)
    pub offset: f64,
    /// New scrollable extent, when the layout changed at this event
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extent: Option<f64>,
}

impl TraceEvent {
    pub fn new(t_ms: f64, offset: f64) -> Self {
        Self {
            t_ms,
            offset,
            extent: None,
        }
    }

    pub fn with_extent(t_ms: f64, offset: f64, extent: f64) -> Self {
        Self {
            t_ms,
            offset,
            extent: Some(extent),
        }
    }
}
