//! Output structures for terminal display

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{color_reset, phase_color, phase_glyph, ReasonCode};

/// Output record for each evaluation tick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickOutput {
    /// Wall-clock timestamp
    pub timestamp: DateTime<Utc>,
    /// Engine clock at evaluation (ms)
    pub clock_ms: f64,
    /// Phase label
    pub phase: String,
    /// Phase rank, fastest = 0
    pub phase_rank: usize,
    /// Phases in the active ladder
    pub phase_count: usize,
    /// Smoothed velocity (px/s)
    pub velocity: f64,
    /// Normalized scroll progress
    pub scroll_percent: f64,
    /// Crystallization depth
    pub crystal_depth: u8,
    /// Triple point pulse active
    pub landmark_active: bool,
    /// What the evaluation decided
    pub reason: ReasonCode,
}

impl TickOutput {
    /// Format for terminal display (with colors)
    pub fn to_terminal_string(&self) -> String {
        let color = phase_color(self.phase_rank, self.phase_count);
        let reset = color_reset();
        let glyph = phase_glyph(self.phase_rank, self.phase_count);

        format!(
            "{}{} v={:.0} | phase={} | scroll={:.1}% | depth={} | {}{}",
            color,
            glyph,
            self.velocity,
            self.phase,
            self.scroll_percent * 100.0,
            self.crystal_depth,
            self.reason.code(),
            reset
        )
    }

    /// Format for parseable output (no colors)
    pub fn to_parseable_string(&self) -> String {
        format!(
            "v={:.0} | phase={} | scroll={:.3} | depth={} | landmark={} | reason={}",
            self.velocity,
            self.phase,
            self.scroll_percent,
            self.crystal_depth,
            self.landmark_active,
            self.reason.code()
        )
    }
}

/// Visibility of one named landmark at the current scroll position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkVisibility {
    pub name: String,
    pub position: f64,
    pub visible: bool,
}
