//! Reason codes for evaluation decisions
//! Based on Lumo's R-code taxonomy

use serde::{Deserialize, Serialize};

/// Reason codes attached to every evaluation tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
pub enum ReasonCode {
    // =========================================================================
    // R002: Steady state
    // =========================================================================
    /// Phase unchanged, velocity inside its band
    R002_PHASE_HELD,

    // =========================================================================
    // R003: Idle
    // =========================================================================
    /// No scroll input, smoothed velocity decayed this tick
    R003_IDLE_DECAY,

    // =========================================================================
    // R004: Crystallization
    // =========================================================================
    /// Stationary past the freeze duration, slowest phase forced
    R004_FROZEN_FORCED,

    // =========================================================================
    // R005: Transitions
    // =========================================================================
    /// Committed a transition toward a slower phase
    R005_SHIFT_SLOWER,
    /// Scheduled a latent transition toward a faster phase
    R005_SHIFT_FASTER_SCHEDULED,
    /// Latent transition still waiting on its delay
    R005_SHIFT_FASTER_PENDING,
    /// Latent transition delay elapsed, faster phase committed
    R005_SHIFT_FASTER_COMMITTED,
    /// Pending latent transition cancelled by a superseding reading
    R005_SHIFT_CANCELLED,

    // =========================================================================
    // R006: Preferences
    // =========================================================================
    /// Reduced motion pinned the neutral phase, input ignored
    R006_REDUCED_MOTION,
}

impl ReasonCode {
    /// Get the code string (for logging)
    pub fn code(&self) -> &'static str {
        match self {
            Self::R002_PHASE_HELD => "R002_PHASE_HELD",
            Self::R003_IDLE_DECAY => "R003_IDLE_DECAY",
            Self::R004_FROZEN_FORCED => "R004_FROZEN_FORCED",
            Self::R005_SHIFT_SLOWER => "R005_SHIFT_SLOWER",
            Self::R005_SHIFT_FASTER_SCHEDULED => "R005_SHIFT_FASTER_SCHEDULED",
            Self::R005_SHIFT_FASTER_PENDING => "R005_SHIFT_FASTER_PENDING",
            Self::R005_SHIFT_FASTER_COMMITTED => "R005_SHIFT_FASTER_COMMITTED",
            Self::R005_SHIFT_CANCELLED => "R005_SHIFT_CANCELLED",
            Self::R006_REDUCED_MOTION => "R006_REDUCED_MOTION",
        }
    }

    /// Get a human description
    pub fn description(&self) -> &'static str {
        match self {
            Self::R002_PHASE_HELD => "Phase held, velocity inside band",
            Self::R003_IDLE_DECAY => "Idle, velocity decaying",
            Self::R004_FROZEN_FORCED => "Frozen: stationary past freeze duration",
            Self::R005_SHIFT_SLOWER => "Shifted toward a slower phase",
            Self::R005_SHIFT_FASTER_SCHEDULED => "Latent shift toward a faster phase scheduled",
            Self::R005_SHIFT_FASTER_PENDING => "Latent shift pending its delay",
            Self::R005_SHIFT_FASTER_COMMITTED => "Latent shift committed",
            Self::R005_SHIFT_CANCELLED => "Pending shift cancelled",
            Self::R006_REDUCED_MOTION => "Reduced motion, engine inert",
        }
    }

    /// True for codes that changed the committed phase this tick
    pub fn is_commit(&self) -> bool {
        matches!(
            self,
            Self::R004_FROZEN_FORCED | Self::R005_SHIFT_SLOWER | Self::R005_SHIFT_FASTER_COMMITTED
        )
    }
}

impl std::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}
