//! Thermo-0: Reference implementation of the CytherAI phase transition engine
//!
//! Scroll telemetry in, thermal phase out: velocity smoothing, hysteresis
//! classification, crystallization, and the φ triple point.

pub mod core;
pub mod types;

// =============================================================================
// THERMAL THRESHOLDS [C] - Authority Edition defaults (px/s)
// =============================================================================

/// Entry into the hottest phase (smoothed velocity must exceed this)
pub const DEFAULT_HOT_ENTER: f64 = 600.0;

/// Exit from the hottest phase (smoothed velocity must drop below this)
pub const DEFAULT_HOT_EXIT: f64 = 400.0;

/// Exit from the coldest phase (smoothed velocity must rise above this)
pub const DEFAULT_COLD_EXIT: f64 = 150.0;

/// Entry into the coldest phase (smoothed velocity must drop below this)
pub const DEFAULT_COLD_ENTER: f64 = 80.0;

// =============================================================================
// TELEMETRY [C]
// =============================================================================

/// Velocity smoothing window (samples)
pub const DEFAULT_SAMPLE_CAPACITY: usize = 5;

/// Scroll events older than this are discarded for velocity purposes (ms).
/// Guards against tab-switch deltas that would read as giant spikes.
pub const DEFAULT_STALE_EVENT_MS: f64 = 500.0;

/// Position deltas at or below this are treated as jitter, not movement (px)
pub const DEFAULT_NOISE_FLOOR_PX: f64 = 2.0;

// =============================================================================
// EVALUATION LOOP [C]
// =============================================================================

/// Cadence the driver should tick the engine at (ms)
pub const DEFAULT_TICK_INTERVAL_MS: f64 = 100.0;

/// No scroll event for longer than this counts as idle (ms)
pub const DEFAULT_IDLE_GUARD_MS: f64 = 100.0;

/// Smoothed velocity multiplier applied per idle tick
pub const DEFAULT_DECAY_FACTOR: f64 = 0.85;

// =============================================================================
// CRYSTALLIZATION [C]
// =============================================================================

/// Stationary time before the coldest phase is forced (ms)
pub const DEFAULT_FROZEN_AFTER_MS: f64 = 500.0;

/// Each additional quantum of stationary time deepens crystallization (ms)
pub const DEFAULT_DEPTH_QUANTUM_MS: f64 = 800.0;

/// Crystallization depth cap
pub const DEFAULT_MAX_CRYSTAL_DEPTH: u8 = 3;

// =============================================================================
// LATENT HEAT [C]
// =============================================================================

/// Generic delay before committing a transition toward a faster phase (ms),
/// used for phase pairs without an entry in the delay table
pub const DEFAULT_LATENT_DELAY_MS: f64 = 120.0;

// =============================================================================
// φ LANDMARKS [C]
// =============================================================================

pub const PHI: f64 = 1.618033988749895;
pub const PHI_INV: f64 = 0.618033988749895;

/// φ⁻¹ - 1/φ³
pub const LANDMARK_EMERGENCE: f64 = 0.382;
/// φ⁻¹
pub const LANDMARK_BALANCE: f64 = 0.618;
/// φ⁻¹ + 1/φ²
pub const LANDMARK_COMPLETION: f64 = 0.854;

/// Proximity band for named-landmark visibility (fraction of document)
pub const DEFAULT_LANDMARK_PROXIMITY: f64 = 0.08;

// =============================================================================
// TRIPLE POINT [C]
// =============================================================================

/// Scroll tolerance around the balance landmark
pub const DEFAULT_TRIPLE_POINT_TOLERANCE: f64 = 0.03;

/// Lower velocity bound for the triple point (px/s)
pub const DEFAULT_TRIPLE_POINT_V_MIN: f64 = 150.0;

/// Upper velocity bound for the triple point (px/s)
pub const DEFAULT_TRIPLE_POINT_V_MAX: f64 = 400.0;

/// How long the triple point pulse persists once triggered (ms)
pub const DEFAULT_TRIPLE_POINT_PULSE_MS: f64 = 800.0;

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "1.0.0";
