//! Engine configuration: phase ladder, hysteresis bands, timing constants
//!
//! Threshold schemes are data, not code. Two presets ship: the three-phase
//! `thermal` ladder and the five-phase `fine` ladder.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::PhaseSet;
use crate::{
    DEFAULT_COLD_ENTER, DEFAULT_COLD_EXIT, DEFAULT_DECAY_FACTOR, DEFAULT_DEPTH_QUANTUM_MS,
    DEFAULT_FROZEN_AFTER_MS, DEFAULT_HOT_ENTER, DEFAULT_HOT_EXIT, DEFAULT_IDLE_GUARD_MS,
    DEFAULT_LANDMARK_PROXIMITY, DEFAULT_LATENT_DELAY_MS, DEFAULT_MAX_CRYSTAL_DEPTH,
    DEFAULT_NOISE_FLOOR_PX, DEFAULT_SAMPLE_CAPACITY, DEFAULT_STALE_EVENT_MS,
    DEFAULT_TICK_INTERVAL_MS, DEFAULT_TRIPLE_POINT_PULSE_MS, DEFAULT_TRIPLE_POINT_TOLERANCE,
    DEFAULT_TRIPLE_POINT_V_MAX, DEFAULT_TRIPLE_POINT_V_MIN, LANDMARK_BALANCE, LANDMARK_COMPLETION,
    LANDMARK_EMERGENCE,
};

/// Hysteresis band for one boundary between adjacent phases.
///
/// `enter_fast` is crossed upward (into the faster phase), `enter_slow`
/// downward (into the slower phase). Velocities inside the open interval
/// `(enter_slow, enter_fast)` never cross the boundary in either direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HysteresisBand {
    /// Velocity above which the faster phase is entered (px/s)
    pub enter_fast: f64,
    /// Velocity below which the slower phase is entered (px/s)
    pub enter_slow: f64,
}

/// Latent heat delay for one directed phase pair (slower → faster)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatentDelay {
    pub from: String,
    pub to: String,
    pub delay_ms: f64,
}

/// Triple point detection parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TriplePointConfig {
    /// Scroll fraction the pulse is anchored to
    pub target: f64,
    /// Tolerance band around the target
    pub tolerance: f64,
    /// Lower velocity bound (px/s)
    pub velocity_min: f64,
    /// Upper velocity bound (px/s)
    pub velocity_max: f64,
    /// Pulse duration once triggered (ms)
    pub pulse_ms: f64,
}

/// A named scroll landmark used for proximity queries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedLandmark {
    pub name: String,
    pub position: f64,
}

/// Complete engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Phase labels, fastest to slowest
    pub phases: PhaseSet,
    /// One hysteresis band per adjacent phase pair, fastest boundary first
    pub boundaries: Vec<HysteresisBand>,

    /// Velocity smoothing window (samples)
    pub sample_capacity: usize,
    /// Scroll events with a larger elapsed time are ignored for velocity (ms)
    pub stale_event_ms: f64,
    /// Position deltas at or below this are jitter, not movement (px)
    pub noise_floor_px: f64,

    /// Cadence the driver should tick at (ms)
    pub tick_interval_ms: f64,
    /// Idle guard before decay starts (ms)
    pub idle_guard_ms: f64,
    /// Velocity multiplier per idle tick
    pub decay_factor: f64,

    /// Stationary time before the slowest phase is forced (ms)
    pub freeze_after_ms: f64,
    /// Stationary quantum per crystallization level (ms)
    pub depth_quantum_ms: f64,
    /// Crystallization depth cap
    pub max_crystal_depth: u8,

    /// Per-pair latent heat delays for transitions toward faster phases
    pub latent_delays: Vec<LatentDelay>,
    /// Delay for pairs not in the table (ms)
    pub default_latent_ms: f64,

    /// Triple point parameters
    pub triple_point: TriplePointConfig,
    /// Named landmarks for proximity queries
    pub landmarks: Vec<NamedLandmark>,
    /// Proximity band for landmark visibility
    pub landmark_proximity: f64,

    /// When set, the engine pins the neutral phase and ignores all input
    pub reduced_motion: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::thermal()
    }
}

impl EngineConfig {
    /// Three-phase Authority ladder: hot / warm / cold
    pub fn thermal() -> Self {
        Self {
            phases: PhaseSet::new(["hot", "warm", "cold"]),
            boundaries: vec![
                HysteresisBand {
                    enter_fast: DEFAULT_HOT_ENTER,
                    enter_slow: DEFAULT_HOT_EXIT,
                },
                HysteresisBand {
                    enter_fast: DEFAULT_COLD_EXIT,
                    enter_slow: DEFAULT_COLD_ENTER,
                },
            ],
            sample_capacity: DEFAULT_SAMPLE_CAPACITY,
            stale_event_ms: DEFAULT_STALE_EVENT_MS,
            noise_floor_px: DEFAULT_NOISE_FLOOR_PX,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            idle_guard_ms: DEFAULT_IDLE_GUARD_MS,
            decay_factor: DEFAULT_DECAY_FACTOR,
            freeze_after_ms: DEFAULT_FROZEN_AFTER_MS,
            depth_quantum_ms: DEFAULT_DEPTH_QUANTUM_MS,
            max_crystal_depth: DEFAULT_MAX_CRYSTAL_DEPTH,
            latent_delays: vec![
                LatentDelay {
                    from: "warm".into(),
                    to: "hot".into(),
                    delay_ms: 150.0,
                },
                LatentDelay {
                    from: "cold".into(),
                    to: "warm".into(),
                    delay_ms: 100.0,
                },
                LatentDelay {
                    from: "cold".into(),
                    to: "hot".into(),
                    delay_ms: 250.0,
                },
            ],
            default_latent_ms: DEFAULT_LATENT_DELAY_MS,
            triple_point: TriplePointConfig {
                target: LANDMARK_BALANCE,
                tolerance: DEFAULT_TRIPLE_POINT_TOLERANCE,
                velocity_min: DEFAULT_TRIPLE_POINT_V_MIN,
                velocity_max: DEFAULT_TRIPLE_POINT_V_MAX,
                pulse_ms: DEFAULT_TRIPLE_POINT_PULSE_MS,
            },
            landmarks: vec![
                NamedLandmark {
                    name: "emergence".into(),
                    position: LANDMARK_EMERGENCE,
                },
                NamedLandmark {
                    name: "balance".into(),
                    position: LANDMARK_BALANCE,
                },
                NamedLandmark {
                    name: "completion".into(),
                    position: LANDMARK_COMPLETION,
                },
            ],
            landmark_proximity: DEFAULT_LANDMARK_PROXIMITY,
            reduced_motion: false,
        }
    }

    /// Five-phase ladder: plasma / gas / liquid / solid / frozen
    pub fn fine() -> Self {
        let mut cfg = Self::thermal();
        cfg.phases = PhaseSet::new(["plasma", "gas", "liquid", "solid", "frozen"]);
        cfg.boundaries = vec![
            HysteresisBand {
                enter_fast: 1200.0,
                enter_slow: 900.0,
            },
            HysteresisBand {
                enter_fast: 600.0,
                enter_slow: 400.0,
            },
            HysteresisBand {
                enter_fast: 150.0,
                enter_slow: 80.0,
            },
            HysteresisBand {
                enter_fast: 30.0,
                enter_slow: 15.0,
            },
        ];
        cfg.latent_delays = vec![
            LatentDelay {
                from: "gas".into(),
                to: "plasma".into(),
                delay_ms: 200.0,
            },
            LatentDelay {
                from: "liquid".into(),
                to: "gas".into(),
                delay_ms: 150.0,
            },
            LatentDelay {
                from: "solid".into(),
                to: "liquid".into(),
                delay_ms: 100.0,
            },
            LatentDelay {
                from: "frozen".into(),
                to: "solid".into(),
                delay_ms: 100.0,
            },
        ];
        cfg
    }

    /// Look up a preset by name
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "thermal" => Some(Self::thermal()),
            "fine" => Some(Self::fine()),
            _ => None,
        }
    }

    /// Load and validate a configuration from a JSON file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let cfg: Self = serde_json::from_str(&json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Latent heat delay for a directed transition, falling back to the
    /// generic delay for unlisted pairs
    pub fn latent_delay_ms(&self, from_rank: usize, to_rank: usize) -> f64 {
        let from = self.phases.label(from_rank);
        let to = self.phases.label(to_rank);
        self.latent_delays
            .iter()
            .find(|d| d.from == from && d.to == to)
            .map(|d| d.delay_ms)
            .unwrap_or(self.default_latent_ms)
    }

    /// Check structural invariants of the threshold scheme
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.phases.len() < 2 {
            return Err(ConfigError::TooFewPhases(self.phases.len()));
        }
        if self.boundaries.len() != self.phases.len() - 1 {
            return Err(ConfigError::BandCountMismatch {
                phases: self.phases.len(),
                expected: self.phases.len() - 1,
                actual: self.boundaries.len(),
            });
        }
        for (i, band) in self.boundaries.iter().enumerate() {
            if band.enter_slow >= band.enter_fast {
                return Err(ConfigError::InvertedBand {
                    faster: self.phases.label(i).to_string(),
                    slower: self.phases.label(i + 1).to_string(),
                    enter_fast: band.enter_fast,
                    enter_slow: band.enter_slow,
                });
            }
        }
        for pair in self.boundaries.windows(2) {
            if pair[0].enter_slow < pair[1].enter_fast {
                return Err(ConfigError::OverlappingBands {
                    upper_exit: pair[0].enter_slow,
                    lower_entry: pair[1].enter_fast,
                });
            }
        }
        if !(self.decay_factor > 0.0 && self.decay_factor < 1.0) {
            return Err(ConfigError::BadDecay(self.decay_factor));
        }
        if self.sample_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.max_crystal_depth == 0 {
            return Err(ConfigError::ZeroDepthCap);
        }
        if self.triple_point.velocity_min > self.triple_point.velocity_max {
            return Err(ConfigError::InvertedTriplePointBand {
                min: self.triple_point.velocity_min,
                max: self.triple_point.velocity_max,
            });
        }
        for delay in &self.latent_delays {
            let from = self
                .phases
                .rank_of(&delay.from)
                .ok_or_else(|| ConfigError::UnknownPhase(delay.from.clone()))?;
            let to = self
                .phases
                .rank_of(&delay.to)
                .ok_or_else(|| ConfigError::UnknownPhase(delay.to.clone()))?;
            if to >= from {
                return Err(ConfigError::LatentDelayNotFaster {
                    from: delay.from.clone(),
                    to: delay.to.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Configuration failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("phase ladder needs at least two phases, got {0}")]
    TooFewPhases(usize),

    #[error("{phases} phases need {expected} hysteresis bands, got {actual}")]
    BandCountMismatch {
        phases: usize,
        expected: usize,
        actual: usize,
    },

    #[error(
        "band {faster}/{slower}: exit {enter_slow} must sit strictly below entry {enter_fast}"
    )]
    InvertedBand {
        faster: String,
        slower: String,
        enter_fast: f64,
        enter_slow: f64,
    },

    #[error("adjacent bands overlap: upper exit {upper_exit} below lower entry {lower_entry}")]
    OverlappingBands { upper_exit: f64, lower_entry: f64 },

    #[error("decay factor must be in (0, 1), got {0}")]
    BadDecay(f64),

    #[error("sample buffer capacity must be at least 1")]
    ZeroCapacity,

    #[error("crystallization depth cap must be at least 1")]
    ZeroDepthCap,

    #[error("triple point velocity band inverted: min {min} > max {max}")]
    InvertedTriplePointBand { min: f64, max: f64 },

    #[error("latent delay references unknown phase '{0}'")]
    UnknownPhase(String),

    #[error("latent delay {from} -> {to} does not point toward a faster phase")]
    LatentDelayNotFaster { from: String, to: String },

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        assert!(EngineConfig::thermal().validate().is_ok());
        assert!(EngineConfig::fine().validate().is_ok());
    }

    #[test]
    fn test_inverted_band_rejected() {
        let mut cfg = EngineConfig::thermal();
        cfg.boundaries[0] = HysteresisBand {
            enter_fast: 400.0,
            enter_slow: 600.0,
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvertedBand { .. })
        ));
    }

    #[test]
    fn test_overlapping_bands_rejected() {
        let mut cfg = EngineConfig::thermal();
        // Hot exit at 100 dips below the cold boundary's 150 entry
        cfg.boundaries[0].enter_slow = 100.0;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::OverlappingBands { .. })
        ));
    }

    #[test]
    fn test_band_count_mismatch_rejected() {
        let mut cfg = EngineConfig::thermal();
        cfg.boundaries.pop();
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::BandCountMismatch { .. })
        ));
    }

    #[test]
    fn test_unknown_latent_phase_rejected() {
        let mut cfg = EngineConfig::thermal();
        cfg.latent_delays.push(LatentDelay {
            from: "warm".into(),
            to: "plasma".into(),
            delay_ms: 100.0,
        });
        assert!(matches!(cfg.validate(), Err(ConfigError::UnknownPhase(_))));
    }

    #[test]
    fn test_latent_delay_lookup() {
        let cfg = EngineConfig::thermal();
        // warm -> hot is listed
        assert_eq!(cfg.latent_delay_ms(1, 0), 150.0);
        // hot -> hot is not, falls back to the generic delay
        assert_eq!(cfg.latent_delay_ms(0, 0), cfg.default_latent_ms);
    }

    #[test]
    fn test_bad_decay_rejected() {
        let mut cfg = EngineConfig::thermal();
        cfg.decay_factor = 1.0;
        assert!(matches!(cfg.validate(), Err(ConfigError::BadDecay(_))));
    }
}
