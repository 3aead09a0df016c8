//! Core types for Thermo-0

mod config;
mod event;
mod output;
mod phase;
mod reason;
mod state;
mod trace;

pub use config::{
    ConfigError, EngineConfig, HysteresisBand, LatentDelay, NamedLandmark, TriplePointConfig,
};
pub use event::{EngineEvent, EventSink, NullSink};
pub use output::{LandmarkVisibility, TickOutput};
pub use phase::{color_reset, phase_color, phase_glyph, PhaseSet};
pub use reason::ReasonCode;
pub use state::{EngineSnapshot, EngineState};
pub use trace::TraceEvent;

#[cfg(test)]
pub(crate) use event::test_support::RecordingSink;
