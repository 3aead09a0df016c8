//! Core modules for Thermo-0

pub mod api;
pub mod classifier;
pub mod engine;
pub mod landmark;
pub mod sampler;
pub mod trace;

pub use api::{create_router, run_server};
pub use classifier::Classifier;
pub use engine::PhaseEngine;
pub use landmark::{landmark_visibility, LandmarkDetector};
pub use sampler::{Sampler, VelocityBuffer};
pub use trace::{load_trace, replay, save_trace, TraceError};
