//! Phase classifier: hysteresis ladder, idle decay, crystallization
//!
//! Transitions between adjacent phases require crossing that boundary's
//! hysteresis band:
//! - upward (faster): smoothed velocity must exceed the band's `enter_fast`
//! - downward (slower): smoothed velocity must drop below `enter_slow`
//!
//! Inside the band the committed phase holds, so a value oscillating near a
//! single boundary cannot flap the displayed phase. Transitions toward a
//! faster phase pay a latent heat delay before committing; transitions toward
//! a slower phase commit immediately.

use std::cmp::Ordering;

use crate::types::{EngineConfig, EngineEvent, EngineState, EventSink, ReasonCode};

/// A scheduled transition toward a faster phase
#[derive(Debug, Clone, Copy)]
struct PendingShift {
    to: usize,
    fire_at_ms: f64,
}

/// Periodic evaluation stage
#[derive(Debug, Default)]
pub struct Classifier {
    pending: Option<PendingShift>,
}

impl Classifier {
    pub fn new() -> Self {
        Self { pending: None }
    }

    /// True while a latent shift is waiting on its delay
    pub fn shift_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Run one evaluation tick against the state record
    pub fn evaluate(
        &mut self,
        state: &mut EngineState,
        now_ms: f64,
        config: &EngineConfig,
        sink: &dyn EventSink,
    ) -> ReasonCode {
        state.clock_ms = now_ms;

        let mut decayed = false;
        let mut frozen = false;

        let since_scroll = now_ms - state.last_scroll_ms;
        if since_scroll > config.idle_guard_ms {
            state.velocity *= config.decay_factor;
            decayed = true;

            if state.stationary_since_ms == 0.0 {
                state.stationary_since_ms = now_ms;
            }
            let idle_ms = now_ms - state.stationary_since_ms;

            if idle_ms > config.freeze_after_ms {
                frozen = true;
                self.advance_depth(state, idle_ms, now_ms, config, sink);
            }
        }

        let mut target = self.hysteresis_target(state, config);
        if frozen {
            target = config.phases.slowest();
        }

        match target.cmp(&state.phase) {
            Ordering::Equal => {
                if let Some(p) = self.pending.take() {
                    sink.emit(&EngineEvent::ShiftCancelled {
                        from: config.phases.label(state.phase).to_string(),
                        to: config.phases.label(p.to).to_string(),
                        at_ms: now_ms,
                    });
                    tracing::debug!(
                        from = config.phases.label(state.phase),
                        to = config.phases.label(p.to),
                        "latent shift cancelled"
                    );
                    return ReasonCode::R005_SHIFT_CANCELLED;
                }
                if frozen {
                    ReasonCode::R004_FROZEN_FORCED
                } else if decayed {
                    ReasonCode::R003_IDLE_DECAY
                } else {
                    ReasonCode::R002_PHASE_HELD
                }
            }

            // Slower phases apply immediately, superseding any pending shift
            Ordering::Greater => {
                if let Some(p) = self.pending.take() {
                    sink.emit(&EngineEvent::ShiftCancelled {
                        from: config.phases.label(state.phase).to_string(),
                        to: config.phases.label(p.to).to_string(),
                        at_ms: now_ms,
                    });
                }
                self.commit(state, target, now_ms, config, sink);
                if frozen {
                    ReasonCode::R004_FROZEN_FORCED
                } else {
                    ReasonCode::R005_SHIFT_SLOWER
                }
            }

            // Faster phases wait out their latent heat delay
            Ordering::Less => match self.pending {
                Some(p) if p.to == target => {
                    if now_ms >= p.fire_at_ms {
                        self.pending = None;
                        self.commit(state, target, now_ms, config, sink);
                        ReasonCode::R005_SHIFT_FASTER_COMMITTED
                    } else {
                        ReasonCode::R005_SHIFT_FASTER_PENDING
                    }
                }
                stale => {
                    if let Some(p) = stale {
                        sink.emit(&EngineEvent::ShiftCancelled {
                            from: config.phases.label(state.phase).to_string(),
                            to: config.phases.label(p.to).to_string(),
                            at_ms: now_ms,
                        });
                    }
                    let fire_at_ms = now_ms + config.latent_delay_ms(state.phase, target);
                    self.pending = Some(PendingShift { to: target, fire_at_ms });
                    sink.emit(&EngineEvent::ShiftScheduled {
                        from: config.phases.label(state.phase).to_string(),
                        to: config.phases.label(target).to_string(),
                        fire_at_ms,
                    });
                    tracing::debug!(
                        from = config.phases.label(state.phase),
                        to = config.phases.label(target),
                        fire_at_ms,
                        "latent shift scheduled"
                    );
                    ReasonCode::R005_SHIFT_FASTER_SCHEDULED
                }
            },
        }
    }

    /// Walk the phase ladder from the committed phase. A velocity inside a
    /// boundary's band crosses in neither direction.
    fn hysteresis_target(&self, state: &EngineState, config: &EngineConfig) -> usize {
        let mut target = state.phase;
        while target > 0 && state.velocity > config.boundaries[target - 1].enter_fast {
            target -= 1;
        }
        while target < config.phases.slowest()
            && state.velocity < config.boundaries[target].enter_slow
        {
            target += 1;
        }
        target
    }

    /// Deepen crystallization at most one level per tick, up to the cap
    fn advance_depth(
        &self,
        state: &mut EngineState,
        idle_ms: f64,
        now_ms: f64,
        config: &EngineConfig,
        sink: &dyn EventSink,
    ) {
        let steps = (idle_ms / config.depth_quantum_ms).floor() as u64;
        let target = (1 + steps).min(u64::from(config.max_crystal_depth)) as u8;
        if target > state.crystal_depth {
            state.crystal_depth += 1;
            sink.emit(&EngineEvent::DepthAdvanced {
                depth: state.crystal_depth,
                at_ms: now_ms,
            });
        }
    }

    fn commit(
        &self,
        state: &mut EngineState,
        target: usize,
        now_ms: f64,
        config: &EngineConfig,
        sink: &dyn EventSink,
    ) {
        let from = state.phase;
        state.phase = target;
        sink.emit(&EngineEvent::PhaseCommitted {
            from: config.phases.label(from).to_string(),
            to: config.phases.label(target).to_string(),
            at_ms: now_ms,
        });
        tracing::debug!(
            from = config.phases.label(from),
            to = config.phases.label(target),
            "phase committed"
        );
    }
}

// =============================================================================
// TESTS
// =============================================================================
