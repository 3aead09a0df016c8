//! Integration tests for the full engine path
//!
//! Drives scroll telemetry through sampler → classifier → landmark detector
//! and checks what the presentation layer would see.

use pretty_assertions::assert_eq;
use thermo0::core::PhaseEngine;
use thermo0::types::{EngineConfig, EngineSnapshot, ReasonCode, TickOutput};

/// Feed scroll events at a constant velocity (px/s), one per 100 ms,
/// ticking after each event. Returns the clock after the last event.
fn scroll_at(
    engine: &mut PhaseEngine,
    velocity: f64,
    events: usize,
    mut offset: f64,
    mut now: f64,
) -> (f64, f64) {
    for _ in 0..events {
        now += 100.0;
        offset += velocity * 0.1;
        engine.on_scroll(offset, now);
        engine.tick(now + 1.0);
    }
    (offset, now)
}

fn engine() -> PhaseEngine {
    let mut e = PhaseEngine::new(EngineConfig::thermal());
    e.on_resize(10_000.0);
    e
}

#[test]
fn test_reading_pace_stays_warm() {
    let mut e = engine();
    scroll_at(&mut e, 250.0, 10, 0.0, 0.0);
    assert_eq!(e.snapshot().phase, "warm");
}

#[test]
fn test_fast_burst_reaches_hot_after_latent_delay() {
    let mut e = engine();
    let (_, now) = scroll_at(&mut e, 800.0, 6, 0.0, 0.0);

    // The shift is latent, not instantaneous
    let midway = e.snapshot();
    // warm -> hot carries 150 ms; six events at 100 ms spacing comfortably
    // cover scheduling plus commit
    assert_eq!(midway.phase, "hot");

    // Dipping into the hysteresis band does not leave hot
    let (_, now) = scroll_at(&mut e, 450.0, 5, 8_000.0, now);
    assert_eq!(e.snapshot().phase, "hot");

    // Dropping below the exit threshold does
    scroll_at(&mut e, 300.0, 6, 9_000.0, now);
    assert_eq!(e.snapshot().phase, "warm");
}

#[test]
fn test_stillness_crystallizes_and_movement_resets() {
    let mut e = engine();
    let (offset, now) = scroll_at(&mut e, 250.0, 5, 0.0, 0.0);

    // Hands off the wheel: tick through three seconds of stillness
    let mut t = now;
    while t < now + 3_000.0 {
        t += 100.0;
        e.tick(t);
    }
    let snap = e.snapshot();
    assert_eq!(snap.phase, "cold");
    assert_eq!(snap.crystal_depth, 3);

    // Real movement melts the crystal back to depth 1
    e.on_scroll(offset + 500.0, t + 50.0);
    assert_eq!(e.snapshot().crystal_depth, 1);
}

#[test]
fn test_triple_point_pulse_during_mid_speed_pass() {
    let mut e = engine();

    // Jump near the balance landmark, then settle into a 300 px/s glide
    // that fills the smoothing window
    e.on_scroll(6_000.0, 50.0);
    let (_, now) = scroll_at(&mut e, 300.0, 5, 6_000.0, 50.0);

    let snap = e.snapshot();
    assert!(snap.landmark_active, "triple point should be active");
    assert!((snap.scroll_percent - 0.618).abs() < 0.03);

    // The pulse outlives the conditions but not its configured duration
    let mut t = now;
    let mut saw_expiry_at = 0.0;
    while t < now + 1_500.0 {
        t += 100.0;
        let out = e.tick(t);
        if !out.landmark_active && saw_expiry_at == 0.0 {
            saw_expiry_at = t;
        }
    }
    assert!(saw_expiry_at > 0.0, "pulse should expire");
    assert!(!e.snapshot().landmark_active);
}

#[test]
fn test_snapshot_idempotent_through_realistic_session() {
    let mut e = engine();
    let (_, now) = scroll_at(&mut e, 500.0, 8, 0.0, 0.0);
    e.tick(now + 100.0);

    let a = e.snapshot();
    let b = e.snapshot();
    assert_eq!(a, b);
}

#[test]
fn test_outputs_serialize_and_deserialize() {
    let mut e = engine();
    e.on_scroll(100.0, 100.0);
    let out = e.tick(200.0);

    let json = serde_json::to_string(&out).unwrap();
    assert!(json.contains("\"phase\""));
    assert!(json.contains("\"velocity\""));
    assert!(json.contains("\"reason\""));
    let _: TickOutput = serde_json::from_str(&json).unwrap();

    let snap_json = serde_json::to_string(&e.snapshot()).unwrap();
    let _: EngineSnapshot = serde_json::from_str(&snap_json).unwrap();
}

#[test]
fn test_parseable_output_format() {
    let mut e = engine();
    e.on_scroll(100.0, 100.0);
    let out = e.tick(200.0);

    let formatted = out.to_parseable_string();
    assert!(formatted.contains("v="));
    assert!(formatted.contains("phase="));
    assert!(formatted.contains("depth="));
    assert!(formatted.contains("reason="));
}

#[test]
fn test_fine_preset_climbs_the_full_ladder() {
    let mut e = PhaseEngine::new(EngineConfig::fine());
    e.on_resize(100_000.0);

    assert_eq!(e.snapshot().phase, "liquid");

    let (offset, now) = scroll_at(&mut e, 700.0, 8, 0.0, 0.0);
    assert_eq!(e.snapshot().phase, "gas");

    scroll_at(&mut e, 1_500.0, 8, offset, now);
    assert_eq!(e.snapshot().phase, "plasma");
}

#[test]
fn test_first_tick_reason_codes() {
    let mut e = engine();
    // 20 px over 50 ms = 400 px/s, inside the warm band
    e.on_scroll(20.0, 50.0);
    let out = e.tick(60.0);
    assert_eq!(out.reason, ReasonCode::R002_PHASE_HELD);

    // A tick long after the scroll reports decay
    let out = e.tick(500.0);
    assert_eq!(out.reason, ReasonCode::R003_IDLE_DECAY);
}
