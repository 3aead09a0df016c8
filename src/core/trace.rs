//! Trace persistence and deterministic replay
//!
//! Traces are JSON lines, one scroll event per line. Replay drives an engine
//! through the recorded events while ticking at the configured cadence, so a
//! session can be reproduced bit-for-bit off-line.

use std::io::Write;

use thiserror::Error;

use crate::core::PhaseEngine;
use crate::types::{TickOutput, TraceEvent};

/// Trace file failures
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("failed to read trace: {0}")]
    Io(#[from] std::io::Error),

    #[error("bad trace record on line {line}: {source}")]
    Parse {
        line: usize,
        source: serde_json::Error,
    },

    #[error("trace is empty")]
    Empty,
}

/// Write a trace as JSON lines
pub fn save_trace(events: &[TraceEvent], path: &str) -> Result<(), TraceError> {
    let mut file = std::fs::File::create(path)?;
    for event in events {
        let json = serde_json::to_string(event).map_err(|source| TraceError::Parse {
            line: 0,
            source,
        })?;
        writeln!(file, "{json}")?;
    }
    Ok(())
}

/// Load a trace from JSON lines, skipping blank lines
pub fn load_trace(path: &str) -> Result<Vec<TraceEvent>, TraceError> {
    let text = std::fs::read_to_string(path)?;
    let mut events = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let event: TraceEvent =
            serde_json::from_str(line).map_err(|source| TraceError::Parse {
                line: idx + 1,
                source,
            })?;
        events.push(event);
    }
    if events.is_empty() {
        return Err(TraceError::Empty);
    }
    Ok(events)
}

/// Drive an engine through a trace.
///
/// Events are applied in timestamp order; the engine is ticked at its
/// configured cadence from the first interval through `tail_ms` past the last
/// event, letting decay and crystallization play out. Every tick output is
/// handed to the callback.
pub fn replay(
    engine: &mut PhaseEngine,
    events: &[TraceEvent],
    tail_ms: f64,
    mut on_tick: impl FnMut(&TickOutput),
) {
    let mut events: Vec<&TraceEvent> = events.iter().collect();
    events.sort_by(|a, b| a.t_ms.total_cmp(&b.t_ms));

    let interval = engine.config().tick_interval_ms.max(1.0);
    let end = events.last().map(|e| e.t_ms).unwrap_or(0.0) + tail_ms;

    let mut idx = 0;
    let mut now = interval;
    while now <= end {
        while idx < events.len() && events[idx].t_ms <= now {
            let event = events[idx];
            if let Some(extent) = event.extent {
                engine.on_resize(extent);
            }
            engine.on_scroll(event.offset, event.t_ms);
            idx += 1;
        }
        on_tick(&engine.tick(now));
        now += interval;
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EngineConfig;
    use pretty_assertions::assert_eq;

    fn tmp_path(name: &str) -> String {
        let mut p = std::env::temp_dir();
        p.push(format!("thermo0_{}_{}", std::process::id(), name));
        p.to_string_lossy().into_owned()
    }

    fn sample_trace() -> Vec<TraceEvent> {
        vec![
            TraceEvent::with_extent(100.0, 50.0, 10_000.0),
            TraceEvent::new(200.0, 120.0),
            TraceEvent::new(300.0, 260.0),
        ]
    }

    #[test]
    fn test_save_load_round() {
        let path = tmp_path("roundtrip.jsonl");
        let events = sample_trace();
        save_trace(&events, &path).unwrap();
        let loaded = load_trace(&path).unwrap();
        assert_eq!(loaded, events);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_reports_bad_line() {
        let path = tmp_path("bad.jsonl");
        std::fs::write(&path, "{\"t_ms\":100.0,\"offset\":50.0}\nnot json\n").unwrap();
        let err = load_trace(&path).unwrap_err();
        assert!(matches!(err, TraceError::Parse { line: 2, .. }));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_empty_trace_rejected() {
        let path = tmp_path("empty.jsonl");
        std::fs::write(&path, "\n\n").unwrap();
        assert!(matches!(load_trace(&path), Err(TraceError::Empty)));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_replay_is_deterministic() {
        let events = sample_trace();

        let run = || {
            let mut engine = PhaseEngine::new(EngineConfig::thermal());
            let mut outputs = Vec::new();
            replay(&mut engine, &events, 1_000.0, |out| {
                outputs.push(out.to_parseable_string());
            });
            outputs
        };

        assert_eq!(run(), run());
    }

    #[test]
    fn test_replay_runs_out_the_tail() {
        let events = sample_trace();
        let mut engine = PhaseEngine::new(EngineConfig::thermal());
        let mut ticks = 0;
        replay(&mut engine, &events, 2_000.0, |_| ticks += 1);

        // Last event at 300 ms plus a 2 s tail at 100 ms cadence
        assert_eq!(ticks, 23);
        // The tail is long enough for full crystallization
        assert_eq!(engine.snapshot().phase, "cold");
        assert_eq!(engine.snapshot().crystal_depth, 3);
    }
}
