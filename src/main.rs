//! Thermo-0 CLI
//!
//! Usage:
//!   thermo0 --interactive                    # Live session on the wall clock
//!   thermo0 --replay trace.jsonl             # Deterministic trace replay
//!   thermo0 --serve                          # HTTP/WS monitor server
//!   thermo0 --replay trace.jsonl --json      # JSON output

use clap::Parser;
use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::time::Instant;

use thermo0::core::{load_trace, replay, run_server, save_trace, PhaseEngine};
use thermo0::types::{EngineConfig, TickOutput, TraceEvent};
use thermo0::VERSION;

#[derive(Parser, Debug)]
#[command(
    name = "thermo0",
    version = VERSION,
    about = "Thermo-0 - Scroll thermodynamics: velocity in, thermal phase out",
    long_about = "Thermo-0 is the reference implementation of the CytherAI phase\n\
                  transition engine.\n\n\
                  Scroll velocity is temperature, pause duration is pressure.\n\
                  The engine smooths raw scroll telemetry, classifies it onto a\n\
                  hysteresis phase ladder, crystallizes on stillness, and marks\n\
                  the φ triple point.\n\n\
                  Modes:\n  \
                  --interactive  Type scroll offsets, engine runs on the wall clock\n  \
                  --replay FILE  Replay a recorded trace deterministically\n  \
                  --serve        HTTP/WS monitor server\n\n\
                  Default phases (thermal preset):\n  \
                  hot   - fast scrolling, > 600 px/s\n  \
                  warm  - reading pace\n  \
                  cold  - near stillness, crystallizing"
)]
struct Args {
    /// Replay a recorded scroll trace (JSON lines)
    #[arg(short, long)]
    replay: Option<String>,

    /// Interactive mode - read scroll offsets from stdin
    #[arg(short, long)]
    interactive: bool,

    /// Run as HTTP monitor server
    #[arg(short, long)]
    serve: bool,

    /// Server address (default: 127.0.0.1:3000)
    #[arg(long, default_value = "127.0.0.1:3000")]
    addr: String,

    /// Threshold preset: thermal (3-phase) or fine (5-phase)
    #[arg(long, default_value = "thermal")]
    preset: String,

    /// Load configuration from a JSON file (overrides --preset)
    #[arg(long)]
    config: Option<String>,

    /// Scrollable extent for interactive/replay sessions (px)
    #[arg(long, default_value_t = 10_000.0)]
    extent: f64,

    /// Keep ticking this long after the last replayed event (ms)
    #[arg(long, default_value_t = 2_000.0)]
    tail_ms: f64,

    /// Record interactive scroll events to a trace file on exit
    #[arg(long)]
    record: Option<String>,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,

    /// Show the velocity window and threshold bands after each input
    #[arg(long)]
    verbose: bool,

    /// Honor a reduced-motion preference (engine stays inert)
    #[arg(long)]
    reduced_motion: bool,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match load_config(&args) {
        Ok(cfg) => cfg,
        Err(msg) => {
            eprintln!("{}", msg);
            std::process::exit(1);
        }
    };
    config.reduced_motion |= args.reduced_motion;

    if args.serve {
        run_serve(&args).await;
    } else if let Some(ref path) = args.replay {
        run_replay(path, config, &args);
    } else if args.interactive {
        run_interactive(config, &args);
    } else {
        // Default to interactive if no mode specified
        run_interactive(config, &args);
    }
}

/// Resolve configuration from --config or --preset
fn load_config(args: &Args) -> Result<EngineConfig, String> {
    if let Some(ref path) = args.config {
        return EngineConfig::from_file(path).map_err(|e| format!("config error: {}", e));
    }
    EngineConfig::preset(&args.preset)
        .ok_or_else(|| format!("unknown preset '{}' (try: thermal, fine)", args.preset))
}

/// Run interactive mode - offsets typed on stdin, wall-clock timing
fn run_interactive(config: EngineConfig, args: &Args) {
    let tick_ms = config.tick_interval_ms;
    let mut engine = PhaseEngine::new(config);
    engine.on_resize(args.extent);

    print_header("Interactive", args.no_color);
    println!("Type a scroll offset (px) and press Enter. Commands:");
    println!("  extent <px>   set the scrollable extent (currently {})", args.extent);
    println!("  quit          exit");
    println!();

    let started = Instant::now();
    let mut last_tick_ms = 0.0;
    let mut recorded: Vec<TraceEvent> = Vec::new();
    let mut event_count: u64 = 0;

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        let prompt = format_prompt(&engine, args.no_color);
        print!("{}", prompt);
        let _ = stdout.flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(_) => break,
        }

        let now_ms = started.elapsed().as_secs_f64() * 1000.0;

        // Catch up the evaluation loop over the time spent waiting for input
        while last_tick_ms + tick_ms <= now_ms {
            last_tick_ms += tick_ms;
            let out = engine.tick(last_tick_ms);
            if out.reason.is_commit() && !args.json {
                print_output(&out, args);
            }
        }

        let line = line.trim();
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            println!("\nSession ended. Events: {}", event_count);
            break;
        }
        if line.is_empty() {
            continue;
        }

        if let Some(rest) = line.strip_prefix("extent ") {
            match rest.trim().parse::<f64>() {
                Ok(extent) => {
                    engine.on_resize(extent);
                    println!("extent set to {} px", extent);
                }
                Err(_) => println!("{}", warn("expected: extent <px>", args.no_color)),
            }
            continue;
        }

        let offset: f64 = match line.parse() {
            Ok(v) => v,
            Err(_) => {
                println!(
                    "{}",
                    warn("expected a scroll offset in px (e.g. 1250)", args.no_color)
                );
                continue;
            }
        };

        engine.on_scroll(offset, now_ms);
        event_count += 1;
        if args.record.is_some() {
            recorded.push(TraceEvent::new(now_ms, offset));
        }

        let out = engine.tick(now_ms);
        last_tick_ms = now_ms;

        if args.json {
            println!("{}", serde_json::to_string(&out).unwrap_or_default());
        } else {
            print_output(&out, args);
            if args.verbose {
                print_verbose(&engine, args.no_color);
            }
        }
    }

    if let Some(ref path) = args.record {
        if recorded.is_empty() {
            println!("nothing to record");
        } else {
            match save_trace(&recorded, path) {
                Ok(()) => println!("trace saved: {} ({} events)", path, recorded.len()),
                Err(e) => eprintln!("trace save failed: {}", e),
            }
        }
    }
}

/// Run replay mode - drive the engine through a recorded trace
fn run_replay(path: &str, config: EngineConfig, args: &Args) {
    let events = match load_trace(path) {
        Ok(events) => events,
        Err(e) => {
            eprintln!("replay error: {}", e);
            std::process::exit(1);
        }
    };

    if !args.json {
        print_header("Replay", args.no_color);
        println!("{} events from {}", events.len(), path);
        println!();
    }

    let mut engine = PhaseEngine::new(config);
    engine.on_resize(args.extent);

    let mut landmark_was_active = false;
    let mut ticks: u64 = 0;

    replay(&mut engine, &events, args.tail_ms, |out| {
        ticks += 1;
        if args.json {
            println!("{}", serde_json::to_string(out).unwrap_or_default());
            return;
        }
        let landmark_edge = out.landmark_active != landmark_was_active;
        landmark_was_active = out.landmark_active;
        if args.verbose || out.reason.is_commit() || landmark_edge {
            print_output(out, args);
        }
    });

    let snap = engine.snapshot();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&snap).unwrap_or_default());
    } else {
        println!();
        println!(
            "{} ticks | final phase={} | depth={} | scroll={:.1}%",
            ticks,
            snap.phase,
            snap.crystal_depth,
            snap.scroll_percent * 100.0
        );
    }
}

/// Run HTTP monitor server
async fn run_serve(args: &Args) {
    println!();
    println!("{}", "╔════════════════════════════════════════════╗".bold());
    let title = format!("║  🜂 Thermo-0 Monitor v{}                ║", VERSION);
    println!("{}", title.as_str().bold());
    println!("{}", "╚════════════════════════════════════════════╝".bold());
    println!();

    if let Err(e) = run_server(&args.addr).await {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Print header
fn print_header(mode: &str, no_color: bool) {
    if no_color {
        println!("========================================");
        println!("  Thermo-0 v{} - {}", VERSION, mode);
        println!("========================================");
    } else {
        let title = format!("Thermo-0 v{} - {}", VERSION, mode);
        println!("{}", title.as_str().bold().yellow());
        println!(
            "{}",
            "\"Fast reveals nothing. Slow reveals truth.\"".dimmed()
        );
    }
    println!();
}

/// Format the interactive prompt from the current snapshot
fn format_prompt(engine: &PhaseEngine, no_color: bool) -> String {
    let snap = engine.snapshot();
    if no_color {
        format!("[{} d{}] y> ", snap.phase, snap.crystal_depth)
    } else {
        let total = engine.config().phases.len();
        let color = thermo0::types::phase_color(snap.phase_rank, total);
        let glyph = thermo0::types::phase_glyph(snap.phase_rank, total);
        let reset = thermo0::types::color_reset();
        format!(
            "{}{} [{} d{}]{} y> ",
            color, glyph, snap.phase, snap.crystal_depth, reset
        )
    }
}

/// Print one tick output line
fn print_output(out: &TickOutput, args: &Args) {
    if args.no_color {
        println!("{}", out.to_parseable_string());
    } else {
        println!("{}", out.to_terminal_string());
        if out.reason.is_commit() {
            println!("  {} {}", "↳".dimmed(), out.reason.description().dimmed());
        }
        if out.landmark_active {
            println!("{}", "  ◆ triple point active".cyan());
        }
    }
}

/// Print velocity window and band positions
fn print_verbose(engine: &PhaseEngine, no_color: bool) {
    let snap = engine.snapshot();
    let cfg = engine.config();
    let window = engine.velocity_window();

    let dim = |s: String| {
        if no_color {
            s
        } else {
            s.as_str().dimmed().to_string()
        }
    };

    println!("{}", dim("┌─────────────────────────────────────┐".into()));
    println!(
        "{}",
        dim(format!(
            "│ window: {:?}",
            window.iter().map(|v| v.round()).collect::<Vec<_>>()
        ))
    );
    println!(
        "{}",
        dim(format!(
            "│ smoothed: {:.1} px/s | stationary: {:.0} ms",
            snap.velocity, snap.stationary_ms
        ))
    );
    for (i, band) in cfg.boundaries.iter().enumerate() {
        let marker = if i == snap.phase_rank.saturating_sub(1) || i == snap.phase_rank {
            "←"
        } else {
            " "
        };
        println!(
            "{}",
            dim(format!(
                "│ {}/{}: entry {:.0}, exit {:.0} {}",
                cfg.phases.label(i),
                cfg.phases.label(i + 1),
                band.enter_fast,
                band.enter_slow,
                marker
            ))
        );
    }
    println!("{}", dim("└─────────────────────────────────────┘".into()));
}

/// Yellow warning line
fn warn(msg: &str, no_color: bool) -> String {
    if no_color {
        format!("⚠ {}", msg)
    } else {
        let line = format!("⚠ {}", msg);
        line.as_str().yellow().to_string()
    }
}
