//! Trace replay binary.
//!
//! Usage:
//!   cargo run -p vr_input --bin vr_replay -- --trace frames.jsonl [--config vr.json] [--hz 72]
//!
//! Plays a recorded controller trace through the translator at the display
//! refresh rate, executing emitted commands on a console. Console lines typed
//! on stdin are applied between frames, so cvars can be changed mid-replay:
//!   vr_snapturn_angle 30
//!   cvarlist
//!   quit

use std::env;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context};
use tokio::sync::mpsc;
use tracing::info;
use vr_input::replay::{load_trace, play, ReplayDriver};
use vr_shared::config::VrConfig;

struct Args {
    trace: PathBuf,
    config: Option<PathBuf>,
    hz: Option<u32>,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut trace = None;
    let mut config = None;
    let mut hz = None;
    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--trace" if i + 1 < args.len() => {
                trace = Some(PathBuf::from(&args[i + 1]));
                i += 2;
            }
            "--config" if i + 1 < args.len() => {
                config = Some(PathBuf::from(&args[i + 1]));
                i += 2;
            }
            "--hz" if i + 1 < args.len() => {
                hz = Some(args[i + 1].parse().context("--hz")?);
                i += 2;
            }
            _ => i += 1,
        }
    }
    let Some(trace) = trace else {
        bail!("usage: vr_replay --trace <frames.jsonl> [--config <vr.json>] [--hz <rate>]");
    };
    Ok(Args { trace, config, hz })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = parse_args()?;
    let mut cfg = match &args.config {
        Some(path) => VrConfig::load(path)?,
        None => VrConfig::default(),
    };
    if let Some(hz) = args.hz {
        cfg.refresh_hz = hz;
    }

    let frames = load_trace(&args.trace)?;
    info!(trace = %args.trace.display(), frames = frames.len(), hz = cfg.refresh_hz, handedness = ?cfg.handedness, "Starting replay");

    let mut driver = ReplayDriver::new(&cfg);

    let (console_tx, console_rx) = mpsc::channel::<String>(32);

    // Spawn stdin reader thread.
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        let mut stdout = std::io::stdout();
        loop {
            print!("] ");
            let _ = stdout.flush();
            let mut line = String::new();
            match stdin.lock().read_line(&mut line) {
                Ok(0) | Err(_) => break,
                Ok(_) => {}
            }
            let line = line.trim().to_string();
            if !line.is_empty() && console_tx.blocking_send(line).is_err() {
                break;
            }
        }
    });

    let last = play(&mut driver, &frames, cfg.refresh_hz, Some(console_rx)).await?;

    if let Some(out) = last {
        println!("{}", serde_json::to_string(&out)?);
    }
    info!(frames = frames.len(), "Replay finished");
    Ok(())
}
