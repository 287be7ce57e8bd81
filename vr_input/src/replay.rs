//! Recorded-frame replay against a console-backed engine stand-in.
//!
//! Traces are JSON lines, one [`FrameInput`] per line. Blank lines and `//`
//! comments are skipped.

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use vr_shared::{config::VrConfig, console::Console};

use crate::{
    command::{CommandSink, EngineCommand},
    controller::FrameInput,
    translator::{FrameOutput, InputSession},
    tunables::{register_cvars, Tunables},
};

/// Engine button actions the translator can hold.
pub const ENGINE_BUTTONS: &[&str] = &["attack", "attack2", "use", "reload", "duck", "showscores"];

/// Parses a JSON-lines trace.
pub fn parse_trace(text: &str) -> anyhow::Result<Vec<FrameInput>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with("//")
        })
        .map(|(i, line)| serde_json::from_str(line).with_context(|| format!("trace line {}", i + 1)))
        .collect()
}

pub fn load_trace(path: &Path) -> anyhow::Result<Vec<FrameInput>> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading trace {}", path.display()))?;
    parse_trace(&text).with_context(|| format!("parsing trace {}", path.display()))
}

/// Registers the engine-side commands the translator emits.
pub fn register_engine_commands(console: &mut Console) {
    for name in ENGINE_BUTTONS {
        console.register_button(name);
    }
    for name in ["invnext", "invprev", "impulse", "key", "touch"] {
        console.register_command(name, move |args, _ctx| {
            info!(command = name, args = %args.join(" "), "engine command");
            Ok(())
        });
    }
}

/// Dispatches commands by executing them on a console.
pub struct ConsoleSink<'a> {
    console: &'a mut Console,
    pub failures: usize,
}

impl<'a> ConsoleSink<'a> {
    pub fn new(console: &'a mut Console) -> Self {
        Self { console, failures: 0 }
    }
}

impl CommandSink for ConsoleSink<'_> {
    fn dispatch(&mut self, cmd: EngineCommand) {
        let line = cmd.to_string();
        match self.console.exec(&line) {
            Ok(output) => {
                for out in output {
                    debug!(%line, %out, "console");
                }
            }
            Err(e) => {
                self.failures += 1;
                warn!(%line, error = %e, "command failed");
            }
        }
    }
}

/// A translator session wired to a console.
pub struct ReplayDriver {
    pub session: InputSession,
    pub console: Console,
}

impl ReplayDriver {
    pub fn new(config: &VrConfig) -> Self {
        let mut console = Console::new();
        register_cvars(&mut console, config);
        register_engine_commands(&mut console);
        Self {
            session: InputSession::new(config.handedness),
            console,
        }
    }

    /// Translates one frame with the console's current cvars.
    pub fn step(&mut self, frame: &FrameInput) -> FrameOutput {
        let tunables = Tunables::read(&self.console);
        let mut sink = ConsoleSink::new(&mut self.console);
        let output = self.session.translate(frame, &tunables, &mut sink);
        if sink.failures > 0 {
            warn!(failures = sink.failures, now_ms = frame.now_ms, "frame had failed commands");
        }
        output
    }
}

/// Plays `frames` paced at `hz`, applying console lines from `console_rx`
/// between frames. A `quit` line stops playback early.
///
/// Returns the output of the last frame played.
pub async fn play(
    driver: &mut ReplayDriver,
    frames: &[FrameInput],
    hz: u32,
    mut console_rx: Option<mpsc::Receiver<String>>,
) -> anyhow::Result<Option<FrameOutput>> {
    if hz == 0 {
        bail!("refresh rate must be positive");
    }
    let mut interval = tokio::time::interval(Duration::from_secs_f64(1.0 / f64::from(hz)));
    let mut last = None;

    for (n, frame) in frames.iter().enumerate() {
        interval.tick().await;

        if let Some(rx) = console_rx.as_mut() {
            while let Ok(line) = rx.try_recv() {
                if line == "quit" {
                    info!(frame = n, "Replay stopped");
                    return Ok(last);
                }
                match driver.console.exec(&line) {
                    Ok(output) => {
                        for line in output {
                            println!("{}", line);
                        }
                    }
                    Err(e) => {
                        println!("Error: {:#}", e);
                    }
                }
            }
        }

        let out = driver.step(frame);
        if n % hz as usize == 0 {
            info!(
                frame = n,
                snap_turn = out.snap_turn,
                screen_layer = out.screen_layer,
                stabilised = out.weapon.stabilised,
                "Frame"
            );
        }
        last = Some(out);
    }

    Ok(last)
}
