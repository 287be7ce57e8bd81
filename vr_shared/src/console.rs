//! Console system.
//!
//! Provides:
//! - Console variables (cvars) with typed values
//! - Command registration and execution
//! - Engine "button" commands (`+name` / `-name` pairs) with held state
//! - Command history
//!
//! # Usage
//! ```ignore
//! let mut console = Console::new();
//! console.register_cvar("vr_snapturn_angle", CvarValue::Float(45.0), "Snap turn step", CvarFlags::ARCHIVE);
//! console.register_button("attack");
//! console.exec("+attack")?;
//! assert!(console.button_held("attack"));
//! ```

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Arc, RwLock};

use anyhow::{anyhow, bail, Context};
use tracing::debug;

/// Console variable value.
#[derive(Debug, Clone, PartialEq)]
pub enum CvarValue {
    Int(i64),
    Float(f64),
    String(String),
    Bool(bool),
}

impl CvarValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            CvarValue::Int(v) => Some(*v),
            CvarValue::Float(v) => Some(*v as i64),
            CvarValue::Bool(v) => Some(i64::from(*v)),
            CvarValue::String(s) => s.parse().ok(),
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            CvarValue::Float(v) => Some(*v),
            CvarValue::Int(v) => Some(*v as f64),
            CvarValue::Bool(v) => Some(if *v { 1.0 } else { 0.0 }),
            CvarValue::String(s) => s.parse().ok(),
        }
    }

    pub fn as_bool(&self) -> bool {
        match self {
            CvarValue::Bool(v) => *v,
            CvarValue::Int(v) => *v != 0,
            CvarValue::Float(v) => *v != 0.0,
            CvarValue::String(s) => !s.is_empty() && s != "0" && s.to_lowercase() != "false",
        }
    }

    /// Parses console text: int, then float, then bool, else string.
    pub fn parse(text: &str) -> Self {
        if let Ok(v) = text.parse::<i64>() {
            CvarValue::Int(v)
        } else if let Ok(v) = text.parse::<f64>() {
            CvarValue::Float(v)
        } else if text == "true" {
            CvarValue::Bool(true)
        } else if text == "false" {
            CvarValue::Bool(false)
        } else {
            CvarValue::String(text.trim_matches('"').to_string())
        }
    }
}

impl std::fmt::Display for CvarValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CvarValue::Int(v) => write!(f, "{}", v),
            CvarValue::Float(v) => write!(f, "{}", v),
            CvarValue::String(v) => write!(f, "\"{}\"", v),
            CvarValue::Bool(v) => write!(f, "{}", v),
        }
    }
}

/// Console variable metadata.
#[derive(Debug, Clone)]
pub struct Cvar {
    pub name: String,
    pub value: CvarValue,
    pub default: CvarValue,
    pub description: String,
    pub flags: CvarFlags,
}

bitflags::bitflags! {
    /// Cvar flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CvarFlags: u32 {
        const NONE = 0;
        const ARCHIVE = 1 << 0;      // Written back to the VR config
        const ENGINE = 1 << 1;       // Owned by the engine, read-only to VR input
    }
}

impl Default for CvarFlags {
    fn default() -> Self {
        Self::NONE
    }
}

type CvarMap = Arc<RwLock<HashMap<String, Cvar>>>;

/// Command handler function type.
pub type CommandHandler = Box<dyn Fn(&[&str], &mut ConsoleContext) -> anyhow::Result<()> + Send + Sync>;

/// Context passed to command handlers.
pub struct ConsoleContext {
    /// Output buffer for command responses.
    pub output: Vec<String>,
    /// Reference to cvars (for commands that need to read/write them).
    pub cvars: CvarMap,
}

impl ConsoleContext {
    pub fn print(&mut self, msg: impl Into<String>) {
        self.output.push(msg.into());
    }

    pub fn get_cvar(&self, name: &str) -> Option<CvarValue> {
        self.cvars.read().ok()?.get(name).map(|c| c.value.clone())
    }

    pub fn set_cvar(&self, name: &str, value: CvarValue) -> anyhow::Result<()> {
        write_cvar(&self.cvars, name, |cvar| cvar.value = value)
    }
}

fn write_cvar(cvars: &CvarMap, name: &str, f: impl FnOnce(&mut Cvar)) -> anyhow::Result<()> {
    let mut cvars = cvars.write().map_err(|_| anyhow!("cvar lock poisoned"))?;
    match cvars.get_mut(name) {
        Some(cvar) => {
            f(cvar);
            Ok(())
        }
        None => bail!("unknown cvar: {}", name),
    }
}

/// The console.
pub struct Console {
    cvars: CvarMap,
    commands: HashMap<String, CommandHandler>,
    /// Held state of `+name` / `-name` button commands.
    buttons: BTreeMap<String, bool>,
    history: VecDeque<String>,
    max_history: usize,
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

impl Console {
    pub fn new() -> Self {
        let mut console = Self {
            cvars: Arc::new(RwLock::new(HashMap::new())),
            commands: HashMap::new(),
            buttons: BTreeMap::new(),
            history: VecDeque::new(),
            max_history: 100,
        };

        console.register_builtin_commands();
        console
    }

    fn register_builtin_commands(&mut self) {
        // echo <text>
        self.register_command("echo", |args, ctx| {
            ctx.print(args.join(" "));
            Ok(())
        });

        // cvarlist
        self.register_command("cvarlist", |_args, ctx| {
            let cvars = ctx.cvars.read().map_err(|_| anyhow!("cvar lock poisoned"))?;
            let mut lines: Vec<String> = cvars
                .values()
                .map(|cvar| {
                    let archive = if cvar.flags.contains(CvarFlags::ARCHIVE) { " [A]" } else { "" };
                    format!("  {} = {} (default: {}){}", cvar.name, cvar.value, cvar.default, archive)
                })
                .collect();
            drop(cvars);
            lines.sort();
            for line in lines {
                ctx.print(line);
            }
            Ok(())
        });

        // set <cvar> <value>
        self.register_command("set", |args, ctx| {
            if args.len() < 2 {
                bail!("usage: set <cvar> <value>");
            }
            let name = args[0];
            let value = CvarValue::parse(&args[1..].join(" "));
            let shown = value.to_string();
            ctx.set_cvar(name, value)?;
            ctx.print(format!("{} = {}", name, shown));
            Ok(())
        });

        // toggle <cvar>
        self.register_command("toggle", |args, ctx| {
            let Some(name) = args.first() else {
                bail!("usage: toggle <cvar>");
            };
            let current = ctx
                .get_cvar(name)
                .ok_or_else(|| anyhow!("unknown cvar: {}", name))?;
            let next = CvarValue::Int(i64::from(!current.as_bool()));
            ctx.print(format!("{} = {}", name, next));
            ctx.set_cvar(name, next)
        });

        // reset <cvar>
        self.register_command("reset", |args, ctx| {
            let Some(name) = args.first() else {
                bail!("usage: reset <cvar>");
            };
            write_cvar(&ctx.cvars, name, |cvar| cvar.value = cvar.default.clone())?;
            ctx.print(format!("{} reset", name));
            Ok(())
        });
    }

    /// Registers a console variable.
    pub fn register_cvar(&mut self, name: &str, default: CvarValue, description: &str, flags: CvarFlags) {
        let cvar = Cvar {
            name: name.to_string(),
            value: default.clone(),
            default,
            description: description.to_string(),
            flags,
        };
        match self.cvars.write() {
            Ok(mut cvars) => {
                cvars.insert(name.to_string(), cvar);
            }
            Err(poisoned) => {
                poisoned.into_inner().insert(name.to_string(), cvar);
            }
        }
    }

    /// Registers a command.
    pub fn register_command<F>(&mut self, name: &str, handler: F)
    where
        F: Fn(&[&str], &mut ConsoleContext) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.commands.insert(name.to_string(), Box::new(handler));
    }

    /// Registers a `+name` / `-name` button pair, initially released.
    pub fn register_button(&mut self, name: &str) {
        self.buttons.insert(name.to_string(), false);
    }

    /// Returns whether a registered button is currently held.
    pub fn button_held(&self, name: &str) -> bool {
        self.buttons.get(name).copied().unwrap_or(false)
    }

    /// Executes a console command line.
    pub fn exec(&mut self, line: &str) -> anyhow::Result<Vec<String>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with("//") {
            return Ok(Vec::new());
        }

        if self.history.len() == self.max_history {
            self.history.pop_front();
        }
        self.history.push_back(line.to_string());

        let tokens = parse_command_line(line);
        if tokens.is_empty() {
            return Ok(Vec::new());
        }

        let cmd_name = &tokens[0];
        let args: Vec<&str> = tokens[1..].iter().map(|s| s.as_str()).collect();

        if let Some(held) = self.press_button(cmd_name) {
            debug!(button = %cmd_name, held, "button command");
            return Ok(Vec::new());
        }

        let mut ctx = ConsoleContext {
            output: Vec::new(),
            cvars: Arc::clone(&self.cvars),
        };

        // Typing a cvar name queries it; a name plus value sets it.
        if !self.commands.contains_key(cmd_name.as_str()) {
            let cvar_info = self.cvars.read().ok().and_then(|cvars| {
                cvars
                    .get(cmd_name.as_str())
                    .map(|cvar| (cvar.value.clone(), cvar.default.clone(), cvar.description.clone()))
            });

            if let Some((value, default, description)) = cvar_info {
                if args.is_empty() {
                    ctx.print(format!("{} = {} (default: {}) - {}", cmd_name, value, default, description));
                    return Ok(ctx.output);
                }
                return self.exec(&format!("set {} {}", cmd_name, args.join(" ")));
            }
        }

        if let Some(handler) = self.commands.get(cmd_name.as_str()) {
            handler(&args, &mut ctx).with_context(|| format!("command '{}'", cmd_name))?;
        } else {
            ctx.print(format!("Unknown command: {}", cmd_name));
        }

        Ok(ctx.output)
    }

    /// Applies `+name` / `-name` to a registered button, returning the new state.
    fn press_button(&mut self, token: &str) -> Option<bool> {
        let (held, name) = match token.split_at_checked(1)? {
            ("+", name) => (true, name),
            ("-", name) => (false, name),
            _ => return None,
        };
        let state = self.buttons.get_mut(name)?;
        *state = held;
        Some(held)
    }

    /// Gets a cvar value.
    pub fn get_cvar(&self, name: &str) -> Option<CvarValue> {
        self.cvars.read().ok()?.get(name).map(|c| c.value.clone())
    }

    /// Sets a cvar value.
    pub fn set_cvar(&self, name: &str, value: CvarValue) -> anyhow::Result<()> {
        write_cvar(&self.cvars, name, |cvar| cvar.value = value)
    }

    /// Recent command lines, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &str> {
        self.history.iter().map(String::as_str)
    }
}

/// Parses a command line into tokens, respecting quotes.
fn parse_command_line(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
            }
            ' ' | '\t' if !in_quotes => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            _ => {
                current.push(c);
            }
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}
