//! Engine commands emitted by the translator.

use std::fmt;

use vr_shared::console::CvarValue;

/// Keyboard keys the translator synthesizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    Space,
    Shift,
}

impl Key {
    pub fn name(self) -> &'static str {
        match self {
            Key::Escape => "escape",
            Key::Space => "space",
            Key::Shift => "shift",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchPhase {
    Down,
    Motion,
    Up,
}

/// A command for the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCommand {
    /// Held action, rendered as `+name` or `-name`.
    Button { name: &'static str, pressed: bool },
    /// One-shot console line.
    Line(&'static str),
    /// Synthesized key event.
    Key { key: Key, down: bool },
    /// Cvar write.
    SetCvar { name: &'static str, value: CvarValue },
    /// Touch-screen event in normalized `[0, 1]` coordinates.
    Touch { phase: TouchPhase, x: f32, y: f32 },
}

impl EngineCommand {
    pub fn button(name: &'static str, pressed: bool) -> Self {
        EngineCommand::Button { name, pressed }
    }

    pub fn key(key: Key, down: bool) -> Self {
        EngineCommand::Key { key, down }
    }

    pub fn set_cvar(name: &'static str, value: i64) -> Self {
        EngineCommand::SetCvar {
            name,
            value: CvarValue::Int(value),
        }
    }
}

impl fmt::Display for EngineCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineCommand::Button { name, pressed } => {
                write!(f, "{}{}", if *pressed { '+' } else { '-' }, name)
            }
            EngineCommand::Line(line) => f.write_str(line),
            EngineCommand::Key { key, down } => {
                write!(f, "key {} {}", key.name(), if *down { "down" } else { "up" })
            }
            EngineCommand::SetCvar { name, value } => write!(f, "{} {}", name, value),
            EngineCommand::Touch { phase, x, y } => write!(f, "touch {:?} {:.3} {:.3}", phase, x, y),
        }
    }
}

/// Receives commands in emission order.
pub trait CommandSink {
    fn dispatch(&mut self, cmd: EngineCommand);
}

impl CommandSink for Vec<EngineCommand> {
    fn dispatch(&mut self, cmd: EngineCommand) {
        self.push(cmd);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_console_syntax() {
        assert_eq!(EngineCommand::button("attack", true).to_string(), "+attack");
        assert_eq!(EngineCommand::button("attack2", false).to_string(), "-attack2");
        assert_eq!(EngineCommand::Line("impulse 100").to_string(), "impulse 100");
        assert_eq!(EngineCommand::set_cvar("vr_weapon_stabilised", 1).to_string(), "vr_weapon_stabilised 1");
        assert_eq!(EngineCommand::key(Key::Space, false).to_string(), "key space up");
    }
}
