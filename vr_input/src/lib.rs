//! `vr_input`
//!
//! Per-frame translation of two tracked VR controllers into engine input:
//! - Weapon and flashlight poses relative to the view
//! - Positional and joystick movement vectors
//! - Edge-triggered engine commands (fire, reload, duck, use, run, ...)
//! - Snap turning and weapon cycling on the dominant stick
//! - A touch cursor while the screen layer is shown
//!
//! The translator itself is pure per-frame logic over an explicit
//! [`InputSession`]; engine dispatch and the cvar store are reached through
//! [`CommandSink`] and [`tunables::TunableStore`].

pub mod command;
pub mod controller;
pub mod edge;
pub mod movement;
pub mod replay;
pub mod shaping;
pub mod stick;
pub mod touch;
pub mod translator;
pub mod tunables;
pub mod weapon;

pub use command::{CommandSink, EngineCommand};
pub use controller::FrameInput;
pub use translator::{FrameOutput, InputSession};
pub use tunables::Tunables;
