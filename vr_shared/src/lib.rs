//! `vr_shared`
//!
//! Shared libraries used by the VR input translator and its tools.
//!
//! Design goals:
//! - Deterministic, frame-local math with no hidden state.
//! - A console that doubles as the engine's cvar store and command dispatcher.
//! - No `unsafe`.

pub mod config;
pub mod console;
pub mod math;

pub mod prelude {
    //! Commonly used exports.

    pub use crate::config::*;
    pub use crate::console::{Console, CvarFlags, CvarValue};
    pub use crate::math::*;
}
