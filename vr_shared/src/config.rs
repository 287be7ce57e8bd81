//! Configuration system.
//!
//! Loads VR input configuration from JSON strings/files. Every field has a
//! default, so a config file only needs the values a player changed.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Which physical controller holds the weapon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handedness {
    #[default]
    Right,
    Left,
}

impl Handedness {
    /// Value of the engine's `hand` cvar for this handedness.
    pub fn hand_cvar(self) -> i64 {
        match self {
            Handedness::Right => 0,
            Handedness::Left => 1,
        }
    }
}

/// Root VR input configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VrConfig {
    #[serde(default)]
    pub handedness: Handedness,
    /// Display refresh rate used to pace frame replay.
    #[serde(default = "default_refresh_hz")]
    pub refresh_hz: u32,
    /// Initial cvar values.
    #[serde(default)]
    pub cvars: CvarDefaults,
}

fn default_refresh_hz() -> u32 {
    72
}

impl Default for VrConfig {
    fn default() -> Self {
        Self {
            handedness: Handedness::default(),
            refresh_hz: default_refresh_hz(),
            cvars: CvarDefaults::default(),
        }
    }
}

impl VrConfig {
    /// Parses config from JSON.
    pub fn from_json_str(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }

    /// Reads and parses a JSON config file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }
}

/// Starting values for the VR and engine cvars the translator reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CvarDefaults {
    pub weapon_pitch_adjust: f32,
    pub weapon_stabilised: bool,
    pub reload_timeout_ms: u32,
    pub snap_turn_angle: f32,
    pub positional_factor: f32,
    pub walk_direction: i32,
    pub laser_sight: bool,
    pub forward_speed: f32,
    pub move_speed_key: f32,
}

impl Default for CvarDefaults {
    fn default() -> Self {
        Self {
            weapon_pitch_adjust: -20.0,
            weapon_stabilised: false,
            reload_timeout_ms: 200,
            snap_turn_angle: 45.0,
            positional_factor: 2600.0,
            walk_direction: 0,
            laser_sight: false,
            forward_speed: 400.0,
            move_speed_key: 0.3,
        }
    }
}
