//! Cvar-backed tunables, snapshotted once per frame.

use tracing::warn;
use vr_shared::{
    config::{CvarDefaults, VrConfig},
    console::{Console, CvarFlags, CvarValue},
};

pub const WEAPON_PITCH_ADJUST: &str = "vr_weapon_pitchadjust";
pub const WEAPON_STABILISED: &str = "vr_weapon_stabilised";
pub const RELOAD_TIMEOUT_MS: &str = "vr_reloadtimeoutms";
pub const SNAP_TURN_ANGLE: &str = "vr_snapturn_angle";
pub const POSITIONAL_FACTOR: &str = "vr_positional_factor";
pub const WALK_DIRECTION: &str = "vr_walkdirection";
pub const LASER_SIGHT: &str = "vr_lasersight";
pub const FORWARD_SPEED: &str = "cl_forwardspeed";
pub const MOVE_SPEED_KEY: &str = "cl_movespeedkey";
pub const HAND: &str = "hand";

/// Read-only view of the engine's settings.
pub trait TunableStore {
    fn tunable(&self, name: &str) -> Option<CvarValue>;
}

impl TunableStore for Console {
    fn tunable(&self, name: &str) -> Option<CvarValue> {
        self.get_cvar(name)
    }
}

/// Settings the translator reads each frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Tunables {
    pub weapon_pitch_adjust: f32,
    pub weapon_stabilised: bool,
    pub reload_timeout_ms: f64,
    pub snap_turn_angle: f32,
    pub positional_factor: f32,
    /// Joystick walking follows the off-hand controller when `true`, the head otherwise.
    pub walk_follows_controller: bool,
    pub laser_sight: bool,
    pub forward_speed: f32,
    pub move_speed_key: f32,
}

impl Default for Tunables {
    fn default() -> Self {
        Self::from_defaults(&CvarDefaults::default())
    }
}

impl Tunables {
    pub fn from_defaults(d: &CvarDefaults) -> Self {
        Self {
            weapon_pitch_adjust: d.weapon_pitch_adjust,
            weapon_stabilised: d.weapon_stabilised,
            reload_timeout_ms: f64::from(d.reload_timeout_ms),
            snap_turn_angle: d.snap_turn_angle,
            positional_factor: d.positional_factor,
            walk_follows_controller: d.walk_direction == 0,
            laser_sight: d.laser_sight,
            forward_speed: d.forward_speed,
            move_speed_key: d.move_speed_key,
        }
    }

    /// Current value of a boolean cvar the translator owns.
    pub fn flag(&self, name: &str) -> bool {
        match name {
            WEAPON_STABILISED => self.weapon_stabilised,
            LASER_SIGHT => self.laser_sight,
            _ => false,
        }
    }

    /// Reads every tunable from `store`, keeping the default for anything
    /// missing or unparsable.
    pub fn read(store: &impl TunableStore) -> Self {
        let d = Self::default();
        let float = |name: &str, fallback: f32| -> f32 {
            match store.tunable(name).as_ref().map(CvarValue::as_float) {
                Some(Some(v)) => v as f32,
                Some(None) => {
                    warn!(cvar = name, "cvar is not numeric, using default");
                    fallback
                }
                None => fallback,
            }
        };
        let flag = |name: &str, fallback: bool| -> bool {
            store.tunable(name).map_or(fallback, |v| v.as_bool())
        };

        Self {
            weapon_pitch_adjust: float(WEAPON_PITCH_ADJUST, d.weapon_pitch_adjust),
            weapon_stabilised: flag(WEAPON_STABILISED, d.weapon_stabilised),
            reload_timeout_ms: f64::from(float(RELOAD_TIMEOUT_MS, d.reload_timeout_ms as f32)),
            snap_turn_angle: float(SNAP_TURN_ANGLE, d.snap_turn_angle),
            positional_factor: float(POSITIONAL_FACTOR, d.positional_factor),
            walk_follows_controller: !flag(WALK_DIRECTION, !d.walk_follows_controller),
            laser_sight: flag(LASER_SIGHT, d.laser_sight),
            forward_speed: float(FORWARD_SPEED, d.forward_speed),
            move_speed_key: float(MOVE_SPEED_KEY, d.move_speed_key),
        }
    }
}

/// Registers the cvars the translator reads, seeded from `config`.
pub fn register_cvars(console: &mut Console, config: &VrConfig) {
    let c = &config.cvars;
    let archived = [
        (WEAPON_PITCH_ADJUST, CvarValue::Float(f64::from(c.weapon_pitch_adjust)), "Weapon pitch bias (degrees)"),
        (WEAPON_STABILISED, CvarValue::Int(i64::from(c.weapon_stabilised)), "Two-handed weapon aim"),
        (RELOAD_TIMEOUT_MS, CvarValue::Int(i64::from(c.reload_timeout_ms)), "Grip tap window for reload (ms)"),
        (SNAP_TURN_ANGLE, CvarValue::Float(f64::from(c.snap_turn_angle)), "Snap turn step (degrees)"),
        (POSITIONAL_FACTOR, CvarValue::Float(f64::from(c.positional_factor)), "Positional movement scale"),
        (WALK_DIRECTION, CvarValue::Int(i64::from(c.walk_direction)), "0: off-hand oriented walking, 1: head oriented"),
        (LASER_SIGHT, CvarValue::Int(i64::from(c.laser_sight)), "Laser sight"),
    ];
    for (name, value, description) in archived {
        console.register_cvar(name, value, description, CvarFlags::ARCHIVE);
    }

    console.register_cvar(FORWARD_SPEED, CvarValue::Float(f64::from(c.forward_speed)), "Forward speed", CvarFlags::ENGINE);
    console.register_cvar(MOVE_SPEED_KEY, CvarValue::Float(f64::from(c.move_speed_key)), "Speed key modifier", CvarFlags::ENGINE);
    console.register_cvar(HAND, CvarValue::Int(config.handedness.hand_cvar()), "Weapon hand", CvarFlags::ENGINE);
}
