//! Dominant-stick gestures: snap turning and weapon cycling.

use vr_shared::math::{wrap_degrees, Vec2};

use crate::command::EngineCommand;

const SNAP_TRIGGER: f32 = 0.6;
const SNAP_REARM: f32 = 0.4;
/// Steps larger than this apply once per deflection.
const SNAP_REPEAT_LIMIT: f32 = 10.0;

const SWITCH_TRIGGER: f32 = 0.8;
const SWITCH_BAND: f32 = 0.2;

/// Snap-turn accumulator with independent arm flags per direction.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapTurn {
    /// Accumulated yaw, engine convention, in `[-180, 180)`.
    pub angle: f32,
    right_armed: bool,
    left_armed: bool,
}

impl Default for SnapTurn {
    fn default() -> Self {
        Self {
            angle: 0.0,
            right_armed: true,
            left_armed: true,
        }
    }
}

impl SnapTurn {
    /// Applies this frame's horizontal stick value. Returns the yaw applied.
    pub fn update(&mut self, stick_x: f32, step: f32) -> f32 {
        let mut applied = 0.0;

        if stick_x > SNAP_TRIGGER {
            if self.right_armed {
                applied -= step;
                if step > SNAP_REPEAT_LIMIT {
                    self.right_armed = false;
                }
            }
        } else if stick_x < SNAP_REARM {
            self.right_armed = true;
        }

        if stick_x < -SNAP_TRIGGER {
            if self.left_armed {
                applied += step;
                if step > SNAP_REPEAT_LIMIT {
                    self.left_armed = false;
                }
            }
        } else if stick_x > -SNAP_REARM {
            self.left_armed = true;
        }

        if applied != 0.0 {
            self.angle = wrap_degrees(self.angle + applied);
        }
        applied
    }
}

/// Next/previous weapon on vertical stick flicks, once per excursion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeaponSelector {
    switched: bool,
}

impl WeaponSelector {
    pub fn update(&mut self, stick: Vec2) -> Option<EngineCommand> {
        if self.switched {
            if stick.y.abs() < SWITCH_BAND {
                self.switched = false;
            }
            return None;
        }

        if stick.x.abs() >= SWITCH_BAND {
            return None;
        }
        let line = if stick.y > SWITCH_TRIGGER {
            "invnext"
        } else if stick.y < -SWITCH_TRIGGER {
            "invprev"
        } else {
            return None;
        };
        self.switched = true;
        Some(EngineCommand::Line(line))
    }
}
