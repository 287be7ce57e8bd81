//! Movement vectors from head translation and the off-hand stick.

use serde::Serialize;
use vr_shared::math::{rotate_about_origin, Vec2, Vec3};

use crate::shaping::shape_joystick;

/// Strafe/forward pair in engine movement units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct MoveVector {
    pub sideways: f32,
    pub forward: f32,
}

impl From<Vec2> for MoveVector {
    fn from(v: Vec2) -> Self {
        Self {
            sideways: v.x,
            forward: v.y,
        }
    }
}

/// Converts this frame's head translation into movement relative to where the
/// player faces.
///
/// The engine scales input by its forward speed (and the walk modifier while
/// running is held), so the factor is divided by the same amount to keep
/// positional movement 1:1 with the room.
pub fn positional(
    delta: Vec3,
    head_yaw: f32,
    positional_factor: f32,
    forward_speed: f32,
    speed_modifier: f32,
) -> MoveVector {
    let denom = forward_speed * speed_modifier;
    if denom == 0.0 || !denom.is_finite() {
        return MoveVector::default();
    }
    let m = positional_factor / denom;
    rotate_about_origin(-delta.x * m, delta.z * m, -head_yaw).into()
}

/// Shapes the stick and rotates it into `heading`.
pub fn joystick(axis: Vec2, heading: f32) -> MoveVector {
    let shaped = shape_joystick(axis);
    rotate_about_origin(shaped.x, shaped.y, heading).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn stationary_head_does_not_move() {
        assert_eq!(positional(Vec3::ZERO, 30.0, 2600.0, 400.0, 1.0), MoveVector::default());
    }

    #[test]
    fn head_delta_maps_to_engine_axes() {
        let mv = positional(Vec3::new(0.0, 0.0, -0.01), 0.0, 2600.0, 400.0, 1.0);
        assert!(approx(mv.sideways, 0.0));
        assert!(approx(mv.forward, -0.01 * 2600.0 / 400.0), "{mv:?}");
    }

    #[test]
    fn run_modifier_scales_up_positional() {
        let walk = positional(Vec3::new(0.01, 0.0, 0.0), 0.0, 2600.0, 400.0, 1.0);
        let run = positional(Vec3::new(0.01, 0.0, 0.0), 0.0, 2600.0, 400.0, 0.5);
        assert!(approx(run.sideways, walk.sideways * 2.0));
    }

    #[test]
    fn zero_speed_is_guarded() {
        let mv = positional(Vec3::new(0.1, 0.0, 0.1), 0.0, 2600.0, 0.0, 1.0);
        assert_eq!(mv, MoveVector::default());
    }

    #[test]
    fn joystick_heading_rotates_full_deflection() {
        let straight = joystick(Vec2::new(0.0, 1.0), 0.0);
        assert!(approx(straight.forward, 1.0) && approx(straight.sideways, 0.0));

        let turned = joystick(Vec2::new(0.0, 1.0), 90.0);
        assert!(approx(turned.sideways, -1.0) && approx(turned.forward, 0.0), "{turned:?}");
    }
}
