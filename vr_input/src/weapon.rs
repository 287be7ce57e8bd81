//! Weapon and flashlight poses relative to the player's view.
//!
//! Offsets are expressed in head-relative space by undoing the difference
//! between the engine view yaw and the physical head yaw. Weapon angles are
//! produced in three variants that differ only in pitch bias; the game picks
//! whichever suits the held weapon.

use serde::Serialize;
use tracing::trace;
use vr_shared::math::{Angles, Vec3};

use crate::controller::ControllerSample;

/// Below this separation the hands are treated as together (one-handed grip)
/// and two-handed aim is suppressed.
pub const STABILISE_MIN_SEPARATION: f32 = 0.15;
/// The off-hand grip only engages stabilisation within this separation.
pub const STABILISE_ENGAGE_DISTANCE: f32 = 0.50;

const MELEE_PITCH_ADJUST: f32 = -30.0;
const FLASHLIGHT_PITCH_ADJUST: f32 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct WeaponAngles {
    pub adjusted: Angles,
    pub unadjusted: Angles,
    pub melee: Angles,
}

impl WeaponAngles {
    fn map(self, f: impl Fn(Angles) -> Angles) -> Self {
        Self {
            adjusted: f(self.adjusted),
            unadjusted: f(self.unadjusted),
            melee: f(self.melee),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct WeaponPose {
    pub offset: Vec3,
    pub velocity: Vec3,
    pub angles: WeaponAngles,
    /// Angles came from the two-handed baseline this frame.
    pub stabilised: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct FlashlightPose {
    pub offset: Vec3,
    pub angles: Angles,
}

/// Position of a tracked point relative to the head, in view-aligned space.
pub fn relative_offset(point: Vec3, head: Vec3, yaw_delta: f32) -> Vec3 {
    (point - head).rotate_horizontal(-yaw_delta)
}

/// Distance between the two controllers.
pub fn separation(a: &ControllerSample, b: &ControllerSample) -> f32 {
    (a.pose.position - b.pose.position).length()
}

/// Pitch and yaw of the line from the dominant hand to the off hand.
///
/// Returns `None` for baselines that would divide by zero.
pub fn two_handed_aim(dominant: Vec3, off_hand: Vec3, yaw_delta: f32) -> Option<(f32, f32)> {
    let d = off_hand - dominant;
    let horizontal = d.x.hypot(d.z);
    if horizontal == 0.0 || d.z == 0.0 {
        return None;
    }
    let pitch = (d.y / horizontal).atan().to_degrees();
    let yaw = yaw_delta - d.x.atan2(-d.z).to_degrees();
    (pitch.is_finite() && yaw.is_finite()).then_some((pitch, yaw))
}

impl WeaponPose {
    pub fn compute(
        dominant: &ControllerSample,
        off_hand: &ControllerSample,
        head: Vec3,
        view_yaw: f32,
        yaw_delta: f32,
        pitch_adjust: f32,
        stabilise: bool,
    ) -> Self {
        let offset = relative_offset(dominant.pose.position, head, yaw_delta);
        let velocity = dominant.pose.linear_velocity.rotate_horizontal(-view_yaw);

        let q = dominant.pose.orientation;
        let raw = WeaponAngles {
            adjusted: q.to_yaw_pitch_roll(pitch_adjust),
            unadjusted: q.to_yaw_pitch_roll(0.0),
            melee: q.to_yaw_pitch_roll(MELEE_PITCH_ADJUST),
        };

        let two_handed = if stabilise && separation(dominant, off_hand) > STABILISE_MIN_SEPARATION {
            two_handed_aim(dominant.pose.position, off_hand.pose.position, yaw_delta)
        } else {
            None
        };

        let angles = match two_handed {
            Some((pitch, yaw)) => raw.map(|a| Angles::new(pitch, yaw, a.roll)),
            None => raw.map(|a| Angles::new(-a.pitch, a.yaw + yaw_delta, a.roll)),
        };

        trace!(?offset, ?velocity, stabilised = two_handed.is_some(), "weapon pose");
        Self {
            offset,
            velocity,
            angles,
            stabilised: two_handed.is_some(),
        }
    }
}

impl FlashlightPose {
    pub fn compute(off_hand: &ControllerSample, head: Vec3, yaw_delta: f32) -> Self {
        let offset = relative_offset(off_hand.pose.position, head, yaw_delta);
        let mut angles = off_hand.pose.orientation.to_yaw_pitch_roll(FLASHLIGHT_PITCH_ADJUST);
        angles.yaw += yaw_delta;
        Self { offset, angles }
    }
}
