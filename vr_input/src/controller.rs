//! Tracked controller samples and button roles.
//!
//! Samples arrive once per frame from the VR runtime and are immutable for the
//! rest of the frame. Bindings name a [`Control`] on a [`HandRole`] rather than a
//! physical button, so one binding table serves both handedness settings.

use serde::{Deserialize, Serialize};
use vr_shared::{
    config::Handedness,
    math::{Angles, Quat, Vec2, Vec3},
};

bitflags::bitflags! {
    /// Physical controller buttons.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Buttons: u32 {
        const A = 1 << 0;
        const B = 1 << 1;
        const X = 1 << 8;
        const Y = 1 << 9;
        const ENTER = 1 << 20;
        const JOYSTICK = 1 << 21;
        const GRIP = 1 << 29;
        const TRIGGER = 1 << 30;
    }
}

/// Buttons travel as the runtime's raw bitmask; unknown bits are dropped.
mod button_bits {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::Buttons;

    pub fn serialize<S: Serializer>(buttons: &Buttons, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u32(buttons.bits())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Buttons, D::Error> {
        u32::deserialize(d).map(Buttons::from_bits_truncate)
    }
}

/// Tracked pose of a controller in tracking space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub orientation: Quat,
    #[serde(default)]
    pub linear_velocity: Vec3,
}

/// One controller's state for a frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ControllerSample {
    pub pose: Pose,
    #[serde(default, with = "button_bits")]
    pub buttons: Buttons,
    #[serde(default)]
    pub joystick: Vec2,
}

/// Head (HMD) state for a frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HeadState {
    pub position: Vec3,
    /// Head orientation as engine angles.
    pub orientation: Angles,
    /// Head translation since the previous frame.
    #[serde(default)]
    pub position_delta: Vec3,
}

/// Everything the translator reads for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameInput {
    /// Display time in milliseconds.
    pub now_ms: f64,
    pub left: ControllerSample,
    pub right: ControllerSample,
    pub head: HeadState,
    /// Engine view yaw (includes snap/smooth turning).
    #[serde(default)]
    pub view_yaw: f32,
    /// Engine is in active play with input going to the game.
    #[serde(default = "default_true")]
    pub in_game: bool,
    #[serde(default)]
    pub multiplayer: bool,
}

fn default_true() -> bool {
    true
}

impl Default for FrameInput {
    fn default() -> Self {
        Self {
            now_ms: 0.0,
            left: ControllerSample::default(),
            right: ControllerSample::default(),
            head: HeadState::default(),
            view_yaw: 0.0,
            in_game: true,
            multiplayer: false,
        }
    }
}

impl FrameInput {
    /// Sample held by the given physical hand.
    pub fn controller(&self, hand: Hand) -> &ControllerSample {
        match hand {
            Hand::Left => &self.left,
            Hand::Right => &self.right,
        }
    }

    /// Engine view yaw relative to head yaw.
    pub fn yaw_delta(&self) -> f32 {
        self.view_yaw - self.head.orientation.yaw
    }
}

/// Physical hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hand {
    Left,
    Right,
}

/// Gameplay role of a hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandRole {
    /// Holds the weapon.
    Dominant,
    /// Movement and flashlight.
    OffHand,
}

/// Resolves a role to a physical hand.
pub fn hand_for(handedness: Handedness, role: HandRole) -> Hand {
    match (handedness, role) {
        (Handedness::Right, HandRole::Dominant) | (Handedness::Left, HandRole::OffHand) => Hand::Right,
        (Handedness::Right, HandRole::OffHand) | (Handedness::Left, HandRole::Dominant) => Hand::Left,
    }
}

/// A button by function rather than by label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Trigger,
    Grip,
    /// Joystick click.
    Stick,
    /// A on the right controller, X on the left.
    FaceLower,
    /// B on the right controller, Y on the left.
    FaceUpper,
    Menu,
}

impl Control {
    /// Physical button bit for this control on the given hand.
    pub fn button(self, hand: Hand) -> Buttons {
        match (self, hand) {
            (Control::Trigger, _) => Buttons::TRIGGER,
            (Control::Grip, _) => Buttons::GRIP,
            (Control::Stick, _) => Buttons::JOYSTICK,
            (Control::Menu, _) => Buttons::ENTER,
            (Control::FaceLower, Hand::Right) => Buttons::A,
            (Control::FaceLower, Hand::Left) => Buttons::X,
            (Control::FaceUpper, Hand::Right) => Buttons::B,
            (Control::FaceUpper, Hand::Left) => Buttons::Y,
        }
    }
}
