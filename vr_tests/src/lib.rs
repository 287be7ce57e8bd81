//! Test fixtures for driving an [`InputSession`] frame by frame.

use vr_input::{
    controller::{Buttons, FrameInput},
    tunables::Tunables,
    EngineCommand, FrameOutput, InputSession,
};
use vr_shared::math::{Vec2, Vec3};

/// Nominal 72 Hz frame time.
pub const FRAME_MS: f64 = 1000.0 / 72.0;

/// A session plus the frame it will translate next.
pub struct Rig {
    pub session: InputSession,
    pub tunables: Tunables,
    pub frame: FrameInput,
}

impl Default for Rig {
    fn default() -> Self {
        Self::new(InputSession::default())
    }
}

impl Rig {
    pub fn new(session: InputSession) -> Self {
        let mut frame = FrameInput::default();
        frame.head.position = Vec3::new(0.0, 1.6, 0.0);
        frame.left.pose.position = Vec3::new(-0.2, 1.0, -0.3);
        frame.right.pose.position = Vec3::new(0.2, 1.0, -0.3);
        Self {
            session,
            tunables: Tunables::default(),
            frame,
        }
    }

    pub fn at(&mut self, now_ms: f64) -> &mut Self {
        self.frame.now_ms = now_ms;
        self
    }

    pub fn left(&mut self, buttons: Buttons) -> &mut Self {
        self.frame.left.buttons = buttons;
        self
    }

    pub fn right(&mut self, buttons: Buttons) -> &mut Self {
        self.frame.right.buttons = buttons;
        self
    }

    pub fn right_stick(&mut self, x: f32, y: f32) -> &mut Self {
        self.frame.right.joystick = Vec2::new(x, y);
        self
    }

    /// Translates the current frame and advances the clock by one frame.
    pub fn step(&mut self) -> (FrameOutput, Vec<EngineCommand>) {
        let mut out = Vec::new();
        let result = self.session.translate(&self.frame, &self.tunables, &mut out);
        self.frame.now_ms += FRAME_MS;
        (result, out)
    }

    /// Steps and returns only the commands.
    pub fn commands(&mut self) -> Vec<EngineCommand> {
        self.step().1
    }
}
