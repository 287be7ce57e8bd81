//! Controller-driven touch cursor for the screen layer (menus, scoreboard).

use crate::command::{CommandSink, EngineCommand, TouchPhase};
use crate::controller::{Buttons, ControllerSample};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TouchCursor {
    touching: bool,
    /// Trigger is still held from before the cursor took over.
    held_over: bool,
}

impl TouchCursor {
    /// Normalized cursor position for a controller aimed at the screen layer.
    pub fn position(pointer: &ControllerSample, head_yaw: f32) -> (f32, f32) {
        let angles = pointer.pose.orientation.to_yaw_pitch_roll(0.0);
        let yaw = (angles.yaw - head_yaw).to_radians();
        let x = 0.5 - yaw.sin();
        let y = 0.5 + angles.pitch.to_radians().sin();
        (x.clamp(0.0, 1.0), y.clamp(0.0, 1.0))
    }

    pub fn update(&mut self, pointer: &ControllerSample, head_yaw: f32, sink: &mut impl CommandSink) {
        let held = pointer.buttons.contains(Buttons::TRIGGER);
        if self.held_over {
            self.held_over = held;
            return;
        }
        let phase = match (self.touching, held) {
            (false, true) => TouchPhase::Down,
            (true, true) => TouchPhase::Motion,
            (true, false) => TouchPhase::Up,
            (false, false) => return,
        };
        self.touching = held;

        let (x, y) = Self::position(pointer, head_yaw);
        sink.dispatch(EngineCommand::Touch { phase, x, y });
    }

    /// Ignores the trigger until it is next released.
    pub fn hold_until_released(&mut self) {
        self.held_over = !self.touching;
    }

    /// Lifts an active touch, e.g. when the screen layer closes mid-press.
    pub fn release(&mut self, sink: &mut impl CommandSink) {
        self.held_over = false;
        if std::mem::take(&mut self.touching) {
            sink.dispatch(EngineCommand::Touch {
                phase: TouchPhase::Up,
                x: 0.5,
                y: 0.5,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vr_shared::math::{Quat, Vec3};

    #[test]
    fn centered_pointer_hits_middle() {
        let (x, y) = TouchCursor::position(&ControllerSample::default(), 0.0);
        assert!((x - 0.5).abs() < 1e-5 && (y - 0.5).abs() < 1e-5);
    }

    #[test]
    fn pointing_left_moves_cursor_left() {
        let mut pointer = ControllerSample::default();
        pointer.pose.orientation = Quat::from_axis_angle(Vec3::new(0.0, 1.0, 0.0), 20.0);
        let (x, _) = TouchCursor::position(&pointer, 0.0);
        assert!(x < 0.5, "{x}");
    }

    #[test]
    fn press_hold_release_sequence() {
        let mut cursor = TouchCursor::default();
        let mut out = Vec::new();
        let mut pointer = ControllerSample::default();

        cursor.update(&pointer, 0.0, &mut out);
        assert!(out.is_empty());

        pointer.buttons = Buttons::TRIGGER;
        cursor.update(&pointer, 0.0, &mut out);
        cursor.update(&pointer, 0.0, &mut out);
        pointer.buttons = Buttons::empty();
        cursor.update(&pointer, 0.0, &mut out);

        let phases: Vec<TouchPhase> = out
            .iter()
            .map(|c| match c {
                EngineCommand::Touch { phase, .. } => *phase,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(phases, vec![TouchPhase::Down, TouchPhase::Motion, TouchPhase::Up]);
    }

    #[test]
    fn trigger_held_over_waits_for_release() {
        let mut cursor = TouchCursor::default();
        let mut out = Vec::new();
        let mut pointer = ControllerSample::default();
        pointer.buttons = Buttons::TRIGGER;

        cursor.hold_until_released();
        cursor.update(&pointer, 0.0, &mut out);
        cursor.update(&pointer, 0.0, &mut out);
        assert!(out.is_empty());

        pointer.buttons = Buttons::empty();
        cursor.update(&pointer, 0.0, &mut out);
        assert!(out.is_empty());

        pointer.buttons = Buttons::TRIGGER;
        cursor.update(&pointer, 0.0, &mut out);
        assert!(matches!(out.as_slice(), [EngineCommand::Touch { phase: TouchPhase::Down, .. }]));
    }
}
