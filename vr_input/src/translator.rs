//! Per-frame controller translation.
//!
//! [`InputSession`] holds everything that must survive between frames (previous
//! button masks, gesture latches, the snap-turn accumulator). It is created once
//! when the VR session starts and handed each frame's [`FrameInput`].

use serde::Serialize;
use tracing::{debug, trace};
use vr_shared::config::Handedness;

use crate::{
    command::{CommandSink, EngineCommand},
    controller::{hand_for, Buttons, Control, ControllerSample, FrameInput, Hand, HandRole},
    edge::{edge, Binding, EdgePolicy, Side, BINDINGS},
    movement::{self, MoveVector},
    stick::{SnapTurn, WeaponSelector},
    touch::TouchCursor,
    tunables::{Tunables, WEAPON_STABILISED},
    weapon::{separation, FlashlightPose, WeaponPose, STABILISE_ENGAGE_DISTANCE},
};

/// Crouch state shared with the engine's duck handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuckState {
    #[default]
    NotDucked,
    /// Ducking because the duck button is held.
    Button,
    /// Ducking because the player physically crouched; the button is ignored.
    Crouched,
}

/// Values derived for the rest of the client this frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct FrameOutput {
    pub weapon: WeaponPose,
    pub flashlight: FlashlightPose,
    pub positional_movement: MoveVector,
    pub joystick_movement: MoveVector,
    /// Cumulative snap-turn yaw in `[-180, 180)`.
    pub snap_turn: f32,
    /// Gameplay translation was skipped for the screen layer.
    pub screen_layer: bool,
}

/// Frame-to-frame state for one pair of controllers.
#[derive(Debug, Clone)]
pub struct InputSession {
    handedness: Handedness,
    prev_left: Buttons,
    prev_right: Buttons,

    dominant_grip_pushed: bool,
    dominant_grip_push_ms: f64,
    finish_reload_next_frame: bool,
    firing_primary: bool,
    firing_secondary: bool,

    showing_screen_layer: bool,
    /// Last frame skipped gameplay translation.
    in_screen_mode: bool,
    duck: DuckState,

    snap: SnapTurn,
    weapon_selector: WeaponSelector,
    touch: TouchCursor,
}

impl Default for InputSession {
    fn default() -> Self {
        Self::new(Handedness::default())
    }
}

/// One frame's view of both controllers with their previous button masks.
struct Hands<'a> {
    frame: &'a FrameInput,
    handedness: Handedness,
    prev_left: Buttons,
    prev_right: Buttons,
}

impl Hands<'_> {
    fn hand(&self, side: Side) -> Hand {
        match side {
            Side::Role(role) => hand_for(self.handedness, role),
            Side::Physical(hand) => hand,
        }
    }

    fn sample(&self, role: HandRole) -> &ControllerSample {
        self.frame.controller(hand_for(self.handedness, role))
    }

    /// New state of `control` on `side` if it changed this frame.
    fn edge(&self, side: Side, control: Control) -> Option<bool> {
        let hand = self.hand(side);
        let prev = match hand {
            Hand::Left => self.prev_left,
            Hand::Right => self.prev_right,
        };
        edge(prev, self.frame.controller(hand).buttons, control.button(hand))
    }

    fn dominant_edge(&self, control: Control) -> Option<bool> {
        self.edge(Side::Role(HandRole::Dominant), control)
    }

    fn off_hand_edge(&self, control: Control) -> Option<bool> {
        self.edge(Side::Role(HandRole::OffHand), control)
    }

    /// Whether `control` on `side` was held last frame.
    fn was_held(&self, side: Side, control: Control) -> bool {
        let hand = self.hand(side);
        let prev = match hand {
            Hand::Left => self.prev_left,
            Hand::Right => self.prev_right,
        };
        prev.intersects(control.button(hand))
    }
}

fn emit(sink: &mut impl CommandSink, cmd: EngineCommand) {
    debug!(command = %cmd, "emit");
    sink.dispatch(cmd);
}

impl InputSession {
    pub fn new(handedness: Handedness) -> Self {
        Self {
            handedness,
            prev_left: Buttons::empty(),
            prev_right: Buttons::empty(),
            dominant_grip_pushed: false,
            dominant_grip_push_ms: 0.0,
            finish_reload_next_frame: false,
            firing_primary: false,
            firing_secondary: false,
            showing_screen_layer: false,
            in_screen_mode: false,
            duck: DuckState::NotDucked,
            snap: SnapTurn::default(),
            weapon_selector: WeaponSelector::default(),
            touch: TouchCursor::default(),
        }
    }

    pub fn handedness(&self) -> Handedness {
        self.handedness
    }

    /// Current snap-turn accumulator.
    pub fn snap_turn(&self) -> f32 {
        self.snap.angle
    }

    pub fn showing_screen_layer(&self) -> bool {
        self.showing_screen_layer
    }

    pub fn duck_state(&self) -> DuckState {
        self.duck
    }

    /// Reports a physical crouch detected from head height.
    pub fn set_physically_crouched(&mut self, crouched: bool) {
        self.duck = match (crouched, self.duck) {
            (true, _) => DuckState::Crouched,
            (false, DuckState::Crouched) => DuckState::NotDucked,
            (false, other) => other,
        };
    }

    /// Translates one frame. Commands go to `sink` in emission order.
    pub fn translate(&mut self, frame: &FrameInput, tunables: &Tunables, sink: &mut impl CommandSink) -> FrameOutput {
        let hands = Hands {
            frame,
            handedness: self.handedness,
            prev_left: self.prev_left,
            prev_right: self.prev_right,
        };

        if hands.off_hand_edge(Control::FaceUpper) == Some(true) {
            self.showing_screen_layer = !self.showing_screen_layer;
            if frame.multiplayer {
                emit(sink, EngineCommand::button("showscores", self.showing_screen_layer));
            }
        }
        run_bindings(&hands, true, tunables, sink);

        let screen_mode = self.showing_screen_layer || !frame.in_game;
        if screen_mode && !self.in_screen_mode {
            self.release_gameplay(&hands, tunables, sink);
            // A trigger held from gameplay must be let go before it touches.
            if hands.was_held(Side::Role(HandRole::Dominant), Control::Trigger) {
                self.touch.hold_until_released();
            }
        }
        self.in_screen_mode = screen_mode;

        let output = if screen_mode {
            let pointer = hands.sample(HandRole::Dominant);
            self.touch.update(pointer, frame.head.orientation.yaw, sink);
            FrameOutput {
                snap_turn: self.snap.angle,
                screen_layer: true,
                ..Default::default()
            }
        } else {
            self.touch.release(sink);
            self.gameplay(&hands, tunables, sink)
        };

        self.prev_left = frame.left.buttons;
        self.prev_right = frame.right.buttons;
        output
    }

    /// Sends the release for every gameplay action still held when the screen
    /// layer takes over, and clears the gesture latches. Release edges that
    /// happen while the layer is up are never seen by gameplay.
    fn release_gameplay(&mut self, hands: &Hands<'_>, tunables: &Tunables, sink: &mut impl CommandSink) {
        if std::mem::take(&mut self.finish_reload_next_frame) {
            emit(sink, EngineCommand::button("reload", false));
        }
        self.dominant_grip_pushed = false;

        if std::mem::take(&mut self.firing_primary) {
            emit(sink, EngineCommand::button("attack", false));
        }
        if std::mem::take(&mut self.firing_secondary) {
            emit(sink, EngineCommand::button("attack2", false));
        }
        if self.duck == DuckState::Button {
            self.duck = DuckState::NotDucked;
            emit(sink, EngineCommand::button("duck", false));
        }
        if hands.was_held(Side::Role(HandRole::OffHand), Control::Grip) && tunables.weapon_stabilised {
            emit(sink, EngineCommand::set_cvar(WEAPON_STABILISED, 0));
        }

        let held = BINDINGS.iter().filter(|b: &&Binding| {
            !b.in_menus && b.policy == EdgePolicy::Both && hands.was_held(b.side, b.control)
        });
        for binding in held {
            emit(sink, binding.command(false, |name| tunables.flag(name)));
        }
    }

    fn gameplay(&mut self, hands: &Hands<'_>, tunables: &Tunables, sink: &mut impl CommandSink) -> FrameOutput {
        let frame = hands.frame;
        let now = frame.now_ms;
        let dominant = hands.sample(HandRole::Dominant);
        let off_hand = hands.sample(HandRole::OffHand);
        let yaw_delta = frame.yaw_delta();

        // Off-hand grip near the weapon hand engages two-handed aim.
        let mut stabilised = tunables.weapon_stabilised;
        match hands.off_hand_edge(Control::Grip) {
            Some(true) if separation(dominant, off_hand) < STABILISE_ENGAGE_DISTANCE => {
                stabilised = true;
                emit(sink, EngineCommand::set_cvar(WEAPON_STABILISED, 1));
            }
            Some(false) => {
                stabilised = false;
                emit(sink, EngineCommand::set_cvar(WEAPON_STABILISED, 0));
            }
            _ => {}
        }

        let weapon = WeaponPose::compute(
            dominant,
            off_hand,
            frame.head.position,
            frame.view_yaw,
            yaw_delta,
            tunables.weapon_pitch_adjust,
            stabilised,
        );

        // Reload stops one frame after it starts so the engine sees the press.
        if std::mem::take(&mut self.finish_reload_next_frame) {
            emit(sink, EngineCommand::button("reload", false));
        }

        if let Some(pushed) = hands.dominant_edge(Control::Grip) {
            let was_pushed = std::mem::replace(&mut self.dominant_grip_pushed, pushed);
            if pushed {
                self.dominant_grip_push_ms = now;
            } else if was_pushed && now - self.dominant_grip_push_ms < tunables.reload_timeout_ms {
                emit(sink, EngineCommand::button("reload", true));
                self.finish_reload_next_frame = true;
            }
        }

        let flashlight = FlashlightPose::compute(off_hand, frame.head.position, yaw_delta);
        let heading = if tunables.walk_follows_controller {
            flashlight.angles.yaw - frame.view_yaw
        } else {
            0.0
        };

        let running = off_hand.buttons.contains(Buttons::TRIGGER);
        let positional_movement = movement::positional(
            frame.head.position_delta,
            frame.head.orientation.yaw,
            tunables.positional_factor,
            tunables.forward_speed,
            if running { tunables.move_speed_key } else { 1.0 },
        );

        // Primary/secondary are latched at press so the matching release is sent.
        if let Some(pressed) = hands.dominant_edge(Control::Trigger) {
            let secondary = if pressed {
                !self.firing_primary
                    && self.dominant_grip_pushed
                    && now - self.dominant_grip_push_ms > tunables.reload_timeout_ms
            } else {
                self.firing_secondary
            };
            if secondary {
                self.firing_secondary = pressed;
                emit(sink, EngineCommand::button("attack2", pressed));
            } else {
                self.firing_primary = pressed;
                emit(sink, EngineCommand::button("attack", pressed));
            }
        }

        if let Some(pressed) = hands.dominant_edge(Control::FaceLower) {
            if self.duck != DuckState::Crouched {
                self.duck = if pressed { DuckState::Button } else { DuckState::NotDucked };
                emit(sink, EngineCommand::button("duck", pressed));
            }
        }

        run_bindings(hands, false, tunables, sink);

        if let Some(cmd) = self.weapon_selector.update(dominant.joystick) {
            emit(sink, cmd);
        }

        let joystick_movement = movement::joystick(off_hand.joystick, heading);
        let applied = self.snap.update(dominant.joystick.x, tunables.snap_turn_angle);
        if applied != 0.0 {
            debug!(applied, total = self.snap.angle, "snap turn");
        }

        trace!(?positional_movement, ?joystick_movement, "movement");
        FrameOutput {
            weapon,
            flashlight,
            positional_movement,
            joystick_movement,
            snap_turn: self.snap.angle,
            screen_layer: false,
        }
    }
}

fn run_bindings(hands: &Hands<'_>, in_menus: bool, tunables: &Tunables, sink: &mut impl CommandSink) {
    for binding in BINDINGS.iter().filter(|b: &&Binding| b.in_menus == in_menus) {
        let Some(pressed) = hands.edge(binding.side, binding.control) else {
            continue;
        };
        if binding.policy.accepts(pressed) {
            emit(sink, binding.command(pressed, |name| tunables.flag(name)));
        }
    }
}
