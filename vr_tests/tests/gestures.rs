//! Multi-frame gesture scenarios.

use vr_input::{command::Key, controller::Buttons, EngineCommand};
use vr_shared::math::Vec3;
use vr_tests::Rig;

fn reload(pressed: bool) -> EngineCommand {
    EngineCommand::button("reload", pressed)
}

#[test]
fn grip_tap_reloads_with_deferred_release() {
    let mut rig = Rig::default();
    rig.tunables.reload_timeout_ms = 300.0;

    assert!(rig.at(0.0).right(Buttons::GRIP).commands().is_empty());
    assert_eq!(rig.at(100.0).right(Buttons::empty()).commands(), vec![reload(true)]);
    assert_eq!(rig.commands(), vec![reload(false)]);
    assert!(rig.commands().is_empty());
}

#[test]
fn long_grip_gives_secondary_fire_instead_of_reload() {
    let mut rig = Rig::default();
    rig.tunables.reload_timeout_ms = 300.0;

    assert!(rig.at(0.0).right(Buttons::GRIP).commands().is_empty());
    assert!(rig.at(350.0).commands().is_empty());

    assert_eq!(
        rig.at(400.0).right(Buttons::GRIP | Buttons::TRIGGER).commands(),
        vec![EngineCommand::button("attack2", true)]
    );
    assert_eq!(
        rig.at(450.0).right(Buttons::GRIP).commands(),
        vec![EngineCommand::button("attack2", false)]
    );

    // Grip released after the timeout: no reload.
    assert!(rig.at(500.0).right(Buttons::empty()).commands().is_empty());
    assert!(rig.commands().is_empty());

    // Without the grip the trigger is primary fire again.
    assert_eq!(
        rig.right(Buttons::TRIGGER).commands(),
        vec![EngineCommand::button("attack", true)]
    );
}

#[test]
fn secondary_fire_released_after_grip_let_go() {
    let mut rig = Rig::default();
    rig.tunables.reload_timeout_ms = 300.0;

    rig.at(0.0).right(Buttons::GRIP).commands();
    assert_eq!(
        rig.at(400.0).right(Buttons::GRIP | Buttons::TRIGGER).commands(),
        vec![EngineCommand::button("attack2", true)]
    );
    rig.at(450.0).right(Buttons::TRIGGER).commands();
    assert_eq!(
        rig.at(500.0).right(Buttons::empty()).commands(),
        vec![EngineCommand::button("attack2", false)]
    );
}

#[test]
fn primary_fire_started_before_grip_stops_as_primary() {
    let mut rig = Rig::default();
    rig.tunables.reload_timeout_ms = 300.0;

    assert_eq!(
        rig.at(0.0).right(Buttons::TRIGGER).commands(),
        vec![EngineCommand::button("attack", true)]
    );
    rig.at(10.0).right(Buttons::TRIGGER | Buttons::GRIP).commands();
    assert_eq!(
        rig.at(500.0).right(Buttons::GRIP).commands(),
        vec![EngineCommand::button("attack", false)]
    );
}

#[test]
fn stabilisation_engages_only_near_weapon_hand() {
    let mut rig = Rig::default();
    // Off hand 0.42 ahead-left of the weapon hand.
    rig.frame.left.pose.position = Vec3::new(-0.1, 1.0, -0.6);

    let (out, cmds) = rig.left(Buttons::GRIP).step();
    assert_eq!(cmds, vec![EngineCommand::set_cvar("vr_weapon_stabilised", 1)]);
    assert!(out.weapon.stabilised);

    // The engine applies the cvar; aim stays two-handed while held.
    rig.tunables.weapon_stabilised = true;
    let (out, _) = rig.step();
    assert!(out.weapon.stabilised);

    let (out, cmds) = rig.left(Buttons::empty()).step();
    assert_eq!(cmds, vec![EngineCommand::set_cvar("vr_weapon_stabilised", 0)]);
    assert!(!out.weapon.stabilised);
    rig.tunables.weapon_stabilised = false;

    // Hands a metre apart: grip does nothing on press.
    rig.frame.left.pose.position = Vec3::new(-0.8, 1.0, -0.3);
    assert!(rig.left(Buttons::GRIP).commands().is_empty());
}

#[test]
fn stabilised_cvar_overrides_single_hand_aim() {
    let mut rig = Rig::default();
    rig.tunables.weapon_stabilised = true;
    // Off hand straight ahead of the weapon hand and level.
    rig.frame.left.pose.position = Vec3::new(0.2, 1.0, -0.7);

    let (out, _) = rig.step();
    assert!(out.weapon.stabilised);
    assert!(out.weapon.angles.adjusted.pitch.abs() < 1e-4);
    assert!(out.weapon.angles.adjusted.yaw.abs() < 1e-4);
}

#[test]
fn weapon_cycling_and_snap_turn_share_the_stick() {
    let mut rig = Rig::default();
    rig.tunables.snap_turn_angle = 45.0;

    assert_eq!(rig.right_stick(0.0, 0.95).commands(), vec![EngineCommand::Line("invnext")]);
    assert!(rig.commands().is_empty());
    rig.right_stick(0.0, 0.0).commands();

    let (out, cmds) = rig.right_stick(0.9, 0.0).step();
    assert!(cmds.is_empty());
    assert_eq!(out.snap_turn, -45.0);
    let (out, _) = rig.step();
    assert_eq!(out.snap_turn, -45.0);
}

#[test]
fn run_key_and_positional_speed() {
    let mut rig = Rig::default();
    rig.frame.head.position_delta = Vec3::new(0.01, 0.0, 0.0);

    let (walk, _) = rig.step();
    let (run, cmds) = rig.left(Buttons::TRIGGER).step();
    assert_eq!(cmds, vec![EngineCommand::key(Key::Shift, true)]);
    let ratio = run.positional_movement.sideways / walk.positional_movement.sideways;
    assert!((ratio - 1.0 / 0.3).abs() < 1e-3, "{ratio}");
}

#[test]
fn flashlight_impulse_on_release_only() {
    let mut rig = Rig::default();
    assert!(rig.left(Buttons::X).commands().is_empty());
    assert!(rig.commands().is_empty());
    assert_eq!(rig.left(Buttons::empty()).commands(), vec![EngineCommand::Line("impulse 100")]);
}

#[test]
fn laser_toggle_on_press_only() {
    let mut rig = Rig::default();
    assert_eq!(
        rig.left(Buttons::JOYSTICK).commands(),
        vec![EngineCommand::set_cvar("vr_lasersight", 1)]
    );
    assert!(rig.left(Buttons::empty()).commands().is_empty());

    rig.tunables.laser_sight = true;
    assert_eq!(
        rig.left(Buttons::JOYSTICK).commands(),
        vec![EngineCommand::set_cvar("vr_lasersight", 0)]
    );
}

#[test]
fn joystick_walk_follows_off_hand_heading() {
    let mut rig = Rig::default();
    rig.frame.left.joystick = vr_shared::math::Vec2::new(0.0, 1.0);

    let (out, _) = rig.step();
    assert!((out.joystick_movement.forward - 1.0).abs() < 1e-4);

    // Off hand turned 90 degrees left; walking follows it.
    rig.frame.left.pose.orientation =
        vr_shared::math::Quat::from_axis_angle(Vec3::new(0.0, 1.0, 0.0), 90.0);
    let (out, _) = rig.step();
    assert!(out.joystick_movement.forward.abs() < 1e-3, "{:?}", out.joystick_movement);
    assert!((out.joystick_movement.sideways.abs() - 1.0).abs() < 1e-3);

    // Head-oriented walking ignores the controller.
    rig.tunables.walk_follows_controller = false;
    let (out, _) = rig.step();
    assert!((out.joystick_movement.forward - 1.0).abs() < 1e-4);
}

#[test]
fn screen_layer_touch_cycle() {
    let mut rig = Rig::default();
    rig.frame.in_game = false;

    let (out, cmds) = rig.right(Buttons::TRIGGER).step();
    assert!(out.screen_layer);
    assert!(matches!(
        cmds.as_slice(),
        [EngineCommand::Touch { phase: vr_input::command::TouchPhase::Down, .. }]
    ));

    // Returning to game mid-press lifts the touch and does not fire.
    rig.frame.in_game = true;
    let cmds = rig.commands();
    assert!(matches!(
        cmds.as_slice(),
        [EngineCommand::Touch { phase: vr_input::command::TouchPhase::Up, .. }]
    ));
}

#[test]
fn opening_screen_layer_releases_held_actions() {
    let mut rig = Rig::default();
    let held_right = Buttons::TRIGGER | Buttons::A | Buttons::JOYSTICK;

    assert_eq!(
        rig.right(held_right).left(Buttons::TRIGGER).commands(),
        vec![
            EngineCommand::button("attack", true),
            EngineCommand::button("duck", true),
            EngineCommand::button("use", true),
            EngineCommand::key(Key::Shift, true),
        ]
    );

    let (out, cmds) = rig.left(Buttons::TRIGGER | Buttons::Y).step();
    assert!(out.screen_layer);
    assert_eq!(
        cmds,
        vec![
            EngineCommand::button("attack", false),
            EngineCommand::button("duck", false),
            EngineCommand::button("use", false),
            EngineCommand::key(Key::Shift, false),
        ]
    );

    // The fire trigger held over into the menu is not a touch.
    assert!(rig.commands().is_empty());
    assert!(rig.right(Buttons::empty()).left(Buttons::empty()).commands().is_empty());
    assert!(rig.left(Buttons::Y).commands().is_empty());

    // Gameplay resumes with fresh presses only.
    assert!(rig.left(Buttons::empty()).commands().is_empty());
    assert_eq!(
        rig.right(Buttons::TRIGGER).commands(),
        vec![EngineCommand::button("attack", true)]
    );
}

#[test]
fn opening_screen_layer_finishes_pending_reload() {
    let mut rig = Rig::default();
    rig.tunables.reload_timeout_ms = 300.0;

    rig.at(0.0).right(Buttons::GRIP).commands();
    assert_eq!(rig.at(100.0).right(Buttons::empty()).commands(), vec![reload(true)]);
    assert_eq!(rig.left(Buttons::Y).commands(), vec![reload(false)]);
    assert!(rig.commands().is_empty());
}

#[test]
fn grip_released_in_menu_does_not_arm_secondary_fire() {
    let mut rig = Rig::default();
    rig.tunables.reload_timeout_ms = 300.0;

    rig.at(0.0).right(Buttons::GRIP).commands();
    assert!(rig.at(10.0).left(Buttons::Y).commands().is_empty());
    assert!(rig.at(20.0).right(Buttons::empty()).left(Buttons::empty()).commands().is_empty());
    assert!(rig.at(30.0).left(Buttons::Y).commands().is_empty());

    assert_eq!(
        rig.at(1000.0).right(Buttons::TRIGGER).commands(),
        vec![EngineCommand::button("attack", true)]
    );
}

#[test]
fn grip_held_through_menu_does_not_reload_on_release() {
    let mut rig = Rig::default();
    rig.tunables.reload_timeout_ms = 300.0;

    rig.at(0.0).right(Buttons::GRIP).commands();
    rig.at(10.0).left(Buttons::Y).commands();
    rig.at(20.0).left(Buttons::empty()).commands();
    assert!(rig.at(30.0).left(Buttons::Y).commands().is_empty());

    // Back in game within the tap window, but the press happened before the menu.
    assert!(rig.at(50.0).right(Buttons::empty()).commands().is_empty());
    assert!(rig.commands().is_empty());
}
