//! Button edge detection and the declarative binding table.

use crate::{
    command::{EngineCommand, Key},
    controller::{Buttons, Control, Hand, HandRole},
};

/// Which transitions of a button a binding reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgePolicy {
    Press,
    Release,
    Both,
}

impl EdgePolicy {
    pub fn accepts(self, pressed: bool) -> bool {
        match self {
            EdgePolicy::Press => pressed,
            EdgePolicy::Release => !pressed,
            EdgePolicy::Both => true,
        }
    }
}

/// Returns the new state of `mask` if it changed between `old` and `new`.
pub fn edge(old: Buttons, new: Buttons, mask: Buttons) -> Option<bool> {
    let now = new.intersects(mask);
    (old.intersects(mask) != now).then_some(now)
}

/// Where a binding's button lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Role(HandRole),
    /// Fixed physical hand, for buttons only one controller has.
    Physical(Hand),
}

/// What a binding does on an accepted edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundAction {
    /// `+name` / `-name` with the new button state.
    Button(&'static str),
    /// Key event with the new button state.
    Key(Key),
    /// One-shot console line.
    Line(&'static str),
    /// Flip a boolean cvar.
    ToggleCvar(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub side: Side,
    pub control: Control,
    pub policy: EdgePolicy,
    pub action: BoundAction,
    /// Also active while the screen layer is shown.
    pub in_menus: bool,
}

const fn bind(side: Side, control: Control, policy: EdgePolicy, action: BoundAction) -> Binding {
    Binding {
        side,
        control,
        policy,
        action,
        in_menus: false,
    }
}

/// Stateless bindings. Stateful gestures (fire, reload, duck, stabilisation,
/// screen layer) live in the translator.
pub const BINDINGS: &[Binding] = &[
    Binding {
        in_menus: true,
        ..bind(Side::Physical(Hand::Left), Control::Menu, EdgePolicy::Both, BoundAction::Key(Key::Escape))
    },
    bind(Side::Role(HandRole::Dominant), Control::Stick, EdgePolicy::Both, BoundAction::Button("use")),
    bind(Side::Role(HandRole::Dominant), Control::FaceUpper, EdgePolicy::Both, BoundAction::Key(Key::Space)),
    bind(Side::Role(HandRole::OffHand), Control::Stick, EdgePolicy::Press, BoundAction::ToggleCvar(crate::tunables::LASER_SIGHT)),
    bind(Side::Role(HandRole::OffHand), Control::FaceLower, EdgePolicy::Release, BoundAction::Line("impulse 100")),
    bind(Side::Role(HandRole::OffHand), Control::Trigger, EdgePolicy::Both, BoundAction::Key(Key::Shift)),
];

impl Binding {
    /// Command for an accepted edge; `cvar_on` is the current value of a toggled cvar.
    pub fn command(&self, pressed: bool, cvar_on: impl FnOnce(&'static str) -> bool) -> EngineCommand {
        match self.action {
            BoundAction::Button(name) => EngineCommand::button(name, pressed),
            BoundAction::Key(key) => EngineCommand::key(key, pressed),
            BoundAction::Line(line) => EngineCommand::Line(line),
            BoundAction::ToggleCvar(name) => EngineCommand::set_cvar(name, i64::from(!cvar_on(name))),
        }
    }
}
