//! Joystick response shaping.

use vr_shared::math::Vec2;

const NLF_DEADZONE: f32 = 0.1;
const NLF_POWER: f32 = 2.2;

/// Deadzoned power curve: small deflections produce much smaller output so
/// fine adjustments are easier. Odd-symmetric, zero inside the deadzone, 1 at 1.
pub fn non_linear_filter(input: f32) -> f32 {
    if input > NLF_DEADZONE {
        ((input - NLF_DEADZONE) / (1.0 - NLF_DEADZONE)).powf(NLF_POWER)
    } else if input < -NLF_DEADZONE {
        -((-input - NLF_DEADZONE) / (1.0 - NLF_DEADZONE)).powf(NLF_POWER)
    } else {
        0.0
    }
}

/// Scales the stick by the filtered magnitude, preserving direction.
pub fn shape_joystick(axis: Vec2) -> Vec2 {
    axis.scale(non_linear_filter(axis.length()))
}
