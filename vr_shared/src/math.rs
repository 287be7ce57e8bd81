//! Math types.
//!
//! This module intentionally stays small and deterministic.
//! Angles are in degrees unless a name says otherwise. Engine angles follow the
//! Quake convention: positive yaw turns left, positive pitch looks down.

use serde::{Deserialize, Serialize};

/// 2D vector (joystick axes, planar rotations).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    pub fn scale(self, s: f32) -> Self {
        Self::new(self.x * s, self.y * s)
    }
}

/// 3D vector in tracking space (x right, y up, -z forward).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, rhs: Self) -> f32 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    pub fn cross(self, rhs: Self) -> Self {
        Self::new(
            self.y * rhs.z - self.z * rhs.y,
            self.z * rhs.x - self.x * rhs.z,
            self.x * rhs.y - self.y * rhs.x,
        )
    }

    pub fn len_sq(self) -> f32 {
        self.dot(self)
    }

    pub fn length(self) -> f32 {
        self.len_sq().sqrt()
    }

    pub fn scale(self, s: f32) -> Self {
        Self::new(self.x * s, self.y * s, self.z * s)
    }

    /// Rotates the horizontal (x, z) components about the vertical axis.
    pub fn rotate_horizontal(self, degrees: f32) -> Self {
        let v = rotate_about_origin(self.x, self.z, degrees);
        Self::new(v.x, self.y, v.y)
    }
}

impl std::ops::Add for Vec3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

/// Unit quaternion (conceptually).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quat {
    pub const IDENTITY: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Rotation of `degrees` about a (not necessarily unit) axis.
    pub fn from_axis_angle(axis: Vec3, degrees: f32) -> Self {
        let len = axis.length();
        if len == 0.0 || !len.is_finite() {
            return Self::IDENTITY;
        }
        let half = degrees.to_radians() * 0.5;
        let a = axis.scale(half.sin() / len);
        Self::new(a.x, a.y, a.z, half.cos())
    }

    /// Returns the unit quaternion, or identity if `self` has no usable length.
    pub fn normalized(self) -> Self {
        let len = (self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w).sqrt();
        if len == 0.0 || !len.is_finite() {
            return Self::IDENTITY;
        }
        Self::new(self.x / len, self.y / len, self.z / len, self.w / len)
    }

    /// Rotates `v` by this quaternion (assumed unit).
    pub fn rotate(self, v: Vec3) -> Vec3 {
        let u = Vec3::new(self.x, self.y, self.z);
        let t = u.cross(v).scale(2.0);
        v + t.scale(self.w) + u.cross(t)
    }

    /// Decomposes a tracking-space orientation into engine angles.
    ///
    /// `pitch_adjust` tilts the controller's local forward axis upward before
    /// the decomposition, so a positive bias yields a more negative (upward)
    /// engine pitch for the same physical grip.
    pub fn to_yaw_pitch_roll(self, pitch_adjust: f32) -> Angles {
        let q = self.normalized();
        let (s, c) = pitch_adjust.to_radians().sin_cos();

        let forward = to_engine_axes(q.rotate(Vec3::new(0.0, s, -c)));
        let right = to_engine_axes(q.rotate(Vec3::new(1.0, 0.0, 0.0)));
        let up = to_engine_axes(q.rotate(Vec3::new(0.0, c, s)));

        let yaw = forward.y.atan2(forward.x);
        let pitch = (-forward.z).atan2(forward.x.hypot(forward.y));
        let roll = (-right.z).atan2(up.z);

        Angles::new(pitch.to_degrees(), yaw.to_degrees(), roll.to_degrees())
    }
}

/// Maps tracking axes (x right, y up, -z forward) to engine axes
/// (x forward, y left, z up).
fn to_engine_axes(v: Vec3) -> Vec3 {
    Vec3::new(-v.z, -v.x, v.y)
}

/// Euler angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Angles {
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
}

impl Angles {
    pub const fn new(pitch: f32, yaw: f32, roll: f32) -> Self {
        Self { pitch, yaw, roll }
    }
}

/// Rotates `(x, y)` by `-degrees` about the origin.
///
/// Callers pass the negated angle they want applied, matching how the engine
/// expresses "undo this yaw" for offsets and headings.
pub fn rotate_about_origin(x: f32, y: f32, degrees: f32) -> Vec2 {
    let (s, c) = (-degrees).to_radians().sin_cos();
    Vec2::new(c * x + s * y, c * y - s * x)
}

/// Wraps an angle into `[-180, 180)`.
pub fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = (angle + 180.0).rem_euclid(360.0) - 180.0;
    // rem_euclid can round up to the modulus for tiny negative inputs.
    if wrapped >= 180.0 {
        -180.0
    } else {
        wrapped
    }
}
