/*
 * Geometry Module
 *
 * This module defines the 2D value types the simulation is built on:
 * a small Vector2 with the arithmetic the steering rules need, and an
 * axis-aligned Boundary rectangle the flock is kept inside of.
 */

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// A 2D vector used for positions, velocities and forces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

impl Vector2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };
    pub const X: Self = Self { x: 1.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y
    }

    // z component of the 3D cross product
    pub fn cross(self, other: Self) -> f32 {
        self.x * other.y - self.y * other.x
    }

    pub fn length2(self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    pub fn length(self) -> f32 {
        self.length2().sqrt()
    }

    /// Unit vector in the same direction.
    ///
    /// The zero vector has no direction and yields NaN components; use
    /// [`Vector2::normalize_or_zero`] where a stopped agent is possible.
    pub fn normalize(self) -> Self {
        self / self.length()
    }

    pub fn normalize_or_zero(self) -> Self {
        let length = self.length();
        if length > 0.0 {
            self / length
        } else {
            Self::ZERO
        }
    }

    /// Signed angle in degrees that rotates `other` onto `self`.
    ///
    /// Counter-clockwise is positive in a y-up frame. The result lies in
    /// (-180, 180]; it is 0 when either vector is zero.
    pub fn angle_deg(self, other: Self) -> f32 {
        let denom = self.length() * other.length();
        if denom == 0.0 {
            return 0.0;
        }

        let cos = (self.dot(other) / denom).clamp(-1.0, 1.0);
        let angle = cos.acos().to_degrees();

        if other.cross(self) < 0.0 {
            -angle
        } else {
            angle
        }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vector2 {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Vector2 {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

impl Mul<f32> for Vector2 {
    type Output = Self;

    fn mul(self, scalar: f32) -> Self {
        Self::new(self.x * scalar, self.y * scalar)
    }
}

impl Div<f32> for Vector2 {
    type Output = Self;

    fn div(self, scalar: f32) -> Self {
        Self::new(self.x / scalar, self.y / scalar)
    }
}

impl Neg for Vector2 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl AddAssign for Vector2 {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl SubAssign for Vector2 {
    fn sub_assign(&mut self, other: Self) {
        self.x -= other.x;
        self.y -= other.y;
    }
}

impl MulAssign<f32> for Vector2 {
    fn mul_assign(&mut self, scalar: f32) {
        self.x *= scalar;
        self.y *= scalar;
    }
}

impl DivAssign<f32> for Vector2 {
    fn div_assign(&mut self, scalar: f32) {
        self.x /= scalar;
        self.y /= scalar;
    }
}

impl From<Vector2> for nannou::geom::Vec2 {
    fn from(v: Vector2) -> Self {
        nannou::geom::Vec2::new(v.x, v.y)
    }
}

/// Axis-aligned rectangle. Keeping `min <= max` is up to whoever owns it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Boundary {
    pub min: Vector2,
    pub max: Vector2,
}

impl Boundary {
    pub const fn new(min: Vector2, max: Vector2) -> Self {
        Self { min, max }
    }

    // Rectangle anchored at the origin, as derived from a window size
    pub const fn from_size(width: f32, height: f32) -> Self {
        Self::new(Vector2::ZERO, Vector2::new(width, height))
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn contains(&self, p: Vector2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}
