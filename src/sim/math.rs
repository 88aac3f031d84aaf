//! Vector helpers and the primitive shapes used by collision
//!
//! Positions are in screen space: x grows to the right, y grows downward.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Ordered outline; insertion order is winding order.
pub type Polygon = Vec<Vec2>;

/// Collision footprint of the player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub x: f32,
    pub y: f32,
    pub r: f32,
}

impl Circle {
    pub fn new(x: f32, y: f32, r: f32) -> Self {
        Self { x, y, r }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Same radius, new centre
    pub fn moved_to(self, center: Vec2) -> Self {
        Self {
            x: center.x,
            y: center.y,
            ..self
        }
    }
}

/// Unit vector in the direction of `v`, or the zero vector unchanged
#[inline]
pub fn normalize(v: Vec2) -> Vec2 {
    if v == Vec2::ZERO {
        return Vec2::ZERO;
    }
    v / v.length()
}

/// Component-wise linear interpolation; `t` is not clamped
#[inline]
pub fn lerp(v1: Vec2, v2: Vec2, t: f32) -> Vec2 {
    v1 + (v2 - v1) * t
}

/// Rotate `v` counter-clockwise (standard math orientation) by `phi` radians
#[inline]
pub fn rotate(v: Vec2, phi: f32) -> Vec2 {
    let (sin, cos) = phi.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Squared distance between two points
#[inline]
pub fn distance_squared(p1: Vec2, p2: Vec2) -> f32 {
    (p2 - p1).length_squared()
}

/// Angle of a screen-space offset, measured with y pointing up
#[inline]
pub fn screen_angle(offset: Vec2) -> f32 {
    (-offset.y).atan2(offset.x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_normalize_zero_vector() {
        assert_eq!(normalize(Vec2::ZERO), Vec2::ZERO);
    }

    #[test]
    fn test_normalize_diagonal() {
        let n = normalize(Vec2::new(3.0, 4.0));
        assert!((n.x - 0.6).abs() < 1e-6);
        assert!((n.y - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_lerp_is_not_clamped() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, -10.0);
        assert_eq!(lerp(a, b, 0.5), Vec2::new(5.0, -5.0));
        assert_eq!(lerp(a, b, 2.0), Vec2::new(20.0, -20.0));
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let r = rotate(Vec2::new(1.0, 0.0), FRAC_PI_2);
        assert!(r.x.abs() < 1e-6);
        assert!((r.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_screen_angle_up_is_positive() {
        assert!((screen_angle(Vec2::new(0.0, -5.0)) - FRAC_PI_2).abs() < 1e-6);
        assert!(screen_angle(Vec2::new(5.0, 0.0)).abs() < 1e-6);
    }

    #[test]
    fn test_circle_moved_to_keeps_radius() {
        let c = Circle::new(1.0, 2.0, 7.5).moved_to(Vec2::new(10.0, 20.0));
        assert_eq!(c, Circle::new(10.0, 20.0, 7.5));
    }
}
