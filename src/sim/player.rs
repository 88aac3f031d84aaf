//! The player's on-screen body
//!
//! Mirrors the logical player: the game logic pushes position, heading and
//! animation flags in, and reads the outline and collision circle back out.

use std::f32::consts::PI;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::math::{Circle, normalize};
use super::shape::{Bounds, Positioned, Projection, Renderable, place, regular_polygon};

/// Animation flag: walking
pub const ANIMATE_WALK: u8 = 1;

/// Walk cycles per second
const STEPS_PER_SECOND: f64 = 2.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Avatar {
    pub position: Vec2,
    /// Heading with y up
    pub direction: Vec2,
    pub width: f32,
    /// Collision radius as a fraction of `width`
    pub collision_radius: f32,
    /// Requested animations (bit flags)
    pub animation: u8,
    walk_started_ms: Option<f64>,
    walk_phase: f32,
    /// How far broken pieces have drifted, `None` while intact
    scatter: Option<f32>,
}

impl Avatar {
    pub fn new(position: Vec2, width: f32, collision_radius: f32) -> Self {
        Self {
            position,
            direction: Vec2::new(0.0, 1.0),
            width,
            collision_radius,
            animation: 0,
            walk_started_ms: None,
            walk_phase: 0.0,
            scatter: None,
        }
    }

    pub fn update_coordinates(&mut self, position: Vec2) {
        self.position = position;
    }

    /// `v` uses y up
    pub fn update_direction_vector(&mut self, v: Vec2) {
        self.direction = v;
    }

    /// Resize to a new grid and put the pieces back together
    pub fn reset(&mut self, width: f32) {
        self.width = width;
        self.scatter = None;
        self.animation = 0;
        self.walk_started_ms = None;
        self.walk_phase = 0.0;
    }

    /// Start the death animation
    pub fn break_shapes(&mut self) {
        self.scatter = Some(0.0);
    }

    pub fn is_broken(&self) -> bool {
        self.scatter.is_some()
    }

    pub fn animate(&mut self, time_ms: f64) {
        if self.animation & ANIMATE_WALK != 0 {
            let start = *self.walk_started_ms.get_or_insert(time_ms);
            let elapsed = (time_ms - start).max(0.0) / 1000.0;
            self.walk_phase = (elapsed * STEPS_PER_SECOND).fract() as f32;
        } else if self.walk_started_ms.is_some() {
            self.walk_started_ms = None;
            self.walk_phase = 0.0;
        }

        if let Some(scatter) = self.scatter.as_mut() {
            *scatter = (*scatter + self.width * 0.05).min(self.width);
        }
    }

    /// Angle of the heading (y up)
    fn heading(&self) -> f32 {
        if self.direction == Vec2::ZERO {
            return PI / 2.0;
        }
        self.direction.y.atan2(self.direction.x)
    }

    /// Local-space (facing +x, y up) piece to screen space
    fn to_screen(&self, local: &[Vec2], anchor: Vec2) -> Vec<Vec2> {
        let drift = self.scatter.unwrap_or(0.0) * normalize(anchor);
        let shifted: Vec<Vec2> = local.iter().map(|p| *p + drift).collect();
        place(&shifted, Vec2::ZERO, self.heading())
            .into_iter()
            .map(|p| self.position + Vec2::new(p.x, -p.y))
            .collect()
    }
}

impl Positioned for Avatar {
    fn bounds(&self) -> Bounds {
        let half = self.width / 2.0;
        Bounds {
            x: self.position.x - half,
            y: self.position.y - half,
            width: self.width,
            height: self.width,
        }
    }

    fn collision_circle(&self) -> Circle {
        Circle::new(
            self.position.x,
            self.position.y,
            self.width * self.collision_radius,
        )
    }
}

impl Renderable for Avatar {
    fn projection(&self) -> Vec<Projection> {
        let w = self.width;
        let swing = (self.walk_phase * 2.0 * PI).sin() * w * 0.15;
        let hand = w * 0.12;

        let body = regular_polygon(Vec2::ZERO, w * 0.35, 8, PI / 8.0);
        let left_anchor = Vec2::new(swing, w * 0.4);
        let right_anchor = Vec2::new(-swing, -w * 0.4);
        let left = regular_polygon(left_anchor, hand, 4, PI / 4.0);
        let right = regular_polygon(right_anchor, hand, 4, PI / 4.0);

        vec![
            Projection::new("body", self.to_screen(&body, Vec2::new(-1.0, 0.0)), "#90a4ae"),
            Projection::new("hand_left", self.to_screen(&left, left_anchor), "#cfd8dc"),
            Projection::new("hand_right", self.to_screen(&right, right_anchor), "#cfd8dc"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collision_circle_follows_position() {
        let mut avatar = Avatar::new(Vec2::ZERO, 40.0, 0.3);
        avatar.update_coordinates(Vec2::new(100.0, 50.0));
        let c = avatar.collision_circle();
        assert_eq!(c.center(), Vec2::new(100.0, 50.0));
        assert!((c.r - 12.0).abs() < 1e-6);
    }

    #[test]
    fn test_projection_surrounds_position() {
        let avatar = Avatar::new(Vec2::new(200.0, 200.0), 40.0, 0.3);
        let shapes = avatar.projection();
        assert_eq!(shapes.len(), 3);
        for p in shapes.iter().flat_map(|s| s.points.iter()) {
            assert!((*p - avatar.position).length() <= 40.0);
        }
    }

    #[test]
    fn test_heading_rotates_outline() {
        let mut avatar = Avatar::new(Vec2::ZERO, 40.0, 0.3);
        // Facing right: hands sit above and below the body on screen
        avatar.update_direction_vector(Vec2::new(1.0, 0.0));
        let left = &avatar.projection_named("hand_left")[0];
        let centroid: Vec2 = left.points.iter().copied().sum::<Vec2>() / left.points.len() as f32;
        assert!(centroid.y < -10.0);
        assert!(centroid.x.abs() < 1e-3);
    }

    #[test]
    fn test_walk_animation_starts_and_stops() {
        let mut avatar = Avatar::new(Vec2::ZERO, 40.0, 0.3);
        avatar.animation |= ANIMATE_WALK;
        avatar.animate(1000.0);
        avatar.animate(1125.0);
        assert!((avatar.walk_phase - 0.25).abs() < 1e-4);

        avatar.animation = 0;
        avatar.animate(1200.0);
        assert_eq!(avatar.walk_phase, 0.0);
    }

    #[test]
    fn test_break_and_reset() {
        let mut avatar = Avatar::new(Vec2::ZERO, 40.0, 0.3);
        let intact = avatar.projection();
        avatar.break_shapes();
        avatar.animate(0.0);
        assert!(avatar.is_broken());
        assert_ne!(avatar.projection(), intact);

        avatar.reset(48.0);
        assert!(!avatar.is_broken());
        assert_eq!(avatar.width, 48.0);
    }
}
