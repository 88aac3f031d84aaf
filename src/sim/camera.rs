//! Security cameras and their view cones
//!
//! A camera sweeps around a base direction and sees every point that is both
//! within range and inside the angular cone. Direction vectors are screen-space
//! (y down); angles are measured with y up, so "up" on screen is +π/2.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::math::{Circle, distance_squared, normalize, rotate, screen_angle};
use super::shape::{Bounds, EntityId, Positioned, Projection, Renderable, place, sampled_rect};

/// Cone geometry for renderers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewCone {
    pub origin: Vec2,
    pub range: f32,
    /// Start angle (radians, y up)
    pub start: f32,
    /// End angle (radians, y up), always `start + width`
    pub end: f32,
    /// The camera saw the player on the last check
    pub alert: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    pub id: EntityId,
    /// Centre of the camera cell
    pub position: Vec2,
    /// Cell size the view distance is measured in
    pub radius: f32,
    pub base_direction: Vec2,
    /// Animated direction (unit, screen space)
    pub direction: Vec2,
    /// Range as a multiple of `radius`
    pub view_distance: f32,
    /// Cone width as a fraction of π
    pub view_angle: f32,
    /// Peak-to-peak sweep (radians)
    pub rotation: f32,
    /// Sweep phase offset (radians)
    pub phase: f32,
    /// Sweep clock rate (radians per second)
    pub sweep_speed: f32,
    /// Set by the game logic each frame, used for colouring only
    #[serde(skip)]
    pub saw_player: bool,
}

impl Camera {
    pub fn new(id: EntityId, position: Vec2, radius: f32, base_direction: Vec2) -> Self {
        let base_direction = normalize(base_direction);
        Self {
            id,
            position,
            radius,
            base_direction,
            direction: base_direction,
            view_distance: 3.0,
            view_angle: 0.25,
            rotation: 0.0,
            phase: 0.0,
            sweep_speed: 1.0,
            saw_player: false,
        }
    }

    pub fn with_view(mut self, view_distance: f32, view_angle: f32) -> Self {
        self.view_distance = view_distance;
        self.view_angle = view_angle;
        self
    }

    pub fn with_sweep(mut self, rotation: f32, phase: f32, sweep_speed: f32) -> Self {
        self.rotation = rotation;
        self.phase = phase;
        self.sweep_speed = sweep_speed;
        self
    }

    /// Advance the sweep to wall-clock time `time_secs`
    pub fn animate(&mut self, time_secs: f64) {
        let clock = time_secs * self.sweep_speed as f64 + self.phase as f64;
        let offset = clock.sin() as f32 * self.rotation / 2.0;
        self.direction = rotate(self.base_direction, offset);
    }

    /// Angular width of the cone (radians)
    #[inline]
    pub fn cone_width(&self) -> f32 {
        self.view_angle * PI
    }

    /// Angle the cone is centred on
    #[inline]
    pub fn heading(&self) -> f32 {
        screen_angle(self.direction)
    }

    /// Angle where the cone starts, half a cone width before the heading
    #[inline]
    pub fn cone_start(&self) -> f32 {
        self.heading() - self.cone_width() / 2.0
    }

    /// Viewing range in pixels
    #[inline]
    pub fn range(&self) -> f32 {
        self.radius * self.view_distance
    }

    pub fn view_cone(&self) -> ViewCone {
        let start = self.cone_start();
        ViewCone {
            origin: self.position,
            range: self.range(),
            start,
            end: start + self.cone_width(),
            alert: self.saw_player,
        }
    }

    /// Is `p` within range and inside the cone?
    pub fn sees_point(&self, p: Vec2) -> bool {
        let range = self.range();
        if distance_squared(self.position, p) > range * range {
            return false;
        }

        let start = self.cone_start();
        let end = start + self.cone_width();
        let angle = screen_angle(p - self.position);

        // The cone may cross ±π, so try the angle on both sides of the cut
        [angle, angle + TAU, angle - TAU]
            .iter()
            .any(|a| *a >= start && *a <= end)
    }

    /// Does any vertex of any outline fall inside the view cone?
    pub fn sees_any_point(&self, projections: &[Projection]) -> bool {
        projections
            .iter()
            .any(|shape| shape.points.iter().any(|p| self.sees_point(*p)))
    }
}

impl Positioned for Camera {
    fn bounds(&self) -> Bounds {
        let half = self.radius / 2.0;
        Bounds {
            x: self.position.x - half,
            y: self.position.y - half,
            width: self.radius,
            height: self.radius,
        }
    }

    fn collision_circle(&self) -> Circle {
        Circle::new(self.position.x, self.position.y, self.radius / 2.0)
    }
}

impl Renderable for Camera {
    fn projection(&self) -> Vec<Projection> {
        let body = self.radius * 0.4;
        let origin = self.position - Vec2::splat(body / 2.0);
        let lens = [
            Vec2::new(body * 0.2, -body * 0.25),
            Vec2::new(body * 0.8, -body * 0.15),
            Vec2::new(body * 0.8, body * 0.15),
            Vec2::new(body * 0.2, body * 0.25),
        ];
        // `place` rotates in y-up terms, screen y is flipped
        let lens: Vec<Vec2> = place(&lens, Vec2::ZERO, self.heading())
            .into_iter()
            .map(|p| self.position + Vec2::new(p.x, -p.y))
            .collect();
        let colour = if self.saw_player { "#e53935" } else { "#fdd835" };
        vec![
            Projection::new("body", sampled_rect(origin, body, body, body), "#37474f"),
            Projection::new("lens", lens, colour),
        ]
    }
}
