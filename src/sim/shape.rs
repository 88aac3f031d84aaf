//! Entity capabilities and outline builders
//!
//! Entities are plain structs that opt into what they can do:
//! - `Positioned`: placement on the grid and a collision footprint
//! - `Renderable`: the outline(s) a renderer draws and collision reads

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::math::{Circle, Polygon, rotate};

/// Stable identity for level entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Hands out entity ids; owned by the level that spawns the entities
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new entity ID
    pub fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next += 1;
        id
    }
}

/// Axis-aligned bounds in screen space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// One drawn outline: points already in screen space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    /// Sub-shape name, e.g. "center"
    pub id: String,
    pub points: Polygon,
    pub background: String,
    /// 0-1
    pub opacity: f32,
}

impl Projection {
    pub fn new(id: impl Into<String>, points: Polygon, background: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            points,
            background: background.into(),
            opacity: 1.0,
        }
    }
}

/// Something placed in the level
pub trait Positioned {
    fn bounds(&self) -> Bounds;
    fn collision_circle(&self) -> Circle;
}

/// Something with a current on-screen outline
pub trait Renderable {
    fn projection(&self) -> Vec<Projection>;

    /// Only the sub-shapes with the given name
    fn projection_named(&self, id: &str) -> Vec<Projection> {
        self.projection().into_iter().filter(|p| p.id == id).collect()
    }
}

/// Rectangle outline with extra points every `step` along each edge
///
/// Wall collision only tests vertices, so long edges need intermediate points.
pub fn sampled_rect(origin: Vec2, width: f32, height: f32, step: f32) -> Polygon {
    let corners = [
        origin,
        origin + Vec2::new(width, 0.0),
        origin + Vec2::new(width, height),
        origin + Vec2::new(0.0, height),
    ];
    let mut points = Vec::new();
    for i in 0..4 {
        let a = corners[i];
        let b = corners[(i + 1) % 4];
        let len = (b - a).length();
        let segments = if step > 0.0 {
            (len / step).ceil().max(1.0) as usize
        } else {
            1
        };
        for s in 0..segments {
            points.push(a + (b - a) * (s as f32 / segments as f32));
        }
    }
    points
}

/// Regular polygon centred on `center`, first vertex rotated by `phase`
pub fn regular_polygon(center: Vec2, radius: f32, sides: usize, phase: f32) -> Polygon {
    let step = std::f32::consts::TAU / sides as f32;
    (0..sides)
        .map(|i| center + rotate(Vec2::new(radius, 0.0), phase + step * i as f32))
        .collect()
}

/// Rotate local-space points by `phi` and move them to `origin`
pub fn place(local: &[Vec2], origin: Vec2, phi: f32) -> Polygon {
    local.iter().map(|p| origin + rotate(*p, phi)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_allocator_is_sequential() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.allocate(), EntityId(0));
        assert_eq!(ids.allocate(), EntityId(1));
        let mut other = IdAllocator::new();
        assert_eq!(other.allocate(), EntityId(0));
    }

    #[test]
    fn test_sampled_rect_spacing() {
        let rect = sampled_rect(Vec2::ZERO, 48.0, 48.0, 12.0);
        assert_eq!(rect.len(), 16);
        assert_eq!(rect[0], Vec2::ZERO);
        let n = rect.len();
        for i in 0..n {
            let gap = (rect[(i + 1) % n] - rect[i]).length();
            assert!(gap <= 12.0 + 1e-4);
        }
    }

    #[test]
    fn test_regular_polygon_radius() {
        let c = Vec2::new(5.0, 5.0);
        let octagon = regular_polygon(c, 10.0, 8, 0.3);
        assert_eq!(octagon.len(), 8);
        assert!(octagon.iter().all(|p| ((*p - c).length() - 10.0).abs() < 1e-4));
    }

    #[test]
    fn test_bounds_center() {
        let b = Bounds {
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 5.0,
        };
        assert_eq!(b.center(), Vec2::new(5.0, 2.5));
    }
}
