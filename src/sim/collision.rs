//! Collision detection between static outlines and the player
//!
//! Two tests are used by the game:
//! - polygon vs polygon with the separating axis theorem (goal contact)
//! - polygon vs circle by vertex containment (walls)
//!
//! Neither test reports errors. Degenerate input simply does not collide.

use glam::Vec2;

use super::math::{Circle, distance_squared};

/// Projection interval of a polygon on one axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

/// Check whether two polygons overlap (separating axis theorem)
///
/// Candidate axes are the edge perpendiculars of both polygons. Intervals that
/// only touch at an endpoint count as separated, identical intervals overlap.
pub fn polygons_overlap(p1: &[Vec2], p2: &[Vec2]) -> bool {
    if p1.len() < 3 || p2.len() < 3 {
        return false;
    }

    edge_normals(p1)
        .chain(edge_normals(p2))
        .all(|axis| projections_overlap(project(p1, axis), project(p2, axis)))
}

/// Interval overlap with open containment, or exact equality
pub fn projections_overlap(a: Interval, b: Interval) -> bool {
    let inside = |v: f32, i: Interval| v > i.min && v < i.max;

    inside(a.min, b)
        || inside(a.max, b)
        || inside(b.min, a)
        || inside(b.max, a)
        || (a.min == b.min && a.max == b.max)
}

/// Project every vertex of `polygon` onto `axis`
///
/// Values are `p·axis / |axis|²`; both polygons are always projected on the
/// same axis so the scale cancels out.
pub fn project(polygon: &[Vec2], axis: Vec2) -> Interval {
    let len_sq = axis.length_squared();
    polygon.iter().fold(
        Interval {
            min: f32::INFINITY,
            max: f32::NEG_INFINITY,
        },
        |acc, p| {
            let d = p.dot(axis) / len_sq;
            Interval {
                min: acc.min.min(d),
                max: acc.max.max(d),
            }
        },
    )
}

/// Perpendiculars of every edge, closing edge included. Zero-length edges are skipped.
fn edge_normals(polygon: &[Vec2]) -> impl Iterator<Item = Vec2> + '_ {
    let n = polygon.len();
    (0..n)
        .map(move |i| polygon[(i + 1) % n] - polygon[i])
        .filter(|edge| *edge != Vec2::ZERO)
        .map(|edge| edge.perp())
}

/// Squared distance against r², inclusive
#[inline]
pub fn point_in_circle(point: Vec2, circle: &Circle) -> bool {
    distance_squared(point, circle.center()) <= circle.r * circle.r
}

/// True if any vertex of `polygon` lies inside `circle`
///
/// Only vertices are tested: a circle wholly inside a polygon, or crossing an
/// edge between two vertices, does not hit.
pub fn circle_hits_polygon(polygon: &[Vec2], circle: &Circle) -> bool {
    polygon.iter().any(|p| point_in_circle(*p, circle))
}
