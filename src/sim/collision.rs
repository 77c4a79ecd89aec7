//! Collision detection and response for a ball against straight edges
//!
//! Every polygon edge (and, in the bounded arena, every viewport edge) is
//! tested with the same closest-point routine. Only the deepest contact found
//! in a tick is resolved, so a ball wedged into a corner is pushed out once
//! instead of being corrected twice.

use glam::Vec2;

use super::polygon::{DEGENERATE_EDGE_LEN_SQ, Edge, Polygon};

/// Ball-to-edge distance below which the contact normal is unreliable
pub const NEAR_MISS_DISTANCE: f32 = 1e-6;

/// Squared segment length below which both endpoints are treated as one point
const POINT_SEGMENT_LEN_SQ: f32 = 1e-12;

/// Viewport side, for the bounded arena
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportSide {
    Top,
    Right,
    Bottom,
    Left,
}

/// Where a contact edge came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeSource {
    /// Polygon edge by index (edge i runs from vertex i to vertex i + 1)
    Polygon(usize),
    /// Static viewport wall
    Viewport(ViewportSide),
}

/// A candidate segment for collision, with the normal the ball is pushed along
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactEdge {
    pub source: EdgeSource,
    pub start: Vec2,
    pub end: Vec2,
    /// Unit normal facing the side the ball belongs on
    pub normal: Vec2,
}

impl ContactEdge {
    /// Polygon edges push the ball back toward the interior, against the outward normal
    pub fn from_polygon_edge(edge: &Edge) -> Self {
        Self {
            source: EdgeSource::Polygon(edge.index),
            start: edge.start,
            end: edge.end,
            normal: -edge.outward_normal,
        }
    }
}

/// Result of a collision check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub source: EdgeSource,
    /// Closest point on the edge to the ball center
    pub point: Vec2,
    /// Surface normal (pointing toward the side the ball is pushed to)
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

/// Closest point to `p` on the segment `a`-`b`
///
/// Degenerate segments collapse to `a`.
#[inline]
pub fn closest_point_on_segment(p: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < POINT_SEGMENT_LEN_SQ {
        return a;
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Check a ball against one edge
///
/// Returns `None` for degenerate edges, for no overlap, and for near-misses
/// where the ball center sits on the edge itself (zero separation vector).
pub fn ball_edge_collision(ball_pos: Vec2, ball_radius: f32, edge: &ContactEdge) -> Option<Contact> {
    if (edge.end - edge.start).length_squared() < DEGENERATE_EDGE_LEN_SQ {
        return None;
    }

    let closest = closest_point_on_segment(ball_pos, edge.start, edge.end);
    let dist = (ball_pos - closest).length();

    if dist >= ball_radius {
        return None;
    }
    if dist < NEAR_MISS_DISTANCE {
        log::trace!(
            "near-miss on {:?}: ball center on edge at {:?}",
            edge.source,
            closest
        );
        return None;
    }

    Some(Contact {
        source: edge.source,
        point: closest,
        normal: edge.normal,
        penetration: ball_radius - dist,
    })
}

/// Scan edges in order and keep the deepest contact (ties keep the earliest edge)
pub fn deepest_contact<I>(ball_pos: Vec2, ball_radius: f32, edges: I) -> Option<Contact>
where
    I: IntoIterator<Item = ContactEdge>,
{
    let mut best: Option<Contact> = None;
    for edge in edges {
        if let Some(contact) = ball_edge_collision(ball_pos, ball_radius, &edge) {
            match best {
                Some(ref b) if b.penetration >= contact.penetration => {}
                _ => best = Some(contact),
            }
        }
    }
    best
}

/// Contact edges of the polygon in vertex order
pub fn polygon_contact_edges(polygon: &Polygon) -> impl Iterator<Item = ContactEdge> + '_ {
    polygon.edges().map(|e| ContactEdge::from_polygon_edge(&e))
}

/// The four viewport walls, normals pointing into the viewport (screen y down)
pub fn viewport_contact_edges(width: f32, height: f32) -> [ContactEdge; 4] {
    let tl = Vec2::ZERO;
    let tr = Vec2::new(width, 0.0);
    let br = Vec2::new(width, height);
    let bl = Vec2::new(0.0, height);
    [
        ContactEdge {
            source: EdgeSource::Viewport(ViewportSide::Top),
            start: tl,
            end: tr,
            normal: Vec2::Y,
        },
        ContactEdge {
            source: EdgeSource::Viewport(ViewportSide::Right),
            start: tr,
            end: br,
            normal: Vec2::NEG_X,
        },
        ContactEdge {
            source: EdgeSource::Viewport(ViewportSide::Bottom),
            start: br,
            end: bl,
            normal: Vec2::NEG_Y,
        },
        ContactEdge {
            source: EdgeSource::Viewport(ViewportSide::Left),
            start: bl,
            end: tl,
            normal: Vec2::X,
        },
    ]
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Velocity after a bounce, or `None` if the ball is already separating
///
/// Only an approaching ball (v·n < 0) is reflected; the reflected velocity is
/// then scaled by `restitution`.
#[inline]
pub fn bounce_velocity(velocity: Vec2, normal: Vec2, restitution: f32) -> Option<Vec2> {
    if velocity.dot(normal) < 0.0 {
        Some(reflect_velocity(velocity, normal) * restitution)
    } else {
        None
    }
}
