//! Rotating convex polygon geometry
//!
//! The polygon is kinematic: it spins at a constant angular velocity about a
//! fixed center and is never pushed by the ball. Vertices are stored relative
//! to the center at zero rotation; world-space vertices are rebuilt from the
//! current angle every tick so rotation error never accumulates.

use glam::Vec2;

use crate::{rotate_degrees, wrap_degrees};

/// Squared edge length below which an edge is treated as degenerate
pub const DEGENERATE_EDGE_LEN_SQ: f32 = 1e-8;

/// Vertex order of the polygon outline (in y-up terms)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winding {
    CounterClockwise,
    Clockwise,
}

impl Winding {
    /// Detect winding from the signed (shoelace) area; `None` for zero area
    pub fn of(vertices: &[Vec2]) -> Option<Self> {
        let area = signed_area(vertices);
        if area > f32::EPSILON {
            Some(Winding::CounterClockwise)
        } else if area < -f32::EPSILON {
            Some(Winding::Clockwise)
        } else {
            None
        }
    }

    /// Unit normal of an edge direction that points away from the polygon interior
    #[inline]
    pub fn outward_normal(self, edge: Vec2) -> Vec2 {
        let perp = match self {
            Winding::CounterClockwise => Vec2::new(edge.y, -edge.x),
            Winding::Clockwise => Vec2::new(-edge.y, edge.x),
        };
        perp.normalize_or_zero()
    }
}

/// Signed shoelace area; positive for counter-clockwise outlines
pub fn signed_area(vertices: &[Vec2]) -> f32 {
    let n = vertices.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let a = vertices[i];
        let b = vertices[(i + 1) % n];
        sum += a.perp_dot(b);
    }
    sum * 0.5
}

/// A single polygon edge in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub index: usize,
    pub start: Vec2,
    pub end: Vec2,
    /// Unit normal pointing away from the polygon center (zero for degenerate edges)
    pub outward_normal: Vec2,
}

impl Edge {
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        (self.end - self.start).length_squared() < DEGENERATE_EDGE_LEN_SQ
    }
}

/// Errors raised when building a polygon
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PolygonError {
    #[error("polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),
    #[error("polygon vertices enclose no area")]
    ZeroArea,
    #[error("polygon vertex {0} is not finite")]
    NonFiniteVertex(usize),
    #[error("polygon is not convex at vertex {0}")]
    NotConvex(usize),
}

/// First vertex where the outline turns against `winding`, if any
///
/// Collinear vertices are allowed.
fn concave_vertex(vertices: &[Vec2], winding: Winding) -> Option<usize> {
    let n = vertices.len();
    let sign = match winding {
        Winding::CounterClockwise => 1.0,
        Winding::Clockwise => -1.0,
    };
    (0..n).find_map(|i| {
        let a = vertices[(i + n - 1) % n];
        let b = vertices[i];
        let c = vertices[(i + 1) % n];
        let (ab, bc) = (b - a, c - b);
        let turn = ab.perp_dot(bc) * sign;
        let tolerance = f32::EPSILON * ab.length() * bc.length();
        (turn < -tolerance).then_some(i)
    })
}

/// A convex polygon spinning about a fixed center
#[derive(Debug, Clone)]
pub struct Polygon {
    /// Rotation center (world space)
    pub center: Vec2,
    /// Vertices relative to `center` at zero rotation
    local_vertices: Vec<Vec2>,
    winding: Winding,
    /// Current rotation (degrees, wrapped to [0, 360))
    angle: f32,
    /// Degrees per second
    pub angular_velocity: f32,
    /// World-space vertices for the current angle
    world_vertices: Vec<Vec2>,
}

impl Polygon {
    pub fn new(
        center: Vec2,
        local_vertices: Vec<Vec2>,
        angular_velocity: f32,
    ) -> Result<Self, PolygonError> {
        if local_vertices.len() < 3 {
            return Err(PolygonError::TooFewVertices(local_vertices.len()));
        }
        if let Some(i) = local_vertices.iter().position(|v| !v.is_finite()) {
            return Err(PolygonError::NonFiniteVertex(i));
        }
        let winding = Winding::of(&local_vertices).ok_or(PolygonError::ZeroArea)?;
        if let Some(i) = concave_vertex(&local_vertices, winding) {
            return Err(PolygonError::NotConvex(i));
        }

        let mut polygon = Self {
            center,
            world_vertices: Vec::with_capacity(local_vertices.len()),
            local_vertices,
            winding,
            angle: 0.0,
            angular_velocity,
        };
        polygon.refresh();
        Ok(polygon)
    }

    /// Axis-aligned square of the given side length
    pub fn square(center: Vec2, side: f32, angular_velocity: f32) -> Result<Self, PolygonError> {
        let h = side / 2.0;
        let vertices = vec![
            Vec2::new(-h, -h),
            Vec2::new(h, -h),
            Vec2::new(h, h),
            Vec2::new(-h, h),
        ];
        Self::new(center, vertices, angular_velocity)
    }

    /// Regular polygon with the first vertex on the +x axis
    pub fn regular(
        center: Vec2,
        sides: usize,
        circumradius: f32,
        angular_velocity: f32,
    ) -> Result<Self, PolygonError> {
        let vertices = (0..sides)
            .map(|i| {
                let theta = i as f32 / sides as f32 * 360.0;
                rotate_degrees(Vec2::new(circumradius, 0.0), theta)
            })
            .collect();
        Self::new(center, vertices, angular_velocity)
    }

    #[inline]
    pub fn angle(&self) -> f32 {
        self.angle
    }

    #[inline]
    pub fn winding(&self) -> Winding {
        self.winding
    }

    #[inline]
    pub fn local_vertices(&self) -> &[Vec2] {
        &self.local_vertices
    }

    /// World-space vertices for the current angle, in outline order
    #[inline]
    pub fn world_vertices(&self) -> &[Vec2] {
        &self.world_vertices
    }

    /// Set the rotation directly (wrapped) and rebuild world vertices
    pub fn set_angle(&mut self, degrees: f32) {
        self.angle = wrap_degrees(degrees);
        self.refresh();
    }

    /// Advance rotation by `angular_velocity * dt` and rebuild world vertices
    ///
    /// Returns `false` and keeps the current angle when the step overflows.
    pub fn rotate(&mut self, dt: f32) -> bool {
        let angle = self.angle + self.angular_velocity * dt;
        if !angle.is_finite() {
            return false;
        }
        self.set_angle(angle);
        true
    }

    /// Rebuild world vertices from `angle`, never from the previous world vertices
    fn refresh(&mut self) {
        self.world_vertices.clear();
        self.world_vertices
            .extend(world_vertices_at(&self.local_vertices, self.center, self.angle));
    }

    /// Edges in vertex order starting at index 0
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        let n = self.world_vertices.len();
        (0..n).map(move |i| {
            let start = self.world_vertices[i];
            let end = self.world_vertices[(i + 1) % n];
            Edge {
                index: i,
                start,
                end,
                outward_normal: self.winding.outward_normal(end - start),
            }
        })
    }

    /// Check if a point lies inside (or on) the current outline
    pub fn contains_point(&self, point: Vec2) -> bool {
        self.edges()
            .filter(|e| !e.is_degenerate())
            .all(|e| (point - e.start).dot(e.outward_normal) <= 0.0)
    }
}

/// Rotate `local` vertices by `angle` degrees about the origin, then translate by `center`
pub fn world_vertices_at(
    local: &[Vec2],
    center: Vec2,
    angle: f32,
) -> impl Iterator<Item = Vec2> + '_ {
    let (sin, cos) = angle.to_radians().sin_cos();
    local
        .iter()
        .map(move |v| Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos) + center)
}
