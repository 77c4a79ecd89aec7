//! Deterministic simulation module
//!
//! All physics lives here. This module must be pure and deterministic:
//! - Caller-supplied dt only (clamped, never trusted)
//! - Seeded RNG only
//! - Stable edge order (by vertex index)
//! - No rendering or platform dependencies

pub mod collision;
pub mod polygon;
pub mod state;
pub mod tick;

pub use collision::{
    Contact, ContactEdge, EdgeSource, ViewportSide, ball_edge_collision, closest_point_on_segment,
    deepest_contact, reflect_velocity,
};
pub use polygon::{Edge, Polygon, PolygonError, Winding};
pub use state::{Ball, ContactPhase, Rgb, SceneView, Simulator};
pub use tick::{TickInput, tick};
