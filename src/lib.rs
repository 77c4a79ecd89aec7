//! Roto Bounce - a ball bouncing inside a rotating polygon
//!
//! Core modules:
//! - `sim`: Deterministic simulation (rotation, integration, collisions)
//! - `config`: Serializable simulation configuration
//! - `platform`: Clock sources that drive the simulation
//! - `render`: Software rasterizer for the scene
//! - `record`: Frame capture to an external video encoder

pub mod config;
pub mod platform;
pub mod record;
pub mod render;
pub mod sim;

pub use config::{BoundsMode, ConfigError, ShapeConfig, SimConfig};
pub use sim::{Simulator, TickInput, tick};

use glam::Vec2;

/// Simulation configuration constants
pub mod consts {
    /// Target simulation rate (steps per second)
    pub const TARGET_HZ: f32 = 60.0;
    /// Nominal step for fixed-rate clocks
    pub const SIM_DT: f32 = 1.0 / TARGET_HZ;
    /// Largest dt a single step may integrate (longer pauses are clamped)
    pub const MAX_DT: f32 = 0.1;

    /// Viewport dimensions
    pub const VIEWPORT_WIDTH: u32 = 800;
    pub const VIEWPORT_HEIGHT: u32 = 600;

    /// Square defaults
    pub const SQUARE_SIDE: f32 = 200.0;
    /// Upper bound on sides for configured regular polygons
    pub const MAX_POLYGON_SIDES: usize = 1024;
    /// degrees per second
    pub const ANGULAR_VELOCITY: f32 = 60.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 10.0;
    pub const BALL_RESTITUTION: f32 = 0.8;
    /// Gravity (pixels/s², screen y grows downward)
    pub const GRAVITY_Y: f32 = 350.0;

    /// Extra push-out past the contact so the ball does not re-penetrate next tick
    pub const PUSH_OUT_EPSILON: f32 = 0.1;
    /// Lowest value a random color channel may take (keeps colors away from black)
    pub const COLOR_CHANNEL_MIN: u8 = 100;
}

/// Wrap an angle in degrees to [0, 360)
#[inline]
pub fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Rotate a point about the origin by `degrees`
#[inline]
pub fn rotate_degrees(v: Vec2, degrees: f32) -> Vec2 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Shortest angular distance between two angles in degrees, in [0, 180]
#[inline]
pub fn angle_distance_degrees(a: f32, b: f32) -> f32 {
    let d = wrap_degrees(a - b);
    d.min(360.0 - d)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_degrees() {
        assert_eq!(wrap_degrees(0.0), 0.0);
        assert!((wrap_degrees(370.0) - 10.0).abs() < 1e-4);
        assert!((wrap_degrees(-90.0) - 270.0).abs() < 1e-4);
        assert!(wrap_degrees(-1e-9) < 360.0);
    }

    #[test]
    fn test_rotate_degrees_quarter_turn() {
        let v = rotate_degrees(Vec2::new(1.0, 0.0), 90.0);
        assert!(v.x.abs() < 1e-6);
        assert!((v.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_angle_distance_wraps() {
        assert!((angle_distance_degrees(359.5, 0.5) - 1.0).abs() < 1e-3);
        assert!((angle_distance_degrees(90.0, 270.0) - 180.0).abs() < 1e-3);
    }
}
