//! Simulation state: the ball, its color, and the simulator that owns them

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Contact;
use super::polygon::Polygon;
use crate::config::{ConfigError, SimConfig};

/// 8-bit RGB color, laid out as packed `rgb24` bytes
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const RED: Rgb = Rgb::new(255, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Random color with every channel drawn uniformly from `[min_channel, 255]`
    pub fn random<R: Rng>(rng: &mut R, min_channel: u8) -> Self {
        Self {
            r: rng.random_range(min_channel..=u8::MAX),
            g: rng.random_range(min_channel..=u8::MAX),
            b: rng.random_range(min_channel..=u8::MAX),
        }
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(c: Rgb) -> Self {
        [c.r, c.g, c.b]
    }
}

/// Per-tick contact classification (not a persisted mode)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContactPhase {
    /// No contact resolved this tick
    #[default]
    Free,
    /// A contact was resolved this tick
    Colliding,
}

/// The dynamic ball
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Fraction of velocity kept after a bounce, in (0, 1]
    pub restitution: f32,
    pub color: Rgb,
}

impl Ball {
    /// Ball at rest at `pos`
    pub fn new(pos: Vec2, radius: f32, restitution: f32, color: Rgb) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius,
            restitution,
            color,
        }
    }

    /// Semi-implicit Euler step under constant acceleration
    #[inline]
    pub fn integrate(&mut self, gravity: Vec2, dt: f32) {
        self.vel += gravity * dt;
        self.pos += self.vel * dt;
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.pos.is_finite() && self.vel.is_finite()
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }
}

/// Read-only view of everything a renderer needs for one frame
#[derive(Debug, Clone, Copy)]
pub struct SceneView<'a> {
    /// Polygon outline in world space, in vertex order
    pub vertices: &'a [Vec2],
    pub ball_pos: Vec2,
    pub ball_radius: f32,
    pub ball_color: Rgb,
    pub phase: ContactPhase,
    pub contact: Option<Contact>,
}

/// One rotating polygon and one ball, plus the constants that drive them
///
/// Generic over the color RNG so tests can inject a seeded source; the
/// default is a PCG stream seeded from `SimConfig::seed`.
#[derive(Debug, Clone)]
pub struct Simulator<R = Pcg32> {
    pub(crate) config: SimConfig,
    pub(crate) polygon: Polygon,
    pub(crate) ball: Ball,
    pub(crate) rng: R,
    /// Ticks actually integrated (skipped ticks are not counted)
    pub(crate) time_ticks: u64,
    /// Simulated seconds integrated so far
    pub(crate) elapsed: f64,
    pub(crate) phase: ContactPhase,
    pub(crate) last_contact: Option<Contact>,
}

impl Simulator<Pcg32> {
    /// Create a simulator whose color RNG is seeded from `config.seed`
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        let rng = Pcg32::seed_from_u64(config.seed);
        Self::with_rng(config, rng)
    }
}

impl<R: Rng> Simulator<R> {
    /// Create a simulator with an explicit color RNG
    pub fn with_rng(config: SimConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let polygon = config.build_polygon()?;
        let ball = Self::spawn_ball(&config, &polygon);

        log::debug!(
            "Simulator ready: {} vertices, {} deg/s, ball r={} at {:?}",
            polygon.world_vertices().len(),
            polygon.angular_velocity,
            ball.radius,
            ball.pos
        );

        Ok(Self {
            config,
            polygon,
            ball,
            rng,
            time_ticks: 0,
            elapsed: 0.0,
            phase: ContactPhase::Free,
            last_contact: None,
        })
    }

    /// Fresh ball at the polygon center, at rest
    fn spawn_ball(config: &SimConfig, polygon: &Polygon) -> Ball {
        Ball::new(
            polygon.center,
            config.ball.radius,
            config.ball.restitution,
            config.ball.color,
        )
    }

    /// Put the ball back at its initial state; the polygon keeps rotating
    pub fn reset(&mut self) {
        self.ball = Self::spawn_ball(&self.config, &self.polygon);
        self.phase = ContactPhase::Free;
        self.last_contact = None;
        log::info!("Ball reset at tick {}", self.time_ticks);
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    /// Mutable ball access for hosts that script initial conditions
    pub fn ball_mut(&mut self) -> &mut Ball {
        &mut self.ball
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn phase(&self) -> ContactPhase {
        self.phase
    }

    /// Contact resolved during the last integrated tick
    pub fn last_contact(&self) -> Option<Contact> {
        self.last_contact
    }

    /// Everything a renderer needs for the current frame
    pub fn view(&self) -> SceneView<'_> {
        SceneView {
            vertices: self.polygon.world_vertices(),
            ball_pos: self.ball.pos,
            ball_radius: self.ball.radius,
            ball_color: self.ball.color,
            phase: self.phase,
            contact: self.last_contact,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_random_color_respects_floor() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..500 {
            let c = Rgb::random(&mut rng, 100);
            assert!(c.r >= 100 && c.g >= 100 && c.b >= 100);
        }
    }

    #[test]
    fn test_random_color_reproducible() {
        let mut a = Pcg32::seed_from_u64(42);
        let mut b = Pcg32::seed_from_u64(42);
        for _ in 0..20 {
            assert_eq!(Rgb::random(&mut a, 50), Rgb::random(&mut b, 50));
        }
    }

    #[test]
    fn test_rgb_is_packed() {
        let pixels = [Rgb::RED, Rgb::WHITE];
        let bytes: &[u8] = bytemuck::cast_slice(&pixels);
        assert_eq!(bytes, &[255, 0, 0, 255, 255, 255]);
    }

    #[test]
    fn test_rgb_serializes_as_triple() {
        let json = serde_json::to_string(&Rgb::new(1, 2, 3)).unwrap();
        assert_eq!(json, "[1,2,3]");
        let back: Rgb = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Rgb::new(1, 2, 3));
    }

    #[test]
    fn test_integrate_gravity() {
        let mut ball = Ball::new(Vec2::new(400.0, 300.0), 10.0, 0.8, Rgb::RED);
        ball.integrate(Vec2::new(0.0, 350.0), 0.1);
        assert!((ball.vel.y - 35.0).abs() < 1e-4);
        assert!((ball.pos.y - 303.5).abs() < 1e-3);
        assert_eq!(ball.pos.x, 400.0);
    }
}
