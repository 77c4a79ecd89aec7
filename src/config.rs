//! Simulation configuration
//!
//! Everything that used to be a module-level constant in a one-off script
//! lives here, so several independent simulations can run side by side.
//! Persisted as JSON; missing fields fall back to the defaults in `consts`.

use std::fs;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::polygon::{Polygon, PolygonError};
use crate::sim::state::Rgb;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read or write config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
    #[error("invalid polygon: {0}")]
    Polygon(#[from] PolygonError),
}

/// Shape of the rotating container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapeConfig {
    Square { side: f32 },
    /// At most `MAX_POLYGON_SIDES` sides
    Regular { sides: usize, circumradius: f32 },
    /// Convex outline relative to the center, either winding (checked on build)
    Custom { vertices: Vec<Vec2> },
}

impl Default for ShapeConfig {
    fn default() -> Self {
        ShapeConfig::Square { side: SQUARE_SIDE }
    }
}

/// Whether the viewport edges act as walls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundsMode {
    /// Only the polygon collides; an escaped ball falls forever
    #[default]
    Open,
    /// The four viewport edges are static walls
    Viewport,
}

/// Output surface size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: VIEWPORT_WIDTH,
            height: VIEWPORT_HEIGHT,
        }
    }
}

impl Viewport {
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width as f32 / 2.0, self.height as f32 / 2.0)
    }
}

/// Ball parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallConfig {
    pub radius: f32,
    /// Fraction of velocity kept after a bounce, in (0, 1]
    pub restitution: f32,
    /// Color at spawn and after reset
    pub color: Rgb,
}

impl Default for BallConfig {
    fn default() -> Self {
        Self {
            radius: BALL_RADIUS,
            restitution: BALL_RESTITUTION,
            color: Rgb::RED,
        }
    }
}

/// Complete simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Seed for the collision color RNG
    pub seed: u64,
    pub viewport: Viewport,
    pub shape: ShapeConfig,
    /// Rotation center; the viewport center when absent
    pub center: Option<Vec2>,
    /// Degrees per second
    pub angular_velocity: f32,
    /// Acceleration (pixels/s², screen y grows downward)
    pub gravity: Vec2,
    pub ball: BallConfig,
    /// Longest step a single tick may integrate (seconds)
    pub max_dt: f32,
    /// Extra push-out past the contact point
    pub push_out_epsilon: f32,
    /// Lowest value a random color channel may take
    pub color_min: u8,
    pub bounds: BoundsMode,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            viewport: Viewport::default(),
            shape: ShapeConfig::default(),
            center: None,
            angular_velocity: ANGULAR_VELOCITY,
            gravity: Vec2::new(0.0, GRAVITY_Y),
            ball: BallConfig::default(),
            max_dt: MAX_DT,
            push_out_epsilon: PUSH_OUT_EPSILON,
            color_min: COLOR_CHANNEL_MIN,
            bounds: BoundsMode::Open,
        }
    }
}

impl SimConfig {
    /// Default config with the given seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Resolved rotation center
    pub fn center(&self) -> Vec2 {
        self.center.unwrap_or_else(|| self.viewport.center())
    }

    /// Build the rotating polygon described by this config
    pub fn build_polygon(&self) -> Result<Polygon, ConfigError> {
        let center = self.center();
        let polygon = match &self.shape {
            ShapeConfig::Square { side } => Polygon::square(center, *side, self.angular_velocity)?,
            ShapeConfig::Regular {
                sides,
                circumradius,
            } => Polygon::regular(center, *sides, *circumradius, self.angular_velocity)?,
            ShapeConfig::Custom { vertices } => {
                Polygon::new(center, vertices.clone(), self.angular_velocity)?
            }
        };
        Ok(polygon)
    }

    /// Check ranges that the simulation relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(msg: impl Into<String>) -> Result<(), ConfigError> {
            Err(ConfigError::Invalid(msg.into()))
        }

        let ball = &self.ball;
        if !(ball.radius.is_finite() && ball.radius > 0.0) {
            return invalid(format!("ball radius must be positive, got {}", ball.radius));
        }
        if !(ball.restitution > 0.0 && ball.restitution <= 1.0) {
            return invalid(format!(
                "restitution must be in (0, 1], got {}",
                ball.restitution
            ));
        }
        if !(self.max_dt.is_finite() && self.max_dt > 0.0) {
            return invalid(format!("max_dt must be positive, got {}", self.max_dt));
        }
        if !(self.push_out_epsilon.is_finite() && self.push_out_epsilon >= 0.0) {
            return invalid(format!(
                "push_out_epsilon must be non-negative, got {}",
                self.push_out_epsilon
            ));
        }
        if !self.angular_velocity.is_finite() {
            return invalid("angular_velocity must be finite");
        }
        if !self.gravity.is_finite() {
            return invalid("gravity must be finite");
        }
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return invalid("viewport must be non-empty");
        }
        match &self.shape {
            ShapeConfig::Square { side } if !(side.is_finite() && *side > 0.0) => {
                return invalid(format!("square side must be positive, got {side}"));
            }
            ShapeConfig::Regular { sides, .. } if *sides > MAX_POLYGON_SIDES => {
                return invalid(format!(
                    "regular polygon may have at most {MAX_POLYGON_SIDES} sides, got {sides}"
                ));
            }
            ShapeConfig::Regular { circumradius, .. }
                if !(circumradius.is_finite() && *circumradius > 0.0) =>
            {
                return invalid(format!(
                    "circumradius must be positive, got {circumradius}"
                ));
            }
            _ => {}
        }
        // Vertex count and area
        self.build_polygon()?;
        Ok(())
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("Config saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_scene() {
        let config = SimConfig::default();
        assert_eq!(config.center(), Vec2::new(400.0, 300.0));
        assert_eq!(config.shape, ShapeConfig::Square { side: 200.0 });
        assert_eq!(config.gravity, Vec2::new(0.0, 350.0));
        assert_eq!(config.ball.radius, 10.0);
        assert_eq!(config.bounds, BoundsMode::Open);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SimConfig::from_json(r#"{ "seed": 9, "ball": { "radius": 15 } }"#).unwrap();
        assert_eq!(config.seed, 9);
        assert_eq!(config.ball.radius, 15.0);
        assert_eq!(config.ball.restitution, BALL_RESTITUTION);
        assert_eq!(config.angular_velocity, ANGULAR_VELOCITY);
    }

    #[test]
    fn test_shape_variants_parse() {
        let config = SimConfig::from_json(
            r#"{ "shape": { "kind": "regular", "sides": 6, "circumradius": 120 },
                 "bounds": "viewport" }"#,
        )
        .unwrap();
        assert_eq!(
            config.shape,
            ShapeConfig::Regular {
                sides: 6,
                circumradius: 120.0
            }
        );
        assert_eq!(config.bounds, BoundsMode::Viewport);
        assert_eq!(config.build_polygon().unwrap().world_vertices().len(), 6);
    }

    #[test]
    fn test_rejects_bad_restitution() {
        let err = SimConfig::from_json(r#"{ "ball": { "restitution": 1.5 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        let err = SimConfig::from_json(r#"{ "ball": { "restitution": 0.0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_degenerate_shape() {
        let err = SimConfig::from_json(
            r#"{ "shape": { "kind": "custom", "vertices": [[0, 0], [10, 0]] } }"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Polygon(PolygonError::TooFewVertices(2))
        ));
    }

    #[test]
    fn test_rejects_huge_side_count() {
        let err = SimConfig::from_json(
            r#"{ "shape": { "kind": "regular", "sides": 1000000000000, "circumradius": 100 } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let at_limit = format!(
            r#"{{ "shape": {{ "kind": "regular", "sides": {MAX_POLYGON_SIDES}, "circumradius": 100 }} }}"#
        );
        assert!(SimConfig::from_json(&at_limit).is_ok());
    }

    #[test]
    fn test_rejects_concave_custom_shape() {
        let err = SimConfig::from_json(
            r#"{ "shape": { "kind": "custom",
                 "vertices": [[-50, -50], [50, 0], [-50, 50], [-10, 0]] } }"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Polygon(PolygonError::NotConvex(3))
        ));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            SimConfig::from_json("{ not json").unwrap_err(),
            ConfigError::Parse(_)
        ));
    }

    #[test]
    fn test_save_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.json");

        let mut config = SimConfig::with_seed(1234);
        config.angular_velocity = -45.0;
        config.bounds = BoundsMode::Viewport;
        config.save(&path).unwrap();

        let loaded = SimConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = SimConfig::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
