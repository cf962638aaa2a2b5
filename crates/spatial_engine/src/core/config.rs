//! # Spatial Configuration
//!
//! Configuration for the octree, its debug visualization, and the host that
//! drives it every frame.
//!
//! ## Configuration Categories
//!
//! - **Octree Config**: node capacity and depth budget
//! - **Debug Draw Config**: node-bounds visualization style
//! - **Demo Config**: headless simulation parameters
//! - **Spatial Config**: top-level file format tying the above together

use serde::{Deserialize, Serialize};

pub use crate::config::{Config, ConfigError, ConfigFormat};
use crate::foundation::math::Vec3;
use crate::spatial::AABB;

/// # Debug Draw Configuration
///
/// Controls how node bounds are visualized. Node color is derived from the
/// node's remaining depth budget divided by `depth_color_divisor`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugDrawConfig {
    /// Whether `Octree::update` draws node bounds
    pub enabled: bool,
    /// Divisor mapping depth budget to hue in `[0, 1]`
    pub depth_color_divisor: f32,
    /// Line width passed to the debug renderer
    pub line_width: f32,
    /// How long each drawn box lives in a retaining renderer, in seconds
    pub duration: f32,
}

impl DebugDrawConfig {
    /// Create a debug draw configuration with defaults
    pub fn new() -> Self {
        Self {
            enabled: true,
            depth_color_divisor: 10.0,
            line_width: 1.0,
            duration: 0.0,
        }
    }

    /// Enable or disable visualization during update
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the line width
    pub fn with_line_width(mut self, width: f32) -> Self {
        self.line_width = width;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.depth_color_divisor.is_finite() && self.depth_color_divisor > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "depth_color_divisor must be positive, got {}",
                self.depth_color_divisor
            )));
        }
        if !(self.line_width.is_finite() && self.line_width >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "line_width must be non-negative, got {}",
                self.line_width
            )));
        }
        if self.duration.is_nan() || self.duration < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "duration must be non-negative, got {}",
                self.duration
            )));
        }
        Ok(())
    }
}

impl Default for DebugDrawConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Octree Configuration
///
/// `node_capacity` is the number of objects a node holds directly before it
/// tries to subdivide. `max_depth` is the depth budget given to the root; each
/// level of children receives one less, and nodes at budget zero never split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OctreeConfig {
    /// Maximum objects per node before subdivision
    pub node_capacity: usize,
    /// Depth budget of the root node
    pub max_depth: u32,
    /// Node-bounds visualization
    pub debug: DebugDrawConfig,
}

impl OctreeConfig {
    /// Create an octree configuration with defaults
    pub fn new() -> Self {
        Self {
            node_capacity: 8,
            max_depth: 8,
            debug: DebugDrawConfig::default(),
        }
    }

    /// Set node capacity
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.node_capacity = capacity;
        self
    }

    /// Set root depth budget
    pub fn with_max_depth(mut self, depth: u32) -> Self {
        self.max_depth = depth;
        self
    }

    /// Set debug draw settings
    pub fn with_debug(mut self, debug: DebugDrawConfig) -> Self {
        self.debug = debug;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.node_capacity == 0 {
            return Err(ConfigError::Invalid(
                "node_capacity must be at least 1".to_string(),
            ));
        }
        self.debug.validate()
    }
}

impl Default for OctreeConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Config for OctreeConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        OctreeConfig::validate(self)
    }
}

/// # Demo Configuration
///
/// Parameters of the headless simulation that exercises the octree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Number of moving objects to spawn
    pub object_count: usize,
    /// Number of frames to simulate
    pub frames: u32,
    /// Fixed simulation time step in seconds
    pub time_step: f32,
    /// Maximum object speed in world units per second
    pub max_speed: f32,
    /// Fraction of objects allowed to drift out of the world
    pub escape_ratio: f32,
    /// Log stats every N frames
    pub report_interval: u32,
    /// RNG seed, random when absent
    pub seed: Option<u64>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            object_count: 200,
            frames: 240,
            time_step: 1.0 / 60.0,
            max_speed: 8.0,
            escape_ratio: 0.05,
            report_interval: 60,
            seed: None,
        }
    }
}

impl DemoConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.time_step.is_finite() && self.time_step > 0.0) {
            return Err(ConfigError::Invalid("time_step must be positive".to_string()));
        }
        if !(0.0..=1.0).contains(&self.escape_ratio) {
            return Err(ConfigError::Invalid(
                "escape_ratio must be within [0, 1]".to_string(),
            ));
        }
        if self.report_interval == 0 {
            return Err(ConfigError::Invalid(
                "report_interval must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// # Complete Spatial Configuration
///
/// Top-level configuration file contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpatialConfig {
    /// Default log level filter (`RUST_LOG` overrides)
    pub log_level: String,
    /// World-space bounds of the root node
    pub world_bounds: AABB,
    /// Octree settings
    pub octree: OctreeConfig,
    /// Demo simulation settings
    pub demo: DemoConfig,
}

impl SpatialConfig {
    /// Create a configuration with a cubic world of the given half size
    pub fn with_half_size(half_size: f32) -> Self {
        Self {
            world_bounds: AABB::from_center_extents(Vec3::zeros(), Vec3::repeat(half_size)),
            ..Self::default()
        }
    }
}

impl Default for SpatialConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            world_bounds: AABB::from_center_extents(Vec3::zeros(), Vec3::repeat(50.0)),
            octree: OctreeConfig::default(),
            demo: DemoConfig::default(),
        }
    }
}

impl Config for SpatialConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.log_level.parse::<log::LevelFilter>().is_err() {
            return Err(ConfigError::Invalid(format!(
                "unknown log level '{}'",
                self.log_level
            )));
        }
        AABB::try_new(self.world_bounds.min, self.world_bounds.max)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        self.octree.validate()?;
        self.demo.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(SpatialConfig::default().validate().is_ok());
        assert!(OctreeConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let config = OctreeConfig::new().with_capacity(0);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_bad_divisor_rejected() {
        let mut debug = DebugDrawConfig::new();
        debug.depth_color_divisor = 0.0;
        assert!(debug.validate().is_err());

        debug.depth_color_divisor = f32::NAN;
        assert!(debug.validate().is_err());
    }

    #[test]
    fn test_toml_partial_file_uses_defaults() {
        let text = r#"
log_level = "debug"

[octree]
node_capacity = 4
max_depth = 3

[world_bounds]
min = [-10.0, -10.0, -10.0]
max = [10.0, 10.0, 10.0]
"#;
        let config = SpatialConfig::from_str_as(text, ConfigFormat::Toml).unwrap();

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.octree.node_capacity, 4);
        assert_eq!(config.octree.max_depth, 3);
        assert_eq!(config.octree.debug, DebugDrawConfig::default());
        assert_eq!(config.world_bounds.max, Vec3::new(10.0, 10.0, 10.0));
        assert_eq!(config.demo, DemoConfig::default());
    }

    #[test]
    fn test_ron_round_trip() {
        let mut config = SpatialConfig::with_half_size(25.0);
        config.demo.seed = Some(7);
        config.octree = config.octree.with_capacity(2).with_max_depth(4);

        let text = config.to_string_as(ConfigFormat::Ron).unwrap();
        let parsed = SpatialConfig::from_str_as(&text, ConfigFormat::Ron).unwrap();

        assert_eq!(parsed, config);
    }

    #[test]
    fn test_inverted_world_bounds_rejected() {
        let text = r#"
[world_bounds]
min = [10.0, 0.0, 0.0]
max = [-10.0, 1.0, 1.0]
"#;
        let result = SpatialConfig::from_str_as(text, ConfigFormat::Toml);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_unknown_log_level_rejected() {
        let result = SpatialConfig::from_str_as("log_level = \"loud\"", ConfigFormat::Toml);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }
}
