//! TOML configuration.
//!
//! Every section and key is optional; anything left out keeps the built-in
//! default, so an empty file yields [`Config::default`].

use std::{fs, path::Path};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::species::Species;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: "Antimatter".into(),
        }
    }
}

/// Half-open `[min, max)` range for randomized values.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct SpawnRange {
    pub min: f32,
    pub max: f32,
}

impl SpawnRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn range(&self) -> std::ops::Range<f32> {
        self.min..self.max
    }
}

impl Default for SpawnRange {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct HeatmapConfig {
    /// Samples per side.
    pub resolution: usize,
    /// Side length of the square footprint, world units.
    pub extent: f32,
    pub influence_radius: f32,
    /// Heat added at the center of each collision.
    pub intensity: f32,
    /// Heat seeded at every chamber on activation.
    pub initial_intensity: f32,
    pub visible: bool,
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            resolution: 40,
            extent: 400.0,
            influence_radius: 50.0,
            intensity: 0.2,
            initial_intensity: 0.8,
            visible: false,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub distance: f32,
    pub elevation: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub zoom_step: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 60.0,
            near: 0.1,
            far: 2000.0,
            distance: 500.0,
            elevation: 200.0,
            min_distance: 100.0,
            max_distance: 1000.0,
            zoom_step: 100.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct RingConfig {
    pub radius: f32,
    pub tube_radius: f32,
    pub particles_per_beam: usize,
    pub particle_size: f32,
    /// Angular speed per reference frame before jitter.
    pub base_speed: f32,
    pub speed_jitter: f32,
    pub merge_distance: f32,
    pub chamber_radius: f32,
    /// Chamber positions as angles around the ring, radians.
    pub chamber_angles: Vec<f32>,
    pub effect_lifetime: SpawnRange,
    pub effect_size: f32,
    /// Effects end at `1 + effect_growth` times their starting size.
    pub effect_growth: f32,
    /// Seconds a collided particle stays hidden.
    pub respawn_delay: f32,
    pub beam_colors: [u32; 2],
    pub species: Species,
    pub heatmap: HeatmapConfig,
    pub camera: CameraConfig,
}

impl Default for RingConfig {
    fn default() -> Self {
        use std::f32::consts::{FRAC_PI_2, PI};
        Self {
            radius: 200.0,
            tube_radius: 5.0,
            particles_per_beam: 100,
            particle_size: 1.5,
            base_speed: 0.01,
            speed_jitter: 0.002,
            merge_distance: 5.0,
            chamber_radius: 30.0,
            chamber_angles: vec![0.0, FRAC_PI_2, PI, 3.0 * FRAC_PI_2],
            effect_lifetime: SpawnRange::new(1.5, 2.0),
            effect_size: 1.0,
            effect_growth: 4.0,
            respawn_delay: 1.0,
            beam_colors: [0x3182ce, 0xe53e3e],
            species: Species::default(),
            heatmap: HeatmapConfig::default(),
            camera: CameraConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AnnihilationConfig {
    /// Canvas size before the first resize.
    pub width: f32,
    pub height: f32,
    /// Approach speed of each seed, pixels per second.
    pub approach_speed: f32,
    pub burst_count: usize,
    /// Pixels per second.
    pub burst_speed: SpawnRange,
    pub burst_size: SpawnRange,
    /// Seconds.
    pub burst_life: SpawnRange,
    /// Seconds; energy particles fade against this.
    pub burst_max_life: f32,
    pub flash_lifetime: f32,
    pub flash_size: f32,
    pub species: Species,
}

impl Default for AnnihilationConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 400.0,
            approach_speed: 90.0,
            burst_count: 80,
            burst_speed: SpawnRange::new(120.0, 300.0),
            burst_size: SpawnRange::new(2.0, 6.0),
            burst_life: SpawnRange::new(50.0 / 60.0, 150.0 / 60.0),
            burst_max_life: 2.5,
            flash_lifetime: 0.25,
            flash_size: 100.0,
            species: Species::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct FieldConfig {
    pub width: f32,
    pub height: f32,
    pub count: usize,
    /// Fractions of matter and antimatter; the remainder is energy.
    pub matter_share: f32,
    pub antimatter_share: f32,
    pub base_size: f32,
    /// Velocity component spread, pixels per second.
    pub speed: f32,
    pub attraction_radius: f32,
    /// Velocity gained per second per pixel of offset.
    pub attraction_gain: f32,
    pub max_speed: f32,
    pub link_distance: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            count: 50,
            matter_share: 0.4,
            antimatter_share: 0.4,
            base_size: 2.0,
            speed: 60.0,
            attraction_radius: 200.0,
            attraction_gain: 1.08,
            max_speed: 120.0,
            link_distance: 100.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub ring: RingConfig,
    pub annihilation: AnnihilationConfig,
    pub field: FieldConfig,
}

impl Config {
    /// Read and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&data)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(data: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(data)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make a scene degenerate.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(name: &str, value: f32) -> Result<(), ConfigError> {
            if value > 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(ConfigError::Invalid(format!("{name} must be > 0, got {value}")))
            }
        }
        fn ordered(name: &str, range: &SpawnRange) -> Result<(), ConfigError> {
            if range.min <= range.max {
                Ok(())
            } else {
                Err(ConfigError::Invalid(format!(
                    "{name}.min ({}) exceeds {name}.max ({})",
                    range.min, range.max
                )))
            }
        }

        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid("window dimensions must be > 0".into()));
        }

        let ring = &self.ring;
        positive("ring.radius", ring.radius)?;
        positive("ring.particle_size", ring.particle_size)?;
        positive("ring.merge_distance", ring.merge_distance)?;
        positive("ring.chamber_radius", ring.chamber_radius)?;
        positive("ring.effect_lifetime.min", ring.effect_lifetime.min)?;
        ordered("ring.effect_lifetime", &ring.effect_lifetime)?;
        if ring.respawn_delay < 0.0 {
            return Err(ConfigError::Invalid("ring.respawn_delay must be >= 0".into()));
        }
        if ring.particles_per_beam == 0 {
            return Err(ConfigError::Invalid("ring.particles_per_beam must be > 0".into()));
        }
        positive("ring.heatmap.extent", ring.heatmap.extent)?;
        positive("ring.heatmap.influence_radius", ring.heatmap.influence_radius)?;
        positive("ring.camera.min_distance", ring.camera.min_distance)?;
        if ring.camera.min_distance > ring.camera.max_distance {
            return Err(ConfigError::Invalid(
                "ring.camera.min_distance exceeds max_distance".into(),
            ));
        }

        let ann = &self.annihilation;
        positive("annihilation.width", ann.width)?;
        positive("annihilation.height", ann.height)?;
        positive("annihilation.burst_max_life", ann.burst_max_life)?;
        ordered("annihilation.burst_speed", &ann.burst_speed)?;
        ordered("annihilation.burst_size", &ann.burst_size)?;
        ordered("annihilation.burst_life", &ann.burst_life)?;

        let field = &self.field;
        positive("field.width", field.width)?;
        positive("field.height", field.height)?;
        positive("field.base_size", field.base_size)?;
        if field.matter_share < 0.0
            || field.antimatter_share < 0.0
            || field.matter_share + field.antimatter_share > 1.0
        {
            return Err(ConfigError::Invalid(
                "field shares must be >= 0 and sum to at most 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_default() {
        let cfg = Config::from_toml_str("").expect("empty config parses");
        assert_eq!(cfg, Config::default());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = Config::from_toml_str(
            r#"
            [ring]
            particles_per_beam = 12
            species = "proton"

            [ring.heatmap]
            visible = true

            [annihilation.burst_size]
            min = 1.0
            max = 2.0
            "#,
        )
        .expect("partial config parses");
        assert_eq!(cfg.ring.particles_per_beam, 12);
        assert_eq!(cfg.ring.species, Species::Proton);
        assert!(cfg.ring.heatmap.visible);
        assert_eq!(cfg.ring.heatmap.resolution, 40);
        assert_eq!(cfg.ring.radius, 200.0);
        assert_eq!(cfg.annihilation.burst_size, SpawnRange::new(1.0, 2.0));
        assert_eq!(cfg.annihilation.burst_count, 80);
    }

    #[test]
    fn rejects_non_positive_radius() {
        let err = Config::from_toml_str("[ring]\nradius = 0.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_inverted_range() {
        let mut cfg = Config::default();
        cfg.annihilation.burst_speed = SpawnRange::new(5.0, 1.0);
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let err = Config::from_toml_str("[ring\nradius = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Config::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
