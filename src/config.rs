use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::camera::ViewerState;
use crate::color::{Palette, PaletteEntry};
use crate::projector::ShadingPolicy;

/// Smallest march step accepted; finer steps only multiply samples.
pub const MIN_MARCH_STEP: f32 = 0.01;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid value for {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub position: Vec2,
    pub facing_deg: f32,
    pub fov_deg: f32,
    /// Pixels per second.
    pub move_speed: f32,
    /// Degrees per second.
    pub turn_speed: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        let v = ViewerState::default();
        Self {
            position: v.pos,
            facing_deg: v.facing_deg,
            fov_deg: v.fov_deg,
            move_speed: v.speed,
            turn_speed: 90.0,
        }
    }
}

impl ViewerConfig {
    pub fn viewer(&self) -> ViewerState {
        ViewerState {
            pos: self.position,
            facing_deg: self.facing_deg,
            fov_deg: self.fov_deg,
            speed: self.move_speed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinimapConfig {
    pub visible: bool,
    pub scale: f32,
    pub rays: usize,
}

impl Default for MinimapConfig {
    fn default() -> Self {
        Self {
            visible: false,
            scale: 0.25,
            rays: 16,
        }
    }
}

/// Everything the renderer needs that isn't the map itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Internal frame size; one ray is cast per frame column.
    pub frame_size: [u32; 2],
    pub window_size: [u32; 2],
    /// Pixel footprint the tile grid is spread over.
    pub map_pixels: [u32; 2],
    pub map: Option<PathBuf>,
    pub march_step: f32,
    pub ray_length: f32,
    pub fisheye_correction: bool,
    pub shading: ShadingPolicy,
    pub texture: Option<PathBuf>,
    pub palette: Vec<PaletteEntry>,
    pub viewer: ViewerConfig,
    pub minimap: MinimapConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            frame_size: [640, 480],
            window_size: [800, 600],
            map_pixels: [640, 480],
            map: None,
            march_step: 2.0,
            ray_length: 300.0,
            fisheye_correction: true,
            shading: ShadingPolicy::Flat,
            texture: None,
            palette: Vec::new(),
            viewer: ViewerConfig::default(),
            minimap: MinimapConfig::default(),
        }
    }
}

impl RenderConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        // Relative asset paths are relative to the config file.
        if let Some(dir) = path.parent() {
            for asset in [&mut config.map, &mut config.texture].into_iter().flatten() {
                if asset.is_relative() {
                    *asset = dir.join(&*asset);
                }
            }
        }
        config.validate()?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.march_step >= MIN_MARCH_STEP) || !self.march_step.is_finite() {
            return Err(ConfigError::Invalid {
                field: "march_step",
                reason: "must be finite and at least 0.01",
            });
        }
        if !(self.ray_length > 0.0) || !self.ray_length.is_finite() {
            return Err(ConfigError::Invalid {
                field: "ray_length",
                reason: "must be finite and positive",
            });
        }
        if self.frame_size.contains(&0) {
            return Err(ConfigError::Invalid {
                field: "frame_size",
                reason: "must be non-zero",
            });
        }
        // Past 180 the outer rays have |offset| > 90 and fisheye correction
        // turns their distances negative.
        if !(0.0..180.0).contains(&self.viewer.fov_deg) {
            return Err(ConfigError::Invalid {
                field: "viewer.fov_deg",
                reason: "must be in [0, 180)",
            });
        }
        let scale = self.minimap.scale;
        if !(scale > 0.0 && scale <= 1.0) {
            return Err(ConfigError::Invalid {
                field: "minimap.scale",
                reason: "must be in (0, 1]",
            });
        }
        Ok(())
    }

    /// Default palette with the configured entries applied on top.
    pub fn palette(&self) -> Palette {
        Palette::from_entries(&self.palette)
    }
}
