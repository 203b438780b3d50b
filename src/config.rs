use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::{command::GLYPH_SIZE, PlacerError};

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct RunConfig {
    /// Source image path
    #[serde(alias = "file")]
    pub image_file: PathBuf,

    /// Where the generated commands are written
    pub output_file: PathBuf,

    /// Per-pixel world-unit multiplier
    pub scale: f64,

    /// Anchor expression inserted verbatim into every command
    #[serde(default = "default_coordinates")]
    pub coordinates: String,
}

fn default_coordinates() -> String {
    "~ ~ ~".to_string()
}

impl RunConfig {
    pub fn load(path: &Path) -> Result<Self, PlacerError> {
        debug!("reading config file {}", path.display());
        let content =
            std::fs::read_to_string(path).map_err(|source| PlacerError::ReadConfigFailed {
                path: path.to_path_buf(),
                source,
            })?;
        let config = toml::from_str::<Self>(&content).map_err(|source| {
            PlacerError::ParseConfigFailed {
                path: path.to_path_buf(),
                source,
            }
        })?;
        config.validate()?;
        debug!("loaded config {config:?}");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PlacerError> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(PlacerError::InvalidConfig(format!(
                "scale must be a positive number, got {}",
                self.scale
            )));
        }
        if !fits_f32(self.scale) {
            return Err(PlacerError::InvalidConfig(format!(
                "scale {} does not fit in a single-precision float",
                self.scale
            )));
        }
        if self.coordinates.trim().is_empty() {
            return Err(PlacerError::InvalidConfig(
                "coordinates must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Rejects a scale whose translations for a `width` x `height` image
    /// would overflow the single-precision floats the commands are read as.
    pub fn validate_extent(&self, width: u32, height: u32) -> Result<(), PlacerError> {
        let extent = GLYPH_SIZE * self.scale * f64::from(width.max(height));
        if !fits_f32(extent) {
            return Err(PlacerError::InvalidConfig(format!(
                "scale {} is too large for a {width}x{height} image",
                self.scale
            )));
        }
        Ok(())
    }
}

fn fits_f32(value: f64) -> bool {
    (value as f32).is_finite()
}
