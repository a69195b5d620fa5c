//! Render session configuration
//!
//! Stored as JSON. Every field has a default, so a partial file (or none at
//! all) yields a working 320x240 session drawing the demo tile map.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::blit::StrategyMode;
use crate::display::{pixel_count, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::error::{Error, Result};
use crate::tilemap::TileLayer;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Logical buffer size in pixels
    pub width: u32,
    pub height: u32,
    /// Integer window scale factor
    pub scale: u32,
    pub vsync: bool,
    pub tile_sheet: PathBuf,
    pub tile_size: u32,
    pub strategy: StrategyMode,
    /// Packed ARGB the buffer starts out as
    pub clear_color: u32,
    /// Sprites drawn in every map cell, bottom to top
    pub layers: Vec<TileLayer>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            scale: 2,
            vsync: false,
            tile_sheet: PathBuf::from("tiles.png"),
            tile_size: 16,
            strategy: StrategyMode::Auto,
            clear_color: 0xFFFF_FFFF,
            layers: vec![TileLayer::new(0, 0), TileLayer::new(0, 40)],
        }
    }
}

impl SessionConfig {
    /// Load from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&json)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file, falling back to defaults if it does not exist
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match fs::metadata(path) {
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("no config at {}, using defaults", path.display());
                Ok(Self::default())
            },
            _ => Self::load(path),
        }
    }

    /// Save to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))?;
        fs::write(path.as_ref(), json)
            .map_err(|e| Error::Config(format!("{}: {}", path.as_ref().display(), e)))
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::Config(format!(
                "buffer size {}x{} is empty",
                self.width, self.height
            )));
        }
        if pixel_count(self.width, self.height).is_none() {
            return Err(Error::Config(format!(
                "buffer size {}x{} is too large",
                self.width, self.height
            )));
        }
        if self.scale == 0 {
            return Err(Error::Config("scale must be at least 1".into()));
        }
        let window = self
            .width
            .checked_mul(self.scale)
            .zip(self.height.checked_mul(self.scale));
        if !window.is_some_and(|(w, h)| w <= i32::MAX as u32 && h <= i32::MAX as u32) {
            return Err(Error::Config(format!(
                "window {}x{} at scale {} is too large",
                self.width, self.height, self.scale
            )));
        }
        if self.tile_size == 0 {
            return Err(Error::Config("tile_size must be at least 1".into()));
        }
        Ok(())
    }
}
