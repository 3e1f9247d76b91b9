//! TOML configuration file support.
//!
//! Settings that rarely change between runs can live in a config file
//! instead of being passed on every invocation:
//!
//! ```toml
//! # isslis-flashloc.toml
//! data_dir = "/data/iss_lis"
//!
//! [render]
//! enabled = true
//! font = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf"
//! land = "/data/naturalearth/ne_110m_land.geojson"
//! borders = "/data/naturalearth/ne_110m_admin_0_boundary_lines_land.geojson"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use isslis_flashloc::render::{FontSource, RenderOptions};

/// Root configuration structure for isslis-flashloc.toml files.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory scanned when no directory argument is given.
    pub data_dir: Option<PathBuf>,

    /// Density map settings.
    #[serde(default)]
    pub render: RenderConfig,
}

/// Configuration for the density map.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RenderConfig {
    /// Draw the density map at all (default: true).
    pub enabled: Option<bool>,

    /// TrueType/OpenType font for title and labels.
    pub font: Option<PathBuf>,

    /// GeoJSON land polygons, instead of the built-in world map.
    pub land: Option<PathBuf>,

    /// GeoJSON country border lines.
    pub borders: Option<PathBuf>,
}

impl RenderConfig {
    /// Render options, or `None` when rendering is disabled.
    pub fn options(&self) -> Option<RenderOptions> {
        if !self.enabled.unwrap_or(true) {
            return None;
        }

        Some(RenderOptions {
            font: self
                .font
                .clone()
                .map(FontSource::File)
                .unwrap_or_default(),
            land: self.land.clone(),
            borders: self.borders.clone(),
        })
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }
}
