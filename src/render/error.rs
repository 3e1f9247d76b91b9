use std::path::PathBuf;

/// Errors that can occur while drawing or saving a density map
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// I/O error while reading inputs or writing the image
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Image encoding error
    #[error("image error: {0}")]
    ImageError(#[from] image::ImageError),

    /// Malformed GeoJSON document
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// Malformed GeoJSON basemap file
    #[error("basemap {}: {source}", .path.display())]
    Basemap {
        /// Offending file
        path: PathBuf,
        /// Parse error
        #[source]
        source: geojson::Error,
    },

    /// Geometry that cannot be drawn
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Font file missing or unreadable
    #[error("font error: {0}")]
    FontError(String),
}

impl From<ab_glyph::InvalidFont> for RenderError {
    fn from(error: ab_glyph::InvalidFont) -> Self {
        RenderError::FontError(error.to_string())
    }
}
