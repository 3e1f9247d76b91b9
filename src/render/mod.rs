//! # Density Map Rendering
//!
//! Draws aggregated flash locations as a hexagonal-bin density map on a
//! global plate carrée map and saves it as PNG.
//!
//! The figure holds:
//! - a title naming the date range
//! - the map panel: black ocean, gray land with white coastlines and borders
//!   (a built-in world map, or configured GeoJSON files), a dashed white
//!   graticule and hexagons colored by flash count on a log scale
//! - latitude labels on the left, longitude labels at the bottom
//! - a horizontal "Flash Count" color legend under the map
//!
//! ## Example
//!
//! ```rust,no_run
//! use isslis_flashloc::aggregate::AggregationResult;
//! use isslis_flashloc::render::{render_plot, RenderOptions};
//! use std::path::Path;
//!
//! let result = AggregationResult::default();
//! render_plot(&result, &RenderOptions::default(), Path::new("plot.png"))?;
//! # Ok::<(), isslis_flashloc::FlashLocError>(())
//! ```

mod basemap;
mod canvas;
mod colormap;
mod error;
mod figure;
mod hexbin;

use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbImage};
use log::info;

use crate::aggregate::{AggregationResult, DateRange};
use crate::error::{FlashLocError, Result};
use crate::output::StagedFile;

pub use basemap::{Basemap, Polygon, Ring, Shapes};
pub use canvas::{load_font, FontSource};
pub use colormap::{jet, tick_label, LogNorm};
pub use error::RenderError;
pub use figure::{lat_label, lon_label, meridians, MAP_HEIGHT, MAP_WIDTH, PARALLELS};
pub use hexbin::{Extent, HexBins, HexCell, HexGrid, Lattice, GRID_SIZE};

const TITLE_PREFIX: &str = "ISS LIS Detected Lightning Flash Locations";

/// How the density map is drawn
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Font for title, labels and legend
    pub font: FontSource,
    /// GeoJSON file with land polygons, replacing the built-in world map
    pub land: Option<PathBuf>,
    /// GeoJSON file with country border lines
    pub borders: Option<PathBuf>,
}

/// Figure title for the given date range
pub fn plot_title(range: Option<&DateRange>) -> String {
    match range {
        Some(range) => format!("{} {}", TITLE_PREFIX, range.display_text()),
        None => format!("{} (no data)", TITLE_PREFIX),
    }
}

/// Draw the density map of `result` in memory
pub fn draw_density_map(
    result: &AggregationResult,
    basemap: &Basemap,
    font: Option<&ab_glyph::FontVec>,
) -> RgbImage {
    let title = plot_title(result.date_range());
    figure::draw_figure(&title, result.lat(), result.lon(), basemap, font)
}

/// Render the density map to a temporary file next to `dest` without
/// committing it
pub fn stage_plot(
    result: &AggregationResult,
    options: &RenderOptions,
    dest: &Path,
) -> Result<StagedFile> {
    let render_err = |e: RenderError| FlashLocError::render(dest, e);

    let basemap = Basemap::load(options.land.as_deref(), options.borders.as_deref())
        .map_err(render_err)?;
    if options.land.is_none() {
        info!("Drawing the built-in world map");
    }
    let font = load_font(&options.font).map_err(render_err)?;

    let image = draw_density_map(result, &basemap, font.as_ref());

    let mut staged = StagedFile::new(dest).map_err(|e| FlashLocError::render(dest, e))?;
    {
        let mut writer = BufWriter::new(staged.file_mut());
        image
            .write_to(&mut writer, ImageFormat::Png)
            .map_err(|e| FlashLocError::render(dest, e))?;
        writer.flush().map_err(|e| FlashLocError::render(dest, e))?;
    }

    Ok(staged)
}

/// Render the density map to `dest`, replacing any existing file
pub fn render_plot(
    result: &AggregationResult,
    options: &RenderOptions,
    dest: &Path,
) -> Result<PathBuf> {
    let staged = stage_plot(result, options, dest)?;
    let path = staged
        .commit()
        .map_err(|e| FlashLocError::render(dest, e))?;
    info!("Saved density map to {}", path.display());
    Ok(path)
}
