//! Drawing primitives on top of `image`/`imageproc`: projection to pixels,
//! alpha-blended dashed lines, polygon fill and text with an optional font.

use std::fs;
use std::path::{Path, PathBuf};

use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_line_segment_mut, draw_polygon_mut, draw_text_mut, text_size};
use imageproc::point::Point;
use log::{debug, warn};

use super::hexbin::Extent;
use super::RenderError;

/// Where to get the font for titles and labels
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FontSource {
    /// Try a list of common system font locations
    #[default]
    System,
    /// Load this TrueType/OpenType file
    File(PathBuf),
    /// Draw no text
    Disabled,
}

const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

fn load_font_file(path: &Path) -> Result<FontVec, RenderError> {
    let data = fs::read(path)
        .map_err(|e| RenderError::FontError(format!("{}: {}", path.display(), e)))?;
    Ok(FontVec::try_from_vec(data)?)
}

/// Resolve `source` to a font.
///
/// An explicitly configured file must load; probing that finds nothing
/// returns `None` and text is left out.
pub fn load_font(source: &FontSource) -> Result<Option<FontVec>, RenderError> {
    match source {
        FontSource::Disabled => Ok(None),
        FontSource::File(path) => load_font_file(path).map(Some),
        FontSource::System => {
            for candidate in FONT_CANDIDATES {
                let path = Path::new(candidate);
                if !path.is_file() {
                    continue;
                }
                match load_font_file(path) {
                    Ok(font) => {
                        debug!("Using font {}", path.display());
                        return Ok(Some(font));
                    }
                    Err(e) => debug!("Skipping font {}: {}", path.display(), e),
                }
            }
            warn!("No usable system font found, the density map is drawn without text");
            Ok(None)
        }
    }
}

/// Draws text when a font is available and measures it as zero-sized when not
#[derive(Clone, Copy)]
pub struct TextPainter<'a> {
    font: Option<&'a FontVec>,
}

impl<'a> TextPainter<'a> {
    /// Painter using `font`, or a no-op painter for `None`
    pub fn new(font: Option<&'a FontVec>) -> Self {
        Self { font }
    }

    /// Width and height of `text` at `px` pixels
    pub fn size(&self, px: f32, text: &str) -> (u32, u32) {
        match self.font {
            Some(font) if !text.is_empty() => text_size(PxScale::from(px), font, text),
            _ => (0, 0),
        }
    }

    /// Draw `text` with its top-left corner at `(x, y)`
    pub fn draw(&self, img: &mut RgbImage, x: i32, y: i32, px: f32, text: &str, color: Rgb<u8>) {
        if let Some(font) = self.font {
            draw_text_mut(img, color, x, y, PxScale::from(px), font, text);
        }
    }
}

/// Plate carrée mapping from `(lon, lat)` to pixel coordinates of a panel
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    extent: Extent,
    width: u32,
    height: u32,
}

impl Projection {
    /// Map `extent` onto a `width` × `height` panel
    pub fn new(extent: Extent, width: u32, height: u32) -> Self {
        Self {
            extent,
            width,
            height,
        }
    }

    /// Pixel position of `(lon, lat)`
    pub fn to_px(&self, lon: f64, lat: f64) -> (f32, f32) {
        let e = &self.extent;
        let x = (lon - e.xmin) / (e.xmax - e.xmin) * self.width as f64;
        let y = (e.ymax - lat) / (e.ymax - e.ymin) * self.height as f64;
        (x as f32, y as f32)
    }
}

/// Blend `color` over the pixel at `(x, y)`; out-of-bounds writes are ignored
pub fn blend_pixel(img: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>, alpha: f32) {
    if x < 0 || y < 0 || x >= img.width() as i64 || y >= img.height() as i64 {
        return;
    }
    let pixel = img.get_pixel_mut(x as u32, y as u32);
    for c in 0..3 {
        let mixed = pixel[c] as f32 * (1.0 - alpha) + color[c] as f32 * alpha;
        pixel[c] = mixed.round().clamp(0.0, 255.0) as u8;
    }
}

/// Dash pattern in pixels
#[derive(Debug, Clone, Copy)]
pub struct Dash {
    /// Drawn run length
    pub on: u32,
    /// Skipped run length
    pub off: u32,
}

impl Dash {
    fn is_on(&self, i: u32) -> bool {
        i % (self.on + self.off).max(1) < self.on
    }
}

/// Dashed, blended horizontal line at row `y`
pub fn dashed_hline(img: &mut RgbImage, y: i64, color: Rgb<u8>, alpha: f32, dash: Dash) {
    for x in 0..img.width() {
        if dash.is_on(x) {
            blend_pixel(img, x as i64, y, color, alpha);
        }
    }
}

/// Dashed, blended vertical line at column `x`
pub fn dashed_vline(img: &mut RgbImage, x: i64, color: Rgb<u8>, alpha: f32, dash: Dash) {
    for y in 0..img.height() {
        if dash.is_on(y) {
            blend_pixel(img, x, y as i64, color, alpha);
        }
    }
}

/// Round to pixel points, dropping repeats and the closing point that
/// `draw_polygon_mut` does not accept
fn pixel_ring(points: &[(f32, f32)]) -> Vec<Point<i32>> {
    let mut ring: Vec<Point<i32>> = Vec::with_capacity(points.len());
    for &(x, y) in points {
        let p = Point::new(x.round() as i32, y.round() as i32);
        if ring.last() != Some(&p) {
            ring.push(p);
        }
    }
    while ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
    ring
}

/// Fill the polygon through `points`; degenerate polygons become a single pixel
pub fn fill_polygon(img: &mut RgbImage, points: &[(f32, f32)], color: Rgb<u8>) {
    let ring = pixel_ring(points);
    match ring.len() {
        0 => {}
        1 | 2 => {
            for p in ring {
                blend_pixel(img, p.x as i64, p.y as i64, color, 1.0);
            }
        }
        _ => draw_polygon_mut(img, &ring, color),
    }
}

/// Stroke the polyline through `points`, optionally closing it.
///
/// Segments spanning more than half the panel width are skipped so rings
/// split at the antimeridian are not connected across the map.
pub fn stroke_polyline(img: &mut RgbImage, points: &[(f32, f32)], closed: bool, color: Rgb<u8>) {
    let max_dx = img.width() as f32 / 2.0;
    let mut segment = |a: (f32, f32), b: (f32, f32)| {
        if (a.0 - b.0).abs() <= max_dx {
            draw_line_segment_mut(img, a, b, color);
        }
    };

    for pair in points.windows(2) {
        segment(pair[0], pair[1]);
    }
    if closed && points.len() > 2 {
        segment(points[points.len() - 1], points[0]);
    }
}
