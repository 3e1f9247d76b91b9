//! Figure layout: the map panel with its graticule labels, the title above it
//! and the color legend below it.

use ab_glyph::FontVec;
use image::{imageops, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;
use log::{debug, warn};

use super::basemap::{Basemap, Shapes};
use super::canvas::{self, Dash, Projection, TextPainter};
use super::colormap::{jet, tick_label, LogNorm};
use super::hexbin::{Extent, HexBins, HexGrid};

/// Map panel width in pixels
pub const MAP_WIDTH: u32 = 2000;
/// Map panel height in pixels
pub const MAP_HEIGHT: u32 = 1000;

const PAD: u32 = 12;
const TICK_LEN: u32 = 8;
const COLORBAR_HEIGHT: u32 = MAP_WIDTH / 50;

const TITLE_PX: f32 = 40.0;
const LABEL_PX: f32 = 22.0;
const CAPTION_PX: f32 = 26.0;

const LEGEND_CAPTION: &str = "Flash Count";

const OCEAN: Rgb<u8> = Rgb([0, 0, 0]);
const LAND: Rgb<u8> = Rgb([128, 128, 128]);
const OUTLINE: Rgb<u8> = Rgb([255, 255, 255]);
const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const INK: Rgb<u8> = Rgb([0, 0, 0]);

const GRID_ALPHA: f32 = 0.5;
const GRID_DASH: Dash = Dash { on: 10, off: 6 };

/// Latitudes of the parallels
pub const PARALLELS: [f64; 7] = [-90.0, -60.0, -30.0, 0.0, 30.0, 60.0, 90.0];

const MERIDIAN_STEPS: [f64; 9] = [1.0, 2.0, 5.0, 10.0, 15.0, 30.0, 60.0, 90.0, 180.0];
const MAX_MERIDIAN_INTERVALS: f64 = 8.0;

/// Meridian longitudes: the smallest step from a fixed list of round values
/// that splits the extent into at most eight intervals
pub fn meridians(extent: &Extent) -> Vec<f64> {
    let span = extent.xmax - extent.xmin;
    let step = MERIDIAN_STEPS
        .iter()
        .copied()
        .find(|step| span / step <= MAX_MERIDIAN_INTERVALS)
        .unwrap_or(span);

    let first = (extent.xmin / step).ceil() as i64;
    let last = (extent.xmax / step).floor() as i64;
    (first..=last).map(|k| k as f64 * step).collect()
}

/// `30°N`, `0°`, `60°S`
pub fn lat_label(lat: f64) -> String {
    let deg = lat.abs().round() as i64;
    if deg == 0 {
        "0°".to_string()
    } else if lat > 0.0 {
        format!("{deg}°N")
    } else {
        format!("{deg}°S")
    }
}

/// `60°E`, `0°`, `120°W`, `180°`
pub fn lon_label(lon: f64) -> String {
    let deg = lon.abs().round() as i64;
    if deg == 0 || deg == 180 {
        format!("{deg}°")
    } else if lon > 0.0 {
        format!("{deg}°E")
    } else {
        format!("{deg}°W")
    }
}

fn draw_shapes(panel: &mut RgbImage, proj: &Projection, shapes: &Shapes, fill: bool) {
    let project = |ring: &[(f64, f64)]| -> Vec<(f32, f32)> {
        ring.iter().map(|&(lon, lat)| proj.to_px(lon, lat)).collect()
    };
    let polygons: Vec<(Vec<(f32, f32)>, Vec<Vec<(f32, f32)>>)> = shapes
        .polygons
        .iter()
        .map(|p| (project(&p.exterior), p.holes.iter().map(|h| project(h)).collect()))
        .collect();

    // All fills first, so a neighbouring polygon never covers a shared border
    if fill {
        for (exterior, holes) in &polygons {
            canvas::fill_polygon(panel, exterior, LAND);
            for hole in holes {
                canvas::fill_polygon(panel, hole, OCEAN);
            }
        }
    }
    for (exterior, holes) in &polygons {
        canvas::stroke_polyline(panel, exterior, true, OUTLINE);
        for hole in holes {
            canvas::stroke_polyline(panel, hole, true, OUTLINE);
        }
    }

    for line in &shapes.lines {
        canvas::stroke_polyline(panel, &project(line), false, OUTLINE);
    }
}

/// Map panel: ocean, land, borders, graticule and the colored hexagons
fn draw_map_panel(bins: &HexBins, norm: &LogNorm, basemap: &Basemap) -> RgbImage {
    let extent = bins.grid().extent();
    let proj = Projection::new(extent, MAP_WIDTH, MAP_HEIGHT);
    let mut panel = RgbImage::from_pixel(MAP_WIDTH, MAP_HEIGHT, OCEAN);

    draw_shapes(&mut panel, &proj, &basemap.land, true);
    draw_shapes(&mut panel, &proj, &basemap.borders, false);

    for &lat in &PARALLELS {
        let (_, y) = proj.to_px(extent.xmin, lat);
        let y = (y.round() as i64).min(MAP_HEIGHT as i64 - 1);
        canvas::dashed_hline(&mut panel, y, OUTLINE, GRID_ALPHA, GRID_DASH);
    }
    for lon in meridians(&extent) {
        let (x, _) = proj.to_px(lon, extent.ymin);
        let x = (x.round() as i64).min(MAP_WIDTH as i64 - 1);
        canvas::dashed_vline(&mut panel, x, OUTLINE, GRID_ALPHA, GRID_DASH);
    }

    let grid = bins.grid();
    let mut drawn = 0usize;
    for (cell, count) in bins.occupied(1) {
        let hexagon: Vec<(f32, f32)> = grid
            .vertices(cell)
            .iter()
            .map(|&(lon, lat)| proj.to_px(lon, lat))
            .collect();
        canvas::fill_polygon(&mut panel, &hexagon, jet(norm.normalize(count as f64)));
        drawn += 1;
    }
    debug!("Drew {} hexagons", drawn);

    panel
}

fn max_size(text: &TextPainter<'_>, px: f32, labels: &[String]) -> (u32, u32) {
    labels
        .iter()
        .map(|l| text.size(px, l))
        .fold((0, 0), |(w, h), (lw, lh)| (w.max(lw), h.max(lh)))
}

/// Compose the complete figure for the given coordinates
pub fn draw_figure(
    title: &str,
    lat: &[f64],
    lon: &[f64],
    basemap: &Basemap,
    font: Option<&FontVec>,
) -> RgbImage {
    let bins = HexBins::from_points(HexGrid::global(), lon, lat);
    if bins.dropped() > 0 {
        warn!(
            "{} flash(es) outside the map extent or not finite were left out of the density map",
            bins.dropped()
        );
    }

    let norm = LogNorm::from_counts(bins.count_range());
    let extent = bins.grid().extent();
    let panel = draw_map_panel(&bins, &norm, basemap);

    let text = TextPainter::new(font);
    let lat_labels: Vec<String> = PARALLELS.iter().map(|&l| lat_label(l)).collect();
    let lon_ticks = meridians(&extent);
    let lon_labels: Vec<String> = lon_ticks.iter().map(|&l| lon_label(l)).collect();
    let legend_ticks = norm.ticks();
    let legend_labels: Vec<String> = legend_ticks.iter().map(|&(v, _)| tick_label(v)).collect();

    let (title_w, title_h) = text.size(TITLE_PX, title);
    let (lat_w, lat_h) = max_size(&text, LABEL_PX, &lat_labels);
    let (lon_w, lon_h) = max_size(&text, LABEL_PX, &lon_labels);
    let (legend_w, legend_h) = max_size(&text, LABEL_PX, &legend_labels);
    let (caption_w, caption_h) = text.size(CAPTION_PX, LEGEND_CAPTION);

    // horizontal overhang of centered labels at the panel edges
    let overhang = lon_w.max(legend_w).div_ceil(2);
    let lat_margin = if lat_w > 0 { lat_w + PAD / 2 } else { 0 };
    let left = PAD + lat_margin.max(overhang);
    let right = PAD + overhang;
    let top = PAD + if title_h > 0 { title_h + PAD } else { 0 };

    let lon_label_y = top + MAP_HEIGHT + PAD / 2;
    let colorbar_y = lon_label_y + lon_h + 2 * PAD;
    let legend_label_y = colorbar_y + COLORBAR_HEIGHT + TICK_LEN + 2;
    let caption_y = legend_label_y + legend_h + PAD / 2;

    let width = (left + MAP_WIDTH + right).max(title_w + 2 * PAD);
    let height = caption_y + caption_h + PAD;
    let mut figure = RgbImage::from_pixel(width, height, BACKGROUND);

    let map_x = left as i64;
    let map_y = top as i64;
    imageops::replace(&mut figure, &panel, map_x, map_y);
    draw_hollow_rect_mut(
        &mut figure,
        Rect::at(map_x as i32 - 1, map_y as i32 - 1).of_size(MAP_WIDTH + 2, MAP_HEIGHT + 2),
        INK,
    );

    let centered = |x: f32, w: u32| (x - w as f32 / 2.0).round() as i32;

    text.draw(
        &mut figure,
        centered(map_x as f32 + MAP_WIDTH as f32 / 2.0, title_w).max(0),
        PAD as i32,
        TITLE_PX,
        title,
        INK,
    );

    let proj = Projection::new(extent, MAP_WIDTH, MAP_HEIGHT);
    for (&lat, label) in PARALLELS.iter().zip(&lat_labels) {
        let (w, _) = text.size(LABEL_PX, label);
        let (_, y) = proj.to_px(extent.xmin, lat);
        let x = left as i32 - (PAD / 2) as i32 - w as i32;
        let y = (map_y as f32 + y - lat_h as f32 / 2.0).round() as i32;
        text.draw(&mut figure, x, y, LABEL_PX, label, INK);
    }
    for (&lon, label) in lon_ticks.iter().zip(&lon_labels) {
        let (w, _) = text.size(LABEL_PX, label);
        let (x, _) = proj.to_px(lon, extent.ymin);
        text.draw(
            &mut figure,
            centered(map_x as f32 + x, w),
            lon_label_y as i32,
            LABEL_PX,
            label,
            INK,
        );
    }

    // legend: gradient bar, ticks and caption
    for dx in 0..MAP_WIDTH {
        let t = dx as f64 / (MAP_WIDTH - 1) as f64;
        draw_filled_rect_mut(
            &mut figure,
            Rect::at(map_x as i32 + dx as i32, colorbar_y as i32).of_size(1, COLORBAR_HEIGHT),
            jet(t),
        );
    }
    draw_hollow_rect_mut(
        &mut figure,
        Rect::at(map_x as i32, colorbar_y as i32).of_size(MAP_WIDTH, COLORBAR_HEIGHT),
        INK,
    );

    let bar_bottom = (colorbar_y + COLORBAR_HEIGHT) as f32;
    for (&(_, position), label) in legend_ticks.iter().zip(&legend_labels) {
        let x = map_x as f32 + position as f32 * (MAP_WIDTH - 1) as f32;
        draw_line_segment_mut(
            &mut figure,
            (x, bar_bottom),
            (x, bar_bottom + TICK_LEN as f32),
            INK,
        );
        let (w, _) = text.size(LABEL_PX, label);
        text.draw(
            &mut figure,
            centered(x, w),
            legend_label_y as i32,
            LABEL_PX,
            label,
            INK,
        );
    }

    text.draw(
        &mut figure,
        centered(map_x as f32 + MAP_WIDTH as f32 / 2.0, caption_w),
        caption_y as i32,
        CAPTION_PX,
        LEGEND_CAPTION,
        INK,
    );

    figure
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::basemap::Polygon;

    #[test]
    fn test_meridians_every_sixty_degrees() {
        assert_eq!(
            meridians(&Extent::GLOBAL),
            vec![-180.0, -120.0, -60.0, 0.0, 60.0, 120.0, 180.0]
        );
    }

    #[test]
    fn test_meridians_regional_extent() {
        let extent = Extent {
            xmin: -100.0,
            xmax: -60.0,
            ymin: 0.0,
            ymax: 40.0,
        };
        assert_eq!(
            meridians(&extent),
            vec![-100.0, -95.0, -90.0, -85.0, -80.0, -75.0, -70.0, -65.0, -60.0]
        );
    }

    #[test]
    fn test_graticule_labels() {
        assert_eq!(lat_label(30.0), "30°N");
        assert_eq!(lat_label(-60.0), "60°S");
        assert_eq!(lat_label(0.0), "0°");
        assert_eq!(lon_label(60.0), "60°E");
        assert_eq!(lon_label(-120.0), "120°W");
        assert_eq!(lon_label(0.0), "0°");
        assert_eq!(lon_label(-180.0), "180°");
        assert_eq!(lon_label(180.0), "180°");
    }

    #[test]
    fn test_empty_panel_is_ocean_with_graticule() {
        let bins = HexBins::new(HexGrid::global());
        let norm = LogNorm::from_counts(None);
        let panel = draw_map_panel(&bins, &norm, &Basemap::empty());

        assert_eq!(panel.dimensions(), (MAP_WIDTH, MAP_HEIGHT));
        assert_eq!(panel.get_pixel(1, 1), &OCEAN);
        // equator, inside a dash
        assert_eq!(panel.get_pixel(2, 500), &Rgb([128, 128, 128]));
    }

    #[test]
    fn test_panel_draws_land_and_bins() {
        let mut basemap = Basemap::empty();
        basemap.land.polygons.push(Polygon {
            exterior: vec![(10.0, 10.0), (50.0, 10.0), (50.0, 50.0), (10.0, 50.0), (10.0, 10.0)],
            holes: vec![],
        });

        let bins = HexBins::from_points(HexGrid::global(), &[-100.0; 5], &[-45.0; 5]);
        let norm = LogNorm::from_counts(bins.count_range());
        let panel = draw_map_panel(&bins, &norm, &basemap);

        let proj = Projection::new(Extent::GLOBAL, MAP_WIDTH, MAP_HEIGHT);
        let (lx, ly) = proj.to_px(25.0, 25.0);
        assert_eq!(panel.get_pixel(lx as u32, ly as u32), &LAND);

        let grid = HexGrid::global();
        let cell = grid.locate(-100.0, -45.0).unwrap();
        let (clon, clat) = grid.center(cell);
        let (bx, by) = proj.to_px(clon, clat);
        assert_eq!(panel.get_pixel(bx.round() as u32, by.round() as u32), &jet(0.0));
    }

    #[test]
    fn test_default_map_has_land() {
        let bins = HexBins::new(HexGrid::global());
        let norm = LogNorm::from_counts(None);
        let panel = draw_map_panel(&bins, &norm, &Basemap::load(None, None).unwrap());
        let proj = Projection::new(Extent::GLOBAL, MAP_WIDTH, MAP_HEIGHT);

        // Chad, Congo basin, central United States, Australia
        for (lon, lat) in [(20.0, 20.0), (25.0, -2.0), (-100.0, 40.0), (135.0, -25.0)] {
            let (x, y) = proj.to_px(lon, lat);
            assert_eq!(panel.get_pixel(x as u32, y as u32), &LAND, "({lon}, {lat})");
        }

        // South Pacific
        let (x, y) = proj.to_px(-150.0, -40.0);
        assert_eq!(panel.get_pixel(x as u32, y as u32), &OCEAN);

        let outlines = panel.pixels().filter(|&&p| p == OUTLINE).count();
        assert!(outlines > 10_000, "{outlines} outline pixels");
    }

    #[test]
    fn test_figure_without_font_is_tight() {
        let figure = draw_figure("title", &[], &[], &Basemap::empty(), None);
        assert_eq!(figure.width(), MAP_WIDTH + 2 * PAD);
        assert_eq!(
            figure.height(),
            PAD + MAP_HEIGHT + PAD / 2 + 2 * PAD + COLORBAR_HEIGHT + TICK_LEN + 2 + PAD / 2 + PAD
        );
        assert_eq!(figure.get_pixel(0, 0), &BACKGROUND);
    }
}
