//! World map geometry from GeoJSON (e.g. Natural Earth land polygons and
//! country boundary lines).
//!
//! A built-in world map of country polygons, derived from the public domain
//! Natural Earth 1:110m Admin 0 countries, is compiled into the crate and
//! used whenever no land file is configured.

use std::fs;
use std::path::Path;

use geojson::{GeoJson, Geometry, Value};
use log::debug;

use super::RenderError;

/// Natural Earth 1:110m countries, coordinates rounded to 0.01°
const WORLD_COUNTRIES: &str = include_str!("data/world_countries.geojson");

/// A ring of `(lon, lat)` points
pub type Ring = Vec<(f64, f64)>;

/// A polygon: exterior ring followed by hole rings
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    /// Outer boundary
    pub exterior: Ring,
    /// Holes (lakes, inland seas)
    pub holes: Vec<Ring>,
}

/// Polygons and polylines collected from a GeoJSON document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Shapes {
    /// Filled areas
    pub polygons: Vec<Polygon>,
    /// Open lines
    pub lines: Vec<Ring>,
}

impl Shapes {
    /// Parse a GeoJSON document (geometry, feature, or feature collection)
    pub fn from_geojson_str(text: &str) -> Result<Self, RenderError> {
        let geojson: GeoJson = text.parse()?;
        let mut shapes = Shapes::default();

        match geojson {
            GeoJson::Geometry(geometry) => shapes.add_geometry(&geometry)?,
            GeoJson::Feature(feature) => {
                if let Some(geometry) = &feature.geometry {
                    shapes.add_geometry(geometry)?;
                }
            }
            GeoJson::FeatureCollection(collection) => {
                for feature in &collection.features {
                    if let Some(geometry) = &feature.geometry {
                        shapes.add_geometry(geometry)?;
                    }
                }
            }
        }

        Ok(shapes)
    }

    /// Read and parse a GeoJSON file
    pub fn from_geojson_file(path: &Path) -> Result<Self, RenderError> {
        let text = fs::read_to_string(path)?;
        let shapes = Self::from_geojson_str(&text).map_err(|e| match e {
            RenderError::GeoJson(source) => RenderError::Basemap {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;

        debug!(
            "Loaded {} polygons and {} lines from {}",
            shapes.polygons.len(),
            shapes.lines.len(),
            path.display()
        );
        Ok(shapes)
    }

    /// No geometry at all
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty() && self.lines.is_empty()
    }

    fn add_geometry(&mut self, geometry: &Geometry) -> Result<(), RenderError> {
        match &geometry.value {
            Value::Polygon(rings) => self.polygons.push(polygon(rings)?),
            Value::MultiPolygon(polygons) => {
                for rings in polygons {
                    self.polygons.push(polygon(rings)?);
                }
            }
            Value::LineString(line) => self.lines.push(ring(line)?),
            Value::MultiLineString(lines) => {
                for line in lines {
                    self.lines.push(ring(line)?);
                }
            }
            Value::GeometryCollection(geometries) => {
                for geometry in geometries {
                    self.add_geometry(geometry)?;
                }
            }
            Value::Point(_) | Value::MultiPoint(_) => {}
        }
        Ok(())
    }
}

fn ring(positions: &[Vec<f64>]) -> Result<Ring, RenderError> {
    positions
        .iter()
        .map(|p| match p.as_slice() {
            [lon, lat, ..] => Ok((*lon, *lat)),
            _ => Err(RenderError::InvalidGeometry(format!(
                "position with {} coordinate(s)",
                p.len()
            ))),
        })
        .collect()
}

fn polygon(rings: &[Vec<Vec<f64>>]) -> Result<Polygon, RenderError> {
    let mut rings = rings.iter().map(|r| ring(r));
    let exterior = rings
        .next()
        .transpose()?
        .ok_or_else(|| RenderError::InvalidGeometry("polygon without rings".into()))?;

    Ok(Polygon {
        exterior,
        holes: rings.collect::<Result<_, _>>()?,
    })
}

/// Land areas and borders drawn beneath the flash density
#[derive(Debug, Clone, Default)]
pub struct Basemap {
    /// Land polygons (filled) and coastlines (their outlines)
    pub land: Shapes,
    /// Country borders (outlines only)
    pub borders: Shapes,
}

impl Basemap {
    /// A plain ocean map
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in world map. Country outlines double as coastlines and
    /// borders, so `borders` stays empty.
    pub fn world() -> Result<Self, RenderError> {
        let land = Shapes::from_geojson_str(WORLD_COUNTRIES)?;
        debug!("Loaded {} built-in country polygons", land.polygons.len());
        Ok(Self {
            land,
            borders: Shapes::default(),
        })
    }

    /// Load land and border geometry from optional GeoJSON files. Without a
    /// land file the built-in world map is used.
    pub fn load(land: Option<&Path>, borders: Option<&Path>) -> Result<Self, RenderError> {
        let land = match land {
            Some(path) => Shapes::from_geojson_file(path)?,
            None => Self::world()?.land,
        };
        Ok(Self {
            land,
            borders: borders
                .map(Shapes::from_geojson_file)
                .transpose()?
                .unwrap_or_default(),
        })
    }

    /// No land or borders to draw
    pub fn is_empty(&self) -> bool {
        self.land.is_empty() && self.borders.is_empty()
    }
}
