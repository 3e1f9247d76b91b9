//! # Flash Aggregation
//!
//! Combines the flash coordinates and orbit times of many source files into a
//! single [`AggregationResult`].
//!
//! ## Guarantees
//!
//! 1. Latitudes and longitudes always have the same length, per file and in
//!    total. A file violating this is rejected before anything of it is
//!    appended.
//! 2. Flashes keep the order of the file list, then their order within the file.
//! 3. The [`DateRange`] is the earliest orbit start and latest orbit end over
//!    all files, independent of file order.
//!
//! Any error aborts the whole aggregation; there is no per-file skipping.

mod range;

#[cfg(test)]
mod tests;

use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::error::{FlashLocError, Result};
use crate::source::{
    DataFileOpener, FlashFile, TimeField, FLASH_LAT_FIELD, FLASH_LON_FIELD, ORBIT_END_FIELD,
    ORBIT_START_FIELD,
};
use crate::time::TimeUnits;

pub use range::DateRange;
use range::RangeReducer;

/// A single flash location
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlashRecord {
    /// Latitude in degrees north
    pub lat: f64,
    /// Longitude in degrees east
    pub lon: f64,
}

/// Per-file contribution to an aggregation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSummary {
    /// Source file
    pub path: PathBuf,
    /// Number of flashes it contributed
    pub flash_count: usize,
}

/// All flash locations of a run plus the covered date range
#[derive(Debug, Clone, Default)]
pub struct AggregationResult {
    lat: Vec<f64>,
    lon: Vec<f64>,
    date_range: Option<DateRange>,
    sources: Vec<SourceSummary>,
}

impl AggregationResult {
    /// Flash latitudes in aggregation order
    pub fn lat(&self) -> &[f64] {
        &self.lat
    }

    /// Flash longitudes in aggregation order
    pub fn lon(&self) -> &[f64] {
        &self.lon
    }

    /// Number of flashes
    pub fn len(&self) -> usize {
        self.lat.len()
    }

    /// No flashes were aggregated
    pub fn is_empty(&self) -> bool {
        self.lat.is_empty()
    }

    /// Date range of the contributing orbits, `None` when no files were read
    pub fn date_range(&self) -> Option<&DateRange> {
        self.date_range.as_ref()
    }

    /// Contributing files in aggregation order
    pub fn sources(&self) -> &[SourceSummary] {
        &self.sources
    }

    /// Iterate over flashes as records
    pub fn records(&self) -> impl Iterator<Item = FlashRecord> + '_ {
        self.lat
            .iter()
            .zip(&self.lon)
            .map(|(&lat, &lon)| FlashRecord { lat, lon })
    }
}

/// Incrementally builds an [`AggregationResult`] from extracted files
#[derive(Debug, Default)]
pub struct AggregationBuilder {
    lat: Vec<f64>,
    lon: Vec<f64>,
    range: RangeReducer,
    sources: Vec<SourceSummary>,
}

impl AggregationBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate `file` and append its flashes and orbit times.
    ///
    /// On error nothing of `file` has been added.
    pub fn push(&mut self, file: FlashFile) -> Result<()> {
        let FlashFile {
            path,
            orbit_start,
            orbit_end,
            flash_lat,
            flash_lon,
        } = file;

        if flash_lat.len() != flash_lon.len() {
            return Err(FlashLocError::data_format(
                &path,
                FLASH_LON_FIELD,
                format!(
                    "{} has {} values but {} has {}",
                    FLASH_LAT_FIELD,
                    flash_lat.len(),
                    FLASH_LON_FIELD,
                    flash_lon.len()
                ),
            ));
        }

        let starts = decode_field(&path, ORBIT_START_FIELD, &orbit_start)?;
        let ends = decode_field(&path, ORBIT_END_FIELD, &orbit_end)?;

        if let (Some(first_start), Some(last_end)) = (starts.iter().min(), ends.iter().max()) {
            if last_end < first_start {
                return Err(FlashLocError::data_format(
                    &path,
                    ORBIT_END_FIELD,
                    format!("orbit ends ({last_end}) before it starts ({first_start})"),
                ));
            }
        }

        debug!(
            "{}: {} flashes, {} orbit start(s)",
            path.display(),
            flash_lat.len(),
            starts.len()
        );

        self.range.add_starts(&starts);
        self.range.add_ends(&ends);
        self.sources.push(SourceSummary {
            path,
            flash_count: flash_lat.len(),
        });
        self.lat.extend(flash_lat);
        self.lon.extend(flash_lon);

        Ok(())
    }

    /// Number of flashes added so far
    pub fn flash_count(&self) -> usize {
        self.lat.len()
    }

    /// Finish the aggregation.
    ///
    /// Fails if files were added but none of them carried orbit start and end
    /// times, since the outputs could not be labelled.
    pub fn finish(self) -> Result<AggregationResult> {
        let date_range = match (
            self.sources.last(),
            self.range.earliest_start(),
            self.range.latest_end(),
        ) {
            (None, _, _) => None,
            (Some(last), Some(begin), Some(end)) => {
                let range = DateRange::from_datetimes(begin, end).ok_or_else(|| {
                    FlashLocError::data_format(
                        &last.path,
                        ORBIT_END_FIELD,
                        format!("latest orbit end ({end}) precedes earliest orbit start ({begin})"),
                    )
                })?;
                Some(range)
            }
            (Some(last), _, _) => {
                return Err(FlashLocError::data_format(
                    &last.path,
                    ORBIT_START_FIELD,
                    "no orbit start/end times in any source file",
                ));
            }
        };

        Ok(AggregationResult {
            lat: self.lat,
            lon: self.lon,
            date_range,
            sources: self.sources,
        })
    }
}

fn decode_field(
    path: &Path,
    field: &str,
    time: &TimeField,
) -> Result<Vec<chrono::NaiveDateTime>> {
    let units = TimeUnits::parse(&time.units)
        .map_err(|e| FlashLocError::data_format(path, field, e.to_string()))?;
    units
        .decode_all(&time.values)
        .map_err(|e| FlashLocError::data_format(path, field, e.to_string()))
}

/// Reads source files through a [`DataFileOpener`] and aggregates them
#[derive(Debug, Clone, Default)]
pub struct FlashAggregator<O> {
    opener: O,
}

impl<O: DataFileOpener> FlashAggregator<O> {
    /// Create an aggregator reading files with `opener`
    pub fn new(opener: O) -> Self {
        Self { opener }
    }

    /// Aggregate `files` in the given order.
    ///
    /// Each file is opened, its fields are extracted, and it is closed before
    /// the next one is opened. An empty file list yields an empty result
    /// without a date range.
    pub fn aggregate(&self, files: &[PathBuf]) -> Result<AggregationResult> {
        let mut builder = AggregationBuilder::new();

        for (i, path) in files.iter().enumerate() {
            debug!("Reading file {}/{}: {}", i + 1, files.len(), path.display());
            let file = FlashFile::read(&self.opener, path)?;
            builder.push(file)?;
        }

        let result = builder.finish()?;
        match result.date_range() {
            Some(range) => info!(
                "Aggregated {} flashes from {} files ({})",
                result.len(),
                files.len(),
                range
            ),
            None => info!("No source files, empty aggregation"),
        }

        Ok(result)
    }
}
