//! CSV export of aggregated flash locations.
//!
//! The file has a `flash_lat,flash_lon` header followed by one row per flash
//! in aggregation order. Values use the shortest representation that reads
//! back to the same `f64`.

use std::path::{Path, PathBuf};

use log::info;
use serde::Serialize;

use crate::aggregate::AggregationResult;
use crate::error::{FlashLocError, Result};
use crate::output::StagedFile;

/// Header of the latitude column
pub const LAT_COLUMN: &str = "flash_lat";
/// Header of the longitude column
pub const LON_COLUMN: &str = "flash_lon";

#[derive(Serialize)]
struct FlashRow {
    flash_lat: f64,
    flash_lon: f64,
}

/// Write the export to a temporary file next to `dest` without committing it
pub fn stage_csv(result: &AggregationResult, dest: &Path) -> Result<StagedFile> {
    let mut staged = StagedFile::new(dest).map_err(|e| FlashLocError::export(dest, e))?;

    {
        // header is written explicitly so an empty export still has one
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(staged.file_mut());

        writer
            .write_record([LAT_COLUMN, LON_COLUMN])
            .map_err(|e| FlashLocError::export(dest, e))?;

        for record in result.records() {
            writer
                .serialize(FlashRow {
                    flash_lat: record.lat,
                    flash_lon: record.lon,
                })
                .map_err(|e| FlashLocError::export(dest, e))?;
        }

        writer.flush().map_err(|e| FlashLocError::export(dest, e))?;
    }

    Ok(staged)
}

/// Write the export to `dest`, replacing any existing file
pub fn export_csv(result: &AggregationResult, dest: &Path) -> Result<PathBuf> {
    let staged = stage_csv(result, dest)?;
    let path = staged.commit().map_err(|e| FlashLocError::export(dest, e))?;
    info!("Wrote {} flash locations to {}", result.len(), path.display());
    Ok(path)
}
