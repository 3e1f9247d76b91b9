//! # Source Data Files
//!
//! ISS LIS science files are read through a small named-variable interface so
//! the aggregation logic does not depend on the NetCDF library directly.
//!
//! - [`DataFile`]: an opened file exposing numeric variables and their `units`
//! - [`DataFileOpener`]: opens a path as a [`DataFile`]
//! - [`FlashFile`]: the four fields the pipeline needs, extracted in one go
//!
//! Two implementations ship with the crate: [`NetCdfOpener`] (feature
//! `netcdf`) for real data, and [`MemoryOpener`] for in-memory fixtures.

mod memory;
#[cfg(feature = "netcdf")]
mod netcdf_file;

use std::path::{Path, PathBuf};

use crate::error::{FlashLocError, Result};

pub use memory::{MemoryFile, MemoryOpener};
#[cfg(feature = "netcdf")]
pub use netcdf_file::{NetCdfFile, NetCdfOpener};

/// Orbit start time variable (TAI93 seconds)
pub const ORBIT_START_FIELD: &str = "orbit_summary_TAI93_start";
/// Orbit end time variable (TAI93 seconds)
pub const ORBIT_END_FIELD: &str = "orbit_summary_TAI93_end";
/// Flash latitude variable (degrees north)
pub const FLASH_LAT_FIELD: &str = "lightning_flash_lat";
/// Flash longitude variable (degrees east)
pub const FLASH_LON_FIELD: &str = "lightning_flash_lon";

/// Attribute holding the CF time unit declaration
pub const UNITS_ATTRIBUTE: &str = "units";

/// Named-variable read access to an opened source file.
///
/// The handle is released when the value is dropped.
pub trait DataFile {
    /// Path the file was opened from
    fn path(&self) -> &Path;

    /// Read all values of a numeric variable as `f64`
    fn read_values(&self, name: &str) -> Result<Vec<f64>>;

    /// Read the `units` attribute of a variable, `None` if it has none
    fn read_units(&self, name: &str) -> Result<Option<String>>;
}

/// Opens paths as [`DataFile`]s
pub trait DataFileOpener {
    /// Concrete file handle type
    type File: DataFile;

    /// Open `path` for reading
    fn open(&self, path: &Path) -> Result<Self::File>;
}

/// A time variable with its declared units
#[derive(Debug, Clone, PartialEq)]
pub struct TimeField {
    /// Numeric offsets
    pub values: Vec<f64>,
    /// Raw `units` attribute
    pub units: String,
}

/// The fields of one source file that feed the aggregation
#[derive(Debug, Clone, PartialEq)]
pub struct FlashFile {
    /// Source path
    pub path: PathBuf,
    /// Orbit start offsets
    pub orbit_start: TimeField,
    /// Orbit end offsets
    pub orbit_end: TimeField,
    /// Flash latitudes
    pub flash_lat: Vec<f64>,
    /// Flash longitudes
    pub flash_lon: Vec<f64>,
}

impl FlashFile {
    /// Extract the orbit times and flash coordinates from an opened file
    pub fn extract(file: &impl DataFile) -> Result<Self> {
        Ok(Self {
            path: file.path().to_path_buf(),
            orbit_start: read_time_field(file, ORBIT_START_FIELD)?,
            orbit_end: read_time_field(file, ORBIT_END_FIELD)?,
            flash_lat: file.read_values(FLASH_LAT_FIELD)?,
            flash_lon: file.read_values(FLASH_LON_FIELD)?,
        })
    }

    /// Open `path` with `opener` and extract its fields; the handle is closed on return
    pub fn read<O: DataFileOpener>(opener: &O, path: &Path) -> Result<Self> {
        let file = opener.open(path)?;
        Self::extract(&file)
    }

    /// Number of flashes, i.e. the latitude count
    pub fn flash_count(&self) -> usize {
        self.flash_lat.len()
    }
}

fn read_time_field(file: &impl DataFile, name: &str) -> Result<TimeField> {
    let values = file.read_values(name)?;
    let units = file.read_units(name)?.ok_or_else(|| {
        FlashLocError::data_format(file.path(), name, "missing 'units' attribute")
    })?;

    Ok(TimeField { values, units })
}
