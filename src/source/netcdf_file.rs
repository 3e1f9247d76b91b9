use std::path::{Path, PathBuf};

use ::netcdf::AttributeValue;
use log::debug;

use super::{DataFile, DataFileOpener, UNITS_ATTRIBUTE};
use crate::error::{FlashLocError, Result};

/// Opens ISS LIS NetCDF-4 science files read-only
#[derive(Debug, Clone, Copy, Default)]
pub struct NetCdfOpener;

impl NetCdfOpener {
    /// Create a NetCDF opener
    pub fn new() -> Self {
        Self
    }
}

/// Read-only NetCDF file handle, closed on drop
pub struct NetCdfFile {
    path: PathBuf,
    inner: ::netcdf::File,
}

impl NetCdfFile {
    fn variable(&self, name: &str) -> Result<::netcdf::Variable<'_>> {
        self.inner
            .variable(name)
            .ok_or_else(|| FlashLocError::data_format(&self.path, name, "variable not found"))
    }
}

impl DataFile for NetCdfFile {
    fn path(&self) -> &Path {
        &self.path
    }

    fn read_values(&self, name: &str) -> Result<Vec<f64>> {
        // libnetcdf converts the stored type (float, double, ...) to f64 on read
        self.variable(name)?
            .get_values::<f64, _>(..)
            .map_err(|e| FlashLocError::data_format(&self.path, name, e.to_string()))
    }

    fn read_units(&self, name: &str) -> Result<Option<String>> {
        let variable = self.variable(name)?;
        let Some(attribute) = variable.attribute(UNITS_ATTRIBUTE) else {
            return Ok(None);
        };

        match attribute.value() {
            Ok(AttributeValue::Str(units)) => Ok(Some(units)),
            Ok(other) => Err(FlashLocError::data_format(
                &self.path,
                name,
                format!("'units' attribute is not a string: {other:?}"),
            )),
            Err(e) => Err(FlashLocError::data_format(&self.path, name, e.to_string())),
        }
    }
}

impl DataFileOpener for NetCdfOpener {
    type File = NetCdfFile;

    fn open(&self, path: &Path) -> Result<Self::File> {
        debug!("Opening {}", path.display());
        let inner =
            ::netcdf::open(path).map_err(|e| FlashLocError::unreadable(path, e.to_string()))?;

        Ok(NetCdfFile {
            path: path.to_path_buf(),
            inner,
        })
    }
}
