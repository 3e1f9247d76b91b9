//! Error types for the flash location pipeline.

use std::path::{Path, PathBuf};

use crate::render::RenderError;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, FlashLocError>;

/// Errors that abort a flash location run.
///
/// There is no per-file recovery: any of these stops the pipeline before
/// output files are committed.
#[derive(Debug, thiserror::Error)]
pub enum FlashLocError {
    /// The data directory is missing, not a directory, or cannot be listed
    #[error("cannot scan data directory {}: {source}", .path.display())]
    FileSystem {
        /// Directory that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A source file could not be opened, lacks an expected field, or holds
    /// inconsistent values
    #[error("invalid data in {} [{}]: {reason}", .path.display(), .field.as_deref().unwrap_or("file"))]
    DataFormat {
        /// Offending source file
        path: PathBuf,
        /// Field name, `None` when the whole file is affected
        field: Option<String>,
        /// Human-readable description
        reason: String,
    },

    /// Writing the CSV export failed
    #[error("failed to export {}: {source}", .path.display())]
    Export {
        /// Destination path
        path: PathBuf,
        /// Underlying CSV/I/O error
        #[source]
        source: csv::Error,
    },

    /// Building or saving the density map failed
    #[error("failed to render {}: {source}", .path.display())]
    Render {
        /// Destination path
        path: PathBuf,
        /// Underlying rendering error
        #[source]
        source: RenderError,
    },
}

impl FlashLocError {
    pub(crate) fn file_system(path: &Path, source: std::io::Error) -> Self {
        Self::FileSystem {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn data_format(path: &Path, field: &str, reason: impl Into<String>) -> Self {
        Self::DataFormat {
            path: path.to_path_buf(),
            field: Some(field.to_string()),
            reason: reason.into(),
        }
    }

    pub(crate) fn unreadable(path: &Path, reason: impl Into<String>) -> Self {
        Self::DataFormat {
            path: path.to_path_buf(),
            field: None,
            reason: reason.into(),
        }
    }

    pub(crate) fn export(path: &Path, source: impl Into<csv::Error>) -> Self {
        Self::Export {
            path: path.to_path_buf(),
            source: source.into(),
        }
    }

    pub(crate) fn render(path: &Path, source: impl Into<RenderError>) -> Self {
        Self::Render {
            path: path.to_path_buf(),
            source: source.into(),
        }
    }

    /// Process exit code for this error kind
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::FileSystem { .. } => 2,
            Self::DataFormat { .. } => 3,
            Self::Export { .. } => 4,
            Self::Render { .. } => 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_format_message_names_file_and_field() {
        let err = FlashLocError::data_format(
            Path::new("/data/ISS_LIS_SC_V1.0_20190802.nc"),
            "lightning_flash_lon",
            "variable not found",
        );
        let msg = err.to_string();
        assert!(msg.contains("ISS_LIS_SC_V1.0_20190802.nc"));
        assert!(msg.contains("lightning_flash_lon"));
        assert!(msg.contains("variable not found"));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_unreadable_file_message() {
        let err = FlashLocError::unreadable(Path::new("bad.nc"), "not a netCDF file");
        assert_eq!(err.to_string(), "invalid data in bad.nc [file]: not a netCDF file");
    }

    #[test]
    fn test_exit_codes_are_distinct() {
        let io = || std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let codes = [
            FlashLocError::file_system(Path::new("d"), io()).exit_code(),
            FlashLocError::unreadable(Path::new("f"), "x").exit_code(),
            FlashLocError::export(Path::new("o.csv"), io()).exit_code(),
            FlashLocError::render(Path::new("o.png"), RenderError::InvalidGeometry("x".into()))
                .exit_code(),
        ];
        assert_eq!(codes, [2, 3, 4, 5]);
    }
}
