//! End-to-end run: discover source files, aggregate them, then write the CSV
//! export and the density map.
//!
//! Both outputs are staged next to their destinations and only moved into
//! place once every step has succeeded, so a failed run leaves no partial
//! output behind. If the plot cannot be moved into place after the CSV was,
//! the CSV is removed again.

use std::fs;
use std::path::PathBuf;

use log::{info, warn};

use crate::aggregate::FlashAggregator;
use crate::discovery::discover_files;
use crate::error::{FlashLocError, Result};
use crate::export::stage_csv;
use crate::output::OutputPaths;
use crate::render::{stage_plot, RenderOptions};
use crate::report::RunReport;
use crate::source::DataFileOpener;

/// Data directory used when none is given
pub const DEFAULT_DATA_DIR: &str = "data/iss_lis";

/// Settings for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Directory scanned for source files; outputs are written here too
    pub data_dir: PathBuf,
    /// Density map settings, `None` to skip the plot
    pub render: Option<RenderOptions>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            render: Some(RenderOptions::default()),
        }
    }
}

impl PipelineConfig {
    /// Run over `data_dir` with default rendering
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Default::default()
        }
    }

    /// Set the density map options, `None` to skip the plot
    pub fn with_render(mut self, render: Option<RenderOptions>) -> Self {
        self.render = render;
        self
    }
}

/// Run the pipeline, reading source files with `opener`
pub fn run<O: DataFileOpener>(config: &PipelineConfig, opener: O) -> Result<RunReport> {
    let files = discover_files(&config.data_dir)?;
    let result = FlashAggregator::new(opener).aggregate(&files)?;

    let paths = OutputPaths::new(&config.data_dir, result.date_range());

    let csv = stage_csv(&result, &paths.csv)?;
    let plot = config
        .render
        .as_ref()
        .map(|options| stage_plot(&result, options, &paths.plot))
        .transpose()?;

    let csv_path = csv
        .commit()
        .map_err(|e| FlashLocError::export(&paths.csv, e))?;
    info!("Wrote {} flash locations to {}", result.len(), csv_path.display());

    let plot_path = match plot {
        Some(staged) => {
            let path = match staged.commit() {
                Ok(path) => path,
                Err(e) => {
                    if let Err(remove_err) = fs::remove_file(&csv_path) {
                        warn!("Failed to remove {}: {}", csv_path.display(), remove_err);
                    }
                    return Err(FlashLocError::render(&paths.plot, e));
                }
            };
            info!("Saved density map to {}", path.display());
            Some(path)
        }
        None => {
            info!("Plotting disabled");
            None
        }
    };

    Ok(RunReport {
        data_dir: config.data_dir.clone(),
        sources: result.sources().to_vec(),
        flash_count: result.len(),
        date_range: result.date_range().copied(),
        csv_path,
        plot_path,
    })
}

/// Run the pipeline over NetCDF source files
#[cfg(feature = "netcdf")]
pub fn run_netcdf(config: &PipelineConfig) -> Result<RunReport> {
    run(config, crate::source::NetCdfOpener::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{
        MemoryFile, MemoryOpener, FLASH_LAT_FIELD, FLASH_LON_FIELD, ORBIT_END_FIELD,
        ORBIT_START_FIELD,
    };
    use tempfile::tempdir;

    const UNITS: &str = "seconds since 1993-01-01 00:00:00";

    fn flash_file(start: f64, end: f64, lat: Vec<f64>, lon: Vec<f64>) -> MemoryFile {
        MemoryFile::new()
            .with_variable(ORBIT_START_FIELD, vec![start], Some(UNITS))
            .with_variable(ORBIT_END_FIELD, vec![end], Some(UNITS))
            .with_variable(FLASH_LAT_FIELD, lat, None)
            .with_variable(FLASH_LON_FIELD, lon, None)
    }

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("data/iss_lis"));
        assert!(config.render.is_some());
    }

    #[test]
    fn test_run_without_plot() {
        let dir = tempdir().unwrap();
        let name = "ISS_LIS_SC_V1.0_20190802_NRT_1.nc";
        std::fs::write(dir.path().join(name), b"").unwrap();

        let opener = MemoryOpener::new()
            .with_file(name, flash_file(0.0, 10.0, vec![10.0], vec![20.0]));
        let config = PipelineConfig::new(dir.path()).with_render(None);

        let report = run(&config, opener).unwrap();
        assert_eq!(report.flash_count, 1);
        assert!(report.plot_path.is_none());
        assert_eq!(
            report.csv_path.file_name().unwrap(),
            "isslis_flashloc_19930101_19930101.csv"
        );
        assert!(report.csv_path.exists());
        assert!(!dir
            .path()
            .join("isslis_flashloc_19930101_19930101_plot.png")
            .exists());
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempdir().unwrap();
        let config = PipelineConfig::new(dir.path().join("absent")).with_render(None);

        let err = run(&config, MemoryOpener::new()).unwrap_err();
        assert!(matches!(err, FlashLocError::FileSystem { .. }));
    }
}
