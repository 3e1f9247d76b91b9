//! # isslis-flashloc - ISS LIS Lightning Flash Locations
//!
//! `isslis_flashloc` collects the lightning flash locations recorded by the
//! Lightning Imaging Sensor on the International Space Station (ISS LIS) from
//! a directory of science data files, and produces:
//!
//! - a CSV file with one `flash_lat,flash_lon` row per detected flash
//! - a global flash density map (hexagonal bins, log color scale) as PNG
//!
//! Both are named after the observation period spanned by the files, e.g.
//! `isslis_flashloc_20190802_20190804.csv` and
//! `isslis_flashloc_20190802_20190804_plot.png`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use isslis_flashloc::pipeline::{run_netcdf, PipelineConfig};
//!
//! let report = run_netcdf(&PipelineConfig::new("data/iss_lis"))?;
//! println!("{}", report);
//! # Ok::<(), isslis_flashloc::FlashLocError>(())
//! ```
//!
//! ## Working with other sources
//!
//! Source files are read through the [`source::DataFileOpener`] trait. The
//! NetCDF implementation is behind the default `netcdf` feature; an in-memory
//! implementation is always available for tests and tooling:
//!
//! ```rust
//! use isslis_flashloc::aggregate::FlashAggregator;
//! use isslis_flashloc::source::{
//!     MemoryFile, MemoryOpener, FLASH_LAT_FIELD, FLASH_LON_FIELD, ORBIT_END_FIELD,
//!     ORBIT_START_FIELD,
//! };
//!
//! let units = Some("seconds since 1993-01-01 00:00:00");
//! let opener = MemoryOpener::new().with_file(
//!     "ISS_LIS_a.nc",
//!     MemoryFile::new()
//!         .with_variable(ORBIT_START_FIELD, vec![0.0], units)
//!         .with_variable(ORBIT_END_FIELD, vec![10.0], units)
//!         .with_variable(FLASH_LAT_FIELD, vec![10.0], None)
//!         .with_variable(FLASH_LON_FIELD, vec![20.0], None),
//! );
//!
//! let result = FlashAggregator::new(opener).aggregate(&["ISS_LIS_a.nc".into()])?;
//! assert_eq!(result.len(), 1);
//! # Ok::<(), isslis_flashloc::FlashLocError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`discovery`]: find `ISS_LIS_*.nc` files in the data directory
//! - [`source`]: read orbit times and flash coordinates from a file
//! - [`time`]: decode `"<unit> since <epoch>"` time values
//! - [`aggregate`]: concatenate coordinates and reduce orbit times to a date range
//! - [`export`]: CSV writer
//! - [`render`]: hexbin density map
//! - [`pipeline`]: the end-to-end run, committing outputs only on success

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod aggregate;
pub mod discovery;
pub mod error;
pub mod export;
pub mod output;
pub mod pipeline;
pub mod render;
pub mod report;
pub mod source;
pub mod time;

pub use error::{FlashLocError, Result};

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::aggregate::{AggregationResult, DateRange, FlashAggregator, FlashRecord};
    pub use crate::discovery::discover_files;
    pub use crate::error::{FlashLocError, Result};
    pub use crate::export::export_csv;
    pub use crate::output::OutputPaths;
    pub use crate::pipeline::{run, PipelineConfig, DEFAULT_DATA_DIR};
    #[cfg(feature = "netcdf")]
    pub use crate::pipeline::run_netcdf;
    pub use crate::render::{render_plot, FontSource, RenderOptions};
    pub use crate::report::RunReport;
    pub use crate::source::{DataFile, DataFileOpener, FlashFile, MemoryFile, MemoryOpener};
    #[cfg(feature = "netcdf")]
    pub use crate::source::NetCdfOpener;
    pub use crate::time::TimeUnits;
}
