use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use isslis_flashloc::pipeline::{PipelineConfig, DEFAULT_DATA_DIR};

use super::config::Config;

/// Resolve the run settings: arguments override the config file, which
/// overrides built-in defaults.
pub fn pipeline_config(
    data_dir: Option<PathBuf>,
    config: Option<PathBuf>,
    no_plot: bool,
) -> Result<PipelineConfig> {
    let file_config = match config {
        Some(path) => {
            info!("Loading config from {}", path.display());
            Config::from_file(&path)?
        }
        None => Config::default(),
    };

    let data_dir = data_dir
        .or(file_config.data_dir)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

    let render = if no_plot {
        None
    } else {
        file_config.render.options()
    };

    Ok(PipelineConfig::new(data_dir).with_render(render))
}

/// Aggregate the ISS LIS files in the data directory
pub fn run(data_dir: Option<PathBuf>, config: Option<PathBuf>, no_plot: bool) -> Result<()> {
    let config = pipeline_config(data_dir, config, no_plot)?;

    info!("ISS LIS Flash Locations");
    info!("=======================");
    info!("Data directory: {}", config.data_dir.display());

    let report = execute(&config)
        .with_context(|| format!("Failed to process {}", config.data_dir.display()))?;

    #[cfg(feature = "colorized_output")]
    {
        println!("{}", report.format_colored());
    }

    #[cfg(not(feature = "colorized_output"))]
    {
        println!("{}", report);
    }

    Ok(())
}

#[cfg(feature = "netcdf")]
fn execute(config: &PipelineConfig) -> isslis_flashloc::Result<isslis_flashloc::report::RunReport> {
    isslis_flashloc::pipeline::run_netcdf(config)
}

#[cfg(not(feature = "netcdf"))]
fn execute(_config: &PipelineConfig) -> Result<isslis_flashloc::report::RunReport> {
    anyhow::bail!("NetCDF support not compiled in. Rebuild with: cargo build --features netcdf")
}
