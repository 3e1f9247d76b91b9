use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use isslis_flashloc::FlashLocError;

mod config;
mod run;

/// isslis-flashloc - ISS LIS lightning flash locations to CSV and density map
#[derive(Parser)]
#[command(name = "isslis-flashloc")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory containing ISS_LIS_*.nc files (default: data/iss_lis)
    #[arg(value_name = "DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Load settings from a TOML config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write the CSV only, skip the density map
    #[arg(long)]
    no_plot: bool,
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    run::run(cli.data_dir, cli.config, cli.no_plot)
}

/// Process exit code for a failed run: the pipeline error kind when there
/// is one, 1 otherwise
pub fn exit_code(err: &anyhow::Error) -> u8 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<FlashLocError>())
        .map_or(1, FlashLocError::exit_code)
}
