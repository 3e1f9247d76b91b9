//! # isslis-flashloc
//!
//! A command-line tool that collects ISS LIS lightning flash locations from
//! a directory of science data files into a CSV file and a flash density map.
//!
//! ## Usage
//!
//! ```bash
//! # Process data/iss_lis
//! isslis-flashloc
//!
//! # Process another directory with info logging
//! isslis-flashloc -v /data/iss_lis/2019-08
//!
//! # CSV only, settings from a config file
//! isslis-flashloc --config isslis-flashloc.toml --no-plot
//! ```
//!
//! Exit codes: 0 success, 2 file system, 3 data format, 4 CSV export,
//! 5 rendering, 1 anything else.

use clap::Parser;
use std::process::ExitCode;

mod cli;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());

    match cli::dispatch(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::from(cli::exit_code(&err))
        }
    }
}
