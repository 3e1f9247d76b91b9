//! Run summary printed by the command-line tool.

use std::fmt;
use std::path::PathBuf;

#[cfg(feature = "colorized_output")]
use console::style;

use crate::aggregate::{DateRange, SourceSummary};

/// Summary of a completed run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Directory that was scanned
    pub data_dir: PathBuf,
    /// Source files in processing order with their flash counts
    pub sources: Vec<SourceSummary>,
    /// Total number of flashes exported
    pub flash_count: usize,
    /// Observation period, `None` when no files were found
    pub date_range: Option<DateRange>,
    /// Written CSV file
    pub csv_path: PathBuf,
    /// Written density map, `None` when plotting was skipped
    pub plot_path: Option<PathBuf>,
}

impl RunReport {
    fn period(&self) -> String {
        match &self.date_range {
            Some(range) => range.display_text(),
            None => "no data".to_string(),
        }
    }

    /// Format the report with colors (requires console feature)
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        {
            use console::Emoji;

            static DONE: Emoji<'_, '_> = Emoji("✓", "[OK]");
            static SKIP: Emoji<'_, '_> = Emoji("-", "[SKIP]");

            let mut output = String::new();

            output.push_str(&format!("{}\n", style("ISS LIS Flash Locations").bold().cyan()));
            output.push_str(&format!("{}\n", style("=======================").cyan()));
            output.push_str(&format!(
                "{}: {}\n",
                style("Data directory").bold(),
                self.data_dir.display()
            ));
            output.push_str(&format!(
                "{}: {}\n",
                style("Files").bold(),
                style(self.sources.len()).green()
            ));
            output.push_str(&format!(
                "{}: {}\n",
                style("Flashes").bold(),
                style(self.flash_count).green()
            ));
            output.push_str(&format!("{}: {}\n\n", style("Period").bold(), self.period()));

            output.push_str(&format!(
                "[{}] {}: {}\n",
                DONE,
                style("CSV").green(),
                self.csv_path.display()
            ));
            match &self.plot_path {
                Some(path) => output.push_str(&format!(
                    "[{}] {}: {}\n",
                    DONE,
                    style("Plot").green(),
                    path.display()
                )),
                None => output.push_str(&format!(
                    "[{}] {}: skipped\n",
                    SKIP,
                    style("Plot").yellow()
                )),
            }

            output
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            format!("{}", self)
        }
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ISS LIS Flash Locations")?;
        writeln!(f, "=======================")?;
        writeln!(f, "Data directory: {}", self.data_dir.display())?;
        writeln!(f, "Files: {}", self.sources.len())?;
        writeln!(f, "Flashes: {}", self.flash_count)?;
        writeln!(f, "Period: {}", self.period())?;
        writeln!(f)?;
        writeln!(f, "[✓] CSV: {}", self.csv_path.display())?;
        match &self.plot_path {
            Some(path) => writeln!(f, "[✓] Plot: {}", path.display()),
            None => writeln!(f, "[-] Plot: skipped"),
        }
    }
}
