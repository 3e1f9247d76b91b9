//! Output naming and staged (write-then-rename) output files.

use std::io;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::aggregate::DateRange;

/// Common prefix of all output file names
pub const OUTPUT_PREFIX: &str = "isslis_flashloc";

/// Token used in place of a date range when no source files were found
pub const NO_DATA_TOKEN: &str = "nodata";

/// Destination paths of the CSV export and the density plot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    /// `<root>/isslis_flashloc_<begin>_<end>.csv`
    pub csv: PathBuf,
    /// `<root>/isslis_flashloc_<begin>_<end>_plot.png`
    pub plot: PathBuf,
}

impl OutputPaths {
    /// Output paths inside `root` for the given date range
    pub fn new(root: &Path, range: Option<&DateRange>) -> Self {
        let stem = output_stem(range);
        Self {
            csv: root.join(format!("{stem}.csv")),
            plot: root.join(format!("{stem}_plot.png")),
        }
    }
}

/// File stem shared by the outputs, e.g. `isslis_flashloc_20190801_20190803`
pub fn output_stem(range: Option<&DateRange>) -> String {
    match range {
        Some(range) => format!("{OUTPUT_PREFIX}_{}", range.file_token()),
        None => format!("{OUTPUT_PREFIX}_{NO_DATA_TOKEN}"),
    }
}

/// An output written to a temporary file next to its destination.
///
/// Nothing appears at the destination until [`StagedFile::commit`]; dropping
/// an uncommitted file deletes the temporary.
#[derive(Debug)]
pub struct StagedFile {
    temp: NamedTempFile,
    dest: PathBuf,
}

impl StagedFile {
    /// Create a temporary file in the destination's directory
    pub fn new(dest: &Path) -> io::Result<Self> {
        let dir = match dest.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let temp = tempfile::Builder::new()
            .prefix(".isslis_flashloc")
            .suffix(".tmp")
            .tempfile_in(dir)?;

        Ok(Self {
            temp,
            dest: dest.to_path_buf(),
        })
    }

    /// Writable handle of the temporary file
    pub fn file_mut(&mut self) -> &mut std::fs::File {
        self.temp.as_file_mut()
    }

    /// Final destination
    pub fn dest(&self) -> &Path {
        &self.dest
    }

    /// Atomically move the temporary file to its destination, replacing any
    /// existing file
    pub fn commit(self) -> io::Result<PathBuf> {
        self.temp.as_file().sync_all()?;
        self.temp.persist(&self.dest).map_err(|e| e.error)?;
        Ok(self.dest)
    }
}
