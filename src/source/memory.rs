use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::{DataFile, DataFileOpener};
use crate::error::{FlashLocError, Result};

#[derive(Debug, Clone, Default)]
struct MemoryVariable {
    values: Vec<f64>,
    units: Option<String>,
}

/// In-memory stand-in for a source file's variables
#[derive(Debug, Clone, Default)]
pub struct MemoryFile {
    variables: HashMap<String, MemoryVariable>,
}

impl MemoryFile {
    /// Create an empty file with no variables
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a variable
    pub fn with_variable(mut self, name: &str, values: Vec<f64>, units: Option<&str>) -> Self {
        self.variables.insert(
            name.to_string(),
            MemoryVariable {
                values,
                units: units.map(str::to_string),
            },
        );
        self
    }

    /// Remove a variable
    pub fn without_variable(mut self, name: &str) -> Self {
        self.variables.remove(name);
        self
    }
}

/// [`DataFileOpener`] resolving paths by file name against registered [`MemoryFile`]s.
///
/// Matching on the file name only lets fixtures be paired with real (empty)
/// files created in a temporary directory for discovery.
#[derive(Debug, Clone, Default)]
pub struct MemoryOpener {
    files: HashMap<OsString, MemoryFile>,
}

impl MemoryOpener {
    /// Create an opener with no files
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `file` under `file_name`
    pub fn with_file(mut self, file_name: &str, file: MemoryFile) -> Self {
        self.files.insert(OsString::from(file_name), file);
        self
    }
}

/// Opened [`MemoryFile`]
#[derive(Debug)]
pub struct OpenMemoryFile {
    path: PathBuf,
    file: MemoryFile,
}

impl OpenMemoryFile {
    fn variable(&self, name: &str) -> Result<&MemoryVariable> {
        self.file
            .variables
            .get(name)
            .ok_or_else(|| FlashLocError::data_format(&self.path, name, "variable not found"))
    }
}

impl DataFile for OpenMemoryFile {
    fn path(&self) -> &Path {
        &self.path
    }

    fn read_values(&self, name: &str) -> Result<Vec<f64>> {
        Ok(self.variable(name)?.values.clone())
    }

    fn read_units(&self, name: &str) -> Result<Option<String>> {
        Ok(self.variable(name)?.units.clone())
    }
}

impl DataFileOpener for MemoryOpener {
    type File = OpenMemoryFile;

    fn open(&self, path: &Path) -> Result<Self::File> {
        let file = path
            .file_name()
            .and_then(|name| self.files.get(name))
            .ok_or_else(|| FlashLocError::unreadable(path, "no such in-memory file"))?;

        Ok(OpenMemoryFile {
            path: path.to_path_buf(),
            file: file.clone(),
        })
    }
}
