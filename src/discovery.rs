//! Source file discovery.

use std::fs;
use std::path::{Component, Path, PathBuf};

use log::{debug, warn};

use crate::error::{FlashLocError, Result};

/// File name prefix of ISS LIS science files
pub const FILE_PREFIX: &str = "ISS_LIS_";
/// File name extension of ISS LIS science files
pub const FILE_EXTENSION: &str = ".nc";

/// Does `name` look like an ISS LIS NetCDF file (`ISS_LIS_*.nc`)?
pub fn is_isslis_file_name(name: &str) -> bool {
    name.starts_with(FILE_PREFIX) && name.ends_with(FILE_EXTENSION)
}

/// List the ISS LIS files directly inside `root` (non-recursive).
///
/// Only regular files are returned. Paths are lexically normalized and sorted
/// so repeated runs see the files in the same order. An empty result is not
/// an error.
pub fn discover_files(root: &Path) -> Result<Vec<PathBuf>> {
    let metadata = fs::metadata(root).map_err(|e| FlashLocError::file_system(root, e))?;
    if !metadata.is_dir() {
        return Err(FlashLocError::file_system(
            root,
            std::io::Error::new(std::io::ErrorKind::Other, "not a directory"),
        ));
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(root).map_err(|e| FlashLocError::file_system(root, e))? {
        let entry = entry.map_err(|e| FlashLocError::file_system(root, e))?;
        // the prefix and extension are ASCII, so invalid bytes elsewhere in
        // the name do not affect the match
        if !is_isslis_file_name(&entry.file_name().to_string_lossy()) {
            continue;
        }

        let path = entry.path();
        // follows symlinks, like a glob would
        if !path.is_file() {
            debug!("Skipping {} (not a regular file)", path.display());
            continue;
        }

        files.push(normalize_path(&path));
    }

    files.sort();

    if files.is_empty() {
        warn!(
            "No {}*{} files found in {}",
            FILE_PREFIX,
            FILE_EXTENSION,
            root.display()
        );
    } else {
        debug!("Discovered {} files in {}", files.len(), root.display());
    }

    Ok(files)
}

/// Lexically normalize a path: drop `.` components and collapse `dir/..`
/// pairs, without touching the file system.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other.as_os_str()),
        }
    }

    if normalized.as_os_str().is_empty() {
        normalized.push(".");
    }
    normalized
}
