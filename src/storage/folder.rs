//! Output folder resolution

use super::{FileSystem, OutputLocation};
use crate::error::{Error, Result};
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};

/// Whether a resolved folder had to be created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FolderStatus {
    /// The folder did not exist and was created
    Created,
    /// The folder was already present
    Existing,
}

/// A folder that is guaranteed to exist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFolder {
    /// Absolute or caller-relative folder path
    pub path: PathBuf,
    /// How the folder came to exist
    pub status: FolderStatus,
}

impl ResolvedFolder {
    /// True when this call created the folder
    pub fn was_created(&self) -> bool {
        self.status == FolderStatus::Created
    }
}

/// Resolve `base/subfolder_name`, creating it (and parents) when missing.
///
/// Calling this again with the same arguments is a no-op that reports
/// [`FolderStatus::Existing`].
pub fn resolve_output_folder<F: FileSystem>(
    fs: &F,
    base: &Path,
    subfolder_name: &str,
) -> Result<ResolvedFolder> {
    let path = OutputLocation::new(base, subfolder_name).folder_path();
    ensure_folder(fs, &path)
}

/// Make sure `path` exists as a directory.
pub fn ensure_folder<F: FileSystem>(fs: &F, path: &Path) -> Result<ResolvedFolder> {
    if fs.exists(path) {
        if !fs.is_dir(path) {
            return Err(Error::FolderCreate {
                path: path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::AlreadyExists, "path is not a directory"),
            });
        }
        tracing::debug!(path = %path.display(), "Output folder already exists");
        return Ok(ResolvedFolder {
            path: path.to_path_buf(),
            status: FolderStatus::Existing,
        });
    }

    fs.create_dir_all(path)
        .map_err(|e| classify_create_error(path, e))?;
    tracing::info!(path = %path.display(), "Created output folder");

    Ok(ResolvedFolder {
        path: path.to_path_buf(),
        status: FolderStatus::Created,
    })
}

fn classify_create_error(path: &Path, err: io::Error) -> Error {
    match err.kind() {
        io::ErrorKind::PermissionDenied => Error::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => Error::FolderCreate {
            path: path.to_path_buf(),
            source: err,
        },
    }
}
