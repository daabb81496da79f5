//! Output folder and filename management
//!
//! Everything that touches the output directory goes through the
//! [`FileSystem`] trait so the allocation and folder logic can be exercised
//! against in-memory fakes as well as the real disk.

mod folder;
mod naming;

pub use folder::{FolderStatus, ResolvedFolder, ensure_folder, resolve_output_folder};
pub use naming::{candidate_path, file_name, next_available_path};

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Existence check used by the filename allocator
pub trait PathProbe {
    /// Whether anything (file or directory) currently exists at `path`
    fn exists(&self, path: &Path) -> bool;
}

impl<F> PathProbe for F
where
    F: Fn(&Path) -> bool,
{
    fn exists(&self, path: &Path) -> bool {
        self(path)
    }
}

/// Filesystem operations needed to persist QR images
pub trait FileSystem {
    /// Whether anything exists at `path`
    fn exists(&self, path: &Path) -> bool;

    /// Whether `path` exists and is a directory
    fn is_dir(&self, path: &Path) -> bool;

    /// Create `path` and any missing parents
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Write `bytes` to `path`, replacing any previous content
    fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()>;
}

impl<T: FileSystem + ?Sized> FileSystem for &T {
    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        (**self).is_dir(path)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        (**self).create_dir_all(path)
    }

    fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        (**self).write(path, bytes)
    }
}

/// The real filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn exists(&self, path: &Path) -> bool {
        // symlink_metadata so a dangling link still counts as taken
        fs::symlink_metadata(path).is_ok()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        fs::write(path, bytes)
    }
}

/// Folder that receives images, expressed as a base plus optional subfolder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLocation {
    /// Existing or creatable parent directory
    pub base: PathBuf,
    /// Subfolder under `base`; empty means `base` itself
    pub subfolder: String,
}

impl OutputLocation {
    /// `base/subfolder`
    pub fn new(base: impl Into<PathBuf>, subfolder: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            subfolder: subfolder.into(),
        }
    }

    /// A fixed folder used as-is
    pub fn fixed(folder: impl Into<PathBuf>) -> Self {
        Self::new(folder, String::new())
    }

    /// Full path of the image folder
    pub fn folder_path(&self) -> PathBuf {
        if self.subfolder.is_empty() {
            self.base.clone()
        } else {
            self.base.join(&self.subfolder)
        }
    }
}

/// Where QR images for one run are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveTarget {
    /// Folder receiving the images
    pub base_directory: PathBuf,
    /// Filename prefix placed before the counter
    pub base_name: String,
    /// File extension without the leading dot
    pub extension: String,
}

impl SaveTarget {
    /// Build a target writing `{base_name}{N}.{extension}` into `base_directory`
    pub fn new(
        base_directory: impl Into<PathBuf>,
        base_name: impl Into<String>,
        extension: impl AsRef<str>,
    ) -> Self {
        Self {
            base_directory: base_directory.into(),
            base_name: base_name.into(),
            extension: extension.as_ref().trim_start_matches('.').to_string(),
        }
    }

    /// Next free path inside the target folder
    pub fn next_path(&self, probe: &impl PathProbe) -> PathBuf {
        next_available_path(probe, &self.base_directory, &self.base_name, &self.extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_target_strips_leading_dot() {
        let target = SaveTarget::new("/tmp/out", "qrcode_", ".png");
        assert_eq!(target.extension, "png");
    }

    #[test]
    fn test_os_filesystem_reports_existing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let fs = OsFileSystem;
        assert!(FileSystem::exists(&fs, dir.path()));
        assert!(fs.is_dir(dir.path()));
        assert!(!FileSystem::exists(&fs, &dir.path().join("missing.png")));
    }

    #[test]
    fn test_next_path_uses_closure_probe() {
        let target = SaveTarget::new("/data", "output", "png");
        let taken = [PathBuf::from("/data/output1.png")];
        let next = target.next_path(&|p: &Path| taken.iter().any(|t| t == p));
        assert_eq!(next, PathBuf::from("/data/output2.png"));
    }
}
