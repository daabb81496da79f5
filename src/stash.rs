//! Save pipeline: validate, resolve folder, allocate name, encode, write, open

use crate::config::StashConfig;
use crate::error::{Error, Result};
use crate::opener::{DirectoryOpener, Platform, opener_for};
use crate::qr::{QrEncoder, QrPayload};
use crate::storage::{
    FileSystem, FolderStatus, OsFileSystem, OutputLocation, ResolvedFolder, SaveTarget,
    resolve_output_folder,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Result of writing one QR image
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavedQr {
    /// File that was written
    pub path: PathBuf,
    /// Folder containing the file
    pub folder: PathBuf,
    /// Whether the folder was created by this save
    pub folder_status: FolderStatus,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Bytes written
    pub bytes: usize,
    /// QR symbol version
    pub version: i16,
    /// Half-block rendering of the saved symbol
    #[serde(skip)]
    pub preview: String,
}

/// A save followed by an attempt to open the folder
#[derive(Debug, Clone)]
pub struct StashOutcome {
    /// The written image
    pub saved: SavedQr,
    /// Set when the folder could not be opened; the save itself succeeded
    pub open_warning: Option<String>,
}

/// Writes QR images for one configured output location
pub struct QrStash<F = OsFileSystem> {
    location: OutputLocation,
    target: SaveTarget,
    encoder: QrEncoder,
    fs: F,
    opener: Box<dyn DirectoryOpener>,
}

impl QrStash<OsFileSystem> {
    /// Build a stash on the real filesystem from configuration
    pub fn from_config(config: &StashConfig, platform: Platform) -> Result<Self> {
        let location = config.output.location()?;
        Ok(Self::new(
            location,
            &config.output.base_name,
            &config.output.extension,
            QrEncoder::new(config.render.clone()),
            OsFileSystem,
            opener_for(platform, config.open_folder),
        ))
    }
}

impl<F: FileSystem> QrStash<F> {
    /// Assemble a stash from its parts
    pub fn new(
        location: OutputLocation,
        base_name: &str,
        extension: &str,
        encoder: QrEncoder,
        fs: F,
        opener: Box<dyn DirectoryOpener>,
    ) -> Self {
        let target = SaveTarget::new(location.folder_path(), base_name, extension);
        Self {
            location,
            target,
            encoder,
            fs,
            opener,
        }
    }

    /// Naming scheme and folder in use
    pub fn target(&self) -> &SaveTarget {
        &self.target
    }

    /// Base folder plus subfolder in use
    pub fn location(&self) -> &OutputLocation {
        &self.location
    }

    /// Encoder in use
    pub fn encoder(&self) -> &QrEncoder {
        &self.encoder
    }

    /// Create the output folder if needed
    pub fn prepare_folder(&self) -> Result<ResolvedFolder> {
        resolve_output_folder(&self.fs, &self.location.base, &self.location.subfolder)
    }

    /// Path the next save would use
    pub fn next_path(&self) -> PathBuf {
        self.target.next_path(&|p: &Path| self.fs.exists(p))
    }

    /// Encode `text` and write it to the next free filename
    pub fn save(&self, text: &str) -> Result<SavedQr> {
        let payload = QrPayload::new(text)?;
        let folder = self.prepare_folder()?;
        let path = self.next_path();
        let encoded = self.encoder.encode_file(&payload, &self.target.extension)?;

        self.fs
            .write(&path, &encoded.bytes)
            .map_err(|e| Error::ImageSave {
                path: path.clone(),
                message: e.to_string(),
            })?;

        tracing::info!(
            path = %path.display(),
            bytes = encoded.bytes.len(),
            version = encoded.version,
            "Saved QR code"
        );

        Ok(SavedQr {
            path,
            folder: folder.path,
            folder_status: folder.status,
            width: encoded.width,
            height: encoded.height,
            bytes: encoded.bytes.len(),
            version: encoded.version,
            preview: encoded.preview,
        })
    }

    /// Show the folder of a saved image in the file browser
    pub fn open_folder(&self, saved: &SavedQr) -> Result<()> {
        self.opener.open_directory(&saved.folder)
    }

    /// Save, then open the folder; an open failure is downgraded to a warning
    pub fn save_and_open(&self, text: &str) -> Result<StashOutcome> {
        let saved = self.save(text)?;
        let open_warning = match self.open_folder(&saved) {
            Ok(()) => None,
            Err(err) => {
                tracing::warn!("{err}");
                Some(err.to_string())
            }
        };
        Ok(StashOutcome {
            saved,
            open_warning,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opener::NoopOpener;
    use std::cell::RefCell;
    use std::collections::BTreeMap;
    use std::io;
    use std::rc::Rc;

    /// In-memory directory tree
    #[derive(Default)]
    struct MemoryFs {
        dirs: RefCell<Vec<PathBuf>>,
        files: RefCell<BTreeMap<PathBuf, Vec<u8>>>,
        fail_writes: bool,
    }

    impl FileSystem for MemoryFs {
        fn exists(&self, path: &Path) -> bool {
            self.is_dir(path) || self.files.borrow().contains_key(path)
        }

        fn is_dir(&self, path: &Path) -> bool {
            self.dirs.borrow().iter().any(|d| d == path)
        }

        fn create_dir_all(&self, path: &Path) -> io::Result<()> {
            self.dirs.borrow_mut().push(path.to_path_buf());
            Ok(())
        }

        fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
            if self.fail_writes {
                return Err(io::Error::new(io::ErrorKind::StorageFull, "no space left"));
            }
            self.files
                .borrow_mut()
                .insert(path.to_path_buf(), bytes.to_vec());
            Ok(())
        }
    }

    struct RecordingOpener {
        opened: Rc<RefCell<Vec<PathBuf>>>,
        fail: bool,
    }

    impl DirectoryOpener for RecordingOpener {
        fn open_directory(&self, path: &Path) -> Result<()> {
            self.opened.borrow_mut().push(path.to_path_buf());
            if self.fail {
                return Err(Error::OpenDirectory {
                    path: path.to_path_buf(),
                    message: "no launcher".to_string(),
                });
            }
            Ok(())
        }
    }

    fn stash(fs: MemoryFs, opener: Box<dyn DirectoryOpener>) -> QrStash<MemoryFs> {
        QrStash::new(
            OutputLocation::new("/home/me/Downloads", "QRCode_Images"),
            "qrcode_",
            "png",
            QrEncoder::default(),
            fs,
            opener,
        )
    }

    #[test]
    fn test_save_writes_numbered_files() {
        let qr = stash(MemoryFs::default(), Box::new(NoopOpener));

        let first = qr.save("hello world").unwrap();
        let second = qr.save("again").unwrap();

        assert_eq!(
            first.path,
            PathBuf::from("/home/me/Downloads/QRCode_Images/qrcode_1.png")
        );
        assert_eq!(first.folder_status, FolderStatus::Created);
        assert_eq!(
            second.path,
            PathBuf::from("/home/me/Downloads/QRCode_Images/qrcode_2.png")
        );
        assert_eq!(second.folder_status, FolderStatus::Existing);

        let files = qr.fs.files.borrow();
        assert_eq!(files.len(), 2);
        assert_eq!(files[&first.path].len(), first.bytes);
    }

    #[test]
    fn test_blank_text_writes_nothing() {
        let qr = stash(MemoryFs::default(), Box::new(NoopOpener));
        assert!(matches!(qr.save("  \t "), Err(Error::EmptyPayload)));
        assert!(qr.fs.files.borrow().is_empty());
        assert!(qr.fs.dirs.borrow().is_empty());
    }

    #[test]
    fn test_write_failure_becomes_image_save_error() {
        let fs = MemoryFs {
            fail_writes: true,
            ..MemoryFs::default()
        };
        let qr = stash(fs, Box::new(NoopOpener));

        match qr.save("data") {
            Err(Error::ImageSave { path, message }) => {
                assert!(path.ends_with("qrcode_1.png"));
                assert!(message.contains("no space left"));
            }
            other => panic!("expected image save error, got {other:?}"),
        }
    }

    #[test]
    fn test_open_failure_is_only_a_warning() {
        let opened = Rc::new(RefCell::new(Vec::new()));
        let qr = stash(
            MemoryFs::default(),
            Box::new(RecordingOpener {
                opened: opened.clone(),
                fail: true,
            }),
        );

        let outcome = qr.save_and_open("text").unwrap();
        assert!(outcome.open_warning.unwrap().contains("no launcher"));
        assert_eq!(
            opened.borrow().as_slice(),
            [PathBuf::from("/home/me/Downloads/QRCode_Images")]
        );
    }

    #[test]
    fn test_successful_open_has_no_warning() {
        let opened = Rc::new(RefCell::new(Vec::new()));
        let qr = stash(
            MemoryFs::default(),
            Box::new(RecordingOpener {
                opened: opened.clone(),
                fail: false,
            }),
        );

        let outcome = qr.save_and_open("text").unwrap();
        assert!(outcome.open_warning.is_none());
        assert_eq!(opened.borrow().len(), 1);
    }

    #[test]
    fn test_saved_image_carries_matching_preview() {
        let qr = stash(MemoryFs::default(), Box::new(NoopOpener));
        let saved = qr.save("x").unwrap();

        let code = qr.encoder().encode(&QrPayload::new("x").unwrap()).unwrap();
        assert_eq!(saved.preview, qr.encoder().render_terminal(&code));
    }
}
