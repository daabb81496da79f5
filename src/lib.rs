//! QRSTASH - save text as QR code images under auto-numbered filenames
//!
//! The library behind the `qrstash` binary: it encodes user text into a
//! colored QR image, writes it to the first free `qrcode_{N}.png` inside an
//! output folder (created on demand), and opens that folder in the
//! platform's file browser.
//!
//! # Features
//!
//! - **Folder resolution**: `~/Downloads/QRCode_Images` by default, with a
//!   distinct permission-denied error
//! - **Filename allocation**: sequential probe over an injectable existence check
//! - **Folder opening**: one [`DirectoryOpener`] chosen per platform at startup
//! - **Front-ends**: a console prompt and a small terminal window
//!
//! # Example
//!
//! ```no_run
//! use qrstash::{Platform, QrStash, StashConfig};
//!
//! fn main() -> qrstash::Result<()> {
//!     let config = StashConfig::default();
//!     let stash = QrStash::from_config(&config, Platform::current())?;
//!
//!     let outcome = stash.save_and_open("https://example.com")?;
//!     println!("Saved {}", outcome.saved.path.display());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs, rust_2024_compatibility)]

pub mod config;
pub mod error;
pub mod logging;
pub mod opener;
pub mod output;
pub mod prompt;
pub mod qr;
pub mod stash;
pub mod storage;
pub mod tui;

// Re-exports for convenience
pub use error::{Error, Result};

pub use config::{LogRotation, LoggingOptions, OutputOptions, StashConfig};
pub use opener::{DirectoryOpener, NoopOpener, Platform, SystemOpener, opener_for};
pub use prompt::prompt_until_valid;
pub use qr::{EccLevel, EncodedQr, QrEncoder, QrPayload, RenderOptions, is_valid_payload};
pub use stash::{QrStash, SavedQr, StashOutcome};
pub use storage::{
    FileSystem, FolderStatus, OsFileSystem, OutputLocation, PathProbe, ResolvedFolder,
    SaveTarget, next_available_path, resolve_output_folder,
};
