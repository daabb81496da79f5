//! Platform file-browser launching
//!
//! The running platform is identified once and mapped to a
//! [`DirectoryOpener`]; callers only ever see the trait object.

use crate::error::{Error, Result};
use serde::Serialize;
use std::fmt;
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;

/// Capability to show a directory in the platform's file browser
pub trait DirectoryOpener {
    /// Open `path`; returns once the browser has been launched
    fn open_directory(&self, path: &Path) -> Result<()>;
}

/// Operating systems with a known "open folder" command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Microsoft Windows (`explorer`)
    Windows,
    /// macOS (`open`)
    MacOs,
    /// Linux desktops (`xdg-open`)
    Linux,
    /// Anything else; opening is skipped
    Unsupported(String),
}

impl Platform {
    /// Platform the binary is running on
    pub fn current() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    /// Map a `std::env::consts::OS` identifier
    pub fn from_os(os: &str) -> Self {
        match os {
            "windows" => Self::Windows,
            "macos" => Self::MacOs,
            "linux" => Self::Linux,
            other => Self::Unsupported(other.to_string()),
        }
    }

    /// Program used to open a folder, if the platform has one
    pub fn launcher(&self) -> Option<&'static str> {
        match self {
            Self::Windows => Some("explorer"),
            Self::MacOs => Some("open"),
            Self::Linux => Some("xdg-open"),
            Self::Unsupported(_) => None,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Windows => f.write_str("Windows"),
            Self::MacOs => f.write_str("macOS"),
            Self::Linux => f.write_str("Linux"),
            Self::Unsupported(os) => write!(f, "{os} (unsupported)"),
        }
    }
}

/// Launches the native file browser without waiting for it to exit
#[derive(Debug, Clone)]
pub struct SystemOpener {
    platform: Platform,
}

impl SystemOpener {
    /// Opener for an explicit platform
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }

    /// Platform this opener dispatches for
    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    fn command(&self, path: &Path) -> Option<Command> {
        let program = self.platform.launcher()?;
        let mut command = Command::new(program);
        command
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        Some(command)
    }
}

impl DirectoryOpener for SystemOpener {
    fn open_directory(&self, path: &Path) -> Result<()> {
        let Some(command) = self.command(path) else {
            tracing::debug!(platform = %self.platform, "No folder launcher for platform, skipping");
            return Ok(());
        };

        let pid = spawn_detached(command).map_err(|e| Error::OpenDirectory {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        tracing::info!(
            path = %path.display(),
            platform = %self.platform,
            pid,
            "Opened output folder"
        );
        Ok(())
    }
}

/// Spawn `command` and reap it on a background thread.
///
/// Returns as soon as the child is running; the child never lingers as a
/// zombie in long window sessions.
fn spawn_detached(mut command: Command) -> io::Result<u32> {
    let mut child = command.spawn()?;
    let pid = child.id();
    thread::Builder::new()
        .name("qrstash-opener".to_string())
        .spawn(move || match child.wait() {
            Ok(status) => tracing::debug!(pid, %status, "Folder launcher exited"),
            Err(err) => tracing::debug!(pid, "Failed to wait for folder launcher: {err}"),
        })?;
    Ok(pid)
}

/// Opener used when folder opening is disabled
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopOpener;

impl DirectoryOpener for NoopOpener {
    fn open_directory(&self, path: &Path) -> Result<()> {
        tracing::debug!(path = %path.display(), "Folder opening disabled");
        Ok(())
    }
}

/// Pick the opener for this run
pub fn opener_for(platform: Platform, enabled: bool) -> Box<dyn DirectoryOpener> {
    if enabled {
        Box::new(SystemOpener::new(platform))
    } else {
        Box::new(NoopOpener)
    }
}
