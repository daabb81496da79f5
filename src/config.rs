//! qrstash runtime configuration handling
//!
//! Defaults reproduce the fixed behaviour of the tool (save under
//! `~/Downloads/QRCode_Images` as `qrcode_{N}.png`, light-green on navy).
//! A config file and `QRSTASH_*` environment variables may override them.

use crate::error::{Error, Result};
use crate::qr::{EccLevel, RenderOptions};
use crate::storage::OutputLocation;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Largest accepted `render.module_size`, in pixels
pub const MAX_MODULE_SIZE: u32 = 100;
/// Largest accepted `render.border`, in modules
pub const MAX_BORDER: u32 = 64;

/// Top-level configuration structure persisted to disk or environment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StashConfig {
    /// Where images are written and how they are named
    pub output: OutputOptions,
    /// Visual parameters for the QR image
    pub render: RenderOptions,
    /// Logging configuration
    pub logging: LoggingOptions,
    /// Open the output folder in the file browser after saving
    pub open_folder: bool,
}

impl Default for StashConfig {
    fn default() -> Self {
        Self {
            output: OutputOptions::default(),
            render: RenderOptions::default(),
            logging: LoggingOptions::default(),
            open_folder: true,
        }
    }
}

impl StashConfig {
    /// Load configuration from an explicit path or fall back to discovered defaults.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = if let Some(path) = explicit_path {
            Self::from_file(path)?
        } else if let Some(path) = Self::discover_file()? {
            tracing::info!("Using configuration file: {}", path.display());
            Self::from_file(&path)?
        } else {
            tracing::debug!("No qrstash.toml / qrstash.yaml found, using defaults");
            Self::default()
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Attempt to locate a configuration file in common locations.
    fn discover_file() -> Result<Option<PathBuf>> {
        let cwd =
            env::current_dir().map_err(|e| Error::Config(format!("Failed to read cwd: {e}")))?;
        for candidate in ["qrstash.toml", "qrstash.yaml", "qrstash.yml"] {
            let path = cwd.join(candidate);
            if path.exists() {
                return Ok(Some(path));
            }
        }

        if let Some(xdg_config) = env::var_os("XDG_CONFIG_HOME") {
            let base = PathBuf::from(xdg_config).join("qrstash");
            for candidate in ["config.toml", "config.yaml"] {
                let path = base.join(candidate);
                if path.exists() {
                    return Ok(Some(path));
                }
            }
        }

        Ok(None)
    }

    /// Read configuration from a concrete file path.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {e}", path.display())))?;

        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_ascii_lowercase()
            .as_str()
        {
            "toml" => toml::from_str(&contents).map_err(|e| {
                Error::Config(format!("Failed to parse TOML {}: {e}", path.display()))
            }),
            "yaml" | "yml" => serde_yaml::from_str(&contents).map_err(|e| {
                Error::Config(format!("Failed to parse YAML {}: {e}", path.display()))
            }),
            other => Err(Error::Config(format!(
                "Unsupported config format '{}', expected toml/yaml",
                other
            ))),
        }
    }

    /// Apply environment variable overrides after file/default loading.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    /// Apply `QRSTASH_*` overrides from an arbitrary variable source.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        self.output.apply_overrides(&lookup);
        self.logging.apply_overrides(&lookup);

        if let Some(ecc) = lookup("QRSTASH_ECC") {
            match ecc.parse::<EccLevel>() {
                Ok(level) => self.render.ecc_level = level,
                Err(err) => tracing::warn!("Ignoring QRSTASH_ECC: {err}"),
            }
        }
        if let Some(size) = lookup("QRSTASH_MODULE_SIZE") {
            if let Ok(parsed) = size.parse::<u32>() {
                self.render.module_size = parsed;
            }
        }
        if let Some(border) = lookup("QRSTASH_BORDER") {
            if let Ok(parsed) = border.parse::<u32>() {
                self.render.border = parsed;
            }
        }
        if let Some(open) = lookup("QRSTASH_OPEN_FOLDER") {
            if let Some(flag) = parse_flag(&open) {
                self.open_folder = flag;
            }
        }
    }

    /// Reject settings that cannot produce an image.
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_MODULE_SIZE).contains(&self.render.module_size) {
            return Err(Error::Config(format!(
                "render.module_size must be between 1 and {MAX_MODULE_SIZE}, got {}",
                self.render.module_size
            )));
        }
        if self.render.border > MAX_BORDER {
            return Err(Error::Config(format!(
                "render.border must be at most {MAX_BORDER}, got {}",
                self.render.border
            )));
        }
        let extension = self.output.extension.trim_start_matches('.');
        if image::ImageFormat::from_extension(extension).is_none() {
            return Err(Error::Config(format!(
                "Unsupported image extension '{}'",
                self.output.extension
            )));
        }
        if self.output.folder_name.contains(['/', '\\']) {
            return Err(Error::Config(format!(
                "output.folder_name '{}' must be a single path component",
                self.output.folder_name
            )));
        }
        Ok(())
    }
}

/// Output location and naming
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    /// Parent of the image folder; defaults to `~/Downloads`
    pub base_dir: Option<PathBuf>,
    /// Subfolder created under `base_dir`
    pub folder_name: String,
    /// Fixed folder used as-is, bypassing `base_dir`/`folder_name`
    pub output_dir: Option<PathBuf>,
    /// Filename prefix before the counter
    pub base_name: String,
    /// Image file extension
    pub extension: String,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            base_dir: None,
            folder_name: "QRCode_Images".to_string(),
            output_dir: None,
            base_name: "qrcode_".to_string(),
            extension: "png".to_string(),
        }
    }
}

impl OutputOptions {
    fn apply_overrides<F>(&mut self, lookup: &F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("QRSTASH_OUTPUT_DIR") {
            self.output_dir = non_empty_path(dir);
        }
        if let Some(dir) = lookup("QRSTASH_BASE_DIR") {
            self.base_dir = non_empty_path(dir);
        }
        if let Some(name) = lookup("QRSTASH_FOLDER_NAME") {
            self.folder_name = name;
        }
        if let Some(name) = lookup("QRSTASH_BASE_NAME") {
            self.base_name = name;
        }
        if let Some(ext) = lookup("QRSTASH_EXTENSION") {
            self.extension = ext;
        }
    }

    /// Resolve the configured location into a base folder plus subfolder.
    pub fn location(&self) -> Result<OutputLocation> {
        if let Some(dir) = &self.output_dir {
            return Ok(OutputLocation::fixed(dir.clone()));
        }

        let base = match &self.base_dir {
            Some(dir) => dir.clone(),
            None => downloads_dir()?,
        };
        Ok(OutputLocation::new(base, self.folder_name.clone()))
    }
}

/// `~/Downloads` for the current user
pub fn downloads_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join("Downloads"))
        .ok_or_else(|| Error::Config("Could not determine home directory".to_string()))
}

/// Structured logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingOptions {
    /// Default log level (overridable via `QRSTASH_LOG_LEVEL`)
    pub level: String,
    /// Optional log file path for teeing structured logs
    pub file: Option<PathBuf>,
    /// Force ANSI colors in console logging
    pub color: bool,
    /// Optional log rotation strategy applied to `file`
    pub rotation: Option<LogRotation>,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: None,
            color: true,
            rotation: None,
        }
    }
}

impl LoggingOptions {
    fn apply_overrides<F>(&mut self, lookup: &F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("QRSTASH_LOG_LEVEL") {
            self.level = level;
        }
        if let Some(file) = lookup("QRSTASH_LOG_FILE") {
            self.file = non_empty_path(file);
        }
        if let Some(color) = lookup("QRSTASH_LOG_COLOR") {
            if let Some(flag) = parse_flag(&color) {
                self.color = flag;
            }
        }
        if let Some(rotation) = lookup("QRSTASH_LOG_ROTATION") {
            if let Ok(parsed) = rotation.parse::<LogRotation>() {
                self.rotation = Some(parsed);
            }
        }
    }
}

/// Supported log rotation policies for file sinks
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    /// Rotate log files once per hour
    Hourly,
    /// Rotate log files once per day
    Daily,
}

impl FromStr for LogRotation {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "hourly" => Ok(Self::Hourly),
            "daily" => Ok(Self::Daily),
            _ => Err(format!(
                "Unsupported log rotation '{value}', expected 'hourly' or 'daily'"
            )),
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

fn non_empty_path(value: String) -> Option<PathBuf> {
    if value.trim().is_empty() {
        None
    } else {
        Some(PathBuf::from(value))
    }
}
