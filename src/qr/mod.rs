//! QR code encoding and rendering
//!
//! Wraps the `qrcode` crate for symbol construction and renders the module
//! grid either to a colored raster image (for saving) or to half-block
//! unicode text (for terminal previews).

mod encoder;

pub use encoder::{EncodedQr, MAX_IMAGE_SIDE, QrEncoder};

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Validated, non-blank text to encode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrPayload {
    text: String,
}

impl QrPayload {
    /// Accept `text` unless it is empty or whitespace only
    pub fn new(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        if !is_valid_payload(&text) {
            return Err(Error::EmptyPayload);
        }
        Ok(Self { text })
    }

    /// The payload text as entered
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Raw UTF-8 bytes placed in the symbol
    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }
}

/// Whether `text` has any non-whitespace content
pub fn is_valid_payload(text: &str) -> bool {
    !text.trim().is_empty()
}

/// Error correction level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EccLevel {
    /// Recovers about 7% of damaged modules
    L,
    /// Recovers about 15%
    M,
    /// Recovers about 25%
    Q,
    /// Recovers about 30%
    H,
}

impl EccLevel {
    pub(crate) fn to_qrcode(self) -> qrcode::EcLevel {
        match self {
            EccLevel::L => qrcode::EcLevel::L,
            EccLevel::M => qrcode::EcLevel::M,
            EccLevel::Q => qrcode::EcLevel::Q,
            EccLevel::H => qrcode::EcLevel::H,
        }
    }
}

impl FromStr for EccLevel {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "L" | "LOW" => Ok(Self::L),
            "M" | "MEDIUM" => Ok(Self::M),
            "Q" | "QUARTILE" => Ok(Self::Q),
            "H" | "HIGH" => Ok(Self::H),
            _ => Err(format!(
                "Unknown error correction level '{value}', expected L, M, Q or H"
            )),
        }
    }
}

impl fmt::Display for EccLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EccLevel::L => "L",
            EccLevel::M => "M",
            EccLevel::Q => "Q",
            EccLevel::H => "H",
        };
        f.write_str(label)
    }
}

/// Visual parameters for rendered QR images
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Error correction level
    pub ecc_level: EccLevel,
    /// Edge length of one module in pixels
    pub module_size: u32,
    /// Quiet zone width in modules
    pub border: u32,
    /// RGB color of dark modules
    pub fill_color: [u8; 3],
    /// RGB color of light modules and the border
    pub back_color: [u8; 3],
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            ecc_level: EccLevel::L,
            module_size: 10,
            border: 4,
            fill_color: [173, 235, 179],
            back_color: [0, 32, 63],
        }
    }
}
