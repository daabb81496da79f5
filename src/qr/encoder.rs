//! QR code encoder

use crate::error::{Error, Result};
use crate::qr::{QrPayload, RenderOptions};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use qrcode::render::unicode;
use qrcode::{Color, QrCode, Version};
use std::io::Cursor;

/// Largest image side, in pixels, the encoder will allocate
pub const MAX_IMAGE_SIDE: u32 = 16_384;

/// An encoded image ready to be written to disk
#[derive(Debug, Clone)]
pub struct EncodedQr {
    /// Encoded file contents
    pub bytes: Vec<u8>,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// QR symbol version (1-40)
    pub version: i16,
    /// Modules per side, excluding the border
    pub modules: u32,
    /// Half-block rendering of the same symbol
    pub preview: String,
}

/// QR code encoder
#[derive(Debug, Clone, Default)]
pub struct QrEncoder {
    options: RenderOptions,
}

impl QrEncoder {
    /// Create an encoder with the given render options
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// The render options in use
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Build the smallest symbol that fits the payload at the configured ECC level
    pub fn encode(&self, payload: &QrPayload) -> Result<QrCode> {
        QrCode::with_error_correction_level(payload.as_bytes(), self.options.ecc_level.to_qrcode())
            .map_err(|e| Error::QrEncode(format!("Failed to create QR code: {}", e)))
    }

    /// Rasterise a symbol using the module size, border and colors
    ///
    /// Fails with [`Error::Image`] when the side length overflows or exceeds
    /// [`MAX_IMAGE_SIDE`].
    pub fn render_image(&self, code: &QrCode) -> Result<RgbImage> {
        let modules = code.width() as u32;
        let module_size = self.options.module_size.max(1);
        let border = self.options.border;
        let side = border
            .checked_mul(2)
            .and_then(|quiet| quiet.checked_add(modules))
            .and_then(|span| span.checked_mul(module_size))
            .filter(|side| *side <= MAX_IMAGE_SIDE)
            .ok_or_else(|| {
                Error::Image(format!(
                    "Image too large: {modules} modules, border {border}, module size {module_size} \
                     (max side {MAX_IMAGE_SIDE} px)"
                ))
            })?;
        let colors = code.to_colors();
        let fill = Rgb(self.options.fill_color);
        let back = Rgb(self.options.back_color);

        Ok(RgbImage::from_fn(side, side, |x, y| {
            let mx = (x / module_size).checked_sub(border);
            let my = (y / module_size).checked_sub(border);
            match (mx, my) {
                (Some(mx), Some(my)) if mx < modules && my < modules => {
                    if colors[(my * modules + mx) as usize] == Color::Dark {
                        fill
                    } else {
                        back
                    }
                }
                _ => back,
            }
        }))
    }

    /// Render a symbol as half-block text for terminals
    pub fn render_terminal(&self, code: &QrCode) -> String {
        code.render::<unicode::Dense1x2>()
            .dark_color(unicode::Dense1x2::Dark)
            .light_color(unicode::Dense1x2::Light)
            .quiet_zone(self.options.border > 0)
            .build()
    }

    /// Encode the payload and serialise it in the format named by `extension`
    pub fn encode_file(&self, payload: &QrPayload, extension: &str) -> Result<EncodedQr> {
        let format = ImageFormat::from_extension(extension).ok_or_else(|| {
            Error::Image(format!("Unsupported image extension '{extension}'"))
        })?;

        let code = self.encode(payload)?;
        let image = self.render_image(&code)?;
        let (width, height) = image.dimensions();

        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(image).write_to(&mut Cursor::new(&mut bytes), format)?;

        tracing::debug!(
            version = symbol_version(&code),
            ecc = %self.options.ecc_level,
            width,
            height,
            bytes = bytes.len(),
            "Encoded QR image"
        );

        Ok(EncodedQr {
            bytes,
            width,
            height,
            version: symbol_version(&code),
            modules: code.width() as u32,
            preview: self.render_terminal(&code),
        })
    }
}

fn symbol_version(code: &QrCode) -> i16 {
    match code.version() {
        Version::Normal(v) | Version::Micro(v) => v,
    }
}
