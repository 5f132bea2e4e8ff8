//! # QR Rendering
//!
//! Turns a QRIS payload into a bitmap, with an optional logo at the centre.

use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, GrayImage, Luma};
use qrcode::{EcLevel, QrCode};
use qris_core::{QrisError, QrisResult};
use std::path::Path;
use tracing::{debug, warn};

/// Smallest edge of the rendered code, in pixels
pub const MIN_DIMENSION: u32 = 300;

/// The logo spans 1/LOGO_RATIO of the code width
const LOGO_RATIO: u32 = 5;

/// Load the logo overlaid on generated codes.
///
/// A missing file yields `None`; a file that cannot be decoded is an error.
pub fn load_logo(path: &Path) -> QrisResult<Option<DynamicImage>> {
    if !path.exists() {
        warn!("Logo not found at {}, rendering plain codes", path.display());
        return Ok(None);
    }

    let logo = image::open(path)
        .map_err(|e| QrisError::Rendering(format!("{}: {}", path.display(), e)))?;
    let (width, height) = logo.dimensions();
    debug!("Loaded logo {}: {}x{}", path.display(), width, height);
    Ok(Some(logo))
}

/// Render `payload` as a QR bitmap, with `logo` at the centre when given.
///
/// Level H error correction keeps the code scannable under the logo.
pub fn render_qr(payload: &str, logo: Option<&DynamicImage>) -> QrisResult<DynamicImage> {
    let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::H)
        .map_err(|e| QrisError::Rendering(e.to_string()))?;

    let bitmap: GrayImage = code
        .render::<Luma<u8>>()
        .min_dimensions(MIN_DIMENSION, MIN_DIMENSION)
        .build();

    debug!(
        "Rendered QR: {}x{}, logo={}",
        bitmap.width(),
        bitmap.height(),
        logo.is_some()
    );

    Ok(match logo {
        Some(logo) => overlay_logo(bitmap, logo),
        None => DynamicImage::ImageLuma8(bitmap),
    })
}

fn overlay_logo(bitmap: GrayImage, logo: &DynamicImage) -> DynamicImage {
    let mut canvas = DynamicImage::ImageLuma8(bitmap).to_rgba8();

    let edge = (canvas.width() / LOGO_RATIO).max(1);
    let logo = logo.resize(edge, edge, FilterType::Lanczos3).to_rgba8();

    let x = (canvas.width() - logo.width()) / 2;
    let y = (canvas.height() - logo.height()) / 2;
    imageops::overlay(&mut canvas, &logo, x, y);

    DynamicImage::ImageRgba8(canvas)
}
