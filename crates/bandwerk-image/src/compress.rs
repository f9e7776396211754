// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Lossy JPEG recompression for page images.

use image::RgbaImage;
use image::codecs::jpeg::JpegEncoder;
use tracing::{debug, instrument};

use bandwerk_core::error::{BandwerkError, Result};

/// Re-encode `image` as JPEG at `quality` (1-100) and decode it back.
///
/// Shrinks the pixel data a downstream document writer will embed, at the
/// cost of JPEG artefacts. The alpha channel does not survive JPEG — the
/// result is fully opaque.
#[instrument(skip(image), fields(width = image.width(), height = image.height(), quality))]
pub fn recompress_jpeg(image: &RgbaImage, quality: u8) -> Result<RgbaImage> {
    if !(1..=100).contains(&quality) {
        return Err(BandwerkError::InvalidParameter(format!(
            "jpeg quality must be between 1 and 100, got {quality}"
        )));
    }
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(BandwerkError::Image(format!(
            "cannot recompress a degenerate image ({width}x{height})"
        )));
    }

    let rgb = image::DynamicImage::ImageRgba8(image.clone()).to_rgb8();

    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    rgb.write_with_encoder(encoder)
        .map_err(|err| BandwerkError::Image(format!("JPEG encoding failed: {err}")))?;

    let decoded = image::load_from_memory(&buffer)
        .map_err(|err| BandwerkError::Image(format!("JPEG decoding failed: {err}")))?;

    debug!(encoded_bytes = buffer.len(), "page recompressed");
    Ok(decoded.to_rgba8())
}

// -- Tests --------------------------------------------------------------------
