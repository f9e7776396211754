// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Double-page spread primitives — classification, rotation, and vertical
// splitting.

use image::{RgbaImage, imageops};

use bandwerk_core::error::{BandwerkError, Result};

/// Whether a page image is a double-page spread (two printed pages side by
/// side). Spreads are wider than they are tall.
pub fn is_double_page(image: &RgbaImage) -> bool {
    image.width() > image.height()
}

/// Quarter-turn a spread so it fills the screen of a portrait reading
/// device. Fails only on degenerate buffers.
pub fn rotate_to_landscape(image: &RgbaImage) -> Result<RgbaImage> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(BandwerkError::Image(format!(
            "cannot rotate a degenerate image ({width}x{height})"
        )));
    }
    Ok(imageops::rotate90(image))
}

/// Split a spread down the middle into its left and right halves.
///
/// On odd widths the left half keeps the extra column. Fails when the
/// image is too narrow to hold two pages.
pub fn split_vertically(image: &RgbaImage) -> Result<(RgbaImage, RgbaImage)> {
    let (width, height) = image.dimensions();
    if width < 2 || height == 0 {
        return Err(BandwerkError::Image(format!(
            "image too small to split ({width}x{height})"
        )));
    }

    let right_width = width / 2;
    let left_width = width - right_width;
    let left = imageops::crop_imm(image, 0, 0, left_width, height).to_image();
    let right = imageops::crop_imm(image, left_width, 0, right_width, height).to_image();
    Ok((left, right))
}

// -- Tests --------------------------------------------------------------------
