// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Margin auto-cropping for page images.

use image::{Rgba, RgbaImage, imageops};
use tracing::{debug, instrument};

use bandwerk_core::error::{BandwerkError, Result};

/// Colour channels at or above this value count as paper margin.
const MARGIN_THRESHOLD: u8 = 235;

/// Trim uniform near-white (or fully transparent) margins from all four
/// sides of `image`.
///
/// `limit` caps how much may be removed: at most that fraction of the
/// width/height is trimmed from each side, so an almost-blank page is
/// never cropped down to a sliver. Fails when the page has no detectable
/// content at all.
#[instrument(skip(image), fields(width = image.width(), height = image.height(), limit))]
pub fn autocrop(image: &RgbaImage, limit: f32) -> Result<RgbaImage> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(BandwerkError::Image(format!(
            "cannot crop a degenerate image ({width}x{height})"
        )));
    }

    let content = match content_box(image) {
        Some(content) => content,
        None => {
            return Err(BandwerkError::Image(
                "no content detected, page is blank".to_string(),
            ));
        }
    };

    let limit = limit.clamp(0.0, 1.0);
    let max_inset_x = (width as f32 * limit) as u32;
    let max_inset_y = (height as f32 * limit) as u32;

    let left = content.first_col.min(max_inset_x);
    let right = (width - 1 - content.last_col).min(max_inset_x);
    let top = content.first_row.min(max_inset_y);
    let bottom = (height - 1 - content.last_row).min(max_inset_y);

    if left == 0 && right == 0 && top == 0 && bottom == 0 {
        return Ok(image.clone());
    }

    let cropped = imageops::crop_imm(
        image,
        left,
        top,
        width - left - right,
        height - top - bottom,
    )
    .to_image();

    debug!(
        left,
        top,
        right,
        bottom,
        new_width = cropped.width(),
        new_height = cropped.height(),
        "margins trimmed"
    );
    Ok(cropped)
}

struct ContentBox {
    first_col: u32,
    last_col: u32,
    first_row: u32,
    last_row: u32,
}

/// Bounding box of the non-margin pixels, or `None` for a blank page.
fn content_box(image: &RgbaImage) -> Option<ContentBox> {
    let (width, height) = image.dimensions();

    let row_has_content =
        |y: u32| (0..width).any(|x| !is_margin(image.get_pixel(x, y)));
    let col_has_content =
        |x: u32| (0..height).any(|y| !is_margin(image.get_pixel(x, y)));

    let first_row = (0..height).find(|&y| row_has_content(y))?;
    let last_row = (first_row..height).rev().find(|&y| row_has_content(y))?;
    let first_col = (0..width).find(|&x| col_has_content(x))?;
    let last_col = (first_col..width).rev().find(|&x| col_has_content(x))?;

    Some(ContentBox {
        first_col,
        last_col,
        first_row,
        last_row,
    })
}

fn is_margin(pixel: &Rgba<u8>) -> bool {
    let Rgba([r, g, b, a]) = *pixel;
    a == 0
        || (r >= MARGIN_THRESHOLD && g >= MARGIN_THRESHOLD && b >= MARGIN_THRESHOLD)
}

// -- Tests --------------------------------------------------------------------
