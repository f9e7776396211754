// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Gamma correction through a precomputed 256-entry lookup table.

use image::RgbaImage;
use rayon::prelude::*;
use tracing::{debug, instrument};

use bandwerk_core::error::{BandwerkError, Result};

/// Brightness remapping table for one gamma exponent.
///
/// Built once per volume and applied to every page. A gamma of exactly 1.0
/// is represented without a table so that `apply` degenerates to a plain
/// copy.
#[derive(Debug, Clone)]
pub struct GammaTable {
    table: Option<[u8; 256]>,
}

impl GammaTable {
    /// Build the lookup table for `gamma`.
    ///
    /// Entry `i` maps to `round(clamp(0, 255, (i/255)^gamma * 255))`.
    /// Rejects non-positive and non-finite exponents.
    #[instrument]
    pub fn build(gamma: f64) -> Result<Self> {
        if !gamma.is_finite() || gamma <= 0.0 {
            return Err(BandwerkError::InvalidParameter(format!(
                "gamma must be greater than 0, got {gamma}"
            )));
        }
        if gamma == 1.0 {
            debug!("gamma is 1.0, using identity mapping");
            return Ok(Self { table: None });
        }

        let mut table = [0u8; 256];
        for (i, entry) in table.iter_mut().enumerate() {
            let remapped = (i as f64 / 255.0).powf(gamma) * 255.0;
            *entry = remapped.clamp(0.0, 255.0).round() as u8;
        }
        debug!(gamma, "gamma table built");
        Ok(Self { table: Some(table) })
    }

    /// Whether this table leaves every value unchanged.
    pub fn is_identity(&self) -> bool {
        self.table.is_none()
    }

    /// Remap a single channel value.
    pub fn lookup(&self, value: u8) -> u8 {
        match &self.table {
            Some(table) => table[value as usize],
            None => value,
        }
    }

    /// Remap the colour channels of `image` through the table, leaving
    /// alpha untouched.
    ///
    /// The rows are partitioned into contiguous horizontal bands, one per
    /// available worker, and each band is written into a disjoint slice of
    /// a freshly allocated output buffer — no pixel is ever shared between
    /// workers. The call blocks until every band has completed.
    pub fn apply(&self, image: &RgbaImage) -> RgbaImage {
        let Some(table) = &self.table else {
            return image.clone();
        };

        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return image.clone();
        }

        let stride = width as usize * 4;
        let bands = rayon::current_num_threads().max(1);
        let rows_per_band = (height as usize).div_ceil(bands);
        let band_len = rows_per_band * stride;

        let source = image.as_raw();
        let mut output = vec![0u8; source.len()];

        output
            .par_chunks_mut(band_len)
            .zip(source.par_chunks(band_len))
            .for_each(|(out_band, src_band)| {
                let pixels = out_band
                    .chunks_exact_mut(4)
                    .zip(src_band.chunks_exact(4));
                for (out, src) in pixels {
                    out[0] = table[src[0] as usize];
                    out[1] = table[src[1] as usize];
                    out[2] = table[src[2] as usize];
                    out[3] = src[3];
                }
            });

        RgbaImage::from_raw(width, height, output)
            .expect("output buffer is sized to the input dimensions")
    }
}

/// Build a table for `gamma` and apply it to `image` in one call.
pub fn adjust_gamma(image: &RgbaImage, gamma: f64) -> Result<RgbaImage> {
    Ok(GammaTable::build(gamma)?.apply(image))
}

// -- Tests --------------------------------------------------------------------
