// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Per-volume processing options.

use serde::{Deserialize, Serialize};

use crate::error::{BandwerkError, Result};

/// Options controlling which transform stages run on a volume and how.
///
/// An immutable snapshot handed to the pipeline at construction; there is
/// no process-wide state. `split_spreads` and `rotate_spreads` are mutually
/// exclusive — splitting already rotates the spread it keeps in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeOptions {
    /// Trim uniform margins from every page before other transforms.
    pub autocrop: bool,
    /// Detect double-page spreads, rotate them, and split each into two
    /// additional single pages.
    pub split_spreads: bool,
    /// Only rotate double-page spreads, keeping them as single pages.
    pub rotate_spreads: bool,
    /// Gamma exponent applied while splitting spreads. 1.0 leaves pixels
    /// unchanged.
    pub gamma: f64,
    /// Order split halves right-before-left, for right-to-left reading.
    pub right_to_left: bool,
    /// Request reduced-quality images from the network source.
    pub data_saver: bool,
    /// Re-encode every page as JPEG at this quality (1-100) after the
    /// other transforms. `None` disables recompression.
    pub jpeg_quality: Option<u8>,
}

impl Default for VolumeOptions {
    fn default() -> Self {
        Self {
            autocrop: false,
            split_spreads: false,
            rotate_spreads: false,
            gamma: 1.0,
            right_to_left: true,
            data_saver: false,
            jpeg_quality: None,
        }
    }
}

impl VolumeOptions {
    /// Reject option combinations the pipeline cannot honour. Called once
    /// at pipeline construction, so bad parameters fail before any work.
    pub fn validate(&self) -> Result<()> {
        if !self.gamma.is_finite() || self.gamma <= 0.0 {
            return Err(BandwerkError::InvalidParameter(format!(
                "gamma must be greater than 0, got {}",
                self.gamma
            )));
        }
        if self.split_spreads && self.rotate_spreads {
            return Err(BandwerkError::InvalidParameter(
                "split_spreads and rotate_spreads are mutually exclusive".to_string(),
            ));
        }
        if let Some(quality) = self.jpeg_quality {
            if !(1..=100).contains(&quality) {
                return Err(BandwerkError::InvalidParameter(format!(
                    "jpeg_quality must be between 1 and 100, got {quality}"
                )));
            }
        }
        Ok(())
    }
}

// -- Tests --------------------------------------------------------------------
