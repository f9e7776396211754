// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// bandwerk-image — Pixel-level page transforms for the Bandwerk pipeline.
//
// Provides gamma correction through a precomputed lookup table, margin
// auto-cropping, double-page spread primitives (classify, rotate, split),
// and JPEG recompression. All operations work on in-memory RGBA buffers
// from the `image` crate.

pub mod compress;
pub mod crop;
pub mod gamma;
pub mod spread;

pub use compress::recompress_jpeg;
pub use crop::autocrop;
pub use gamma::{GammaTable, adjust_gamma};
pub use spread::{is_double_page, rotate_to_landscape, split_vertically};
