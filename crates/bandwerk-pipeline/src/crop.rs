// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Margin-trimming stage.

use tracing::{debug, instrument};

use bandwerk_core::{BandwerkError, PageStore, Result};
use bandwerk_image::autocrop;

use crate::progress::ProgressSink;

/// Trim uniform margins from every page of `store`.
///
/// Pages are processed sequentially in store order; deterministic order
/// keeps error attribution simple. The first failure aborts the stage
/// with the failing chapter and page in the error, and no partially
/// transformed store escapes.
#[instrument(skip_all, fields(pages = store.len(), limit))]
pub fn crop_pages(
    store: PageStore,
    limit: f32,
    progress: &dyn ProgressSink,
) -> Result<PageStore> {
    progress.increase_total(store.len() as u64);

    let mut cropped = PageStore::with_capacity(store.len());
    for mut page in store {
        match autocrop(&page.image, limit) {
            Ok(image) => {
                page.image = image;
                cropped.push(page);
                progress.advance(1);
            }
            Err(err) => {
                progress.cancel("Error");
                return Err(BandwerkError::TransformFailure {
                    chapter: page.chapter,
                    page: page.number,
                    cause: err.to_string(),
                });
            }
        }
    }

    progress.done();
    debug!(pages = cropped.len(), "margins trimmed");
    Ok(cropped)
}

// -- Tests --------------------------------------------------------------------
