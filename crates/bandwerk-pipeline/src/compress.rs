// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page recompression stage.

use rayon::prelude::*;
use tracing::{debug, instrument};

use bandwerk_core::{BandwerkError, Page, PageStore, Result};
use bandwerk_image::recompress_jpeg;

use crate::progress::ProgressSink;

/// Re-encode every page as JPEG at `quality`, in parallel.
///
/// Each worker owns one page and writes an independent result, so order is
/// preserved without locking. The first observed failure aborts the stage
/// with its page context; outstanding work still runs to completion.
#[instrument(skip_all, fields(pages = store.len(), quality))]
pub fn compress_pages(
    store: PageStore,
    quality: u8,
    progress: &dyn ProgressSink,
) -> Result<PageStore> {
    progress.increase_total(store.len() as u64);

    let pages: Vec<Page> = store.into_iter().collect();
    let compressed: Result<Vec<Page>> = pages
        .into_par_iter()
        .map(|mut page| match recompress_jpeg(&page.image, quality) {
            Ok(image) => {
                page.image = image;
                progress.advance(1);
                Ok(page)
            }
            Err(err) => Err(BandwerkError::TransformFailure {
                chapter: page.chapter,
                page: page.number,
                cause: err.to_string(),
            }),
        })
        .collect();

    match compressed {
        Ok(pages) => {
            progress.done();
            debug!(pages = pages.len(), "pages recompressed");
            Ok(pages.into_iter().collect())
        }
        Err(err) => {
            progress.cancel("Error");
            Err(err)
        }
    }
}

// -- Tests --------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    use bandwerk_core::{ChapterId, PageId, VolumeId};

    use crate::progress::NullProgress;

    fn page(number: u32, image: RgbaImage) -> Page {
        Page {
            volume: VolumeId(1),
            chapter: ChapterId(1),
            number: PageId(number),
            image,
        }
    }

    #[test]
    fn compression_preserves_page_order_and_identity() {
        let mut store = PageStore::new();
        for number in 0..6 {
            store.push(page(
                number,
                RgbaImage::from_pixel(12, 12, Rgba([90, 90, 90, 255])),
            ));
        }

        let compressed =
            compress_pages(store, 70, &NullProgress).expect("valid pages");
        let numbers: Vec<u32> = compressed.iter().map(|p| p.number.0).collect();
        assert_eq!(numbers, vec![0, 1, 2, 3, 4, 5]);
    }

    /// A degenerate page fails the stage and the error carries its
    /// chapter/page identifiers.
    #[test]
    fn failure_carries_page_context() {
        let mut store = PageStore::new();
        store.push(page(1, RgbaImage::from_pixel(8, 8, Rgba([0, 0, 0, 255]))));
        store.push(page(2, RgbaImage::new(0, 0)));

        let err = compress_pages(store, 70, &NullProgress).expect_err("page 2 is empty");
        match err {
            BandwerkError::TransformFailure { chapter, page, .. } => {
                assert_eq!(chapter, ChapterId(1));
                assert_eq!(page, PageId(2));
            }
            other => panic!("expected TransformFailure, got {other:?}"),
        }
    }
}
