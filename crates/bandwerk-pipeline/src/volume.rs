// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Per-volume orchestration of the acquisition and transform stages.

use tracing::{info, instrument};

use bandwerk_core::{ChapterInfo, PageStore, Result, VolumeOptions};
use bandwerk_image::GammaTable;

use crate::compress::compress_pages;
use crate::crop::crop_pages;
use crate::merge::PageMerger;
use crate::progress::ProgressSink;
use crate::source::{FilesystemSource, NetworkSource};
use crate::spread::{rotate_spreads, split_spreads};

/// Fraction of width/height the crop stage may trim from each side.
const CROP_LIMIT: f32 = 0.1;

/// Runs one volume's pages through the configured stages, in fixed order:
/// margin trim, then spread splitting or rotation, then recompression.
///
/// Every stage is optional; any stage failure abandons the volume with the
/// stage's error. Failures never roll back output already handed to a
/// writer, and they never affect sibling volumes — both are the caller's
/// concern.
pub struct VolumePipeline {
    options: VolumeOptions,
}

impl VolumePipeline {
    /// Validate `options` and build the pipeline. Rejected options mean
    /// nothing runs at all.
    pub fn new(options: VolumeOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    pub fn options(&self) -> &VolumeOptions {
        &self.options
    }

    /// Retrieve the volume's pages from both sources concurrently. See
    /// [`PageMerger`].
    #[instrument(skip_all, fields(chapters = chapters.len()))]
    pub fn acquire(
        &self,
        network: &dyn NetworkSource,
        filesystem: &dyn FilesystemSource,
        chapters: &[ChapterInfo],
        progress: &dyn ProgressSink,
    ) -> Result<PageStore> {
        PageMerger::new(network, filesystem).merge(
            chapters,
            self.options.data_saver,
            progress,
        )
    }

    /// Run the configured transform stages over an acquired store.
    #[instrument(skip_all, fields(pages = store.len()))]
    pub fn process(
        &self,
        store: PageStore,
        progress: &dyn ProgressSink,
    ) -> Result<PageStore> {
        let store = if self.options.autocrop {
            crop_pages(store, CROP_LIMIT, progress)?
        } else {
            store
        };

        let store = if self.options.split_spreads {
            // The table only exists while a volume is in flight; options
            // validation has already rejected unusable exponents.
            let table = GammaTable::build(self.options.gamma)?;
            split_spreads(store, &table, self.options.right_to_left, progress)?
        } else if self.options.rotate_spreads {
            rotate_spreads(store, progress)?
        } else {
            store
        };

        let store = match self.options.jpeg_quality {
            Some(quality) => compress_pages(store, quality, progress)?,
            None => store,
        };

        info!(pages = store.len(), "volume ready");
        Ok(store)
    }

    /// Acquire and transform in one call.
    pub fn run(
        &self,
        network: &dyn NetworkSource,
        filesystem: &dyn FilesystemSource,
        chapters: &[ChapterInfo],
        progress: &dyn ProgressSink,
    ) -> Result<PageStore> {
        let store = self.acquire(network, filesystem, chapters, progress)?;
        self.process(store, progress)
    }
}

// -- Tests --------------------------------------------------------------------
