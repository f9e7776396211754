// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Boundary traits for the page retrieval collaborators.
//
// The pipeline never talks to the catalogue API or the filesystem layout
// directly; it drives these traits and merges whatever they return. Retry
// policy, rate limiting, and directory conventions all live behind them.

use bandwerk_core::{ChapterInfo, PageStore, Result};

use crate::progress::ProgressSink;

/// Retrieves pages for chapters hosted on the remote catalogue.
///
/// Implementations report their own `increase_total`/`advance` increments
/// as they discover and fetch pages, and return the first terminal error
/// they encounter.
pub trait NetworkSource: Send + Sync {
    /// Fetch every page of `chapters`. `data_saver` requests
    /// reduced-quality images where the catalogue offers them.
    fn retrieve_pages(
        &self,
        chapters: &[ChapterInfo],
        data_saver: bool,
        progress: &dyn ProgressSink,
    ) -> Result<PageStore>;
}

/// Loads pages for chapters stored in a local directory tree.
pub trait FilesystemSource: Send + Sync {
    fn retrieve_pages(
        &self,
        chapters: &[ChapterInfo],
        progress: &dyn ProgressSink,
    ) -> Result<PageStore>;
}
