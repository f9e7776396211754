// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Concurrent acquisition of a volume's pages from both sources.

use tracing::{debug, info, instrument};

use bandwerk_core::{BandwerkError, ChapterInfo, ChapterOrigin, PageStore, Result};

use crate::progress::ProgressSink;
use crate::source::{FilesystemSource, NetworkSource};

/// Retrieves a volume's pages from the network and the local filesystem in
/// parallel and merges the results into one store.
///
/// Because a failure of either source invalidates the whole volume,
/// results are buffered rather than streamed: both tasks always run to
/// completion, and only then is the outcome decided. Network failures are
/// reported in preference to filesystem failures so that the surfaced
/// error does not depend on which task happened to finish first.
pub struct PageMerger<'a> {
    network: &'a dyn NetworkSource,
    filesystem: &'a dyn FilesystemSource,
}

impl<'a> PageMerger<'a> {
    pub fn new(
        network: &'a dyn NetworkSource,
        filesystem: &'a dyn FilesystemSource,
    ) -> Self {
        Self {
            network,
            filesystem,
        }
    }

    /// Split `chapters` by origin, run one retrieval task per subset, and
    /// concatenate the results (network pages first).
    ///
    /// On failure the sink is cancelled exactly once and the sibling
    /// task's partial results are discarded.
    #[instrument(skip_all, fields(chapters = chapters.len(), data_saver))]
    pub fn merge(
        &self,
        chapters: &[ChapterInfo],
        data_saver: bool,
        progress: &dyn ProgressSink,
    ) -> Result<PageStore> {
        let (network_chapters, filesystem_chapters): (Vec<ChapterInfo>, Vec<ChapterInfo>) =
            chapters
                .iter()
                .cloned()
                .partition(|chapter| chapter.origin == ChapterOrigin::Network);
        debug!(
            network = network_chapters.len(),
            filesystem = filesystem_chapters.len(),
            "chapters partitioned by origin"
        );

        // Fork/join: neither task is cancelled when its sibling fails.
        let (network_result, filesystem_result) = rayon::join(
            || {
                self.network
                    .retrieve_pages(&network_chapters, data_saver, progress)
            },
            || {
                self.filesystem
                    .retrieve_pages(&filesystem_chapters, progress)
            },
        );

        match (network_result, filesystem_result) {
            (Ok(mut pages), Ok(filesystem_pages)) => {
                pages.append(filesystem_pages);
                progress.done();
                info!(pages = pages.len(), "volume pages merged");
                Ok(pages)
            }
            (Err(err), _) => {
                progress.cancel("Error");
                Err(BandwerkError::SourceFailure {
                    origin: ChapterOrigin::Network,
                    cause: err.to_string(),
                })
            }
            (_, Err(err)) => {
                progress.cancel("Error");
                Err(BandwerkError::SourceFailure {
                    origin: ChapterOrigin::Filesystem,
                    cause: err.to_string(),
                })
            }
        }
    }
}

// -- Tests --------------------------------------------------------------------
