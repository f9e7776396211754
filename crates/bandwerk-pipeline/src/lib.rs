// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// bandwerk-pipeline — Page acquisition and transformation for one volume.
//
// Merges pages retrieved concurrently from the network and the local
// filesystem into one store, then runs the configured transform stages
// (margin trim, spread rotation/splitting, recompression) and hands the
// result to a downstream document writer.

pub mod compress;
pub mod crop;
pub mod merge;
pub mod progress;
pub mod source;
pub mod spread;
pub mod volume;

pub use compress::compress_pages;
pub use crop::crop_pages;
pub use merge::PageMerger;
pub use progress::{CliProgress, NullProgress, ProgressSink};
pub use source::{FilesystemSource, NetworkSource};
pub use spread::{SpreadOutcome, next_free_page_id, rotate_spreads, split_spreads};
pub use volume::VolumePipeline;
