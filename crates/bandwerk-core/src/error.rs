// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Bandwerk.

use thiserror::Error;

use crate::types::{ChapterId, ChapterOrigin, PageId};

/// Top-level error type for all Bandwerk operations.
#[derive(Debug, Error)]
pub enum BandwerkError {
    /// A caller-supplied parameter was rejected before any work started.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// One of the two page retrieval tasks failed; the whole volume is
    /// unusable and any partial results from the sibling task are dropped.
    #[error("{origin} source failed: {cause}")]
    SourceFailure {
        origin: ChapterOrigin,
        cause: String,
    },

    /// A transform stage failed on a specific page.
    #[error("chapter {chapter}: page {page}: {cause}")]
    TransformFailure {
        chapter: ChapterId,
        page: PageId,
        cause: String,
    },

    /// A pixel-level operation failed.
    #[error("image processing failed: {0}")]
    Image(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BandwerkError>;
