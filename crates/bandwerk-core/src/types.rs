// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Bandwerk volume pipeline.

use image::RgbaImage;
use serde::{Deserialize, Serialize};

/// Identifier of a volume within a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VolumeId(pub u32);

impl std::fmt::Display for VolumeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a chapter. Only used as an ordering and grouping key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChapterId(pub u32);

impl std::fmt::Display for ChapterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position of a page within its chapter. Unique per chapter once a
/// transform stage has finished with the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PageId(pub u32);

impl std::fmt::Display for PageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which collaborator a chapter's pages come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChapterOrigin {
    /// Fetched from the remote catalogue over the network.
    Network,
    /// Loaded from a directory on the local filesystem.
    Filesystem,
}

impl std::fmt::Display for ChapterOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Network => write!(f, "network"),
            Self::Filesystem => write!(f, "filesystem"),
        }
    }
}

/// Chapter metadata used to partition retrieval work between sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterInfo {
    pub id: ChapterId,
    pub volume: VolumeId,
    pub origin: ChapterOrigin,
    pub title: Option<String>,
}

/// One page image belonging to one chapter of one volume.
#[derive(Debug, Clone)]
pub struct Page {
    pub volume: VolumeId,
    pub chapter: ChapterId,
    pub number: PageId,
    pub image: RgbaImage,
}

/// Ordered collection of the pages of a single volume.
///
/// A plain in-memory container: stages consume a store and produce a new
/// one, so no locking is needed once a stage owns it. Uniqueness of page
/// numbers is the concern of the stages that reassign them, not of the
/// store itself.
#[derive(Debug, Clone, Default)]
pub struct PageStore {
    pages: Vec<Page>,
}

impl PageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pages: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Add a single page at the end.
    pub fn push(&mut self, page: Page) {
        self.pages.push(page);
    }

    /// Add pages at the end, preserving their order. No uniqueness check.
    pub fn append<I>(&mut self, pages: I)
    where
        I: IntoIterator<Item = Page>,
    {
        self.pages.extend(pages);
    }

    /// Stable sort ascending by page number across the whole store, so
    /// spatial transforms see pages in reading order.
    pub fn sort_by_page_number(&mut self) {
        self.pages.sort_by_key(|page| page.number);
    }

    /// Borrowing view of the pages matching `predicate`. Pixel buffers are
    /// not copied.
    pub fn filter<P>(&self, predicate: P) -> impl Iterator<Item = &Page>
    where
        P: Fn(&Page) -> bool,
    {
        self.pages.iter().filter(move |page| predicate(page))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Page> {
        self.pages.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Page> {
        self.pages.iter_mut()
    }
}

impl IntoIterator for PageStore {
    type Item = Page;
    type IntoIter = std::vec::IntoIter<Page>;

    fn into_iter(self) -> Self::IntoIter {
        self.pages.into_iter()
    }
}

impl<'a> IntoIterator for &'a PageStore {
    type Item = &'a Page;
    type IntoIter = std::slice::Iter<'a, Page>;

    fn into_iter(self) -> Self::IntoIter {
        self.pages.iter()
    }
}

impl FromIterator<Page> for PageStore {
    fn from_iter<I: IntoIterator<Item = Page>>(iter: I) -> Self {
        Self {
            pages: iter.into_iter().collect(),
        }
    }
}

// -- Tests --------------------------------------------------------------------
