// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Double-page spread handling — rotate-only and rotate-and-split modes.

use std::collections::{HashMap, HashSet};

use tracing::{info, instrument, warn};

use bandwerk_core::{ChapterId, Page, PageId, PageStore, Result};
use bandwerk_image::{GammaTable, is_double_page, rotate_to_landscape, split_vertically};

use crate::progress::ProgressSink;

/// What happened to one page during spread handling.
///
/// A failed rotation is never a stage failure — the page keeps its previous
/// pixels — but it is reported here rather than discarded, so callers can
/// log or count it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpreadOutcome {
    /// The page was a spread and is now rotated.
    Rotated,
    /// The page was not a spread and was left alone.
    Unrotated,
    /// The page looked like a spread but produced no usable result.
    Failed(String),
}

/// Smallest page number >= `start` that is not yet marked occupied.
///
/// A plain linear probe: deterministic, and cheap because occupancy sets
/// only ever hold a chapter's worth of identifiers.
pub fn next_free_page_id(start: PageId, occupied: &HashSet<PageId>) -> PageId {
    let mut id = start;
    while occupied.contains(&id) {
        id = PageId(id.0 + 1);
    }
    id
}

/// Rotate `page` if it is a double-page spread, reporting what happened.
fn rotate_spread_in_place(page: &mut Page) -> SpreadOutcome {
    if !is_double_page(&page.image) {
        return SpreadOutcome::Unrotated;
    }
    match rotate_to_landscape(&page.image) {
        Ok(rotated) => {
            page.image = rotated;
            SpreadOutcome::Rotated
        }
        Err(err) => SpreadOutcome::Failed(err.to_string()),
    }
}

/// Rotate every double-page spread in `store`, keeping identifiers.
///
/// The store is sorted into reading order first. Individual failures leave
/// the page unchanged and the stage still succeeds.
#[instrument(skip_all, fields(pages = store.len()))]
pub fn rotate_spreads(
    mut store: PageStore,
    progress: &dyn ProgressSink,
) -> Result<PageStore> {
    progress.increase_total(store.len() as u64);
    store.sort_by_page_number();

    let mut rotated = 0usize;
    let mut failures = 0usize;
    for page in store.iter_mut() {
        match rotate_spread_in_place(page) {
            SpreadOutcome::Rotated => rotated += 1,
            SpreadOutcome::Unrotated => {}
            SpreadOutcome::Failed(reason) => {
                failures += 1;
                warn!(
                    chapter = %page.chapter,
                    page = %page.number,
                    %reason,
                    "spread rotation failed, page left unchanged"
                );
            }
        }
        progress.advance(1);
    }

    progress.done();
    info!(rotated, failures, "spreads rotated");
    Ok(store)
}

/// Gamma-adjust every page, then rotate and split each double-page spread
/// into three pages: the rotated spread in its slot plus its two halves as
/// new pages.
///
/// Identifiers are reassigned from a per-chapter occupancy set so that the
/// inserted halves never collide with existing numbers: each page takes
/// the smallest free number >= its own, a split additionally claims the
/// next two, and with `right_to_left` the right half precedes the left
/// one. Every `(chapter, number)` pair in the output is unique.
///
/// Rotate or split failures degrade like in [`rotate_spreads`]: the slot
/// keeps its gamma-adjusted pixels and no derived pages are emitted.
#[instrument(skip_all, fields(pages = store.len(), right_to_left))]
pub fn split_spreads(
    mut store: PageStore,
    table: &GammaTable,
    right_to_left: bool,
    progress: &dyn ProgressSink,
) -> Result<PageStore> {
    progress.increase_total(store.len() as u64);
    store.sort_by_page_number();

    let mut occupied: HashMap<ChapterId, HashSet<PageId>> = HashMap::new();
    let mut output = PageStore::with_capacity(store.len());
    let mut splits = 0usize;
    let mut failures = 0usize;

    for mut page in store {
        let occupied_ids = occupied.entry(page.chapter).or_default();
        let slot = next_free_page_id(page.number, occupied_ids);

        page.image = table.apply(&page.image);

        if is_double_page(&page.image) {
            // The halves are cut from the unrotated spread.
            let spread = page.image.clone();
            if let SpreadOutcome::Failed(reason) = rotate_spread_in_place(&mut page) {
                failures += 1;
                warn!(
                    chapter = %page.chapter,
                    page = %slot,
                    %reason,
                    "spread rotation failed, keeping unrotated pixels"
                );
            }
            page.number = slot;
            occupied_ids.insert(slot);

            match split_vertically(&spread) {
                Ok((left, right)) => {
                    let (first_image, second_image) = if right_to_left {
                        (right, left)
                    } else {
                        (left, right)
                    };
                    let first = Page {
                        volume: page.volume,
                        chapter: page.chapter,
                        number: PageId(slot.0 + 1),
                        image: first_image,
                    };
                    let second = Page {
                        volume: page.volume,
                        chapter: page.chapter,
                        number: PageId(slot.0 + 2),
                        image: second_image,
                    };
                    occupied_ids.insert(first.number);
                    occupied_ids.insert(second.number);
                    output.push(page);
                    output.push(first);
                    output.push(second);
                    splits += 1;
                }
                Err(err) => {
                    failures += 1;
                    warn!(
                        chapter = %page.chapter,
                        page = %slot,
                        %err,
                        "spread split failed, keeping the spread as one page"
                    );
                    output.push(page);
                }
            }
        } else {
            page.number = slot;
            occupied_ids.insert(slot);
            output.push(page);
        }
        progress.advance(1);
    }

    progress.done();
    info!(pages = output.len(), splits, failures, "spreads split");
    Ok(output)
}

// -- Tests --------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    use bandwerk_core::VolumeId;

    use crate::progress::NullProgress;

    const DARK: Rgba<u8> = Rgba([30, 30, 30, 255]);
    const LIGHT: Rgba<u8> = Rgba([200, 200, 200, 255]);

    fn tall_page(chapter: u32, number: u32) -> Page {
        Page {
            volume: VolumeId(1),
            chapter: ChapterId(chapter),
            number: PageId(number),
            image: RgbaImage::from_pixel(4, 6, DARK),
        }
    }

    /// A wide spread: dark left half, light right half.
    fn spread_page(chapter: u32, number: u32) -> Page {
        let image = RgbaImage::from_fn(8, 4, |x, _| if x < 4 { DARK } else { LIGHT });
        Page {
            volume: VolumeId(1),
            chapter: ChapterId(chapter),
            number: PageId(number),
            image,
        }
    }

    fn identity_table() -> GammaTable {
        GammaTable::build(1.0).expect("gamma 1.0 is valid")
    }

    fn numbers(store: &PageStore) -> Vec<u32> {
        store.iter().map(|p| p.number.0).collect()
    }

    #[test]
    fn next_free_page_id_skips_occupied_numbers() {
        let mut occupied = HashSet::new();
        assert_eq!(next_free_page_id(PageId(5), &occupied), PageId(5));

        occupied.insert(PageId(5));
        assert_eq!(next_free_page_id(PageId(5), &occupied), PageId(6));

        occupied.extend([PageId(6), PageId(7)]);
        assert_eq!(next_free_page_id(PageId(5), &occupied), PageId(8));
        assert_eq!(next_free_page_id(PageId(2), &occupied), PageId(2));
    }

    /// One spread becomes exactly three pages: the rotated slot, then the
    /// right half, then the left half — strictly ascending numbers.
    #[test]
    fn split_turns_one_spread_into_three_pages() {
        let mut store = PageStore::new();
        store.push(spread_page(1, 5));

        let output = split_spreads(store, &identity_table(), true, &NullProgress)
            .expect("splitting succeeds");

        assert_eq!(output.len(), 3);
        assert_eq!(numbers(&output), vec![5, 6, 7]);

        let pages: Vec<&Page> = output.iter().collect();
        // Slot page is rotated: 8x4 became 4x8.
        assert_eq!(pages[0].image.dimensions(), (4, 8));
        // Right half precedes the left half in right-to-left mode.
        assert_eq!(*pages[1].image.get_pixel(0, 0), LIGHT);
        assert_eq!(*pages[2].image.get_pixel(0, 0), DARK);
        // Chapter and volume are inherited.
        assert!(pages.iter().all(|p| p.chapter == ChapterId(1)));
        assert!(pages.iter().all(|p| p.volume == VolumeId(1)));
    }

    /// With a page number already claimed, the spread is pushed to the
    /// next free slot: a taken 5 yields slot 6, halves 7 and 8, and the
    /// chapter's occupancy ends up as {5, 6, 7, 8}.
    #[test]
    fn split_allocates_around_occupied_numbers() {
        let mut store = PageStore::new();
        store.push(tall_page(1, 5));
        store.push(spread_page(1, 5));

        let output = split_spreads(store, &identity_table(), true, &NullProgress)
            .expect("splitting succeeds");

        assert_eq!(numbers(&output), vec![5, 6, 7, 8]);
        let unique: HashSet<(ChapterId, PageId)> =
            output.iter().map(|p| (p.chapter, p.number)).collect();
        assert_eq!(unique.len(), output.len());
    }

    #[test]
    fn left_to_right_mode_swaps_the_halves() {
        let mut store = PageStore::new();
        store.push(spread_page(1, 0));

        let output = split_spreads(store, &identity_table(), false, &NullProgress)
            .expect("splitting succeeds");

        let pages: Vec<&Page> = output.iter().collect();
        assert_eq!(*pages[1].image.get_pixel(0, 0), DARK);
        assert_eq!(*pages[2].image.get_pixel(0, 0), LIGHT);
    }

    /// Occupancy is tracked per chapter: identical numbers in different
    /// chapters never push each other around.
    #[test]
    fn occupancy_is_per_chapter() {
        let mut store = PageStore::new();
        store.push(spread_page(1, 1));
        store.push(spread_page(2, 1));

        let output = split_spreads(store, &identity_table(), true, &NullProgress)
            .expect("splitting succeeds");

        for chapter in [ChapterId(1), ChapterId(2)] {
            let mut chapter_numbers: Vec<u32> = output
                .filter(|p| p.chapter == chapter)
                .map(|p| p.number.0)
                .collect();
            chapter_numbers.sort_unstable();
            assert_eq!(chapter_numbers, vec![1, 2, 3]);
        }
    }

    /// A store with duplicate numbers and mixed spreads comes out with
    /// every `(chapter, number)` pair unique and at least as many pages.
    #[test]
    fn output_numbers_are_unique_per_chapter() {
        let mut store = PageStore::new();
        store.append([
            tall_page(1, 0),
            tall_page(1, 0),
            spread_page(1, 1),
            tall_page(1, 1),
            spread_page(2, 0),
        ]);
        let input_len = store.len();

        let output = split_spreads(store, &identity_table(), true, &NullProgress)
            .expect("splitting succeeds");

        assert!(output.len() > input_len);
        let unique: HashSet<(ChapterId, PageId)> =
            output.iter().map(|p| (p.chapter, p.number)).collect();
        assert_eq!(unique.len(), output.len());
    }

    /// Gamma is applied to singles and spread halves alike.
    #[test]
    fn split_applies_gamma_to_every_page() {
        let table = GammaTable::build(2.0).expect("valid gamma");
        let expected = table.lookup(DARK.0[0]);

        let mut store = PageStore::new();
        store.push(tall_page(1, 0));
        store.push(spread_page(1, 1));

        let output =
            split_spreads(store, &table, true, &NullProgress).expect("splitting succeeds");

        for page in output.iter() {
            let sample = page.image.get_pixel(0, 0).0[0];
            assert!(
                sample == expected || sample == table.lookup(LIGHT.0[0]),
                "page {} carries unmapped pixels",
                page.number
            );
        }
    }

    /// A spread whose transforms produce nothing usable stays a single
    /// page; the stage still succeeds and no derived pages appear.
    #[test]
    fn unusable_spread_degrades_to_a_single_page() {
        let broken = Page {
            volume: VolumeId(1),
            chapter: ChapterId(1),
            number: PageId(3),
            // Wider than tall, but impossible to rotate or split.
            image: RgbaImage::new(1, 0),
        };
        let mut store = PageStore::new();
        store.push(tall_page(1, 1));
        store.push(broken);

        let output = split_spreads(store, &identity_table(), true, &NullProgress)
            .expect("stage must not fail on one bad page");

        assert_eq!(output.len(), 2);
        assert_eq!(numbers(&output), vec![1, 3]);
    }

    #[test]
    fn rotate_only_rotates_spreads_in_place() {
        let mut store = PageStore::new();
        store.push(spread_page(1, 2));
        store.push(tall_page(1, 1));

        let output = rotate_spreads(store, &NullProgress).expect("rotation succeeds");

        // Sorted into reading order, identifiers untouched.
        assert_eq!(numbers(&output), vec![1, 2]);
        let pages: Vec<&Page> = output.iter().collect();
        assert_eq!(pages[0].image.dimensions(), (4, 6));
        assert_eq!(pages[1].image.dimensions(), (4, 8));
    }

    #[test]
    fn rotate_only_leaves_unusable_spread_unchanged() {
        let broken = Page {
            volume: VolumeId(1),
            chapter: ChapterId(1),
            number: PageId(1),
            image: RgbaImage::new(1, 0),
        };
        let mut store = PageStore::new();
        store.push(broken);

        let output = rotate_spreads(store, &NullProgress)
            .expect("stage must not fail on one bad page");
        assert_eq!(output.len(), 1);
        let page = output.iter().next().expect("one page");
        assert_eq!(page.image.dimensions(), (1, 0));
        assert_eq!(page.number, PageId(1));
    }
}
