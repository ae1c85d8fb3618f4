//! Position bookkeeping for the per-category slideshow on the detail view.
//!
//! The slide list is every image sharing the viewed image's category (or
//! every uncategorized image), newest first. These helpers find where the
//! viewed image sits in that list and which slides surround it.

use crate::types::DbId;

/// Index of `current` in `slide_ids`, or 0 when it is not present.
pub fn initial_index(slide_ids: &[DbId], current: DbId) -> usize {
    slide_ids.iter().position(|id| *id == current).unwrap_or(0)
}

/// Ids of the slides before and after `index`. No wrap-around.
pub fn neighbors(slide_ids: &[DbId], index: usize) -> (Option<DbId>, Option<DbId>) {
    let previous = index
        .checked_sub(1)
        .and_then(|i| slide_ids.get(i))
        .copied();
    let next = slide_ids.get(index + 1).copied();
    (previous, next)
}
