//! Region order normalization.
//!
//! The create/update request carries regions in the order the user declared
//! them, but the API answers with the enabled-region links in whatever order
//! it likes. The functions here rebuild the user's order:
//!
//! 1. Extract each region id from its link target.
//! 2. Emit ids in `declared` order, skipping ids the remote side did not confirm.
//! 3. Append ids the remote side confirmed but the user never declared, in
//!    remote order, so out-of-band additions stay visible.

use crate::error::NormalizeError;
use crate::links::{with_rel, Link, REL_REGIONS};

/// Reorder `actual` to follow `preferred`.
///
/// Elements of `actual` found in `preferred` come first, in `preferred`
/// order; the rest follow in their original relative order. The output is
/// always a permutation of `actual`.
pub fn order_by_preference<T>(preferred: &[T], actual: Vec<T>) -> Vec<T>
where
    T: PartialEq,
{
    let mut remaining: Vec<Option<T>> = actual.into_iter().map(Some).collect();
    let mut ordered = Vec::with_capacity(remaining.len());

    for wanted in preferred {
        let hit = remaining
            .iter_mut()
            .find(|slot| slot.as_ref() == Some(wanted))
            .and_then(Option::take);
        if let Some(item) = hit {
            ordered.push(item);
        }
    }
    ordered.extend(remaining.into_iter().flatten());
    ordered
}

/// Region ids confirmed by `region_links`, ordered to follow `declared`.
///
/// Fails with [`NormalizeError::MalformedLink`] as soon as one link target
/// carries no identifier; no partial result is returned.
pub fn normalize_region_ids(
    declared: &[String],
    region_links: &[Link],
) -> Result<Vec<String>, NormalizeError> {
    let remote = region_links
        .iter()
        .map(|link| link.target_id().map(str::to_owned))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(order_by_preference(declared, remote))
}

/// [`normalize_region_ids`] over the `regions` relation of a full link list.
pub fn normalize_from_links(declared: &[String], links: &[Link]) -> Result<Vec<String>, NormalizeError> {
    let region_links: Vec<Link> = with_rel(links, REL_REGIONS).cloned().collect();
    normalize_region_ids(declared, &region_links)
}
