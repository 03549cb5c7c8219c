use std::hash::{Hash as _, Hasher as _};

use itertools::Itertools as _;

use super::reconcile::resolve_order;
use super::surface::{ItemVisualState, LayoutSurface};
use super::types::{Collection, ItemId, PinSet};

/// Consistency problems between a collection's record and what the surface shows.
///
/// `settled` means no drag is in flight, so the live order must match the record.
pub(super) fn collection_integrity_issues<S: LayoutSurface + ?Sized>(
    surface: &S,
    collection: Collection,
    order: &[ItemId],
    pins: &PinSet,
    customize: bool,
    settled: bool,
) -> Vec<String> {
    let mut issues: Vec<String> = Vec::new();
    let live = surface.item_ids(collection);

    for id in live.iter().duplicates() {
        issues.push(format!("integrity: {collection} has duplicate live item {id}"));
    }
    for id in order.iter().duplicates() {
        issues.push(format!("integrity: {collection} order lists {id} more than once"));
    }

    if settled {
        let (expected, _report) = resolve_order(order, &live);
        if expected != live {
            issues.push(format!(
                "integrity: {collection} live order {live:?} != reconciled order {expected:?}"
            ));
        }
    }

    for id in &live {
        let Some(actual) = surface.item_state(collection, id) else {
            continue;
        };
        let expected = ItemVisualState::derive(pins.contains(id.as_str()), customize);
        if actual != expected {
            issues.push(format!(
                "integrity: {collection} item {id} state {actual:?} != expected {expected:?}"
            ));
        }
    }

    issues
}

pub(super) fn hash_issues(lines: &[String]) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    for line in lines {
        line.hash(&mut hasher);
    }
    hasher.finish()
}
