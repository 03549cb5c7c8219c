use itertools::Itertools as _;

use super::surface::{ItemVisualState, LayoutSurface};
use super::types::{Collection, ItemId, PinSet};

/// What a [`reconcile`] pass found and did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Persisted ids with no live item. They stay in the record.
    pub missing: Vec<ItemId>,

    /// Live ids the persisted order didn't know about, appended at the end.
    pub appended: Vec<ItemId>,

    /// Whether the live order had to change.
    pub reordered: bool,
}

/// The display order `order` implies for the live items `live`.
///
/// Known ids come first, in persisted order (first occurrence wins for duplicates). Live ids
/// the order doesn't mention follow in live order.
pub fn resolve_order(order: &[ItemId], live: &[ItemId]) -> (Vec<ItemId>, ReconcileReport) {
    let live_set: ahash::HashSet<&ItemId> = live.iter().collect();
    let known_set: ahash::HashSet<&ItemId> = order.iter().collect();

    let mut report = ReconcileReport::default();
    let mut resolved: Vec<ItemId> = Vec::with_capacity(live.len());

    for id in order.iter().unique() {
        if live_set.contains(id) {
            resolved.push(id.clone());
        } else {
            report.missing.push(id.clone());
        }
    }

    for id in live {
        if !known_set.contains(id) {
            resolved.push(id.clone());
            report.appended.push(id.clone());
        }
    }

    report.reordered = resolved != live;
    (resolved, report)
}

/// Apply a collection's persisted order and pins onto the live items of `surface`.
///
/// Idempotent: running it again with the same inputs changes nothing. It never persists
/// anything, and the page-level customize styling is left to the caller.
pub fn reconcile<S: LayoutSurface + ?Sized>(
    surface: &mut S,
    collection: Collection,
    order: &[ItemId],
    pins: &PinSet,
    customize: bool,
) -> ReconcileReport {
    let live = surface.item_ids(collection);
    let (resolved, report) = resolve_order(order, &live);

    if report.reordered {
        for id in &resolved {
            surface.move_before(collection, id, None);
        }
    }

    for id in &resolved {
        let state = ItemVisualState::derive(pins.contains(id.as_str()), customize);
        surface.set_item_state(collection, id, state);
    }

    if !report.missing.is_empty() || !report.appended.is_empty() {
        log::debug!(
            "reconcile {collection}: missing={:?} appended={:?}",
            report.missing,
            report.appended
        );
    }

    report
}
