use egui::Rect;

use super::types::{Collection, ItemId};

/// Per-item interactive attributes derived by reconciliation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ItemVisualState {
    /// Show the item as pinned in place.
    pub pinned: bool,

    /// Whether the host should let the user start a drag on this item.
    pub draggable: bool,

    /// Pressed state (`aria-pressed`) of the item's pin control.
    pub pressed: bool,
}

impl ItemVisualState {
    pub fn derive(pinned: bool, customize: bool) -> Self {
        Self {
            pinned,
            draggable: customize && !pinned,
            pressed: pinned,
        }
    }
}

/// The rendering layer hosting the positionable items: a DOM, an immediate-mode UI, a test double.
///
/// The layout engine identifies items only by [`ItemId`] and never holds on to host objects.
/// Calls naming ids the host doesn't know about must be ignored.
pub trait LayoutSurface {
    /// Ids of the live items of `collection`, in display order.
    fn item_ids(&self, collection: Collection) -> Vec<ItemId>;

    /// The authored order of `collection`, used to build default layouts.
    ///
    /// Defaults to the live display order.
    fn natural_order(&self, collection: Collection) -> Vec<ItemId> {
        self.item_ids(collection)
    }

    /// Current bounding box of an item, if it is live and laid out.
    fn item_rect(&self, collection: Collection, id: &ItemId) -> Option<Rect>;

    /// Move `id` to just before `anchor`, or to the end if `anchor` is `None`.
    fn move_before(&mut self, collection: Collection, id: &ItemId, anchor: Option<&ItemId>);

    /// The attributes last applied to an item, for surfaces that can report them.
    fn item_state(&self, _collection: Collection, _id: &ItemId) -> Option<ItemVisualState> {
        None
    }

    fn set_item_state(&mut self, collection: Collection, id: &ItemId, state: ItemVisualState);

    /// Mark or unmark the item currently being dragged.
    fn set_dragging(&mut self, collection: Collection, id: &ItemId, dragging: bool);

    /// Show or hide the container-level drop indicator.
    fn set_drop_indicator(&mut self, collection: Collection, visible: bool);

    /// Page-level customize mode styling, including the state of the toggle control.
    fn set_customize_visual(&mut self, enabled: bool);
}
