use std::collections::{BTreeMap, VecDeque};

use egui::Pos2;

mod debug;
mod geometry;
mod integrity;
mod kv_store;
mod memory_surface;
mod options;
mod persistence;
mod reconcile;
mod session;
mod surface;
mod types;

#[cfg(test)]
mod model_tests;

pub use geometry::find_insertion_anchor;
pub use kv_store::{FileStore, KeyValueStore, MemoryStore, StoreError};
pub use memory_surface::{ItemPlacement, MemoryItem, MemorySurface};
pub use options::DashboardOptions;
pub use persistence::{ICONS_STORAGE_KEY, LayoutStore, PersistedRecord, WIDGETS_STORAGE_KEY};
pub use reconcile::{ReconcileReport, reconcile, resolve_order};
pub use session::{DragRefusal, DragStart};
pub use surface::{ItemVisualState, LayoutSurface};
pub use types::{Collection, IconsRecord, ItemId, LayoutRecord, LayoutState, PinSet};

use session::{DragEnd, DragSession};

/// The dashboard layout engine: ordering, pinning, drag-and-drop and persistence for the widget
/// cards and the dock icons of one page.
///
/// The dashboard owns its [`LayoutState`] and the durable store it writes through. The host
/// surface is borrowed per call: wire its events to the methods below.
///
/// - Drag lifecycle: [`Self::drag_start`], [`Self::drag_over`], [`Self::drag_drop`],
///   [`Self::drag_end`]. Each collection runs its own drag session.
/// - Mode and pins: [`Self::toggle_pin`], [`Self::set_customize_mode`], [`Self::reset`].
///
/// No operation fails: store errors are logged and the in-memory state still advances.
#[derive(Debug)]
pub struct Dashboard<S> {
    /// Read on every operation, so changes (storage keys included) apply to the next write.
    pub options: DashboardOptions,

    store: S,

    state: LayoutState,

    widgets_drag: DragSession,
    icons_drag: DragSession,

    debug_log: VecDeque<String>,
    debug_event: u64,
    debug_last_integrity_hash: BTreeMap<Collection, u64>,
}

impl<S: KeyValueStore> Dashboard<S> {
    /// Create a dashboard from an explicit initial state, without touching the surface.
    ///
    /// Call [`Self::apply`] to show `state` on a surface.
    pub fn new(store: S, state: LayoutState, options: DashboardOptions) -> Self {
        Self {
            options,
            store,
            state,
            widgets_drag: DragSession::default(),
            icons_drag: DragSession::default(),
            debug_log: VecDeque::new(),
            debug_event: 0,
            debug_last_integrity_hash: BTreeMap::new(),
        }
    }

    /// Page load: read both persisted layouts (defaulting anything missing or malformed) and
    /// apply them to `surface`.
    pub fn load<L: LayoutSurface + ?Sized>(store: S, surface: &mut L, options: DashboardOptions) -> Self {
        let widgets_store: LayoutStore<LayoutRecord> =
            LayoutStore::new(options.storage_key(Collection::Widgets));
        let icons_store: LayoutStore<IconsRecord> = LayoutStore::new(options.storage_key(Collection::Icons));

        let state = LayoutState {
            widgets: widgets_store.load(&store, &surface.natural_order(Collection::Widgets)),
            icons: icons_store.load(&store, &surface.natural_order(Collection::Icons)),
        };

        let mut dashboard = Self::new(store, state, options);
        dashboard.debug_log_event(format!(
            "load widgets={} icons={} customize={}",
            dashboard.state.widgets.order.len(),
            dashboard.state.icons.order.len(),
            dashboard.state.customize()
        ));
        dashboard.apply(surface);
        dashboard
    }

    pub fn state(&self) -> &LayoutState {
        &self.state
    }

    pub fn customize_mode(&self) -> bool {
        self.state.customize()
    }

    pub fn is_pinned(&self, collection: Collection, id: &str) -> bool {
        self.state.is_pinned(collection, id)
    }

    /// The item currently being dragged in `collection`, if any.
    pub fn dragged(&self, collection: Collection) -> Option<&ItemId> {
        self.session(collection).dragged()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn session(&self, collection: Collection) -> &DragSession {
        match collection {
            Collection::Widgets => &self.widgets_drag,
            Collection::Icons => &self.icons_drag,
        }
    }

    fn session_mut(&mut self, collection: Collection) -> &mut DragSession {
        match collection {
            Collection::Widgets => &mut self.widgets_drag,
            Collection::Icons => &mut self.icons_drag,
        }
    }

    // ------------------------------------------------------------------------
    // Reconciliation + persistence

    /// Reconcile both collections and the page-level customize styling.
    ///
    /// Hosts call this after adding or removing items; the operations below call it as needed.
    pub fn apply<L: LayoutSurface + ?Sized>(&mut self, surface: &mut L) {
        for collection in Collection::ALL {
            self.reconcile_collection(surface, collection);
        }
        self.debug_check_integrity(&*surface, &Collection::ALL);
    }

    /// Reconcile one collection, then resync the page-level customize styling.
    fn reconcile_collection<L: LayoutSurface + ?Sized>(
        &self,
        surface: &mut L,
        collection: Collection,
    ) -> ReconcileReport {
        let report = reconcile(
            surface,
            collection,
            self.state.order(collection),
            self.state.pins(collection),
            self.state.customize(),
        );
        surface.set_customize_visual(self.state.customize());
        report
    }

    fn layout_store<R: PersistedRecord>(&self, collection: Collection) -> LayoutStore<R> {
        LayoutStore::new(self.options.storage_key(collection))
    }

    fn persist(&mut self, collection: Collection) {
        let result = match collection {
            Collection::Widgets => self
                .layout_store::<LayoutRecord>(collection)
                .save(&mut self.store, &self.state.widgets),
            Collection::Icons => self
                .layout_store::<IconsRecord>(collection)
                .save(&mut self.store, &self.state.icons),
        };
        if let Err(err) = result {
            log::warn!(
                "failed to save {collection} layout {:?}: {err}",
                self.options.storage_key(collection)
            );
            self.debug_log_event(format!("persist FAIL collection={collection} err={err}"));
        }
    }

    fn clear_persisted(&mut self, collection: Collection) {
        let result = match collection {
            Collection::Widgets => self
                .layout_store::<LayoutRecord>(collection)
                .reset(&mut self.store),
            Collection::Icons => self
                .layout_store::<IconsRecord>(collection)
                .reset(&mut self.store),
        };
        if let Err(err) = result {
            log::warn!(
                "failed to clear {collection} layout {:?}: {err}",
                self.options.storage_key(collection)
            );
            self.debug_log_event(format!("reset FAIL collection={collection} err={err}"));
        }
    }

    // ------------------------------------------------------------------------
    // Drag session controller

    /// A drag gesture started on `id`.
    ///
    /// On [`DragStart::Refused`] the host must cancel the native gesture.
    pub fn drag_start<L: LayoutSurface + ?Sized>(
        &mut self,
        surface: &mut L,
        collection: Collection,
        id: &ItemId,
    ) -> DragStart {
        let refusal = if !self.state.customize() {
            Some(DragRefusal::CustomizeOff)
        } else if self.state.is_pinned(collection, id.as_str()) {
            Some(DragRefusal::Pinned)
        } else if self.session(collection).is_dragging() {
            Some(DragRefusal::AlreadyDragging)
        } else if !surface.item_ids(collection).contains(id) {
            Some(DragRefusal::UnknownItem)
        } else {
            None
        };

        if let Some(refusal) = refusal {
            self.debug_log_event(format!(
                "drag_start refused collection={collection} item={id} reason={refusal}"
            ));
            return DragStart::Refused(refusal);
        }

        let message = self.session_mut(collection).start(id.clone());
        surface.set_dragging(collection, id, true);
        self.debug_log_event(format!("{message} collection={collection}"));
        DragStart::Started
    }

    /// The pointer moved over the container while dragging.
    ///
    /// Moves the dragged item before the item whose center is nearest to `pointer` (or to the
    /// end if it is the only item). The new order is only a preview until [`Self::drag_drop`].
    ///
    /// Returns `true` if the host should accept the container as a drop target.
    pub fn drag_over<L: LayoutSurface + ?Sized>(
        &mut self,
        surface: &mut L,
        collection: Collection,
        pointer: Pos2,
    ) -> bool {
        if !self.state.customize() {
            return false;
        }
        let Some(dragged) = self.session(collection).dragged().cloned() else {
            return false;
        };

        surface.set_drop_indicator(collection, true);

        let candidates: Vec<(ItemId, egui::Rect)> = surface
            .item_ids(collection)
            .into_iter()
            .filter(|id| *id != dragged)
            .filter_map(|id| {
                let rect = surface.item_rect(collection, &id)?;
                Some((id, rect))
            })
            .collect();

        let anchor = find_insertion_anchor(candidates.iter().map(|(_, rect)| *rect), pointer)
            .map(|index| &candidates[index].0);

        surface.move_before(collection, &dragged, anchor);
        self.session_mut(collection).record_move();
        true
    }

    /// The dragged item was dropped on the container: commit the live order.
    ///
    /// Returns `true` if an order was committed. A drop without an active drag only clears the
    /// drop indicator.
    pub fn drag_drop<L: LayoutSurface + ?Sized>(&mut self, surface: &mut L, collection: Collection) -> bool {
        surface.set_drop_indicator(collection, false);

        let Some((item, message)) = self.session_mut(collection).finish(DragEnd::Dropped) else {
            self.debug_log_event(format!("drop ignored collection={collection} (no active drag)"));
            return false;
        };
        surface.set_dragging(collection, &item, false);

        let order = surface.item_ids(collection);
        self.state.set_order(collection, order);
        self.persist(collection);

        self.debug_log_event(format!("{message} collection={collection}"));
        self.debug_check_integrity(&*surface, &[collection]);
        true
    }

    /// The drag gesture ended. Without a preceding drop this cancels the drag: nothing is
    /// persisted and the previewed order stays on screen until the next reconciliation.
    ///
    /// Returns `true` if a drag was cancelled.
    pub fn drag_end<L: LayoutSurface + ?Sized>(&mut self, surface: &mut L, collection: Collection) -> bool {
        surface.set_drop_indicator(collection, false);
        self.cancel_drag(surface, collection)
    }

    fn cancel_drag<L: LayoutSurface + ?Sized>(&mut self, surface: &mut L, collection: Collection) -> bool {
        let Some((item, message)) = self.session_mut(collection).finish(DragEnd::Cancelled) else {
            return false;
        };
        surface.set_dragging(collection, &item, false);
        surface.set_drop_indicator(collection, false);
        self.debug_log_event(format!("{message} collection={collection}"));
        true
    }

    // ------------------------------------------------------------------------
    // Mode & pin controller

    /// Flip the pin of `id`, persist, and reconcile `collection`.
    ///
    /// Returns the new pinned state, or `None` if `id` isn't a live item of `collection`.
    /// Pinning the item that is being dragged cancels that drag.
    pub fn toggle_pin<L: LayoutSurface + ?Sized>(
        &mut self,
        surface: &mut L,
        collection: Collection,
        id: &ItemId,
    ) -> Option<bool> {
        if !surface.item_ids(collection).contains(id) {
            self.debug_log_event(format!("toggle_pin ignored collection={collection} item={id} (not live)"));
            return None;
        }

        let pinned = self.state.pins_mut(collection).toggle(id);
        if pinned && self.session(collection).dragged() == Some(id) {
            self.cancel_drag(surface, collection);
        }
        self.persist(collection);
        self.reconcile_collection(surface, collection);

        self.debug_log_event(format!("toggle_pin collection={collection} item={id} pinned={pinned}"));
        self.debug_check_integrity(&*surface, &[collection]);
        Some(pinned)
    }

    /// Turn customize mode on or off for both collections.
    ///
    /// The flag is persisted with the widget layout. Turning it off cancels drags in flight.
    pub fn set_customize_mode<L: LayoutSurface + ?Sized>(&mut self, surface: &mut L, enabled: bool) {
        if !enabled {
            for collection in Collection::ALL {
                self.cancel_drag(surface, collection);
            }
        }

        self.state.widgets.customize = enabled;
        self.persist(Collection::Widgets);
        self.debug_log_event(format!("customize enabled={enabled}"));
        self.apply(surface);
    }

    /// Forget both persisted layouts and go back to the natural order with no pins and
    /// customize mode off. The fresh defaults are persisted right away.
    pub fn reset<L: LayoutSurface + ?Sized>(&mut self, surface: &mut L) {
        for collection in Collection::ALL {
            self.cancel_drag(surface, collection);
            self.clear_persisted(collection);
        }

        self.state = LayoutState {
            widgets: LayoutRecord::defaults(&surface.natural_order(Collection::Widgets)),
            icons: IconsRecord::defaults(&surface.natural_order(Collection::Icons)),
        };
        self.debug_log_event("reset layout to defaults");
        self.apply(surface);

        for collection in Collection::ALL {
            self.persist(collection);
        }
    }
}
