//! Client-side layout engine for a customizable dashboard page.
//!
//! A dashboard has two independently ordered collections of items: the widget cards and the dock
//! icons. Users reorder them by drag-and-drop while in customize mode, pin items in place, and
//! reset everything to the authored layout. Layouts persist in a string key-value store (the
//! browser's `localStorage`, a directory of JSON files, ...) and survive page reloads.
//!
//! The engine never owns the rendered page. Hosts implement [`LayoutSurface`] for their UI (or
//! use [`MemorySurface`]) and forward their drag/pin/mode events to [`Dashboard`].

#![forbid(unsafe_code)]

pub mod dashboard;
pub mod surface_builder;

pub use dashboard::{
    Collection, Dashboard, DashboardOptions, DragRefusal, DragStart, FileStore,
    ItemId, ItemPlacement, ItemVisualState, KeyValueStore, LayoutRecord, LayoutState,
    LayoutSurface, MemoryStore, MemorySurface, StoreError,
};
pub use surface_builder::SurfaceBuilder;
