use egui::{Pos2, Rect, Vec2};

use crate::dashboard::{Collection, ItemId, ItemPlacement, MemorySurface};

/// A small convenience builder for an in-memory dashboard page.
///
/// Lays widgets out as a wrapping grid and dock icons as a single row by default, which is what
/// the dashboard page does with CSS. For anything else, use [`MemorySurface`] directly.
pub struct SurfaceBuilder<T> {
    surface: MemorySurface<T>,
}

impl<T> Default for SurfaceBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SurfaceBuilder<T> {
    pub fn new() -> Self {
        let mut surface = MemorySurface::new();
        surface.set_placement(
            Collection::Icons,
            ItemPlacement::row(Pos2::new(0.0, 720.0), Vec2::splat(48.0), 8.0),
        );
        Self { surface }
    }

    /// Lay the widgets out in a grid of `columns` cells of size `cell`, separated by `gap`.
    pub fn widget_grid(&mut self, columns: usize, cell: Vec2, gap: f32) -> &mut Self {
        debug_assert!(columns > 0, "a widget grid needs at least one column");
        self.surface.set_placement(
            Collection::Widgets,
            ItemPlacement::Grid {
                origin: Pos2::ZERO,
                columns,
                cell,
                gap: Vec2::splat(gap),
            },
        );
        self
    }

    /// Lay the dock icons out in one row starting at `origin`.
    pub fn icon_row(&mut self, origin: Pos2, size: Vec2, spacing: f32) -> &mut Self {
        self.surface
            .set_placement(Collection::Icons, ItemPlacement::row(origin, size, spacing));
        self
    }

    /// Append a widget card.
    #[must_use]
    pub fn widget(&mut self, id: impl Into<ItemId>, content: T) -> ItemId {
        self.insert(Collection::Widgets, id.into(), content, None)
    }

    /// Append a dock icon.
    #[must_use]
    pub fn icon(&mut self, id: impl Into<ItemId>, content: T) -> ItemId {
        self.insert(Collection::Icons, id.into(), content, None)
    }

    /// Append an item that keeps `rect` no matter where it moves in the order.
    ///
    /// Switches the collection to [`ItemPlacement::Fixed`].
    #[must_use]
    pub fn fixed(&mut self, collection: Collection, id: impl Into<ItemId>, content: T, rect: Rect) -> ItemId {
        if self.surface.placement(collection) != ItemPlacement::Fixed {
            self.surface.set_placement(collection, ItemPlacement::Fixed);
        }
        self.insert(collection, id.into(), content, Some(rect))
    }

    fn insert(&mut self, collection: Collection, id: ItemId, content: T, rect: Option<Rect>) -> ItemId {
        let inserted = self.surface.push_with_rect(
            collection,
            id.clone(),
            content,
            rect.unwrap_or(Rect::NOTHING),
        );
        debug_assert!(inserted, "duplicate {collection} id {id}");
        id
    }

    /// Finish building, producing the surface.
    pub fn build(self) -> MemorySurface<T> {
        self.surface
    }
}
