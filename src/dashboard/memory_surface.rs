use egui::{Pos2, Rect, Vec2};

use super::surface::{ItemVisualState, LayoutSurface};
use super::types::{Collection, ItemId};

/// How a [`MemorySurface`] container lays out its items.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ItemPlacement {
    /// Row-major grid: an item's rect follows from its position in the display order,
    /// like a CSS grid. Moving an item moves the items after it.
    Grid {
        origin: Pos2,
        columns: usize,
        cell: Vec2,
        gap: Vec2,
    },

    /// Every item keeps the rect it was inserted with, regardless of order.
    Fixed,
}

impl Default for ItemPlacement {
    fn default() -> Self {
        Self::Grid {
            origin: Pos2::ZERO,
            columns: 4,
            cell: Vec2::new(200.0, 150.0),
            gap: Vec2::splat(16.0),
        }
    }
}

impl ItemPlacement {
    /// A single horizontal row of `size` cells, `spacing` apart.
    pub fn row(origin: Pos2, size: Vec2, spacing: f32) -> Self {
        Self::Grid {
            origin,
            columns: usize::MAX,
            cell: size,
            gap: Vec2::new(spacing, 0.0),
        }
    }

    fn rect_at(self, index: usize, fixed: Rect) -> Rect {
        match self {
            Self::Grid {
                origin,
                columns,
                cell,
                gap,
            } => {
                let columns = columns.max(1);
                let col = (index % columns) as f32;
                let row = (index / columns) as f32;
                let min = origin + Vec2::new(col * (cell.x + gap.x), row * (cell.y + gap.y));
                Rect::from_min_size(min, cell)
            }
            Self::Fixed => fixed,
        }
    }
}

/// A live item held by a [`MemorySurface`].
#[derive(Clone, Debug)]
pub struct MemoryItem<T> {
    pub id: ItemId,
    pub content: T,
    pub state: ItemVisualState,
    pub dragging: bool,
    fixed_rect: Rect,
}

#[derive(Clone, Debug)]
struct MemoryContainer<T> {
    items: Vec<MemoryItem<T>>,
    natural: Vec<ItemId>,
    placement: ItemPlacement,
    drop_indicator: bool,
}

impl<T> Default for MemoryContainer<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            natural: Vec::new(),
            placement: ItemPlacement::default(),
            drop_indicator: false,
        }
    }
}

impl<T> MemoryContainer<T> {
    fn position(&self, id: &ItemId) -> Option<usize> {
        self.items.iter().position(|item| &item.id == id)
    }
}

/// An in-memory host surface: an items-by-id model of the dashboard page.
///
/// Useful for tests, for headless tools, and as the model behind an immediate-mode UI that
/// renders the items in [`Self::items`] order every frame.
///
/// [`Self::revision`] counts the changes that actually altered the surface, so callers can tell
/// whether an operation had any observable effect.
#[derive(Clone, Debug)]
pub struct MemorySurface<T = ()> {
    widgets: MemoryContainer<T>,
    icons: MemoryContainer<T>,
    customize_visual: bool,
    revision: u64,
}

impl<T> Default for MemorySurface<T> {
    fn default() -> Self {
        Self {
            widgets: MemoryContainer::default(),
            icons: MemoryContainer::default(),
            customize_visual: false,
            revision: 0,
        }
    }
}

impl<T> MemorySurface<T> {
    pub fn new() -> Self {
        Self::default()
    }

    fn container(&self, collection: Collection) -> &MemoryContainer<T> {
        match collection {
            Collection::Widgets => &self.widgets,
            Collection::Icons => &self.icons,
        }
    }

    fn container_mut(&mut self, collection: Collection) -> &mut MemoryContainer<T> {
        match collection {
            Collection::Widgets => &mut self.widgets,
            Collection::Icons => &mut self.icons,
        }
    }

    pub fn set_placement(&mut self, collection: Collection, placement: ItemPlacement) {
        self.container_mut(collection).placement = placement;
        self.revision += 1;
    }

    pub fn placement(&self, collection: Collection) -> ItemPlacement {
        self.container(collection).placement
    }

    /// Append an item at the end of both the display and the natural order.
    ///
    /// Returns `false` (and changes nothing) if the id is already present.
    pub fn push(&mut self, collection: Collection, id: impl Into<ItemId>, content: T) -> bool {
        self.push_with_rect(collection, id, content, Rect::NOTHING)
    }

    /// Like [`Self::push`], with the rect used under [`ItemPlacement::Fixed`].
    pub fn push_with_rect(
        &mut self,
        collection: Collection,
        id: impl Into<ItemId>,
        content: T,
        rect: Rect,
    ) -> bool {
        let id = id.into();
        let container = self.container_mut(collection);
        if container.position(&id).is_some() {
            return false;
        }
        container.natural.push(id.clone());
        container.items.push(MemoryItem {
            id,
            content,
            state: ItemVisualState::default(),
            dragging: false,
            fixed_rect: rect,
        });
        self.revision += 1;
        true
    }

    /// Remove a live item, returning its content.
    pub fn remove(&mut self, collection: Collection, id: &ItemId) -> Option<T> {
        let container = self.container_mut(collection);
        let index = container.position(id)?;
        container.natural.retain(|natural| natural != id);
        let item = container.items.remove(index);
        self.revision += 1;
        Some(item.content)
    }

    pub fn items(&self, collection: Collection) -> &[MemoryItem<T>] {
        &self.container(collection).items
    }

    pub fn item(&self, collection: Collection, id: &str) -> Option<&MemoryItem<T>> {
        self.items(collection).iter().find(|item| item.id.as_str() == id)
    }

    pub fn content_mut(&mut self, collection: Collection, id: &str) -> Option<&mut T> {
        self.container_mut(collection)
            .items
            .iter_mut()
            .find(|item| item.id.as_str() == id)
            .map(|item| &mut item.content)
    }

    pub fn drop_indicator(&self, collection: Collection) -> bool {
        self.container(collection).drop_indicator
    }

    pub fn customize_visual(&self) -> bool {
        self.customize_visual
    }

    /// Number of observable changes made to this surface so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

impl<T> LayoutSurface for MemorySurface<T> {
    fn item_ids(&self, collection: Collection) -> Vec<ItemId> {
        self.items(collection).iter().map(|item| item.id.clone()).collect()
    }

    fn natural_order(&self, collection: Collection) -> Vec<ItemId> {
        self.container(collection).natural.clone()
    }

    fn item_rect(&self, collection: Collection, id: &ItemId) -> Option<Rect> {
        let container = self.container(collection);
        let index = container.position(id)?;
        let rect = container
            .placement
            .rect_at(index, container.items[index].fixed_rect);
        rect.is_positive().then_some(rect)
    }

    fn move_before(&mut self, collection: Collection, id: &ItemId, anchor: Option<&ItemId>) {
        if anchor == Some(id) {
            return;
        }
        let container = self.container_mut(collection);
        let Some(from) = container.position(id) else {
            return;
        };

        let target = match anchor {
            Some(anchor) => {
                let Some(anchor_index) = container.position(anchor) else {
                    return;
                };
                if anchor_index == from + 1 {
                    return;
                }
                if anchor_index > from {
                    anchor_index - 1
                } else {
                    anchor_index
                }
            }
            None => {
                if from + 1 == container.items.len() {
                    return;
                }
                container.items.len() - 1
            }
        };

        let item = container.items.remove(from);
        container.items.insert(target, item);
        self.revision += 1;
    }

    fn item_state(&self, collection: Collection, id: &ItemId) -> Option<ItemVisualState> {
        self.item(collection, id.as_str()).map(|item| item.state)
    }

    fn set_item_state(&mut self, collection: Collection, id: &ItemId, state: ItemVisualState) {
        let container = self.container_mut(collection);
        let Some(index) = container.position(id) else {
            return;
        };
        let item = &mut container.items[index];
        if item.state != state {
            item.state = state;
            self.revision += 1;
        }
    }

    fn set_dragging(&mut self, collection: Collection, id: &ItemId, dragging: bool) {
        let container = self.container_mut(collection);
        let Some(index) = container.position(id) else {
            return;
        };
        let item = &mut container.items[index];
        if item.dragging != dragging {
            item.dragging = dragging;
            self.revision += 1;
        }
    }

    fn set_drop_indicator(&mut self, collection: Collection, visible: bool) {
        let container = self.container_mut(collection);
        if container.drop_indicator != visible {
            container.drop_indicator = visible;
            self.revision += 1;
        }
    }

    fn set_customize_visual(&mut self, enabled: bool) {
        if self.customize_visual != enabled {
            self.customize_visual = enabled;
            self.revision += 1;
        }
    }
}
