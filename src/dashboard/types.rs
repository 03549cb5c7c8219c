use std::collections::BTreeSet;

/// One of the two independently ordered and pinned item sets of a dashboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Collection {
    /// Draggable widget cards.
    Widgets,

    /// Dock icons.
    Icons,
}

impl Collection {
    pub const ALL: [Self; 2] = [Self::Widgets, Self::Icons];

    pub fn label(self) -> &'static str {
        match self {
            Self::Widgets => "widgets",
            Self::Icons => "icons",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Stable identifier of a positionable item, supplied by the host surface.
///
/// Ids are unique within their [`Collection`]. The layout engine never invents them.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::borrow::Borrow<str> for ItemId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The set of pinned items of one collection.
///
/// Persisted as a JSON object mapping each pinned id to `true`. Entries for items that are not
/// currently live are kept: they are ignored until the item shows up again.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PinSet(BTreeSet<ItemId>);

impl PinSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains(id)
    }

    pub fn insert(&mut self, id: ItemId) -> bool {
        self.0.insert(id)
    }

    pub fn remove(&mut self, id: &str) -> bool {
        self.0.remove(id)
    }

    /// Flip membership of `id`, returning the new pinned state.
    pub fn toggle(&mut self, id: &ItemId) -> bool {
        if self.0.remove(id.as_str()) {
            false
        } else {
            self.0.insert(id.clone());
            true
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemId> + '_ {
        self.0.iter()
    }
}

impl FromIterator<ItemId> for PinSet {
    fn from_iter<I: IntoIterator<Item = ItemId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a PinSet {
    type Item = &'a ItemId;
    type IntoIter = std::collections::btree_set::Iter<'a, ItemId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl serde::Serialize for PinSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|id| (id, true)))
    }
}

/// Persisted layout of the widget collection, including the shared customize flag.
///
/// Wire shape: `{"order": [...], "pinned": {...}, "customize": false}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct LayoutRecord {
    pub order: Vec<ItemId>,
    pub pinned: PinSet,
    pub customize: bool,
}

/// Persisted layout of the dock icons.
///
/// Wire shape: `{"order": [...], "pinned": {...}}`. Icons have no customize flag of their own,
/// they follow [`LayoutRecord::customize`].
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct IconsRecord {
    pub order: Vec<ItemId>,
    pub pinned: PinSet,
}

/// The whole in-memory layout state of a dashboard.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LayoutState {
    pub widgets: LayoutRecord,
    pub icons: IconsRecord,
}

impl LayoutState {
    pub fn customize(&self) -> bool {
        self.widgets.customize
    }

    pub fn order(&self, collection: Collection) -> &[ItemId] {
        match collection {
            Collection::Widgets => &self.widgets.order,
            Collection::Icons => &self.icons.order,
        }
    }

    pub fn set_order(&mut self, collection: Collection, order: Vec<ItemId>) {
        match collection {
            Collection::Widgets => self.widgets.order = order,
            Collection::Icons => self.icons.order = order,
        }
    }

    pub fn pins(&self, collection: Collection) -> &PinSet {
        match collection {
            Collection::Widgets => &self.widgets.pinned,
            Collection::Icons => &self.icons.pinned,
        }
    }

    pub fn pins_mut(&mut self, collection: Collection) -> &mut PinSet {
        match collection {
            Collection::Widgets => &mut self.widgets.pinned,
            Collection::Icons => &mut self.icons.pinned,
        }
    }

    pub fn is_pinned(&self, collection: Collection, id: &str) -> bool {
        self.pins(collection).contains(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_twice_restores_membership() {
        let mut pins: PinSet = [ItemId::from("a")].into_iter().collect();
        let original = pins.clone();

        assert!(pins.toggle(&ItemId::from("b")));
        assert!(!pins.toggle(&ItemId::from("b")));
        assert_eq!(pins, original);

        assert!(!pins.toggle(&ItemId::from("a")));
        assert!(pins.toggle(&ItemId::from("a")));
        assert_eq!(pins, original);
    }

    #[test]
    fn widgets_record_serializes_to_wire_shape() {
        let record = LayoutRecord {
            order: vec!["id1".into(), "id2".into()],
            pinned: [ItemId::from("id1")].into_iter().collect(),
            customize: false,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"order":["id1","id2"],"pinned":{"id1":true},"customize":false}"#
        );
    }

    #[test]
    fn icons_record_serializes_to_wire_shape() {
        let record = IconsRecord {
            order: vec!["iconA".into(), "iconB".into()],
            pinned: [ItemId::from("iconA")].into_iter().collect(),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"order":["iconA","iconB"],"pinned":{"iconA":true}}"#);
    }
}
