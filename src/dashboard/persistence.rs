use serde_json::{Map, Value};

use super::kv_store::{KeyValueStore, StoreError};
use super::types::{IconsRecord, ItemId, LayoutRecord, PinSet};

/// Storage key of the widget layout.
pub const WIDGETS_STORAGE_KEY: &str = "fieldOpsDashboardV1";

/// Storage key of the dock icon layout.
pub const ICONS_STORAGE_KEY: &str = "fieldOpsDashboardIconsV1";

/// A record that can be rebuilt from an untrusted persisted JSON object.
///
/// Validation is per field: a bad field is replaced by its default, the other fields survive.
pub trait PersistedRecord: serde::Serialize + Sized {
    /// The record used when nothing (usable) is persisted.
    fn defaults(natural_order: &[ItemId]) -> Self;

    /// Rebuild from a parsed JSON object, defaulting every field that fails validation.
    fn from_json_object(object: &Map<String, Value>, natural_order: &[ItemId]) -> Self;
}

impl PersistedRecord for LayoutRecord {
    fn defaults(natural_order: &[ItemId]) -> Self {
        Self {
            order: natural_order.to_vec(),
            pinned: PinSet::new(),
            customize: false,
        }
    }

    fn from_json_object(object: &Map<String, Value>, natural_order: &[ItemId]) -> Self {
        Self {
            order: order_field(object, natural_order),
            pinned: pinned_field(object),
            customize: object.get("customize").is_some_and(is_truthy),
        }
    }
}

impl PersistedRecord for IconsRecord {
    fn defaults(natural_order: &[ItemId]) -> Self {
        Self {
            order: natural_order.to_vec(),
            pinned: PinSet::new(),
        }
    }

    fn from_json_object(object: &Map<String, Value>, natural_order: &[ItemId]) -> Self {
        Self {
            order: order_field(object, natural_order),
            pinned: pinned_field(object),
        }
    }
}

fn order_field(object: &Map<String, Value>, natural_order: &[ItemId]) -> Vec<ItemId> {
    let parsed = match object.get("order") {
        Some(Value::Array(entries)) => entries
            .iter()
            .map(|entry| entry.as_str().map(ItemId::from))
            .collect::<Option<Vec<_>>>(),
        _ => None,
    };

    parsed.unwrap_or_else(|| {
        log::debug!("persisted layout: invalid or missing `order`, using natural order");
        natural_order.to_vec()
    })
}

fn pinned_field(object: &Map<String, Value>) -> PinSet {
    match object.get("pinned") {
        Some(Value::Object(entries)) => entries
            .iter()
            .filter(|(_, pinned)| is_truthy(pinned))
            .map(|(id, _)| ItemId::from(id.as_str()))
            .collect(),
        Some(Value::Null) | None => PinSet::new(),
        Some(_) => {
            log::debug!("persisted layout: `pinned` is not an object, ignoring it");
            PinSet::new()
        }
    }
}

/// Truthiness as the dashboard's browser client sees it.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Loads and saves one collection's record under a fixed storage key.
#[derive(Clone, Debug)]
pub struct LayoutStore<R> {
    key: String,
    _record: std::marker::PhantomData<R>,
}

impl<R: PersistedRecord> LayoutStore<R> {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            _record: std::marker::PhantomData,
        }
    }

    /// Read the persisted record, falling back to defaults derived from `natural_order`.
    ///
    /// Never fails: a missing entry, a storage error, invalid JSON or a value that isn't a JSON
    /// object all yield [`PersistedRecord::defaults`]. A valid object with bad fields keeps its
    /// good fields.
    pub fn load<S: KeyValueStore + ?Sized>(&self, store: &S, natural_order: &[ItemId]) -> R {
        let raw = match store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return R::defaults(natural_order),
            Err(err) => {
                log::warn!("failed to read layout {:?}: {err}", self.key);
                return R::defaults(natural_order);
            }
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(object)) => R::from_json_object(&object, natural_order),
            Ok(other) => {
                log::debug!(
                    "persisted layout {:?} is not an object ({}), using defaults",
                    self.key,
                    json_kind(&other)
                );
                R::defaults(natural_order)
            }
            Err(err) => {
                log::debug!("persisted layout {:?} is not valid JSON: {err}", self.key);
                R::defaults(natural_order)
            }
        }
    }

    /// Serialize `record` and overwrite the persisted value.
    ///
    /// # Errors
    /// If serialization or the store write fails.
    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S, record: &R) -> Result<(), StoreError> {
        let json = serde_json::to_string(record)?;
        store.set(&self.key, &json)
    }

    /// Remove the persisted value; the next [`Self::load`] returns defaults.
    ///
    /// # Errors
    /// If the store write fails.
    pub fn reset<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<(), StoreError> {
        store.remove(&self.key)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
