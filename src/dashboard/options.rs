use super::persistence::{ICONS_STORAGE_KEY, WIDGETS_STORAGE_KEY};
use super::types::Collection;

/// Options for [`super::Dashboard`].
///
/// Deserializable so a host can keep them next to its own settings; missing fields take their
/// defaults.
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct DashboardOptions {
    /// Storage key of the widget layout (order, pins and the customize flag).
    ///
    /// Changing it orphans previously saved layouts, so only do it together with a migration.
    pub widgets_storage_key: String,

    /// Storage key of the dock icon layout (order and pins).
    pub icons_storage_key: String,

    /// If true, record drag/pin/mode events in a small ring buffer (see
    /// [`super::Dashboard::debug_log_text`]).
    pub debug_event_log: bool,

    /// Maximum number of debug log lines to keep (ring buffer).
    pub debug_event_log_capacity: usize,

    /// If true, check surface/record consistency after every mutation and log issues.
    pub debug_integrity: bool,

    /// If true, panic on integrity issues (debug-only).
    pub debug_integrity_panic: bool,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            widgets_storage_key: WIDGETS_STORAGE_KEY.to_owned(),
            icons_storage_key: ICONS_STORAGE_KEY.to_owned(),
            debug_event_log: false,
            debug_event_log_capacity: 200,
            debug_integrity: false,
            debug_integrity_panic: false,
        }
    }
}

impl DashboardOptions {
    pub fn storage_key(&self, collection: Collection) -> &str {
        match collection {
            Collection::Widgets => &self.widgets_storage_key,
            Collection::Icons => &self.icons_storage_key,
        }
    }
}
