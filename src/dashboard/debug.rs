use super::Dashboard;
use super::integrity;
use super::kv_store::KeyValueStore;
use super::surface::LayoutSurface;
use super::types::Collection;

impl<S: KeyValueStore> Dashboard<S> {
    /// Record a line in the debug event log (if enabled) and forward it to `log::debug!`.
    pub(super) fn debug_log_event(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::debug!("{message}");
        if !self.options.debug_event_log {
            return;
        }
        self.push_debug_log_line(message);
    }

    fn debug_integrity_log_event(&mut self, message: impl Into<String>) {
        if !self.options.debug_integrity {
            return;
        }
        let message = message.into();
        log::warn!("{message}");
        self.push_debug_log_line(message);
    }

    fn push_debug_log_line(&mut self, message: String) {
        self.debug_event = self.debug_event.wrapping_add(1);
        let cap = self.options.debug_event_log_capacity.clamp(1, 10_000);
        while self.debug_log.len() >= cap {
            self.debug_log.pop_front();
        }
        self.debug_log
            .push_back(format!("[event {}] {}", self.debug_event, message));
    }

    /// Forget all recorded debug log lines.
    pub fn debug_log_clear(&mut self) {
        self.debug_log.clear();
    }

    /// The recorded debug log, one event per line, oldest first.
    pub fn debug_log_text(&self) -> String {
        self.debug_log
            .iter()
            .cloned()
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Check the collections that were just reconciled or committed.
    ///
    /// A cancelled drag leaves its preview order on screen until the next reconciliation, so
    /// other collections aren't expected to match their record here.
    pub(super) fn debug_check_integrity<L: LayoutSurface + ?Sized>(
        &mut self,
        surface: &L,
        collections: &[Collection],
    ) {
        if !self.options.debug_integrity {
            return;
        }

        for &collection in collections {
            let issues = integrity::collection_integrity_issues(
                surface,
                collection,
                self.state.order(collection),
                self.state.pins(collection),
                self.state.customize(),
                !self.session(collection).is_dragging(),
            );
            let hash = integrity::hash_issues(&issues);
            self.debug_handle_integrity_result(collection, &issues, hash);
        }
    }

    fn debug_handle_integrity_result(&mut self, collection: Collection, issues: &[String], hash: u64) {
        let prev = self.debug_last_integrity_hash.insert(collection, hash);
        if prev == Some(hash) {
            return;
        }

        if issues.is_empty() {
            if prev.is_some() {
                self.debug_integrity_log_event(format!("integrity OK collection={collection}"));
            }
            return;
        }

        self.debug_integrity_log_event(format!(
            "integrity FAIL collection={collection} issues={}",
            issues.len()
        ));
        for issue in issues {
            self.debug_integrity_log_event(issue.clone());
        }

        if self.options.debug_integrity_panic && cfg!(debug_assertions) {
            panic!(
                "dashboard layout integrity failure collection={collection}\n{}",
                issues.join("\n")
            );
        }
    }
}
