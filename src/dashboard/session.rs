use super::types::ItemId;

/// Why a drag start was rejected. The host should cancel the native gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragRefusal {
    /// Reordering is only allowed in customize mode.
    CustomizeOff,

    /// Pinned items stay where they are.
    Pinned,

    /// The id isn't a live item of the collection.
    UnknownItem,

    /// Another item of the same collection is already being dragged.
    AlreadyDragging,
}

impl std::fmt::Display for DragRefusal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::CustomizeOff => "customize mode is off",
            Self::Pinned => "item is pinned",
            Self::UnknownItem => "unknown item",
            Self::AlreadyDragging => "another drag is in progress",
        })
    }
}

/// Result of a drag start event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragStart {
    Started,
    Refused(DragRefusal),
}

impl DragStart {
    pub fn is_started(self) -> bool {
        matches!(self, Self::Started)
    }
}

/// How a drag session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum DragEnd {
    /// Dropped on the container: the live order was committed.
    Dropped,

    /// Released without a drop, or aborted: nothing was committed.
    Cancelled,
}

/// The per-collection `Idle -> Dragging -> Idle` state machine.
///
/// Only tracks *which* item is in flight; policy and surface updates live in
/// [`super::Dashboard`]. Methods return a line for the debug event log.
#[derive(Debug, Default)]
pub(super) struct DragSession {
    next_id: u64,
    active: Option<ActiveDrag>,
}

#[derive(Debug)]
struct ActiveDrag {
    id: u64,
    item: ItemId,
    moves: u64,
}

impl DragSession {
    pub(super) fn dragged(&self) -> Option<&ItemId> {
        self.active.as_ref().map(|active| &active.item)
    }

    pub(super) fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    /// `Idle -> Dragging`. The caller has already checked the start policy.
    pub(super) fn start(&mut self, item: ItemId) -> String {
        debug_assert!(self.active.is_none(), "drag session already active");
        let id = self.next_id.max(1);
        self.next_id = id.saturating_add(1);
        let message = format!("session START id={id} item={item}");
        self.active = Some(ActiveDrag { id, item, moves: 0 });
        message
    }

    /// Count one speculative reorder of the active drag.
    pub(super) fn record_move(&mut self) {
        if let Some(active) = &mut self.active {
            active.moves = active.moves.saturating_add(1);
        }
    }

    /// `Dragging -> Idle`. Returns the dragged item, or `None` if the session was idle.
    pub(super) fn finish(&mut self, end: DragEnd) -> Option<(ItemId, String)> {
        let ended = self.active.take()?;
        let message = format!(
            "session END id={} item={} end={end:?} moves={}",
            ended.id, ended.item, ended.moves
        );
        Some((ended.item, message))
    }
}
