//! Structural-change notifications queued for views.

use crate::geometry::limits;
use crate::tree::NodeKey;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// One notification. Insert and remove brackets are always recorded as
/// adjacent begin/end pairs covering rows `first..=last` of `parent`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModelEvent {
    BeginInsert { parent: NodeKey, first: usize, last: usize },
    EndInsert,
    BeginRemove { parent: NodeKey, first: usize, last: usize },
    EndRemove,
    /// Object contents changed; views should redraw.
    Changed,
    /// Earlier events were discarded because nobody drained the log. Views
    /// must re-read the whole tree.
    Reset,
}

#[derive(Debug, Default)]
pub struct EventLog {
    pending: VecDeque<ModelEvent>,
    revision: u64,
    dropped: u64,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `event`.
    pub fn push(&mut self, event: ModelEvent) {
        self.record(&[event]);
    }

    pub(crate) fn insert_bracket(&mut self, parent: NodeKey, first: usize, last: usize) {
        self.record(&[ModelEvent::BeginInsert { parent, first, last }, ModelEvent::EndInsert]);
    }

    pub(crate) fn remove_bracket(&mut self, parent: NodeKey, first: usize, last: usize) {
        self.record(&[ModelEvent::BeginRemove { parent, first, last }, ModelEvent::EndRemove]);
    }

    /// Append `events` as one unit. If they do not fit in
    /// `MAX_PENDING_EVENTS`, everything pending is replaced by a single
    /// `Reset` first, so a bracket is never split.
    fn record(&mut self, events: &[ModelEvent]) {
        if self.pending.len() + events.len() > limits::MAX_PENDING_EVENTS {
            self.dropped += self.pending.len() as u64;
            self.pending.clear();
            self.pending.push_back(ModelEvent::Reset);
            log::warn!("event=events_reset module=events dropped={}", self.dropped);
        }
        self.pending.extend(events.iter().copied());
        self.revision += events.len() as u64;
    }

    pub fn take(&mut self) -> Vec<ModelEvent> {
        self.pending.drain(..).collect()
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Bumped once per recorded event; never decreases.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Events discarded by resets since the log was created.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}
