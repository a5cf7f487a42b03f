//! Row/column view of the document for tree views.
//!
//! One column (the object name). A `None` parent handle stands for the root,
//! which is never itself a row.

use crate::document::{Document, Handle};
use crate::events::ModelEvent;
use crate::geometry::limits;
use crate::transfer::{DropAction, MIME_TYPE};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemFlags {
    pub enabled: bool,
    pub editable: bool,
    pub selectable: bool,
    pub drag_enabled: bool,
    pub drop_enabled: bool,
}

impl Document {
    pub fn row_count(&self, parent: Option<Handle>) -> usize {
        match self.resolve_parent(parent) {
            Ok(key) => self.tree.children(key).len(),
            Err(_) => 0,
        }
    }

    pub fn column_count(&self) -> usize {
        1
    }

    pub fn index(&self, row: usize, column: usize, parent: Option<Handle>) -> Option<Handle> {
        if column >= self.column_count() {
            return None;
        }
        let parent = self.resolve_parent(parent).ok()?;
        let node = self.tree.child(parent, row)?;
        Some(Handle { row, column, node })
    }

    /// Parent row of `handle`; `None` when the parent is the root or the
    /// handle is stale.
    pub fn parent(&self, handle: Handle) -> Option<Handle> {
        let parent = self.tree.parent(handle.node)?;
        if parent == self.tree.root() {
            return None;
        }
        self.handle_for(parent)
    }

    pub fn row(&self, handle: Handle) -> Option<usize> {
        self.tree.row(handle.node)
    }

    pub fn data(&self, handle: Handle) -> Option<&str> {
        if handle.column != 0 {
            return None;
        }
        self.tree.get(handle.node).map(|n| n.name())
    }

    /// Rename the object. Names longer than a stream can carry are refused.
    pub fn set_data(&mut self, handle: Handle, text: &str) -> bool {
        if handle.column != 0 || text.len() > limits::MAX_STRING_BYTES {
            return false;
        }
        if !self.tree.rename(handle.node, text) {
            return false;
        }
        self.events.push(ModelEvent::Changed);
        true
    }

    pub fn header_data(&self, section: usize) -> Option<&'static str> {
        (section == 0).then_some("Name")
    }

    pub fn flags(&self, handle: Option<Handle>) -> ItemFlags {
        let row = handle.map_or(false, |h| self.tree.contains(h.node) && h.node != self.tree.root());
        ItemFlags {
            enabled: true,
            editable: true,
            selectable: true,
            drag_enabled: row,
            drop_enabled: row,
        }
    }

    pub fn supported_drop_actions(&self) -> &'static [DropAction] {
        &[DropAction::Copy, DropAction::Move]
    }

    pub fn mime_types(&self) -> &'static [&'static str] {
        &[MIME_TYPE]
    }
}
