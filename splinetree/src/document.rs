//! The document: object tree, id allocator, selection and event log behind
//! one mutation entry point.

use crate::codec::{self, Registry};
use crate::config::DocumentConfig;
use crate::error::{CodecError, Result, TreeError};
use crate::events::{EventLog, ModelEvent};
use crate::geometry::limits;
use crate::ids::IdAllocator;
use crate::model::{Bounds, ObjectId};
use crate::objects::Object;
use crate::paint::Painter;
use crate::selection::SelectionModel;
use crate::tree::{NodeKey, ObjectTree, Subtree};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A row in the tree as seen by views. `row` is the position at the time
/// the handle was made; the object itself is identified by `node`, so a
/// handle survives sibling moves but not the removal of its object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Handle {
    pub row: usize,
    pub column: usize,
    pub node: NodeKey,
}

#[derive(Debug)]
pub struct Document {
    pub(crate) tree: ObjectTree,
    pub(crate) ids: IdAllocator,
    pub(crate) selection: SelectionModel,
    pub(crate) events: EventLog,
    pub(crate) config: DocumentConfig,
    pub(crate) registry: Registry,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Document {
            tree: ObjectTree::new(),
            ids: IdAllocator::new(),
            selection: SelectionModel::new(),
            events: EventLog::new(),
            config: DocumentConfig::default(),
            registry: Registry::default(),
        }
    }

    pub fn with_config(config: DocumentConfig) -> Result<Self> {
        config.validate()?;
        Ok(Document { config, ..Self::new() })
    }

    /// Decode a saved document using the built-in kinds.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut doc = Self::new();
        doc.load(bytes)?;
        doc.events.take();
        Ok(doc)
    }

    pub fn config(&self) -> &DocumentConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: DocumentConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Register additional kinds before loading streams that use them.
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn tree(&self) -> &ObjectTree {
        &self.tree
    }

    pub fn ids(&self) -> &IdAllocator {
        &self.ids
    }

    /// Objects below the root.
    pub fn object_count(&self) -> usize {
        self.tree.len() - 1
    }

    // ---- handles ----

    /// Current handle for a live non-root node.
    pub fn handle_for(&self, key: NodeKey) -> Option<Handle> {
        let row = self.tree.row(key)?;
        Some(Handle { row, column: 0, node: key })
    }

    pub fn find(&self, id: ObjectId) -> Option<Handle> {
        self.tree.find_by_id(id).and_then(|k| self.handle_for(k))
    }

    pub fn resolve(&self, handle: Handle) -> Result<NodeKey, TreeError> {
        if self.tree.contains(handle.node) {
            Ok(handle.node)
        } else {
            Err(TreeError::StaleHandle(handle.node))
        }
    }

    /// `None` addresses the root.
    pub fn resolve_parent(&self, parent: Option<Handle>) -> Result<NodeKey, TreeError> {
        match parent {
            None => Ok(self.tree.root()),
            Some(h) => self.resolve(h),
        }
    }

    pub fn id_of(&self, handle: Handle) -> Option<ObjectId> {
        self.tree.get(handle.node).map(|n| n.id())
    }

    pub fn object(&self, handle: Handle) -> Option<&dyn Object> {
        self.tree.get(handle.node).map(|n| n.object())
    }

    pub fn children(&self, parent: Option<Handle>) -> Vec<Handle> {
        let Ok(key) = self.resolve_parent(parent) else { return Vec::new() };
        self.tree
            .children(key)
            .iter()
            .enumerate()
            .map(|(row, node)| Handle { row, column: 0, node: *node })
            .collect()
    }

    // ---- structure ----

    /// Append `object` as the last child of the root with a fresh id.
    pub fn add_object<O: Object + 'static>(&mut self, object: O) -> Handle {
        self.add_named("", object)
    }

    /// Names longer than `MAX_STRING_BYTES` are cut at a char boundary.
    pub fn add_named<O: Object + 'static>(&mut self, name: &str, object: O) -> Handle {
        let root = self.tree.root();
        let row = self.tree.children(root).len();
        let id = self.ids.allocate();
        let name = if name.is_empty() && self.config.auto_name {
            format!("{} {}", object.kind(), id.0)
        } else {
            limits::truncate_str(name).to_owned()
        };
        let sub = Subtree { id: Some(id), name, object: Box::new(object), children: Vec::new() };
        let key = self.tree.attach(root, row, sub, &mut |id| id.unwrap_or(ObjectId::ROOT));
        log::debug!("event=add_object module=document id={} row={}", id.0, row);
        self.events.insert_bracket(root, row, row);
        self.events.push(ModelEvent::Changed);
        self.check();
        Handle { row, column: 0, node: key }
    }

    /// Remove a non-root object and its subtree. Ids are released in
    /// pre-order.
    pub fn remove_object(&mut self, handle: Handle) -> Result<()> {
        let key = self.resolve(handle)?;
        if key == self.tree.root() {
            return Err(TreeError::RootNotRemovable.into());
        }
        self.remove_key(key);
        self.events.push(ModelEvent::Changed);
        self.check();
        Ok(())
    }

    /// Detach `key`, free its ids and record the remove bracket. The caller
    /// records `Changed`.
    pub(crate) fn remove_key(&mut self, key: NodeKey) -> bool {
        let (Some(parent), Some(row)) = (self.tree.parent(key), self.tree.row(key)) else {
            return false;
        };
        let Some(sub) = self.tree.detach(key) else { return false };
        for id in sub.ids() {
            self.ids.free(id);
        }
        self.selection.prune(&self.tree);
        log::debug!("event=remove_object module=document objects={} row={}", sub.object_count(), row);
        self.events.remove_bracket(parent, row, row);
        true
    }

    /// Insert `objects` as children of `parent` starting at `position`.
    /// Carried ids are kept unless already live. Records one insert
    /// bracket over the new rows. Fails with `LimitExceeded`, inserting
    /// nothing, if the result could not be saved and loaded back.
    pub fn insert_rows(&mut self, position: usize, parent: Option<Handle>, objects: Vec<Subtree>) -> Result<Vec<Handle>> {
        let parent = self.resolve_parent(parent)?;
        let keys = self.insert_at(parent, position, objects)?;
        Ok(keys.into_iter().filter_map(|k| self.handle_for(k)).collect())
    }

    pub(crate) fn insert_at(&mut self, parent: NodeKey, position: usize, objects: Vec<Subtree>) -> Result<Vec<NodeKey>, TreeError> {
        let len = self.tree.children(parent).len();
        if position > len {
            return Err(TreeError::RowOutOfRange { row: position, len });
        }
        if objects.is_empty() {
            return Ok(Vec::new());
        }
        self.check_insert(parent, &objects)?;
        let count = objects.len();
        let ids = &mut self.ids;
        let mut keys = Vec::with_capacity(count);
        for (i, sub) in objects.into_iter().enumerate() {
            keys.push(self.tree.attach(parent, position + i, sub, &mut |id| ids.claim_or_allocate(id)));
        }
        log::debug!("event=insert_rows module=document first={} count={}", position, count);
        self.events.insert_bracket(parent, position, position + count - 1);
        self.events.push(ModelEvent::Changed);
        self.check();
        Ok(keys)
    }

    /// Reject insertions that would leave the document outside the limits
    /// the decoder enforces.
    pub(crate) fn check_insert(&self, parent: NodeKey, objects: &[Subtree]) -> Result<(), TreeError> {
        let depth = self.tree.depth(parent) + 1;
        let mut points = 0;
        for sub in objects {
            check_subtree(sub, depth, &mut points)?;
        }
        let added: usize = objects.iter().map(Subtree::object_count).sum();
        if self.tree.len() + added > limits::MAX_OBJECTS {
            return Err(TreeError::LimitExceeded("object count"));
        }
        if points > 0 && self.point_total() + points > limits::MAX_POINTS_TOTAL {
            return Err(TreeError::LimitExceeded("total points"));
        }
        Ok(())
    }

    fn point_total(&self) -> usize {
        self.tree
            .descendants(self.tree.root())
            .into_iter()
            .filter_map(|k| self.tree.get(k))
            .filter_map(|n| n.object().as_points())
            .map(|p| p.points().len())
            .sum()
    }

    /// Remove `count` children of `parent` starting at `position`. Returns
    /// false, removing nothing, unless the whole range exists.
    pub fn remove_rows(&mut self, position: usize, count: usize, parent: Option<Handle>) -> Result<bool> {
        let parent = self.resolve_parent(parent)?;
        let children = self.tree.children(parent);
        if count == 0 || position.checked_add(count).map_or(true, |end| end > children.len()) {
            return Ok(false);
        }
        let doomed: Vec<NodeKey> = children[position..position + count].to_vec();
        for key in doomed {
            if let Some(sub) = self.tree.detach(key) {
                for id in sub.ids() {
                    self.ids.free(id);
                }
            }
        }
        self.selection.prune(&self.tree);
        log::debug!("event=remove_rows module=document first={} count={}", position, count);
        self.events.remove_bracket(parent, position, position + count - 1);
        self.events.push(ModelEvent::Changed);
        self.check();
        Ok(true)
    }

    /// Apply `f` to the object behind `handle`; records `Changed` when `f`
    /// reports a change.
    pub fn edit<F>(&mut self, handle: Handle, f: F) -> Result<bool>
    where
        F: FnOnce(&mut dyn Object) -> bool,
    {
        let key = self.resolve(handle)?;
        let changed = match self.tree.get_mut(key) {
            Some(node) => f(node.object_mut()),
            None => false,
        };
        if changed {
            self.events.push(ModelEvent::Changed);
        }
        Ok(changed)
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.tree.bounds(self.tree.root())
    }

    // ---- persistence ----

    /// Encode the whole document. Objects added one at a time or points
    /// added through `edit` can push the totals past what a load accepts;
    /// such a document is refused here instead of producing bytes that
    /// would not load.
    pub fn save(&self) -> Result<Vec<u8>> {
        if self.tree.len() > limits::MAX_OBJECTS {
            return Err(CodecError::LimitExceeded("object count").into());
        }
        if self.point_total() > limits::MAX_POINTS_TOTAL {
            return Err(CodecError::LimitExceeded("total points").into());
        }
        let bytes = codec::encode_document(&self.tree);
        log::info!("event=save module=document objects={} bytes={}", self.object_count(), bytes.len());
        Ok(bytes)
    }

    /// Replace the contents with a decoded document. On any error the
    /// current contents are left as they were.
    pub fn load(&mut self, bytes: &[u8]) -> Result<()> {
        let decoded = codec::decode_document(bytes, &self.registry)?;
        let carried: Vec<ObjectId> = decoded.children.iter().flat_map(Subtree::ids).collect();
        IdAllocator::rebuild(carried).map_err(CodecError::DuplicateId)?;

        let root = self.tree.root();
        let old_rows = self.tree.children(root).len();
        for key in self.tree.children(root).to_vec() {
            self.tree.detach(key);
        }
        self.selection.clear();
        self.ids = IdAllocator::new();
        if old_rows > 0 {
            self.events.remove_bracket(root, 0, old_rows - 1);
        }

        self.tree.rename(root, &decoded.name);
        let new_rows = decoded.children.len();
        let ids = &mut self.ids;
        for (row, child) in decoded.children.into_iter().enumerate() {
            self.tree.attach(root, row, child, &mut |id| ids.claim_or_allocate(id));
        }
        if new_rows > 0 {
            self.events.insert_bracket(root, 0, new_rows - 1);
        }
        self.events.push(ModelEvent::Changed);
        log::info!("event=load module=document objects={} bytes={}", self.object_count(), bytes.len());
        self.check();
        Ok(())
    }

    // ---- rendering and observers ----

    /// Draw every object below the root in pre-order.
    pub fn draw(&self, painter: &mut dyn Painter) {
        let root = self.tree.root();
        for key in self.tree.descendants(root) {
            if key == root {
                continue;
            }
            if let Some(node) = self.tree.get(key) {
                painter.begin_object(node.id(), node.kind());
                node.object().draw(painter);
                painter.end_object();
            }
        }
    }

    pub fn take_events(&mut self) -> Vec<ModelEvent> {
        self.events.take()
    }

    pub fn revision(&self) -> u64 {
        self.events.revision()
    }

    pub fn to_json_value(&self) -> serde_json::Value {
        crate::json::to_json_impl(self)
    }

    /// Structural consistency: parent links match child lists, ids are
    /// unique, live in the allocator and never the root id below the root.
    pub fn check_invariants(&self) -> bool {
        let root = self.tree.root();
        let mut seen = HashSet::new();
        for key in self.tree.descendants(root) {
            let Some(node) = self.tree.get(key) else { return false };
            for child in node.children() {
                if self.tree.parent(*child) != Some(key) {
                    return false;
                }
            }
            if key == root {
                if node.id() != ObjectId::ROOT || node.parent().is_some() {
                    return false;
                }
                continue;
            }
            if node.id() == ObjectId::ROOT || !self.ids.is_live(node.id()) || !seen.insert(node.id()) {
                return false;
            }
        }
        seen.len() == self.ids.live_count() && seen.len() == self.object_count()
    }

    #[cfg(feature = "strict-invariants")]
    fn check(&self) {
        assert!(self.check_invariants(), "document invariants violated");
    }

    #[cfg(not(feature = "strict-invariants"))]
    #[inline(always)]
    fn check(&self) {}
}

fn check_subtree(sub: &Subtree, depth: usize, points: &mut usize) -> Result<(), TreeError> {
    if depth > limits::MAX_DEPTH {
        return Err(TreeError::LimitExceeded("nesting depth"));
    }
    if sub.name.len() > limits::MAX_STRING_BYTES {
        return Err(TreeError::LimitExceeded("name length"));
    }
    if let Some(p) = sub.object.as_points() {
        *points += p.points().len();
    }
    for child in &sub.children {
        check_subtree(child, depth + 1, points)?;
    }
    Ok(())
}
