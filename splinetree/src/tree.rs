//! Arena-backed object tree.
//!
//! Nodes live in generation-stamped slots. Parents own their children through
//! ordered key lists; the `parent` back-reference is a plain key, so there is
//! no ownership cycle. Removing a node bumps its slot generation, which makes
//! every outstanding [`NodeKey`] for it stale.

use crate::model::{union_bounds, Bounds, ObjectId};
use crate::objects::{Object, Root};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeKey {
    pub slot: u32,
    pub generation: u32,
}

#[derive(Debug)]
pub struct Node {
    id: ObjectId,
    name: String,
    parent: Option<NodeKey>,
    children: Vec<NodeKey>,
    object: Box<dyn Object>,
}

impl Node {
    pub fn id(&self) -> ObjectId {
        self.id
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn kind(&self) -> &'static str {
        self.object.kind()
    }
    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }
    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }
    pub fn object(&self) -> &dyn Object {
        self.object.as_ref()
    }
    pub fn object_mut(&mut self) -> &mut dyn Object {
        self.object.as_mut()
    }
}

/// A detached object with its descendants, not yet part of any tree.
///
/// Produced by decoding and by removal; consumed by insertion. `id` is `None`
/// for objects that were never assigned one.
#[derive(Clone, Debug)]
pub struct Subtree {
    pub id: Option<ObjectId>,
    pub name: String,
    pub object: Box<dyn Object>,
    pub children: Vec<Subtree>,
}

impl Subtree {
    pub fn new<O: Object + 'static>(object: O) -> Self {
        Self::from_boxed(Box::new(object))
    }

    pub fn from_boxed(object: Box<dyn Object>) -> Self {
        Subtree { id: None, name: String::new(), object, children: Vec::new() }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_child(mut self, child: Subtree) -> Self {
        self.children.push(child);
        self
    }

    pub fn kind(&self) -> &'static str {
        self.object.kind()
    }

    /// Number of objects in this subtree, itself included.
    pub fn object_count(&self) -> usize {
        1 + self.children.iter().map(Subtree::object_count).sum::<usize>()
    }

    /// Ids in pre-order, skipping unassigned ones.
    pub fn ids(&self) -> Vec<ObjectId> {
        let mut out = Vec::new();
        self.collect_ids(&mut out);
        out
    }

    fn collect_ids(&self, out: &mut Vec<ObjectId>) {
        out.extend(self.id);
        for c in &self.children {
            c.collect_ids(out);
        }
    }

    /// Forget every id so the subtree receives fresh ones on insertion.
    pub fn clear_ids(&mut self) {
        self.id = None;
        for c in &mut self.children {
            c.clear_ids();
        }
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

#[derive(Debug)]
pub struct ObjectTree {
    slots: Vec<Slot>,
    free_slots: Vec<u32>,
    root: NodeKey,
    len: usize,
}

impl Default for ObjectTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectTree {
    pub fn new() -> Self {
        Self::with_root(Subtree::new(Root).named("Root"), &mut |id| id.unwrap_or(ObjectId::ROOT))
    }

    /// Build a tree whose root is `root`'s object. The root itself always
    /// gets [`ObjectId::ROOT`]; descendants go through `resolve_id`.
    pub(crate) fn with_root(
        root: Subtree,
        resolve_id: &mut dyn FnMut(Option<ObjectId>) -> ObjectId,
    ) -> Self {
        let mut tree = ObjectTree { slots: Vec::new(), free_slots: Vec::new(), root: NodeKey { slot: 0, generation: 0 }, len: 0 };
        let Subtree { name, object, children, .. } = root;
        tree.root = tree.alloc(Node { id: ObjectId::ROOT, name, parent: None, children: Vec::new(), object });
        for child in children {
            let len = tree.children(tree.root).len();
            tree.attach(tree.root, len, child, resolve_id);
        }
        tree
    }

    fn alloc(&mut self, node: Node) -> NodeKey {
        self.len += 1;
        if let Some(slot) = self.free_slots.pop() {
            let s = &mut self.slots[slot as usize];
            s.node = Some(node);
            NodeKey { slot, generation: s.generation }
        } else {
            self.slots.push(Slot { generation: 0, node: Some(node) });
            NodeKey { slot: (self.slots.len() - 1) as u32, generation: 0 }
        }
    }

    fn release(&mut self, key: NodeKey) -> Option<Node> {
        let slot = self.slots.get_mut(key.slot as usize)?;
        if slot.generation != key.generation {
            return None;
        }
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free_slots.push(key.slot);
        self.len -= 1;
        Some(node)
    }

    pub fn root(&self) -> NodeKey {
        self.root
    }

    /// Live objects, root included.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len <= 1
    }

    pub fn get(&self, key: NodeKey) -> Option<&Node> {
        let slot = self.slots.get(key.slot as usize)?;
        if slot.generation != key.generation {
            return None;
        }
        slot.node.as_ref()
    }

    pub fn get_mut(&mut self, key: NodeKey) -> Option<&mut Node> {
        let slot = self.slots.get_mut(key.slot as usize)?;
        if slot.generation != key.generation {
            return None;
        }
        slot.node.as_mut()
    }

    pub fn contains(&self, key: NodeKey) -> bool {
        self.get(key).is_some()
    }

    pub fn children(&self, key: NodeKey) -> &[NodeKey] {
        self.get(key).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn parent(&self, key: NodeKey) -> Option<NodeKey> {
        self.get(key).and_then(|n| n.parent)
    }

    /// Position of `key` among its siblings. The root has no row.
    pub fn row(&self, key: NodeKey) -> Option<usize> {
        let parent = self.parent(key)?;
        self.children(parent).iter().position(|c| *c == key)
    }

    pub fn child(&self, parent: NodeKey, row: usize) -> Option<NodeKey> {
        self.children(parent).get(row).copied()
    }

    pub fn rename(&mut self, key: NodeKey, name: &str) -> bool {
        match self.get_mut(key) {
            Some(n) => {
                n.name = name.to_owned();
                true
            }
            None => false,
        }
    }

    /// Number of ancestors of `key`; the root sits at depth 0.
    pub fn depth(&self, key: NodeKey) -> usize {
        let mut depth = 0;
        let mut cur = self.parent(key);
        while let Some(k) = cur {
            depth += 1;
            cur = self.parent(k);
        }
        depth
    }

    /// True if `ancestor` is `key` or lies on its parent chain.
    pub fn is_ancestor_or_self(&self, ancestor: NodeKey, key: NodeKey) -> bool {
        let mut cur = Some(key);
        while let Some(k) = cur {
            if k == ancestor {
                return true;
            }
            cur = self.parent(k);
        }
        false
    }

    /// `key` and its descendants in pre-order.
    pub fn descendants(&self, key: NodeKey) -> Vec<NodeKey> {
        let mut out = Vec::new();
        let mut stack = vec![key];
        while let Some(k) = stack.pop() {
            if let Some(n) = self.get(k) {
                out.push(k);
                stack.extend(n.children.iter().rev().copied());
            }
        }
        out
    }

    pub fn find_by_id(&self, id: ObjectId) -> Option<NodeKey> {
        self.descendants(self.root).into_iter().find(|k| self.get(*k).map(Node::id) == Some(id))
    }

    /// Insert `subtree` as child `row` of `parent`. `resolve_id` turns each
    /// carried id into the id the node will actually hold. The caller checks
    /// that `parent` is live and `row <= children.len()`.
    pub(crate) fn attach(
        &mut self,
        parent: NodeKey,
        row: usize,
        subtree: Subtree,
        resolve_id: &mut dyn FnMut(Option<ObjectId>) -> ObjectId,
    ) -> NodeKey {
        let Subtree { id, name, object, children } = subtree;
        let id = resolve_id(id);
        let key = self.alloc(Node { id, name, parent: Some(parent), children: Vec::new(), object });
        if let Some(p) = self.get_mut(parent) {
            let row = row.min(p.children.len());
            p.children.insert(row, key);
        }
        for (i, child) in children.into_iter().enumerate() {
            self.attach(key, i, child, resolve_id);
        }
        key
    }

    /// Unlink `key` from its parent and take ownership of its subtree.
    /// The root cannot be detached.
    pub(crate) fn detach(&mut self, key: NodeKey) -> Option<Subtree> {
        if key == self.root || !self.contains(key) {
            return None;
        }
        if let Some(parent) = self.parent(key) {
            if let Some(p) = self.get_mut(parent) {
                p.children.retain(|c| *c != key);
            }
        }
        self.take_subtree(key)
    }

    fn take_subtree(&mut self, key: NodeKey) -> Option<Subtree> {
        let node = self.release(key)?;
        let children = node.children.into_iter().filter_map(|c| self.take_subtree(c)).collect();
        Some(Subtree { id: Some(node.id), name: node.name, object: node.object, children })
    }

    /// Deep copy of the subtree at `key`.
    pub fn extract(&self, key: NodeKey) -> Option<Subtree> {
        let node = self.get(key)?;
        Some(Subtree {
            id: Some(node.id),
            name: node.name.clone(),
            object: node.object.boxed_clone(),
            children: node.children.iter().filter_map(|c| self.extract(*c)).collect(),
        })
    }

    /// Union of object bounds across the subtree at `key`.
    pub fn bounds(&self, key: NodeKey) -> Option<Bounds> {
        self.descendants(key)
            .into_iter()
            .filter_map(|k| self.get(k))
            .fold(None, |acc, n| union_bounds(acc, n.object.bounds()))
    }
}
