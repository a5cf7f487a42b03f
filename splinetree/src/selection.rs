use crate::tree::{NodeKey, ObjectTree};

/// Objects that receive routed interactions, in the order they were
/// selected. Not persisted.
#[derive(Clone, Debug, Default)]
pub struct SelectionModel {
    keys: Vec<NodeKey>,
}

impl SelectionModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `key` was newly added.
    pub fn select(&mut self, key: NodeKey) -> bool {
        if self.keys.contains(&key) {
            return false;
        }
        self.keys.push(key);
        true
    }

    pub fn deselect(&mut self, key: NodeKey) -> bool {
        let before = self.keys.len();
        self.keys.retain(|k| *k != key);
        self.keys.len() != before
    }

    pub fn clear(&mut self) -> bool {
        let had = !self.keys.is_empty();
        self.keys.clear();
        had
    }

    pub fn contains(&self, key: NodeKey) -> bool {
        self.keys.contains(&key)
    }

    pub fn keys(&self) -> &[NodeKey] {
        &self.keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Drop entries whose object no longer exists.
    pub fn prune(&mut self, tree: &ObjectTree) {
        self.keys.retain(|k| tree.contains(*k));
    }
}
