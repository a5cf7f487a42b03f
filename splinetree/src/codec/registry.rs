use crate::objects::{Group, Object, PointObject, Root, Spline};
use std::collections::HashMap;

/// Builds an empty instance of one object kind, ready for `decode_fields`.
pub type Factory = fn() -> Box<dyn Object>;

/// Maps kind tags to factories. Decoding looks every tag up here; a tag with
/// no factory is a format error.
#[derive(Clone, Debug)]
pub struct Registry {
    factories: HashMap<String, Factory>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_builtin_kinds()
    }
}

impl Registry {
    pub fn empty() -> Self {
        Registry { factories: HashMap::new() }
    }

    /// Root, Group, PointObject and Spline.
    pub fn with_builtin_kinds() -> Self {
        let mut reg = Self::empty();
        reg.register(Root::KIND, || Box::new(Root));
        reg.register(Group::KIND, || Box::new(Group));
        reg.register(PointObject::KIND, || Box::new(PointObject::new()));
        reg.register(Spline::KIND, || Box::new(Spline::new()));
        reg
    }

    /// Register `factory` under `kind`, returning the factory it replaced.
    pub fn register(&mut self, kind: &str, factory: Factory) -> Option<Factory> {
        self.factories.insert(kind.to_owned(), factory)
    }

    pub fn create(&self, kind: &str) -> Option<Box<dyn Object>> {
        self.factories.get(kind).map(|f| f())
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    /// Registered tags, sorted.
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_kinds() {
        let reg = Registry::with_builtin_kinds();
        assert_eq!(reg.kinds(), vec!["Group", "PointObject", "Root", "Spline"]);
        for kind in reg.kinds() {
            assert_eq!(reg.create(kind).unwrap().kind(), kind);
        }
        assert!(reg.create("Ellipse").is_none());
    }

    #[test]
    fn test_register_replaces() {
        let mut reg = Registry::empty();
        assert!(reg.register("Group", || Box::new(Group)).is_none());
        assert!(reg.register("Group", || Box::new(Group)).is_some());
        assert!(reg.contains("Group"));
    }
}
