//! Type-tagged binary encoding of object subtrees.
//!
//! Each node is written as:
//!
//! ```text
//! kind tag (str) | id (u32) | name (str) | kind fields | child count (u32) | children...
//! ```
//!
//! Strings are a u32 byte length followed by UTF-8. A document is exactly
//! its root node; a transfer payload is a u32 count followed by that many
//! independent nodes.

pub mod registry;
pub mod stream;

pub use registry::{Factory, Registry};

use crate::error::CodecError;
use crate::geometry::limits;
use crate::model::ObjectId;
use crate::objects::{Object, Root};
use crate::tree::{NodeKey, ObjectTree, Subtree};
use stream::{StreamReader, StreamWriter};

fn write_header(w: &mut StreamWriter, id: ObjectId, name: &str, object: &dyn Object) {
    w.write_str(object.kind());
    w.write_u32(id.0);
    w.write_str(name);
    object.encode_fields(w);
}

/// Encode the live node at `key` and everything below it.
pub fn encode_node(tree: &ObjectTree, key: NodeKey, w: &mut StreamWriter) {
    let Some(node) = tree.get(key) else { return };
    write_header(w, node.id(), node.name(), node.object());
    w.write_len(node.children().len());
    for child in node.children() {
        encode_node(tree, *child, w);
    }
}

/// Encode a detached subtree. Unassigned ids are written as 0.
pub fn encode_subtree(sub: &Subtree, w: &mut StreamWriter) {
    write_header(w, sub.id.unwrap_or(ObjectId::ROOT), &sub.name, sub.object.as_ref());
    w.write_len(sub.children.len());
    for child in &sub.children {
        encode_subtree(child, w);
    }
}

pub fn decode_subtree(r: &mut StreamReader<'_>, registry: &Registry) -> Result<Subtree, CodecError> {
    decode_at_depth(r, registry, 0)
}

fn decode_at_depth(r: &mut StreamReader<'_>, registry: &Registry, depth: usize) -> Result<Subtree, CodecError> {
    if depth > limits::MAX_DEPTH {
        return Err(CodecError::LimitExceeded("nesting depth"));
    }
    let kind = r.read_string()?;
    let mut object = registry.create(&kind).ok_or(CodecError::UnknownKind(kind))?;
    r.charge_object()?;
    let id = ObjectId(r.read_u32()?);
    if id.0 > limits::MAX_OBJECT_ID {
        return Err(CodecError::LimitExceeded("object id"));
    }
    let name = r.read_string()?;
    object.decode_fields(r)?;
    let count = r.read_len(limits::MAX_OBJECTS, "child count")?;
    let mut children = Vec::new();
    for _ in 0..count {
        children.push(decode_at_depth(r, registry, depth + 1)?);
    }
    Ok(Subtree { id: Some(id), name, object, children })
}

pub fn encode_document(tree: &ObjectTree) -> Vec<u8> {
    let mut w = StreamWriter::new();
    encode_node(tree, tree.root(), &mut w);
    w.into_bytes()
}

/// Decode a whole document. The top node must be a Root and the stream
/// must end right after it.
pub fn decode_document(bytes: &[u8], registry: &Registry) -> Result<Subtree, CodecError> {
    let mut r = StreamReader::new(bytes);
    let root = decode_subtree(&mut r, registry)?;
    if root.kind() != Root::KIND {
        return Err(CodecError::NotRoot(root.kind().to_owned()));
    }
    r.finish()?;
    Ok(root)
}

pub fn encode_transfer(tree: &ObjectTree, keys: &[NodeKey]) -> Vec<u8> {
    let live: Vec<NodeKey> = keys.iter().copied().filter(|k| tree.contains(*k)).collect();
    let mut w = StreamWriter::new();
    w.write_len(live.len());
    for key in live {
        encode_node(tree, key, &mut w);
    }
    w.into_bytes()
}

pub fn decode_transfer(bytes: &[u8], registry: &Registry) -> Result<Vec<Subtree>, CodecError> {
    let mut r = StreamReader::new(bytes);
    let count = r.read_len(limits::MAX_OBJECTS, "object count")?;
    let mut out = Vec::new();
    for _ in 0..count {
        out.push(decode_subtree(&mut r, registry)?);
    }
    r.finish()?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Vec2;
    use crate::objects::{Group, PointObject};

    fn sample() -> Subtree {
        let mut sub = Subtree::new(Group)
            .named("layer")
            .with_child(Subtree::new(PointObject::with_points([Vec2::new(1.0, 2.0)])).named("dots"));
        sub.id = Some(ObjectId(4));
        sub.children[0].id = Some(ObjectId(9));
        sub
    }

    #[test]
    fn test_subtree_bytes_decode() {
        let mut w = StreamWriter::new();
        encode_subtree(&sample(), &mut w);
        let bytes = w.into_bytes();
        let mut r = StreamReader::new(&bytes);
        let back = decode_subtree(&mut r, &Registry::default()).unwrap();
        assert!(r.finish().is_ok());
        assert_eq!(back.kind(), "Group");
        assert_eq!(back.name, "layer");
        assert_eq!(back.ids(), vec![ObjectId(4), ObjectId(9)]);
        let pts = back.children[0].object.as_points().unwrap();
        assert_eq!(pts.positions(), vec![Vec2::new(1.0, 2.0)]);
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let mut reg = Registry::empty();
        reg.register(Group::KIND, || Box::new(Group));
        let mut w = StreamWriter::new();
        encode_subtree(&sample(), &mut w);
        let bytes = w.into_bytes();
        let err = decode_subtree(&mut StreamReader::new(&bytes), &reg).unwrap_err();
        assert_eq!(err, CodecError::UnknownKind("PointObject".into()));
    }

    #[test]
    fn test_document_must_be_root() {
        let mut w = StreamWriter::new();
        encode_subtree(&sample(), &mut w);
        let err = decode_document(&w.into_bytes(), &Registry::default()).unwrap_err();
        assert_eq!(err, CodecError::NotRoot("Group".into()));
    }

    #[test]
    fn test_depth_limit() {
        let mut sub = Subtree::new(Group);
        for _ in 0..(limits::MAX_DEPTH + 2) {
            sub = Subtree::new(Group).with_child(sub);
        }
        let mut w = StreamWriter::new();
        encode_subtree(&sub, &mut w);
        let err = decode_subtree(&mut StreamReader::new(&w.into_bytes()), &Registry::default()).unwrap_err();
        assert_eq!(err, CodecError::LimitExceeded("nesting depth"));
    }
}
