use crate::model::Vec2;
use crate::tree::{NodeKey, ObjectTree};
use crate::Document;
use serde::Serialize;
use serde_json::Value;

pub fn to_json_impl(doc: &Document) -> Value {
    #[derive(Serialize)]
    struct PointSer {
        x: f32,
        y: f32,
        selected: bool,
    }
    #[derive(Serialize)]
    struct ObjectSer {
        id: u32,
        name: String,
        kind: &'static str,
        #[serde(skip_serializing_if = "Option::is_none")]
        points: Option<Vec<PointSer>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        closed: Option<bool>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        children: Vec<ObjectSer>,
    }
    #[derive(Serialize)]
    struct DocumentSer {
        revision: u64,
        objects: usize,
        root: ObjectSer,
    }

    fn object(tree: &ObjectTree, key: NodeKey) -> Option<ObjectSer> {
        let node = tree.get(key)?;
        let points = node.object().as_points().map(|p| {
            p.points()
                .iter()
                .map(|pt| {
                    let Vec2 { x, y } = pt.position;
                    PointSer { x, y, selected: pt.selected }
                })
                .collect()
        });
        Some(ObjectSer {
            id: node.id().0,
            name: node.name().to_owned(),
            kind: node.kind(),
            points,
            closed: node.object().as_spline().map(|s| s.is_closed()),
            children: node.children().iter().filter_map(|c| object(tree, *c)).collect(),
        })
    }

    let tree = doc.tree();
    let Some(root) = object(tree, tree.root()) else { return Value::Null };
    let out = DocumentSer { revision: doc.revision(), objects: doc.object_count(), root };
    serde_json::to_value(out).unwrap_or(Value::Null)
}
