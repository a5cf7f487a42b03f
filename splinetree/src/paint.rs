//! Render boundary: objects issue draw primitives against a [`Painter`]
//! supplied by the host renderer.

use crate::model::{ObjectId, Vec2};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "lowercase")]
pub enum PathCmd {
    #[serde(rename = "move")]
    MoveTo { to: Vec2 },
    #[serde(rename = "line")]
    LineTo { to: Vec2 },
    #[serde(rename = "cubic")]
    CubicTo { c1: Vec2, c2: Vec2, to: Vec2 },
    Close,
}

pub trait Painter {
    /// Called before an object's own primitives; nested objects follow
    /// after their parent's `end_object`.
    fn begin_object(&mut self, _id: ObjectId, _kind: &str) {}
    fn end_object(&mut self) {}

    fn point(&mut self, pos: Vec2, selected: bool);
    fn path(&mut self, cmds: &[PathCmd]);
}
