//! Document model for a hierarchical vector-drawing editor.
//!
//! A [`Document`] owns a tree of polymorphic objects (points, splines,
//! groups) with stable numeric ids, exposes it to tree views as rows with
//! generation-checked [`Handle`]s, routes pointer interactions to the
//! selected objects, and encodes any subtree to a type-tagged byte stream
//! for save/load, clipboard and drag-and-drop.

pub mod model;
pub mod ids;
pub mod objects;
pub mod tree;
pub mod events;
pub mod selection;
pub mod document;
pub mod item_model;
pub mod interaction;
pub mod codec;
pub mod transfer;
pub mod paint;
pub mod svg;
pub mod view;
pub mod config;
pub mod error;
pub mod geometry {
    pub mod cubic;
    pub mod limits;
    pub mod tolerance;
}
mod json;

pub use config::DocumentConfig;
pub use document::{Document, Handle};
pub use error::{CodecError, ConfigError, Error, Result, TreeError};
pub use events::ModelEvent;
pub use interaction::{ClickKind, Interaction, Modifiers, MouseButton, Phase};
pub use item_model::ItemFlags;
pub use model::{ObjectId, Point, PointKey, Vec2};
pub use objects::{Group, Object, PointObject, Root, Spline};
pub use transfer::{DragSession, DropAction, TransferPayload, MIME_TYPE};
pub use tree::{NodeKey, Subtree};
pub use view::ViewTransform;
