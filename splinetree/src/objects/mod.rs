//! Object kinds that can live in a document tree.
//!
//! Every node carries a `Box<dyn Object>` with its kind-specific state. Tree
//! structure (id, name, parent, children) is owned by [`crate::tree`]; the
//! object itself only knows its geometry, how to encode it and how to react
//! to routed interactions.

mod point_object;
mod spline;

pub use point_object::PointObject;
pub use spline::Spline;

use crate::codec::stream::{StreamReader, StreamWriter};
use crate::error::CodecError;
use crate::model::{Bounds, Vec2};
use crate::paint::Painter;
use std::fmt;

pub trait Object: fmt::Debug {
    /// Registered kind tag, written ahead of every encoded node.
    fn kind(&self) -> &'static str;

    fn encode_fields(&self, w: &mut StreamWriter);

    /// Read the fields written by `encode_fields` into a freshly constructed
    /// instance.
    fn decode_fields(&mut self, r: &mut StreamReader<'_>) -> Result<(), CodecError>;

    fn boxed_clone(&self) -> Box<dyn Object>;

    fn draw(&self, _painter: &mut dyn Painter) {}

    fn as_points(&self) -> Option<&PointObject> {
        None
    }

    fn as_points_mut(&mut self) -> Option<&mut PointObject> {
        None
    }

    fn as_spline(&self) -> Option<&Spline> {
        None
    }

    fn bounds(&self) -> Option<Bounds> {
        self.as_points().and_then(PointObject::bounds)
    }

    // Interaction hooks. Each returns whether the object changed. Kinds
    // without points ignore them.

    fn select_at(&mut self, pos: Vec2, extended: bool, radius: f32) -> bool {
        self.as_points_mut().map_or(false, |p| p.select_at(pos, extended, radius))
    }

    fn insert(&mut self, pos: Vec2) -> bool {
        self.as_points_mut().map_or(false, |p| p.insert(pos))
    }

    fn remove_at(&mut self, pos: Vec2, radius: f32) -> bool {
        self.as_points_mut().map_or(false, |p| p.remove_at(pos, radius))
    }

    fn remove_selected(&mut self) -> bool {
        self.as_points_mut().map_or(false, PointObject::remove_selected)
    }

    fn move_selected(&mut self, delta: Vec2) -> bool {
        self.as_points_mut().map_or(false, |p| p.translate_selected(delta))
    }
}

impl Clone for Box<dyn Object> {
    fn clone(&self) -> Self {
        self.boxed_clone()
    }
}

/// The distinguished tree root. Carries no state of its own.
#[derive(Clone, Copy, Debug, Default)]
pub struct Root;

impl Root {
    pub const KIND: &'static str = "Root";
}

impl Object for Root {
    fn kind(&self) -> &'static str {
        Self::KIND
    }
    fn encode_fields(&self, _w: &mut StreamWriter) {}
    fn decode_fields(&mut self, _r: &mut StreamReader<'_>) -> Result<(), CodecError> {
        Ok(())
    }
    fn boxed_clone(&self) -> Box<dyn Object> {
        Box::new(*self)
    }
}

/// A container used to nest other objects.
#[derive(Clone, Copy, Debug, Default)]
pub struct Group;

impl Group {
    pub const KIND: &'static str = "Group";
}

impl Object for Group {
    fn kind(&self) -> &'static str {
        Self::KIND
    }
    fn encode_fields(&self, _w: &mut StreamWriter) {}
    fn decode_fields(&mut self, _r: &mut StreamReader<'_>) -> Result<(), CodecError> {
        Ok(())
    }
    fn boxed_clone(&self) -> Box<dyn Object> {
        Box::new(*self)
    }
}
