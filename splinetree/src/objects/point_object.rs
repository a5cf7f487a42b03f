use super::Object;
use crate::codec::stream::{StreamReader, StreamWriter};
use crate::error::CodecError;
use crate::geometry::{limits, tolerance};
use crate::model::{union_bounds, Bounds, Point, PointKey, Vec2};
use crate::paint::Painter;

/// An object owning an ordered set of points and a selection subset.
///
/// The selection lists keys in the order they were selected; every entry also
/// appears in `points` with `selected == true`. Selection is interaction
/// state and is not written to streams.
#[derive(Clone, Debug, Default)]
pub struct PointObject {
    points: Vec<Point>,
    selection: Vec<PointKey>,
    next_key: u32,
}

impl PointObject {
    pub const KIND: &'static str = "PointObject";
    /// Hit radius used by [`PointObject::point_at`].
    pub const EPS: f32 = tolerance::EPS;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_points<I: IntoIterator<Item = Vec2>>(positions: I) -> Self {
        let mut obj = Self::new();
        for p in positions {
            obj.add_point(p);
        }
        obj
    }

    /// Append a point, clamped into the coordinate limits. New points are
    /// not selected. Returns `None` once the object holds
    /// `MAX_POINTS_PER_OBJECT` points.
    pub fn add_point(&mut self, position: Vec2) -> Option<PointKey> {
        if self.points.len() >= limits::MAX_POINTS_PER_OBJECT {
            return None;
        }
        let key = PointKey(self.next_key);
        self.next_key += 1;
        self.points.push(Point { key, position: clamp(position), selected: false });
        Some(key)
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn positions(&self) -> Vec<Vec2> {
        self.points.iter().map(|p| p.position).collect()
    }

    pub fn selection(&self) -> &[PointKey] {
        &self.selection
    }

    pub fn point(&self, key: PointKey) -> Option<&Point> {
        self.points.iter().find(|p| p.key == key)
    }

    fn point_mut(&mut self, key: PointKey) -> Option<&mut Point> {
        self.points.iter_mut().find(|p| p.key == key)
    }

    /// First point within [`Self::EPS`] of `pos`, in insertion order.
    pub fn point_at(&self, pos: Vec2) -> Option<PointKey> {
        self.point_within(pos, Self::EPS)
    }

    pub fn point_within(&self, pos: Vec2, radius: f32) -> Option<PointKey> {
        let r2 = radius * radius;
        self.points
            .iter()
            .find(|p| p.position.distance_sq(pos) <= r2)
            .map(|p| p.key)
    }

    /// Mark `key` selected. Returns whether anything changed.
    pub fn select(&mut self, key: PointKey) -> bool {
        match self.point_mut(key) {
            Some(p) if !p.selected => {
                p.selected = true;
                self.selection.push(key);
                true
            }
            _ => false,
        }
    }

    /// Clear `key` from the selection. Deselecting an unselected or unknown
    /// point is a no-op.
    pub fn deselect(&mut self, key: PointKey) -> bool {
        match self.point_mut(key) {
            Some(p) if p.selected => {
                p.selected = false;
                self.selection.retain(|k| *k != key);
                true
            }
            _ => false,
        }
    }

    pub fn select_all(&mut self) -> bool {
        let keys: Vec<PointKey> = self.points.iter().map(|p| p.key).collect();
        keys.into_iter().fold(false, |changed, k| self.select(k) | changed)
    }

    pub fn deselect_all(&mut self) -> bool {
        let changed = !self.selection.is_empty();
        for p in &mut self.points {
            p.selected = false;
        }
        self.selection.clear();
        changed
    }

    pub fn remove_point(&mut self, key: PointKey) -> bool {
        let before = self.points.len();
        self.points.retain(|p| p.key != key);
        self.selection.retain(|k| *k != key);
        self.points.len() != before
    }

    /// Move every selected point by `delta`. Points stop at the coordinate
    /// limits; a non-finite delta moves nothing.
    pub fn translate_selected(&mut self, delta: Vec2) -> bool {
        if self.selection.is_empty() || delta == Vec2::ZERO || !(delta.x.is_finite() && delta.y.is_finite()) {
            return false;
        }
        for p in self.points.iter_mut().filter(|p| p.selected) {
            p.position = clamp(p.position + delta);
        }
        true
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.points.iter().fold(None, |acc, p| {
            let Vec2 { x, y } = p.position;
            union_bounds(acc, Some((x, y, x, y)))
        })
    }

    /// Click handling: a plain click replaces the selection with the hit
    /// point (or clears it on a miss); an extended click toggles the hit
    /// point and leaves the rest alone.
    pub fn select_at(&mut self, pos: Vec2, extended: bool, radius: f32) -> bool {
        let hit = self.point_within(pos, radius);
        if extended {
            return match hit {
                Some(k) if self.point(k).map_or(false, |p| p.selected) => self.deselect(k),
                Some(k) => self.select(k),
                None => false,
            };
        }
        let only_hit_selected = match hit {
            Some(k) => self.selection.as_slice() == [k],
            None => self.selection.is_empty(),
        };
        if only_hit_selected {
            return false;
        }
        self.deselect_all();
        if let Some(k) = hit {
            self.select(k);
        }
        true
    }

    /// Append a point at `pos` and make it the only selected point.
    pub fn insert(&mut self, pos: Vec2) -> bool {
        let Some(key) = self.add_point(pos) else { return false };
        self.deselect_all();
        self.select(key);
        true
    }

    pub fn remove_at(&mut self, pos: Vec2, radius: f32) -> bool {
        match self.point_within(pos, radius) {
            Some(k) => self.remove_point(k),
            None => false,
        }
    }

    pub fn remove_selected(&mut self) -> bool {
        if self.selection.is_empty() {
            return false;
        }
        self.points.retain(|p| !p.selected);
        self.selection.clear();
        true
    }

    pub(crate) fn encode_points(&self, w: &mut StreamWriter) {
        w.write_len(self.points.len());
        for p in &self.points {
            w.write_vec2(p.position);
        }
    }

    pub(crate) fn decode_points(&mut self, r: &mut StreamReader<'_>) -> Result<(), CodecError> {
        let n = r.read_len(limits::MAX_POINTS_PER_OBJECT, "points per object")?;
        r.charge_points(n)?;
        *self = PointObject::new();
        for _ in 0..n {
            let pos = r.read_vec2()?;
            self.add_point(pos);
        }
        Ok(())
    }

    pub(crate) fn draw_points(&self, painter: &mut dyn Painter) {
        for p in &self.points {
            painter.point(p.position, p.selected);
        }
    }
}

fn clamp(p: Vec2) -> Vec2 {
    Vec2::new(limits::clamp_coord(p.x), limits::clamp_coord(p.y))
}

impl Object for PointObject {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn encode_fields(&self, w: &mut StreamWriter) {
        self.encode_points(w);
    }

    fn decode_fields(&mut self, r: &mut StreamReader<'_>) -> Result<(), CodecError> {
        self.decode_points(r)
    }

    fn boxed_clone(&self) -> Box<dyn Object> {
        Box::new(self.clone())
    }

    fn draw(&self, painter: &mut dyn Painter) {
        self.draw_points(painter);
    }

    fn as_points(&self) -> Option<&PointObject> {
        Some(self)
    }

    fn as_points_mut(&mut self) -> Option<&mut PointObject> {
        Some(self)
    }
}
