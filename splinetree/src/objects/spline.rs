use super::{Object, PointObject};
use crate::codec::stream::{StreamReader, StreamWriter};
use crate::error::CodecError;
use crate::geometry::cubic::catmull_rom_segments;
use crate::model::Vec2;
use crate::paint::{PathCmd, Painter};

/// A smooth curve through its points, open or closed.
#[derive(Clone, Debug, Default)]
pub struct Spline {
    points: PointObject,
    closed: bool,
}

impl Spline {
    pub const KIND: &'static str = "Spline";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_points<I: IntoIterator<Item = Vec2>>(positions: I, closed: bool) -> Self {
        Spline { points: PointObject::with_points(positions), closed }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn set_closed(&mut self, closed: bool) {
        self.closed = closed;
    }

    pub fn points(&self) -> &PointObject {
        &self.points
    }

    pub fn points_mut(&mut self) -> &mut PointObject {
        &mut self.points
    }

    /// Path commands for the curve through the current points. An open
    /// curve through two points is a straight line.
    pub fn path(&self) -> Vec<PathCmd> {
        let positions = self.points.positions();
        let segments = catmull_rom_segments(&positions, self.closed);
        let straight = !self.closed && positions.len() == 2;
        let mut cmds = Vec::with_capacity(segments.len() + 2);
        let Some(first) = segments.first() else { return cmds };
        cmds.push(PathCmd::MoveTo { to: first.p0 });
        for s in &segments {
            cmds.push(if straight {
                PathCmd::LineTo { to: s.p3 }
            } else {
                PathCmd::CubicTo { c1: s.p1, c2: s.p2, to: s.p3 }
            });
        }
        if self.closed {
            cmds.push(PathCmd::Close);
        }
        cmds
    }
}

impl Object for Spline {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn encode_fields(&self, w: &mut StreamWriter) {
        self.points.encode_points(w);
        w.write_u8(self.closed as u8);
    }

    fn decode_fields(&mut self, r: &mut StreamReader<'_>) -> Result<(), CodecError> {
        self.points.decode_points(r)?;
        self.closed = r.read_u8()? != 0;
        Ok(())
    }

    fn boxed_clone(&self) -> Box<dyn Object> {
        Box::new(self.clone())
    }

    fn draw(&self, painter: &mut dyn Painter) {
        let path = self.path();
        if !path.is_empty() {
            painter.path(&path);
        }
        self.points.draw_points(painter);
    }

    fn as_points(&self) -> Option<&PointObject> {
        Some(&self.points)
    }

    fn as_points_mut(&mut self) -> Option<&mut PointObject> {
        Some(&mut self.points)
    }

    fn as_spline(&self) -> Option<&Spline> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_through_points() {
        let s = Spline::with_points([Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), Vec2::new(20.0, 5.0)], false);
        let path = s.path();
        assert_eq!(path.len(), 3);
        assert_eq!(path[0], PathCmd::MoveTo { to: Vec2::new(0.0, 0.0) });
        match path[2] {
            PathCmd::CubicTo { to, .. } => assert_eq!(to, Vec2::new(20.0, 5.0)),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_closed_path_ends_with_close() {
        let s = Spline::with_points([Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), Vec2::new(5.0, 8.0)], true);
        let path = s.path();
        assert_eq!(path.last(), Some(&PathCmd::Close));
        assert_eq!(path.len(), 5);
    }

    #[test]
    fn test_two_points_draw_a_line() {
        let s = Spline::with_points([Vec2::new(0.0, 0.0), Vec2::new(10.0, 4.0)], false);
        assert_eq!(
            s.path(),
            vec![PathCmd::MoveTo { to: Vec2::new(0.0, 0.0) }, PathCmd::LineTo { to: Vec2::new(10.0, 4.0) }]
        );
        let closed = Spline::with_points([Vec2::new(0.0, 0.0), Vec2::new(10.0, 4.0)], true);
        assert!(closed.path().iter().all(|c| !matches!(c, PathCmd::LineTo { .. })));
    }

    #[test]
    fn test_single_point_has_no_path() {
        let s = Spline::with_points([Vec2::new(1.0, 1.0)], false);
        assert!(s.path().is_empty());
    }
}
