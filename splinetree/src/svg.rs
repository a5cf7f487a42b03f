use crate::model::{ObjectId, Vec2};
use crate::paint::{PathCmd, Painter};

/// Painter that turns draw primitives into SVG path data, one entry per
/// object that drew a path, plus point markers.
#[derive(Clone, Debug, Default)]
pub struct SvgPainter {
    current: Option<ObjectId>,
    paths: Vec<(ObjectId, String)>,
    markers: Vec<(ObjectId, Vec2, bool)>,
}

impl SvgPainter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paths(&self) -> &[(ObjectId, String)] {
        &self.paths
    }

    pub fn markers(&self) -> &[(ObjectId, Vec2, bool)] {
        &self.markers
    }

    pub fn into_path_strings(self) -> Vec<String> {
        self.paths.into_iter().map(|(_, d)| d).collect()
    }
}

pub fn path_data(cmds: &[PathCmd]) -> String {
    let mut d = String::new();
    for cmd in cmds {
        if !d.is_empty() {
            d.push(' ');
        }
        match cmd {
            PathCmd::MoveTo { to } => d.push_str(&format!("M {} {}", to.x, to.y)),
            PathCmd::LineTo { to } => d.push_str(&format!("L {} {}", to.x, to.y)),
            PathCmd::CubicTo { c1, c2, to } => d.push_str(&format!(
                "C {} {}, {} {}, {} {}",
                c1.x, c1.y, c2.x, c2.y, to.x, to.y
            )),
            PathCmd::Close => d.push('Z'),
        }
    }
    d
}

impl Painter for SvgPainter {
    fn begin_object(&mut self, id: ObjectId, _kind: &str) {
        self.current = Some(id);
    }

    fn end_object(&mut self) {
        self.current = None;
    }

    fn point(&mut self, pos: Vec2, selected: bool) {
        let id = self.current.unwrap_or(ObjectId::ROOT);
        self.markers.push((id, pos, selected));
    }

    fn path(&mut self, cmds: &[PathCmd]) {
        let id = self.current.unwrap_or(ObjectId::ROOT);
        self.paths.push((id, path_data(cmds)));
    }
}
