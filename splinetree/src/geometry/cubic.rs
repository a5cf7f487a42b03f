//! Cubic Bézier segments used to draw splines through their points.

use crate::geometry::tolerance::same_position;
use crate::model::Vec2;

/// Control points of a cubic Bézier curve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubicBezier {
    pub p0: Vec2, // Start point
    pub p1: Vec2, // First control point
    pub p2: Vec2, // Second control point
    pub p3: Vec2, // End point
}

impl CubicBezier {
    pub fn new(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2) -> Self {
        Self { p0, p1, p2, p3 }
    }

    /// Uniform Catmull-Rom segment from `b` to `c`, with `a` and `d` as the
    /// neighbouring points.
    pub fn from_catmull_rom(a: Vec2, b: Vec2, c: Vec2, d: Vec2) -> Self {
        let p1 = b + (c - a) * (1.0 / 6.0);
        let p2 = c - (d - b) * (1.0 / 6.0);
        Self::new(b, p1, p2, c)
    }

    /// Evaluate the curve at parameter t ∈ [0, 1].
    pub fn eval(&self, t: f32) -> Vec2 {
        let t2 = t * t;
        let t3 = t2 * t;
        let mt = 1.0 - t;
        let mt2 = mt * mt;
        let mt3 = mt2 * mt;

        Vec2 {
            x: mt3 * self.p0.x + 3.0 * mt2 * t * self.p1.x + 3.0 * mt * t2 * self.p2.x + t3 * self.p3.x,
            y: mt3 * self.p0.y + 3.0 * mt2 * t * self.p1.y + 3.0 * mt * t2 * self.p2.y + t3 * self.p3.y,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        same_position(self.p0, self.p1) && same_position(self.p1, self.p2) && same_position(self.p2, self.p3)
    }
}

/// Catmull-Rom segments through `points`. Open curves duplicate their end
/// points as phantom neighbours; closed curves wrap around.
pub fn catmull_rom_segments(points: &[Vec2], closed: bool) -> Vec<CubicBezier> {
    let n = points.len();
    if n < 2 {
        return Vec::new();
    }
    let at = |i: isize| -> Vec2 {
        if closed {
            points[i.rem_euclid(n as isize) as usize]
        } else {
            points[i.clamp(0, n as isize - 1) as usize]
        }
    };
    let count = if closed { n } else { n - 1 };
    (0..count as isize)
        .map(|i| CubicBezier::from_catmull_rom(at(i - 1), at(i), at(i + 1), at(i + 2)))
        .filter(|c| !c.is_degenerate())
        .collect()
}
