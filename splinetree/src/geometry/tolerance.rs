// Centralized tolerances for hit-testing and geometry

pub const EPS: f32 = 2.0;             // point hit radius (document units)
pub const EPS_POS: f32 = 1e-4;        // point coincidence threshold

#[inline] pub fn approx_eq(a: f32, b: f32, eps: f32) -> bool { (a - b).abs() <= eps }

#[inline]
pub fn same_position(a: crate::model::Vec2, b: crate::model::Vec2) -> bool {
    approx_eq(a.x, b.x, EPS_POS) && approx_eq(a.y, b.y, EPS_POS)
}
