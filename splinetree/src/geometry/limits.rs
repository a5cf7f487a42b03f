// Centralized ingestion limits to harden against untrusted input (streams/config)

// Tree size caps
pub const MAX_OBJECTS: usize = 200_000;
pub const MAX_DEPTH: usize = 256;

// Largest id a stream or caller may carry; keeps the allocator counter clear of u32::MAX
pub const MAX_OBJECT_ID: u32 = 0x7FFF_FFFF;

// Point objects
pub const MAX_POINTS_PER_OBJECT: usize = 100_000;
pub const MAX_POINTS_TOTAL: usize = 2_000_000;

// Strings (tags and names)
pub const MAX_STRING_BYTES: usize = 4 * 1024;

// Pending observer events before the queue collapses to a single Reset
pub const MAX_PENDING_EVENTS: usize = 4_096;

// Numeric bounds
pub const COORD_MIN: f32 = -10_000_000.0;
pub const COORD_MAX: f32 =  10_000_000.0;
pub const PICK_RADIUS_MAX: f32 = 1_000.0;

#[inline]
pub fn in_coord_bounds(x: f32) -> bool { x.is_finite() && x >= COORD_MIN && x <= COORD_MAX }

#[inline]
pub fn in_radius_bounds(r: f32) -> bool { r.is_finite() && r > 0.0 && r <= PICK_RADIUS_MAX }

/// Pull `x` into the coordinate range. NaN maps to 0.
#[inline]
pub fn clamp_coord(x: f32) -> f32 { if x.is_nan() { 0.0 } else { x.clamp(COORD_MIN, COORD_MAX) } }

/// Longest prefix of `s` within `MAX_STRING_BYTES`, cut on a char boundary.
pub fn truncate_str(s: &str) -> &str {
    if s.len() <= MAX_STRING_BYTES {
        return s;
    }
    let mut end = MAX_STRING_BYTES;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
