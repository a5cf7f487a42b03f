use crate::model::Vec2;
use serde::{Deserialize, Serialize};

/// Zoom range accepted by [`ViewTransform::zoom_at`].
pub const MIN_SCALE: f32 = 1e-4;
pub const MAX_SCALE: f32 = 1e4;

/// Maps document coordinates to device pixels: `device = doc * scale + offset`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    pub offset: Vec2,
    pub scale: f32,
}

impl Default for ViewTransform {
    fn default() -> Self {
        ViewTransform { offset: Vec2::ZERO, scale: 1.0 }
    }
}

impl ViewTransform {
    /// Document origin in the middle of a `width` x `height` viewport.
    pub fn centered(width: f32, height: f32) -> Self {
        ViewTransform { offset: Vec2::new(width * 0.5, height * 0.5), scale: 1.0 }
    }

    pub fn to_device(&self, p: Vec2) -> Vec2 {
        p * self.scale + self.offset
    }

    pub fn to_document(&self, p: Vec2) -> Vec2 {
        (p - self.offset) * (1.0 / self.scale)
    }

    /// Device-space motion to document-space motion.
    pub fn to_document_delta(&self, d: Vec2) -> Vec2 {
        d * (1.0 / self.scale)
    }

    pub fn pan(&mut self, device_delta: Vec2) {
        self.offset += device_delta;
    }

    /// Zoom by `factor` keeping the document point under `device_pos` fixed.
    /// Non-positive or non-finite factors are ignored; the resulting scale is
    /// clamped to `MIN_SCALE..=MAX_SCALE`.
    pub fn zoom_at(&mut self, device_pos: Vec2, factor: f32) {
        if !(factor.is_finite() && factor > 0.0) {
            return;
        }
        let anchor = self.to_document(device_pos);
        self.scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        self.offset = device_pos - anchor * self.scale;
    }
}
