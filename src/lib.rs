use splinetree::{Document, DragSession, ViewTransform};
use wasm_bindgen::prelude::*;
mod api;
mod error;
mod interop;
mod logging;

pub use logging::init_logging;

#[wasm_bindgen]
pub struct Scene {
    pub(crate) inner: Document,
    pub(crate) drag: Option<DragSession>,
    pub(crate) view: ViewTransform,
}

impl Scene {
    pub fn rs_new() -> Scene {
        Scene { inner: Document::new(), drag: None, view: ViewTransform::default() }
    }
}
