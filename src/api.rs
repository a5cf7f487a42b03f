use crate::error;
use crate::error::Failure;
use crate::interop::{js_object, parent_handle, to_js};
use crate::Scene;
use js_sys::{Float32Array, Uint32Array, Uint8Array};
use splinetree::geometry::limits;
use splinetree::svg::SvgPainter;
use splinetree::{
    ClickKind, DocumentConfig, DropAction, Group, Handle, Interaction, Modifiers, MouseButton, ObjectId,
    PointObject, Spline, TransferPayload, Vec2, ViewTransform,
};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn payload_js(p: &TransferPayload) -> JsValue {
    js_object(&[("format", JsValue::from_str(&p.format)), ("bytes", Uint8Array::from(p.bytes.as_slice()).into())]).into()
}

fn parse_action(action: &str) -> Option<DropAction> {
    match action {
        "ignore" => Some(DropAction::Ignore),
        "copy" => Some(DropAction::Copy),
        "move" => Some(DropAction::Move),
        "link" => Some(DropAction::Link),
        _ => None,
    }
}

fn in_bounds(v: f32) -> bool {
    limits::in_coord_bounds(v)
}

impl Scene {
    fn handle_by_id(&self, id: u32) -> Result<Handle, JsValue> {
        self.inner.find(ObjectId(id)).ok_or_else(|| error::invalid_id(id))
    }

    fn handles_by_id(&self, ids: &[u32]) -> Result<Vec<Handle>, JsValue> {
        ids.iter().map(|id| self.handle_by_id(*id)).collect()
    }

    fn parent_by_id(&self, id: Option<u32>) -> Result<Option<Handle>, JsValue> {
        id.map(|id| self.handle_by_id(id)).transpose()
    }

    fn handle_arg(&self, v: &JsValue) -> Option<Handle> {
        serde_wasm_bindgen::from_value(v.clone()).ok()
    }

    fn ids_of(&self, handles: &[Handle]) -> Vec<u32> {
        handles.iter().filter_map(|h| self.inner.id_of(*h)).map(|id| id.0).collect()
    }

    fn id_or_zero(&self, handle: Handle) -> u32 {
        self.inner.id_of(handle).map_or(0, |id| id.0)
    }

    fn paste_inner(&mut self, format: &str, bytes: &[u8], parent: Option<u32>, row: Option<u32>) -> Result<Vec<u32>, JsValue> {
        let parent = self.parent_by_id(parent)?;
        let payload = TransferPayload { format: format.to_owned(), bytes: bytes.to_vec() };
        let pasted = self
            .inner
            .paste(&payload, parent, row.map(|r| r as usize))
            .map_err(|e| error::from_error(&e))?;
        Ok(self.ids_of(&pasted))
    }

    fn drop_inner(
        &mut self,
        format: &str,
        bytes: &[u8],
        action: &str,
        row: Option<u32>,
        column: u32,
        parent: Option<u32>,
    ) -> Result<bool, JsValue> {
        let Some(action) = parse_action(action) else {
            return Err(error::invalid_argument("action", "action must be one of ignore, copy, move, link"));
        };
        let parent = self.parent_by_id(parent)?;
        let payload = TransferPayload { format: format.to_owned(), bytes: bytes.to_vec() };
        // Only the drag that produced these bytes may remove its sources.
        let session = self.drag.take().filter(|s| s.payload == payload);
        self.inner
            .drop_mime_data(&payload, action, row.map(|r| r as usize), column as usize, parent, session.as_ref())
            .map_err(|e| error::from_error(&e))
    }
}

#[wasm_bindgen]
impl Scene {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Scene {
        crate::Scene::rs_new()
    }

    /// Scene with settings from a plain object; `undefined` on invalid input.
    pub fn with_config(config: JsValue) -> Option<Scene> {
        let value = serde_wasm_bindgen::from_value::<serde_json::Value>(config).ok()?;
        let config = DocumentConfig::from_json_value(value).ok()?;
        let mut scene = Scene::rs_new();
        scene.inner.set_config(config).ok()?;
        Some(scene)
    }
    pub fn set_config_res(&mut self, config: JsValue) -> JsValue {
        let value = match serde_wasm_bindgen::from_value::<serde_json::Value>(config) {
            Ok(v) => v,
            Err(e) => return Failure::new("invalid_config", e.to_string()).into(),
        };
        let config = match DocumentConfig::from_json_value(value) {
            Ok(c) => c,
            Err(e) => return error::from_error(&e.into()),
        };
        match self.inner.set_config(config) {
            Ok(()) => error::ok(JsValue::from_bool(true)),
            Err(e) => error::from_error(&e),
        }
    }
    pub fn config(&self) -> JsValue {
        to_js(self.inner.config())
    }

    pub fn revision(&self) -> u64 {
        self.inner.revision()
    }
    pub fn object_count(&self) -> u32 {
        self.inner.object_count() as u32
    }

    // Objects
    pub fn add_point_object(&mut self, name: &str) -> u32 {
        let h = self.inner.add_named(name, PointObject::new());
        self.id_or_zero(h)
    }
    pub fn add_spline(&mut self, name: &str, closed: bool) -> u32 {
        let mut spline = Spline::new();
        spline.set_closed(closed);
        let h = self.inner.add_named(name, spline);
        self.id_or_zero(h)
    }
    pub fn add_group(&mut self, name: &str) -> u32 {
        let h = self.inner.add_named(name, Group);
        self.id_or_zero(h)
    }
    pub fn remove_object(&mut self, id: u32) -> bool {
        match self.inner.find(ObjectId(id)) {
            Some(h) => self.inner.remove_object(h).is_ok(),
            None => false,
        }
    }
    pub fn remove_object_res(&mut self, id: u32) -> JsValue {
        if id == ObjectId::ROOT.0 {
            return Failure::new("root_not_removable", "the root object cannot be removed").into();
        }
        let h = match self.handle_by_id(id) {
            Ok(h) => h,
            Err(e) => return e,
        };
        match self.inner.remove_object(h) {
            Ok(()) => error::ok(JsValue::from_bool(true)),
            Err(e) => error::from_error(&e),
        }
    }
    pub fn handle_of(&self, id: u32) -> JsValue {
        self.inner.find(ObjectId(id)).map_or(JsValue::NULL, |h| to_js(&h))
    }
    pub fn id_of(&self, handle: JsValue) -> Option<u32> {
        self.handle_arg(&handle).and_then(|h| self.inner.id_of(h)).map(|id| id.0)
    }

    // Tree model
    pub fn row_count(&self, parent: JsValue) -> u32 {
        match parent_handle(&parent) {
            Ok(p) => self.inner.row_count(p) as u32,
            Err(_) => 0,
        }
    }
    pub fn column_count(&self) -> u32 {
        self.inner.column_count() as u32
    }
    pub fn index(&self, row: u32, column: u32, parent: JsValue) -> JsValue {
        let Ok(parent) = parent_handle(&parent) else { return JsValue::NULL };
        self.inner
            .index(row as usize, column as usize, parent)
            .map_or(JsValue::NULL, |h| to_js(&h))
    }
    pub fn parent(&self, handle: JsValue) -> JsValue {
        self.handle_arg(&handle)
            .and_then(|h| self.inner.parent(h))
            .map_or(JsValue::NULL, |h| to_js(&h))
    }
    pub fn data(&self, handle: JsValue) -> Option<String> {
        let h = self.handle_arg(&handle)?;
        self.inner.data(h).map(str::to_owned)
    }
    pub fn set_data(&mut self, handle: JsValue, text: &str) -> bool {
        match self.handle_arg(&handle) {
            Some(h) => self.inner.set_data(h, text),
            None => false,
        }
    }
    pub fn header_data(&self, section: u32) -> Option<String> {
        self.inner.header_data(section as usize).map(str::to_owned)
    }
    pub fn flags(&self, handle: JsValue) -> JsValue {
        let h = parent_handle(&handle).ok().flatten();
        to_js(&self.inner.flags(h))
    }
    pub fn mime_types(&self) -> JsValue {
        to_js(self.inner.mime_types())
    }
    pub fn supported_drop_actions(&self) -> JsValue {
        to_js(self.inner.supported_drop_actions())
    }
    pub fn remove_rows(&mut self, position: u32, count: u32, parent: JsValue) -> bool {
        let Ok(parent) = parent_handle(&parent) else { return false };
        self.inner.remove_rows(position as usize, count as usize, parent).unwrap_or(false)
    }
    pub fn remove_rows_res(&mut self, position: u32, count: u32, parent: JsValue) -> JsValue {
        let parent = match parent_handle(&parent) {
            Ok(p) => p,
            Err(e) => return error::invalid_handle(e.to_string()),
        };
        match self.inner.remove_rows(position as usize, count as usize, parent) {
            Ok(done) => error::ok(JsValue::from_bool(done)),
            Err(e) => error::from_error(&e),
        }
    }

    // Selection and routed input
    pub fn select(&mut self, id: u32) -> bool {
        match self.inner.find(ObjectId(id)) {
            Some(h) => self.inner.select(h).unwrap_or(false),
            None => false,
        }
    }
    pub fn deselect(&mut self, id: u32) -> bool {
        match self.inner.find(ObjectId(id)) {
            Some(h) => self.inner.deselect(h).unwrap_or(false),
            None => false,
        }
    }
    pub fn clear_selection(&mut self) -> bool {
        self.inner.clear_selection()
    }
    pub fn selected_ids(&self) -> Uint32Array {
        Uint32Array::from(self.ids_of(&self.inner.selected()).as_slice())
    }
    /// `event` is an `Interaction` in document coordinates.
    pub fn process_interaction(&mut self, event: JsValue) -> bool {
        match serde_wasm_bindgen::from_value::<Interaction>(event) {
            Ok(ev) => self.inner.process_interaction(&ev),
            Err(_) => false,
        }
    }
    pub fn process_interaction_res(&mut self, event: JsValue) -> JsValue {
        let ev = match serde_wasm_bindgen::from_value::<Interaction>(event) {
            Ok(ev) => ev,
            Err(e) => return error::invalid_argument("event", e.to_string()),
        };
        if !ev.position.is_finite() {
            return error::non_finite("position");
        }
        if ev.delta.map_or(false, |d| !d.is_finite()) {
            return error::non_finite("delta");
        }
        error::ok(JsValue::from_bool(self.inner.process_interaction(&ev)))
    }
    /// Left-button press at device position (`x`, `y`).
    pub fn pointer_press(&mut self, x: f32, y: f32, double: bool, shift: bool, control: bool) -> bool {
        let click = if double { ClickKind::DoubleClick } else { ClickKind::SingleClick };
        let modifiers = Modifiers { shift, control, ..Modifiers::default() };
        let pos = self.view.to_document(Vec2::new(x, y));
        self.inner.process_interaction(&Interaction::press(MouseButton::Left, pos, click, modifiers))
    }
    pub fn pointer_release(&mut self, x: f32, y: f32) -> bool {
        let pos = self.view.to_document(Vec2::new(x, y));
        self.inner.process_interaction(&Interaction::release(MouseButton::Left, pos))
    }
    /// Pointer motion by device offset (`dx`, `dy`).
    pub fn pointer_move(&mut self, x: f32, y: f32, dx: f32, dy: f32) -> bool {
        let pos = self.view.to_document(Vec2::new(x, y));
        let delta = self.view.to_document_delta(Vec2::new(dx, dy));
        self.inner.process_interaction(&Interaction::moved(pos, delta))
    }
    pub fn insert_point(&mut self, x: f32, y: f32) -> bool {
        self.inner.insert(Vec2::new(x, y))
    }
    pub fn insert_point_res(&mut self, x: f32, y: f32) -> JsValue {
        if !x.is_finite() {
            return error::non_finite("x");
        }
        if !y.is_finite() {
            return error::non_finite("y");
        }
        if !in_bounds(x) {
            return error::out_of_range("x", limits::COORD_MIN, limits::COORD_MAX, x);
        }
        if !in_bounds(y) {
            return error::out_of_range("y", limits::COORD_MIN, limits::COORD_MAX, y);
        }
        error::ok(JsValue::from_bool(self.inner.insert(Vec2::new(x, y))))
    }
    pub fn remove_selected_points(&mut self) -> bool {
        self.inner.remove_selected()
    }
    pub fn remove_point_at(&mut self, x: f32, y: f32) -> bool {
        self.inner.remove_at(Vec2::new(x, y))
    }

    // Viewport
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        if width.is_finite() && height.is_finite() {
            self.view = ViewTransform::centered(width, height);
        }
    }
    pub fn pan(&mut self, dx: f32, dy: f32) {
        if dx.is_finite() && dy.is_finite() {
            self.view.pan(Vec2::new(dx, dy));
        }
    }
    pub fn zoom_at(&mut self, x: f32, y: f32, factor: f32) {
        self.view.zoom_at(Vec2::new(x, y), factor);
    }
    pub fn to_document(&self, x: f32, y: f32) -> Float32Array {
        let p = self.view.to_document(Vec2::new(x, y));
        Float32Array::from(&[p.x, p.y][..])
    }

    // Typed array getters
    pub fn get_point_data(&self, id: u32) -> JsValue {
        let Some(points) = self
            .inner
            .find(ObjectId(id))
            .and_then(|h| self.inner.object(h))
            .and_then(|o| o.as_points())
        else {
            return JsValue::NULL;
        };
        let mut keys = Vec::with_capacity(points.points().len());
        let mut pos = Vec::with_capacity(points.points().len() * 2);
        let mut selected = Vec::with_capacity(points.points().len());
        for p in points.points() {
            keys.push(p.key.0);
            pos.push(p.position.x);
            pos.push(p.position.y);
            selected.push(p.selected as u8);
        }
        js_object(&[
            ("keys", Uint32Array::from(keys.as_slice()).into()),
            ("positions", Float32Array::from(pos.as_slice()).into()),
            ("selected", Uint8Array::from(selected.as_slice()).into()),
        ])
        .into()
    }
    pub fn to_svg_paths(&self) -> JsValue {
        let mut painter = SvgPainter::new();
        self.inner.draw(&mut painter);
        to_js(&painter.into_path_strings())
    }
    pub fn to_json(&self) -> JsValue {
        to_js(&self.inner.to_json_value())
    }
    pub fn take_events(&mut self) -> JsValue {
        to_js(&self.inner.take_events())
    }

    // Persistence
    pub fn save(&self) -> Option<Uint8Array> {
        self.inner.save().ok().map(|b| Uint8Array::from(b.as_slice()))
    }
    pub fn save_res(&self) -> JsValue {
        match self.inner.save() {
            Ok(bytes) => error::ok(Uint8Array::from(bytes.as_slice()).into()),
            Err(e) => error::from_error(&e),
        }
    }
    pub fn load(&mut self, bytes: &[u8]) -> bool {
        self.drag = None;
        self.inner.load(bytes).is_ok()
    }
    pub fn load_res(&mut self, bytes: &[u8]) -> JsValue {
        self.drag = None;
        match self.inner.load(bytes) {
            Ok(()) => error::ok(JsValue::from_f64(self.inner.object_count() as f64)),
            Err(e) => error::from_error(&e),
        }
    }

    // Clipboard and drag-and-drop
    pub fn copy(&self, ids: Vec<u32>) -> JsValue {
        let Ok(handles) = self.handles_by_id(&ids) else { return JsValue::NULL };
        self.inner.copy(&handles).map_or(JsValue::NULL, |p| payload_js(&p))
    }
    pub fn cut(&mut self, ids: Vec<u32>) -> JsValue {
        let Ok(handles) = self.handles_by_id(&ids) else { return JsValue::NULL };
        self.inner.cut(&handles).map_or(JsValue::NULL, |p| payload_js(&p))
    }
    pub fn paste(&mut self, format: &str, bytes: &[u8], parent: Option<u32>, row: Option<u32>) -> Option<Uint32Array> {
        self.paste_inner(format, bytes, parent, row).ok().map(|ids| Uint32Array::from(ids.as_slice()))
    }
    pub fn paste_res(&mut self, format: &str, bytes: &[u8], parent: Option<u32>, row: Option<u32>) -> JsValue {
        match self.paste_inner(format, bytes, parent, row) {
            Ok(ids) => error::ok(Uint32Array::from(ids.as_slice()).into()),
            Err(e) => e,
        }
    }
    /// Begin a drag of `ids`; replaces any drag in progress. Returns the
    /// payload to hand to the host's drag machinery.
    pub fn start_drag(&mut self, ids: Vec<u32>) -> JsValue {
        let Ok(handles) = self.handles_by_id(&ids) else { return JsValue::NULL };
        match self.inner.start_drag(&handles) {
            Ok(session) => {
                let js = payload_js(&session.payload);
                self.drag = Some(session);
                js
            }
            Err(_) => JsValue::NULL,
        }
    }
    pub fn cancel_drag(&mut self) {
        self.drag = None;
    }
    pub fn drop_data(&mut self, format: &str, bytes: &[u8], action: &str, row: Option<u32>, column: u32, parent: Option<u32>) -> bool {
        self.drop_inner(format, bytes, action, row, column, parent).unwrap_or(false)
    }
    pub fn drop_data_res(&mut self, format: &str, bytes: &[u8], action: &str, row: Option<u32>, column: u32, parent: Option<u32>) -> JsValue {
        match self.drop_inner(format, bytes, action, row, column, parent) {
            Ok(accepted) => error::ok(JsValue::from_bool(accepted)),
            Err(e) => e,
        }
    }
}
