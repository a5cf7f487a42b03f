//! Result envelopes returned by the `_res` methods:
//! `{ ok: true, value }` or `{ ok: false, error: { code, message, data? } }`.

use crate::interop::js_object;
use splinetree::{CodecError, ConfigError, Error, TreeError};
use wasm_bindgen::prelude::*;

pub fn ok(value: JsValue) -> JsValue {
    js_object(&[("ok", JsValue::TRUE), ("value", value)]).into()
}

/// The error half of an envelope. `data` fields are only emitted when set.
pub struct Failure {
    code: &'static str,
    message: String,
    data: Vec<(&'static str, JsValue)>,
}

impl Failure {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Failure { code, message: message.into(), data: Vec::new() }
    }

    pub fn with(mut self, key: &'static str, value: impl Into<JsValue>) -> Self {
        self.data.push((key, value.into()));
        self
    }
}

impl From<Failure> for JsValue {
    fn from(f: Failure) -> JsValue {
        let mut body = vec![("code", JsValue::from_str(f.code)), ("message", JsValue::from(f.message))];
        if !f.data.is_empty() {
            body.push(("data", js_object(&f.data).into()));
        }
        js_object(&[("ok", JsValue::FALSE), ("error", js_object(&body).into())]).into()
    }
}

pub fn non_finite(param: &str) -> JsValue {
    Failure::new("non_finite", format!("parameter '{}' must be finite", param)).with("param", param).into()
}

pub fn out_of_range(param: &str, min: f32, max: f32, got: f32) -> JsValue {
    Failure::new("out_of_range", format!("parameter '{}' out of range", param))
        .with("param", param)
        .with("min", min)
        .with("max", max)
        .with("got", got)
        .into()
}

pub fn invalid_id(id: u32) -> JsValue {
    Failure::new("invalid_id", format!("no object with id {}", id)).with("id", id).into()
}

pub fn invalid_handle(message: impl Into<String>) -> JsValue {
    Failure::new("invalid_handle", message).into()
}

pub fn invalid_argument(param: &str, message: impl Into<String>) -> JsValue {
    Failure::new("invalid_argument", message).with("param", param).into()
}

/// Map a core error to its envelope.
pub fn from_error(e: &Error) -> JsValue {
    let message = e.to_string();
    match e {
        Error::Tree(TreeError::RootNotRemovable) => Failure::new("root_not_removable", message).into(),
        Error::Tree(TreeError::StaleHandle(_)) => invalid_handle(message),
        Error::Tree(TreeError::RowOutOfRange { row, len }) => {
            out_of_range("row", 0.0, *len as f32, *row as f32)
        }
        Error::Tree(TreeError::LimitExceeded(what)) | Error::Codec(CodecError::LimitExceeded(what)) => {
            Failure::new("limit_exceeded", message).with("limit", *what).into()
        }
        Error::Codec(CodecError::NotRoot(_)) => Failure::new("not_root", message).into(),
        Error::Codec(_) => Failure::new("format_error", message).into(),
        Error::Config(ConfigError::PickRadius { got, max }) => Failure::new("invalid_config", message)
            .with("param", "pick_radius")
            .with("got", *got)
            .with("max", *max)
            .into(),
        Error::Config(ConfigError::Json(_)) => Failure::new("invalid_config", message).into(),
    }
}
