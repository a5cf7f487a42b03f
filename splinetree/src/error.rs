//! Error types for document operations.

use crate::model::ObjectId;
use crate::tree::NodeKey;
use thiserror::Error;

/// Structural precondition violations: the caller addressed something that
/// does not exist or may not be touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("the root object cannot be removed")]
    RootNotRemovable,

    #[error("handle {0:?} does not refer to a live object")]
    StaleHandle(NodeKey),

    #[error("row {row} is out of range for a parent with {len} children")]
    RowOutOfRange { row: usize, len: usize },

    #[error("insertion would exceed the {0} limit")]
    LimitExceeded(&'static str),
}

/// Format errors raised while decoding a byte stream. Any of these aborts the
/// decode and discards whatever was built so far.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("unexpected end of stream")]
    UnexpectedEnd,

    #[error("invalid UTF-8 string in stream")]
    InvalidString,

    #[error("unknown object kind '{0}'")]
    UnknownKind(String),

    #[error("document stream must start with a Root object, found '{0}'")]
    NotRoot(String),

    #[error("{0} trailing bytes after the encoded data")]
    TrailingBytes(usize),

    #[error("stream exceeds the {0} limit")]
    LimitExceeded(&'static str),

    #[error("non-finite or out of range coordinate")]
    InvalidCoordinate,

    #[error("object id {0} appears more than once")]
    DuplicateId(ObjectId),

    #[error("transfer payload has format '{0}'")]
    WrongFormat(String),
}

/// Invalid configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("pick_radius must be finite and in (0, {max}], got {got}")]
    PickRadius { got: f32, max: f32 },

    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
