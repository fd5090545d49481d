//! Errors raised while building a level or loading configuration
//!
//! Per-tick logic never fails; anything it cannot resolve is skipped for
//! that tick. Only construction-time invariant violations surface here.

use thiserror::Error;

use crate::sim::Entity;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("tile grid width must be non-zero")]
    ZeroWidth,
    #[error("tile grid has {len} cells, which is not a multiple of width {width}")]
    RaggedGrid { width: u32, len: usize },
    #[error("level `{level}` has no actor object")]
    MissingActor { level: String },
    #[error("level `{level}` defines object id `{id}` more than once")]
    DuplicateObjectId { level: String, id: String },
    #[error("entity {entity:?} already has a row in the {table} table")]
    DuplicateComponent { entity: Entity, table: &'static str },
    #[error("level playlist is empty")]
    EmptyPlaylist,
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
