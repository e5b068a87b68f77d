use thiserror::Error;

use crate::api::types::DiagramKind;

/// Configuration-time failures.
///
/// Interaction paths (pointer events, ticks) never return these; they recover
/// locally and log instead. Only mounting, loading catalogs/presets/config and
/// switching to a named preset can fail.
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("unknown preset `{0}`")]
    UnknownPreset(String),

    #[error("preset `{preset}` is a {found:?} layout, board is {expected:?}")]
    KindMismatch {
        preset: String,
        expected: DiagramKind,
        found: DiagramKind,
    },

    #[error("zone `{name}` (center {x}, {y}, radius {radius}) leaves the surface")]
    ZoneOutOfBounds {
        name: String,
        x: f32,
        y: f32,
        radius: f32,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}
