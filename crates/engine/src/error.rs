//! Error types for the trail engine

use crate::animation::LoopState;

/// Engine-level error
#[derive(Debug, thiserror::Error)]
pub enum TrailError {
    /// The host could not provide a drawing context for the surface
    #[error("drawing context unavailable: {0}")]
    ContextUnavailable(String),
    #[error("unknown effect: {0}")]
    UnknownEffect(String),
    #[error("invalid color {input:?}: {reason}")]
    InvalidColor { input: String, reason: &'static str },
    #[error("invalid option `{name}`: {reason}")]
    InvalidOption { name: &'static str, reason: String },
    #[error("failed to parse TOML options: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("failed to parse JSON options: {0}")]
    Json(#[from] serde_json::Error),
    /// Lifecycle call made from the wrong loop state
    #[error("animation loop is {0:?}")]
    LoopState(LoopState),
}

pub type Result<T> = std::result::Result<T, TrailError>;
