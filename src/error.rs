use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while turning a uVision project into a model.
///
/// Only [`MalformedDocument`](UvprojError::MalformedDocument),
/// [`MissingNode`](UvprojError::MissingNode),
/// [`UnresolvedToolchain`](UvprojError::UnresolvedToolchain) and the I/O
/// variants ever reach a caller.  The remaining variants are produced, logged
/// and absorbed by the component that hit them.
#[derive(Error, Debug)]
pub enum UvprojError {
    #[error("XML Error: {0}")]
    MalformedDocument(String),

    #[error("missing node <{path}> in project document")]
    MissingNode { path: String },

    #[error("no toolchain for project file '{}' (expected .uvproj or .uvprojx)", path.display())]
    UnresolvedToolchain { path: PathBuf },

    #[error("toolchain installation not found at '{}'", path.display())]
    ExternalToolUnavailable { path: PathBuf },

    #[error("macro discovery with '{}' failed: {reason}", compiler.display())]
    MacroDiscoveryFailed { compiler: PathBuf, reason: String },

    #[error("cannot persist '{}': {reason}", path.display())]
    PersistenceWriteFailed { path: PathBuf, reason: String },

    #[error("settings error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("watch error: {0}")]
    Watch(#[from] notify::Error),
}

impl UvprojError {
    pub fn missing(path: impl Into<String>) -> Self {
        Self::MissingNode { path: path.into() }
    }
}

impl From<roxmltree::Error> for UvprojError {
    fn from(error: roxmltree::Error) -> Self {
        Self::MalformedDocument(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, UvprojError>;
