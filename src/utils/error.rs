//! Error handling for idlgen

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Generator error
#[derive(Error, Debug)]
pub enum Error {
    // ==================== Registry Errors ====================

    #[error("Unsupported target: {id}")]
    UnsupportedTarget { id: String },

    #[error("Target already registered: {id}")]
    DuplicateTarget { id: String },

    #[error("Invalid option for {target}: {message}")]
    InvalidOption { target: String, message: String },

    // ==================== Type Resolution Errors ====================

    #[error("Typedef cycle: {chain}")]
    TypedefCycle { chain: String },

    #[error("Unresolved type: {name}")]
    UnresolvedType { name: String },

    // ==================== Generation Errors ====================

    #[error("Generator for program {program} has already run")]
    AlreadyGenerated { program: String },

    #[error("Invalid AST: {0}")]
    InvalidAst(#[from] serde_json::Error),

    #[error("IO error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Code generation error: {0}")]
    CodeGen(String),
}

impl Error {
    /// Wrap an I/O error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the error comes from looking up or configuring a target
    pub fn is_target_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedTarget { .. } | Self::DuplicateTarget { .. } | Self::InvalidOption { .. }
        )
    }
}
