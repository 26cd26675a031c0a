//! Error types for pipewright
//!
//! Uses `thiserror` for library errors; the binary boundary wraps these
//! in `anyhow` for reporting.
//!
//! Validation failures are intentionally *not* represented here - they are
//! recorded per definition in the publish report so one bad definition
//! never aborts the rest of the batch.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pipewright operations
pub type PipewrightResult<T> = Result<T, PipewrightError>;

/// Main error type for pipewright operations
#[derive(Error, Debug)]
pub enum PipewrightError {
    /// No `.git` marker found in any parent directory
    #[error("repository root not found above {} - no .git in any parent directory", .path.display())]
    RepoRootNotFound { path: PathBuf },

    /// A registered definition constructor failed
    #[error("failed to construct definition '{name}': {message}")]
    DefinitionConstruction { name: String, message: String },

    /// Template file is structurally invalid
    #[error("invalid template {}: {message}", .file.display())]
    InvalidTemplate { file: PathBuf, message: String },

    /// No stages/jobs/steps/variables key to infer the category from
    #[error(
        "unable to infer the category of template {} from its contents - \
         it must contain one of: stages, jobs, steps, variables",
        .file.display()
    )]
    UnknownTemplateCategory { file: PathBuf },

    /// A previously generated file no longer has the expected shape
    #[error("generated file is malformed: {message}")]
    MalformedGeneratedFile { message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}
