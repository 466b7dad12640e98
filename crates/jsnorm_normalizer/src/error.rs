//! Per-file failures of the normalization pipeline.

use jsnorm_diagnostics::Diagnostic;
use jsnorm_parser::ParseError;
use jsnorm_rewrite::InvariantViolation;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why a file produced no output.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("{}{error}", path.display())]
    Parse { path: PathBuf, error: ParseError },

    #[error("{}: {error}", path.display())]
    Invariant {
        path: PathBuf,
        #[source]
        error: InvariantViolation,
    },

    #[error("cannot access '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("'{}' is not valid UTF-8 (first bad byte at offset {valid_up_to})", path.display())]
    InvalidUtf8 { path: PathBuf, valid_up_to: usize },
}

impl NormalizeError {
    pub fn path(&self) -> &Path {
        match self {
            NormalizeError::Parse { path, .. }
            | NormalizeError::Invariant { path, .. }
            | NormalizeError::Io { path, .. }
            | NormalizeError::InvalidUtf8 { path, .. } => path,
        }
    }

    /// Process exit status for this failure: 2 for engine defects, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        match self {
            NormalizeError::Invariant { .. } => 2,
            _ => 1,
        }
    }

    /// The parse failure as a located diagnostic.
    pub fn to_diagnostic(&self) -> Option<Diagnostic> {
        match self {
            NormalizeError::Parse { path, error } => {
                Some(error.to_diagnostic(&path.display().to_string()))
            }
            _ => None,
        }
    }
}
