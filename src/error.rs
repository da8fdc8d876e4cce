use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading a CLEF corpus.
///
/// Only missing required inputs and unreadable files are surfaced here.
/// Malformed feature rows and unresolved concept codes are skipped by the
/// catalogs and never reach the caller.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("{} does not exist", .path.display())]
    MissingPath { path: PathBuf },

    #[error("{} is not a directory", .path.display())]
    NotADirectory { path: PathBuf },

    #[error("{}:{line}: concept code '{value}' is not an integer", .path.display())]
    ConceptCode {
        path: PathBuf,
        line: u64,
        value: String,
    },

    #[error("{}: {message}", .path.display())]
    Matrix { path: PathBuf, message: String },

    #[error("{}: no array named '{name}'", .path.display())]
    MissingArray { path: PathBuf, name: String },

    #[error("I/O error on {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read table {}", .path.display())]
    Table {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl CorpusError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CorpusError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, CorpusError>;
