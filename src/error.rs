use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures while loading topology files or producing the figure.
///
/// Line numbers are 1-based and refer to the original input file.
#[derive(Debug, Error)]
pub enum TopoError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}:{line}: record has no field {field}", path.display())]
    MissingField {
        path: PathBuf,
        line: usize,
        field: usize,
    },

    #[error("{}:{line}: '{token}' is not a number", path.display())]
    InvalidNumber {
        path: PathBuf,
        line: usize,
        token: String,
    },

    #[error("{}:{line}: expected at least 2 coordinates, found {found}", path.display())]
    TooFewCoordinates {
        path: PathBuf,
        line: usize,
        found: usize,
    },

    #[error(
        "{}:{line}: row has {found} coordinates but earlier rows have {expected}",
        path.display()
    )]
    RaggedRows {
        path: PathBuf,
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("{}: no records found", path.display())]
    Empty { path: PathBuf },

    #[error("unknown color '{0}'")]
    UnknownColor(String),

    #[error("font {}: {reason}", path.display())]
    Font { path: PathBuf, reason: String },

    #[error("drawing failed: {0}")]
    Draw(String),

    #[error("encoding {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl TopoError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        TopoError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Adapter for plotters' backend-generic error types.
pub(crate) fn draw_err<E: std::fmt::Display>(e: E) -> TopoError {
    TopoError::Draw(e.to_string())
}
