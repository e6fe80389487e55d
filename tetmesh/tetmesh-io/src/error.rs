//! Failures while reading or writing mesh files.

use std::path::PathBuf;

use tetmesh_types::MeshError;
use thiserror::Error;

/// Shorthand used across the readers and writers.
pub type IoResult<T> = Result<T, IoError>;

/// Why a load or save failed.
#[derive(Debug, Error)]
pub enum IoError {
    /// The input path does not exist.
    #[error("no such mesh file: {path}")]
    FileNotFound {
        /// Requested path.
        path: PathBuf,
    },

    /// The extension maps to no supported format.
    #[error("cannot infer mesh format from extension `{extension}`")]
    UnknownFormat {
        /// Extension as given, without the dot.
        extension: String,
    },

    /// The text does not follow the format.
    #[error("malformed mesh file: {message}")]
    InvalidContent {
        /// Location and reason.
        message: String,
    },

    /// File ended in the middle of a section.
    #[error("unexpected end of file: expected {expected}")]
    UnexpectedEof {
        /// What the parser was looking for.
        expected: String,
    },

    /// The file holds no tetrahedral element block.
    #[error("no tetrahedra found in mesh file")]
    NoTetrahedra,

    /// An auxiliary field does not match the mesh size.
    #[error("field `{name}` has {got} entries, expected {expected}")]
    FieldLength {
        /// Field name.
        name: String,
        /// Entries required by the mesh.
        expected: usize,
        /// Entries supplied.
        got: usize,
    },

    /// The target format cannot store auxiliary fields.
    #[error("{format} output cannot carry auxiliary fields")]
    FieldsUnsupported {
        /// Name of the format.
        format: &'static str,
    },

    /// The loaded mesh violates the data-model invariants.
    #[error("invalid mesh data: {0}")]
    Mesh(#[from] MeshError),

    /// Underlying read or write failure.
    #[error("mesh file I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

impl IoError {
    /// Shorthand for [`IoError::InvalidContent`].
    #[must_use]
    pub fn invalid_content(message: impl Into<String>) -> Self {
        Self::InvalidContent {
            message: message.into(),
        }
    }
}
