//! Tetrahedral mesh file I/O.
//!
//! This crate provides loading and saving of tetrahedral meshes in two ASCII
//! formats:
//!
//! - **Medit** (`.mesh`) - `Vertices` / `Tetrahedra` sections with reference tags
//! - **Legacy VTK** (`.vtk`) - `UNSTRUCTURED_GRID` with optional point and cell data
//!
//! Region tags ([`TetMesh::regions`]) survive a round trip through either
//! format. Files without a tetrahedral block fail with
//! [`IoError::NoTetrahedra`]; every loaded mesh is index-validated.
//!
//! # Example
//!
//! ```no_run
//! use tetmesh_io::{load_mesh, save_mesh};
//!
//! // Format detected from the .mesh extension
//! let mesh = load_mesh("rve.mesh").unwrap();
//!
//! // Save it as VTK for inspection
//! save_mesh(&mesh, "rve.vtk").unwrap();
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod error;
mod field;
mod lexer;
mod medit;
mod vtk;

pub use error::{IoError, IoResult};
pub use field::{FieldData, FieldLocation, FieldValues};
pub use medit::{load_medit, parse_medit, save_medit, write_medit};
pub use vtk::{
    REGION_FIELD, VTK_TETRA, VtkMesh, load_vtk, load_vtk_with_fields, parse_vtk, save_vtk,
    write_vtk,
};

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tetmesh_types::TetMesh;

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshFormat {
    /// Medit ASCII `.mesh`.
    Medit,
    /// Legacy VTK ASCII `.vtk`.
    Vtk,
}

impl MeshFormat {
    /// Detect format from file extension.
    ///
    /// Returns `None` if the extension is not recognized.
    #[must_use]
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "mesh" => Some(Self::Medit),
            "vtk" => Some(Self::Vtk),
            _ => None,
        }
    }

    /// Get the canonical file extension for this format.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Medit => "mesh",
            Self::Vtk => "vtk",
        }
    }

    fn detect(path: &Path) -> IoResult<Self> {
        Self::from_path(path).ok_or_else(|| IoError::UnknownFormat {
            extension: path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("(none)")
                .to_string(),
        })
    }
}

/// Open a file for reading, mapping a missing file to [`IoError::FileNotFound`].
pub(crate) fn open_input(path: &Path) -> IoResult<BufReader<File>> {
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IoError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IoError::Io(e)
        }
    })?;
    Ok(BufReader::new(file))
}

/// Load a mesh from a file, detecting format from extension.
///
/// # Errors
///
/// Returns an error if:
/// - The file format cannot be determined from the extension
/// - The file cannot be read
/// - The file content is invalid or holds no tetrahedra
pub fn load_mesh<P: AsRef<Path>>(path: P) -> IoResult<TetMesh> {
    let path = path.as_ref();
    match MeshFormat::detect(path)? {
        MeshFormat::Medit => load_medit(path),
        MeshFormat::Vtk => load_vtk(path),
    }
}

/// Save a mesh to a file, detecting format from extension.
///
/// # Errors
///
/// Returns an error if:
/// - The file format cannot be determined from the extension
/// - The mesh has dangling indices
/// - The file cannot be written
pub fn save_mesh<P: AsRef<Path>>(mesh: &TetMesh, path: P) -> IoResult<()> {
    save_mesh_with_fields(mesh, &[], path)
}

/// Save a mesh with auxiliary data arrays, detecting format from extension.
///
/// # Errors
///
/// As [`save_mesh`], plus [`IoError::FieldsUnsupported`] when `fields` is
/// non-empty and the format is Medit, and [`IoError::FieldLength`] when a
/// field does not match the mesh size.
pub fn save_mesh_with_fields<P: AsRef<Path>>(
    mesh: &TetMesh,
    fields: &[FieldData],
    path: P,
) -> IoResult<()> {
    let path = path.as_ref();
    match MeshFormat::detect(path)? {
        MeshFormat::Medit if !fields.is_empty() => Err(IoError::FieldsUnsupported { format: "Medit" }),
        MeshFormat::Medit => save_medit(mesh, path),
        MeshFormat::Vtk => save_vtk(mesh, fields, path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_path() {
        assert_eq!(MeshFormat::from_path("rve.mesh"), Some(MeshFormat::Medit));
        assert_eq!(MeshFormat::from_path("RVE.MESH"), Some(MeshFormat::Medit));
        assert_eq!(
            MeshFormat::from_path("/path/to/out.vtk"),
            Some(MeshFormat::Vtk)
        );
        assert_eq!(MeshFormat::from_path("model.xdmf"), None);
        assert_eq!(MeshFormat::from_path("no_extension"), None);
    }

    #[test]
    fn extension_roundtrip() {
        for format in [MeshFormat::Medit, MeshFormat::Vtk] {
            let name = format!("x.{}", format.extension());
            assert_eq!(MeshFormat::from_path(name), Some(format));
        }
    }

    #[test]
    fn unknown_format_error() {
        let err = load_mesh("model.stl").unwrap_err();
        assert!(matches!(err, IoError::UnknownFormat { extension } if extension == "stl"));
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            load_mesh("/definitely/not/here.mesh"),
            Err(IoError::FileNotFound { .. })
        ));
    }
}
