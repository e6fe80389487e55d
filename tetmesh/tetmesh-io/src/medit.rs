//! Medit ASCII `.mesh` format.
//!
//! Keyword-driven sections with a count followed by entries; element
//! indices are 1-based and every entry ends with an integer reference tag.
//! The tetrahedron tags become [`TetMesh::regions`].

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use tetmesh_types::{Point3, TetMesh};
use tracing::debug;

use crate::lexer::Tokens;
use crate::{IoError, IoResult, open_input};

/// Number of integer tokens (indices plus reference) per entry for the
/// element sections a reader may skip.
fn skipped_section_width(keyword: &str) -> Option<usize> {
    match keyword {
        "Corners" | "RequiredVertices" | "Ridges" | "RequiredEdges" => Some(1),
        "Edges" => Some(3),
        "Triangles" => Some(4),
        "Quadrilaterals" => Some(5),
        "Prisms" => Some(7),
        "Hexahedra" => Some(9),
        "Normals" | "Tangents" => Some(3),
        "NormalAtVertices" | "TangentAtVertices" => Some(2),
        _ => None,
    }
}

/// Load a tetrahedral mesh from a Medit `.mesh` file.
///
/// Non-tetrahedral sections are skipped. Region tags are kept unless every
/// tetrahedron has tag 0.
///
/// # Errors
///
/// - [`IoError::FileNotFound`] / [`IoError::Io`] if the file cannot be read
/// - [`IoError::InvalidContent`] / [`IoError::UnexpectedEof`] for malformed content
/// - [`IoError::NoTetrahedra`] if there is no `Tetrahedra` section
/// - [`IoError::Mesh`] if an element references a missing vertex
pub fn load_medit<P: AsRef<Path>>(path: P) -> IoResult<TetMesh> {
    let mut text = String::new();
    open_input(path.as_ref())?.read_to_string(&mut text)?;
    parse_medit(&text)
}

/// Parse Medit `.mesh` text.
///
/// # Errors
///
/// Same as [`load_medit`], minus the file errors.
pub fn parse_medit(text: &str) -> IoResult<TetMesh> {
    let mut tokens = Tokens::new(text);
    let mut vertices: Option<Vec<Point3<f64>>> = None;
    let mut tetrahedra: Option<(Vec<[u32; 4]>, Vec<i32>)> = None;

    while let Some(keyword) = tokens.next_token() {
        match keyword {
            "MeshVersionFormatted" => {
                let version: u32 = tokens.parse("format version")?;
                if version > 2 {
                    return Err(tokens.error(format!("unsupported Medit version {version}")));
                }
            }
            "Dimension" => {
                let dim: u32 = tokens.parse("dimension")?;
                if dim != 3 {
                    return Err(tokens.error(format!("only 3D meshes are supported, got {dim}D")));
                }
            }
            "Vertices" => {
                let count: usize = tokens.parse("vertex count")?;
                let mut points = Vec::with_capacity(tokens.capacity_for(count, 4));
                for _ in 0..count {
                    let x = tokens.parse("x coordinate")?;
                    let y = tokens.parse("y coordinate")?;
                    let z = tokens.parse("z coordinate")?;
                    tokens.skip(1, "vertex reference")?;
                    points.push(Point3::new(x, y, z));
                }
                vertices = Some(points);
            }
            "Tetrahedra" => {
                let count: usize = tokens.parse("tetrahedron count")?;
                let mut tets = Vec::with_capacity(tokens.capacity_for(count, 5));
                let mut refs = Vec::with_capacity(tokens.capacity_for(count, 5));
                for _ in 0..count {
                    let mut tet = [0u32; 4];
                    for slot in &mut tet {
                        let one_based: u32 = tokens.parse("vertex index")?;
                        *slot = one_based
                            .checked_sub(1)
                            .ok_or_else(|| tokens.error("vertex index 0 in 1-based Medit data"))?;
                    }
                    tets.push(tet);
                    refs.push(tokens.parse("tetrahedron reference")?);
                }
                tetrahedra = Some((tets, refs));
            }
            "End" => break,
            other => {
                let Some(width) = skipped_section_width(other) else {
                    return Err(tokens.error(format!("unknown keyword `{other}`")));
                };
                let count: usize = tokens.parse("entry count")?;
                let total = count
                    .checked_mul(width)
                    .ok_or_else(|| tokens.error(format!("{other} count {count} is too large")))?;
                tokens.skip(total, other)?;
                debug!(section = other, count, "skipped Medit section");
            }
        }
    }

    let (tets, refs) = tetrahedra.ok_or(IoError::NoTetrahedra)?;
    let mut mesh = TetMesh::from_parts(vertices.unwrap_or_default(), tets);
    if refs.iter().any(|&r| r != 0) {
        mesh.regions = Some(refs);
    }
    mesh.validate()?;

    debug!(
        vertices = mesh.vertices.len(),
        elements = mesh.tetrahedra.len(),
        "parsed Medit mesh"
    );
    Ok(mesh)
}

/// Save a tetrahedral mesh as a Medit `.mesh` file.
///
/// Coordinates are written with round-trip precision. Elements without
/// region tags get tag 0.
///
/// # Errors
///
/// Returns [`IoError::Mesh`] for an invalid mesh or [`IoError::Io`] if the
/// file cannot be written.
pub fn save_medit<P: AsRef<Path>>(mesh: &TetMesh, path: P) -> IoResult<()> {
    mesh.validate()?;
    let mut writer = BufWriter::new(File::create(path)?);
    write_medit(mesh, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Write Medit `.mesh` text to any writer.
///
/// # Errors
///
/// Returns [`IoError::Io`] if writing fails.
pub fn write_medit<W: Write>(mesh: &TetMesh, mut writer: W) -> IoResult<()> {
    writeln!(writer, "MeshVersionFormatted 2")?;
    writeln!(writer)?;
    writeln!(writer, "Dimension 3")?;
    writeln!(writer)?;

    writeln!(writer, "Vertices")?;
    writeln!(writer, "{}", mesh.vertices.len())?;
    for v in &mesh.vertices {
        writeln!(writer, "{} {} {} 0", v.x, v.y, v.z)?;
    }
    writeln!(writer)?;

    writeln!(writer, "Tetrahedra")?;
    writeln!(writer, "{}", mesh.tetrahedra.len())?;
    for (i, &[a, b, c, d]) in mesh.tetrahedra.iter().enumerate() {
        let tag = mesh.region(i).unwrap_or(0);
        writeln!(writer, "{} {} {} {} {tag}", a + 1, b + 1, c + 1, d + 1)?;
    }
    writeln!(writer)?;

    writeln!(writer, "End")?;
    Ok(())
}
