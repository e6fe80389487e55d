//! Legacy VTK ASCII `.vtk` format (`UNSTRUCTURED_GRID`).
//!
//! Tetrahedra are VTK cell type 10. Region tags travel as the integer cell
//! scalar `region`; any other point or cell arrays are carried as
//! [`FieldData`].

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use tetmesh_types::{Point3, TetMesh};
use tracing::debug;

use crate::lexer::Tokens;
use crate::{FieldData, FieldLocation, FieldValues, IoError, IoResult, open_input};

/// VTK cell type id of a linear tetrahedron.
pub const VTK_TETRA: u32 = 10;

/// Name of the cell scalar holding region tags.
pub const REGION_FIELD: &str = "region";

/// A mesh read from a VTK file together with its data arrays.
#[derive(Debug, Clone, PartialEq)]
pub struct VtkMesh {
    /// The tetrahedral mesh. Region tags come from the `region` cell scalar.
    pub mesh: TetMesh,
    /// All other point and cell arrays. Cell arrays are restricted to the
    /// tetrahedral cells, in mesh order.
    pub fields: Vec<FieldData>,
}

/// Load a tetrahedral mesh from a legacy VTK file, discarding extra fields.
///
/// # Errors
///
/// See [`load_vtk_with_fields`].
pub fn load_vtk<P: AsRef<Path>>(path: P) -> IoResult<TetMesh> {
    Ok(load_vtk_with_fields(path)?.mesh)
}

/// Load a tetrahedral mesh and its data arrays from a legacy VTK file.
///
/// Cells other than tetrahedra are skipped.
///
/// # Errors
///
/// - [`IoError::FileNotFound`] / [`IoError::Io`] if the file cannot be read
/// - [`IoError::InvalidContent`] / [`IoError::UnexpectedEof`] for malformed or binary content
/// - [`IoError::NoTetrahedra`] if the grid has no tetrahedral cells
/// - [`IoError::Mesh`] if a cell references a missing point
pub fn load_vtk_with_fields<P: AsRef<Path>>(path: P) -> IoResult<VtkMesh> {
    let mut text = String::new();
    open_input(path.as_ref())?.read_to_string(&mut text)?;
    parse_vtk(&text)
}

#[derive(Default)]
struct RawGrid {
    points: Vec<Point3<f64>>,
    cells: Vec<Vec<u32>>,
    cell_types: Vec<u32>,
    fields: Vec<FieldData>,
}

fn read_values(
    tokens: &mut Tokens<'_>,
    entries: usize,
    components: usize,
    name: &str,
) -> IoResult<FieldValues> {
    match components {
        1 => {
            let mut values = Vec::with_capacity(tokens.capacity_for(entries, 1));
            for _ in 0..entries {
                values.push(tokens.parse(name)?);
            }
            Ok(FieldValues::Scalar(values))
        }
        3 => {
            let mut values = Vec::with_capacity(tokens.capacity_for(entries, 3));
            for _ in 0..entries {
                values.push([tokens.parse(name)?, tokens.parse(name)?, tokens.parse(name)?]);
            }
            Ok(FieldValues::Vector(values))
        }
        n => Err(tokens.error(format!("array `{name}` has {n} components; only 1 or 3 are supported"))),
    }
}

fn parse_grid(tokens: &mut Tokens<'_>) -> IoResult<RawGrid> {
    let mut grid = RawGrid::default();
    let mut location: Option<(FieldLocation, usize)> = None;

    while let Some(keyword) = tokens.next_token() {
        match keyword.to_ascii_uppercase().as_str() {
            "DATASET" => {
                let kind = tokens.expect("dataset type")?;
                if !kind.eq_ignore_ascii_case("UNSTRUCTURED_GRID") {
                    return Err(tokens.error(format!("unsupported dataset `{kind}`")));
                }
            }
            "POINTS" => {
                let count: usize = tokens.parse("point count")?;
                tokens.expect("point data type")?;
                grid.points.reserve(tokens.capacity_for(count, 3));
                for _ in 0..count {
                    let x = tokens.parse("x coordinate")?;
                    let y = tokens.parse("y coordinate")?;
                    let z = tokens.parse("z coordinate")?;
                    grid.points.push(Point3::new(x, y, z));
                }
            }
            "CELLS" => {
                let count: usize = tokens.parse("cell count")?;
                let _size: usize = tokens.parse("cell list size")?;
                grid.cells.reserve(tokens.capacity_for(count, 5));
                for _ in 0..count {
                    let arity: usize = tokens.parse("cell arity")?;
                    let mut cell = Vec::with_capacity(tokens.capacity_for(arity, 1));
                    for _ in 0..arity {
                        cell.push(tokens.parse("point index")?);
                    }
                    grid.cells.push(cell);
                }
            }
            "CELL_TYPES" => {
                let count: usize = tokens.parse("cell type count")?;
                grid.cell_types.reserve(tokens.capacity_for(count, 1));
                for _ in 0..count {
                    grid.cell_types.push(tokens.parse("cell type")?);
                }
            }
            "CELL_DATA" => location = Some((FieldLocation::Cell, tokens.parse("cell data count")?)),
            "POINT_DATA" => location = Some((FieldLocation::Point, tokens.parse("point data count")?)),
            "SCALARS" | "VECTORS" | "FIELD" => {
                let Some((loc, entries)) = location else {
                    return Err(tokens.error(format!("{keyword} outside CELL_DATA/POINT_DATA")));
                };
                let upper = keyword.to_ascii_uppercase();
                if upper == "FIELD" {
                    tokens.expect("field name")?;
                    let arrays: usize = tokens.parse("array count")?;
                    for _ in 0..arrays {
                        let name = tokens.expect("array name")?.to_string();
                        let components: usize = tokens.parse("component count")?;
                        let tuples: usize = tokens.parse("tuple count")?;
                        tokens.expect("array data type")?;
                        let values = read_values(tokens, tuples, components, &name)?;
                        grid.fields.push(FieldData { name, location: loc, values });
                    }
                    continue;
                }

                let name = tokens.expect("array name")?.to_string();
                tokens.expect("array data type")?;
                let components = if upper == "VECTORS" {
                    3
                } else if tokens.peek().is_some_and(|t| t.parse::<usize>().is_ok()) {
                    tokens.parse("component count")?
                } else {
                    1
                };
                if upper == "SCALARS" && tokens.peek().is_some_and(|t| t.eq_ignore_ascii_case("LOOKUP_TABLE")) {
                    tokens.skip(2, "lookup table")?;
                }
                let values = read_values(tokens, entries, components, &name)?;
                grid.fields.push(FieldData { name, location: loc, values });
            }
            other => return Err(tokens.error(format!("unknown keyword `{other}`"))),
        }
    }

    Ok(grid)
}

fn restrict_to(values: &FieldValues, keep: &[bool]) -> FieldValues {
    fn pick<T: Copy>(items: &[T], keep: &[bool]) -> Vec<T> {
        items
            .iter()
            .zip(keep)
            .filter(|(_, k)| **k)
            .map(|(v, _)| *v)
            .collect()
    }
    match values {
        FieldValues::Scalar(v) => FieldValues::Scalar(pick(v, keep)),
        FieldValues::Vector(v) => FieldValues::Vector(pick(v, keep)),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn region_tags(values: &FieldValues) -> IoResult<Vec<i32>> {
    let FieldValues::Scalar(values) = values else {
        return Err(IoError::invalid_content("`region` must be a scalar cell array"));
    };
    values
        .iter()
        .map(|&v| {
            if v.fract() == 0.0 && v >= f64::from(i32::MIN) && v <= f64::from(i32::MAX) {
                Ok(v as i32)
            } else {
                Err(IoError::invalid_content(format!("region tag {v} is not an integer")))
            }
        })
        .collect()
}

/// Parse legacy VTK ASCII text.
///
/// # Errors
///
/// Same as [`load_vtk_with_fields`], minus the file errors.
pub fn parse_vtk(text: &str) -> IoResult<VtkMesh> {
    let mut lines = text.lines();
    let header = lines.next().unwrap_or_default();
    if !header.trim_start().starts_with('#') || !header.to_ascii_lowercase().contains("vtk") {
        return Err(IoError::invalid_content("missing `# vtk DataFile` header"));
    }
    let _title = lines.next();
    let encoding = lines.next().unwrap_or_default().trim();
    if !encoding.eq_ignore_ascii_case("ASCII") {
        return Err(IoError::invalid_content(format!(
            "only ASCII VTK files are supported, found `{encoding}`"
        )));
    }

    let mut tokens = Tokens::from_lines(text.lines().enumerate().skip(3));
    let grid = parse_grid(&mut tokens)?;

    if grid.cell_types.len() != grid.cells.len() {
        return Err(IoError::invalid_content(format!(
            "{} cells but {} cell types",
            grid.cells.len(),
            grid.cell_types.len()
        )));
    }

    let keep: Vec<bool> = grid
        .cells
        .iter()
        .zip(&grid.cell_types)
        .map(|(cell, &kind)| kind == VTK_TETRA && cell.len() == 4)
        .collect();
    let tetrahedra: Vec<[u32; 4]> = grid
        .cells
        .iter()
        .zip(&keep)
        .filter(|(_, k)| **k)
        .map(|(c, _)| [c[0], c[1], c[2], c[3]])
        .collect();
    if tetrahedra.is_empty() {
        return Err(IoError::NoTetrahedra);
    }

    let mut mesh = TetMesh::from_parts(grid.points, tetrahedra);
    let mut fields = Vec::new();
    for field in grid.fields {
        let expected = match field.location {
            FieldLocation::Cell => keep.len(),
            FieldLocation::Point => mesh.vertices.len(),
        };
        if field.values.len() != expected {
            return Err(IoError::FieldLength {
                name: field.name,
                expected,
                got: field.values.len(),
            });
        }

        let field = match field.location {
            FieldLocation::Cell => FieldData {
                values: restrict_to(&field.values, &keep),
                ..field
            },
            FieldLocation::Point => field,
        };
        if field.location == FieldLocation::Cell && field.name == REGION_FIELD {
            mesh.regions = Some(region_tags(&field.values)?);
        } else {
            fields.push(field);
        }
    }
    mesh.validate()?;

    debug!(
        vertices = mesh.vertices.len(),
        elements = mesh.tetrahedra.len(),
        skipped_cells = keep.iter().filter(|k| !**k).count(),
        fields = fields.len(),
        "parsed VTK mesh"
    );
    Ok(VtkMesh { mesh, fields })
}

fn check_fields(mesh: &TetMesh, fields: &[FieldData]) -> IoResult<()> {
    for field in fields {
        let expected = match field.location {
            FieldLocation::Cell => mesh.tetrahedra.len(),
            FieldLocation::Point => mesh.vertices.len(),
        };
        if field.values.len() != expected {
            return Err(IoError::FieldLength {
                name: field.name.clone(),
                expected,
                got: field.values.len(),
            });
        }
    }
    Ok(())
}

fn write_field<W: Write>(writer: &mut W, field: &FieldData) -> IoResult<()> {
    let name: String = field
        .name
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();
    match &field.values {
        FieldValues::Scalar(values) => {
            writeln!(writer, "SCALARS {name} double 1")?;
            writeln!(writer, "LOOKUP_TABLE default")?;
            for v in values {
                writeln!(writer, "{v}")?;
            }
        }
        FieldValues::Vector(values) => {
            writeln!(writer, "VECTORS {name} double")?;
            for [x, y, z] in values {
                writeln!(writer, "{x} {y} {z}")?;
            }
        }
    }
    Ok(())
}

/// Write legacy VTK ASCII text with optional data arrays.
///
/// # Errors
///
/// - [`IoError::FieldLength`] if a field does not match the mesh size
/// - [`IoError::Io`] if writing fails
pub fn write_vtk<W: Write>(mesh: &TetMesh, fields: &[FieldData], mut writer: W) -> IoResult<()> {
    check_fields(mesh, fields)?;

    writeln!(writer, "# vtk DataFile Version 3.0")?;
    writeln!(writer, "tetmesh")?;
    writeln!(writer, "ASCII")?;
    writeln!(writer, "DATASET UNSTRUCTURED_GRID")?;

    writeln!(writer, "POINTS {} double", mesh.vertices.len())?;
    for v in &mesh.vertices {
        writeln!(writer, "{} {} {}", v.x, v.y, v.z)?;
    }

    let m = mesh.tetrahedra.len();
    writeln!(writer, "CELLS {m} {}", 5 * m)?;
    for [a, b, c, d] in &mesh.tetrahedra {
        writeln!(writer, "4 {a} {b} {c} {d}")?;
    }
    writeln!(writer, "CELL_TYPES {m}")?;
    for _ in 0..m {
        writeln!(writer, "{VTK_TETRA}")?;
    }

    let cell_fields: Vec<_> = fields
        .iter()
        .filter(|f| f.location == FieldLocation::Cell)
        .collect();
    if mesh.regions.is_some() || !cell_fields.is_empty() {
        writeln!(writer, "CELL_DATA {m}")?;
        if let Some(regions) = &mesh.regions {
            writeln!(writer, "SCALARS {REGION_FIELD} int 1")?;
            writeln!(writer, "LOOKUP_TABLE default")?;
            for tag in regions {
                writeln!(writer, "{tag}")?;
            }
        }
        for field in cell_fields {
            write_field(&mut writer, field)?;
        }
    }

    let point_fields: Vec<_> = fields
        .iter()
        .filter(|f| f.location == FieldLocation::Point)
        .collect();
    if !point_fields.is_empty() {
        writeln!(writer, "POINT_DATA {}", mesh.vertices.len())?;
        for field in point_fields {
            write_field(&mut writer, field)?;
        }
    }

    Ok(())
}

/// Save a mesh and optional data arrays as a legacy VTK file.
///
/// # Errors
///
/// - [`IoError::Mesh`] for an invalid mesh
/// - [`IoError::FieldLength`] if a field does not match the mesh size
/// - [`IoError::Io`] if the file cannot be written
pub fn save_vtk<P: AsRef<Path>>(mesh: &TetMesh, fields: &[FieldData], path: P) -> IoResult<()> {
    mesh.validate()?;
    check_fields(mesh, fields)?;
    let mut writer = BufWriter::new(File::create(path)?);
    write_vtk(mesh, fields, &mut writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tetmesh_types::unit_cube;

    fn to_text(mesh: &TetMesh, fields: &[FieldData]) -> String {
        let mut buffer = Vec::new();
        write_vtk(mesh, fields, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn write_then_parse_with_fields() {
        let cube = unit_cube().with_regions(vec![4, 4, 5, 5, 6, 6]);
        let fields = vec![
            FieldData::cell_scalar("volume", cube.element_volumes()),
            FieldData::point_vector("displacement", vec![[0.1, 0.0, -0.2]; 8]),
        ];
        let text = to_text(&cube, &fields);
        assert!(text.contains("CELL_TYPES 6"));
        assert!(text.contains("SCALARS region int 1"));

        let parsed = parse_vtk(&text).unwrap();
        assert_eq!(parsed.mesh, cube);
        assert_eq!(parsed.fields, fields);
    }

    #[test]
    fn skips_non_tetra_cells() {
        let text = "\
# vtk DataFile Version 3.0
mixed
ASCII
DATASET UNSTRUCTURED_GRID
POINTS 5 float
0 0 0
1 0 0
0 1 0
0 0 1
1 1 1
CELLS 2 9
3 0 1 2
4 0 1 2 3
CELL_TYPES 2
5
10
CELL_DATA 2
SCALARS region int
LOOKUP_TABLE default
9 3
";
        let parsed = parse_vtk(text).unwrap();
        assert_eq!(parsed.mesh.tetrahedra, vec![[0, 1, 2, 3]]);
        assert_eq!(parsed.mesh.regions, Some(vec![3]));
        assert!(parsed.fields.is_empty());
    }

    #[test]
    fn no_tetrahedra() {
        let text = "# vtk DataFile Version 3.0\nt\nASCII\nDATASET UNSTRUCTURED_GRID\nPOINTS 3 double\n0 0 0\n1 0 0\n0 1 0\nCELLS 1 4\n3 0 1 2\nCELL_TYPES 1\n5\n";
        assert!(matches!(parse_vtk(text), Err(IoError::NoTetrahedra)));
    }

    #[test]
    fn oversized_counts_are_errors() {
        let header = "# vtk DataFile Version 3.0\nt\nASCII\nDATASET UNSTRUCTURED_GRID\n";
        let huge = usize::MAX;
        for body in [
            format!("POINTS {huge} double\n0 0 0\n"),
            format!("POINTS 1 double\n0 0 0\nCELLS {huge} 5\n4 0 0 0 0\n"),
            format!("POINTS 1 double\n0 0 0\nCELLS 1 {huge}\n{huge} 0\n"),
            format!("POINTS 1 double\n0 0 0\nCELL_TYPES {huge}\n10\n"),
            format!("POINTS 1 double\n0 0 0\nPOINT_DATA {huge}\nSCALARS t double\n1.0\n"),
        ] {
            assert!(matches!(
                parse_vtk(&format!("{header}{body}")),
                Err(IoError::UnexpectedEof { .. })
            ));
        }
    }

    #[test]
    fn rejects_binary_and_bad_header() {
        assert!(parse_vtk("# vtk DataFile Version 3.0\nt\nBINARY\n").is_err());
        assert!(parse_vtk("hello\n").is_err());
    }

    #[test]
    fn field_length_checked_on_write() {
        let fields = [FieldData::point_scalar("t", vec![1.0; 3])];
        let mut sink = Vec::new();
        assert!(matches!(
            write_vtk(&unit_cube(), &fields, &mut sink),
            Err(IoError::FieldLength { expected: 8, got: 3, .. })
        ));
    }

    #[test]
    fn non_integer_region_rejected() {
        let mut text = to_text(&unit_cube().with_regions(vec![1; 6]), &[]);
        text = text.replacen("\n1\n", "\n1.5\n", 1);
        assert!(parse_vtk(&text).is_err());
    }
}
