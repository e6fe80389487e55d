//! Subcommand implementations.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tetmesh::io::{FieldData, MeshFormat, load_mesh, save_mesh_with_fields};
use tetmesh::pipeline::{Level, Pipeline, PipelineConfig, PlanePolicy, recommended_tolerance};
use tetmesh::repair::{RepairParams, ValidationOptions, repair_mesh, validate_mesh_with_options};
use tetmesh::transform::{self, translate_to_origin};
use tetmesh::types::{Aabb, MeshBounds, Point3, TetMesh, Vector3};
use tetmesh::weld::{MergeParams, merge_meshes, mirror_and_merge};
use tracing::info;

fn load(path: &Path) -> Result<TetMesh> {
    let mesh = load_mesh(path).with_context(|| format!("failed to load {}", path.display()))?;
    info!(
        path = %path.display(),
        vertices = mesh.vertices.len(),
        elements = mesh.tetrahedra.len(),
        "loaded mesh"
    );
    Ok(mesh)
}

fn save(mesh: &TetMesh, path: &Path) -> Result<()> {
    save_with_fields(mesh, &[], path)
}

fn save_with_fields(mesh: &TetMesh, fields: &[FieldData], path: &Path) -> Result<()> {
    save_mesh_with_fields(mesh, fields, path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!(
        "Wrote {} ({} vertices, {} elements)",
        path.display(),
        mesh.vertices.len(),
        mesh.tetrahedra.len()
    );
    Ok(())
}

fn fmt_point(p: &Point3<f64>) -> String {
    format!("({:.6}, {:.6}, {:.6})", p.x, p.y, p.z)
}

pub fn info(input: &Path) -> Result<()> {
    let mesh = load(input)?;

    println!("File:      {}", input.display());
    println!("Vertices:  {}", mesh.vertices.len());
    println!("Elements:  {}", mesh.tetrahedra.len());
    if let Some(bounds) = mesh.bounds_opt() {
        let size = bounds.size();
        println!("Min:       {}", fmt_point(&bounds.min));
        println!("Max:       {}", fmt_point(&bounds.max));
        println!("Size:      {:.6} x {:.6} x {:.6}", size.x, size.y, size.z);
    }
    println!("Volume:    {:.6e}", mesh.signed_volume());

    match &mesh.regions {
        Some(regions) => {
            let mut counts = BTreeMap::new();
            for tag in regions {
                *counts.entry(tag).or_insert(0usize) += 1;
            }
            println!("Regions:");
            for (tag, count) in counts {
                println!("  {tag:>6}: {count} elements");
            }
        }
        None => println!("Regions:   none"),
    }
    Ok(())
}

pub fn check(
    input: &Path,
    volume_tolerance: f64,
    duplicate_tolerance: Option<f64>,
    strict: bool,
) -> Result<()> {
    let mesh = load(input)?;
    let options = ValidationOptions::default()
        .with_volume_tolerance(volume_tolerance)
        .with_duplicate_tolerance(duplicate_tolerance);
    let report = validate_mesh_with_options(&mesh, &options)
        .with_context(|| format!("failed to validate {}", input.display()))?;

    println!("{report}");
    if strict && !report.is_valid() {
        bail!(
            "{} has {} inverted and {} degenerate elements",
            input.display(),
            report.inverted_count,
            report.degenerate_count
        );
    }
    Ok(())
}

pub fn repair(
    input: &Path,
    output: &Path,
    volume_tolerance: f64,
    remove_unreferenced: bool,
) -> Result<()> {
    let mesh = load(input)?;
    let params = RepairParams::default()
        .with_volume_tolerance(volume_tolerance)
        .with_remove_unreferenced(remove_unreferenced);
    let (repaired, summary) = repair_mesh(&mesh, &params).context("repair failed")?;

    println!("{summary}");
    save(&repaired, output)
}

pub fn mirror(input: &Path, output: &Path, params: &MergeParams, plane: PlanePolicy) -> Result<()> {
    let mesh = load(input)?;
    let offset = plane
        .resolve(&mesh, params.axis)
        .context("cannot place a bounds-relative plane on an empty mesh")?;
    let params = params.with_plane_offset(offset);

    let merged = mirror_and_merge(&mesh, &params)
        .with_context(|| format!("mirror across {} = {offset} failed", params.axis))?;

    println!("Plane:     {} = {offset}", params.axis);
    println!("{}", merged.report);
    save(&merged.mesh, output)
}

pub fn merge(first: &Path, second: &Path, output: &Path, params: &MergeParams) -> Result<()> {
    let a = load(first)?;
    let b = load(second)?;
    let merged = merge_meshes(&a, &b, params).context("merge failed")?;

    println!("{}", merged.report);
    save(&merged.mesh, output)
}

pub fn scale(input: &Path, output: &Path, factor: f64) -> Result<()> {
    let mesh = load(input)?;
    let scaled = transform::scale(&mesh, factor)?;
    save(&scaled, output)
}

pub fn translate(input: &Path, output: &Path, offset: Option<[f64; 3]>) -> Result<()> {
    let mesh = load(input)?;
    let moved = match offset {
        Some(offset) => transform::translate(&mesh, Vector3::from(offset)),
        None => translate_to_origin(&mesh),
    };
    save(&moved, output)
}

pub fn snap(
    input: &Path,
    output: &Path,
    min: Option<[f64; 3]>,
    max: Option<[f64; 3]>,
    tolerance: f64,
) -> Result<()> {
    let mesh = load(input)?;
    let bounds = mesh.bounds_opt().context("cannot snap an empty mesh")?;
    let target = Aabb::new(
        min.map_or(bounds.min, Point3::from),
        max.map_or(bounds.max, Point3::from),
    );

    let snapped = transform::snap_to_box(&mesh, &target, tolerance)?;
    println!("Box:       {} .. {}", fmt_point(&target.min), fmt_point(&target.max));
    save(&snapped, output)
}

pub fn run(
    config_path: &Path,
    input: &Path,
    output: &Path,
    checkpoint_dir: Option<&Path>,
) -> Result<()> {
    let config = PipelineConfig::from_file(config_path)?;
    info!(steps = config.steps.len(), "loaded pipeline");
    let mesh = load(input)?;

    let result = Pipeline::new(config)
        .run(&mesh)
        .with_context(|| format!("pipeline {} failed", config_path.display()))?;

    for (i, report) in result.merges.iter().enumerate() {
        println!("[{}] {report}", i + 1);
    }

    if let Some(dir) = checkpoint_dir {
        fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
        let ext = MeshFormat::from_path(output).map_or("vtk", |f| f.extension());
        for (name, checkpoint) in &result.checkpoints {
            save(checkpoint, &dir.join(format!("{name}.{ext}")))?;
        }
    }
    save(&result.mesh, output)
}

pub fn multiscale(
    input: &Path,
    out_dir: &Path,
    tolerance: Option<f64>,
    element_size: Option<f64>,
    format: &str,
) -> Result<()> {
    let tolerance = tolerance
        .or_else(|| element_size.map(recommended_tolerance))
        .context("pass --tolerance or --element-size")?;
    let format = MeshFormat::from_path(format!("out.{format}"))
        .with_context(|| format!("unknown output format '{format}'"))?;

    let mesh = load(input)?;
    let result = Pipeline::new(tetmesh::pipeline::multi_scale(tolerance))
        .run(&mesh)
        .context("multi-scale pipeline failed")?;

    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;
    println!("Tolerance: {tolerance:e}");
    for level in Level::ALL {
        let Some(level_mesh) = result.checkpoint(level.name()) else {
            bail!("pipeline produced no {level} mesh");
        };
        let path = out_dir.join(format!("{level}.{}", format.extension()));
        let fields = match format {
            MeshFormat::Vtk => vec![FieldData::cell_scalar("volume", level_mesh.element_volumes())],
            MeshFormat::Medit => Vec::new(),
        };
        save_with_fields(level_mesh, &fields, &path)?;
    }
    Ok(())
}
