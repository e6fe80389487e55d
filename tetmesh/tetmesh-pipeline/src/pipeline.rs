//! Step execution.

use tetmesh_repair::{RepairParams, repair_mesh};
use tetmesh_transform::{scale, snap_to_box, translate, translate_to_origin};
use tetmesh_types::{Aabb, Point3, TetMesh, Vector3};
use tetmesh_weld::{MergeParams, MergeReport, mirror_and_merge};
use tracing::{debug, info};

use crate::{PipelineConfig, PipelineError, PipelineResult, Step};

/// Everything a pipeline run produces.
#[derive(Debug, Clone, Default)]
pub struct PipelineOutput {
    /// Mesh after the last step.
    pub mesh: TetMesh,
    /// Meshes recorded by checkpoint steps, in order.
    pub checkpoints: Vec<(String, TetMesh)>,
    /// One report per mirror step, in order.
    pub merges: Vec<MergeReport>,
}

impl PipelineOutput {
    /// The checkpoint recorded under `name`, if any.
    ///
    /// The last one wins when a name is used twice.
    #[must_use]
    pub fn checkpoint(&self, name: &str) -> Option<&TetMesh> {
        self.checkpoints
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, mesh)| mesh)
    }

    /// Total number of welded vertices over all mirror steps.
    #[must_use]
    pub fn total_welded(&self) -> usize {
        self.merges.iter().map(|r| r.welded).sum()
    }
}

/// Runs a [`PipelineConfig`] against a mesh.
///
/// # Example
///
/// ```
/// use tetmesh_pipeline::{Pipeline, PipelineConfig, Step};
/// use tetmesh_types::{unit_cube, Axis};
///
/// let config = PipelineConfig::new()
///     .with_step(Step::mirror(Axis::X))
///     .with_step(Step::TranslateToOrigin);
/// let output = Pipeline::new(config).run(&unit_cube()).unwrap();
///
/// assert_eq!(output.mesh.vertices.len(), 12);
/// assert_eq!(output.merges[0].welded, 4);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Wrap a configuration.
    #[must_use]
    pub const fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// The configuration this pipeline runs.
    #[must_use]
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Apply every step in order to a copy of `mesh`.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::InvalidTolerance`] for a bad weld tolerance
    /// - [`PipelineError::EmptyMesh`] if a bounds-dependent step meets an empty mesh
    /// - the first transform, weld or repair error raised by a step
    pub fn run(&self, mesh: &TetMesh) -> PipelineResult<PipelineOutput> {
        let tolerance = self.config.tolerance;
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(PipelineError::InvalidTolerance { tolerance });
        }

        let mut output = PipelineOutput {
            mesh: mesh.clone(),
            ..PipelineOutput::default()
        };

        for (index, step) in self.config.steps.iter().enumerate() {
            debug!(step = index, %step, "running pipeline step");
            self.apply(index, step, &mut output)?;
            debug!(
                step = index,
                vertices = output.mesh.vertices.len(),
                elements = output.mesh.tetrahedra.len(),
                "pipeline step done"
            );
        }

        info!(
            steps = self.config.steps.len(),
            mirrors = output.merges.len(),
            vertices = output.mesh.vertices.len(),
            elements = output.mesh.tetrahedra.len(),
            "pipeline finished"
        );
        Ok(output)
    }

    fn apply(&self, index: usize, step: &Step, output: &mut PipelineOutput) -> PipelineResult<()> {
        let empty = || PipelineError::EmptyMesh {
            step: index,
            name: step.name(),
        };

        match step {
            Step::Mirror { axis, plane } => {
                let offset = plane.resolve(&output.mesh, *axis).ok_or_else(empty)?;
                let params = MergeParams::on_plane(*axis, offset)
                    .with_tolerance(self.config.tolerance)
                    .with_weld_check(self.config.weld_check);
                let merged = mirror_and_merge(&output.mesh, &params)?;
                output.mesh = merged.mesh;
                output.merges.push(merged.report);
            }
            Step::TranslateToOrigin => {
                if output.mesh.vertices.is_empty() {
                    return Err(empty());
                }
                output.mesh = translate_to_origin(&output.mesh);
            }
            Step::Translate { offset } => {
                output.mesh = translate(&output.mesh, Vector3::from(*offset));
            }
            Step::Scale { factor } => {
                output.mesh = scale(&output.mesh, *factor)?;
            }
            Step::SnapToBox {
                min,
                max,
                tolerance,
            } => {
                let bounds = Aabb::new(Point3::from(*min), Point3::from(*max));
                output.mesh = snap_to_box(&output.mesh, &bounds, *tolerance)?;
            }
            Step::Repair => {
                let params =
                    RepairParams::default().with_volume_tolerance(self.config.volume_tolerance);
                let (repaired, summary) = repair_mesh(&output.mesh, &params)?;
                debug!(step = index, %summary, "repair step");
                output.mesh = repaired;
            }
            Step::Checkpoint { name } => {
                info!(
                    checkpoint = %name,
                    vertices = output.mesh.vertices.len(),
                    elements = output.mesh.tetrahedra.len(),
                    "recorded checkpoint"
                );
                output.checkpoints.push((name.clone(), output.mesh.clone()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tetmesh_types::{Axis, MeshBounds, unit_cube};
    use tetmesh_weld::WeldCheck;

    use crate::PlanePolicy;

    fn run(config: PipelineConfig, mesh: &TetMesh) -> PipelineOutput {
        Pipeline::new(config).run(mesh).unwrap()
    }

    #[test]
    fn empty_chain_is_identity() {
        let cube = unit_cube();
        let output = run(PipelineConfig::new(), &cube);
        assert_eq!(output.mesh, cube);
        assert!(output.merges.is_empty());
        assert!(output.checkpoints.is_empty());
    }

    #[test]
    fn mirror_at_max_grows_upward() {
        let config = PipelineConfig::new().with_step(Step::Mirror {
            axis: Axis::Z,
            plane: PlanePolicy::Max,
        });
        let output = run(config, &unit_cube());
        let bounds = output.mesh.bounds();
        assert_relative_eq!(bounds.min.z, 0.0);
        assert_relative_eq!(bounds.max.z, 2.0);
        assert_eq!(output.merges[0].welded, 4);
    }

    #[test]
    fn mirror_at_min_then_origin() {
        let config = PipelineConfig::new()
            .with_step(Step::mirror(Axis::X))
            .with_step(Step::TranslateToOrigin);
        let output = run(config, &unit_cube());
        let bounds = output.mesh.bounds();
        assert_relative_eq!(bounds.min.x, 0.0);
        assert_relative_eq!(bounds.max.x, 2.0);
        assert_relative_eq!(output.mesh.signed_volume(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn checkpoints_are_snapshots() {
        let config = PipelineConfig::new()
            .with_step(Step::checkpoint("before"))
            .with_step(Step::Scale { factor: 3.0 })
            .with_step(Step::checkpoint("after"));
        let cube = unit_cube();
        let output = run(config, &cube);

        assert_eq!(output.checkpoint("before"), Some(&cube));
        assert_eq!(output.checkpoint("after"), Some(&output.mesh));
        assert!(output.checkpoint("missing").is_none());
    }

    #[test]
    fn translate_and_snap() {
        let config = PipelineConfig::new()
            .with_step(Step::Translate {
                offset: [1e-5, 0.0, 0.0],
            })
            .with_step(Step::SnapToBox {
                min: [0.0; 3],
                max: [1.0; 3],
                tolerance: 1e-4,
            });
        let output = run(config, &unit_cube());
        assert_eq!(output.mesh.vertices, unit_cube().vertices);
    }

    #[test]
    fn repair_drops_flipped_element() {
        let mut cube = unit_cube();
        cube.tetrahedra[0].swap(0, 1);
        let output = run(PipelineConfig::new().with_step(Step::Repair), &cube);
        assert_eq!(output.mesh.tetrahedra.len(), 5);
        assert!(output.mesh.element_volumes().iter().all(|&v| v > 0.0));
    }

    #[test]
    fn errors_surface() {
        let bad_tol = PipelineConfig::new().with_tolerance(-1.0);
        assert!(matches!(
            Pipeline::new(bad_tol).run(&unit_cube()),
            Err(PipelineError::InvalidTolerance { .. })
        ));

        let mirror_empty = PipelineConfig::new().with_step(Step::mirror(Axis::X));
        assert!(matches!(
            Pipeline::new(mirror_empty).run(&TetMesh::new()),
            Err(PipelineError::EmptyMesh { step: 0, name: "mirror" })
        ));

        let zero_scale = PipelineConfig::new().with_step(Step::Scale { factor: 0.0 });
        assert!(matches!(
            Pipeline::new(zero_scale).run(&unit_cube()),
            Err(PipelineError::Transform(_))
        ));
    }

    #[test]
    fn coincident_points_off_the_plane_stay_apart() {
        let config = PipelineConfig::new()
            .with_weld_check(WeldCheck::Strict)
            .with_step(Step::Mirror {
                axis: Axis::X,
                plane: PlanePolicy::Value(0.5),
            });
        let output = run(config, &unit_cube());
        let report = output.merges[0];
        assert_eq!(report.expected, 0);
        assert_eq!(report.welded, 0);
        assert_eq!(report.rejected_off_plane, 8);
        assert_eq!(output.mesh.vertices.len(), 16);
    }
}
