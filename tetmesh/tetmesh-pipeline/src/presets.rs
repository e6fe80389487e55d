//! Multi-scale symmetry presets.
//!
//! A representative volume mirrored across its minimum faces grows by a
//! factor of two per reflection. Each level continues from the previous one,
//! and the refined levels halve the result so all three cover one box:
//!
//! | Level  | Reflections added          | Extent vs. input | Elements vs. input |
//! |--------|----------------------------|------------------|--------------------|
//! | coarse | x                          | 2 x 1 x 1        | 2                  |
//! | medium | z, x, y, then 0.5 scale    | 2 x 1 x 1        | 16                 |
//! | fine   | z, y, x, then 0.5 scale    | 2 x 1 x 1        | 128                |

use std::fmt;
use std::str::FromStr;

use tetmesh_types::Axis;

use crate::{PipelineConfig, Step};

/// A resolution level of the multi-scale chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Level {
    /// One reflection along x.
    Coarse,
    /// Coarse, then reflections along z, x and y, rescaled to the coarse extent.
    Medium,
    /// Medium, then reflections along z, y and x, rescaled again.
    Fine,
}

impl Level {
    /// All levels from coarse to fine.
    pub const ALL: [Self; 3] = [Self::Coarse, Self::Medium, Self::Fine];

    /// Lowercase level name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Coarse => "coarse",
            Self::Medium => "medium",
            Self::Fine => "fine",
        }
    }

    /// Steps that build this level from the input mesh.
    #[must_use]
    pub fn steps(self) -> Vec<Step> {
        match self {
            Self::Coarse => mirror_chain(&[Axis::X]),
            Self::Medium => refine(Self::Coarse.steps(), &[Axis::Z, Axis::X, Axis::Y]),
            Self::Fine => refine(Self::Medium.steps(), &[Axis::Z, Axis::Y, Axis::X]),
        }
    }

    /// Pipeline for this level with the given weld tolerance.
    #[must_use]
    pub fn config(self, tolerance: f64) -> PipelineConfig {
        PipelineConfig {
            steps: self.steps(),
            ..PipelineConfig::new().with_tolerance(tolerance)
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "coarse" => Ok(Self::Coarse),
            "medium" => Ok(Self::Medium),
            "fine" => Ok(Self::Fine),
            other => Err(format!("unknown level '{other}': expected coarse, medium or fine")),
        }
    }
}

/// Mirror at the minimum face, then move back to the origin, per axis.
fn mirror_chain(axes: &[Axis]) -> Vec<Step> {
    axes.iter()
        .flat_map(|&axis| [Step::mirror(axis), Step::TranslateToOrigin])
        .collect()
}

/// Octuple `steps` with one reflection per axis, then halve back to its extent.
fn refine(mut steps: Vec<Step>, axes: &[Axis]) -> Vec<Step> {
    steps.extend(mirror_chain(axes));
    steps.push(Step::Scale { factor: 0.5 });
    steps
}

/// One x reflection.
#[must_use]
pub fn coarse(tolerance: f64) -> PipelineConfig {
    Level::Coarse.config(tolerance)
}

/// Coarse plus three reflections, rescaled to the coarse extent.
#[must_use]
pub fn medium(tolerance: f64) -> PipelineConfig {
    Level::Medium.config(tolerance)
}

/// Medium plus three reflections, rescaled to the coarse extent.
#[must_use]
pub fn fine(tolerance: f64) -> PipelineConfig {
    Level::Fine.config(tolerance)
}

/// The fine chain with a checkpoint named after each level.
///
/// # Example
///
/// ```
/// use tetmesh_pipeline::{Pipeline, multi_scale};
/// use tetmesh_types::unit_cube;
///
/// let output = Pipeline::new(multi_scale(1e-6)).run(&unit_cube()).unwrap();
/// let names: Vec<_> = output.checkpoints.iter().map(|(n, _)| n.as_str()).collect();
/// assert_eq!(names, ["coarse", "medium", "fine"]);
/// ```
#[must_use]
pub fn multi_scale(tolerance: f64) -> PipelineConfig {
    let mut steps = Vec::new();
    let mut done = 0;
    for level in Level::ALL {
        let chain = level.steps();
        steps.extend_from_slice(&chain[done..]);
        steps.push(Step::checkpoint(level.name()));
        done = chain.len();
    }

    PipelineConfig {
        steps,
        ..PipelineConfig::new().with_tolerance(tolerance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mirror_counts() {
        assert_eq!(coarse(1e-6).mirror_count(), 1);
        assert_eq!(medium(1e-6).mirror_count(), 4);
        assert_eq!(fine(1e-6).mirror_count(), 7);
        assert_eq!(multi_scale(1e-6).mirror_count(), 7);
    }

    #[test]
    fn each_level_extends_the_previous() {
        for pair in Level::ALL.windows(2) {
            let (lower, upper) = (pair[0].steps(), pair[1].steps());
            assert_eq!(&upper[..lower.len()], lower.as_slice());
            assert_eq!(upper.last(), Some(&Step::Scale { factor: 0.5 }));
        }
    }

    #[test]
    fn every_mirror_is_followed_by_origin_shift() {
        for level in Level::ALL {
            let steps = level.steps();
            for (i, step) in steps.iter().enumerate() {
                if matches!(step, Step::Mirror { .. }) {
                    assert_eq!(steps.get(i + 1), Some(&Step::TranslateToOrigin), "{level}");
                }
            }
        }
    }

    #[test]
    fn multi_scale_without_checkpoints_is_fine() {
        let steps: Vec<_> = multi_scale(1e-6)
            .steps
            .into_iter()
            .filter(|s| !matches!(s, Step::Checkpoint { .. }))
            .collect();
        assert_eq!(steps, Level::Fine.steps());
    }

    #[test]
    fn level_names() {
        assert_eq!("Medium".parse::<Level>(), Ok(Level::Medium));
        assert!("ultra".parse::<Level>().is_err());
        assert_eq!(Level::Fine.to_string(), "fine");
    }
}
