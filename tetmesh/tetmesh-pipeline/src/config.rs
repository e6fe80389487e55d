//! Pipeline configuration, loadable from TOML.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tetmesh_weld::WeldCheck;

use crate::{PipelineError, PipelineResult, Step};

/// Default weld tolerance for mirror steps.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Default signed-volume threshold for repair steps.
pub const DEFAULT_VOLUME_TOLERANCE: f64 = 1e-12;

/// Weld tolerance the scan-to-mesh drivers used: `0.019 * max_element_size`.
///
/// Small against the smallest element edge, large against the coordinate
/// noise a mesher leaves on a flat face.
///
/// # Example
///
/// ```
/// use tetmesh_pipeline::recommended_tolerance;
///
/// assert!((recommended_tolerance(0.03) - 5.7e-4).abs() < 1e-12);
/// ```
#[must_use]
pub fn recommended_tolerance(max_element_size: f64) -> f64 {
    0.019 * max_element_size
}

/// A step chain plus the settings shared by its steps.
///
/// # Example
///
/// ```
/// use tetmesh_pipeline::{PipelineConfig, Step};
/// use tetmesh_types::Axis;
///
/// let config = PipelineConfig::from_toml_str(r#"
///     tolerance = 1e-4
///     weld_check = "strict"
///
///     [[steps]]
///     op = "mirror"
///     axis = "z"
///
///     [[steps]]
///     op = "translate_to_origin"
/// "#).unwrap();
///
/// assert_eq!(config.steps[0], Step::mirror(Axis::Z));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Weld tolerance for mirror steps (default: 1e-6).
    pub tolerance: f64,
    /// Weld count check for mirror steps (default: warn).
    pub weld_check: WeldCheck,
    /// Volume threshold for repair steps (default: 1e-12).
    pub volume_tolerance: f64,
    /// Steps in execution order.
    pub steps: Vec<Step>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            weld_check: WeldCheck::default(),
            volume_tolerance: DEFAULT_VOLUME_TOLERANCE,
            steps: Vec::new(),
        }
    }
}

impl PipelineConfig {
    /// An empty chain with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Parse`] for malformed TOML or unknown keys.
    pub fn from_toml_str(text: &str) -> PipelineResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::ReadConfig`] if the file cannot be read, or
    /// [`PipelineError::Parse`] for invalid content.
    pub fn from_file<P: AsRef<Path>>(path: P) -> PipelineResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| PipelineError::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Serialize to TOML text.
    ///
    /// # Errors
    ///
    /// Fails only for values TOML cannot represent, such as a NaN tolerance.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }

    /// Set the weld tolerance.
    #[must_use]
    pub const fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the weld count check.
    #[must_use]
    pub const fn with_weld_check(mut self, check: WeldCheck) -> Self {
        self.weld_check = check;
        self
    }

    /// Set the repair volume tolerance.
    #[must_use]
    pub const fn with_volume_tolerance(mut self, tolerance: f64) -> Self {
        self.volume_tolerance = tolerance;
        self
    }

    /// Append a step.
    #[must_use]
    pub fn with_step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// Number of mirror steps.
    #[must_use]
    pub fn mirror_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s, Step::Mirror { .. }))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PlanePolicy;
    use tetmesh_types::Axis;

    const FULL: &str = r#"
tolerance = 5.7e-4
weld_check = "off"
volume_tolerance = 2.7e-8

[[steps]]
op = "mirror"
axis = "x"
plane = "max"

[[steps]]
op = "mirror"
axis = "y"
plane = { value = 0.25 }

[[steps]]
op = "translate"
offset = [1.0, 0.0, -2.0]

[[steps]]
op = "snap_to_box"
min = [0.0, 0.0, 0.0]
max = [1.0, 1.0, 1.0]
tolerance = 1e-3

[[steps]]
op = "repair"

[[steps]]
op = "checkpoint"
name = "done"
"#;

    #[test]
    fn parse_all_step_kinds() {
        let config = PipelineConfig::from_toml_str(FULL).unwrap();
        assert_eq!(config.weld_check, WeldCheck::Off);
        assert!((config.tolerance - 5.7e-4).abs() < f64::EPSILON);
        assert_eq!(config.steps.len(), 6);
        assert_eq!(
            config.steps[0],
            Step::Mirror {
                axis: Axis::X,
                plane: PlanePolicy::Max
            }
        );
        assert_eq!(
            config.steps[1],
            Step::Mirror {
                axis: Axis::Y,
                plane: PlanePolicy::Value(0.25)
            }
        );
        assert_eq!(config.steps[4], Step::Repair);
        assert_eq!(config.steps[5], Step::checkpoint("done"));
        assert_eq!(config.mirror_count(), 2);
    }

    #[test]
    fn defaults_apply() {
        let config = PipelineConfig::from_toml_str("").unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.weld_check, WeldCheck::Warn);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(
            PipelineConfig::from_toml_str("tolerence = 1.0"),
            Err(PipelineError::Parse(_))
        ));
        assert!(PipelineConfig::from_toml_str("[[steps]]\nop = \"rotate\"\n").is_err());
        assert!(PipelineConfig::from_toml_str("[[steps]]\nop = \"mirror\"\naxis = \"w\"\n").is_err());
    }

    #[test]
    fn toml_text_roundtrip() {
        let config = PipelineConfig::from_toml_str(FULL).unwrap();
        let text = config.to_toml_string().unwrap();
        assert_eq!(PipelineConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            PipelineConfig::from_file("/nonexistent/pipeline.toml"),
            Err(PipelineError::ReadConfig { .. })
        ));
    }
}
