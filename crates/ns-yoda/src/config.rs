//! Writer options (YAML, JSON or programmatic).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// What to do when a mean is requested for a histogram with zero in-range content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeanPolicy {
    /// Emit `nan` and keep going.
    #[default]
    Nan,
    /// Fail with [`YodaError::DegenerateMean`](crate::YodaError::DegenerateMean).
    Error,
}

/// How the 2D volume treats non-uniform axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisPolicy {
    /// Multiply by the first bin's width on each axis, whatever the binning.
    #[default]
    FirstBinWidth,
    /// Reject axes whose widths differ from the first by more than the tolerance.
    RequireUniform,
}

/// Options controlling block serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriteOptions {
    /// Handling of zero-content means.
    pub mean_policy: MeanPolicy,
    /// Handling of non-uniform 2D binning.
    pub axis_policy: AxisPolicy,
    /// Relative width tolerance used by [`AxisPolicy::RequireUniform`].
    pub uniform_tolerance: f64,
    /// Minimum width of the `Total`/`Underflow`/`Overflow` labels.
    pub label_width: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            mean_policy: MeanPolicy::Nan,
            axis_policy: AxisPolicy::FirstBinWidth,
            uniform_tolerance: 1e-9,
            label_width: 0,
        }
    }
}

impl WriteOptions {
    /// Strict options: degenerate means and non-uniform 2D axes are errors.
    pub fn strict() -> Self {
        Self {
            mean_policy: MeanPolicy::Error,
            axis_policy: AxisPolicy::RequireUniform,
            ..Self::default()
        }
    }

    /// Parse from YAML; missing keys take their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Parse from JSON; missing keys take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a file: JSON for `.json`, YAML otherwise.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("").to_ascii_lowercase();
        let opts = if ext == "json" {
            serde_json::from_slice(&bytes)?
        } else {
            serde_yaml_ng::from_slice(&bytes)?
        };
        Ok(opts)
    }
}
