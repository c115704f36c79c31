//! Per-invocation configuration.
//!
//! Nothing is persisted: hosts build a [`StitchConfig`] per request, usually by
//! deserializing it from the request body with missing fields filled from
//! [`crate::defaults`].

use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::errors::PipelineError;
use crate::types::{Scale, require_positive};

/// Bounds applied while parsing and unrolling a script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptLimits {
    /// Largest count accepted by a single `range(n)`.
    pub max_loop_count: u32,
    /// Largest number of commands the unrolled script may contain.
    pub max_commands: usize,
}

impl Default for ScriptLimits {
    fn default() -> Self {
        Self {
            max_loop_count: defaults::MAX_LOOP_COUNT,
            max_commands: defaults::MAX_COMMANDS,
        }
    }
}

/// Settings for turning points into stitches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StitchConfig {
    /// Device units per drawing unit.
    pub scale_mm: f64,
    /// Maximum stitch length in device units.
    pub max_stitch_mm: f64,
    /// Largest number of stitches a design may densify to.
    pub max_stitches: usize,
    /// Script parsing limits, used when the input is a script.
    pub limits: ScriptLimits,
}

impl Default for StitchConfig {
    fn default() -> Self {
        Self {
            scale_mm: defaults::SCALE_MM,
            max_stitch_mm: defaults::MAX_STITCH_MM,
            max_stitches: defaults::MAX_STITCHES,
            limits: ScriptLimits::default(),
        }
    }
}

impl StitchConfig {
    pub fn new(scale_mm: f64, max_stitch_mm: f64) -> Self {
        Self {
            scale_mm,
            max_stitch_mm,
            ..Self::default()
        }
    }

    pub fn with_max_stitches(mut self, max_stitches: usize) -> Self {
        self.max_stitches = max_stitches;
        self
    }

    pub fn with_limits(mut self, limits: ScriptLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Validated scale factor.
    pub fn scale(&self) -> Result<Scale, PipelineError> {
        Scale::try_new(self.scale_mm).map_err(|reason| PipelineError::InvalidConfig {
            field: "scale_mm",
            value: self.scale_mm,
            reason,
        })
    }

    /// Validated maximum stitch length in device units.
    pub fn max_stitch(&self) -> Result<f64, PipelineError> {
        require_positive(self.max_stitch_mm).map_err(|reason| PipelineError::InvalidConfig {
            field: "max_stitch_mm",
            value: self.max_stitch_mm,
            reason,
        })
    }
}
