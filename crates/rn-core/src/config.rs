//! Road model configuration.

use crate::RoadError;

/// Default movement tolerance.  Remaining budgets and distances smaller than
/// this are treated as zero.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Tunables for the road model.
///
/// Typically built with `RoadConfig::default()`; applications that load
/// settings from a TOML/JSON file enable the `serde` feature and deserialize
/// it directly.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RoadConfig {
    /// Absolute tolerance used when deciding whether a time budget suffices to
    /// finish a connection, or whether anything is left of it.  Keeps
    /// floating-point residue from producing endless micro-steps.
    pub tolerance: f64,
}

impl RoadConfig {
    /// Reject configurations the movement loop cannot work with.
    pub fn validate(&self) -> Result<(), RoadError> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(RoadError::InvalidArgument(format!(
                "tolerance must be finite and non-negative, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

impl Default for RoadConfig {
    fn default() -> Self {
        Self { tolerance: DEFAULT_TOLERANCE }
    }
}
