//! Parameters of the Dupuit percolator.

use serde::{Deserialize, Serialize};

use crate::mesh_error::MeshError;

/// Defaults for the per-node parameter fields and the substep controls.
///
/// The per-node values only seed fields that do not exist yet; once a field
/// is present the solver reads it instead.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DupuitConfig {
    /// Hydraulic conductivity (length/time).
    pub hydraulic_conductivity: f64,
    /// Drainable porosity, in `(0, 1]`.
    pub porosity: f64,
    /// Recharge rate (length/time).
    pub recharge_rate: f64,
    /// Sharpness of the seepage blend near saturation.
    pub regularization_scale: f64,
    /// Courant coefficient applied to the advective bound.
    pub courant_coefficient: f64,
    /// Coefficient applied to the diffusive (von Neumann) bound.
    pub vn_coefficient: f64,
    /// Substep used when nothing moves and the stability bound is unbounded.
    pub degenerate_substep: Option<f64>,
    pub max_substeps: usize,
}

impl Default for DupuitConfig {
    fn default() -> Self {
        Self {
            hydraulic_conductivity: 1e-3,
            porosity: 0.2,
            recharge_rate: 1e-8,
            regularization_scale: 1e-2,
            courant_coefficient: 0.5,
            vn_coefficient: 0.8,
            degenerate_substep: None,
            max_substeps: 1_000_000,
        }
    }
}

fn invalid(msg: String) -> MeshError {
    MeshError::InvalidParameter(msg)
}

/// `true` for finite values in `(0, 1]`.
pub(crate) fn is_unit_coefficient(c: f64) -> bool {
    c.is_finite() && c > 0.0 && c <= 1.0
}

impl DupuitConfig {
    pub fn validate(&self) -> Result<(), MeshError> {
        if !(self.hydraulic_conductivity.is_finite() && self.hydraulic_conductivity >= 0.0) {
            return Err(invalid(format!(
                "hydraulic conductivity must be finite and non-negative, got {}",
                self.hydraulic_conductivity
            )));
        }
        if !is_unit_coefficient(self.porosity) {
            return Err(invalid(format!(
                "porosity must lie in (0, 1], got {}",
                self.porosity
            )));
        }
        if !self.recharge_rate.is_finite() {
            return Err(invalid("recharge rate must be finite".to_string()));
        }
        if !(self.regularization_scale.is_finite() && self.regularization_scale > 0.0) {
            return Err(invalid(format!(
                "regularization scale must be positive, got {}",
                self.regularization_scale
            )));
        }
        for (name, c) in [
            ("courant coefficient", self.courant_coefficient),
            ("vn coefficient", self.vn_coefficient),
        ] {
            if !is_unit_coefficient(c) {
                return Err(invalid(format!("{name} must lie in (0, 1], got {c}")));
            }
        }
        if let Some(dt) = self.degenerate_substep {
            if !(dt.is_finite() && dt > 0.0) {
                return Err(invalid(format!(
                    "degenerate substep must be positive, got {dt}"
                )));
            }
        }
        if self.max_substeps == 0 {
            return Err(invalid("max_substeps must be at least 1".to_string()));
        }
        Ok(())
    }
}
