//! Cumulative water-volume diagnostics.

use serde::{Deserialize, Serialize};

/// Volumes (length³) crossing the core domain since the last reset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MassBalance {
    /// Recharge added over core cells.
    pub recharge_in: f64,
    /// Subsurface flow from core cells into non-core neighbours.
    pub groundwater_out: f64,
    /// Seepage plus return flow leaving through the surface.
    pub surface_out: f64,
}

impl MassBalance {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Add another accumulator's volumes to this one.
    pub fn absorb(&mut self, other: &MassBalance) {
        self.recharge_in += other.recharge_in;
        self.groundwater_out += other.groundwater_out;
        self.surface_out += other.surface_out;
    }

    /// `recharge_in - groundwater_out - surface_out - storage_change`; zero
    /// up to round-off when volume is conserved.
    pub fn residual(&self, storage_change: f64) -> f64 {
        self.recharge_in - self.groundwater_out - self.surface_out - storage_change
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absorb_and_reset() {
        let mut a = MassBalance {
            recharge_in: 1.0,
            ..Default::default()
        };
        a.absorb(&MassBalance {
            recharge_in: 2.0,
            groundwater_out: 0.5,
            surface_out: 0.25,
        });
        assert_eq!(a.residual(2.0), 0.25);
        a.reset();
        assert_eq!(a, MassBalance::default());
    }
}
