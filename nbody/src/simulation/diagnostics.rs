//! Conserved-quantity diagnostics
//!
//! The force law carries no source-mass factor, so the energy it conserves
//! treats every particle as unit inertia:
//!
//!   E = sum_i |v_i|^2 / 2 - G * sum_{i<j} 1 / sqrt(|p_j - p_i|^2 + eps^2)
//!
//! Momentum is reported mass-weighted, which is what the center-of-mass
//! correction zeroes.

use crate::simulation::params::PhysicalConstants;
use crate::simulation::states::NVec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Energy {
    pub kinetic: f64,
    pub potential: f64,
}

impl Energy {
    pub fn total(&self) -> f64 {
        self.kinetic + self.potential
    }

    /// |E - E0| / |E0|, or the absolute difference when E0 is zero
    pub fn relative_drift(&self, initial: &Energy) -> f64 {
        let e0 = initial.total();
        let diff = (self.total() - e0).abs();
        if e0 == 0.0 {
            diff
        } else {
            diff / e0.abs()
        }
    }
}

pub fn energy(positions: &[NVec3], velocities: &[NVec3], constants: &PhysicalConstants) -> Energy {
    let kinetic = velocities.iter().map(|v| 0.5 * v.norm_squared()).sum();

    let eps2 = constants.softening2();
    let mut potential = 0.0;
    for i in 0..positions.len() {
        for j in (i + 1)..positions.len() {
            let d2 = (positions[j] - positions[i]).norm_squared() + eps2;
            // coincident pairs exert no force, so they carry no potential either
            if d2 > 0.0 {
                potential -= d2.sqrt().recip();
            }
        }
    }

    Energy {
        kinetic,
        potential: constants.g() * potential,
    }
}

/// sum_i m_i * v_i
pub fn total_momentum(masses: &[f64], velocities: &[NVec3]) -> NVec3 {
    masses
        .iter()
        .zip(velocities)
        .fold(NVec3::zeros(), |acc, (m, v)| acc + v * *m)
}

/// Mass-weighted mean velocity, sum(m_i v_i) / sum(m_i)
pub fn center_of_mass_velocity(masses: &[f64], velocities: &[NVec3]) -> NVec3 {
    let total_mass: f64 = masses.iter().sum();
    total_momentum(masses, velocities) / total_mass
}
