//! Core state types for the N-body simulation.
//!
//! - `Body` is the per-particle input (position, velocity, mass)
//! - `ParticleSystem` holds the whole population as parallel arrays so the
//!   force evaluator can read a contiguous slice of positions
//!
//! Particle identity is the array index and never changes during a run.

use nalgebra::Vector3;

use crate::error::{invalid, Result};

pub type NVec3 = Vector3<f64>;

#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub x: NVec3, // position
    pub v: NVec3, // velocity
    pub m: f64, // mass
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParticleSystem {
    positions: Vec<NVec3>,
    velocities: Vec<NVec3>,
    masses: Vec<f64>,
}

impl ParticleSystem {
    /// Build a system from parallel arrays.
    /// Requires N > 0, equal lengths and finite, strictly positive masses.
    pub fn new(positions: Vec<NVec3>, velocities: Vec<NVec3>, masses: Vec<f64>) -> Result<Self> {
        let n = masses.len();
        if n == 0 {
            return Err(invalid("particle system must contain at least one particle"));
        }
        if positions.len() != n || velocities.len() != n {
            return Err(invalid(format!(
                "length mismatch: {} positions, {} velocities, {} masses",
                positions.len(),
                velocities.len(),
                n
            )));
        }
        if let Some((i, m)) = masses.iter().enumerate().find(|(_, m)| !(m.is_finite() && **m > 0.0)) {
            return Err(invalid(format!("mass of particle {i} must be positive and finite, got {m}")));
        }

        Ok(Self {
            positions,
            velocities,
            masses,
        })
    }

    pub fn from_bodies(bodies: &[Body]) -> Result<Self> {
        Self::new(
            bodies.iter().map(|b| b.x).collect(),
            bodies.iter().map(|b| b.v).collect(),
            bodies.iter().map(|b| b.m).collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.masses.len()
    }

    /// Always false for a validated system
    pub fn is_empty(&self) -> bool {
        self.masses.is_empty()
    }

    pub fn positions(&self) -> &[NVec3] {
        &self.positions
    }

    pub fn velocities(&self) -> &[NVec3] {
        &self.velocities
    }

    pub fn masses(&self) -> &[f64] {
        &self.masses
    }

    /// Mutable views used by the integrator between steps
    pub(crate) fn split_mut(&mut self) -> (&mut [NVec3], &mut [NVec3]) {
        (&mut self.positions, &mut self.velocities)
    }
}
