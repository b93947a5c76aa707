//! Fixed-step leapfrog (kick-drift-kick) integrator
//!
//! The integrator owns the particle state and the acceleration model and
//! hands out a forward-only [`Trajectory`] of [`StepSnapshot`]s: the
//! initial state followed by one snapshot per completed step.
//!
//! Snapshots are only taken at step boundaries; the half-kicked state in
//! the middle of a step is never exposed.

use std::iter::FusedIterator;

use log::{debug, error, info, warn};
use serde::Serialize;

use crate::error::{NBodyError, Result};
use crate::simulation::diagnostics::center_of_mass_velocity;
use crate::simulation::engine::ChunkingConfig;
use crate::simulation::forces::{AccelerationModel, ChunkedGravity};
use crate::simulation::params::{PhysicalConstants, SimulationClock};
use crate::simulation::states::{NVec3, ParticleSystem};

/// Lifecycle of an [`Integrator`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegratorState {
    Initialized, // constructed, `run` not called yet
    Stepping, // trajectory handed out, steps remaining
    Terminated, // all Nt steps done
}

/// Owned copy of the system at a step boundary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepSnapshot {
    pub step: usize,
    pub t: f64,
    pub positions: Vec<NVec3>,
    pub velocities: Vec<NVec3>,
    pub accelerations: Vec<NVec3>,
}

impl StepSnapshot {
    /// True if any position, velocity or acceleration component is NaN or infinite
    pub fn has_numeric_anomaly(&self) -> bool {
        [&self.positions, &self.velocities, &self.accelerations]
            .into_iter()
            .any(|field| !all_finite(field))
    }
}

fn all_finite(vs: &[NVec3]) -> bool {
    vs.iter().all(|v| v.iter().all(|c| c.is_finite()))
}

pub struct Integrator<M: AccelerationModel = ChunkedGravity> {
    system: ParticleSystem,
    model: M,
    clock: SimulationClock,
    acc: Vec<NVec3>, // accelerations at the current positions
    t: f64, // current time
    step: usize, // completed steps
    num_steps: usize, // Nt, fixed at construction
    state: IntegratorState,
    anomaly_reported: bool,
    failure: Option<NBodyError>, // model error that ended the run early
}

impl Integrator<ChunkedGravity> {
    /// Build an integrator driven by [`ChunkedGravity`]
    pub fn new(
        system: ParticleSystem,
        constants: &PhysicalConstants,
        chunking: &ChunkingConfig,
        clock: SimulationClock,
    ) -> Result<Self> {
        let model = ChunkedGravity::new(system.len(), constants, chunking)?;
        Self::with_model(system, model, clock)
    }
}

impl<M: AccelerationModel> Integrator<M> {
    /// Build an integrator around any acceleration model sized for `system`
    pub fn with_model(system: ParticleSystem, model: M, clock: SimulationClock) -> Result<Self> {
        if model.particle_count() != system.len() {
            return Err(NBodyError::PositionCountMismatch {
                expected: model.particle_count(),
                found: system.len(),
            });
        }
        let n = system.len();
        let num_steps = clock.num_steps();
        debug!("integrator: n = {n}, dt = {}, steps = {num_steps}", clock.dt());

        Ok(Self {
            system,
            model,
            clock,
            acc: vec![NVec3::zeros(); n],
            t: clock.t0(),
            step: 0,
            num_steps,
            state: IntegratorState::Initialized,
            anomaly_reported: false,
            failure: None,
        })
    }

    pub fn state(&self) -> IntegratorState {
        self.state
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn system(&self) -> &ParticleSystem {
        &self.system
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Nt, the number of steps a full run performs
    pub fn num_steps(&self) -> usize {
        self.num_steps
    }

    pub fn time(&self) -> f64 {
        self.t
    }

    /// Error returned by the acceleration model if it cut the run short.
    /// The system is then left part-way through the failed step.
    pub fn failure(&self) -> Option<&NBodyError> {
        self.failure.as_ref()
    }

    /// Start the simulation and return its snapshot sequence.
    ///
    /// Moves the system into its center-of-mass frame and computes the
    /// initial accelerations. Only valid once per integrator.
    pub fn run(&mut self) -> Result<Trajectory<'_, M>> {
        match self.state {
            IntegratorState::Initialized => {}
            IntegratorState::Stepping => return Err(NBodyError::InvalidState("integrator is already running")),
            IntegratorState::Terminated => return Err(NBodyError::InvalidState("integrator has terminated")),
        }

        self.model.accumulate(self.system.positions(), &mut self.acc)?;
        self.remove_bulk_motion();
        self.check_anomaly();

        self.state = if self.num_steps == 0 {
            IntegratorState::Terminated
        } else {
            IntegratorState::Stepping
        };
        info!(
            "starting run: {} particles, t = {} .. {}, {} steps",
            self.system.len(),
            self.clock.t0(),
            self.clock.t_end(),
            self.num_steps
        );

        Ok(Trajectory {
            integrator: self,
            initial_emitted: false,
        })
    }

    /// Subtract the mass-weighted mean velocity so total momentum is zero
    fn remove_bulk_motion(&mut self) {
        let v_com = center_of_mass_velocity(self.system.masses(), self.system.velocities());
        let (_, velocities) = self.system.split_mut();
        for v in velocities.iter_mut() {
            *v -= v_com;
        }
    }

    /// Advance by one step dt with kick-drift-kick
    fn kick_drift_kick(&mut self) -> Result<()> {
        let dt = self.clock.dt(); // time step dt
        let half_dt = 0.5 * dt; // half step dt/2

        let (positions, velocities) = self.system.split_mut();

        // Kick: v_n+1/2 = v_n + (dt/2) * a_n
        for (v, a) in velocities.iter_mut().zip(self.acc.iter()) {
            *v += half_dt * *a;
        }

        // Drift: x_n+1 = x_n + dt * v_n+1/2
        for (x, v) in positions.iter_mut().zip(velocities.iter()) {
            *x += dt * *v;
        }

        // a_n+1 from x_n+1
        self.model.accumulate(positions, &mut self.acc)?;

        // Second kick: v_n+1 = v_n+1/2 + (dt/2) * a_n+1
        for (v, a) in velocities.iter_mut().zip(self.acc.iter()) {
            *v += half_dt * *a;
        }

        self.t += dt;
        self.step += 1;
        self.check_anomaly();

        if self.step == self.num_steps {
            self.state = IntegratorState::Terminated;
            info!("run finished at t = {} after {} steps", self.t, self.step);
        }
        Ok(())
    }

    fn check_anomaly(&mut self) {
        if !self.anomaly_reported && !all_finite(&self.acc) {
            warn!(
                "non-finite acceleration at step {} (t = {}); continuing",
                self.step, self.t
            );
            self.anomaly_reported = true;
        }
    }

    fn snapshot(&self) -> StepSnapshot {
        StepSnapshot {
            step: self.step,
            t: self.t,
            positions: self.system.positions().to_vec(),
            velocities: self.system.velocities().to_vec(),
            accelerations: self.acc.clone(),
        }
    }
}

/// Forward-only sequence of snapshots produced by [`Integrator::run`]
///
/// Yields Nt + 1 items. Each call to `next` after the first performs one
/// full step before returning. If the acceleration model fails, the
/// sequence ends early and the error is kept in [`Integrator::failure`].
pub struct Trajectory<'a, M: AccelerationModel = ChunkedGravity> {
    integrator: &'a mut Integrator<M>,
    initial_emitted: bool,
}

impl<M: AccelerationModel> Trajectory<'_, M> {
    fn remaining(&self) -> usize {
        let initial = usize::from(!self.initial_emitted);
        let steps = match self.integrator.state {
            IntegratorState::Terminated => 0,
            _ => self.integrator.num_steps - self.integrator.step,
        };
        initial.saturating_add(steps)
    }
}

impl<M: AccelerationModel> Iterator for Trajectory<'_, M> {
    type Item = StepSnapshot;

    fn next(&mut self) -> Option<StepSnapshot> {
        if !self.initial_emitted {
            self.initial_emitted = true;
            return Some(self.integrator.snapshot());
        }
        if self.integrator.state == IntegratorState::Terminated {
            return None;
        }

        if let Err(e) = self.integrator.kick_drift_kick() {
            error!("acceleration model failed at step {}: {e}", self.integrator.step);
            self.integrator.state = IntegratorState::Terminated;
            self.integrator.failure = Some(e);
            return None;
        }
        Some(self.integrator.snapshot())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl<M: AccelerationModel> ExactSizeIterator for Trajectory<'_, M> {}

impl<M: AccelerationModel> FusedIterator for Trajectory<'_, M> {}
