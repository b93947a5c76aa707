//! Build fully-validated simulation scenarios from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces a `Scenario`
//! containing:
//! - engine settings (`ChunkingConfig`)
//! - physical constants and clock
//! - the initial `ParticleSystem`, either listed or generated
//!
//! All validation happens here, before any step is taken.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use crate::configuration::config::{BodyConfig, RandomClusterConfig, ScenarioConfig};
use crate::error::{invalid, Result};
use crate::simulation::engine::ChunkingConfig;
use crate::simulation::integrator::Integrator;
use crate::simulation::params::{PhysicalConstants, SimulationClock};
use crate::simulation::states::{Body, NVec3, ParticleSystem};

#[derive(Debug, Clone)]
pub struct Scenario {
    pub chunking: ChunkingConfig,
    pub constants: PhysicalConstants,
    pub clock: SimulationClock,
    pub system: ParticleSystem,
}

impl Scenario {
    pub fn from_config(cfg: &ScenarioConfig) -> Result<Self> {
        let chunking = ChunkingConfig::new(cfg.engine.chunk_size)?.parallel(cfg.engine.parallel);

        let p = &cfg.parameters;
        let constants = PhysicalConstants::new(p.G, p.softening)?;
        let clock = SimulationClock::new(p.t0, p.t_end, p.dt)?;

        let system = match (&cfg.random, cfg.bodies.is_empty()) {
            (Some(random), true) => random_cluster(random)?,
            (None, false) => {
                let bodies: Vec<Body> = cfg.bodies.iter().map(body_from_config).collect();
                ParticleSystem::from_bodies(&bodies)?
            }
            (Some(_), false) => return Err(invalid("scenario lists both `bodies` and `random`")),
            (None, true) => return Err(invalid("scenario needs either `bodies` or `random`")),
        };

        Ok(Self {
            chunking,
            constants,
            clock,
            system,
        })
    }

    /// Hand the scenario to a chunked-gravity integrator
    pub fn into_integrator(self) -> Result<Integrator> {
        Integrator::new(self.system, &self.constants, &self.chunking, self.clock)
    }
}

fn body_from_config(bc: &BodyConfig) -> Body {
    Body {
        x: NVec3::from(bc.x),
        v: NVec3::from(bc.v),
        m: bc.m,
    }
}

/// Equal-mass cluster with standard-normal positions and velocities
pub fn random_cluster(cfg: &RandomClusterConfig) -> Result<ParticleSystem> {
    if cfg.n == 0 {
        return Err(invalid("random cluster needs n > 0"));
    }
    if !(cfg.total_mass.is_finite() && cfg.total_mass > 0.0) {
        return Err(invalid(format!("total mass must be positive and finite, got {}", cfg.total_mass)));
    }

    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let normal = Normal::new(0.0, 1.0).map_err(|e| invalid(e.to_string()))?;
    let mut sample = || NVec3::new(normal.sample(&mut rng), normal.sample(&mut rng), normal.sample(&mut rng));

    let positions: Vec<NVec3> = (0..cfg.n).map(|_| sample()).collect();
    let velocities: Vec<NVec3> = (0..cfg.n).map(|_| sample()).collect();
    let masses = vec![cfg.total_mass / cfg.n as f64; cfg.n];

    ParticleSystem::new(positions, velocities, masses)
}
