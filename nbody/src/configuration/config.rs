//! Configuration types for loading simulation scenarios from YAML.
//!
//! A scenario consists of:
//!
//! - [`EngineConfig`]     – chunking and threading of the force evaluation
//! - [`ParametersConfig`] – clock and physical constants
//! - either [`BodyConfig`]s or a [`RandomClusterConfig`] for the initial state
//! - [`ScenarioConfig`]   – top-level wrapper
//!
//! # YAML format
//!
//! ```yaml
//! engine:
//!   chunk_size: 128         # output particles per chunk
//!   parallel: false         # evaluate chunks on the rayon pool
//!
//! parameters:
//!   t0: 0.0                 # start time
//!   t_end: 10.0             # end time
//!   dt: 0.01                # fixed step size
//!   softening: 0.1          # softening length epsilon
//!   G: 1.0                  # gravitational constant
//!
//! bodies:
//!   - x: [ -0.5, 0.0, 0.0 ]
//!     v: [  0.0, 0.5, 0.0 ]
//!     m: 1.0
//!   - x: [  0.5, 0.0, 0.0 ]
//!     v: [  0.0, -0.5, 0.0 ]
//!     m: 1.0
//! ```
//!
//! Instead of `bodies`, a `random` block generates a Gaussian cluster:
//!
//! ```yaml
//! random:
//!   n: 100
//!   seed: 0
//!   total_mass: 20.0
//! ```

use serde::Deserialize;

fn default_chunk_size() -> usize {
    128
}

fn default_t0() -> f64 {
    0.0
}

/// How the force evaluation is partitioned
#[derive(Deserialize, Debug, Clone)]
pub struct EngineConfig {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize, // number of output particles per chunk, bounds working memory
    #[serde(default)]
    pub parallel: bool, // `true` - chunks run on the rayon pool
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            parallel: false,
        }
    }
}

/// Clock and physical constants
#[allow(non_snake_case)]
#[derive(Deserialize, Debug, Clone)]
pub struct ParametersConfig {
    #[serde(default = "default_t0")]
    pub t0: f64, // start time
    pub t_end: f64, // end time
    pub dt: f64, // fixed step size
    pub softening: f64, // softening length, prevents singular forces at small separations
    pub G: f64, // gravitational constant
}

/// Initial state of a single body
#[derive(Deserialize, Debug, Clone)]
pub struct BodyConfig {
    pub x: [f64; 3], // initial position
    pub v: [f64; 3], // initial velocity
    pub m: f64, // mass, only used for the center-of-mass frame
}

/// Gaussian cluster: positions and velocities drawn from N(0, 1) per axis
#[derive(Deserialize, Debug, Clone)]
pub struct RandomClusterConfig {
    pub n: usize, // number of particles
    pub seed: u64, // deterministic seed to make runs reproducible
    pub total_mass: f64, // split evenly across the particles
}

/// Top-level scenario configuration loaded from YAML
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    pub parameters: ParametersConfig,
    #[serde(default)]
    pub bodies: Vec<BodyConfig>,
    pub random: Option<RandomClusterConfig>,
}
