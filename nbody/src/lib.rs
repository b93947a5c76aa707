pub mod simulation;
pub mod configuration;
pub mod benchmark;
pub mod error;
pub mod logging;

pub use error::{NBodyError, Result};

pub use simulation::states::{Body, ParticleSystem, NVec3};
pub use simulation::params::{PhysicalConstants, SimulationClock};
pub use simulation::engine::ChunkingConfig;
pub use simulation::forces::{AccelerationModel, ChunkedGravity, DirectGravity};
pub use simulation::integrator::{Integrator, IntegratorState, StepSnapshot, Trajectory};
pub use simulation::diagnostics::{energy, total_momentum, center_of_mass_velocity, Energy};
pub use simulation::scenario::{Scenario, random_cluster};

pub use configuration::config::{EngineConfig, ParametersConfig, BodyConfig, RandomClusterConfig, ScenarioConfig};

pub use benchmark::benchmark::bench_chunk_sizes;
