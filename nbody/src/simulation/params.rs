//! Numerical and physical parameters for the simulation
//!
//! - `PhysicalConstants`: gravitational constant and softening length
//! - `SimulationClock`: start time, end time and fixed step size
//!
//! Both are validated on construction and immutable for the run.

use crate::error::{invalid, Result};

#[allow(non_snake_case)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicalConstants {
    G: f64, // gravitational constant
    softening: f64, // softening length epsilon
}

impl PhysicalConstants {
    #[allow(non_snake_case)]
    pub fn new(G: f64, softening: f64) -> Result<Self> {
        if !G.is_finite() {
            return Err(invalid(format!("gravitational constant must be finite, got {G}")));
        }
        if !(softening.is_finite() && softening >= 0.0) {
            return Err(invalid(format!("softening must be finite and >= 0, got {softening}")));
        }
        Ok(Self { G, softening })
    }

    pub fn g(&self) -> f64 {
        self.G
    }

    pub fn softening(&self) -> f64 {
        self.softening
    }

    /// epsilon^2, the term added to every squared separation
    pub fn softening2(&self) -> f64 {
        self.softening * self.softening
    }
}

/// Slack, in units of the ratio's ULP, when deciding whether
/// (t_end - t0) / dt is a whole number
const STEP_COUNT_ULPS: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationClock {
    t0: f64, // start time
    t_end: f64, // end time
    dt: f64, // step size
}

impl SimulationClock {
    pub fn new(t0: f64, t_end: f64, dt: f64) -> Result<Self> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(invalid(format!("dt must be finite and > 0, got {dt}")));
        }
        if !(t0.is_finite() && t_end.is_finite()) {
            return Err(invalid(format!("t0 and t_end must be finite, got {t0} and {t_end}")));
        }
        if t_end < t0 {
            return Err(invalid(format!("t_end ({t_end}) must not precede t0 ({t0})")));
        }
        let steps = step_count(t0, t_end, dt);
        if steps >= usize::MAX as f64 {
            return Err(invalid(format!("run of {steps} steps does not fit in a step counter")));
        }
        Ok(Self { t0, t_end, dt })
    }

    pub fn t0(&self) -> f64 {
        self.t0
    }

    pub fn t_end(&self) -> f64 {
        self.t_end
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Nt = ceil((t_end - t0) / dt)
    pub fn num_steps(&self) -> usize {
        // bounded by the check in `new`
        step_count(self.t0, self.t_end, self.dt) as usize
    }
}

/// ceil((t_end - t0) / dt), where a ratio within a few ULPs of an integer
/// snaps to it so rounding in the division never adds a spurious step
fn step_count(t0: f64, t_end: f64, dt: f64) -> f64 {
    let ratio = (t_end - t0) / dt;
    let nearest = ratio.round();
    if (ratio - nearest).abs() <= STEP_COUNT_ULPS * f64::EPSILON * nearest.max(1.0) {
        nearest
    } else {
        ratio.ceil()
    }
}
