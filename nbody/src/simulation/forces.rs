//! Acceleration models for the n-body engine
//!
//! Both models evaluate the softened inverse-square law
//!
//!   a_i = G * sum_j (p_j - p_i) / (|p_j - p_i|^2 + eps^2)^(3/2)
//!
//! Sources are not weighted by mass, and a particle's own mass never enters
//! its acceleration.
//!
//! Any source at exactly zero softened distance from the target contributes
//! nothing. This covers the self term and, when eps = 0, coincident
//! particles. Non-finite positions still propagate into the result.

use std::ops::Range;

use log::debug;
use rayon::prelude::*;

use crate::error::{invalid, NBodyError, Result};
use crate::simulation::engine::ChunkingConfig;
use crate::simulation::params::PhysicalConstants;
use crate::simulation::states::NVec3;

/// Trait for acceleration sources driven by the integrator
///
/// `accumulate` overwrites `out[i]` with the acceleration of particle `i`.
/// Both slices must have length `particle_count()`; anything else is
/// rejected before `out` is touched.
pub trait AccelerationModel {
    fn particle_count(&self) -> usize;

    fn accumulate(&self, positions: &[NVec3], out: &mut [NVec3]) -> Result<()>;
}

/// Reject position or output slices that do not match the model size
fn check_lengths(n: usize, positions: &[NVec3], out: &[NVec3]) -> Result<()> {
    if positions.len() != n {
        return Err(NBodyError::PositionCountMismatch {
            expected: n,
            found: positions.len(),
        });
    }
    if out.len() != n {
        return Err(NBodyError::OutputLengthMismatch {
            expected: n,
            found: out.len(),
        });
    }
    Ok(())
}

/// Contribution of the source at `pj` to the target at `pi`, without the G factor
#[inline]
fn pair_term(pi: &NVec3, pj: &NVec3, eps2: f64) -> Option<NVec3> {
    // r points from target to source, the direction of the pull
    let r = pj - pi;

    // softened squared distance |r|^2 + eps^2
    let d2 = r.dot(&r) + eps2;
    if d2 == 0.0 {
        return None;
    }

    // 1 / |r_soft|^3
    let inv_r = d2.sqrt().recip();
    let inv_r3 = inv_r * inv_r * inv_r;

    Some(r * inv_r3)
}

/// Chunked direct-summation gravity
///
/// The output index range [0, N) is split into contiguous chunks of
/// `chunk_size` targets. Each chunk sums over the full source population
/// and writes only its own slice of the output, so working memory per
/// chunk is bounded by the chunk and chunks never share mutable state.
#[derive(Debug, Clone)]
pub struct ChunkedGravity {
    n: usize,
    g: f64,
    eps2: f64,
    chunk_size: usize,
    parallel: bool,
    chunks: Vec<Range<usize>>, // precomputed partition of [0, n)
}

impl ChunkedGravity {
    pub fn new(n: usize, constants: &PhysicalConstants, chunking: &ChunkingConfig) -> Result<Self> {
        if n == 0 {
            return Err(invalid("force evaluator needs at least one particle"));
        }
        let chunks = chunking.ranges(n);
        debug!(
            "chunked gravity: n = {n}, chunk size = {}, chunks = {}, parallel = {}",
            chunking.chunk_size(),
            chunks.len(),
            chunking.is_parallel()
        );

        Ok(Self {
            n,
            g: constants.g(),
            eps2: constants.softening2(),
            chunk_size: chunking.chunk_size(),
            parallel: chunking.is_parallel(),
            chunks,
        })
    }

    pub fn num_chunks(&self) -> usize {
        self.chunks.len()
    }

    pub fn chunk_ranges(&self) -> &[Range<usize>] {
        &self.chunks
    }

    /// Compute a fresh acceleration array for `positions`
    pub fn compute_accelerations(&self, positions: &[NVec3]) -> Result<Vec<NVec3>> {
        let mut out = vec![NVec3::zeros(); self.n];
        self.accumulate(positions, &mut out)?;
        Ok(out)
    }

    /// Fill one chunk of the output: targets `range`, sources all of `positions`
    fn evaluate_chunk(&self, positions: &[NVec3], range: Range<usize>, acc: &mut [NVec3]) {
        for (slot, i) in acc.iter_mut().zip(range) {
            let pi = &positions[i];
            let mut sum = NVec3::zeros();

            for (j, pj) in positions.iter().enumerate() {
                if j == i {
                    continue;
                }
                if let Some(term) = pair_term(pi, pj, self.eps2) {
                    sum += term;
                }
            }

            *slot = self.g * sum;
        }
    }
}

impl AccelerationModel for ChunkedGravity {
    fn particle_count(&self) -> usize {
        self.n
    }

    fn accumulate(&self, positions: &[NVec3], out: &mut [NVec3]) -> Result<()> {
        check_lengths(self.n, positions, out)?;

        if self.parallel {
            out.par_chunks_mut(self.chunk_size)
                .zip(self.chunks.par_iter())
                .for_each(|(acc, range)| self.evaluate_chunk(positions, range.clone(), acc));
        } else {
            for (acc, range) in out.chunks_mut(self.chunk_size).zip(self.chunks.iter()) {
                self.evaluate_chunk(positions, range.clone(), acc);
            }
        }
        Ok(())
    }
}

/// Direct all-pairs gravity (unordered pairs, i < j)
///
/// Same law as [`ChunkedGravity`] without chunking; each pair term is
/// computed once and applied with opposite signs. Used as a baseline.
#[derive(Debug, Clone)]
pub struct DirectGravity {
    n: usize,
    g: f64,
    eps2: f64,
}

impl DirectGravity {
    pub fn new(n: usize, constants: &PhysicalConstants) -> Result<Self> {
        if n == 0 {
            return Err(invalid("force evaluator needs at least one particle"));
        }
        Ok(Self {
            n,
            g: constants.g(),
            eps2: constants.softening2(),
        })
    }
}

impl AccelerationModel for DirectGravity {
    fn particle_count(&self) -> usize {
        self.n
    }

    fn accumulate(&self, positions: &[NVec3], out: &mut [NVec3]) -> Result<()> {
        check_lengths(self.n, positions, out)?;

        // Zero buffer
        for a in out.iter_mut() {
            *a = NVec3::zeros();
        }

        for i in 0..positions.len() {
            let pi = &positions[i];
            for j in (i + 1)..positions.len() {
                // i is pulled along +r, j along -r
                if let Some(term) = pair_term(pi, &positions[j], self.eps2) {
                    out[i] += term;
                    out[j] -= term;
                }
            }
        }

        for a in out.iter_mut() {
            *a *= self.g;
        }
        Ok(())
    }
}
