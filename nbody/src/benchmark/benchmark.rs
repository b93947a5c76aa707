use std::time::Instant;

use crate::error::Result;
use crate::simulation::engine::ChunkingConfig;
use crate::simulation::forces::{AccelerationModel, ChunkedGravity, DirectGravity};
use crate::simulation::params::PhysicalConstants;
use crate::simulation::states::NVec3;

/// Deterministic positions for `n` particles, no rand needed
pub fn make_positions(n: usize) -> Vec<NVec3> {
    (0..n)
        .map(|i| {
            let i_f = i as f64;
            NVec3::new(
                (i_f * 0.37).sin() * 5.0,
                (i_f * 0.13).cos() * 5.0,
                (i_f * 0.07).sin() * 5.0,
            )
        })
        .collect()
}

/// Average wall time in ms of `reps` evaluations, after one warm-up call
fn time_model(model: &impl AccelerationModel, positions: &[NVec3], out: &mut [NVec3], reps: usize) -> Result<f64> {
    model.accumulate(positions, out)?;

    let t0 = Instant::now();
    for _ in 0..reps {
        model.accumulate(positions, out)?;
    }
    Ok(t0.elapsed().as_secs_f64() * 1000.0 / reps as f64)
}

/// Time direct, chunked-serial and chunked-parallel evaluation for every
/// (n, chunk size) pair. Prints CSV, paste into a spreadsheet to graph.
pub fn bench_chunk_sizes(sizes: &[usize], chunk_sizes: &[usize]) -> Result<()> {
    let constants = PhysicalConstants::new(0.1, 1e-2)?;

    println!("n,chunk_size,num_chunks,direct_ms,chunked_ms,parallel_ms");

    for &n in sizes {
        let positions = make_positions(n);
        let mut out = vec![NVec3::zeros(); n];
        // small n: average a few calls to smooth noise
        let reps = if n <= 1000 { 5 } else { 1 };

        let direct = DirectGravity::new(n, &constants)?;
        let direct_ms = time_model(&direct, &positions, &mut out, reps)?;

        for &chunk_size in chunk_sizes {
            let chunking = ChunkingConfig::new(chunk_size)?;
            let serial = ChunkedGravity::new(n, &constants, &chunking)?;
            let parallel = ChunkedGravity::new(n, &constants, &chunking.parallel(true))?;

            let serial_ms = time_model(&serial, &positions, &mut out, reps)?;
            let parallel_ms = time_model(&parallel, &positions, &mut out, reps)?;

            println!(
                "{},{},{},{:.6},{:.6},{:.6}",
                n,
                chunk_size,
                serial.num_chunks(),
                direct_ms,
                serial_ms,
                parallel_ms
            );
        }
    }

    Ok(())
}
