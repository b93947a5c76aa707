//! Runtime engine settings
//!
//! Controls how the force evaluation is partitioned: the chunk size that
//! bounds working memory and whether chunks run on the rayon pool.

use std::ops::Range;

use crate::error::{invalid, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkingConfig {
    chunk_size: usize, // number of output particles evaluated per chunk
    parallel: bool, // false = chunks in order on this thread, true = rayon
}

impl ChunkingConfig {
    pub fn new(chunk_size: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(invalid("chunk size must be > 0"));
        }
        Ok(Self {
            chunk_size,
            parallel: false,
        })
    }

    /// Evaluate chunks concurrently on the rayon thread pool
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    /// ceil(n / chunk_size)
    pub fn num_chunks(&self, n: usize) -> usize {
        n.div_ceil(self.chunk_size)
    }

    /// Contiguous, non-overlapping ranges covering [0, n).
    /// Every range has `chunk_size` elements except possibly the last.
    pub fn ranges(&self, n: usize) -> Vec<Range<usize>> {
        (0..self.num_chunks(n))
            .map(|c| {
                let start = c * self.chunk_size;
                start..(start + self.chunk_size).min(n)
            })
            .collect()
    }
}
