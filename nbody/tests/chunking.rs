use nbody::{random_cluster, ChunkedGravity, ChunkingConfig, PhysicalConstants, RandomClusterConfig};

use proptest::prelude::*;

proptest! {
    #[test]
    fn chunk_size_never_changes_the_result(n in 1usize..80, chunk_size in 1usize..100, seed in any::<u64>()) {
        let system = random_cluster(&RandomClusterConfig { n, seed, total_mass: 1.0 }).unwrap();
        let constants = PhysicalConstants::new(1.0, 0.05).unwrap();

        let reference = ChunkedGravity::new(n, &constants, &ChunkingConfig::new(n).unwrap()).unwrap();
        let chunked = ChunkedGravity::new(n, &constants, &ChunkingConfig::new(chunk_size).unwrap()).unwrap();

        prop_assert_eq!(chunked.num_chunks(), n.div_ceil(chunk_size));
        prop_assert_eq!(
            chunked.compute_accelerations(system.positions()).unwrap(),
            reference.compute_accelerations(system.positions()).unwrap()
        );
    }

    #[test]
    fn chunk_ranges_cover_every_index_once(n in 1usize..500, chunk_size in 1usize..600) {
        let ranges = ChunkingConfig::new(chunk_size).unwrap().ranges(n);
        let covered: Vec<usize> = ranges.into_iter().flatten().collect();
        prop_assert_eq!(covered, (0..n).collect::<Vec<_>>());
    }
}
