use rand::{SeedableRng, rngs::StdRng};

/// Build the random source for a render.
///
/// With a seed the whole pipeline is reproducible; without one the source is seeded from OS
/// entropy, which is the normal mode for producing handwriting.
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    }
}
