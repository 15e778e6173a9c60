//! Sources of nondeterminism the rules depend on.
//!
//! The game consumes a single oracle: the spawn RNG. It is injected rather
//! than global so hosts can seed it and tests can replay it.
pub mod rng;

pub use rng::{PcgRng, RngOracle, compute_seed};
