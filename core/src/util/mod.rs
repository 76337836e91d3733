pub mod seed;

pub use seed::{derive_seed, instance_seed, FIXED_SEED};
