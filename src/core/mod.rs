/*!
 * Core Module
 * Fundamental simulation types, configuration and error handling
 */

pub mod config;
pub mod errors;
pub mod limits;
pub mod random;
pub mod types;

// Re-export for convenience
pub use config::{Difficulty, SimConfig};
pub use errors::*;
pub use random::{RandomSource, SeededRandom, StubMode, StubRandom};
pub use types::*;
