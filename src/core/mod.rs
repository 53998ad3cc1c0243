//! Core deterministic primitives.
//!
//! Everything the game layer draws randomness from lives here, so a seeded
//! game replays the same target draws on every platform.

pub mod rng;

// Re-export core types
pub use rng::{derive_game_seed, DeterministicRng};
