//! # Block Shuffle
//!
//! Round and elimination engine for the Block Shuffle minigame: players get
//! hidden targets, race the clock to find them, and teams are scored and
//! eliminated round over round until a winner remains.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        BLOCK SHUFFLE                          │
//! ├──────────────────────────────────────────────────────────────┤
//! │  core/             - Deterministic primitives                 │
//! │  └── rng.rs        - Xorshift128+ PRNG, seed derivation       │
//! │                                                               │
//! │  game/             - Game logic (deterministic)               │
//! │  ├── config.rs     - Settings and validation                  │
//! │  ├── state.rs      - Ids, lifecycle flag, round bookkeeping   │
//! │  ├── collaborators - Registry/catalog/sink/scheduler traits   │
//! │  ├── assignment.rs - Target assignment modes                  │
//! │  ├── scoring.rs    - Scoring and elimination rules            │
//! │  ├── cues.rs       - Audio cue schedule                       │
//! │  ├── events.rs     - Notifications                            │
//! │  ├── summary.rs    - Final standings                          │
//! │  └── engine.rs     - Round/game state machine                 │
//! │                                                               │
//! │  host/             - Collaborators and drivers                │
//! │  ├── registry.rs   - In-memory teams                          │
//! │  ├── catalog.rs    - Weighted target catalog                  │
//! │  ├── sink.rs       - Recording and logging sinks              │
//! │  ├── scheduler.rs  - Virtual-time scheduler                   │
//! │  └── runtime.rs    - Serialized host, tokio realtime driver   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Execution Model
//!
//! The engine is single-threaded and reactive. It never blocks; every wait
//! is a scheduler task handed back to [`game::GameEngine::run_task`]. The
//! host must serialize all entry points.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod host;

// Re-export commonly used types
pub use core::rng::DeterministicRng;
pub use game::config::{AssignmentMode, GameConfig};
pub use game::engine::{GameEngine, GameError, RoundPhase};
pub use game::state::{GameState, PlayerId, TargetId, TeamId};
pub use host::runtime::{GameHost, HostCommand};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Scheduler ticks per second
pub const TICKS_PER_SECOND: u32 = 20;
