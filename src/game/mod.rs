//! Game Logic Module
//!
//! The engine and the rules it applies. Deterministic given the
//! collaborators' answers.
//!
//! ## Module Structure
//!
//! - `config`: Game settings and their validation
//! - `state`: Identifiers, lifecycle flag, per-round bookkeeping
//! - `collaborators`: Traits for teams, targets, presentation, timers
//! - `assignment`: Target assignment modes
//! - `scoring`: Scoring, win shortcuts, elimination verdicts
//! - `cues`: Audio cue schedule
//! - `events`: Notifications sent to the presentation layer
//! - `summary`: Final standings
//! - `engine`: The round/game state machine

pub mod config;
pub mod state;
pub mod collaborators;
pub mod assignment;
pub mod scoring;
pub mod cues;
pub mod events;
pub mod summary;
pub mod engine;

// Re-export key types
pub use config::{AssignmentMode, ConfigError, GameConfig};
pub use state::{GameState, PlayerId, TargetId, TeamId};
pub use collaborators::{PresentationSink, Scheduler, TargetCatalog, Task, TaskHandle, TeamRegistry};
pub use engine::{GameEngine, GameError, RoundPhase};
pub use events::{Audience, Countdown, Cue, Notice};
pub use summary::GameSummary;
