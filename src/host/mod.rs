//! Host Layer
//!
//! In-process collaborators and drivers for the engine.
//! This layer is **non-deterministic** where it touches wall-clock time;
//! all game rules live in `game/`.

pub mod registry;
pub mod catalog;
pub mod sink;
pub mod scheduler;
pub mod runtime;

pub use registry::InMemoryTeamRegistry;
pub use catalog::{Category, CategoryCatalog, SequenceCatalog};
pub use sink::{RecordingSink, TracingSink};
pub use scheduler::ManualScheduler;
pub use runtime::{run_realtime, GameHost, HostCommand};
