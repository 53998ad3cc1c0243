//! Host Runtime
//!
//! `GameHost` is the single execution context the engine requires: every
//! entry point (ticks, commands, finds) goes through `&mut self`, so calls
//! are processed one at a time and to completion.
//!
//! `run_realtime` drives a host from wall-clock time with tokio. Commands
//! arrive on an mpsc channel and are interleaved with scheduler ticks by a
//! single `select!` loop, never concurrently.

use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::game::collaborators::{PresentationSink, TargetCatalog, TeamRegistry};
use crate::game::config::{ConfigError, GameConfig};
use crate::game::engine::GameEngine;
use crate::game::state::{GameState, PlayerId};
use crate::host::scheduler::ManualScheduler;
use crate::TICKS_PER_SECOND;

/// Commands accepted by the realtime driver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostCommand {
    /// Start a game
    Start,
    /// Stop the running game
    Stop,
    /// The detection layer saw a player find their target
    TargetFound(PlayerId),
}

/// Engine plus virtual clock.
pub struct GameHost<R, C, P> {
    engine: GameEngine<R, C, P, ManualScheduler>,
}

impl<R, C, P> GameHost<R, C, P>
where
    R: TeamRegistry,
    C: TargetCatalog,
    P: PresentationSink,
{
    /// Build a host around a fresh engine.
    pub fn new(config: GameConfig, registry: R, catalog: C, sink: P) -> Result<Self, ConfigError> {
        let engine = GameEngine::new(config, registry, catalog, sink, ManualScheduler::new())?;
        Ok(Self { engine })
    }

    /// Request a lifecycle transition. False if already in that state.
    pub fn set_game_state(&mut self, state: GameState) -> bool {
        self.engine.set_game_state(state)
    }

    /// Forward a find to the engine.
    pub fn target_found(&mut self, player: &PlayerId) {
        self.engine.player_found_target(player);
    }

    /// Apply a command.
    pub fn handle(&mut self, command: HostCommand) {
        debug!("Host command: {:?}", command);
        match command {
            HostCommand::Start => {
                if !self.set_game_state(GameState::Active) {
                    info!("Start ignored: game already running");
                }
            }
            HostCommand::Stop => {
                if !self.set_game_state(GameState::NotStarted) {
                    info!("Stop ignored: no game running");
                }
            }
            HostCommand::TargetFound(player) => self.target_found(&player),
        }
    }

    /// Advance one scheduler tick and run everything that became due.
    pub fn tick(&mut self) {
        self.engine.scheduler_mut().advance_clock();
        while let Some((handle, task)) = self.engine.scheduler_mut().pop_due() {
            self.engine.run_task(handle, task);
        }
    }

    /// Advance `ticks` scheduler ticks.
    pub fn advance_ticks(&mut self, ticks: u32) {
        for _ in 0..ticks {
            self.tick();
        }
    }

    /// Advance whole seconds.
    pub fn advance_seconds(&mut self, seconds: u32) {
        self.advance_ticks(seconds * TICKS_PER_SECOND);
    }

    /// Tick until the game is over or `max_ticks` have passed.
    /// Returns the number of ticks run.
    pub fn run_until_finished(&mut self, max_ticks: u64) -> u64 {
        let mut ran = 0;
        while self.engine.state() == GameState::Active && ran < max_ticks {
            self.tick();
            ran += 1;
        }
        ran
    }

    /// The engine.
    pub fn engine(&self) -> &GameEngine<R, C, P, ManualScheduler> {
        &self.engine
    }

    /// The engine, mutable.
    pub fn engine_mut(&mut self) -> &mut GameEngine<R, C, P, ManualScheduler> {
        &mut self.engine
    }
}

/// Wall-clock length of one scheduler tick.
pub fn tick_duration() -> Duration {
    Duration::from_millis(1000 / TICKS_PER_SECOND as u64)
}

/// Drive `host` in real time until `shutdown` fires or the command channel
/// closes. Returns the host so callers can inspect the final state.
pub async fn run_realtime<R, C, P>(
    mut host: GameHost<R, C, P>,
    mut commands: mpsc::Receiver<HostCommand>,
    mut shutdown: broadcast::Receiver<()>,
) -> GameHost<R, C, P>
where
    R: TeamRegistry,
    C: TargetCatalog,
    P: PresentationSink,
{
    let mut ticker = interval(tick_duration());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Burst);

    info!("Realtime host running at {} ticks/s", TICKS_PER_SECOND);

    loop {
        tokio::select! {
            _ = shutdown.recv() => {
                info!("Realtime host shutting down");
                break;
            }
            command = commands.recv() => match command {
                Some(command) => host.handle(command),
                None => {
                    info!("Command channel closed");
                    break;
                }
            },
            _ = ticker.tick() => host.tick(),
        }
    }

    host
}
