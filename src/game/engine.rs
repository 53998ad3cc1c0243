//! Game Engine
//!
//! The round/game lifecycle state machine and the sole mutator of game
//! state. The engine never waits: it reacts to scheduler tasks handed back
//! through [`GameEngine::run_task`] and to calls from the host.
//!
//! ```text
//!   NotStarted --start--> Active --end--> NotStarted
//!
//!   Active:  round --end_round--> break --expiry--> round --> ...
//!                       \-- last team / no rounds left --> end_game
//! ```
//!
//! The host must serialize every entry point; the engine does no locking.

use thiserror::Error;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::game::assignment::{draw_assignments, AssignmentError};
use crate::game::collaborators::{
    PresentationSink, Scheduler, TargetCatalog, Task, TaskHandle, TeamRegistry,
};
use crate::game::config::{ConfigError, GameConfig};
use crate::game::cues;
use crate::game::events::{Audience, Countdown, CountdownPhase, CueRequest};
use crate::game::scoring::{earns_point, judge_round, win_shortcut, WinShortcut};
use crate::game::state::{GameState, PlayerId, RoundBook, TargetId, TeamId};
use crate::game::summary::{EliminatedTeam, GameSummary};
use crate::TICKS_PER_SECOND;

/// Errors that abort a running game.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// Targets could not be assigned.
    #[error("Target assignment failed: {0}")]
    Assignment(#[from] AssignmentError),
}

/// Which phase timer is live.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundPhase {
    /// No timer running
    NoRound,
    /// Round timer running
    RoundActive,
    /// Break timer running
    RoundBreak,
}

/// The live phase timer. Holding the handle inside the variant makes
/// "round and break timer both running" unrepresentable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PhaseTimer {
    Idle,
    Round(TaskHandle),
    Break(TaskHandle),
}

impl PhaseTimer {
    fn handle(self) -> Option<TaskHandle> {
        match self {
            PhaseTimer::Idle => None,
            PhaseTimer::Round(handle) | PhaseTimer::Break(handle) => Some(handle),
        }
    }
}

/// The block shuffle game engine.
pub struct GameEngine<R, C, P, S> {
    config: GameConfig,
    registry: R,
    catalog: C,
    sink: P,
    scheduler: S,

    state: GameState,
    game_id: Uuid,
    timer: PhaseTimer,
    rounds_remaining: u32,
    rounds_played: u32,
    seconds_left: u32,
    book: RoundBook,
    eliminated: Vec<EliminatedTeam>,

    last_error: Option<GameError>,
    last_summary: Option<GameSummary>,
}

impl<R, C, P, S> GameEngine<R, C, P, S>
where
    R: TeamRegistry,
    C: TargetCatalog,
    P: PresentationSink,
    S: Scheduler,
{
    /// Create an engine for one game session. Rejects invalid settings.
    pub fn new(
        config: GameConfig,
        registry: R,
        catalog: C,
        sink: P,
        scheduler: S,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            config,
            registry,
            catalog,
            sink,
            scheduler,
            state: GameState::NotStarted,
            game_id: Uuid::nil(),
            timer: PhaseTimer::Idle,
            rounds_remaining: 0,
            rounds_played: 0,
            seconds_left: 0,
            book: RoundBook::new(),
            eliminated: Vec::new(),
            last_error: None,
            last_summary: None,
        })
    }

    // =========================================================================
    // INBOUND
    // =========================================================================

    /// Request a lifecycle transition. Returns false if already in `target`.
    ///
    /// A start that fails during target assignment still returns true; the
    /// game is then back in `NotStarted` and [`last_error`](Self::last_error)
    /// says why.
    pub fn set_game_state(&mut self, target: GameState) -> bool {
        if self.state == target {
            return false;
        }

        match target {
            GameState::Active => {
                self.state = GameState::Active;
                self.start_game();
            }
            GameState::NotStarted => self.end_game(),
        }
        true
    }

    /// A player found their target.
    ///
    /// Ignored unless a round is running and the player owes a target.
    pub fn player_found_target(&mut self, player: &PlayerId) {
        if self.state != GameState::Active || !matches!(self.timer, PhaseTimer::Round(_)) {
            debug!("Ignoring find by {}: no round running", player);
            return;
        }
        if !self.book.owes(player) {
            debug!("Ignoring find by {}: nothing owed", player);
            return;
        }

        let team = self.registry.team_of(player);
        let members = team
            .as_ref()
            .map(|team| self.registry.members(team))
            .unwrap_or_default();

        let scores = team.is_some() && earns_point(&self.config, &self.book, player, &members);

        self.book.credit(player);
        self.queue_cues(cues::discovery_cues(player, true));

        if let (true, Some(team)) = (scores, team.as_ref()) {
            self.registry.increment_score(team);
        }

        info!(
            "{} found their target with {}s left (team {}, scored: {})",
            player,
            self.seconds_left,
            team.as_ref().map(TeamId::as_str).unwrap_or("-"),
            scores
        );

        match win_shortcut(&self.config, &self.book, &members) {
            WinShortcut::EndRound { credit_teammates } => {
                if credit_teammates {
                    for member in &members {
                        self.book.force_credit(member);
                    }
                }
                self.end_round();
            }
            WinShortcut::FinishTeam => {
                if let Some(team) = team {
                    info!("Team {} finished the round", team);
                    self.book.forget_members(&members);
                }
            }
            WinShortcut::Continue => {}
        }
    }

    /// Dispatch a task the scheduler says is due.
    ///
    /// Timer tasks whose handle is not the live phase timer are stale and
    /// dropped.
    pub fn run_task(&mut self, handle: TaskHandle, task: Task) {
        match task {
            Task::RoundTick if self.timer == PhaseTimer::Round(handle) => self.round_tick(),
            Task::BreakTick if self.timer == PhaseTimer::Break(handle) => self.break_tick(),
            Task::Cue { audience, cue } => self.sink.play_cue(&audience, cue),
            stale => {
                debug!("Dropping stale task {:?} ({:?})", stale, handle);
                self.scheduler.cancel(handle);
            }
        }
    }

    /// End the running round now. No-op when no round is running.
    pub fn end_round(&mut self) {
        if !matches!(self.timer, PhaseTimer::Round(_)) {
            return;
        }
        self.cancel_timer();

        let teams: Vec<(TeamId, Vec<PlayerId>)> = self
            .registry
            .teams()
            .into_iter()
            .map(|team| {
                let members = self.registry.members(&team);
                (team, members)
            })
            .collect();

        let verdict = judge_round(&self.config, &self.book, &teams);

        for team in &verdict.incomplete {
            self.sink.broadcast(&format!("{} eliminated!", team));
        }
        for player in &verdict.missed {
            self.queue_cues(cues::discovery_cues(player, false));
        }

        self.book.clear();
        self.sink.clear_countdown();
        self.rounds_played += 1;

        self.eliminate_teams(&verdict.eliminated);

        self.rounds_remaining = self.rounds_remaining.saturating_sub(1);
        let teams_left = self.registry.teams().len();

        info!(
            "Round {} ended: {} missed, {} eliminated, {} teams left, {} rounds remaining",
            self.rounds_played,
            verdict.missed.len(),
            verdict.eliminated.len(),
            teams_left,
            self.rounds_remaining
        );

        if self.config.eliminate_after_round && teams_left == 1 {
            info!("One team left standing");
            self.end_game();
            return;
        }
        if self.rounds_remaining == 0 {
            self.end_game();
            return;
        }
        if teams_left == 0 {
            warn!("No teams left, ending game");
            self.end_game();
            return;
        }

        self.round_break();
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    /// Current lifecycle state.
    pub fn state(&self) -> GameState {
        self.state
    }

    /// Which phase timer is live.
    pub fn round_phase(&self) -> RoundPhase {
        match self.timer {
            PhaseTimer::Idle => RoundPhase::NoRound,
            PhaseTimer::Round(_) => RoundPhase::RoundActive,
            PhaseTimer::Break(_) => RoundPhase::RoundBreak,
        }
    }

    /// Rounds left before the game ends on its own.
    pub fn rounds_remaining(&self) -> u32 {
        self.rounds_remaining
    }

    /// Rounds completed in the current (or last) game.
    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    /// Seconds left in the running round or break.
    pub fn seconds_left(&self) -> u32 {
        self.seconds_left
    }

    /// Identifier of the current (or last) game.
    pub fn game_id(&self) -> Uuid {
        self.game_id
    }

    /// Targets `player` still owes this round.
    pub fn targets_of(&self, player: &PlayerId) -> Option<&[TargetId]> {
        self.book.targets_of(player)
    }

    /// Has `player` been credited this round?
    pub fn has_found(&self, player: &PlayerId) -> bool {
        self.book.has_found(player)
    }

    /// Number of players still owing a target this round.
    pub fn owing_count(&self) -> usize {
        self.book.owing_count()
    }

    /// Why the last game was aborted, if it was.
    pub fn last_error(&self) -> Option<&GameError> {
        self.last_error.as_ref()
    }

    /// Standings of the last finished game.
    pub fn last_summary(&self) -> Option<&GameSummary> {
        self.last_summary.as_ref()
    }

    /// Game settings.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Team registry.
    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Team registry, for roster changes between calls.
    pub fn registry_mut(&mut self) -> &mut R {
        &mut self.registry
    }

    /// Target catalog.
    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Presentation sink.
    pub fn sink(&self) -> &P {
        &self.sink
    }

    /// Presentation sink, mutable.
    pub fn sink_mut(&mut self) -> &mut P {
        &mut self.sink
    }

    /// Scheduler.
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Scheduler, for the host to advance time and pop due tasks.
    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    fn start_game(&mut self) {
        self.game_id = Uuid::new_v4();
        self.book.clear();
        self.eliminated.clear();
        self.rounds_played = 0;
        self.last_error = None;

        self.registry.fold_strays();
        self.registry.setup_scoreboard();

        self.rounds_remaining = self.config.rounds_per_game;

        info!(
            "Game {} started: {} teams, {} rounds of {}s, mode {}",
            self.game_id,
            self.registry.teams().len(),
            self.config.rounds_per_game,
            self.config.round_time,
            self.config.assignment_mode
        );

        self.new_round();
    }

    fn new_round(&mut self) {
        self.cancel_timer();
        self.book.clear();

        let assignments = match draw_assignments(&self.config, &self.registry, &mut self.catalog) {
            Ok(assignments) => assignments,
            Err(err) => {
                self.abort(err.into());
                return;
            }
        };

        for assignment in assignments {
            debug!("{} got {:?}", assignment.player, assignment.targets);
            if self.registry.is_online(&assignment.player) {
                let text = format!("Your target is: {}", assignment.display_name());
                self.sink.message(&assignment.player, &text);
            }
            self.book.assign(assignment.player, assignment.targets);
        }

        self.seconds_left = self.config.round_time;
        let handle = self
            .scheduler
            .schedule_repeating(Task::RoundTick, 0, TICKS_PER_SECOND);
        self.timer = PhaseTimer::Round(handle);

        info!("Round {} started", self.rounds_played + 1);
    }

    fn round_tick(&mut self) {
        let Some(left) = self.seconds_left.checked_sub(1) else {
            self.end_round();
            return;
        };

        self.seconds_left = left;
        let countdown = Countdown::new(CountdownPhase::Round, left, self.config.round_time);
        self.sink.update_countdown(&countdown);

        if left < 61 {
            self.queue_cues(cues::round_cues(left, self.config.round_time));
        }
    }

    fn round_break(&mut self) {
        self.cancel_timer();

        self.seconds_left = self.config.round_break_time;
        let handle = self
            .scheduler
            .schedule_repeating(Task::BreakTick, 0, TICKS_PER_SECOND);
        self.timer = PhaseTimer::Break(handle);

        info!("Break of {}s started", self.config.round_break_time);
    }

    fn break_tick(&mut self) {
        let Some(left) = self.seconds_left.checked_sub(1) else {
            self.cancel_timer();
            self.sink.clear_countdown();
            self.new_round();
            return;
        };

        self.seconds_left = left;
        self.queue_cues(cues::break_cues(left));

        let countdown = Countdown::new(CountdownPhase::Break, left, self.config.round_break_time);
        self.sink.update_countdown(&countdown);
    }

    fn end_game(&mut self) {
        if self.state == GameState::NotStarted {
            return;
        }
        self.cancel_timer();

        let summary = GameSummary::new(
            self.game_id,
            self.rounds_played,
            self.registry.sorted_by_score(),
            &self.eliminated,
        );

        info!(
            "Game {} ended after {} rounds, winner: {}",
            self.game_id,
            self.rounds_played,
            summary.winner().map(|s| s.team.as_str()).unwrap_or("-")
        );

        self.sink.show_summary(&summary);
        self.sink.clear_countdown();
        self.registry.clear_scoreboards();

        self.book.clear();
        self.eliminated.clear();
        self.seconds_left = 0;
        self.last_summary = Some(summary);
        self.state = GameState::NotStarted;
    }

    fn abort(&mut self, err: GameError) {
        error!("Game {} aborted: {}", self.game_id, err);
        self.sink.broadcast(&format!("Game aborted: {}", err));
        self.last_error = Some(err);
        self.end_game();
    }

    fn eliminate_teams(&mut self, teams: &[TeamId]) {
        for team in teams {
            let score = self.registry.score(team);
            self.sink.broadcast(&format!("{} has been eliminated!", team));
            self.registry.remove_team(team);

            info!("Team {} eliminated in round {} with {} points", team, self.rounds_played, score);
            self.eliminated.push(EliminatedTeam {
                team: team.clone(),
                score,
                round: self.rounds_played,
            });
        }
    }

    // =========================================================================
    // HELPERS
    // =========================================================================

    /// Cancel whichever phase timer is live.
    fn cancel_timer(&mut self) {
        if let Some(handle) = std::mem::replace(&mut self.timer, PhaseTimer::Idle).handle() {
            self.scheduler.cancel(handle);
        }
    }

    /// Play or schedule cues, honouring the mute flag and skipping
    /// players who are offline.
    fn queue_cues(&mut self, requests: Vec<CueRequest>) {
        if self.config.mute_sounds {
            return;
        }

        for request in requests {
            if let Audience::Player(player) = &request.audience {
                if !self.registry.is_online(player) {
                    continue;
                }
            }

            if request.delay_ticks == 0 {
                self.sink.play_cue(&request.audience, request.cue);
            } else {
                let task = Task::Cue {
                    audience: request.audience,
                    cue: request.cue,
                };
                self.scheduler.schedule_once(task, request.delay_ticks);
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
