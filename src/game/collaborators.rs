//! Collaborator Contracts
//!
//! The engine owns no teams, no target list, no timers and no screen.
//! It talks to those through the traits below; `host` provides
//! in-process implementations.
//!
//! All collaborators are called from the engine's single execution
//! context. None of them may call back into the engine.

use serde::{Deserialize, Serialize};

use crate::game::config::GameConfig;
use crate::game::events::{Audience, Countdown, Cue};
use crate::game::state::{PlayerId, TargetId, TeamId};
use crate::game::summary::GameSummary;

// =============================================================================
// TEAM REGISTRY
// =============================================================================

/// Team membership, scores and scoreboards.
pub trait TeamRegistry {
    /// Active teams in registration order.
    fn teams(&self) -> Vec<TeamId>;

    /// Members of `team` in registry order. Unknown teams have no members.
    fn members(&self, team: &TeamId) -> Vec<PlayerId>;

    /// Team `player` belongs to, if any.
    fn team_of(&self, player: &PlayerId) -> Option<TeamId>;

    /// Is `player` currently online?
    fn is_online(&self, player: &PlayerId) -> bool;

    /// Every player currently on an active team.
    fn players_with_team(&self) -> Vec<PlayerId> {
        self.teams().iter().flat_map(|team| self.members(team)).collect()
    }

    /// Current score of `team`.
    fn score(&self, team: &TeamId) -> u32;

    /// Add one point to `team`.
    fn increment_score(&mut self, team: &TeamId);

    /// Remove `team` from the active set and its scoreboard entry.
    fn remove_team(&mut self, team: &TeamId);

    /// Put every online player without a team into a team of their own.
    fn fold_strays(&mut self);

    /// Show scoreboards for the active teams.
    fn setup_scoreboard(&mut self);

    /// Tear down scoreboards.
    fn clear_scoreboards(&mut self);

    /// Active teams by descending score; equal scores keep registration order.
    fn sorted_by_score(&self) -> Vec<(TeamId, u32)> {
        let mut teams: Vec<(TeamId, u32)> = self
            .teams()
            .into_iter()
            .map(|team| {
                let score = self.score(&team);
                (team, score)
            })
            .collect();
        // sort_by is stable
        teams.sort_by(|a, b| b.1.cmp(&a.1));
        teams
    }
}

// =============================================================================
// TARGET CATALOG
// =============================================================================

/// Source of random targets.
pub trait TargetCatalog {
    /// Draw a target. The list holds equivalent identifiers, first one is
    /// the display value. Implementations must not return an empty list;
    /// the engine treats one as a fatal error.
    fn random_target(&mut self, config: &GameConfig) -> Vec<TargetId>;
}

// =============================================================================
// PRESENTATION SINK
// =============================================================================

/// Fire-and-forget output channel.
pub trait PresentationSink {
    /// Refresh the countdown display.
    fn update_countdown(&mut self, countdown: &Countdown);

    /// Remove the countdown display.
    fn clear_countdown(&mut self);

    /// Chat line to everyone online.
    fn broadcast(&mut self, text: &str);

    /// Chat line to one online player.
    fn message(&mut self, player: &PlayerId, text: &str);

    /// Play an audio cue now.
    fn play_cue(&mut self, audience: &Audience, cue: Cue);

    /// Show the final standings.
    fn show_summary(&mut self, summary: &GameSummary);
}

// =============================================================================
// SCHEDULER
// =============================================================================

/// Opaque handle to a scheduled task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TaskHandle(pub u64);

/// Named callbacks the scheduler hands back to the engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Task {
    /// Once per second while a round runs
    RoundTick,
    /// Once per second while a break runs
    BreakTick,
    /// Delayed audio cue
    Cue {
        /// Who hears it
        audience: Audience,
        /// Which cue
        cue: Cue,
    },
}

/// Timer service.
///
/// Delays of zero run on the next scheduler tick, never inline.
pub trait Scheduler {
    /// Run `task` every `period_ticks`, first after `delay_ticks`.
    fn schedule_repeating(&mut self, task: Task, delay_ticks: u32, period_ticks: u32) -> TaskHandle;

    /// Run `task` once after `delay_ticks`.
    fn schedule_once(&mut self, task: Task, delay_ticks: u32) -> TaskHandle;

    /// Cancel a task. Unknown, finished or already cancelled handles are ignored.
    fn cancel(&mut self, handle: TaskHandle);
}
