//! End-of-Game Summary
//!
//! Ranked standings pushed to the presentation sink when a game ends.
//!
//! Ranking: surviving teams by descending score, equal scores keep the
//! registry's registration order. Eliminated teams follow, the most
//! recently eliminated first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::game::state::TeamId;

/// One line of the final standings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    /// 1-based rank
    pub rank: u32,
    /// Team name
    pub team: TeamId,
    /// Final score
    pub score: u32,
    /// Round the team was eliminated in, if it was
    pub eliminated_in_round: Option<u32>,
}

/// A team removed during the game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EliminatedTeam {
    /// Team name
    pub team: TeamId,
    /// Score when removed
    pub score: u32,
    /// Round it fell in (1-based)
    pub round: u32,
}

/// Final standings of a game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSummary {
    /// Game identifier
    pub game_id: Uuid,
    /// Rounds completed
    pub rounds_played: u32,
    /// Ranked standings
    pub standings: Vec<Standing>,
    /// When the game ended
    pub ended_at: DateTime<Utc>,
}

impl GameSummary {
    /// Build standings from the registry's score order and the elimination log.
    ///
    /// `survivors` must already be sorted by descending score with stable
    /// tie-breaks. `eliminated` is in elimination order.
    pub fn new(
        game_id: Uuid,
        rounds_played: u32,
        survivors: Vec<(TeamId, u32)>,
        eliminated: &[EliminatedTeam],
    ) -> Self {
        let fallen = eliminated
            .iter()
            .rev()
            .map(|e| (e.team.clone(), e.score, Some(e.round)));

        let standings = survivors
            .into_iter()
            .map(|(team, score)| (team, score, None))
            .chain(fallen)
            .enumerate()
            .map(|(i, (team, score, eliminated_in_round))| Standing {
                rank: i as u32 + 1,
                team,
                score,
                eliminated_in_round,
            })
            .collect();

        Self {
            game_id,
            rounds_played,
            standings,
            ended_at: Utc::now(),
        }
    }

    /// Winning team, if any team took part.
    pub fn winner(&self) -> Option<&Standing> {
        self.standings.first()
    }

    /// Chat rendering of the standings.
    pub fn render(&self) -> String {
        let mut text = String::from("Game ended!\n Final scores:");
        for standing in &self.standings {
            text.push_str(&format!("\n {}. {}: {}", standing.rank, standing.team, standing.score));
            if let Some(round) = standing.eliminated_in_round {
                text.push_str(&format!(" (eliminated in round {})", round));
            }
        }
        text
    }
}
