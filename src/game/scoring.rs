//! Scoring & Elimination Rules
//!
//! Decisions only; the engine applies them.

use crate::game::config::GameConfig;
use crate::game::state::{PlayerId, RoundBook, TeamId};

/// Should the finder's team get a point?
///
/// Must be called before the finder is credited in `book`. With per-player
/// scoring every find counts; otherwise only the team's first find of the
/// round does.
pub fn earns_point(
    config: &GameConfig,
    book: &RoundBook,
    finder: &PlayerId,
    team_members: &[PlayerId],
) -> bool {
    if config.team_score_increment_per_player {
        return true;
    }
    !team_members
        .iter()
        .filter(|member| *member != finder)
        .any(|member| book.has_found(member))
}

/// What a find does to the round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WinShortcut {
    /// End the round now, optionally crediting the finder's teammates first.
    EndRound {
        /// Mark the finder's teammates as found before the round ends
        credit_teammates: bool,
    },
    /// The finder's team is done; clear its bookkeeping, keep the round going.
    FinishTeam,
    /// Nothing special.
    Continue,
}

/// Evaluate the win shortcuts after the finder has been credited.
///
/// Priority: first-to-win, then "nobody owes anything", then team completion
/// under the all-players-required policy.
pub fn win_shortcut(
    config: &GameConfig,
    book: &RoundBook,
    team_members: &[PlayerId],
) -> WinShortcut {
    if config.first_to_win {
        return WinShortcut::EndRound {
            credit_teammates: !config.all_players_required_for_team_win,
        };
    }

    if !book.anyone_owes() {
        return WinShortcut::EndRound { credit_teammates: false };
    }

    if config.all_players_required_for_team_win
        && team_members.iter().all(|member| book.has_found(member))
    {
        return WinShortcut::FinishTeam;
    }

    WinShortcut::Continue
}

/// Result of evaluating a finished round.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoundVerdict {
    /// Teams to eliminate, in registry order, without duplicates
    pub eliminated: Vec<TeamId>,
    /// Teams removed by the all-players-required policy (announced early)
    pub incomplete: Vec<TeamId>,
    /// Players on a team who did not find their target
    pub missed: Vec<PlayerId>,
}

/// Judge every team at round end.
///
/// `teams` pairs each active team with its members in registry order.
/// Only players in the found set count as having found; a team that
/// finished early was dropped from it and is judged as missing.
pub fn judge_round(
    config: &GameConfig,
    book: &RoundBook,
    teams: &[(TeamId, Vec<PlayerId>)],
) -> RoundVerdict {
    let mut verdict = RoundVerdict::default();

    for (team, members) in teams {
        let missing: Vec<&PlayerId> = members
            .iter()
            .filter(|member| !book.has_found(member))
            .collect();

        if !missing.is_empty() {
            if config.eliminate_after_round || config.all_players_required_for_team_win {
                verdict.eliminated.push(team.clone());
            }
            if config.all_players_required_for_team_win {
                verdict.incomplete.push(team.clone());
            }
        }

        verdict.missed.extend(missing.into_iter().cloned());
    }

    verdict
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::TargetId;

    fn ids(names: &[&str]) -> Vec<PlayerId> {
        names.iter().map(|n| PlayerId::new(*n)).collect()
    }

    fn book_with(owing: &[&str]) -> RoundBook {
        let mut book = RoundBook::new();
        for name in owing {
            book.assign(PlayerId::new(*name), vec![TargetId::new("stone")]);
        }
        book
    }

    #[test]
    fn test_first_find_per_team_scores_once() {
        let config = GameConfig::default();
        let members = ids(&["a", "b", "c"]);
        let mut book = book_with(&["a", "b", "c"]);

        assert!(earns_point(&config, &book, &members[1], &members));
        book.credit(&members[1]);

        assert!(!earns_point(&config, &book, &members[0], &members));
    }

    #[test]
    fn test_per_player_scoring() {
        let config = GameConfig {
            team_score_increment_per_player: true,
            ..Default::default()
        };
        let members = ids(&["a", "b"]);
        let mut book = book_with(&["a", "b"]);
        book.credit(&members[0]);

        assert!(earns_point(&config, &book, &members[1], &members));
    }

    #[test]
    fn test_first_to_win_shortcut() {
        let members = ids(&["a"]);
        let book = book_with(&["b"]);

        let config = GameConfig { first_to_win: true, ..Default::default() };
        assert_eq!(win_shortcut(&config, &book, &members), WinShortcut::EndRound { credit_teammates: true });

        let config = GameConfig {
            first_to_win: true,
            all_players_required_for_team_win: true,
            ..Default::default()
        };
        assert_eq!(win_shortcut(&config, &book, &members), WinShortcut::EndRound { credit_teammates: false });
    }

    #[test]
    fn test_nobody_owes_ends_round() {
        let config = GameConfig::default();
        let book = RoundBook::new();
        assert_eq!(win_shortcut(&config, &book, &ids(&["a"])), WinShortcut::EndRound { credit_teammates: false });
    }

    #[test]
    fn test_team_finishes_early() {
        let config = GameConfig {
            all_players_required_for_team_win: true,
            ..Default::default()
        };
        let members = ids(&["a", "b"]);
        let mut book = book_with(&["a", "b", "x"]);

        book.credit(&members[0]);
        assert_eq!(win_shortcut(&config, &book, &members), WinShortcut::Continue);

        book.credit(&members[1]);
        assert_eq!(win_shortcut(&config, &book, &members), WinShortcut::FinishTeam);
    }

    #[test]
    fn test_judge_round_elimination() {
        let config = GameConfig {
            eliminate_after_round: true,
            ..Default::default()
        };
        let red = TeamId::new("red");
        let blue = TeamId::new("blue");
        let teams = vec![(red.clone(), ids(&["a", "b"])), (blue.clone(), ids(&["c"]))];

        let mut book = book_with(&["a", "b", "c"]);
        book.credit(&PlayerId::new("a"));
        book.credit(&PlayerId::new("c"));

        let verdict = judge_round(&config, &book, &teams);
        assert_eq!(verdict.eliminated, vec![red]);
        assert!(verdict.incomplete.is_empty());
        assert_eq!(verdict.missed, ids(&["b"]));
    }

    #[test]
    fn test_judge_round_without_elimination() {
        let config = GameConfig::default();
        let teams = vec![(TeamId::new("red"), ids(&["a"]))];
        let book = book_with(&["a"]);

        let verdict = judge_round(&config, &book, &teams);
        assert!(verdict.eliminated.is_empty());
        assert_eq!(verdict.missed, ids(&["a"]));
    }

    #[test]
    fn test_judge_round_all_required() {
        let config = GameConfig {
            all_players_required_for_team_win: true,
            ..Default::default()
        };
        let red = TeamId::new("red");
        let blue = TeamId::new("blue");
        let teams = vec![(red.clone(), ids(&["a", "b"])), (blue.clone(), ids(&["c", "d"]))];

        let mut book = book_with(&["a", "b", "c", "d"]);
        book.credit(&PlayerId::new("a"));
        book.credit(&PlayerId::new("b"));
        book.forget_members(&ids(&["a", "b"]));
        book.credit(&PlayerId::new("c"));

        // An early finish leaves the team out of the found set
        let verdict = judge_round(&config, &book, &teams);
        assert_eq!(verdict.eliminated, vec![red.clone(), blue.clone()]);
        assert_eq!(verdict.incomplete, vec![red, blue]);
        assert_eq!(verdict.missed, ids(&["a", "b", "d"]));
    }
}
