//! Game Configuration
//!
//! Static settings consumed by the engine for one game session.
//! Option names follow the plugin's settings file so existing
//! configurations load unchanged.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How targets are handed out at the start of each round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Default)]
pub enum AssignmentMode {
    /// Every player draws their own target.
    #[default]
    #[serde(rename = "onePerPlayer", alias = "perPlayer")]
    PerPlayer,
    /// Every team draws one target shared by its members.
    #[serde(rename = "onePerTeam", alias = "perTeam")]
    PerTeam,
    /// One target for everybody in the round.
    #[serde(rename = "onePerRound", alias = "perRound")]
    PerRound,
}

impl std::fmt::Display for AssignmentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AssignmentMode::PerPlayer => "onePerPlayer",
            AssignmentMode::PerTeam => "onePerTeam",
            AssignmentMode::PerRound => "onePerRound",
        };
        f.write_str(name)
    }
}

/// Settings for one game session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameConfig {
    /// Rounds played before the game ends on its own.
    pub rounds_per_game: u32,
    /// Round length in seconds.
    #[serde(rename = "roundTime")]
    pub round_time: u32,
    /// Break length between rounds in seconds.
    #[serde(rename = "roundBreakTime")]
    pub round_break_time: u32,
    /// Target assignment policy.
    #[serde(rename = "blockAssignmentMode")]
    pub assignment_mode: AssignmentMode,
    /// Teams with a member who missed their target are removed.
    pub eliminate_after_round: bool,
    /// A team only counts as done once every member found their target.
    pub all_players_required_for_team_win: bool,
    /// The first finder ends the round for everybody.
    pub first_to_win: bool,
    /// Every finder adds a point instead of one point per team per round.
    pub team_score_increment_per_player: bool,
    /// Suppress all audio cues.
    pub mute_sounds: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rounds_per_game: 5,
            round_time: 300,
            round_break_time: 10,
            assignment_mode: AssignmentMode::PerPlayer,
            eliminate_after_round: false,
            all_players_required_for_team_win: false,
            first_to_win: false,
            team_score_increment_per_player: false,
            mute_sounds: false,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A game needs at least one round.
    #[error("roundsPerGame must be at least 1")]
    NoRounds,

    /// Round length of zero seconds.
    #[error("roundTime must be greater than 0")]
    ZeroRoundTime,

    /// Break length of zero seconds.
    #[error("roundBreakTime must be greater than 0")]
    ZeroBreakTime,

    /// Settings could not be parsed (includes unknown assignment modes).
    #[error("Invalid settings: {0}")]
    Parse(#[from] serde_json::Error),

    /// Settings file could not be read.
    #[error("Failed to read settings: {0}")]
    Io(#[from] std::io::Error),
}

impl GameConfig {
    /// Parse and validate settings from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a settings file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rounds_per_game == 0 {
            return Err(ConfigError::NoRounds);
        }
        if self.round_time == 0 {
            return Err(ConfigError::ZeroRoundTime);
        }
        if self.round_break_time == 0 {
            return Err(ConfigError::ZeroBreakTime);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plugin_settings() {
        let json = r#"{
            "roundsPerGame": 3,
            "roundTime": 30,
            "roundBreakTime": 5,
            "blockAssignmentMode": "onePerTeam",
            "eliminateAfterRound": true,
            "allPlayersRequiredForTeamWin": false,
            "firstToWin": true,
            "teamScoreIncrementPerPlayer": false,
            "muteSounds": true
        }"#;

        let config = GameConfig::from_json_str(json).unwrap();
        assert_eq!(config.rounds_per_game, 3);
        assert_eq!(config.round_time, 30);
        assert_eq!(config.round_break_time, 5);
        assert_eq!(config.assignment_mode, AssignmentMode::PerTeam);
        assert!(config.eliminate_after_round);
        assert!(config.first_to_win);
        assert!(config.mute_sounds);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config = GameConfig::from_json_str(r#"{ "roundTime": 45 }"#).unwrap();
        assert_eq!(config.round_time, 45);
        assert_eq!(config.rounds_per_game, GameConfig::default().rounds_per_game);
        assert_eq!(config.assignment_mode, AssignmentMode::PerPlayer);
    }

    #[test]
    fn test_mode_aliases() {
        let config = GameConfig::from_json_str(r#"{ "blockAssignmentMode": "perRound" }"#).unwrap();
        assert_eq!(config.assignment_mode, AssignmentMode::PerRound);
    }

    #[test]
    fn test_unknown_mode_fails_at_load() {
        let result = GameConfig::from_json_str(r#"{ "blockAssignmentMode": "onePerGalaxy" }"#);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_validate_ranges() {
        let result = GameConfig::from_json_str(r#"{ "roundsPerGame": 0 }"#);
        assert!(matches!(result, Err(ConfigError::NoRounds)));

        let result = GameConfig::from_json_str(r#"{ "roundTime": 0 }"#);
        assert!(matches!(result, Err(ConfigError::ZeroRoundTime)));

        let result = GameConfig::from_json_str(r#"{ "roundBreakTime": 0 }"#);
        assert!(matches!(result, Err(ConfigError::ZeroBreakTime)));
    }

    #[test]
    fn test_mode_display_matches_settings_name() {
        assert_eq!(AssignmentMode::PerTeam.to_string(), "onePerTeam");
    }
}
