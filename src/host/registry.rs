//! In-Memory Team Registry
//!
//! Ordered teams with scores and members, plus the online roster.
//! Removal is final: a removed team never comes back within a game.

use std::collections::BTreeSet;

use tracing::debug;

use crate::game::collaborators::TeamRegistry;
use crate::game::state::{PlayerId, TeamId};

/// A registered team.
#[derive(Clone, Debug, PartialEq, Eq)]
struct TeamRecord {
    name: TeamId,
    score: u32,
    /// Members in join order
    members: Vec<PlayerId>,
}

/// Team registry kept in process memory.
#[derive(Clone, Debug, Default)]
pub struct InMemoryTeamRegistry {
    teams: Vec<TeamRecord>,
    online: BTreeSet<PlayerId>,
    scoreboard_visible: bool,
}

impl InMemoryTeamRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a team with online members. Members already on another
    /// team are moved.
    pub fn add_team(&mut self, name: &str, members: &[&str]) {
        let team = TeamId::new(name);
        self.create_team(team.clone());
        for member in members {
            let player = PlayerId::new(*member);
            self.set_online(&player, true);
            self.join_team(&player, &team);
        }
    }

    /// Create an empty team. Returns false if the name is taken.
    pub fn create_team(&mut self, name: TeamId) -> bool {
        if self.find(&name).is_some() {
            return false;
        }
        self.teams.push(TeamRecord {
            name,
            score: 0,
            members: Vec::new(),
        });
        true
    }

    /// Move `player` onto `team`. Returns false for unknown teams.
    pub fn join_team(&mut self, player: &PlayerId, team: &TeamId) -> bool {
        if self.find(team).is_none() {
            return false;
        }
        self.leave_team(player);
        if let Some(record) = self.find_mut(team) {
            record.members.push(player.clone());
        }
        true
    }

    /// Take `player` off whatever team they are on.
    pub fn leave_team(&mut self, player: &PlayerId) {
        for record in &mut self.teams {
            record.members.retain(|member| member != player);
        }
    }

    /// Mark a player online or offline.
    pub fn set_online(&mut self, player: &PlayerId, online: bool) {
        if online {
            self.online.insert(player.clone());
        } else {
            self.online.remove(player);
        }
    }

    /// Everyone online, with or without a team.
    pub fn online_players(&self) -> Vec<PlayerId> {
        self.online.iter().cloned().collect()
    }

    /// Are scoreboards currently shown?
    pub fn scoreboard_visible(&self) -> bool {
        self.scoreboard_visible
    }

    fn find(&self, team: &TeamId) -> Option<&TeamRecord> {
        self.teams.iter().find(|record| &record.name == team)
    }

    fn find_mut(&mut self, team: &TeamId) -> Option<&mut TeamRecord> {
        self.teams.iter_mut().find(|record| &record.name == team)
    }
}

impl TeamRegistry for InMemoryTeamRegistry {
    fn teams(&self) -> Vec<TeamId> {
        self.teams.iter().map(|record| record.name.clone()).collect()
    }

    fn members(&self, team: &TeamId) -> Vec<PlayerId> {
        self.find(team)
            .map(|record| record.members.clone())
            .unwrap_or_default()
    }

    fn team_of(&self, player: &PlayerId) -> Option<TeamId> {
        self.teams
            .iter()
            .find(|record| record.members.contains(player))
            .map(|record| record.name.clone())
    }

    fn is_online(&self, player: &PlayerId) -> bool {
        self.online.contains(player)
    }

    fn score(&self, team: &TeamId) -> u32 {
        self.find(team).map(|record| record.score).unwrap_or(0)
    }

    fn increment_score(&mut self, team: &TeamId) {
        if let Some(record) = self.find_mut(team) {
            record.score = record.score.saturating_add(1);
        }
    }

    fn remove_team(&mut self, team: &TeamId) {
        self.teams.retain(|record| &record.name != team);
    }

    fn fold_strays(&mut self) {
        let strays: Vec<PlayerId> = self
            .online
            .iter()
            .filter(|player| self.team_of(player).is_none())
            .cloned()
            .collect();

        for player in strays {
            let mut name = TeamId::new(player.as_str());
            let mut suffix = 2;
            while self.find(&name).is_some() {
                name = TeamId::new(format!("{}{}", player, suffix));
                suffix += 1;
            }
            debug!("Putting {} in their own team {}", player, name);
            self.create_team(name.clone());
            self.join_team(&player, &name);
        }
    }

    fn setup_scoreboard(&mut self) {
        for record in &mut self.teams {
            record.score = 0;
        }
        self.scoreboard_visible = true;
    }

    fn clear_scoreboards(&mut self) {
        self.scoreboard_visible = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(name: &str) -> PlayerId {
        PlayerId::new(name)
    }

    #[test]
    fn test_membership() {
        let mut registry = InMemoryTeamRegistry::new();
        registry.add_team("red", &["alice", "bob"]);
        registry.add_team("blue", &["carol"]);

        assert_eq!(registry.teams(), vec![TeamId::new("red"), TeamId::new("blue")]);
        assert_eq!(registry.members(&TeamId::new("red")), vec![id("alice"), id("bob")]);
        assert_eq!(registry.team_of(&id("carol")), Some(TeamId::new("blue")));
        assert_eq!(registry.players_with_team().len(), 3);

        registry.join_team(&id("bob"), &TeamId::new("blue"));
        assert_eq!(registry.members(&TeamId::new("red")), vec![id("alice")]);
        assert_eq!(registry.members(&TeamId::new("blue")), vec![id("carol"), id("bob")]);
    }

    #[test]
    fn test_fold_strays() {
        let mut registry = InMemoryTeamRegistry::new();
        registry.add_team("red", &["alice"]);
        registry.set_online(&id("zed"), true);
        registry.set_online(&id("ghost"), true);
        registry.set_online(&id("ghost"), false);

        registry.fold_strays();

        assert_eq!(registry.team_of(&id("zed")), Some(TeamId::new("zed")));
        assert_eq!(registry.team_of(&id("ghost")), None);
        assert_eq!(registry.teams().len(), 2);
    }

    #[test]
    fn test_fold_strays_avoids_name_clash() {
        let mut registry = InMemoryTeamRegistry::new();
        registry.add_team("zed", &["alice"]);
        registry.set_online(&id("zed"), true);

        registry.fold_strays();

        assert_eq!(registry.team_of(&id("zed")), Some(TeamId::new("zed2")));
    }

    #[test]
    fn test_sorted_by_score_is_stable() {
        let mut registry = InMemoryTeamRegistry::new();
        registry.add_team("C", &["c"]);
        registry.add_team("A", &["a"]);
        registry.add_team("B", &["b"]);

        for _ in 0..3 {
            registry.increment_score(&TeamId::new("C"));
        }
        for _ in 0..5 {
            registry.increment_score(&TeamId::new("A"));
            registry.increment_score(&TeamId::new("B"));
        }

        let order: Vec<_> = registry
            .sorted_by_score()
            .into_iter()
            .map(|(team, score)| (team.0, score))
            .collect();
        assert_eq!(
            order,
            vec![("A".to_string(), 5), ("B".to_string(), 5), ("C".to_string(), 3)]
        );
    }

    #[test]
    fn test_remove_team_and_scoreboard() {
        let mut registry = InMemoryTeamRegistry::new();
        registry.add_team("red", &["alice"]);
        registry.increment_score(&TeamId::new("red"));

        registry.setup_scoreboard();
        assert!(registry.scoreboard_visible());
        assert_eq!(registry.score(&TeamId::new("red")), 0);

        registry.remove_team(&TeamId::new("red"));
        assert!(registry.teams().is_empty());
        assert_eq!(registry.team_of(&id("alice")), None);
        assert_eq!(registry.score(&TeamId::new("red")), 0);

        registry.clear_scoreboards();
        assert!(!registry.scoreboard_visible());
    }
}
