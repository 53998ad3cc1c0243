//! Game State Definitions
//!
//! Identifiers, the lifecycle flag and the per-round bookkeeping.
//! Uses BTreeMap/BTreeSet for deterministic iteration order.

use std::collections::{BTreeMap, BTreeSet};
use serde::{Deserialize, Serialize};

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Player identifier as known to the team registry (the player's name).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub String);

impl PlayerId {
    /// Create from anything string-like.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Borrow the underlying name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Team identifier (the team's name).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TeamId(pub String);

impl TeamId {
    /// Create from anything string-like.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Borrow the underlying name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TeamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Target identifier, e.g. `oak_log`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TargetId(pub String);

impl TargetId {
    /// Create from anything string-like.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Human readable name: underscores become spaces, words capitalized.
    ///
    /// ```
    /// use block_shuffle::game::state::TargetId;
    ///
    /// assert_eq!(TargetId::new("oak_log").display_name(), "Oak Log");
    /// ```
    pub fn display_name(&self) -> String {
        self.0
            .split('_')
            .filter(|word| !word.is_empty())
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl std::fmt::Display for TargetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// GAME STATE
// =============================================================================

/// Top-level lifecycle flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[derive(Default)]
pub enum GameState {
    /// No game running
    #[default]
    NotStarted,
    /// Rounds or breaks are running
    Active,
}

// =============================================================================
// ROUND BOOK
// =============================================================================

/// Who owes which targets, and who already found theirs, for one round.
///
/// A player is never stored with an empty target list; absence means
/// the player owes nothing.
#[derive(Clone, Debug, Default)]
pub struct RoundBook {
    assignments: BTreeMap<PlayerId, Vec<TargetId>>,
    found: BTreeSet<PlayerId>,
}

impl RoundBook {
    /// Create an empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `player` owes `targets`. Empty lists are not stored.
    pub fn assign(&mut self, player: PlayerId, targets: Vec<TargetId>) {
        if targets.is_empty() {
            self.assignments.remove(&player);
        } else {
            self.assignments.insert(player, targets);
        }
    }

    /// Targets currently owed by `player`.
    pub fn targets_of(&self, player: &PlayerId) -> Option<&[TargetId]> {
        self.assignments.get(player).map(Vec::as_slice)
    }

    /// Is `player` currently owed a target?
    pub fn owes(&self, player: &PlayerId) -> bool {
        self.assignments.contains_key(player)
    }

    /// Does anybody still owe a target?
    pub fn anyone_owes(&self) -> bool {
        !self.assignments.is_empty()
    }

    /// Number of players still owing a target.
    pub fn owing_count(&self) -> usize {
        self.assignments.len()
    }

    /// Move `player` from owing to found. Returns false if nothing was owed.
    pub fn credit(&mut self, player: &PlayerId) -> bool {
        if self.assignments.remove(player).is_none() {
            return false;
        }
        self.found.insert(player.clone());
        true
    }

    /// Mark `player` as found whether or not a target was owed.
    pub fn force_credit(&mut self, player: &PlayerId) {
        self.assignments.remove(player);
        self.found.insert(player.clone());
    }

    /// Has `player` found their target this round?
    pub fn has_found(&self, player: &PlayerId) -> bool {
        self.found.contains(player)
    }

    /// Drop a team's members from the book entirely. They neither owe a
    /// target nor count as having found one.
    pub fn forget_members(&mut self, members: &[PlayerId]) {
        for member in members {
            self.found.remove(member);
            self.assignments.remove(member);
        }
    }

    /// Forget everything about the round.
    pub fn clear(&mut self) {
        self.assignments.clear();
        self.found.clear();
    }

    /// True when nothing is recorded.
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty() && self.found.is_empty()
    }
}

// =============================================================================
// TESTS
// =============================================================================
