//! Target Catalogs
//!
//! `CategoryCatalog` draws from weighted categories with the deterministic
//! RNG. `SequenceCatalog` hands out a fixed list in order, for scripted
//! events and tests.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::rng::DeterministicRng;
use crate::game::collaborators::TargetCatalog;
use crate::game::config::{ConfigError, GameConfig};
use crate::game::state::TargetId;

/// A weighted group of targets.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category name, e.g. `wood`
    pub name: String,
    /// Relative draw weight; zero disables the category
    #[serde(default = "default_weight")]
    pub weight: u32,
    /// Entries; each entry is a list of equivalent target identifiers
    pub entries: Vec<Vec<TargetId>>,
}

fn default_weight() -> u32 {
    1
}

/// Weighted category catalog.
#[derive(Clone, Debug)]
pub struct CategoryCatalog {
    categories: Vec<Category>,
    rng: DeterministicRng,
    draws: u64,
}

impl CategoryCatalog {
    /// Create a catalog. Categories without entries are dropped.
    pub fn new(categories: Vec<Category>, seed: u64) -> Self {
        let categories = categories
            .into_iter()
            .filter(|category| category.entries.iter().any(|entry| !entry.is_empty()))
            .collect();

        Self {
            categories,
            rng: DeterministicRng::new(seed),
            draws: 0,
        }
    }

    /// Parse categories from JSON (an array of categories).
    pub fn from_json_str(json: &str, seed: u64) -> Result<Self, ConfigError> {
        let categories: Vec<Category> = serde_json::from_str(json)?;
        Ok(Self::new(categories, seed))
    }

    /// Read categories from a JSON file.
    pub fn from_file(path: impl AsRef<Path>, seed: u64) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw, seed)
    }

    /// Number of targets drawn so far.
    pub fn draws(&self) -> u64 {
        self.draws
    }

    /// Usable categories.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }
}

impl TargetCatalog for CategoryCatalog {
    fn random_target(&mut self, _config: &GameConfig) -> Vec<TargetId> {
        self.draws += 1;

        let weights: Vec<u32> = self.categories.iter().map(|c| c.weight).collect();
        let Some(index) = self.rng.choose_weighted(&weights) else {
            return Vec::new();
        };

        let category = &self.categories[index];
        let usable: Vec<&Vec<TargetId>> = category
            .entries
            .iter()
            .filter(|entry| !entry.is_empty())
            .collect();

        let targets = self
            .rng
            .choose(&usable)
            .map(|entry| (*entry).clone())
            .unwrap_or_default();

        debug!("Drew {:?} from category {}", targets, category.name);
        targets
    }
}

/// Catalog that cycles through a fixed list of entries.
#[derive(Clone, Debug, Default)]
pub struct SequenceCatalog {
    entries: Vec<Vec<TargetId>>,
    draws: usize,
}

impl SequenceCatalog {
    /// Create from entries.
    pub fn new(entries: Vec<Vec<TargetId>>) -> Self {
        Self { entries, draws: 0 }
    }

    /// Create with one single-identifier entry per name.
    pub fn from_names(names: &[&str]) -> Self {
        Self::new(names.iter().map(|name| vec![TargetId::new(*name)]).collect())
    }

    /// Number of targets drawn so far.
    pub fn draws(&self) -> usize {
        self.draws
    }
}

impl TargetCatalog for SequenceCatalog {
    fn random_target(&mut self, _config: &GameConfig) -> Vec<TargetId> {
        if self.entries.is_empty() {
            self.draws += 1;
            return Vec::new();
        }
        let entry = self.entries[self.draws % self.entries.len()].clone();
        self.draws += 1;
        entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG_JSON: &str = r#"[
        { "name": "wood", "weight": 3, "entries": [["oak_log"], ["birch_log", "stripped_birch_log"]] },
        { "name": "stone", "entries": [["cobblestone"]] },
        { "name": "empty", "weight": 5, "entries": [] }
    ]"#;

    #[test]
    fn test_parse_drops_empty_categories() {
        let catalog = CategoryCatalog::from_json_str(CATALOG_JSON, 1).unwrap();
        assert_eq!(catalog.categories().len(), 2);
        assert_eq!(catalog.categories()[1].weight, 1);
    }

    #[test]
    fn test_draws_are_non_empty_and_known() {
        let mut catalog = CategoryCatalog::from_json_str(CATALOG_JSON, 99).unwrap();
        let config = GameConfig::default();

        for _ in 0..200 {
            let targets = catalog.random_target(&config);
            assert!(!targets.is_empty());
            let first = targets[0].0.as_str();
            assert!(["oak_log", "birch_log", "cobblestone"].contains(&first));
        }
        assert_eq!(catalog.draws(), 200);
    }

    #[test]
    fn test_same_seed_same_draws() {
        let config = GameConfig::default();
        let mut a = CategoryCatalog::from_json_str(CATALOG_JSON, 7).unwrap();
        let mut b = CategoryCatalog::from_json_str(CATALOG_JSON, 7).unwrap();

        for _ in 0..50 {
            assert_eq!(a.random_target(&config), b.random_target(&config));
        }
    }

    #[test]
    fn test_empty_catalog_returns_empty_list() {
        let mut catalog = CategoryCatalog::new(Vec::new(), 0);
        assert!(catalog.random_target(&GameConfig::default()).is_empty());
    }

    #[test]
    fn test_sequence_catalog_cycles() {
        let mut catalog = SequenceCatalog::from_names(&["a", "b"]);
        let config = GameConfig::default();

        let drawn: Vec<_> = (0..3).map(|_| catalog.random_target(&config)[0].0.clone()).collect();
        assert_eq!(drawn, vec!["a", "b", "a"]);
        assert_eq!(catalog.draws(), 3);
    }

    #[test]
    fn test_bad_json_is_config_error() {
        let result = CategoryCatalog::from_json_str("{ not json", 0);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
