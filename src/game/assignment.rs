//! Target Assignment
//!
//! Draws targets from the catalog according to the configured
//! `AssignmentMode` and pairs them with players.

use thiserror::Error;

use crate::game::collaborators::{TargetCatalog, TeamRegistry};
use crate::game::config::{AssignmentMode, GameConfig};
use crate::game::state::{PlayerId, TargetId};

/// Assignment errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssignmentError {
    /// The catalog broke its contract.
    #[error("Target catalog returned an empty target list")]
    EmptyTargetList,
}

/// One player's targets for the round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assignment {
    /// Player owing the targets
    pub player: PlayerId,
    /// Equivalent target identifiers, first is the display value
    pub targets: Vec<TargetId>,
}

impl Assignment {
    /// Display value of the assignment.
    pub fn display_name(&self) -> String {
        self.targets
            .first()
            .map(TargetId::display_name)
            .unwrap_or_default()
    }
}

/// Draw targets for every member of every active team.
///
/// Catalog calls per round: one per player (`PerPlayer`), one per team
/// (`PerTeam`) or exactly one (`PerRound`).
pub fn draw_assignments<R, C>(
    config: &GameConfig,
    registry: &R,
    catalog: &mut C,
) -> Result<Vec<Assignment>, AssignmentError>
where
    R: TeamRegistry + ?Sized,
    C: TargetCatalog + ?Sized,
{
    let mut assignments = Vec::new();

    let round_targets = match config.assignment_mode {
        AssignmentMode::PerRound => Some(draw(catalog, config)?),
        _ => None,
    };

    for team in registry.teams() {
        let team_targets = match config.assignment_mode {
            AssignmentMode::PerTeam => Some(draw(catalog, config)?),
            _ => None,
        };

        for player in registry.members(&team) {
            let targets = match (&round_targets, &team_targets) {
                (Some(shared), _) | (_, Some(shared)) => shared.clone(),
                (None, None) => draw(catalog, config)?,
            };
            assignments.push(Assignment { player, targets });
        }
    }

    Ok(assignments)
}

fn draw<C: TargetCatalog + ?Sized>(
    catalog: &mut C,
    config: &GameConfig,
) -> Result<Vec<TargetId>, AssignmentError> {
    let targets = catalog.random_target(config);
    if targets.is_empty() {
        return Err(AssignmentError::EmptyTargetList);
    }
    Ok(targets)
}
