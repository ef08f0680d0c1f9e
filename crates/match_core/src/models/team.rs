//! Team rosters and formation slots

use super::player::{PlayerId, Skills, TacticalRole, TeamSide};
use crate::engine::geometry::Vec2;
use crate::error::{MatchError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const STARTERS_PER_TEAM: usize = 11;

/// Lateral spread between players sharing a role (e.g. two center backs)
const DUPLICATE_ROLE_SPREAD: f32 = 0.22;

fn default_true() -> bool {
    true
}

/// Roster entry as handed over by the roster loader
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerSheet {
    pub name: String,
    pub role: TacticalRole,
    #[serde(default)]
    pub skills: Skills,
    #[serde(default = "default_true")]
    pub starting: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamSheet {
    pub name: String,
    pub players: Vec<PlayerSheet>,
}

impl TeamSheet {
    pub fn starters(&self) -> impl Iterator<Item = &PlayerSheet> {
        self.players.iter().filter(|p| p.starting)
    }

    pub fn validate(&self) -> Result<()> {
        let starters: Vec<&PlayerSheet> = self.starters().collect();
        if starters.len() != STARTERS_PER_TEAM {
            return Err(MatchError::InvalidTeamSize {
                team: self.name.clone(),
                expected: STARTERS_PER_TEAM,
                found: starters.len(),
            });
        }
        let keepers = starters.iter().filter(|p| p.role == TacticalRole::GK).count();
        if keepers != 1 {
            return Err(MatchError::InvalidGoalkeeperCount { team: self.name.clone(), found: keepers });
        }
        for p in &starters {
            p.skills.validate(&p.name)?;
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let sheet: TeamSheet = serde_json::from_str(json)?;
        sheet.validate()?;
        Ok(sheet)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Flat 4-4-2 where every starter has the same skill rating
    pub fn four_four_two(name: &str, skill: f32) -> Self {
        use TacticalRole::*;
        let roles = [GK, LB, CB, CB, RB, LM, CM, CM, RM, ST, ST];
        let players = roles
            .iter()
            .enumerate()
            .map(|(i, &role)| PlayerSheet {
                name: format!("{} {}", name, i + 1),
                role,
                skills: Skills::uniform(skill),
                starting: true,
            })
            .collect();
        Self { name: name.to_string(), players }
    }
}

/// A team during a match. Membership never changes once the match is set up.
#[derive(Debug, Clone)]
pub struct Team {
    pub name: String,
    pub side: TeamSide,
    pub roster: Vec<PlayerId>,
}

/// World-space home positions for a lineup, in lineup order.
///
/// Players sharing a role are spread laterally around the role's slot.
pub fn formation_positions(roles: &[TacticalRole], side: TeamSide) -> Vec<Vec2> {
    roles
        .iter()
        .enumerate()
        .map(|(i, role)| {
            let same: Vec<usize> =
                roles.iter().enumerate().filter(|(_, r)| *r == role).map(|(j, _)| j).collect();
            let rank = same.iter().position(|&j| j == i).unwrap_or(0) as f32;
            let centered = rank - (same.len() as f32 - 1.0) / 2.0;
            let (depth, lateral) = role.base_slot();
            let lateral = (lateral + centered * DUPLICATE_ROLE_SPREAD).clamp(0.05, 0.95);
            side.to_world(depth, lateral)
        })
        .collect()
}
