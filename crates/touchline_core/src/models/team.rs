use serde::{Deserialize, Serialize};

use super::Player;
use crate::error::CaptureError;

/// Which bench a team occupies for the whole match. Side assignment is
/// permanent; the home team defends the left edge of the pitch diagram.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub name: String,
    pub players: Vec<Player>,
}

impl Team {
    pub fn player_by_id(&self, player_id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    pub fn player_by_jersey(&self, jersey: u8) -> Option<&Player> {
        self.players.iter().find(|p| p.jersey_number == jersey)
    }

    pub fn contains_player(&self, player_id: &str) -> bool {
        self.player_by_id(player_id).is_some()
    }

    /// Roster sanity check on load: jersey numbers in 1-99 and unique
    /// within the team.
    pub fn validate(&self) -> Result<(), CaptureError> {
        let mut seen = std::collections::HashSet::new();
        for player in &self.players {
            if !(1..=99).contains(&player.jersey_number) {
                return Err(CaptureError::InvalidRoster(format!(
                    "jersey number {} out of range for {}",
                    player.jersey_number, player.name
                )));
            }
            if !seen.insert(player.jersey_number) {
                return Err(CaptureError::InvalidRoster(format!(
                    "duplicate jersey number {} in team {}",
                    player.jersey_number, self.name
                )));
            }
        }
        Ok(())
    }
}
