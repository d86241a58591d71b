use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Player, Side, Team};

/// Persisted match status labels, exactly as the status service stores
/// them. Closed set; the clock manager maps these onto `PeriodPhase`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
pub enum MatchStatus {
    Scheduled,
    Pending,
    Live,
    #[serde(rename = "Live_First_Half")]
    LiveFirstHalf,
    Halftime,
    #[serde(rename = "Live_Second_Half")]
    LiveSecondHalf,
    Fulltime,
    #[serde(rename = "Live_Extra_First")]
    LiveExtraFirst,
    #[serde(rename = "Extra_Halftime")]
    ExtraHalftime,
    #[serde(rename = "Live_Extra_Second")]
    LiveExtraSecond,
    Penalties,
    Completed,
    Abandoned,
}

/// Whether the match clock is currently accumulating effective time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClockMode {
    Running,
    #[default]
    Stopped,
}

/// Recorded wall-clock window for one operator period, plus the derived
/// offset of that period on the global match clock.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PeriodWindow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_start_seconds: Option<u32>,
}

/// The single source of truth for phase reconstruction after a reload.
/// Read-mostly from the core's perspective; only the roster collaborator
/// mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    pub id: String,
    pub home: Team,
    pub away: Team,
    pub status: MatchStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_seconds: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_period_start: Option<DateTime<Utc>>,
    /// Keyed by operator period number as a string ("1".."5").
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub periods: BTreeMap<String, PeriodWindow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ineffective_seconds_home: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ineffective_seconds_away: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clock_mode: Option<ClockMode>,
}

impl Match {
    pub fn team(&self, side: Side) -> &Team {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }

    pub fn side_of_team(&self, team_id: &str) -> Option<Side> {
        if self.home.id == team_id {
            Some(Side::Home)
        } else if self.away.id == team_id {
            Some(Side::Away)
        } else {
            None
        }
    }

    /// Find a player on either team. Home is searched first; this is the
    /// documented tie-break for anything keyed by jersey number.
    pub fn player_by_id(&self, player_id: &str) -> Option<(Side, &Player)> {
        if let Some(p) = self.home.player_by_id(player_id) {
            return Some((Side::Home, p));
        }
        self.away.player_by_id(player_id).map(|p| (Side::Away, p))
    }

    /// Sides carrying the given jersey number, home first.
    pub fn sides_with_jersey(&self, jersey: u8) -> Vec<Side> {
        let mut sides = Vec::new();
        if self.home.player_by_jersey(jersey).is_some() {
            sides.push(Side::Home);
        }
        if self.away.player_by_jersey(jersey).is_some() {
            sides.push(Side::Away);
        }
        sides
    }
}
