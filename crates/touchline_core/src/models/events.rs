use serde::{Deserialize, Serialize};

use crate::geometry::PitchPoint;
use crate::models::Match;

/// Closed event taxonomy. Every variant has exactly one `EventData`
/// counterpart carrying the type-specific payload.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Pass,
    Shot,
    Duel,
    FoulCommitted,
    Card,
    Interception,
    Clearance,
    Block,
    Recovery,
    Offside,
    Carry,
    SetPiece,
    GoalkeeperAction,
    Substitution,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PassOutcome {
    Complete,
    Incomplete,
    Out,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ShotOutcome {
    Goal,
    OnTarget,
    OffTarget,
    Blocked,
    Post,
    Saved,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DuelOutcome {
    Won,
    Lost,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FoulOutcome {
    Standard,
    Advantage,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CardKind {
    Yellow,
    #[serde(rename = "Yellow (Second)")]
    YellowSecond,
    Red,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SetPieceKind {
    Corner,
    FreeKick,
    ThrowIn,
    GoalKick,
    Penalty,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GkActionKind {
    Save,
    Claim,
    Punch,
    Smother,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PenaltyOutcome {
    Scored,
    Missed,
    Saved,
}

/// Why a synthetic corner was generated.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CornerReason {
    /// Ball crossed the acting team's own goal line.
    OwnLineOut,
    /// Ball was played back onto the acting team's own goalkeeper.
    OwnKeeperPass,
}

/// Metadata attached to an auto-awarded corner, naming the reason and the
/// event that caused it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CornerAward {
    pub reason: CornerReason,
    pub source_event_type: EventType,
}

/// Type-specific event payload, one variant per `EventType`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventData {
    Pass {
        #[serde(skip_serializing_if = "Option::is_none")]
        outcome: Option<PassOutcome>,
        #[serde(skip_serializing_if = "Option::is_none")]
        receiver_id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        receiver_name: Option<String>,
        /// Opponent who cut the pass out, when the outcome is Incomplete.
        #[serde(skip_serializing_if = "Option::is_none")]
        interceptor_id: Option<String>,
        /// True when this pass caused a synthetic corner for the opponent.
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        corner_awarded: bool,
    },
    Shot {
        #[serde(skip_serializing_if = "Option::is_none")]
        outcome: Option<ShotOutcome>,
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        corner_awarded: bool,
    },
    Duel {
        #[serde(skip_serializing_if = "Option::is_none")]
        outcome: Option<DuelOutcome>,
    },
    FoulCommitted {
        outcome: FoulOutcome,
    },
    Card {
        card: CardKind,
    },
    Interception,
    Clearance,
    Block,
    Recovery,
    Offside,
    Carry,
    SetPiece {
        set_piece: SetPieceKind,
        #[serde(skip_serializing_if = "Option::is_none")]
        penalty_outcome: Option<PenaltyOutcome>,
        #[serde(skip_serializing_if = "Option::is_none")]
        corner_award: Option<CornerAward>,
    },
    GoalkeeperAction {
        action: GkActionKind,
    },
    Substitution {
        #[serde(skip_serializing_if = "Option::is_none")]
        player_in_id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        player_in_name: Option<String>,
    },
}

impl EventData {
    pub fn event_type(&self) -> EventType {
        match self {
            EventData::Pass { .. } => EventType::Pass,
            EventData::Shot { .. } => EventType::Shot,
            EventData::Duel { .. } => EventType::Duel,
            EventData::FoulCommitted { .. } => EventType::FoulCommitted,
            EventData::Card { .. } => EventType::Card,
            EventData::Interception => EventType::Interception,
            EventData::Clearance => EventType::Clearance,
            EventData::Block => EventType::Block,
            EventData::Recovery => EventType::Recovery,
            EventData::Offside => EventType::Offside,
            EventData::Carry => EventType::Carry,
            EventData::SetPiece { .. } => EventType::SetPiece,
            EventData::GoalkeeperAction { .. } => EventType::GoalkeeperAction,
            EventData::Substitution { .. } => EventType::Substitution,
        }
    }

    /// Whether this payload ends with a goal scored.
    pub fn is_goal(&self) -> bool {
        matches!(
            self,
            EventData::Shot { outcome: Some(ShotOutcome::Goal), .. }
                | EventData::SetPiece {
                    set_piece: SetPieceKind::Penalty,
                    penalty_outcome: Some(PenaltyOutcome::Scored),
                    ..
                }
        )
    }
}

/// Period number and clock display string stamped onto every event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventStamp {
    pub period: u8,
    pub clock: String,
}

/// One captured match event, handed to the event sink and never mutated
/// afterward. The sink assigns the server id/timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchEvent {
    pub period: u8,
    pub clock: String,
    pub team_id: String,
    /// Absent only on synthetic events with no attributable actor
    /// (auto-awarded corners).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_id: Option<String>,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub data: EventData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<PitchPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_location: Option<PitchPoint>,
}

impl MatchEvent {
    /// Build an event, deriving `event_type` from the payload so the two
    /// can never disagree.
    pub fn new(stamp: &EventStamp, team_id: &str, player_id: Option<&str>, data: EventData) -> Self {
        Self {
            period: stamp.period,
            clock: stamp.clock.clone(),
            team_id: team_id.to_string(),
            player_id: player_id.map(str::to_string),
            event_type: data.event_type(),
            data,
            location: None,
            end_location: None,
        }
    }

    pub fn with_location(mut self, location: PitchPoint) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_end_location(mut self, end_location: PitchPoint) -> Self {
        self.end_location = Some(end_location);
        self
    }

    /// Team/player membership invariant: `team_id` must be one of the
    /// match's two teams, and `player_id` (when present) must belong to
    /// that team.
    pub fn validate_against(&self, m: &Match) -> bool {
        let Some(side) = m.side_of_team(&self.team_id) else {
            return false;
        };
        match &self.player_id {
            Some(pid) => m.team(side).contains_player(pid),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_fixtures::sample_match;
    use strum::IntoEnumIterator;

    fn stamp() -> EventStamp {
        EventStamp { period: 1, clock: "12:30".to_string() }
    }

    fn data_for(event_type: EventType) -> EventData {
        match event_type {
            EventType::Pass => EventData::Pass {
                outcome: Some(PassOutcome::Complete),
                receiver_id: None,
                receiver_name: None,
                interceptor_id: None,
                corner_awarded: false,
            },
            EventType::Shot => {
                EventData::Shot { outcome: Some(ShotOutcome::OnTarget), corner_awarded: false }
            }
            EventType::Duel => EventData::Duel { outcome: Some(DuelOutcome::Won) },
            EventType::FoulCommitted => EventData::FoulCommitted { outcome: FoulOutcome::Standard },
            EventType::Card => EventData::Card { card: CardKind::Yellow },
            EventType::Interception => EventData::Interception,
            EventType::Clearance => EventData::Clearance,
            EventType::Block => EventData::Block,
            EventType::Recovery => EventData::Recovery,
            EventType::Offside => EventData::Offside,
            EventType::Carry => EventData::Carry,
            EventType::SetPiece => EventData::SetPiece {
                set_piece: SetPieceKind::Corner,
                penalty_outcome: None,
                corner_award: None,
            },
            EventType::GoalkeeperAction => {
                EventData::GoalkeeperAction { action: GkActionKind::Save }
            }
            EventType::Substitution => {
                EventData::Substitution { player_in_id: None, player_in_name: None }
            }
        }
    }

    #[test]
    fn test_every_event_type_has_a_payload_variant() {
        for event_type in EventType::iter() {
            assert_eq!(data_for(event_type).event_type(), event_type);
        }
    }

    #[test]
    fn test_event_type_derived_from_payload() {
        let event = MatchEvent::new(
            &stamp(),
            "team-home",
            Some("h10"),
            EventData::Card { card: CardKind::Red },
        );
        assert_eq!(event.event_type, EventType::Card);
    }

    #[test]
    fn test_membership_invariant() {
        let m = sample_match();
        let home_player = m.home.players[0].id.clone();

        let ok = MatchEvent::new(&stamp(), &m.home.id, Some(&home_player), data_for(EventType::Pass));
        assert!(ok.validate_against(&m));

        // Player from the wrong team.
        let cross = MatchEvent::new(&stamp(), &m.away.id, Some(&home_player), data_for(EventType::Pass));
        assert!(!cross.validate_against(&m));

        // Unknown team.
        let stray = MatchEvent::new(&stamp(), "other-team", None, data_for(EventType::Clearance));
        assert!(!stray.validate_against(&m));

        // Synthetic event with no actor is fine.
        let corner = MatchEvent::new(&stamp(), &m.away.id, None, data_for(EventType::SetPiece));
        assert!(corner.validate_against(&m));
    }

    #[test]
    fn test_card_serialization_labels() {
        let json = serde_json::to_string(&CardKind::YellowSecond).unwrap();
        assert_eq!(json, "\"Yellow (Second)\"");
    }

    #[test]
    fn test_goal_detection() {
        assert!(data_for(EventType::Shot) != EventData::Shot {
            outcome: Some(ShotOutcome::Goal),
            corner_awarded: false
        });
        let goal = EventData::Shot { outcome: Some(ShotOutcome::Goal), corner_awarded: false };
        assert!(goal.is_goal());
        let pen = EventData::SetPiece {
            set_piece: SetPieceKind::Penalty,
            penalty_outcome: Some(PenaltyOutcome::Scored),
            corner_award: None,
        };
        assert!(pen.is_goal());
        assert!(!data_for(EventType::Pass).is_goal());
    }
}
