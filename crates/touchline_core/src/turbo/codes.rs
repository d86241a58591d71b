//! Fixed code tables for the turbo shorthand: one letter per action, one
//! numbered outcome table per action.

use serde::{Deserialize, Serialize};

use crate::models::{
    CardKind, DuelOutcome, EventData, EventType, FoulOutcome, GkActionKind, PassOutcome,
    PenaltyOutcome, SetPieceKind, ShotOutcome,
};

/// Operator-level action, one per shorthand letter. Finer-grained than
/// `EventType`: set pieces and goalkeeper actions get their own codes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Pass,
    Shot,
    Duel,
    Foul,
    Card,
    Interception,
    Clearance,
    Block,
    Recovery,
    Offside,
    Carry,
    Corner,
    FreeKick,
    ThrowIn,
    GoalKick,
    Penalty,
    Save,
    Claim,
    Punch,
    Smother,
    Substitution,
}

impl ActionKind {
    pub fn from_code(code: char) -> Option<ActionKind> {
        Some(match code.to_ascii_lowercase() {
            'p' => ActionKind::Pass,
            's' => ActionKind::Shot,
            'd' => ActionKind::Duel,
            'f' => ActionKind::Foul,
            'y' => ActionKind::Card,
            'i' => ActionKind::Interception,
            'c' => ActionKind::Clearance,
            'b' => ActionKind::Block,
            'r' => ActionKind::Recovery,
            'o' => ActionKind::Offside,
            'a' => ActionKind::Carry,
            'k' => ActionKind::Corner,
            'e' => ActionKind::FreeKick,
            't' => ActionKind::ThrowIn,
            'g' => ActionKind::GoalKick,
            'n' => ActionKind::Penalty,
            'v' => ActionKind::Save,
            'l' => ActionKind::Claim,
            'u' => ActionKind::Punch,
            'm' => ActionKind::Smother,
            'x' => ActionKind::Substitution,
            _ => return None,
        })
    }

    pub fn code(self) -> char {
        match self {
            ActionKind::Pass => 'p',
            ActionKind::Shot => 's',
            ActionKind::Duel => 'd',
            ActionKind::Foul => 'f',
            ActionKind::Card => 'y',
            ActionKind::Interception => 'i',
            ActionKind::Clearance => 'c',
            ActionKind::Block => 'b',
            ActionKind::Recovery => 'r',
            ActionKind::Offside => 'o',
            ActionKind::Carry => 'a',
            ActionKind::Corner => 'k',
            ActionKind::FreeKick => 'e',
            ActionKind::ThrowIn => 't',
            ActionKind::GoalKick => 'g',
            ActionKind::Penalty => 'n',
            ActionKind::Save => 'v',
            ActionKind::Claim => 'l',
            ActionKind::Punch => 'u',
            ActionKind::Smother => 'm',
            ActionKind::Substitution => 'x',
        }
    }

    /// Operator-facing action name.
    pub fn label(self) -> &'static str {
        match self {
            ActionKind::Pass => "Pass",
            ActionKind::Shot => "Shot",
            ActionKind::Duel => "Duel",
            ActionKind::Foul => "Foul",
            ActionKind::Card => "Card",
            ActionKind::Interception => "Interception",
            ActionKind::Clearance => "Clearance",
            ActionKind::Block => "Block",
            ActionKind::Recovery => "Recovery",
            ActionKind::Offside => "Offside",
            ActionKind::Carry => "Carry",
            ActionKind::Corner => "Corner",
            ActionKind::FreeKick => "Free Kick",
            ActionKind::ThrowIn => "Throw-in",
            ActionKind::GoalKick => "Goal Kick",
            ActionKind::Penalty => "Penalty",
            ActionKind::Save => "Save",
            ActionKind::Claim => "Claim",
            ActionKind::Punch => "Punch",
            ActionKind::Smother => "Smother",
            ActionKind::Substitution => "Substitution",
        }
    }

    /// Numbered outcome table, 1-based for the operator. Empty means the
    /// action takes no outcome digit.
    pub fn outcomes(self) -> &'static [&'static str] {
        match self {
            ActionKind::Pass => &["Complete", "Incomplete", "Out"],
            ActionKind::Shot => &["Goal", "OnTarget", "OffTarget", "Blocked", "Post", "Saved"],
            ActionKind::Duel => &["Won", "Lost"],
            ActionKind::Foul => &["Standard", "Advantage"],
            ActionKind::Card => &["Yellow", "Yellow (Second)", "Red"],
            ActionKind::Penalty => &["Scored", "Missed", "Saved"],
            _ => &[],
        }
    }

    /// Only passes finalize through a recipient pick.
    pub fn needs_recipient(self) -> bool {
        matches!(self, ActionKind::Pass)
    }

    pub fn event_type(self) -> EventType {
        match self {
            ActionKind::Pass => EventType::Pass,
            ActionKind::Shot => EventType::Shot,
            ActionKind::Duel => EventType::Duel,
            ActionKind::Foul => EventType::FoulCommitted,
            ActionKind::Card => EventType::Card,
            ActionKind::Interception => EventType::Interception,
            ActionKind::Clearance => EventType::Clearance,
            ActionKind::Block => EventType::Block,
            ActionKind::Recovery => EventType::Recovery,
            ActionKind::Offside => EventType::Offside,
            ActionKind::Carry => EventType::Carry,
            ActionKind::Corner
            | ActionKind::FreeKick
            | ActionKind::ThrowIn
            | ActionKind::GoalKick
            | ActionKind::Penalty => EventType::SetPiece,
            ActionKind::Save | ActionKind::Claim | ActionKind::Punch | ActionKind::Smother => {
                EventType::GoalkeeperAction
            }
            ActionKind::Substitution => EventType::Substitution,
        }
    }
}

/// Normalized payload builder shared by both front-ends. `outcome_index`
/// is the 1-based position in `outcomes()`; it must already be validated.
pub fn build_event_data(action: ActionKind, outcome_index: Option<u8>) -> EventData {
    let idx = outcome_index.map(|i| i as usize);
    match action {
        ActionKind::Pass => EventData::Pass {
            outcome: idx.map(|i| match i {
                1 => PassOutcome::Complete,
                2 => PassOutcome::Incomplete,
                _ => PassOutcome::Out,
            }),
            receiver_id: None,
            receiver_name: None,
            interceptor_id: None,
            corner_awarded: false,
        },
        ActionKind::Shot => EventData::Shot {
            outcome: idx.map(|i| match i {
                1 => ShotOutcome::Goal,
                2 => ShotOutcome::OnTarget,
                3 => ShotOutcome::OffTarget,
                4 => ShotOutcome::Blocked,
                5 => ShotOutcome::Post,
                _ => ShotOutcome::Saved,
            }),
            corner_awarded: false,
        },
        ActionKind::Duel => EventData::Duel {
            outcome: idx.map(|i| if i == 1 { DuelOutcome::Won } else { DuelOutcome::Lost }),
        },
        ActionKind::Foul => EventData::FoulCommitted {
            outcome: if idx == Some(2) { FoulOutcome::Advantage } else { FoulOutcome::Standard },
        },
        ActionKind::Card => EventData::Card {
            card: match idx {
                Some(2) => CardKind::YellowSecond,
                Some(3) => CardKind::Red,
                _ => CardKind::Yellow,
            },
        },
        ActionKind::Interception => EventData::Interception,
        ActionKind::Clearance => EventData::Clearance,
        ActionKind::Block => EventData::Block,
        ActionKind::Recovery => EventData::Recovery,
        ActionKind::Offside => EventData::Offside,
        ActionKind::Carry => EventData::Carry,
        ActionKind::Corner | ActionKind::FreeKick | ActionKind::ThrowIn | ActionKind::GoalKick => {
            EventData::SetPiece {
                set_piece: match action {
                    ActionKind::Corner => SetPieceKind::Corner,
                    ActionKind::FreeKick => SetPieceKind::FreeKick,
                    ActionKind::ThrowIn => SetPieceKind::ThrowIn,
                    _ => SetPieceKind::GoalKick,
                },
                penalty_outcome: None,
                corner_award: None,
            }
        }
        ActionKind::Penalty => EventData::SetPiece {
            set_piece: SetPieceKind::Penalty,
            penalty_outcome: idx.map(|i| match i {
                1 => PenaltyOutcome::Scored,
                2 => PenaltyOutcome::Missed,
                _ => PenaltyOutcome::Saved,
            }),
            corner_award: None,
        },
        ActionKind::Save | ActionKind::Claim | ActionKind::Punch | ActionKind::Smother => {
            EventData::GoalkeeperAction {
                action: match action {
                    ActionKind::Save => GkActionKind::Save,
                    ActionKind::Claim => GkActionKind::Claim,
                    ActionKind::Punch => GkActionKind::Punch,
                    _ => GkActionKind::Smother,
                },
            }
        }
        ActionKind::Substitution => {
            EventData::Substitution { player_in_id: None, player_in_name: None }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use strum::IntoEnumIterator;

    #[test]
    fn test_codes_round_trip_and_are_distinct() {
        let mut seen = HashSet::new();
        for action in ActionKind::iter() {
            let code = action.code();
            assert!(seen.insert(code), "duplicate code '{}'", code);
            assert_eq!(ActionKind::from_code(code), Some(action));
            assert_eq!(ActionKind::from_code(code.to_ascii_uppercase()), Some(action));
        }
        assert_eq!(seen.len(), 21);
    }

    #[test]
    fn test_unknown_code() {
        assert_eq!(ActionKind::from_code('z'), None);
        assert_eq!(ActionKind::from_code('1'), None);
    }

    #[test]
    fn test_shot_outcome_table_numbering() {
        let table = ActionKind::Shot.outcomes();
        assert_eq!(table[0], "Goal");
        assert_eq!(table[5], "Saved");
        assert_eq!(table.len(), 6);
    }

    #[test]
    fn test_payload_builder_matches_event_type() {
        for action in ActionKind::iter() {
            let outcome = if action.outcomes().is_empty() { None } else { Some(1) };
            let data = build_event_data(action, outcome);
            assert_eq!(data.event_type(), action.event_type());
        }
    }

    #[test]
    fn test_pass_payload_outcomes() {
        let data = build_event_data(ActionKind::Pass, Some(1));
        assert!(matches!(
            data,
            EventData::Pass { outcome: Some(PassOutcome::Complete), .. }
        ));
        let data = build_event_data(ActionKind::Pass, Some(3));
        assert!(matches!(data, EventData::Pass { outcome: Some(PassOutcome::Out), .. }));
    }
}
