//! Geometric outcome inference for spatially-resolved actions.
//!
//! When the operator taps a destination instead of picking an outcome,
//! the outcome is inferred from where the ball went and who was there.

use crate::geometry::{FieldCoordinate, OutEdge};
use crate::models::{CornerReason, DuelOutcome, PassOutcome, ShotOutcome, Side};

/// The player found at (or nearest) the destination tap, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct DestinationTarget {
    pub side: Side,
    pub player_id: String,
    pub name: String,
    pub is_goalkeeper: bool,
}

/// The goal line each side defends on the diagram: home left, away right.
pub fn own_defended_edge(side: Side) -> OutEdge {
    match side {
        Side::Home => OutEdge::Left,
        Side::Away => OutEdge::Right,
    }
}

/// A ball leaving over the actor's own goal line, or played onto the
/// actor's own goalkeeper, awards a corner to the opposing team.
pub fn corner_reason(
    actor_side: Side,
    coord: &FieldCoordinate,
    target: Option<&DestinationTarget>,
) -> Option<CornerReason> {
    if coord.out_of_bounds && coord.edge == Some(own_defended_edge(actor_side)) {
        return Some(CornerReason::OwnLineOut);
    }
    if target.is_some_and(|t| t.side == actor_side && t.is_goalkeeper) {
        return Some(CornerReason::OwnKeeperPass);
    }
    None
}

#[derive(Debug, Clone, PartialEq)]
pub struct PassInference {
    pub outcome: PassOutcome,
    pub corner: Option<CornerReason>,
    /// Opponent credited with cutting the pass out.
    pub interceptor_id: Option<String>,
    /// Teammate credited as receiver, for completed passes.
    pub receiver: Option<DestinationTarget>,
}

pub fn infer_pass(
    actor_side: Side,
    coord: &FieldCoordinate,
    target: Option<&DestinationTarget>,
) -> PassInference {
    let corner = corner_reason(actor_side, coord, target);
    match corner {
        Some(CornerReason::OwnLineOut) => PassInference {
            outcome: PassOutcome::Out,
            corner,
            interceptor_id: None,
            receiver: None,
        },
        Some(CornerReason::OwnKeeperPass) => PassInference {
            outcome: PassOutcome::Incomplete,
            corner,
            interceptor_id: None,
            receiver: None,
        },
        None => {
            if coord.out_of_bounds {
                return PassInference {
                    outcome: PassOutcome::Out,
                    corner: None,
                    interceptor_id: None,
                    receiver: None,
                };
            }
            match target {
                Some(t) if t.side == actor_side => PassInference {
                    outcome: PassOutcome::Complete,
                    corner: None,
                    interceptor_id: None,
                    receiver: Some(t.clone()),
                },
                Some(t) => PassInference {
                    outcome: PassOutcome::Incomplete,
                    corner: None,
                    interceptor_id: Some(t.player_id.clone()),
                    receiver: None,
                },
                // Played into empty space.
                None => PassInference {
                    outcome: PassOutcome::Incomplete,
                    corner: None,
                    interceptor_id: None,
                    receiver: None,
                },
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotInference {
    pub outcome: ShotOutcome,
    pub corner: Option<CornerReason>,
}

/// `goal_intent` marks the Goal quick action, the only path whose default
/// inference is a goal rather than a miss.
pub fn infer_shot(
    actor_side: Side,
    coord: &FieldCoordinate,
    target: Option<&DestinationTarget>,
    goal_intent: bool,
) -> ShotInference {
    if let Some(corner) = corner_reason(actor_side, coord, target) {
        return ShotInference { outcome: ShotOutcome::OffTarget, corner: Some(corner) };
    }
    if coord.out_of_bounds {
        return ShotInference { outcome: ShotOutcome::OffTarget, corner: None };
    }
    match target {
        Some(t) if t.side != actor_side && t.is_goalkeeper => {
            ShotInference { outcome: ShotOutcome::Saved, corner: None }
        }
        Some(t) if t.side != actor_side => {
            ShotInference { outcome: ShotOutcome::Blocked, corner: None }
        }
        _ => ShotInference {
            outcome: if goal_intent { ShotOutcome::Goal } else { ShotOutcome::OffTarget },
            corner: None,
        },
    }
}

pub fn infer_duel(actor_side: Side, target: Option<&DestinationTarget>) -> DuelOutcome {
    match target {
        Some(t) if t.side != actor_side => DuelOutcome::Lost,
        _ => DuelOutcome::Won,
    }
}
