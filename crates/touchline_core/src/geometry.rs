//! Pitch geometry: percentage-space to fixed pitch-coordinate transforms
//! and out-of-bounds classification.
//!
//! The event coordinate system is a fixed 120x80 unit pitch with the
//! origin at the home team's defended corner, independent of which side
//! the diagram renders flipped.

use serde::{Deserialize, Serialize};

/// A point on the fixed 120x80 pitch.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PitchPoint {
    pub x: f32,
    pub y: f32,
}

impl PitchPoint {
    /// Pitch length in event units (SSOT for pitch dimensions).
    pub const PITCH_LENGTH: f32 = 120.0;
    /// Pitch width in event units.
    pub const PITCH_WIDTH: f32 = 80.0;

    /// Percent(0..100 each axis) -> pitch units, linear scaling.
    #[inline]
    pub fn from_percent(x_percent: f32, y_percent: f32) -> Self {
        Self {
            x: x_percent / 100.0 * Self::PITCH_LENGTH,
            y: y_percent / 100.0 * Self::PITCH_WIDTH,
        }
    }
}

/// Boundary crossed by an out-of-bounds tap. At most one edge is ever
/// reported; the check order is left, right, top, bottom.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum OutEdge {
    Left,
    Right,
    Top,
    Bottom,
}

/// In-bounds window in percent space. The default leaves a visual margin
/// so a tap just outside the drawn touchline counts as "out".
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PitchBounds {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Default for PitchBounds {
    fn default() -> Self {
        Self { left: 4.0, right: 96.0, top: 4.0, bottom: 96.0 }
    }
}

/// A resolved tap: clamped percents, derived pitch point, and bounds
/// classification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FieldCoordinate {
    pub x_percent: f32,
    pub y_percent: f32,
    pub point: PitchPoint,
    pub out_of_bounds: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edge: Option<OutEdge>,
}

impl PitchBounds {
    /// Classify a raw percent pair. Pure and idempotent; safe to call from
    /// both the pointer handler and the synthetic edge buttons.
    ///
    /// The x-axis is checked before the y-axis, so a tap violating both
    /// reports the horizontal edge.
    pub fn resolve(&self, x_percent: f32, y_percent: f32) -> FieldCoordinate {
        let edge = if x_percent < self.left {
            Some(OutEdge::Left)
        } else if x_percent > self.right {
            Some(OutEdge::Right)
        } else if y_percent < self.top {
            Some(OutEdge::Top)
        } else if y_percent > self.bottom {
            Some(OutEdge::Bottom)
        } else {
            None
        };

        // Downstream consumers always get a displayable point.
        let x_percent = x_percent.clamp(0.0, 100.0);
        let y_percent = y_percent.clamp(0.0, 100.0);

        FieldCoordinate {
            x_percent,
            y_percent,
            point: PitchPoint::from_percent(x_percent, y_percent),
            out_of_bounds: edge.is_some(),
            edge,
        }
    }

    /// Fabricate the coordinate an edge button stands for: the midpoint of
    /// the named boundary, flagged out on exactly that edge.
    ///
    /// The point sits just outside the configured bound, so the flag holds
    /// even for bounds with a zero margin.
    pub fn edge_tap(&self, edge: OutEdge) -> FieldCoordinate {
        const NUDGE: f32 = 1.0;
        let (x, y) = match edge {
            OutEdge::Left => (self.left - NUDGE, 50.0),
            OutEdge::Right => (self.right + NUDGE, 50.0),
            OutEdge::Top => (50.0, self.top - NUDGE),
            OutEdge::Bottom => (50.0, self.bottom + NUDGE),
        };
        self.resolve(x, y)
    }
}
