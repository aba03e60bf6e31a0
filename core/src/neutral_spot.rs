//! Neutral spots: the fixed places objects are moved to after a violation.

use crate::field::DISTANCE_AROUND_UNOCCUPIED_NEUTRAL_SPOT;
use crate::types::Position;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NeutralSpot {
    Center,
    TopLeft,
    TopMiddle,
    TopRight,
    BottomLeft,
    BottomMiddle,
    BottomRight,
}

impl NeutralSpot {
    /// Declaration order; equal distances keep this order.
    pub const ALL: [NeutralSpot; 7] = [
        NeutralSpot::Center,
        NeutralSpot::TopLeft,
        NeutralSpot::TopMiddle,
        NeutralSpot::TopRight,
        NeutralSpot::BottomLeft,
        NeutralSpot::BottomMiddle,
        NeutralSpot::BottomRight,
    ];

    pub fn position(&self) -> Position {
        match self {
            Self::Center => Position::new(0.0, 0.0),
            Self::TopLeft => Position::new(-0.3, 0.3),
            Self::TopMiddle => Position::new(0.0, 0.2),
            Self::TopRight => Position::new(0.3, 0.3),
            Self::BottomLeft => Position::new(-0.3, -0.3),
            Self::BottomMiddle => Position::new(0.0, -0.2),
            Self::BottomRight => Position::new(0.3, -0.3),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Center => "center",
            Self::TopLeft => "top_left",
            Self::TopMiddle => "top_middle",
            Self::TopRight => "top_right",
            Self::BottomLeft => "bottom_left",
            Self::BottomMiddle => "bottom_middle",
            Self::BottomRight => "bottom_right",
        }
    }
}

impl fmt::Display for NeutralSpot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NeutralSpotDistanceType {
    Nearest,
    Furthest,
}

/// A spot is occupied when any robot or the ball is closer than the
/// exclusion radius.
pub fn is_neutral_spot_occupied(spot: NeutralSpot, occupants: &[Position]) -> bool {
    let spot_pos = spot.position();
    occupants
        .iter()
        .any(|p| p.distance_to(&spot_pos) < DISTANCE_AROUND_UNOCCUPIED_NEUTRAL_SPOT)
}

/// Unoccupied spots with their distance from `object`, nearest first for
/// `Nearest` and furthest first for `Furthest`.
pub fn unoccupied_neutral_spots_sorted(
    distance_type: NeutralSpotDistanceType,
    object: Position,
    occupants: &[Position],
) -> Vec<(NeutralSpot, f64)> {
    let mut pairs: Vec<(NeutralSpot, f64)> = NeutralSpot::ALL
        .iter()
        .filter(|spot| !is_neutral_spot_occupied(**spot, occupants))
        .map(|spot| (*spot, object.distance_to(&spot.position())))
        .collect();

    // Stable sorts: equal distances keep declaration order both ways.
    match distance_type {
        NeutralSpotDistanceType::Nearest => pairs.sort_by(|a, b| a.1.total_cmp(&b.1)),
        NeutralSpotDistanceType::Furthest => pairs.sort_by(|a, b| b.1.total_cmp(&a.1)),
    }
    pairs
}
