//! Shared primitive types used across the entire referee.

use crate::error::RefereeError;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A simulation tick. One tick = one fixed simulation step.
pub type Tick = u64;

/// The two teams of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    #[serde(rename = "B")]
    Blue,
    #[serde(rename = "Y")]
    Yellow,
}

impl Team {
    pub const ALL: [Team; 2] = [Team::Blue, Team::Yellow];

    /// The single-letter code used in robot names and config files.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Blue => "B",
            Self::Yellow => "Y",
        }
    }

    pub fn opponent(&self) -> Team {
        match self {
            Self::Blue => Self::Yellow,
            Self::Yellow => Self::Blue,
        }
    }

    /// The robot that takes this team's kickoff.
    pub fn kickoff_robot(&self) -> RobotId {
        match self {
            Self::Blue => RobotId::B1,
            Self::Yellow => RobotId::Y1,
        }
    }
}

impl FromStr for Team {
    type Err = RefereeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "b" | "blue" => Ok(Self::Blue),
            "y" | "yellow" => Ok(Self::Yellow),
            _ => Err(RefereeError::UnknownTeam { code: s.to_string() }),
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// The six robots on the field, in broadcast order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RobotId {
    B1,
    B2,
    B3,
    Y1,
    Y2,
    Y3,
}

impl RobotId {
    /// Fixed name order. NEVER reorder, the broadcast packet depends on it.
    pub const ALL: [RobotId; 6] = [
        RobotId::B1,
        RobotId::B2,
        RobotId::B3,
        RobotId::Y1,
        RobotId::Y2,
        RobotId::Y3,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::B1 => "B1",
            Self::B2 => "B2",
            Self::B3 => "B3",
            Self::Y1 => "Y1",
            Self::Y2 => "Y2",
            Self::Y3 => "Y3",
        }
    }

    /// Position of this robot in [`RobotId::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn team(&self) -> Team {
        match self {
            Self::B1 | Self::B2 | Self::B3 => Team::Blue,
            Self::Y1 | Self::Y2 | Self::Y3 => Team::Yellow,
        }
    }
}

impl fmt::Display for RobotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Anything the referee tracks and may relocate: a robot or the ball.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackedObject {
    Robot(RobotId),
    Ball,
}

impl TrackedObject {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Robot(robot) => robot.name(),
            Self::Ball => "ball",
        }
    }
}

impl From<RobotId> for TrackedObject {
    fn from(robot: RobotId) -> Self {
        Self::Robot(robot)
    }
}

impl fmt::Display for TrackedObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// Serialized by name so log payloads read "ball" / "B1".
impl Serialize for TrackedObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// A planar field coordinate in metres.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Position) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A robot's position plus its heading (radians, counter-clockwise from +x).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub position: Position,
    pub orientation: f64,
}

impl Pose {
    pub const fn new(x: f64, y: f64, orientation: f64) -> Self {
        Self { position: Position::new(x, y), orientation }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn team_codes_parse_case_insensitively() {
        assert_eq!("B".parse::<Team>().unwrap(), Team::Blue);
        assert_eq!("yellow".parse::<Team>().unwrap(), Team::Yellow);
        assert_eq!(" y ".parse::<Team>().unwrap(), Team::Yellow);
    }

    #[test]
    fn unknown_team_code_is_rejected() {
        let err = "R".parse::<Team>().unwrap_err();
        assert!(matches!(err, RefereeError::UnknownTeam { ref code } if code == "R"));
    }

    #[test]
    fn robot_index_follows_broadcast_order() {
        for (i, robot) in RobotId::ALL.iter().enumerate() {
            assert_eq!(robot.index(), i);
        }
        assert_eq!(RobotId::Y2.team(), Team::Yellow);
        assert_eq!(Team::Blue.kickoff_robot(), RobotId::B1);
    }

    #[test]
    fn tracked_objects_serialize_by_name() {
        let json = serde_json::to_string(&[TrackedObject::Ball, RobotId::B3.into()]).unwrap();
        assert_eq!(json, r#"["ball","B3"]"#);
    }
}
