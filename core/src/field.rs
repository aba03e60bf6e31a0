//! Field geometry: every fixed coordinate the rules depend on.
//!
//! Coordinates are planar (x across the field, y towards the blue goal).
//! The blue goal sits at +y, the yellow goal at -y.

use crate::types::{Pose, Position, RobotId};
use std::f64::consts::FRAC_PI_2;

pub const FIELD_X_LOWER_LIMIT: f64 = -0.62;
pub const FIELD_X_UPPER_LIMIT: f64 = 0.62;
pub const FIELD_Y_LOWER_LIMIT: f64 = -0.73;
pub const FIELD_Y_UPPER_LIMIT: f64 = 0.73;

pub const GOAL_X_LOWER_LIMIT: f64 = -0.2;
pub const GOAL_X_UPPER_LIMIT: f64 = 0.2;
pub const GOAL_YELLOW_Y_LIMIT: f64 = -0.745;
pub const GOAL_YELLOW_BACK_WALL_Y_LIMIT: f64 = -0.84;
pub const GOAL_BLUE_Y_LIMIT: f64 = 0.745;
pub const GOAL_BLUE_BACK_WALL_Y_LIMIT: f64 = 0.84;

/// A penalty box as `(vertical boundary, lower x, upper x)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PenaltyArea {
    pub vertical: f64,
    pub lower: f64,
    pub upper: f64,
}

pub const YELLOW_PENALTY_AREA: PenaltyArea = PenaltyArea { vertical: -0.56, lower: -0.35, upper: 0.35 };
pub const BLUE_PENALTY_AREA: PenaltyArea = PenaltyArea { vertical: 0.56, lower: -0.35, upper: 0.35 };

/// Objects closer than this to a neutral spot make it occupied.
pub const DISTANCE_AROUND_UNOCCUPIED_NEUTRAL_SPOT: f64 = 0.1;

pub const BALL_INITIAL_POSITION: Position = Position::new(0.0, 0.0);

// Blue faces the yellow goal (-y), yellow faces the blue goal (+y).
const BLUE_HEADING: f64 = -FRAC_PI_2;
const YELLOW_HEADING: f64 = FRAC_PI_2;

/// Standard kickoff layout, before position noise.
pub fn robot_initial_pose(robot: RobotId) -> Pose {
    match robot {
        RobotId::B1 => Pose::new(-0.2, 0.2, BLUE_HEADING),
        RobotId::B2 => Pose::new(0.2, 0.2, BLUE_HEADING),
        RobotId::B3 => Pose::new(0.0, 0.6, BLUE_HEADING),
        RobotId::Y1 => Pose::new(-0.2, -0.2, YELLOW_HEADING),
        RobotId::Y2 => Pose::new(0.2, -0.2, YELLOW_HEADING),
        RobotId::Y3 => Pose::new(0.0, -0.6, YELLOW_HEADING),
    }
}

/// Where the kicking robot is placed: just off the centre, on its own half.
pub fn kickoff_pose(robot: RobotId) -> Pose {
    match robot.team() {
        crate::types::Team::Blue => Pose::new(0.0, 0.1, BLUE_HEADING),
        crate::types::Team::Yellow => Pose::new(0.0, -0.1, YELLOW_HEADING),
    }
}

pub fn is_in_yellow_goal(x: f64, y: f64) -> bool {
    GOAL_X_LOWER_LIMIT < x
        && x < GOAL_X_UPPER_LIMIT
        && GOAL_YELLOW_BACK_WALL_Y_LIMIT < y
        && y < GOAL_YELLOW_Y_LIMIT
}

pub fn is_in_blue_goal(x: f64, y: f64) -> bool {
    GOAL_X_LOWER_LIMIT < x
        && x < GOAL_X_UPPER_LIMIT
        && GOAL_BLUE_Y_LIMIT < y
        && y < GOAL_BLUE_BACK_WALL_Y_LIMIT
}

/// True when the point has left the playable area. The goal mouths,
/// up to their back walls, count as inside.
pub fn is_outside(x: f64, y: f64) -> bool {
    if !(FIELD_X_LOWER_LIMIT..=FIELD_X_UPPER_LIMIT).contains(&x) {
        return true;
    }
    if (FIELD_Y_LOWER_LIMIT..=FIELD_Y_UPPER_LIMIT).contains(&y) {
        return false;
    }
    let in_goal_mouth = GOAL_X_LOWER_LIMIT < x && x < GOAL_X_UPPER_LIMIT;
    let before_back_wall = GOAL_YELLOW_BACK_WALL_Y_LIMIT < y && y < GOAL_BLUE_BACK_WALL_Y_LIMIT;
    !(in_goal_mouth && before_back_wall)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yellow_goal_is_an_open_rectangle() {
        assert!(is_in_yellow_goal(0.0, -0.8));
        assert!(!is_in_yellow_goal(0.0, 0.0));
        assert!(!is_in_yellow_goal(0.0, GOAL_YELLOW_Y_LIMIT));
        assert!(!is_in_yellow_goal(GOAL_X_UPPER_LIMIT, -0.8));
        assert!(!is_in_yellow_goal(GOAL_X_LOWER_LIMIT, -0.8));
        assert!(!is_in_yellow_goal(0.0, GOAL_YELLOW_BACK_WALL_Y_LIMIT));
    }

    #[test]
    fn blue_goal_is_an_open_rectangle() {
        assert!(is_in_blue_goal(0.0, 0.8));
        assert!(!is_in_blue_goal(0.0, 0.0));
        assert!(!is_in_blue_goal(0.0, GOAL_BLUE_Y_LIMIT));
        assert!(!is_in_blue_goal(GOAL_X_UPPER_LIMIT, 0.8));
        assert!(!is_in_blue_goal(GOAL_X_LOWER_LIMIT, 0.8));
        assert!(!is_in_blue_goal(0.0, GOAL_BLUE_BACK_WALL_Y_LIMIT));
    }

    #[test]
    fn outside_detection_respects_goal_mouths() {
        let cases = [
            (0.0, 0.0, false),
            (0.0, FIELD_Y_UPPER_LIMIT, false),
            (0.0, FIELD_Y_LOWER_LIMIT, false),
            (0.0, 0.8, false),
            (FIELD_X_UPPER_LIMIT + 0.0001, 0.0, true),
            (FIELD_X_LOWER_LIMIT - 0.0001, 0.0, true),
            (0.0, GOAL_YELLOW_BACK_WALL_Y_LIMIT, true),
            (0.0, GOAL_BLUE_BACK_WALL_Y_LIMIT, true),
            (GOAL_X_UPPER_LIMIT, FIELD_Y_UPPER_LIMIT + 0.0001, true),
            (GOAL_X_UPPER_LIMIT, FIELD_Y_LOWER_LIMIT - 0.0001, true),
            (GOAL_X_LOWER_LIMIT, FIELD_Y_UPPER_LIMIT + 0.0001, true),
            (GOAL_X_LOWER_LIMIT, FIELD_Y_LOWER_LIMIT - 0.0001, true),
        ];
        for (x, y, expected) in cases {
            assert_eq!(is_outside(x, y), expected, "is_outside({x}, {y})");
        }
    }

    #[test]
    fn initial_layout_is_inside_the_field() {
        for robot in RobotId::ALL {
            let pose = robot_initial_pose(robot);
            assert!(!is_outside(pose.position.x, pose.position.y), "{robot} starts outside");
        }
    }
}
