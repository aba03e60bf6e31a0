//! Referee events: the only output of the rule engine besides
//! repositioning.
//!
//! Each variant carries exactly the fields its event needs.
//! Variants are never removed or reordered.

use crate::types::{RobotId, Team, TrackedObject};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameEvent {
    MatchStart {
        total_match_time: u32,
    },
    MatchFinish {
        total_match_time: u32,
        score_blue: u32,
        score_yellow: u32,
    },
    Goal {
        team: Team,
        team_name: String,
        score_blue: u32,
        score_yellow: u32,
    },
    Kickoff {
        robot_name: RobotId,
    },
    LackOfProgress {
        object: TrackedObject,
    },
    InsidePenaltyForTooLong {
        robot_name: RobotId,
    },
}

impl GameEvent {
    /// Stable event type name, as written to the event log.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MatchStart { .. } => "MATCH_START",
            Self::MatchFinish { .. } => "MATCH_FINISH",
            Self::Goal { .. } => "GOAL",
            Self::Kickoff { .. } => "KICKOFF",
            Self::LackOfProgress { .. } => "LACK_OF_PROGRESS",
            Self::InsidePenaltyForTooLong { .. } => "INSIDE_PENALTY_FOR_TOO_LONG",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn events_serialize_as_type_and_payload() {
        let goal = GameEvent::Goal {
            team: Team::Yellow,
            team_name: "Yellows".into(),
            score_blue: 0,
            score_yellow: 1,
        };
        assert_eq!(
            serde_json::to_value(&goal).unwrap(),
            json!({
                "event": "GOAL",
                "payload": {"team": "Y", "team_name": "Yellows", "score_blue": 0, "score_yellow": 1}
            })
        );

        let lop = GameEvent::LackOfProgress { object: TrackedObject::Ball };
        assert_eq!(
            serde_json::to_value(&lop).unwrap(),
            json!({"event": "LACK_OF_PROGRESS", "payload": {"object": "ball"}})
        );
    }

    #[test]
    fn kind_matches_serialized_tag() {
        let events = [
            GameEvent::MatchStart { total_match_time: 600 },
            GameEvent::MatchFinish { total_match_time: 600, score_blue: 1, score_yellow: 2 },
            GameEvent::Kickoff { robot_name: RobotId::B1 },
            GameEvent::InsidePenaltyForTooLong { robot_name: RobotId::Y3 },
        ];
        for event in events {
            let value = serde_json::to_value(&event).unwrap();
            assert_eq!(value["event"], event.kind());
        }
    }
}
