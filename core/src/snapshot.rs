//! Match snapshot: the referee's summary state as JSON.
//!
//! Taken on demand by the host (runner IPC, end-of-match summary).
//! It is a read-only view: nothing restores a referee from it.

use crate::{clock::MatchClock, types::Team};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPhase {
    Playing,
    PostGoalPause,
    MatchOver,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub match_id:            u32,
    pub half_id:             u32,
    pub team_name_blue:      String,
    pub team_name_yellow:    String,
    pub score_blue:          u32,
    pub score_yellow:        u32,
    pub clock:               MatchClock,
    /// Seconds since the match started.
    pub elapsed:             f64,
    pub time_remaining:      f64,
    pub phase:               MatchPhase,
    pub waiting_for_kickoff: bool,
    pub team_to_kickoff:     Option<Team>,
}
