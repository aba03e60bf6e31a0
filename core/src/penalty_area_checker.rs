//! "Inside the penalty area for too long" tracking.
//!
//! All times are elapsed match seconds (ascending), never the countdown.

use crate::field::{PenaltyArea, BLUE_PENALTY_AREA, YELLOW_PENALTY_AREA};
use crate::types::Position;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PenaltyState {
    Outside,
    Inside { entered: f64 },
    /// Left the box at `left` but not yet for longer than `reset_after`.
    InsideThenLeft { entered: f64, left: f64 },
}

#[derive(Debug, Clone)]
pub struct PenaltyAreaChecker {
    time_allowed: f64,
    reset_after: f64,
    state: PenaltyState,
    time: f64,
    yellow: PenaltyArea,
    blue: PenaltyArea,
}

impl PenaltyAreaChecker {
    pub fn new(time_allowed: f64, reset_after: f64) -> Self {
        Self {
            time_allowed,
            reset_after,
            state: PenaltyState::Outside,
            time: 0.0,
            yellow: YELLOW_PENALTY_AREA,
            blue: BLUE_PENALTY_AREA,
        }
    }

    pub fn reset(&mut self) {
        self.state = PenaltyState::Outside;
    }

    pub fn is_in_yellow_penalty(&self, x: f64, y: f64) -> bool {
        y < self.yellow.vertical && self.yellow.lower < x && x < self.yellow.upper
    }

    pub fn is_in_blue_penalty(&self, x: f64, y: f64) -> bool {
        y > self.blue.vertical && self.blue.lower < x && x < self.blue.upper
    }

    pub fn state(&self) -> PenaltyState {
        self.state
    }

    pub fn has_entered(&self) -> bool {
        !matches!(self.state, PenaltyState::Outside)
    }

    pub fn has_left(&self) -> bool {
        matches!(self.state, PenaltyState::InsideThenLeft { .. })
    }

    pub fn time_entered(&self) -> Option<f64> {
        match self.state {
            PenaltyState::Outside => None,
            PenaltyState::Inside { entered } | PenaltyState::InsideThenLeft { entered, .. } => {
                Some(entered)
            }
        }
    }

    pub fn time_left(&self) -> Option<f64> {
        match self.state {
            PenaltyState::InsideThenLeft { left, .. } => Some(left),
            _ => None,
        }
    }

    pub fn has_been_outside_for_longer(&self) -> bool {
        self.time_left()
            .is_some_and(|left| self.time - left > self.reset_after)
    }

    /// React to the robot's position at elapsed match time `time`.
    pub fn track(&mut self, position: Position, time: f64) {
        self.time = time;
        let (x, y) = (position.x, position.y);
        let inside = self.is_in_blue_penalty(x, y) || self.is_in_yellow_penalty(x, y);

        self.state = match (self.state, inside) {
            (PenaltyState::Outside, true) => PenaltyState::Inside { entered: time },
            (PenaltyState::InsideThenLeft { entered, .. }, true) => PenaltyState::Inside { entered },
            (PenaltyState::Inside { entered }, false) => {
                PenaltyState::InsideThenLeft { entered, left: time }
            }
            (PenaltyState::InsideThenLeft { .. }, false) if self.has_been_outside_for_longer() => {
                PenaltyState::Outside
            }
            (state, _) => state,
        };
    }

    pub fn is_violating(&self) -> bool {
        match self.state {
            PenaltyState::Inside { entered } => self.time - entered > self.time_allowed,
            _ => false,
        }
    }
}
