//! The simulation collaborator contract.
//!
//! RULE: The referee never holds engine handles directly. Everything it
//! needs from the physics simulator goes through `SimulationAdapter`.
//! `InMemorySimulation` is a pure in-memory world for tests and headless
//! runs: objects only move when the referee moves them.

use crate::{
    error::RefereeResult,
    field::{robot_initial_pose, BALL_INITIAL_POSITION},
    recorder::MovieRecorder,
    types::{Position, RobotId, TrackedObject},
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Every label slot has a fixed id on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum LabelId {
    BlueScore = 0,
    YellowScore = 1,
    Time = 2,
    EventMessages = 3,
    Goal = 4,
    BlueTeam = 5,
    YellowTeam = 6,
}

/// A text overlay drawn on the simulator window.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub id:           LabelId,
    pub text:         String,
    pub x:            f64,
    pub y:            f64,
    pub size:         f64,
    pub color:        u32,
    pub transparency: f64,
    pub font:         &'static str,
}

pub trait SimulationAdapter {
    fn position(&self, object: TrackedObject) -> RefereeResult<Position>;

    fn rotation(&self, robot: RobotId) -> RefereeResult<f64>;

    fn set_position(&mut self, object: TrackedObject, position: Position) -> RefereeResult<()>;

    fn set_rotation(&mut self, robot: RobotId, orientation: f64) -> RefereeResult<()>;

    fn reset_velocity(&mut self, object: TrackedObject) -> RefereeResult<()>;

    fn draw_label(&mut self, label: &Label) -> RefereeResult<()>;

    /// Best-effort send to every robot controller.
    fn broadcast(&mut self, packet: &[u8]) -> RefereeResult<()>;
}

#[derive(Debug, Clone)]
pub struct InMemorySimulation {
    positions:       HashMap<TrackedObject, Position>,
    rotations:       HashMap<RobotId, f64>,
    pub labels:      HashMap<LabelId, Label>,
    pub broadcasts:  Vec<Vec<u8>>,
    /// How many times each object's velocity was zeroed.
    pub velocity_resets: HashMap<TrackedObject, u32>,
    /// Active movie: `(path, width, height)`.
    pub movie:       Option<(PathBuf, u32, u32)>,
    /// Keep only the most recent packet instead of the whole history.
    keep_last_broadcast_only: bool,
}

impl InMemorySimulation {
    /// World with every object on its standard kickoff spot.
    pub fn new() -> Self {
        let mut positions = HashMap::new();
        let mut rotations = HashMap::new();
        for robot in RobotId::ALL {
            let pose = robot_initial_pose(robot);
            positions.insert(TrackedObject::Robot(robot), pose.position);
            rotations.insert(robot, pose.orientation);
        }
        positions.insert(TrackedObject::Ball, BALL_INITIAL_POSITION);
        Self {
            positions,
            rotations,
            labels: HashMap::new(),
            broadcasts: Vec::new(),
            velocity_resets: HashMap::new(),
            movie: None,
            keep_last_broadcast_only: false,
        }
    }

    /// Bound memory for long headless runs.
    pub fn keep_last_broadcast_only(mut self) -> Self {
        self.keep_last_broadcast_only = true;
        self
    }

    /// Move an object as the physics engine would, without the referee.
    pub fn place(&mut self, object: impl Into<TrackedObject>, position: Position) {
        self.positions.insert(object.into(), position);
    }

    pub fn label(&self, id: LabelId) -> Option<&Label> {
        self.labels.get(&id)
    }

    pub fn last_broadcast(&self) -> Option<&[u8]> {
        self.broadcasts.last().map(Vec::as_slice)
    }
}

impl Default for InMemorySimulation {
    fn default() -> Self { Self::new() }
}

impl SimulationAdapter for InMemorySimulation {
    fn position(&self, object: TrackedObject) -> RefereeResult<Position> {
        self.positions
            .get(&object)
            .copied()
            .ok_or_else(|| anyhow::anyhow!("no node for {object}").into())
    }

    fn rotation(&self, robot: RobotId) -> RefereeResult<f64> {
        self.rotations
            .get(&robot)
            .copied()
            .ok_or_else(|| anyhow::anyhow!("no node for {robot}").into())
    }

    fn set_position(&mut self, object: TrackedObject, position: Position) -> RefereeResult<()> {
        self.positions.insert(object, position);
        Ok(())
    }

    fn set_rotation(&mut self, robot: RobotId, orientation: f64) -> RefereeResult<()> {
        self.rotations.insert(robot, orientation);
        Ok(())
    }

    fn reset_velocity(&mut self, object: TrackedObject) -> RefereeResult<()> {
        *self.velocity_resets.entry(object).or_default() += 1;
        Ok(())
    }

    fn draw_label(&mut self, label: &Label) -> RefereeResult<()> {
        self.labels.insert(label.id, label.clone());
        Ok(())
    }

    fn broadcast(&mut self, packet: &[u8]) -> RefereeResult<()> {
        if self.keep_last_broadcast_only {
            self.broadcasts.clear();
        }
        self.broadcasts.push(packet.to_vec());
        Ok(())
    }
}

// Headless runs have no renderer; the movie is only bookkept.
impl MovieRecorder for InMemorySimulation {
    fn movie_start_recording(&mut self, path: &Path, width: u32, height: u32) -> RefereeResult<()> {
        self.movie = Some((path.to_path_buf(), width, height));
        Ok(())
    }

    fn movie_stop_recording(&mut self) -> RefereeResult<()> {
        self.movie = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_in_kickoff_layout() {
        let sim = InMemorySimulation::new();
        assert_eq!(sim.position(TrackedObject::Ball).unwrap(), BALL_INITIAL_POSITION);
        let b3 = robot_initial_pose(RobotId::B3);
        assert_eq!(sim.position(RobotId::B3.into()).unwrap(), b3.position);
        assert_eq!(sim.rotation(RobotId::B3).unwrap(), b3.orientation);
    }

    #[test]
    fn broadcast_history_can_be_bounded() {
        let mut sim = InMemorySimulation::new().keep_last_broadcast_only();
        sim.broadcast(&[1]).unwrap();
        sim.broadcast(&[2]).unwrap();
        assert_eq!(sim.broadcasts.len(), 1);
        assert_eq!(sim.last_broadcast(), Some(&[2u8][..]));
    }
}
