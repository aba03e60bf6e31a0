//! Supervisor facade: caches the per-tick world snapshot and wraps every
//! write the referee makes to the simulation.
//!
//! RULE: The referee reads positions from this cache, never straight from
//! the simulation. The cache is refreshed once per tick and updated in
//! place whenever the referee moves something.

use crate::{
    clock::time_to_string,
    error::{RefereeError, RefereeResult},
    event_handlers::EventMessageQueue,
    field::robot_initial_pose,
    neutral_spot::{unoccupied_neutral_spots_sorted, NeutralSpot, NeutralSpotDistanceType},
    packet::PositionFrame,
    simulation::{Label, LabelId, SimulationAdapter},
    types::{Pose, Position, RobotId, TrackedObject},
};

const BLUE: u32 = 0x0000FF;
const YELLOW: u32 = 0xFFFF00;

pub struct Supervisor<S: SimulationAdapter> {
    sim:   S,
    /// Indexed by `RobotId::index()`.
    robots: [Pose; 6],
    ball:  Position,
}

impl<S: SimulationAdapter> Supervisor<S> {
    pub fn new(sim: S) -> RefereeResult<Self> {
        let mut supervisor = Self {
            sim,
            robots: [Pose::default(); 6],
            ball: Position::default(),
        };
        supervisor.update_positions()?;
        Ok(supervisor)
    }

    pub fn sim(&self) -> &S {
        &self.sim
    }

    pub fn sim_mut(&mut self) -> &mut S {
        &mut self.sim
    }

    pub fn into_inner(self) -> S {
        self.sim
    }

    /// Refresh the cached snapshot of every robot and the ball.
    pub fn update_positions(&mut self) -> RefereeResult<()> {
        let ball = self.sim.position(TrackedObject::Ball)?;
        check_finite(TrackedObject::Ball, ball, 0.0)?;

        let mut robots = [Pose::default(); 6];
        for robot in RobotId::ALL {
            let position = self.sim.position(robot.into())?;
            let orientation = self.sim.rotation(robot)?;
            check_finite(robot.into(), position, orientation)?;
            robots[robot.index()] = Pose { position, orientation };
        }

        self.ball = ball;
        self.robots = robots;
        Ok(())
    }

    pub fn robot_pose(&self, robot: RobotId) -> Pose {
        self.robots[robot.index()]
    }

    pub fn ball_position(&self) -> Position {
        self.ball
    }

    pub fn position(&self, object: TrackedObject) -> Position {
        match object {
            TrackedObject::Robot(robot) => self.robot_pose(robot).position,
            TrackedObject::Ball => self.ball,
        }
    }

    /// Everything that can block a neutral spot: all robots and the ball.
    pub fn occupants(&self) -> Vec<Position> {
        self.robots
            .iter()
            .map(|pose| pose.position)
            .chain(std::iter::once(self.ball))
            .collect()
    }

    pub fn frame(&self, waiting_for_kickoff: bool) -> PositionFrame {
        PositionFrame {
            robots: self.robots,
            ball: self.ball,
            waiting_for_kickoff,
        }
    }

    /// Broadcast the cached snapshot to every robot.
    pub fn emit_positions(&mut self, waiting_for_kickoff: bool) -> RefereeResult<()> {
        let packet = self.frame(waiting_for_kickoff).pack()?;
        self.sim.broadcast(&packet)
    }

    pub fn set_robot_position(&mut self, robot: RobotId, position: Position) -> RefereeResult<()> {
        self.sim.set_position(robot.into(), position)?;
        self.sim.reset_velocity(robot.into())?;
        self.robots[robot.index()].position = position;
        Ok(())
    }

    pub fn set_robot_rotation(&mut self, robot: RobotId, orientation: f64) -> RefereeResult<()> {
        self.sim.set_rotation(robot, orientation)?;
        self.robots[robot.index()].orientation = orientation;
        Ok(())
    }

    pub fn set_ball_position(&mut self, position: Position) -> RefereeResult<()> {
        self.sim.set_position(TrackedObject::Ball, position)?;
        self.sim.reset_velocity(TrackedObject::Ball)?;
        self.ball = position;
        Ok(())
    }

    pub fn unoccupied_neutral_spots_sorted(
        &self,
        distance_type: NeutralSpotDistanceType,
        object: TrackedObject,
    ) -> Vec<(NeutralSpot, f64)> {
        unoccupied_neutral_spots_sorted(distance_type, self.position(object), &self.occupants())
    }

    /// Teleport an object onto a neutral spot. Robots are also turned back
    /// to their initial heading.
    pub fn move_object_to_neutral_spot(&mut self, object: TrackedObject, spot: NeutralSpot) -> RefereeResult<()> {
        let target = spot.position();
        match object {
            TrackedObject::Ball => self.set_ball_position(target),
            TrackedObject::Robot(robot) => {
                self.set_robot_position(robot, target)?;
                self.set_robot_rotation(robot, robot_initial_pose(robot).orientation)
            }
        }
    }

    // ── Labels ─────────────────────────────────────────────────

    pub fn draw_team_names(&mut self, team_name_blue: &str, team_name_yellow: &str) -> RefereeResult<()> {
        self.sim.draw_label(&Label {
            id: LabelId::BlueTeam,
            text: team_name_blue.to_string(),
            x: 0.92 - team_name_blue.chars().count() as f64 * 0.01,
            y: 0.05,
            size: 0.1,
            color: BLUE,
            transparency: 0.0,
            font: "Tahoma",
        })?;
        self.sim.draw_label(&Label {
            id: LabelId::YellowTeam,
            text: team_name_yellow.to_string(),
            x: 0.05,
            y: 0.05,
            size: 0.1,
            color: YELLOW,
            transparency: 0.0,
            font: "Tahoma",
        })
    }

    pub fn draw_scores(&mut self, blue: u32, yellow: u32) -> RefereeResult<()> {
        self.sim.draw_label(&Label {
            id: LabelId::BlueScore,
            text: blue.to_string(),
            x: 0.92,
            y: 0.01,
            size: 0.1,
            color: BLUE,
            transparency: 0.0,
            font: "Tahoma",
        })?;
        self.sim.draw_label(&Label {
            id: LabelId::YellowScore,
            text: yellow.to_string(),
            x: 0.05,
            y: 0.01,
            size: 0.1,
            color: YELLOW,
            transparency: 0.0,
            font: "Tahoma",
        })
    }

    pub fn draw_time(&mut self, time_remaining: f64) -> RefereeResult<()> {
        self.sim.draw_label(&Label {
            id: LabelId::Time,
            text: time_to_string(time_remaining)?,
            x: 0.45,
            y: 0.01,
            size: 0.1,
            color: 0x000000,
            transparency: 0.0,
            font: "Arial",
        })
    }

    pub fn draw_event_messages(&mut self, messages: &EventMessageQueue) -> RefereeResult<()> {
        if messages.is_empty() {
            return Ok(());
        }
        self.sim.draw_label(&Label {
            id: LabelId::EventMessages,
            text: messages.texts().join("\n"),
            x: 0.01,
            y: 0.95 - (messages.len() - 1) as f64 * 0.025,
            size: 0.05,
            color: 0xFFFFFF,
            transparency: 0.0,
            font: "Tahoma",
        })
    }

    /// 0 is fully visible, 1 is invisible.
    pub fn draw_goal_sign(&mut self, transparency: f64) -> RefereeResult<()> {
        self.sim.draw_label(&Label {
            id: LabelId::Goal,
            text: "GOAL!".to_string(),
            x: 0.30,
            y: 0.40,
            size: 0.4,
            color: 0xFF0000,
            transparency: transparency.clamp(0.0, 1.0),
            font: "Verdana",
        })
    }

    pub fn hide_goal_sign(&mut self) -> RefereeResult<()> {
        self.sim.draw_label(&Label {
            id: LabelId::Goal,
            text: String::new(),
            x: 0.30,
            y: 0.40,
            size: 0.4,
            color: 0xFF0000,
            transparency: 1.0,
            font: "Verdana",
        })
    }
}

fn check_finite(object: TrackedObject, position: Position, orientation: f64) -> RefereeResult<()> {
    if position.is_finite() && orientation.is_finite() {
        return Ok(());
    }
    Err(RefereeError::GeometryInvariant(format!(
        "simulation reported a non-finite pose for {object}: ({}, {}, {orientation})",
        position.x, position.y
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::InMemorySimulation;

    fn supervisor() -> Supervisor<InMemorySimulation> {
        Supervisor::new(InMemorySimulation::new()).unwrap()
    }

    #[test]
    fn cache_follows_simulation_after_update() {
        let mut sv = supervisor();
        sv.sim_mut().place(RobotId::Y2, Position::new(0.4, 0.1));
        assert_ne!(sv.position(RobotId::Y2.into()), Position::new(0.4, 0.1));

        sv.update_positions().unwrap();
        assert_eq!(sv.position(RobotId::Y2.into()), Position::new(0.4, 0.1));
    }

    #[test]
    fn non_finite_positions_fail_fast() {
        let mut sv = supervisor();
        sv.sim_mut().place(TrackedObject::Ball, Position::new(f64::NAN, 0.0));
        assert!(matches!(sv.update_positions(), Err(RefereeError::GeometryInvariant(_))));
    }

    #[test]
    fn moving_a_robot_to_a_spot_resets_heading_and_velocity() {
        let mut sv = supervisor();
        sv.set_robot_rotation(RobotId::B2, 0.3).unwrap();
        sv.move_object_to_neutral_spot(RobotId::B2.into(), NeutralSpot::BottomLeft).unwrap();

        let pose = sv.robot_pose(RobotId::B2);
        assert_eq!(pose.position, NeutralSpot::BottomLeft.position());
        assert_eq!(pose.orientation, robot_initial_pose(RobotId::B2).orientation);
        assert_eq!(sv.sim().position(RobotId::B2.into()).unwrap(), pose.position);
        assert_eq!(sv.sim().velocity_resets[&TrackedObject::Robot(RobotId::B2)], 1);
    }

    #[test]
    fn spots_under_objects_are_not_offered() {
        let sv = supervisor();
        // The ball sits on the centre spot in the kickoff layout.
        let spots = sv.unoccupied_neutral_spots_sorted(NeutralSpotDistanceType::Nearest, TrackedObject::Ball);
        assert!(spots.iter().all(|(s, _)| *s != NeutralSpot::Center));
        assert!(!spots.is_empty());
    }

    #[test]
    fn emitted_packet_decodes_to_cached_frame() {
        let mut sv = supervisor();
        sv.emit_positions(true).unwrap();
        let decoded = PositionFrame::unpack(sv.sim().last_broadcast().unwrap()).unwrap();
        assert_eq!(decoded, sv.frame(true));
    }

    #[test]
    fn event_messages_stack_upwards() {
        let mut sv = supervisor();
        let mut queue = EventMessageQueue::new();
        sv.draw_event_messages(&queue).unwrap();
        assert!(sv.sim().label(LabelId::EventMessages).is_none());

        queue.push(600.0, "one".into());
        queue.push(599.0, "two".into());
        sv.draw_event_messages(&queue).unwrap();
        let label = sv.sim().label(LabelId::EventMessages).unwrap();
        assert_eq!(label.text, "one\ntwo");
        assert!((label.y - 0.925).abs() < 1e-12);
    }

    #[test]
    fn scores_and_time_labels() {
        let mut sv = supervisor();
        sv.draw_scores(2, 5).unwrap();
        sv.draw_time(75.5).unwrap();
        assert_eq!(sv.sim().label(LabelId::BlueScore).unwrap().text, "2");
        assert_eq!(sv.sim().label(LabelId::YellowScore).unwrap().text, "5");
        assert_eq!(sv.sim().label(LabelId::Time).unwrap().text, "01:15");
    }
}
