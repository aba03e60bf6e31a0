//! What the robots receive every tick.

use soccer_referee_core::{
    config::RefereeConfig,
    field::kickoff_pose,
    packet::{PositionFrame, PACKET_SIZE},
    referee::Referee,
    simulation::{InMemorySimulation, SimulationAdapter},
    types::{Position, RobotId, TrackedObject},
};

fn last_frame(r: &Referee<InMemorySimulation>) -> PositionFrame {
    let bytes = r.supervisor().sim().last_broadcast().expect("a broadcast");
    assert_eq!(bytes.len(), PACKET_SIZE);
    PositionFrame::unpack(bytes).expect("decodable packet")
}

#[test]
fn one_packet_per_tick() {
    let mut r = Referee::new(RefereeConfig::default_test(), InMemorySimulation::new()).unwrap();
    r.run_ticks(25).unwrap();
    assert_eq!(r.supervisor().sim().broadcasts.len(), 25);
}

#[test]
fn kickoff_flag_is_broadcast_until_the_ball_moves() {
    let mut r = Referee::new(RefereeConfig::default_test(), InMemorySimulation::new()).unwrap();

    r.tick().unwrap();
    let frame = last_frame(&r);
    assert!(frame.waiting_for_kickoff);
    assert_eq!(frame.robot(RobotId::B1), kickoff_pose(RobotId::B1));

    r.supervisor_mut().sim_mut().place(TrackedObject::Ball, Position::new(0.0, 0.1));
    r.tick().unwrap();
    // The packet goes out before the rules run, so the ball has moved
    // but play is only released on the next one.
    let frame = last_frame(&r);
    assert!(frame.waiting_for_kickoff);
    assert_eq!(frame.ball, Position::new(0.0, 0.1));

    r.tick().unwrap();
    assert!(!last_frame(&r).waiting_for_kickoff);
}

#[test]
fn packet_matches_simulation_state() {
    let mut r = Referee::new(RefereeConfig::default(), InMemorySimulation::new()).unwrap();
    r.tick().unwrap();

    let frame = last_frame(&r);
    let sim = r.supervisor().sim();
    for robot in RobotId::ALL {
        let pose = frame.robot(robot);
        assert_eq!(pose.position, sim.position(robot.into()).unwrap(), "{robot}");
        assert_eq!(pose.orientation, sim.rotation(robot).unwrap(), "{robot}");
    }
}
