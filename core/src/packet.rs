//! The per-tick position packet broadcast to every robot controller.
//!
//! Layout (little-endian, 161 bytes):
//!   for each robot in `RobotId::ALL` order: x f64, y f64, heading f64
//!   ball: x f64, y f64
//!   waiting_for_kickoff: u8 (0 or 1)

use crate::{
    error::{RefereeError, RefereeResult},
    types::{Pose, Position, RobotId},
};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::Cursor;

pub const PACKET_SIZE: usize = RobotId::ALL.len() * 3 * 8 + 2 * 8 + 1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionFrame {
    /// Indexed by `RobotId::index()`.
    pub robots: [Pose; 6],
    pub ball: Position,
    pub waiting_for_kickoff: bool,
}

impl PositionFrame {
    pub fn robot(&self, robot: RobotId) -> Pose {
        self.robots[robot.index()]
    }

    pub fn pack(&self) -> RefereeResult<Vec<u8>> {
        let mut buf = Vec::with_capacity(PACKET_SIZE);
        for pose in &self.robots {
            buf.write_f64::<LittleEndian>(pose.position.x)?;
            buf.write_f64::<LittleEndian>(pose.position.y)?;
            buf.write_f64::<LittleEndian>(pose.orientation)?;
        }
        buf.write_f64::<LittleEndian>(self.ball.x)?;
        buf.write_f64::<LittleEndian>(self.ball.y)?;
        buf.write_u8(u8::from(self.waiting_for_kickoff))?;
        Ok(buf)
    }

    pub fn unpack(data: &[u8]) -> RefereeResult<Self> {
        if data.len() != PACKET_SIZE {
            return Err(RefereeError::GeometryInvariant(format!(
                "position packet must be {PACKET_SIZE} bytes, got {}",
                data.len()
            )));
        }
        let mut cursor = Cursor::new(data);
        let mut robots = [Pose::default(); 6];
        for pose in &mut robots {
            let x = cursor.read_f64::<LittleEndian>()?;
            let y = cursor.read_f64::<LittleEndian>()?;
            let orientation = cursor.read_f64::<LittleEndian>()?;
            *pose = Pose::new(x, y, orientation);
        }
        let ball = Position::new(
            cursor.read_f64::<LittleEndian>()?,
            cursor.read_f64::<LittleEndian>()?,
        );
        let waiting_for_kickoff = match cursor.read_u8()? {
            0 => false,
            1 => true,
            other => {
                return Err(RefereeError::GeometryInvariant(format!(
                    "invalid waiting_for_kickoff flag {other}"
                )))
            }
        };
        Ok(Self { robots, ball, waiting_for_kickoff })
    }
}
