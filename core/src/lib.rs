//! Rule engine for a simulated robot-soccer match.
//!
//! The host calls [`referee::Referee::tick`] once per simulation step.
//! Everything the referee needs from the physics simulator goes through
//! [`simulation::SimulationAdapter`].

pub mod clock;
pub mod config;
pub mod error;
pub mod event;
pub mod event_handlers;
pub mod eventer;
pub mod field;
pub mod neutral_spot;
pub mod packet;
pub mod penalty_area_checker;
pub mod progress_checker;
pub mod recorder;
pub mod referee;
pub mod rng;
pub mod simulation;
pub mod snapshot;
pub mod supervisor;
pub mod types;
