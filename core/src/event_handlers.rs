//! Event handlers: the JSON event log and the on-screen message feed.

use crate::{
    error::RefereeResult,
    event::GameEvent,
    eventer::{EventContext, EventHandler},
    types::TrackedObject,
};
use serde::Serialize;
use std::{
    collections::VecDeque,
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

pub const MAX_EVENT_MESSAGES_IN_QUEUE: usize = 10;

/// Bounded FIFO of `(time_remaining, message)` pairs to draw on screen.
/// The oldest message is dropped once the queue is full.
#[derive(Debug, Clone, Default)]
pub struct EventMessageQueue {
    messages: VecDeque<(f64, String)>,
}

impl EventMessageQueue {
    pub fn new() -> Self {
        Self { messages: VecDeque::with_capacity(MAX_EVENT_MESSAGES_IN_QUEUE) }
    }

    pub fn push(&mut self, time: f64, message: String) {
        if self.messages.len() == MAX_EVENT_MESSAGES_IN_QUEUE {
            self.messages.pop_front();
        }
        self.messages.push_back((time, message));
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(f64, String)> {
        self.messages.iter()
    }

    /// Message texts, oldest first.
    pub fn texts(&self) -> Vec<&str> {
        self.messages.iter().map(|(_, m)| m.as_str()).collect()
    }
}

/// One line of the event log.
#[derive(Serialize)]
struct LogRecord<'a> {
    datetime:  String,
    matchtime: f64,
    #[serde(flatten)]
    event:     &'a GameEvent,
}

/// Appends one JSON object per event to a newline-delimited log file.
pub struct JsonLoggerHandler {
    logfile: PathBuf,
}

impl JsonLoggerHandler {
    pub fn new(logfile: impl Into<PathBuf>) -> Self {
        Self { logfile: logfile.into() }
    }

    pub fn logfile(&self) -> &Path {
        &self.logfile
    }
}

impl EventHandler for JsonLoggerHandler {
    fn name(&self) -> &'static str { "json_logger" }

    fn handle(&mut self, ctx: &mut EventContext<'_>, event: &GameEvent) -> RefereeResult<()> {
        let record = LogRecord {
            datetime:  chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string(),
            matchtime: ctx.elapsed,
            event,
        };
        let line = serde_json::to_string(&record)?;

        if let Some(parent) = self.logfile.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut outfile = OpenOptions::new().create(true).append(true).open(&self.logfile)?;
        writeln!(outfile, "{line}")?;
        outfile.flush()?;
        Ok(())
    }
}

/// Turns events into short messages for the on-screen feed.
#[derive(Debug, Default)]
pub struct DrawMessageHandler;

impl DrawMessageHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn format(event: &GameEvent) -> String {
        match event {
            GameEvent::InsidePenaltyForTooLong { robot_name } => {
                format!("Robot {robot_name}: Inside penalty for too long.")
            }
            GameEvent::LackOfProgress { object: TrackedObject::Ball } => {
                "Ball: Lack of progress.".to_string()
            }
            GameEvent::LackOfProgress { object: TrackedObject::Robot(robot) } => {
                format!("Robot {robot}: Lack of progress.")
            }
            GameEvent::Goal { team_name, .. } => format!("A goal was scored by {team_name}."),
            GameEvent::Kickoff { robot_name } => format!("Robot {robot_name} is kicking off."),
            GameEvent::MatchStart { total_match_time } => {
                format!("The match ({total_match_time}s) has started.")
            }
            GameEvent::MatchFinish { total_match_time, .. } => {
                format!("The match time {total_match_time}s is over.")
            }
        }
    }
}

impl EventHandler for DrawMessageHandler {
    fn name(&self) -> &'static str { "draw_message" }

    fn handle(&mut self, ctx: &mut EventContext<'_>, event: &GameEvent) -> RefereeResult<()> {
        ctx.messages.push(ctx.time_remaining, Self::format(event));
        Ok(())
    }
}
