//! The referee: the rule engine of a single match half.
//!
//! TICK ORDER (fixed, never reordered):
//!   1. First tick only: MATCH_START, then the opening kickoff
//!   2. Refresh the position cache and broadcast it to the robots
//!   3. Advance the clock; finish the match once time has run out
//!   4. Playing: goal, lack of progress, penalty area, kickoff release
//!   5. Post-goal pause: count down, then reset and kick off
//!   6. Draw the on-screen event messages
//!
//! RULES:
//!   - All time arithmetic runs on the elapsed tick counter.
//!   - All randomness flows through the RngBank.
//!   - A failed relocation is logged, never propagated.
//!   - Nothing happens after MATCH_FINISH.

use crate::{
    clock::MatchClock,
    config::RefereeConfig,
    error::{RefereeError, RefereeResult},
    event::GameEvent,
    event_handlers::{DrawMessageHandler, EventMessageQueue},
    eventer::{EventContext, EventHandler, Eventer},
    field::{self, BALL_INITIAL_POSITION},
    neutral_spot::{NeutralSpot, NeutralSpotDistanceType},
    penalty_area_checker::PenaltyAreaChecker,
    progress_checker::ProgressChecker,
    rng::{RefereeRng, RngBank, RngSlot},
    simulation::SimulationAdapter,
    snapshot::{MatchPhase, MatchSnapshot},
    supervisor::Supervisor,
    types::{Position, RobotId, Team, TrackedObject},
};

/// How far the ball must roll from its kickoff spot before play is live.
pub const KICKOFF_RELEASE_DISTANCE: f64 = 0.01;

/// Result of a single `tick()`.
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    /// False once the match is over.
    pub continues: bool,
    /// Every event emitted during this tick, in order.
    pub events:    Vec<GameEvent>,
}

pub struct Referee<S: SimulationAdapter> {
    config:     RefereeConfig,
    supervisor: Supervisor<S>,
    clock:      MatchClock,
    rng_bank:   RngBank,
    eventer:    Eventer,
    messages:   EventMessageQueue,

    score_blue:          u32,
    score_yellow:        u32,
    /// Seconds left in the post-goal pause; 0 while playing.
    ball_reset_timer:    f64,
    team_to_kickoff:     Option<Team>,
    waiting_for_kickoff: bool,
    kickoff_ball:        Position,
    match_over:          bool,

    robot_progress:   [ProgressChecker; 6],
    ball_progress:    ProgressChecker,
    penalty_checkers: [PenaltyAreaChecker; 6],

    tick_events: Vec<GameEvent>,
}

impl<S: SimulationAdapter> Referee<S> {
    /// Validate the config, draw the static labels and put every object
    /// on its starting spot. The on-screen message feed is always wired.
    pub fn new(config: RefereeConfig, sim: S) -> RefereeResult<Self> {
        config.validate()?;

        let robot_progress = std::array::from_fn(|_| {
            ProgressChecker::new(config.progress_check_steps, config.progress_check_threshold)
        });
        let ball_progress =
            ProgressChecker::new(config.ball_progress_check_steps, config.ball_progress_check_threshold);
        let penalty_checkers = std::array::from_fn(|_| {
            PenaltyAreaChecker::new(config.penalty_area_allowed_time, config.penalty_area_reset_after)
        });

        let mut eventer = Eventer::new();
        eventer.subscribe(Box::new(DrawMessageHandler::new()));

        let mut referee = Self {
            clock:      MatchClock::new(config.match_time, config.tick_ms),
            rng_bank:   RngBank::new(config.seed),
            supervisor: Supervisor::new(sim)?,
            eventer,
            messages:   EventMessageQueue::new(),
            score_blue:          config.initial_score_blue,
            score_yellow:        config.initial_score_yellow,
            ball_reset_timer:    0.0,
            team_to_kickoff:     None,
            waiting_for_kickoff: false,
            kickoff_ball:        BALL_INITIAL_POSITION,
            match_over:          false,
            robot_progress,
            ball_progress,
            penalty_checkers,
            tick_events: Vec::new(),
            config,
        };

        referee
            .supervisor
            .draw_team_names(&referee.config.team_name_blue, &referee.config.team_name_yellow)?;
        referee.supervisor.draw_scores(referee.score_blue, referee.score_yellow)?;
        referee.reset_positions()?;

        log::info!(
            "referee ready: match {} half {} ({} vs {}), seed {}",
            referee.config.match_id,
            referee.config.half_id,
            referee.config.team_name_blue,
            referee.config.team_name_yellow,
            referee.config.seed
        );
        Ok(referee)
    }

    /// Add an event handler. Handlers run in subscription order, after
    /// the on-screen message feed.
    pub fn subscribe(&mut self, handler: Box<dyn EventHandler>) {
        self.eventer.subscribe(handler);
    }

    /// Advance the match by one simulation step.
    pub fn tick(&mut self) -> RefereeResult<TickOutcome> {
        if self.match_over {
            return Ok(TickOutcome { continues: false, events: Vec::new() });
        }
        self.tick_events.clear();

        if self.clock.is_first_tick() {
            self.emit(GameEvent::MatchStart { total_match_time: self.config.match_time })?;
            let team = self.config.kickoff_team()?;
            self.kickoff(team)?;
        }

        self.supervisor.update_positions()?;
        self.supervisor.emit_positions(self.waiting_for_kickoff)?;

        self.clock.advance();
        if self.clock.is_over() {
            self.emit(GameEvent::MatchFinish {
                total_match_time: self.config.match_time,
                score_blue:       self.score_blue,
                score_yellow:     self.score_yellow,
            })?;
            self.match_over = true;
            log::info!(
                "match over: {} {} - {} {}",
                self.config.team_name_blue,
                self.score_blue,
                self.score_yellow,
                self.config.team_name_yellow
            );
            return Ok(self.outcome(false));
        }
        self.supervisor.draw_time(self.clock.time_remaining())?;

        if self.ball_reset_timer == 0.0 {
            self.check_goal()?;
            self.check_progress()?;
            self.check_robots_in_penalty_area()?;
            self.update_waiting_for_kickoff();
        } else {
            self.ball_reset_timer -= self.clock.tick_seconds();
            if self.ball_reset_timer <= 0.0 {
                self.end_post_goal_pause()?;
            } else {
                let faded = 1.0 - self.ball_reset_timer / self.config.post_goal_wait_time;
                self.supervisor.draw_goal_sign(faded)?;
            }
        }

        self.supervisor.draw_event_messages(&self.messages)?;
        Ok(self.outcome(true))
    }

    /// Run up to `n` ticks, stopping early when the match ends.
    /// Returns every event emitted along the way.
    pub fn run_ticks(&mut self, n: u64) -> RefereeResult<Vec<GameEvent>> {
        let mut events = Vec::new();
        for _ in 0..n {
            let outcome = self.tick()?;
            events.extend(outcome.events);
            if !outcome.continues {
                break;
            }
        }
        Ok(events)
    }

    /// Run until MATCH_FINISH has been emitted.
    pub fn run_to_end(&mut self) -> RefereeResult<Vec<GameEvent>> {
        let mut events = Vec::new();
        loop {
            let outcome = self.tick()?;
            events.extend(outcome.events);
            if !outcome.continues {
                return Ok(events);
            }
        }
    }

    // ── Rules ──────────────────────────────────────────────────

    fn check_goal(&mut self) -> RefereeResult<()> {
        let ball = self.supervisor.ball_position();
        let scorer = if field::is_in_blue_goal(ball.x, ball.y) {
            Team::Yellow
        } else if field::is_in_yellow_goal(ball.x, ball.y) {
            Team::Blue
        } else {
            return Ok(());
        };

        match scorer {
            Team::Blue => self.score_blue += 1,
            Team::Yellow => self.score_yellow += 1,
        }
        self.team_to_kickoff = Some(scorer.opponent());

        self.emit(GameEvent::Goal {
            team:         scorer,
            team_name:    self.config.team_name(scorer).to_string(),
            score_blue:   self.score_blue,
            score_yellow: self.score_yellow,
        })?;
        self.supervisor.draw_scores(self.score_blue, self.score_yellow)?;
        self.supervisor.draw_goal_sign(0.0)?;

        self.ball_reset_timer = self.config.post_goal_wait_time;
        if self.ball_reset_timer <= 0.0 {
            self.end_post_goal_pause()?;
        }
        Ok(())
    }

    fn check_progress(&mut self) -> RefereeResult<()> {
        let mut rng = self.rng_bank.for_slot_at_tick(RngSlot::NeutralSpot, self.clock.elapsed_ticks);

        for robot in RobotId::ALL {
            let position = self.supervisor.robot_pose(robot).position;
            let checker = &mut self.robot_progress[robot.index()];
            checker.track(position);
            if checker.is_progress() && !field::is_outside(position.x, position.y) {
                continue;
            }
            self.emit(GameEvent::LackOfProgress { object: robot.into() })?;
            self.relocate_near(robot.into(), &mut rng)?;
        }

        let ball = self.supervisor.ball_position();
        self.ball_progress.track(ball);
        log::debug!(
            "tick {}: ball moved {:.3} m over the window",
            self.clock.elapsed_ticks,
            self.ball_progress.window_sum()
        );
        if !self.ball_progress.is_progress() || field::is_outside(ball.x, ball.y) {
            self.emit(GameEvent::LackOfProgress { object: TrackedObject::Ball })?;
            self.relocate_near(TrackedObject::Ball, &mut rng)?;
        }
        Ok(())
    }

    fn check_robots_in_penalty_area(&mut self) -> RefereeResult<()> {
        let elapsed = self.clock.elapsed();
        for robot in RobotId::ALL {
            let position = self.supervisor.robot_pose(robot).position;
            let checker = &mut self.penalty_checkers[robot.index()];
            checker.track(position, elapsed);
            if !checker.is_violating() {
                continue;
            }
            self.emit(GameEvent::InsidePenaltyForTooLong { robot_name: robot })?;
            self.relocate_far(robot)?;
        }
        Ok(())
    }

    /// Clear the kickoff flag once the ball has left its kickoff spot.
    fn update_waiting_for_kickoff(&mut self) {
        if self.waiting_for_kickoff
            && self.supervisor.ball_position().distance_to(&self.kickoff_ball) > KICKOFF_RELEASE_DISTANCE
        {
            log::debug!("tick {}: ball in play", self.clock.elapsed_ticks);
            self.waiting_for_kickoff = false;
        }
    }

    fn end_post_goal_pause(&mut self) -> RefereeResult<()> {
        self.ball_reset_timer = 0.0;
        self.supervisor.hide_goal_sign()?;
        self.reset_positions()?;
        let team = self.team_to_kickoff.take();
        self.kickoff(team)
    }

    // ── Placement ──────────────────────────────────────────────

    /// Put `team`'s kicker on its kickoff spot. A random team kicks off
    /// when none is given.
    pub fn kickoff(&mut self, team: Option<Team>) -> RefereeResult<()> {
        let team = match team {
            Some(team) => team,
            None => {
                let mut rng = self.rng_bank.for_slot_at_tick(RngSlot::Kickoff, self.clock.elapsed_ticks);
                if rng.coin() { Team::Blue } else { Team::Yellow }
            }
        };
        let robot = team.kickoff_robot();
        let pose = field::kickoff_pose(robot);

        self.supervisor.set_robot_position(robot, pose.position)?;
        self.supervisor.set_robot_rotation(robot, pose.orientation)?;
        self.reset_checkers(robot.into());

        self.emit(GameEvent::Kickoff { robot_name: robot })?;
        self.waiting_for_kickoff = true;
        self.kickoff_ball = self.supervisor.ball_position();
        Ok(())
    }

    /// Ball to the centre, robots to their starting layout (plus noise),
    /// all velocities and checkers reset.
    pub fn reset_positions(&mut self) -> RefereeResult<()> {
        self.supervisor.set_ball_position(BALL_INITIAL_POSITION)?;

        let noise = self.config.initial_position_noise;
        let mut rng = self.rng_bank.for_slot_at_tick(RngSlot::PositionNoise, self.clock.elapsed_ticks);
        for robot in RobotId::ALL {
            let pose = field::robot_initial_pose(robot);
            let (dx, dy) = if noise > 0.0 {
                (rng.uniform(-noise / 2.0, noise / 2.0), rng.uniform(-noise / 2.0, noise / 2.0))
            } else {
                (0.0, 0.0)
            };
            let position = Position::new(pose.position.x + dx, pose.position.y + dy);
            self.supervisor.set_robot_position(robot, position)?;
            self.supervisor.set_robot_rotation(robot, pose.orientation)?;
        }

        for checker in &mut self.robot_progress {
            checker.reset();
        }
        for checker in &mut self.penalty_checkers {
            checker.reset();
        }
        self.ball_progress.reset();
        Ok(())
    }

    /// Lack of progress: one of the nearest free spots, picked at random.
    fn relocate_near(&mut self, object: TrackedObject, rng: &mut RefereeRng) -> RefereeResult<()> {
        let spots = self
            .supervisor
            .unoccupied_neutral_spots_sorted(NeutralSpotDistanceType::Nearest, object);
        let choice = match spots.len() {
            0 => None,
            n => Some(spots[rng.next_index_below(n.min(self.config.neutral_spot_choices))].0),
        };
        self.relocate(object, choice)
    }

    /// Penalty area: the free spot furthest away.
    fn relocate_far(&mut self, robot: RobotId) -> RefereeResult<()> {
        let choice = self
            .supervisor
            .unoccupied_neutral_spots_sorted(NeutralSpotDistanceType::Furthest, robot.into())
            .first()
            .map(|(spot, _)| *spot);
        self.relocate(robot.into(), choice)
    }

    fn relocate(&mut self, object: TrackedObject, spot: Option<NeutralSpot>) -> RefereeResult<()> {
        // Without a free spot the checkers keep their state, so the
        // object is reported and retried on the next tick.
        let Some(spot) = spot else {
            log::warn!("{}", RefereeError::NoAvailableNeutralSpot { object });
            return Ok(());
        };
        log::debug!("moving {object} to neutral spot {spot}");
        self.supervisor.move_object_to_neutral_spot(object, spot)?;
        self.reset_checkers(object);
        Ok(())
    }

    fn reset_checkers(&mut self, object: TrackedObject) {
        match object {
            TrackedObject::Robot(robot) => {
                self.robot_progress[robot.index()].reset();
                self.penalty_checkers[robot.index()].reset();
            }
            TrackedObject::Ball => self.ball_progress.reset(),
        }
    }

    // ── Events ─────────────────────────────────────────────────

    fn emit(&mut self, event: GameEvent) -> RefereeResult<()> {
        log::info!("{:>8.3}s {}", self.clock.elapsed(), DrawMessageHandler::format(&event));
        let mut ctx = EventContext {
            match_time:     self.config.match_time,
            elapsed:        self.clock.elapsed(),
            time_remaining: self.clock.time_remaining(),
            messages:       &mut self.messages,
        };
        self.eventer.event(&mut ctx, &event)?;
        self.tick_events.push(event);
        Ok(())
    }

    fn outcome(&mut self, continues: bool) -> TickOutcome {
        TickOutcome { continues, events: std::mem::take(&mut self.tick_events) }
    }

    // ── State ──────────────────────────────────────────────────

    pub fn config(&self) -> &RefereeConfig {
        &self.config
    }

    pub fn clock(&self) -> &MatchClock {
        &self.clock
    }

    pub fn supervisor(&self) -> &Supervisor<S> {
        &self.supervisor
    }

    pub fn supervisor_mut(&mut self) -> &mut Supervisor<S> {
        &mut self.supervisor
    }

    pub fn score_blue(&self) -> u32 {
        self.score_blue
    }

    pub fn score_yellow(&self) -> u32 {
        self.score_yellow
    }

    pub fn time_remaining(&self) -> f64 {
        self.clock.time_remaining()
    }

    pub fn ball_reset_timer(&self) -> f64 {
        self.ball_reset_timer
    }

    pub fn team_to_kickoff(&self) -> Option<Team> {
        self.team_to_kickoff
    }

    pub fn waiting_for_kickoff(&self) -> bool {
        self.waiting_for_kickoff
    }

    pub fn event_messages(&self) -> &EventMessageQueue {
        &self.messages
    }

    pub fn is_match_over(&self) -> bool {
        self.match_over
    }

    pub fn phase(&self) -> MatchPhase {
        if self.match_over {
            MatchPhase::MatchOver
        } else if self.ball_reset_timer > 0.0 {
            MatchPhase::PostGoalPause
        } else {
            MatchPhase::Playing
        }
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        let snapshot = MatchSnapshot {
            match_id:            self.config.match_id,
            half_id:             self.config.half_id,
            team_name_blue:      self.config.team_name_blue.clone(),
            team_name_yellow:    self.config.team_name_yellow.clone(),
            score_blue:          self.score_blue,
            score_yellow:        self.score_yellow,
            clock:               self.clock.clone(),
            elapsed:             self.clock.elapsed(),
            time_remaining:      self.clock.time_remaining(),
            phase:               self.phase(),
            waiting_for_kickoff: self.waiting_for_kickoff,
            team_to_kickoff:     self.team_to_kickoff,
        };
        log::debug!("snapshot at tick {}: {:?}", self.clock.elapsed_ticks, snapshot.phase);
        snapshot
    }
}
