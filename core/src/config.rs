use crate::{
    error::{RefereeError, RefereeResult},
    types::Team,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const MATCH_TIME: u32 = 10 * 60;
pub const TIME_STEP_MS: u64 = 64;
pub const POST_GOAL_WAIT_TIME: f64 = 3.0;

/// Everything that parameterises a single match half.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RefereeConfig {
    /// Match length in seconds.
    pub match_time: u32,
    pub tick_ms: u64,
    pub post_goal_wait_time: f64,

    pub progress_check_steps: usize,
    pub progress_check_threshold: f64,
    pub ball_progress_check_steps: usize,
    pub ball_progress_check_threshold: f64,

    pub penalty_area_allowed_time: f64,
    pub penalty_area_reset_after: f64,

    pub team_name_blue: String,
    pub team_name_yellow: String,
    pub initial_score_blue: u32,
    pub initial_score_yellow: u32,
    pub match_id: u32,
    pub half_id: u32,

    /// Width of the uniform noise added to robot start positions.
    pub initial_position_noise: f64,
    /// `"B"` / `"Y"`; a random team kicks off when absent.
    pub initial_kickoff_team: Option<String>,
    /// Lack-of-progress relocation picks among this many nearest free spots.
    pub neutral_spot_choices: usize,
    pub seed: u64,
}

impl Default for RefereeConfig {
    fn default() -> Self {
        Self {
            match_time: MATCH_TIME,
            tick_ms: TIME_STEP_MS,
            post_goal_wait_time: POST_GOAL_WAIT_TIME,
            progress_check_steps: 235,
            progress_check_threshold: 0.5,
            ball_progress_check_steps: 156,
            ball_progress_check_threshold: 0.5,
            penalty_area_allowed_time: 15.0,
            penalty_area_reset_after: 2.0,
            team_name_blue: "Blue".into(),
            team_name_yellow: "Yellow".into(),
            initial_score_blue: 0,
            initial_score_yellow: 0,
            match_id: 1,
            half_id: 1,
            initial_position_noise: 0.15,
            initial_kickoff_team: None,
            neutral_spot_choices: 3,
            seed: 42,
        }
    }
}

impl RefereeConfig {
    /// Load a JSON config file. Missing keys take their defaults.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {}: {e}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {}: {e}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Config for unit tests: deterministic, no position noise.
    pub fn default_test() -> Self {
        Self {
            team_name_blue: "Blues".into(),
            team_name_yellow: "Yellows".into(),
            initial_position_noise: 0.0,
            initial_kickoff_team: Some("B".into()),
            ..Self::default()
        }
    }

    /// The configured opening kickoff team, if any.
    pub fn kickoff_team(&self) -> RefereeResult<Option<Team>> {
        self.initial_kickoff_team
            .as_deref()
            .map(str::parse)
            .transpose()
    }

    pub fn team_name(&self, team: Team) -> &str {
        match team {
            Team::Blue => &self.team_name_blue,
            Team::Yellow => &self.team_name_yellow,
        }
    }

    pub fn validate(&self) -> RefereeResult<()> {
        let invalid = |msg: String| Err(RefereeError::Configuration(msg));

        if self.match_time == 0 {
            return invalid("match_time must be positive".into());
        }
        if self.tick_ms == 0 {
            return invalid("tick_ms must be positive".into());
        }
        if !(self.post_goal_wait_time.is_finite() && self.post_goal_wait_time >= 0.0) {
            return invalid(format!("post_goal_wait_time {} is invalid", self.post_goal_wait_time));
        }
        if self.progress_check_steps == 0 || self.ball_progress_check_steps == 0 {
            return invalid("progress check steps must be positive".into());
        }
        for (name, value) in [
            ("progress_check_threshold", self.progress_check_threshold),
            ("ball_progress_check_threshold", self.ball_progress_check_threshold),
            ("penalty_area_allowed_time", self.penalty_area_allowed_time),
            ("penalty_area_reset_after", self.penalty_area_reset_after),
            ("initial_position_noise", self.initial_position_noise),
        ] {
            if !value.is_finite() || value < 0.0 {
                return invalid(format!("{name} must be a non-negative number, got {value}"));
            }
        }
        if self.team_name_blue.trim().is_empty() || self.team_name_yellow.trim().is_empty() {
            return invalid("team names must not be empty".into());
        }
        if self.neutral_spot_choices == 0 {
            return invalid("neutral_spot_choices must be at least 1".into());
        }
        self.kickoff_team()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        RefereeConfig::default().validate().unwrap();
        RefereeConfig::default_test().validate().unwrap();
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: RefereeConfig =
            serde_json::from_str(r#"{"match_time": 300, "team_name_blue": "Orcas"}"#).unwrap();
        assert_eq!(config.match_time, 300);
        assert_eq!(config.team_name_blue, "Orcas");
        assert_eq!(config.progress_check_steps, 235);
        assert_eq!(config.ball_progress_check_steps, 156);
        assert_eq!(config.tick_ms, 64);
    }

    #[test]
    fn invalid_values_are_configuration_errors() {
        let bad = [
            RefereeConfig { match_time: 0, ..RefereeConfig::default() },
            RefereeConfig { tick_ms: 0, ..RefereeConfig::default() },
            RefereeConfig { progress_check_steps: 0, ..RefereeConfig::default() },
            RefereeConfig { initial_position_noise: -0.1, ..RefereeConfig::default() },
            RefereeConfig { team_name_yellow: " ".into(), ..RefereeConfig::default() },
            RefereeConfig { neutral_spot_choices: 0, ..RefereeConfig::default() },
        ];
        for config in bad {
            assert!(matches!(config.validate(), Err(RefereeError::Configuration(_))));
        }
    }

    #[test]
    fn unknown_kickoff_team_is_rejected() {
        let config = RefereeConfig {
            initial_kickoff_team: Some("G".into()),
            ..RefereeConfig::default()
        };
        assert!(matches!(config.validate(), Err(RefereeError::UnknownTeam { .. })));
    }

    #[test]
    fn load_reads_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("referee.json");
        std::fs::write(&path, r#"{"match_id": 7, "half_id": 2, "initial_kickoff_team": "yellow"}"#)
            .unwrap();

        let config = RefereeConfig::load(&path).unwrap();
        assert_eq!(config.match_id, 7);
        assert_eq!(config.half_id, 2);
        assert_eq!(config.kickoff_team().unwrap(), Some(Team::Yellow));
    }

    #[test]
    fn load_fails_for_missing_file() {
        assert!(RefereeConfig::load("/nonexistent/referee.json").is_err());
    }
}
