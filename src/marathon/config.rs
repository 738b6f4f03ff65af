//! Marathon configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::scenario::ScenarioConfig;

/// Errors from loading or validating a marathon configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid map size range {min}..={max}")]
    SizeRange { min: usize, max: usize },

    #[error("obstacle probability must be within [0, 1], got {0}")]
    Probability(f64),

    #[error("{0} must be at least 1")]
    Zero(&'static str),

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Configuration for a batch of random trials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarathonConfig {
    /// Number of trials to run.
    pub trials: usize,
    /// Ticks per trial before the run is terminated.
    pub step_cap: usize,
    /// Consecutive ticks without progress after which a bug is given up.
    /// `None` never gives up; such bugs are terminated by the step cap.
    pub stall_limit: Option<usize>,
    /// Worker threads. 1 runs trials sequentially on the calling thread.
    pub threads: usize,
    /// Base random seed (0 = use entropy).
    pub seed: u64,
    pub scenario: ScenarioConfig,
}

impl Default for MarathonConfig {
    fn default() -> Self {
        MarathonConfig {
            trials: 10,
            step_cap: 10_000,
            stall_limit: None,
            threads: 1,
            seed: 0,
            scenario: ScenarioConfig::default(),
        }
    }
}

impl MarathonConfig {
    /// Loads a JSON config. Missing fields take their default values.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: MarathonConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// The seed a run actually uses: `seed`, or a fresh draw when it is 0.
    pub fn resolved_seed(&self) -> u64 {
        if self.seed != 0 {
            self.seed
        } else {
            rand::random()
        }
    }

    /// Checks that every field is usable. Zero trials is valid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.scenario;
        if s.min_size == 0 || s.min_size > s.max_size {
            return Err(ConfigError::SizeRange {
                min: s.min_size,
                max: s.max_size,
            });
        }
        if !(0.0..=1.0).contains(&s.obstacle_probability) {
            return Err(ConfigError::Probability(s.obstacle_probability));
        }
        if s.goal_attempts == 0 {
            return Err(ConfigError::Zero("goal_attempts"));
        }
        if s.map_attempts == 0 {
            return Err(ConfigError::Zero("map_attempts"));
        }
        if self.step_cap == 0 {
            return Err(ConfigError::Zero("step_cap"));
        }
        if self.stall_limit == Some(0) {
            return Err(ConfigError::Zero("stall_limit"));
        }
        if self.threads == 0 {
            return Err(ConfigError::Zero("threads"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = MarathonConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.step_cap, 10_000);
        assert_eq!(config.scenario.min_optimal_len, 10);
    }

    #[test]
    fn explicit_seed_is_kept() {
        let config = MarathonConfig {
            seed: 42,
            ..Default::default()
        };
        assert_eq!(config.resolved_seed(), 42);
        assert_eq!(config.resolved_seed(), 42);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config = MarathonConfig::from_json_str(
            r#"{"trials": 50, "seed": 7, "scenario": {"obstacle_probability": 0.2}}"#,
        )
        .unwrap();
        assert_eq!(config.trials, 50);
        assert_eq!(config.seed, 7);
        assert_eq!(config.step_cap, 10_000);
        assert_eq!(config.scenario.obstacle_probability, 0.2);
        assert_eq!(config.scenario.max_size, 60);
    }

    #[test]
    fn invalid_values_rejected() {
        let bad = |f: fn(&mut MarathonConfig)| {
            let mut c = MarathonConfig::default();
            f(&mut c);
            c.validate()
        };
        assert!(matches!(
            bad(|c| c.scenario.min_size = 0),
            Err(ConfigError::SizeRange { .. })
        ));
        assert!(matches!(
            bad(|c| c.scenario.obstacle_probability = -0.1),
            Err(ConfigError::Probability(_))
        ));
        assert!(matches!(bad(|c| c.step_cap = 0), Err(ConfigError::Zero("step_cap"))));
        assert!(matches!(bad(|c| c.threads = 0), Err(ConfigError::Zero("threads"))));
        assert!(matches!(
            bad(|c| c.stall_limit = Some(0)),
            Err(ConfigError::Zero("stall_limit"))
        ));
        assert!(bad(|c| c.trials = 0).is_ok());
    }

    #[test]
    fn malformed_json_is_parse_error() {
        assert!(matches!(
            MarathonConfig::from_json_str("{trials: }"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            MarathonConfig::from_json_str(r#"{"threads": 0}"#),
            Err(ConfigError::Zero("threads"))
        ));
    }
}
