//! # Squad configuration
//!
//! Holds every constant the anchorage session and the distribution engine
//! consume: position quotas, anchorage limits, roster input rules and the
//! balanced-search budget.
//!
//! ## Usage
//! ```rust
//! use pickup_core::config::SquadConfig;
//!
//! let config = SquadConfig::default();
//! let eleven = SquadConfig::eleven_a_side();
//! assert_eq!(eleven.players_per_team(), 11);
//! assert!(config.validate().is_ok());
//! ```

use crate::anchorage::AnchorageLimits;
use crate::error::ConfigError;
use crate::models::{Position, PositionQuotas};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::{env, fs};

pub const CONFIG_PATH_ENV: &str = "PICKUP_CONFIG_PATH";

/// Inclusive range accepted for skill ratings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkillRange {
    pub min: u8,
    pub max: u8,
}

impl Default for SkillRange {
    fn default() -> Self {
        Self { min: 1, max: 5 }
    }
}

impl SkillRange {
    pub fn contains(&self, skill: u8) -> bool {
        (self.min..=self.max).contains(&skill)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SquadConfig {
    /// Players per position across both teams (all even)
    pub quotas: PositionQuotas,
    /// Largest group a single anchorage may hold
    pub max_players_per_anchorage: usize,
    /// Upper bound on anchored players across all anchorages (0 disables anchoring)
    pub max_anchored_players: usize,
    /// Longest accepted player name, in characters
    pub max_name_len: usize,
    pub skill_range: SkillRange,
    /// Seeded searches the balanced strategy runs before keeping its best split
    pub balanced_restarts: usize,
}

impl Default for SquadConfig {
    fn default() -> Self {
        Self::five_a_side()
    }
}

impl SquadConfig {
    /// Builds a preset from per-team position counts.
    ///
    /// An anchorage may hold up to one player less than a full team, and up to
    /// two teams' worth of players minus two may be anchored overall.
    fn from_per_team(counts: [(Position, usize); Position::COUNT]) -> Self {
        let quotas = PositionQuotas::per_team(counts);
        let per_team = quotas.players_per_team();
        Self {
            quotas,
            max_players_per_anchorage: per_team - 1,
            max_anchored_players: per_team * 2 - 2,
            max_name_len: 10,
            skill_range: SkillRange::default(),
            balanced_restarts: 8,
        }
    }

    pub fn five_a_side() -> Self {
        Self::from_per_team([
            (Position::Goalkeeper, 1),
            (Position::CentralDefender, 1),
            (Position::LateralDefender, 0),
            (Position::Midfielder, 2),
            (Position::Forward, 1),
        ])
    }

    pub fn seven_a_side() -> Self {
        Self::from_per_team([
            (Position::Goalkeeper, 1),
            (Position::CentralDefender, 1),
            (Position::LateralDefender, 2),
            (Position::Midfielder, 2),
            (Position::Forward, 1),
        ])
    }

    pub fn eight_a_side() -> Self {
        Self::from_per_team([
            (Position::Goalkeeper, 1),
            (Position::CentralDefender, 2),
            (Position::LateralDefender, 2),
            (Position::Midfielder, 2),
            (Position::Forward, 1),
        ])
    }

    pub fn eleven_a_side() -> Self {
        Self::from_per_team([
            (Position::Goalkeeper, 1),
            (Position::CentralDefender, 2),
            (Position::LateralDefender, 2),
            (Position::Midfielder, 4),
            (Position::Forward, 2),
        ])
    }

    /// Looks a preset up by name ("five", "7", "eleven", ...).
    pub fn preset(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "5" | "five" => Some(Self::five_a_side()),
            "7" | "seven" => Some(Self::seven_a_side()),
            "8" | "eight" => Some(Self::eight_a_side()),
            "11" | "eleven" => Some(Self::eleven_a_side()),
            _ => None,
        }
    }

    pub fn players_per_team(&self) -> usize {
        self.quotas.players_per_team()
    }

    pub fn anchorage_limits(&self) -> AnchorageLimits {
        AnchorageLimits {
            max_players_per_anchorage: self.max_players_per_anchorage,
            max_anchored_players: self.max_anchored_players,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.quotas.validate()?;

        let per_team = self.players_per_team();
        if self.max_anchored_players > 0 {
            self.validate_anchorage_limits(per_team)?;
        }
        if self.skill_range.min == 0 || self.skill_range.min > self.skill_range.max {
            return Err(ConfigError::InvalidSkillRange {
                min: self.skill_range.min,
                max: self.skill_range.max,
            });
        }
        if self.max_name_len == 0 {
            return Err(ConfigError::InvalidNameLimit);
        }
        Ok(())
    }

    /// Limits only matter while anchoring is enabled.
    fn validate_anchorage_limits(&self, per_team: usize) -> Result<(), ConfigError> {
        if self.max_players_per_anchorage < 2 {
            return Err(ConfigError::InvalidLimits(format!(
                "max_players_per_anchorage must be at least 2, found {}",
                self.max_players_per_anchorage
            )));
        }
        if self.max_players_per_anchorage > per_team {
            return Err(ConfigError::InvalidLimits(format!(
                "max_players_per_anchorage ({}) exceeds players per team ({})",
                self.max_players_per_anchorage, per_team
            )));
        }
        if self.max_anchored_players == 1 {
            return Err(ConfigError::InvalidLimits(
                "max_anchored_players must be 0 or at least 2".to_string(),
            ));
        }
        if self.max_anchored_players > per_team * 2 {
            return Err(ConfigError::InvalidLimits(format!(
                "max_anchored_players ({}) exceeds the pool size ({})",
                self.max_anchored_players,
                per_team * 2
            )));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SquadConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.display().to_string(), source })?;
        let config: SquadConfig = serde_json::from_str(&content)
            .map_err(|source| ConfigError::Malformed { path: path.display().to_string(), source })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the file named by `PICKUP_CONFIG_PATH`, or the default preset
    /// when the variable is unset or blank.
    pub fn from_env() -> Result<Self, ConfigError> {
        let Ok(path) = env::var(CONFIG_PATH_ENV) else {
            return Ok(Self::default());
        };

        let path = path.trim();
        if path.is_empty() {
            return Ok(Self::default());
        }

        tracing::debug!(path, "loading squad config from {}", CONFIG_PATH_ENV);
        Self::from_path(path)
    }
}
