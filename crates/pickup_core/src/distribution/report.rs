//! Printable and serialisable summary of a finished split.

use super::Strategy;
use crate::models::{AnchorageId, Position, Team, TeamId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportedPlayer {
    pub name: String,
    pub position: Position,
    pub skill: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchorage: Option<AnchorageId>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamReport {
    pub team: TeamId,
    /// Players in position order
    pub players: Vec<ReportedPlayer>,
    pub total_skill: u32,
}

impl TeamReport {
    pub fn from_team(team: &Team) -> Self {
        let players = team
            .iter()
            .map(|p| ReportedPlayer {
                name: p.name().to_string(),
                position: p.position(),
                skill: p.skill,
                anchorage: p.anchorage,
            })
            .collect();

        Self { team: team.id(), players, total_skill: team.total_skill() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SplitReport {
    pub strategy: Strategy,
    pub seed: u64,
    pub generated_at: DateTime<Utc>,
    pub teams: Vec<TeamReport>,
    pub skill_gap: u32,
}

impl SplitReport {
    pub fn new(strategy: Strategy, seed: u64, teams: &(Team, Team)) -> Self {
        let one = TeamReport::from_team(&teams.0);
        let two = TeamReport::from_team(&teams.1);
        let skill_gap = one.total_skill.abs_diff(two.total_skill);

        Self { strategy, seed, generated_at: Utc::now(), teams: vec![one, two], skill_gap }
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for SplitReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Strategy: {} (seed {})", self.strategy, self.seed)?;

        for team in &self.teams {
            writeln!(f)?;
            writeln!(f, "{}", team.team)?;
            for player in &team.players {
                write!(f, "  {:<3} {:<10} {}", player.position.code(), player.name, player.skill)?;
                if let Some(id) = player.anchorage {
                    write!(f, "  [{}]", id)?;
                }
                writeln!(f)?;
            }
            writeln!(f, "  Total skill: {}", team.total_skill)?;
        }

        writeln!(f)?;
        write!(f, "Skill gap: {}", self.skill_gap)
    }
}
