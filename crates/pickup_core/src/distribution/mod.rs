//! Team distribution
//!
//! Splits a quota-complete roster into two teams. Every position ends split
//! exactly in half and every anchorage lands whole on one team. A failed run
//! leaves no assignment behind.
//!
//! ```
//! use pickup_core::config::SquadConfig;
//! use pickup_core::distribution::{Distributor, Strategy};
//! use pickup_core::models::{Position, Roster, RosterEntry};
//!
//! let config = SquadConfig::five_a_side();
//! let entries = config.quotas.iter().flat_map(|(position, total)| {
//!     (0..total).map(move |i| RosterEntry::rated(format!("{}{}", position.code(), i), position, 3))
//! });
//! let mut roster = Roster::from_entries(entries, &config).unwrap();
//!
//! let mut distributor = Distributor::new(Strategy::Random, 42);
//! let (one, two) = distributor.distribute(&mut roster, &config.quotas).unwrap();
//! assert_eq!(one.count_at(Position::Midfielder), two.count_at(Position::Midfielder));
//! ```

mod balanced;
mod random;
pub mod report;

#[cfg(test)]
mod tests;

pub use report::{ReportedPlayer, SplitReport, TeamReport};

use crate::config::SquadConfig;
use crate::error::RosterError;
use crate::models::{AnchorageId, Position, PositionQuotas, Roster, Team, TeamId};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::{info, warn};

/// Restarts used by the balanced strategy when none are configured.
pub const DEFAULT_RESTARTS: usize = 8;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Uniformly random within the quota and anchorage rules
    #[default]
    Random,
    /// Minimises the skill difference between the teams
    Balanced,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Random => write!(f, "random"),
            Strategy::Balanced => write!(f, "balanced"),
        }
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "random" => Ok(Strategy::Random),
            "balanced" | "skill" => Ok(Strategy::Balanced),
            other => Err(format!("unknown strategy '{}'", other)),
        }
    }
}

/// Invariant violations found while distributing. Fatal to the run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DistributionError {
    #[error("No team can take anchorage {id} ({size} players)")]
    AnchorageInfeasible { id: AnchorageId, size: usize },

    #[error("No team can take {name} ({position})")]
    ParticipantInfeasible { name: String, position: Position },

    #[error(transparent)]
    Roster(#[from] RosterError),

    #[error("Split check failed: {0}")]
    Unbalanced(String),
}

impl DistributionError {
    /// Whether the run failed because no team could take someone.
    pub fn is_infeasible(&self) -> bool {
        matches!(
            self,
            DistributionError::AnchorageInfeasible { .. }
                | DistributionError::ParticipantInfeasible { .. }
        )
    }
}

/// Seeded distribution driver.
///
/// The seed fixes every random decision, so the same roster, quotas and seed
/// always produce the same teams.
#[derive(Debug, Clone)]
pub struct Distributor {
    strategy: Strategy,
    seed: u64,
    rng: ChaCha8Rng,
    restarts: usize,
}

impl Distributor {
    pub fn new(strategy: Strategy, seed: u64) -> Self {
        Self { strategy, seed, rng: ChaCha8Rng::seed_from_u64(seed), restarts: DEFAULT_RESTARTS }
    }

    pub fn from_entropy(strategy: Strategy) -> Self {
        Self::new(strategy, rand::random())
    }

    /// Takes the restart count from the squad configuration.
    pub fn from_config(strategy: Strategy, seed: u64, config: &SquadConfig) -> Self {
        Self::new(strategy, seed).with_restarts(config.balanced_restarts)
    }

    pub fn with_restarts(mut self, restarts: usize) -> Self {
        self.restarts = restarts.max(1);
        self
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn distribute(
        &mut self,
        roster: &mut Roster,
        quotas: &PositionQuotas,
    ) -> Result<(Team, Team), DistributionError> {
        run(roster, quotas, self.strategy, &mut self.rng, self.restarts)
    }

    /// Drops the current split and draws a new one with the same strategy.
    /// On failure both teams are left empty.
    pub fn redistribute(
        &mut self,
        roster: &mut Roster,
        quotas: &PositionQuotas,
        teams: &mut (Team, Team),
    ) -> Result<(), DistributionError> {
        reset_assignments(roster, teams);
        *teams = self.distribute(roster, quotas)?;
        Ok(())
    }
}

/// Splits `roster` into two teams using `rng` for every random decision.
///
/// Anchorage handling is picked from the roster itself. Assignments are
/// written back to the roster; on error every assignment is cleared.
pub fn distribute<R: Rng + ?Sized>(
    roster: &mut Roster,
    quotas: &PositionQuotas,
    strategy: Strategy,
    rng: &mut R,
) -> Result<(Team, Team), DistributionError> {
    run(roster, quotas, strategy, rng, DEFAULT_RESTARTS)
}

fn run<R: Rng + ?Sized>(
    roster: &mut Roster,
    quotas: &PositionQuotas,
    strategy: Strategy,
    rng: &mut R,
    restarts: usize,
) -> Result<(Team, Team), DistributionError> {
    roster.check_quotas(quotas)?;
    roster.clear_assignments();

    info!(
        %strategy,
        players = roster.len(),
        has_anchorages = roster.has_anchorages(),
        "distributing players"
    );

    let outcome = match strategy {
        Strategy::Random => random::split(roster, quotas, rng).map(|[one, two]| (one, two)),
        Strategy::Balanced => balanced::split(roster, quotas, rng, restarts).map(|()| {
            (Team::from_roster(TeamId::One, roster), Team::from_roster(TeamId::Two, roster))
        }),
    }
    .and_then(|teams| {
        verify_split(roster, &teams, quotas)?;
        Ok(teams)
    });

    match outcome {
        Ok(teams) => {
            info!(
                team_one = teams.0.total_skill(),
                team_two = teams.1.total_skill(),
                "teams ready"
            );
            Ok(teams)
        }
        Err(err) => {
            warn!(error = %err, "distribution failed, assignments cleared");
            roster.clear_assignments();
            Err(err)
        }
    }
}

/// Clears every team assignment on the roster and empties both teams.
/// Anchorage ids are left as they are.
pub fn reset_assignments(roster: &mut Roster, teams: &mut (Team, Team)) {
    roster.clear_assignments();
    teams.0.clear();
    teams.1.clear();
}

/// Checks a finished split: everyone assigned exactly once, every position
/// halved, every anchorage on a single team, and teams matching the roster.
pub fn verify_split(
    roster: &Roster,
    teams: &(Team, Team),
    quotas: &PositionQuotas,
) -> Result<(), DistributionError> {
    let (one, two) = teams;
    if one.id() == two.id() {
        return Err(DistributionError::Unbalanced(format!("both teams are {}", one.id())));
    }

    for participant in roster.iter() {
        let Some(team_id) = participant.team else {
            return Err(DistributionError::Unbalanced(format!(
                "{} has no team",
                participant.name()
            )));
        };
        let (own, rival) = if one.id() == team_id { (one, two) } else { (two, one) };
        if !own.contains(participant.name()) || rival.contains(participant.name()) {
            return Err(DistributionError::Unbalanced(format!(
                "{} is not listed only on {}",
                participant.name(),
                team_id
            )));
        }
    }

    for (position, total) in quotas.iter() {
        let half = total / 2;
        if one.count_at(position) != half || two.count_at(position) != half {
            return Err(DistributionError::Unbalanced(format!(
                "{} split {}/{}, expected {} each",
                position,
                one.count_at(position),
                two.count_at(position),
                half
            )));
        }
    }

    if one.total_count() + two.total_count() != quotas.pool_size() {
        return Err(DistributionError::Unbalanced(format!(
            "teams hold {} players, pool has {}",
            one.total_count() + two.total_count(),
            quotas.pool_size()
        )));
    }

    for (id, members) in roster.anchorage_groups() {
        let mut teams = members.iter().filter_map(|&slot| roster.get(slot)).map(|p| p.team);
        let first = teams.next().flatten();
        if teams.any(|team| team != first) {
            return Err(DistributionError::Unbalanced(format!("anchorage {} is split", id)));
        }
    }

    Ok(())
}
