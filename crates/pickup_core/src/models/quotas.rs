use super::participant::Position;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Total number of players per position across the whole pool.
///
/// Each team receives exactly half of every quota, so all values must be even.
/// Positions missing from the map have a quota of zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct PositionQuotas(BTreeMap<Position, usize>);

impl PositionQuotas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds quotas from per-team counts (doubling each).
    pub fn per_team(counts: impl IntoIterator<Item = (Position, usize)>) -> Self {
        counts.into_iter().map(|(position, n)| (position, n * 2)).collect()
    }

    pub fn with(mut self, position: Position, total: usize) -> Self {
        self.0.insert(position, total);
        self
    }

    pub fn total(&self, position: Position) -> usize {
        self.0.get(&position).copied().unwrap_or(0)
    }

    /// Slots each team has for `position`.
    pub fn half(&self, position: Position) -> usize {
        self.total(position) / 2
    }

    pub fn pool_size(&self) -> usize {
        self.0.values().sum()
    }

    pub fn players_per_team(&self) -> usize {
        self.pool_size() / 2
    }

    pub fn iter(&self) -> impl Iterator<Item = (Position, usize)> + '_ {
        Position::ALL.into_iter().map(move |p| (p, self.total(p)))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some((position, quota)) = self.iter().find(|(_, q)| q % 2 != 0) {
            return Err(ConfigError::OddQuota { position, quota });
        }
        if self.pool_size() == 0 {
            return Err(ConfigError::EmptyPool);
        }
        Ok(())
    }

    /// Whether a group with composition `group` fits on a team currently
    /// holding `team`.
    ///
    /// The team total must stay within `players_per_team`, and no position the
    /// group touches may already be full or overflow its half.
    pub fn admits(&self, team: &PositionCounts, group: &PositionCounts) -> bool {
        if team.total() + group.total() > self.players_per_team() {
            return false;
        }

        group.iter().all(|(position, n)| {
            let half = self.half(position);
            let current = team.get(position);
            current < half && current + n <= half
        })
    }
}

impl FromIterator<(Position, usize)> for PositionQuotas {
    fn from_iter<I: IntoIterator<Item = (Position, usize)>>(iter: I) -> Self {
        PositionQuotas(iter.into_iter().collect())
    }
}

/// Head count per position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PositionCounts([usize; Position::COUNT]);

impl PositionCounts {
    pub fn get(&self, position: Position) -> usize {
        self.0[position as usize]
    }

    pub fn add(&mut self, position: Position, n: usize) {
        self.0[position as usize] += n;
    }

    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }

    pub fn merge(&mut self, other: &PositionCounts) {
        for (slot, n) in self.0.iter_mut().zip(other.0) {
            *slot += n;
        }
    }

    /// Positions with a non-zero count.
    pub fn iter(&self) -> impl Iterator<Item = (Position, usize)> + '_ {
        Position::ALL.into_iter().map(move |p| (p, self.get(p))).filter(|(_, n)| *n > 0)
    }
}

impl FromIterator<Position> for PositionCounts {
    fn from_iter<I: IntoIterator<Item = Position>>(iter: I) -> Self {
        let mut counts = PositionCounts::default();
        for position in iter {
            counts.add(position, 1);
        }
        counts
    }
}
