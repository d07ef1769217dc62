use super::participant::{Participant, Position, TeamId};
use super::quotas::{PositionCounts, PositionQuotas};
use super::roster::Roster;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One of the two output buckets, partitioned by position.
///
/// Holds snapshots of the participants assigned to it; the roster stays the
/// source of truth for assignments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Team {
    id: TeamId,
    players: BTreeMap<Position, Vec<Participant>>,
}

impl Team {
    pub fn new(id: TeamId) -> Self {
        Self { id, players: Position::ALL.into_iter().map(|p| (p, Vec::new())).collect() }
    }

    /// Collects every participant the roster assigns to `id`.
    pub fn from_roster(id: TeamId, roster: &Roster) -> Self {
        let mut team = Team::new(id);
        for participant in roster.iter().filter(|p| p.team == Some(id)) {
            team.add(participant);
        }
        team
    }

    pub fn id(&self) -> TeamId {
        self.id
    }

    pub fn players_at(&self, position: Position) -> &[Participant] {
        self.players.get(&position).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Participant> {
        self.players.values().flatten()
    }

    pub fn count_at(&self, position: Position) -> usize {
        self.players_at(position).len()
    }

    pub fn total_count(&self) -> usize {
        self.players.values().map(Vec::len).sum()
    }

    pub fn counts(&self) -> PositionCounts {
        self.iter().map(Participant::position).collect()
    }

    pub fn total_skill(&self) -> u32 {
        self.iter().map(|p| u32::from(p.skill)).sum()
    }

    pub fn is_position_full(&self, position: Position, quotas: &PositionQuotas) -> bool {
        self.count_at(position) >= quotas.half(position)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.iter().any(|p| p.name() == name)
    }

    pub(crate) fn add(&mut self, participant: &Participant) {
        self.players.entry(participant.position()).or_default().push(participant.clone());
    }

    pub fn clear(&mut self) {
        self.players.values_mut().for_each(Vec::clear);
    }

    pub fn is_empty(&self) -> bool {
        self.total_count() == 0
    }
}
