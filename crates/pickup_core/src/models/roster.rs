use super::participant::{AnchorageId, Participant, Position, TeamId};
use super::quotas::{PositionCounts, PositionQuotas};
use crate::config::{SkillRange, SquadConfig};
use crate::error::RosterError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Location of a participant inside the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slot {
    pub position: Position,
    pub index: usize,
}

/// Raw roster input as supplied by the data-entry layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RosterEntry {
    pub name: String,
    pub position: Position,
    /// Missing ratings start at the minimum of the configured range
    #[serde(default)]
    pub skill: Option<u8>,
}

impl RosterEntry {
    pub fn new(name: impl Into<String>, position: Position) -> Self {
        Self { name: name.into(), position, skill: None }
    }

    pub fn rated(name: impl Into<String>, position: Position, skill: u8) -> Self {
        Self { name: name.into(), position, skill: Some(skill) }
    }
}

/// The pool of participants, grouped by position in insertion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Roster {
    players: BTreeMap<Position, Vec<Participant>>,
}

fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a roster from input entries, applying the configured name and
    /// rating rules.
    pub fn from_entries(
        entries: impl IntoIterator<Item = RosterEntry>,
        config: &SquadConfig,
    ) -> Result<Self, RosterError> {
        let mut roster = Roster::new();

        for entry in entries {
            let name = entry.name.trim();
            if name.is_empty() {
                return Err(RosterError::BlankName);
            }
            if name.chars().count() > config.max_name_len {
                return Err(RosterError::NameTooLong {
                    name: name.to_string(),
                    max: config.max_name_len,
                });
            }

            let skill = entry.skill.unwrap_or(config.skill_range.min);
            check_skill(name, skill, &config.skill_range)?;

            roster.add(Participant::new(name, entry.position, skill))?;
        }

        Ok(roster)
    }

    /// Appends a participant, rejecting repeated names (case-insensitive).
    pub fn add(&mut self, participant: Participant) -> Result<Slot, RosterError> {
        if self.find(participant.name()).is_some() {
            return Err(RosterError::DuplicateName(participant.name().to_string()));
        }

        let position = participant.position();
        let bucket = self.players.entry(position).or_default();
        bucket.push(participant);
        Ok(Slot { position, index: bucket.len() - 1 })
    }

    pub fn at(&self, position: Position) -> &[Participant] {
        self.players.get(&position).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn count_at(&self, position: Position) -> usize {
        self.at(position).len()
    }

    pub fn len(&self) -> usize {
        self.players.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every participant, positions in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Participant> {
        self.players.values().flatten()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Participant> {
        self.players.values_mut().flatten()
    }

    pub fn slots(&self) -> impl Iterator<Item = (Slot, &Participant)> {
        self.players.iter().flat_map(|(&position, bucket)| {
            bucket.iter().enumerate().map(move |(index, p)| (Slot { position, index }, p))
        })
    }

    pub fn get(&self, slot: Slot) -> Option<&Participant> {
        self.players.get(&slot.position).and_then(|bucket| bucket.get(slot.index))
    }

    pub(crate) fn get_mut(&mut self, slot: Slot) -> Option<&mut Participant> {
        self.players.get_mut(&slot.position).and_then(|bucket| bucket.get_mut(slot.index))
    }

    pub fn locate(&self, name: &str) -> Option<Slot> {
        let name = name.trim();
        self.slots().find(|(_, p)| same_name(p.name(), name)).map(|(slot, _)| slot)
    }

    pub fn find(&self, name: &str) -> Option<&Participant> {
        self.locate(name).and_then(|slot| self.get(slot))
    }

    pub fn has_anchorages(&self) -> bool {
        self.iter().any(Participant::is_anchored)
    }

    /// Members of every anchorage, keyed by id, each in roster order.
    pub fn anchorage_groups(&self) -> BTreeMap<AnchorageId, Vec<Slot>> {
        let mut groups: BTreeMap<AnchorageId, Vec<Slot>> = BTreeMap::new();
        for (slot, participant) in self.slots() {
            if let Some(id) = participant.anchorage {
                groups.entry(id).or_default().push(slot);
            }
        }
        groups
    }

    pub fn anchorage_members(&self, id: AnchorageId) -> Vec<Slot> {
        self.slots().filter(|(_, p)| p.anchorage == Some(id)).map(|(slot, _)| slot).collect()
    }

    pub fn unassigned_slots(&self) -> Vec<Slot> {
        self.slots().filter(|(_, p)| !p.is_assigned()).map(|(slot, _)| slot).collect()
    }

    /// Position composition of a set of slots.
    pub fn counts_of(&self, slots: &[Slot]) -> PositionCounts {
        slots.iter().map(|slot| slot.position).collect()
    }

    pub fn skill_of(&self, slots: &[Slot]) -> u32 {
        slots.iter().filter_map(|&slot| self.get(slot)).map(|p| u32::from(p.skill)).sum()
    }

    /// Summed skill of everyone currently assigned to `team`.
    pub fn team_skill(&self, team: TeamId) -> u32 {
        self.iter().filter(|p| p.team == Some(team)).map(|p| u32::from(p.skill)).sum()
    }

    /// Verifies every position holds exactly its quota.
    pub fn check_quotas(&self, quotas: &PositionQuotas) -> Result<(), RosterError> {
        for (position, expected) in quotas.iter() {
            let found = self.count_at(position);
            if found != expected {
                return Err(RosterError::QuotaMismatch { position, expected, found });
            }
        }
        Ok(())
    }

    pub fn set_skill(
        &mut self,
        name: &str,
        skill: u8,
        range: &SkillRange,
    ) -> Result<(), RosterError> {
        let slot =
            self.locate(name).ok_or_else(|| RosterError::UnknownParticipant(name.to_string()))?;
        check_skill(name, skill, range)?;
        if let Some(participant) = self.get_mut(slot) {
            participant.skill = skill;
        }
        Ok(())
    }

    /// Puts every rating back to the bottom of the range.
    pub fn reset_skills(&mut self, range: &SkillRange) {
        for participant in self.iter_mut() {
            participant.skill = range.min;
        }
    }

    pub fn clear_assignments(&mut self) {
        for participant in self.iter_mut() {
            participant.team = None;
        }
    }
}

fn check_skill(name: &str, skill: u8, range: &SkillRange) -> Result<(), RosterError> {
    if !range.contains(skill) {
        return Err(RosterError::SkillOutOfRange {
            name: name.to_string(),
            skill,
            min: range.min,
            max: range.max,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SquadConfig {
        SquadConfig::five_a_side()
    }

    #[test]
    fn builds_from_entries_with_default_skill() {
        let roster = Roster::from_entries(
            vec![
                RosterEntry::new("Ana", Position::Goalkeeper),
                RosterEntry::rated("Beto", Position::Forward, 4),
            ],
            &config(),
        )
        .unwrap();

        assert_eq!(roster.len(), 2);
        assert_eq!(roster.find("ana").map(|p| p.skill), Some(1));
        assert_eq!(roster.find("Beto").map(|p| p.skill), Some(4));
    }

    #[test]
    fn rejects_bad_names() {
        let cfg = config();
        assert_eq!(
            Roster::from_entries(vec![RosterEntry::new("   ", Position::Forward)], &cfg),
            Err(RosterError::BlankName)
        );
        assert!(matches!(
            Roster::from_entries(vec![RosterEntry::new("Bartholomew", Position::Forward)], &cfg),
            Err(RosterError::NameTooLong { max: 10, .. })
        ));
        assert_eq!(
            Roster::from_entries(
                vec![
                    RosterEntry::new("Juan", Position::Forward),
                    RosterEntry::new("JUAN", Position::Midfielder),
                ],
                &cfg
            ),
            Err(RosterError::DuplicateName("JUAN".to_string()))
        );
    }

    #[test]
    fn rejects_skill_outside_range() {
        let result =
            Roster::from_entries(vec![RosterEntry::rated("Ana", Position::Forward, 9)], &config());
        assert!(matches!(result, Err(RosterError::SkillOutOfRange { skill: 9, .. })));
    }

    #[test]
    fn quota_check_reports_mismatch() {
        let mut roster = Roster::new();
        roster.add(Participant::new("Ana", Position::Goalkeeper, 1)).unwrap();
        let quotas = PositionQuotas::new().with(Position::Goalkeeper, 2);

        assert_eq!(
            roster.check_quotas(&quotas),
            Err(RosterError::QuotaMismatch { position: Position::Goalkeeper, expected: 2, found: 1 })
        );

        roster.add(Participant::new("Bea", Position::Goalkeeper, 1)).unwrap();
        assert!(roster.check_quotas(&quotas).is_ok());
    }

    #[test]
    fn set_and_reset_skills() {
        let range = SkillRange::default();
        let mut roster = Roster::new();
        roster.add(Participant::new("Ana", Position::Forward, 1)).unwrap();

        roster.set_skill("Ana", 5, &range).unwrap();
        assert_eq!(roster.find("Ana").map(|p| p.skill), Some(5));
        assert!(roster.set_skill("Ana", 0, &range).is_err());
        assert!(matches!(
            roster.set_skill("Nobody", 3, &range),
            Err(RosterError::UnknownParticipant(_))
        ));

        roster.reset_skills(&range);
        assert_eq!(roster.find("Ana").map(|p| p.skill), Some(1));
    }

    #[test]
    fn slots_follow_position_order() {
        let mut roster = Roster::new();
        roster.add(Participant::new("Fede", Position::Forward, 1)).unwrap();
        roster.add(Participant::new("Gaby", Position::Goalkeeper, 1)).unwrap();
        roster.add(Participant::new("Fabi", Position::Forward, 1)).unwrap();

        let names: Vec<_> = roster.iter().map(Participant::name).collect();
        assert_eq!(names, vec!["Gaby", "Fede", "Fabi"]);
        assert_eq!(roster.locate("fabi"), Some(Slot { position: Position::Forward, index: 1 }));
    }
}
