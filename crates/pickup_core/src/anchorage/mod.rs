//! Anchorage management
//!
//! An anchorage forces a group of participants onto the same team. The
//! session validates every new group against the anchorage limits and the
//! position quotas, and keeps anchorage ids dense (`1..=count`) across
//! deletions by renumbering the ones above a deleted id.

pub(crate) mod feasibility;


use crate::error::RosterError;
use crate::models::{
    AnchorageId, Participant, Position, PositionCounts, PositionQuotas, Roster, Slot, TeamId,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use thiserror::Error;
use tracing::{debug, info};

/// Why an anchorage request was refused. Nothing is mutated on rejection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RejectionReason {
    #[error("Unknown player '{0}'")]
    UnknownParticipant(String),

    #[error("'{name}' already belongs to anchorage {anchorage}")]
    AlreadyAnchored { name: String, anchorage: AnchorageId },

    #[error("An anchorage needs between 2 and {max} players, {selected} selected")]
    InvalidSize { selected: usize, max: usize },

    #[error("At most {limit} {position} players may share an anchorage, {selected} selected")]
    PositionOverflow { position: Position, selected: usize, limit: usize },

    #[error("Anchoring {requested} more players would exceed the limit of {max} ({anchored} already anchored)")]
    AnchoredLimitExceeded { requested: usize, anchored: usize, max: usize },

    #[error("There is no anchorage #{id} ({count} exist)")]
    UnknownAnchorage { id: u32, count: usize },

    #[error("No anchorages have been made")]
    NoAnchorages,

    #[error("The anchorages cannot be split between two teams without breaking a position quota")]
    InfeasibleCombination,
}

impl RejectionReason {
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, RejectionReason::UnknownAnchorage { .. })
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnchorageLimits {
    pub max_players_per_anchorage: usize,
    pub max_anchored_players: usize,
}

/// One anchorage and the names of its members, in roster order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnchorageSummary {
    pub id: AnchorageId,
    pub members: Vec<String>,
}

impl fmt::Display for AnchorageSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, " ----- ANCHORAGE {} -----", self.id)?;
        for (n, name) in self.members.iter().enumerate() {
            writeln!(f, " {}. {}", n + 1, name)?;
        }
        Ok(())
    }
}

/// Result of a successful `finish`: the anchorages plus one placement that
/// proves they fit on two teams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchoragePlan {
    pub anchorages: Vec<AnchorageSummary>,
    pub placement: BTreeMap<AnchorageId, TeamId>,
}

/// Interactive anchoring phase over a roster.
///
/// Borrows the roster mutably for its lifetime; anchorage ids written to the
/// participants stay on the roster after the session is dropped.
pub struct AnchorageSession<'a> {
    roster: &'a mut Roster,
    quotas: &'a PositionQuotas,
    limits: AnchorageLimits,
    anchorage_count: usize,
    anchored_count: usize,
}

/// Opens an anchoring session, picking up any anchorages already on the roster.
pub fn begin_anchoring<'a>(
    roster: &'a mut Roster,
    quotas: &'a PositionQuotas,
    limits: AnchorageLimits,
) -> Result<AnchorageSession<'a>, RosterError> {
    roster.check_quotas(quotas)?;

    let groups = roster.anchorage_groups();
    for (expected, id) in (1u32..).zip(groups.keys()) {
        if id.get() != expected {
            return Err(RosterError::SparseAnchorages(format!(
                "expected anchorage #{}, found {}",
                expected, id
            )));
        }
    }

    let anchorage_count = groups.len();
    let anchored_count = groups.values().map(Vec::len).sum();
    debug!(anchorage_count, anchored_count, "anchoring session opened");

    Ok(AnchorageSession { roster, quotas, limits, anchorage_count, anchored_count })
}

impl<'a> AnchorageSession<'a> {
    /// Anchors the named participants together.
    ///
    /// Checks, first failure wins: every name resolves to a not-yet-anchored
    /// participant; group size is within `2..=max_players_per_anchorage`; no
    /// position contributes more than half of its pool; the anchored total
    /// stays within `max_anchored_players`.
    pub fn create<I, S>(&mut self, selected: I) -> Result<AnchorageId, RejectionReason>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut slots = BTreeSet::new();
        for name in selected {
            let name = name.as_ref();
            let slot = self
                .roster
                .locate(name)
                .ok_or_else(|| RejectionReason::UnknownParticipant(name.to_string()))?;
            if let Some(anchorage) = self.roster.get(slot).and_then(|p| p.anchorage) {
                return Err(RejectionReason::AlreadyAnchored { name: name.to_string(), anchorage });
            }
            slots.insert(slot);
        }
        let slots: Vec<Slot> = slots.into_iter().collect();

        let selected = slots.len();
        let max = self.limits.max_players_per_anchorage;
        if !(2..=max).contains(&selected) {
            return Err(RejectionReason::InvalidSize { selected, max });
        }

        for (position, count) in self.roster.counts_of(&slots).iter() {
            let limit = self.roster.count_at(position) / 2;
            if count > limit {
                return Err(RejectionReason::PositionOverflow { position, selected: count, limit });
            }
        }

        if self.anchored_count + selected > self.limits.max_anchored_players {
            return Err(RejectionReason::AnchoredLimitExceeded {
                requested: selected,
                anchored: self.anchored_count,
                max: self.limits.max_anchored_players,
            });
        }

        let id = self.last_id().map_or_else(AnchorageId::first, |last| last.next());
        for &slot in &slots {
            if let Some(participant) = self.roster.get_mut(slot) {
                participant.anchorage = Some(id);
            }
        }
        self.anchorage_count += 1;
        self.anchored_count += selected;

        info!(
            anchorage = id.get(),
            size = selected,
            anchored = self.anchored_count,
            "anchorage created"
        );
        Ok(id)
    }

    /// Dissolves anchorage `id` and shifts every higher id down by one.
    /// Returns how many participants were released.
    pub fn delete(&mut self, id: AnchorageId) -> Result<usize, RejectionReason> {
        if id.get() as usize > self.anchorage_count {
            return Err(RejectionReason::UnknownAnchorage {
                id: id.get(),
                count: self.anchorage_count,
            });
        }

        let mut released = 0;
        for participant in self.roster.iter_mut() {
            match participant.anchorage {
                Some(current) if current == id => {
                    participant.anchorage = None;
                    released += 1;
                }
                Some(current) if current > id => participant.anchorage = current.prev(),
                _ => {}
            }
        }

        self.anchorage_count -= 1;
        self.anchored_count -= released;

        info!(
            anchorage = id.get(),
            released,
            remaining = self.anchorage_count,
            "anchorage deleted"
        );
        Ok(released)
    }

    pub fn delete_last(&mut self) -> Result<usize, RejectionReason> {
        let id = self.last_id().ok_or(RejectionReason::NoAnchorages)?;
        self.delete(id)
    }

    /// Deletes anchorages from the highest id down. Returns how many were removed.
    pub fn clear_all(&mut self) -> usize {
        let mut removed = 0;
        while self.delete_last().is_ok() {
            removed += 1;
        }
        removed
    }

    /// Confirms the current anchorages can be placed on two teams at all.
    pub fn finish(&self) -> Result<AnchoragePlan, RejectionReason> {
        if self.anchorage_count == 0 {
            return Err(RejectionReason::NoAnchorages);
        }

        let groups: Vec<(AnchorageId, PositionCounts)> = self
            .roster
            .anchorage_groups()
            .into_iter()
            .map(|(id, slots)| (id, self.roster.counts_of(&slots)))
            .collect();

        let placement = feasibility::find_placement(&groups, self.quotas)
            .ok_or(RejectionReason::InfeasibleCombination)?;

        Ok(AnchoragePlan { anchorages: self.anchorages(), placement })
    }

    pub fn anchorage_count(&self) -> usize {
        self.anchorage_count
    }

    pub fn total_anchored_count(&self) -> usize {
        self.anchored_count
    }

    /// Whether at least one more two-player anchorage fits under the limit.
    pub fn can_create_more(&self) -> bool {
        self.limits.max_anchored_players.saturating_sub(self.anchored_count) >= 2
    }

    pub fn can_finish(&self) -> bool {
        self.anchorage_count >= 1
    }

    /// With a single anchorage only "delete last" makes sense.
    pub fn can_delete_specific(&self) -> bool {
        self.anchorage_count >= 2
    }

    /// Participants still available for a new anchorage.
    pub fn selectable(&self) -> impl Iterator<Item = &Participant> {
        self.roster.iter().filter(|p| !p.is_anchored())
    }

    pub fn is_selectable(&self, name: &str) -> bool {
        self.roster.find(name).is_some_and(|p| !p.is_anchored())
    }

    pub fn anchorages(&self) -> Vec<AnchorageSummary> {
        self.roster
            .anchorage_groups()
            .into_iter()
            .map(|(id, slots)| AnchorageSummary {
                id,
                members: slots
                    .iter()
                    .filter_map(|&slot| self.roster.get(slot))
                    .map(|p| p.name().to_string())
                    .collect(),
            })
            .collect()
    }

    pub fn roster(&self) -> &Roster {
        &*self.roster
    }

    pub fn limits(&self) -> AnchorageLimits {
        self.limits
    }

    fn last_id(&self) -> Option<AnchorageId> {
        AnchorageId::new(self.anchorage_count as u32)
    }
}
