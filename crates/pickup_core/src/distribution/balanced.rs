//! Skill-balanced split.
//!
//! Starts from a random feasible split and hill-climbs on the skill gap with
//! moves that keep every position count and every anchorage intact:
//! swapping two unanchored players of the same position, or shifting a whole
//! anchorage across while the same positions come back the other way.

use super::{random, DistributionError};
use crate::models::{Position, PositionQuotas, Roster, Slot, TeamId};
use rand::Rng;
use tracing::debug;

/// A set of team changes and the signed gap they lead to.
#[derive(Debug, Clone)]
struct Move {
    changes: Vec<(Slot, TeamId)>,
    gap: i64,
}

/// Team one's skill minus team two's.
pub(crate) fn signed_gap(roster: &Roster) -> i64 {
    i64::from(roster.team_skill(TeamId::One)) - i64::from(roster.team_skill(TeamId::Two))
}

/// Runs `restarts` independent searches and keeps the split with the smallest
/// gap. The roster is left untouched if every seed fails.
pub(crate) fn split<R: Rng + ?Sized>(
    roster: &mut Roster,
    quotas: &PositionQuotas,
    rng: &mut R,
    restarts: usize,
) -> Result<(), DistributionError> {
    let mut best: Option<(u64, Roster)> = None;
    let mut last_error = None;

    for attempt in 0..restarts.max(1) {
        let mut candidate = roster.clone();
        candidate.clear_assignments();

        if let Err(err) = random::split(&mut candidate, quotas, rng) {
            debug!(attempt, error = %err, "seed split failed");
            last_error = Some(err);
            continue;
        }

        let steps = climb(&mut candidate);
        let gap = signed_gap(&candidate).unsigned_abs();
        debug!(attempt, steps, gap, "search finished");

        if best.as_ref().map_or(true, |(best_gap, _)| gap < *best_gap) {
            best = Some((gap, candidate));
            if gap == 0 {
                break;
            }
        }
    }

    match (best, last_error) {
        (Some((_, found)), _) => {
            *roster = found;
            Ok(())
        }
        (None, Some(err)) => Err(err),
        (None, None) => Err(DistributionError::Unbalanced("no split was attempted".to_string())),
    }
}

/// Applies the best improving move until none is left. Returns the number of
/// moves applied.
fn climb(roster: &mut Roster) -> usize {
    let mut steps = 0;
    loop {
        let current = signed_gap(roster);
        if current == 0 {
            return steps;
        }

        let best = swap_moves(roster, current)
            .into_iter()
            .chain(shift_moves(roster, current))
            .filter(|m| m.gap.abs() < current.abs())
            .min_by_key(|m| m.gap.abs());

        let Some(best) = best else {
            return steps;
        };

        for &(slot, team) in &best.changes {
            if let Some(participant) = roster.get_mut(slot) {
                participant.team = Some(team);
            }
        }
        steps += 1;
        debug!(from = current, to = best.gap, moved = best.changes.len(), "gap improved");
    }
}

/// How much the signed gap changes when a player of `skill` leaves `from`.
fn leave_delta(skill: u8, from: TeamId) -> i64 {
    let twice = 2 * i64::from(skill);
    match from {
        TeamId::One => -twice,
        TeamId::Two => twice,
    }
}

/// Unanchored players at `position` on `team`, with their skill.
fn free_players(roster: &Roster, position: Position, team: TeamId) -> Vec<(Slot, u8)> {
    roster
        .slots()
        .filter(|(slot, p)| slot.position == position && p.team == Some(team) && !p.is_anchored())
        .map(|(slot, p)| (slot, p.skill))
        .collect()
}

fn swap_moves(roster: &Roster, current: i64) -> Vec<Move> {
    let mut moves = Vec::new();
    for position in Position::ALL {
        let ones = free_players(roster, position, TeamId::One);
        let twos = free_players(roster, position, TeamId::Two);

        for &(a, skill_a) in &ones {
            for &(b, skill_b) in &twos {
                if skill_a == skill_b {
                    continue;
                }
                let gap = current
                    + leave_delta(skill_a, TeamId::One)
                    + leave_delta(skill_b, TeamId::Two);
                moves.push(Move { changes: vec![(a, TeamId::Two), (b, TeamId::One)], gap });
            }
        }
    }
    moves
}

/// Candidate shifts of each anchorage, with the returning players picked
/// lowest-rated first and highest-rated first.
fn shift_moves(roster: &Roster, current: i64) -> Vec<Move> {
    let mut moves = Vec::new();

    for members in roster.anchorage_groups().into_values() {
        let Some(from) = members.first().and_then(|&slot| roster.get(slot)).and_then(|p| p.team)
        else {
            continue;
        };
        let to = from.other();

        let outgoing: i64 = members
            .iter()
            .filter_map(|&slot| roster.get(slot))
            .map(|p| leave_delta(p.skill, from))
            .sum();

        for highest_first in [false, true] {
            let mut changes: Vec<(Slot, TeamId)> = members.iter().map(|&slot| (slot, to)).collect();
            let mut gap = current + outgoing;
            let mut complete = true;

            for (position, needed) in roster.counts_of(&members).iter() {
                let mut pool = free_players(roster, position, to);
                if pool.len() < needed {
                    complete = false;
                    break;
                }
                pool.sort_by_key(|&(_, skill)| skill);
                if highest_first {
                    pool.reverse();
                }
                for (slot, skill) in pool.into_iter().take(needed) {
                    gap += leave_delta(skill, to);
                    changes.push((slot, from));
                }
            }

            if complete {
                moves.push(Move { changes, gap });
            }
        }
    }

    moves
}
