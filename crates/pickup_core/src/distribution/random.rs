//! Uniformly random split, with and without anchorages.

use super::DistributionError;
use crate::anchorage::feasibility::find_placement_from;
use crate::models::{
    AnchorageId, Position, PositionCounts, PositionQuotas, Roster, Slot, Team, TeamId,
};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, warn};

/// Draws which team is considered first for the next decision.
fn draw_pair<R: Rng + ?Sized>(rng: &mut R) -> (TeamId, TeamId) {
    let primary = if rng.gen_bool(0.5) { TeamId::One } else { TeamId::Two };
    (primary, primary.other())
}

/// Picks a team among the eligible ones: both eligible is a coin flip,
/// exactly one eligible wins, none is `None`.
fn choose_team<R, F>(rng: &mut R, mut eligible: F) -> Option<TeamId>
where
    R: Rng + ?Sized,
    F: FnMut(TeamId) -> bool,
{
    let (primary, secondary) = draw_pair(rng);
    match (eligible(primary), eligible(secondary)) {
        (true, true) => Some(if rng.gen_bool(0.5) { primary } else { secondary }),
        (true, false) => Some(primary),
        (false, true) => Some(secondary),
        (false, false) => None,
    }
}

fn assign(roster: &mut Roster, teams: &mut [Team; 2], slot: Slot, team: TeamId) {
    if let Some(participant) = roster.get_mut(slot) {
        participant.team = Some(team);
        teams[team.index()].add(participant);
    }
}

/// Strategy for rosters without anchorages.
///
/// One primary team is drawn for the whole run. Each position is shuffled and
/// its first half goes to the primary team; everyone left goes to the other.
fn without_anchorages<R: Rng + ?Sized>(
    roster: &mut Roster,
    teams: &mut [Team; 2],
    rng: &mut R,
) {
    let (primary, secondary) = draw_pair(rng);
    debug!(primary = primary.number(), "splitting without anchorages");

    for position in Position::ALL {
        let mut order: Vec<usize> = (0..roster.count_at(position)).collect();
        order.shuffle(rng);

        let half = order.len() / 2;
        for &index in &order[..half] {
            assign(roster, teams, Slot { position, index }, primary);
        }
    }

    for slot in roster.unassigned_slots() {
        assign(roster, teams, slot, secondary);
    }
}

/// Runs whichever random strategy fits the roster and returns the filled teams.
pub(crate) fn split<R: Rng + ?Sized>(
    roster: &mut Roster,
    quotas: &PositionQuotas,
    rng: &mut R,
) -> Result<[Team; 2], DistributionError> {
    let mut teams = [Team::new(TeamId::One), Team::new(TeamId::Two)];
    if roster.has_anchorages() {
        with_anchorages(roster, &mut teams, quotas, rng)?;
    } else {
        without_anchorages(roster, &mut teams, rng);
    }
    Ok(teams)
}

/// Strategy for rosters with anchorages.
///
/// Whole anchorages are placed first, largest first, each on its primary team
/// when it fits there and on the secondary otherwise. A team only counts as
/// fitting if the anchorages still to come can be placed afterwards. Then
/// every unanchored participant is placed on a team whose position is not yet
/// full.
fn with_anchorages<R: Rng + ?Sized>(
    roster: &mut Roster,
    teams: &mut [Team; 2],
    quotas: &PositionQuotas,
    rng: &mut R,
) -> Result<(), DistributionError> {
    let mut groups: Vec<(AnchorageId, Vec<Slot>, PositionCounts)> = roster
        .anchorage_groups()
        .into_iter()
        .map(|(id, members)| {
            let load = roster.counts_of(&members);
            (id, members, load)
        })
        .collect();
    groups.sort_by(|a, b| b.1.len().cmp(&a.1.len()).then(a.0.cmp(&b.0)));

    for (n, (id, members, load)) in groups.iter().enumerate() {
        let pending: Vec<(AnchorageId, PositionCounts)> =
            groups[n + 1..].iter().map(|(id, _, load)| (*id, *load)).collect();

        let (primary, secondary) = draw_pair(rng);
        let chosen = [primary, secondary].into_iter().find(|team| {
            let mut loads = [teams[0].counts(), teams[1].counts()];
            let target = &mut loads[team.index()];
            if !quotas.admits(target, load) {
                return false;
            }
            target.merge(load);
            find_placement_from(&pending, quotas, loads).is_some()
        });

        let Some(team) = chosen else {
            warn!(anchorage = id.get(), size = members.len(), "no team can take anchorage");
            return Err(DistributionError::AnchorageInfeasible { id: *id, size: members.len() });
        };

        debug!(anchorage = id.get(), team = team.number(), "anchorage placed");
        for &slot in members {
            assign(roster, teams, slot, team);
        }
    }

    let per_team = quotas.players_per_team();
    for slot in roster.unassigned_slots() {
        let position = slot.position;
        let chosen = choose_team(rng, |team| {
            let team = &teams[team.index()];
            !team.is_position_full(position, quotas) && team.total_count() < per_team
        });

        let Some(team) = chosen else {
            let name = roster.get(slot).map(|p| p.name().to_string()).unwrap_or_default();
            warn!(player = %name, %position, "no team can take player");
            return Err(DistributionError::ParticipantInfeasible { name, position });
        };

        assign(roster, teams, slot, team);
    }

    Ok(())
}
