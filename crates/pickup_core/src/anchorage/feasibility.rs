use crate::models::{AnchorageId, PositionCounts, PositionQuotas, TeamId};
use std::collections::BTreeMap;

/// Searches for a way to put every anchorage on one of the two teams without
/// breaking the position quotas or the team size.
pub(crate) fn find_placement(
    groups: &[(AnchorageId, PositionCounts)],
    quotas: &PositionQuotas,
) -> Option<BTreeMap<AnchorageId, TeamId>> {
    find_placement_from(groups, quotas, [PositionCounts::default(); 2])
}

/// Same search, starting from teams that already hold `loads`.
///
/// Exhaustive backtracking, largest groups first. While both teams hold the
/// same composition they are interchangeable, so the first group is pinned to
/// team one.
pub(crate) fn find_placement_from(
    groups: &[(AnchorageId, PositionCounts)],
    quotas: &PositionQuotas,
    mut loads: [PositionCounts; 2],
) -> Option<BTreeMap<AnchorageId, TeamId>> {
    let mut order: Vec<usize> = (0..groups.len()).collect();
    order.sort_by(|&a, &b| groups[b].1.total().cmp(&groups[a].1.total()));

    let pin_first = loads[0] == loads[1];
    let mut chosen = vec![TeamId::One; groups.len()];

    if !place(0, &order, groups, quotas, &mut loads, &mut chosen, pin_first) {
        return None;
    }

    Some(groups.iter().zip(chosen).map(|((id, _), team)| (*id, team)).collect())
}

fn place(
    depth: usize,
    order: &[usize],
    groups: &[(AnchorageId, PositionCounts)],
    quotas: &PositionQuotas,
    loads: &mut [PositionCounts; 2],
    chosen: &mut [TeamId],
    pin_first: bool,
) -> bool {
    let Some(&i) = order.get(depth) else {
        return true;
    };

    let group = &groups[i].1;
    let candidates: &[TeamId] =
        if depth == 0 && pin_first { &[TeamId::One] } else { &TeamId::BOTH };

    for &team in candidates {
        let slot = team.index();
        if !quotas.admits(&loads[slot], group) {
            continue;
        }

        let saved = loads[slot];
        loads[slot].merge(group);
        chosen[i] = team;

        if place(depth + 1, order, groups, quotas, loads, chosen, pin_first) {
            return true;
        }
        loads[slot] = saved;
    }

    false
}
