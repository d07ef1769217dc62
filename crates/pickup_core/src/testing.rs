//! Shared fixtures for unit tests.

use crate::anchorage::AnchorageLimits;
use crate::models::{Participant, Position, PositionQuotas, Roster};

pub(crate) fn quotas(totals: &[(Position, usize)]) -> PositionQuotas {
    totals.iter().copied().collect()
}

/// Roster filling every quota with players named `<code><n>` ("FW1", "FW2", ...).
pub(crate) fn roster_for(quotas: &PositionQuotas) -> Roster {
    let mut roster = Roster::new();
    for (position, total) in quotas.iter() {
        for i in 0..total {
            let skill = ((i * 7 + position as usize * 3) % 5 + 1) as u8;
            let name = format!("{}{}", position.code(), i + 1);
            roster.add(Participant::new(name, position, skill)).unwrap();
        }
    }
    roster
}

pub(crate) fn limits(max_players_per_anchorage: usize, max_anchored_players: usize) -> AnchorageLimits {
    AnchorageLimits { max_players_per_anchorage, max_anchored_players }
}

/// Names of the first `n` players at `position`.
pub(crate) fn first_names(roster: &Roster, position: Position, n: usize) -> Vec<String> {
    roster.at(position).iter().take(n).map(|p| p.name().to_string()).collect()
}
