//! Distribution scenarios and split invariants over random rosters.

use super::*;
use super::Strategy;
use crate::anchorage::begin_anchoring;
use crate::models::Participant;
use crate::testing::{first_names, limits, quotas, roster_for};
use proptest::prelude::*;
use proptest::strategy::Strategy as _;

fn seeded(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

fn team_of(roster: &Roster, name: &str) -> Option<TeamId> {
    roster.find(name).and_then(|p| p.team)
}

#[test]
fn keepers_and_forwards_split_evenly() {
    let quotas = quotas(&[(Position::Goalkeeper, 2), (Position::Forward, 4)]);

    for seed in 0..20 {
        let mut roster = roster_for(&quotas);
        let (one, two) =
            distribute(&mut roster, &quotas, Strategy::Random, &mut seeded(seed)).unwrap();

        for team in [&one, &two] {
            assert_eq!(team.count_at(Position::Goalkeeper), 1);
            assert_eq!(team.count_at(Position::Forward), 2);
        }
        assert!(roster.iter().all(Participant::is_assigned));
    }
}

#[test]
fn anchored_trio_stays_together() {
    let quotas = quotas(&[(Position::Goalkeeper, 2), (Position::Forward, 8)]);

    for seed in 0..20 {
        let mut roster = roster_for(&quotas);
        {
            let mut session = begin_anchoring(&mut roster, &quotas, limits(4, 6)).unwrap();
            session.create(["FW1", "FW2", "FW3"]).unwrap();
        }

        let (one, two) =
            distribute(&mut roster, &quotas, Strategy::Random, &mut seeded(seed)).unwrap();

        let team = team_of(&roster, "FW1").unwrap();
        assert_eq!(team_of(&roster, "FW2"), Some(team));
        assert_eq!(team_of(&roster, "FW3"), Some(team));

        let holder = if one.id() == team { &one } else { &two };
        assert!(holder.contains("FW1"));
        assert_eq!(holder.count_at(Position::Forward), 4);
    }
}

#[test]
fn accepted_anchorages_always_split() {
    // Putting both mixed pairs on one team is the only way to fit the forward pair.
    let quotas = quotas(&[(Position::Midfielder, 4), (Position::Forward, 4)]);

    for seed in 0..64 {
        let mut roster = roster_for(&quotas);
        {
            let mut session = begin_anchoring(&mut roster, &quotas, limits(2, 6)).unwrap();
            session.create(["FW1", "MF1"]).unwrap();
            session.create(["FW2", "MF2"]).unwrap();
            session.create(["FW3", "FW4"]).unwrap();
            assert!(session.finish().is_ok());
        }

        for strategy in [Strategy::Random, Strategy::Balanced] {
            let teams = Distributor::new(strategy, seed)
                .with_restarts(1)
                .distribute(&mut roster, &quotas)
                .unwrap_or_else(|err| panic!("{strategy} with seed {seed}: {err}"));

            assert_eq!(team_of(&roster, "FW1"), team_of(&roster, "FW2"));
            assert_ne!(team_of(&roster, "FW1"), team_of(&roster, "FW3"));
            verify_split(&roster, &teams, &quotas).unwrap();
        }
    }
}

#[test]
fn reset_keeps_anchorages() {
    let quotas = quotas(&[(Position::Midfielder, 4), (Position::Forward, 4)]);
    let mut roster = roster_for(&quotas);
    {
        let mut session = begin_anchoring(&mut roster, &quotas, limits(3, 4)).unwrap();
        session.create(["MF1", "FW1"]).unwrap();
    }

    let mut teams = distribute(&mut roster, &quotas, Strategy::Random, &mut seeded(5)).unwrap();
    reset_assignments(&mut roster, &mut teams);

    assert!(roster.iter().all(|p| !p.is_assigned()));
    assert!(teams.0.is_empty() && teams.1.is_empty());
    assert_eq!(roster.find("MF1").and_then(|p| p.anchorage), AnchorageId::new(1));
    assert_eq!(roster.find("FW1").and_then(|p| p.anchorage), AnchorageId::new(1));
}

#[test]
fn redistribute_produces_a_fresh_valid_split() {
    let quotas = quotas(&[(Position::CentralDefender, 4), (Position::Forward, 6)]);
    let mut roster = roster_for(&quotas);
    let mut distributor = Distributor::new(Strategy::Random, 77);

    let mut teams = distributor.distribute(&mut roster, &quotas).unwrap();
    for _ in 0..5 {
        distributor.redistribute(&mut roster, &quotas, &mut teams).unwrap();
        verify_split(&roster, &teams, &quotas).unwrap();
        assert_eq!(teams.0.total_count(), 5);
    }
}

#[test]
fn same_seed_same_teams() {
    let quotas = quotas(&[(Position::Midfielder, 6), (Position::Forward, 4)]);
    let split_with = |strategy| {
        let mut roster = roster_for(&quotas);
        Distributor::new(strategy, 2024).distribute(&mut roster, &quotas).unwrap()
    };

    assert_eq!(split_with(Strategy::Random), split_with(Strategy::Random));
    assert_eq!(split_with(Strategy::Balanced), split_with(Strategy::Balanced));
}

#[test]
fn infeasible_anchorage_clears_everything() {
    let quotas = quotas(&[(Position::Goalkeeper, 2), (Position::Forward, 4)]);
    let mut roster = roster_for(&quotas);
    // Written straight onto the roster: the session would refuse this group.
    for name in first_names(&roster, Position::Forward, 3) {
        let slot = roster.locate(&name).unwrap();
        roster.get_mut(slot).unwrap().anchorage = AnchorageId::new(1);
    }

    for strategy in [Strategy::Random, Strategy::Balanced] {
        let err = distribute(&mut roster, &quotas, strategy, &mut seeded(1)).unwrap_err();
        assert!(err.is_infeasible(), "{strategy}: {err}");
        assert!(roster.iter().all(|p| !p.is_assigned()));
    }
}

#[test]
fn quota_mismatch_is_reported() {
    let quotas = quotas(&[(Position::Forward, 4)]);
    let mut roster = roster_for(&quotas);
    roster.add(Participant::new("Extra", Position::Forward, 3)).unwrap();

    let err = distribute(&mut roster, &quotas, Strategy::Random, &mut seeded(0)).unwrap_err();
    assert!(matches!(
        err,
        DistributionError::Roster(RosterError::QuotaMismatch { expected: 4, found: 5, .. })
    ));
}

#[test]
fn balanced_evens_out_an_easy_pool() {
    let quotas = quotas(&[(Position::Forward, 4)]);
    let mut roster = Roster::new();
    for (name, skill) in [("Ana", 5), ("Beto", 5), ("Caro", 1), ("Dani", 1)] {
        roster.add(Participant::new(name, Position::Forward, skill)).unwrap();
    }

    let (one, two) = Distributor::new(Strategy::Balanced, 3).distribute(&mut roster, &quotas).unwrap();
    assert_eq!(one.total_skill(), 6);
    assert_eq!(two.total_skill(), 6);
}

#[test]
fn verify_split_catches_a_split_anchorage() {
    let quotas = quotas(&[(Position::Forward, 4)]);
    let mut roster = roster_for(&quotas);
    let teams = distribute(&mut roster, &quotas, Strategy::Random, &mut seeded(8)).unwrap();

    let one = teams.0.iter().next().unwrap().name().to_string();
    let two = teams.1.iter().next().unwrap().name().to_string();
    for name in [&one, &two] {
        let slot = roster.locate(name).unwrap();
        roster.get_mut(slot).unwrap().anchorage = AnchorageId::new(1);
    }

    assert!(matches!(
        verify_split(&roster, &teams, &quotas),
        Err(DistributionError::Unbalanced(_))
    ));
}

#[test]
fn strategy_parses_names() {
    assert_eq!("random".parse::<Strategy>(), Ok(Strategy::Random));
    assert_eq!(" Balanced ".parse::<Strategy>(), Ok(Strategy::Balanced));
    assert_eq!("skill".parse::<Strategy>(), Ok(Strategy::Balanced));
    assert!("fair".parse::<Strategy>().is_err());
    assert_eq!(Strategy::default(), Strategy::Random);
}

fn per_team_counts() -> impl proptest::strategy::Strategy<Value = Vec<usize>> {
    prop::collection::vec(0usize..=3, Position::COUNT)
        .prop_filter("pool must not be empty", |counts| counts.iter().sum::<usize>() > 0)
}

fn anchorage_requests() -> impl proptest::strategy::Strategy<Value = Vec<Vec<usize>>> {
    prop::collection::vec(prop::collection::vec(0usize..64, 2..=4), 0..4)
}

/// Builds a roster for the generated quotas and anchors whatever requests
/// the session accepts, dropping them all if they cannot be placed together.
fn setup(counts: &[usize], requests: &[Vec<usize>]) -> (PositionQuotas, Roster) {
    let quotas =
        PositionQuotas::per_team(Position::ALL.into_iter().zip(counts.iter().copied()));
    let per_team = quotas.players_per_team();
    let mut roster = roster_for(&quotas);
    let names: Vec<String> = roster.iter().map(|p| p.name().to_string()).collect();

    {
        let mut session =
            begin_anchoring(&mut roster, &quotas, limits(per_team.max(2), 2 * per_team)).unwrap();
        for request in requests {
            let picked = request.iter().map(|&i| names[i % names.len()].as_str());
            let _ = session.create(picked);
        }
        if session.can_finish() && session.finish().is_err() {
            session.clear_all();
        }
    }

    (quotas, roster)
}

/// Every roster reaching this check passed `finish`, so the split must succeed.
fn check_outcome(
    roster: &Roster,
    quotas: &PositionQuotas,
    outcome: &Result<(Team, Team), DistributionError>,
) -> Result<(), TestCaseError> {
    let (one, two) = match outcome {
        Ok(teams) => teams,
        Err(err) => {
            return Err(TestCaseError::fail(format!("accepted anchorages failed to split: {}", err)))
        }
    };

    for position in Position::ALL {
        prop_assert_eq!(one.count_at(position), quotas.half(position));
        prop_assert_eq!(two.count_at(position), quotas.half(position));
    }
    prop_assert_eq!(one.total_count() + two.total_count(), quotas.pool_size());
    for participant in roster.iter() {
        let on_one = one.contains(participant.name());
        let on_two = two.contains(participant.name());
        prop_assert!(on_one != on_two, "{} on both or neither", participant.name());
    }
    for members in roster.anchorage_groups().into_values() {
        let team = roster.get(members[0]).and_then(|p| p.team);
        prop_assert!(team.is_some());
        for slot in members {
            prop_assert_eq!(roster.get(slot).and_then(|p| p.team), team);
        }
    }
    Ok(())
}

proptest! {
    #[test]
    fn random_split_keeps_invariants(
        counts in per_team_counts(),
        requests in anchorage_requests(),
        seed in any::<u64>(),
    ) {
        let (quotas, mut roster) = setup(&counts, &requests);
        let outcome = distribute(&mut roster, &quotas, Strategy::Random, &mut seeded(seed));
        check_outcome(&roster, &quotas, &outcome)?;
    }

    #[test]
    fn balanced_split_keeps_invariants(
        counts in per_team_counts(),
        requests in anchorage_requests(),
        seed in any::<u64>(),
    ) {
        let (quotas, mut roster) = setup(&counts, &requests);
        let outcome = Distributor::new(Strategy::Balanced, seed)
            .with_restarts(3)
            .distribute(&mut roster, &quotas);
        check_outcome(&roster, &quotas, &outcome)?;
    }

    #[test]
    fn balanced_never_worse_than_random_with_same_seed(
        counts in per_team_counts(),
        seed in any::<u64>(),
    ) {
        let (quotas, roster) = setup(&counts, &[]);
        let gap = |strategy| {
            let mut roster = roster.clone();
            let (one, two) = Distributor::new(strategy, seed).distribute(&mut roster, &quotas).unwrap();
            one.total_skill().abs_diff(two.total_skill())
        };
        prop_assert!(gap(Strategy::Balanced) <= gap(Strategy::Random));
    }

    #[test]
    fn anchorage_ids_stay_dense(
        counts in per_team_counts(),
        requests in anchorage_requests(),
        deletions in prop::collection::vec(0u32..5, 0..4),
    ) {
        let (quotas, mut roster) = setup(&counts, &requests);
        let per_team = quotas.players_per_team();
        let mut session =
            begin_anchoring(&mut roster, &quotas, limits(per_team.max(2), 2 * per_team)).unwrap();

        for id in deletions {
            let anchored_before = session.total_anchored_count();
            if let Some(id) = AnchorageId::new(id) {
                if let Ok(released) = session.delete(id) {
                    prop_assert_eq!(session.total_anchored_count(), anchored_before - released);
                }
            }
            let ids: Vec<u32> = session.anchorages().iter().map(|a| a.id.get()).collect();
            let expected: Vec<u32> = (1..=session.anchorage_count() as u32).collect();
            prop_assert_eq!(ids, expected);
        }
    }
}
