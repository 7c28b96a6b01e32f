//! Property-based tests for the claim engine.
//!
//! Random claim sequences on the Europe map must never break route
//! uniqueness, parallel-route policy, or card and train conservation.

use std::fs;
use std::sync::OnceLock;

use proptest::prelude::*;

use conductor::{
    attempt_claim, longest_path, BoardGraph, Card, ClaimLedger, ClaimRequest, ClaimResult, Color,
    ParallelPolicy, Rules, TunnelResponse,
};

const CARDS_EACH: u32 = 20;
const PLAYERS: u8 = 4;

fn europe() -> &'static BoardGraph {
    static BOARD: OnceLock<BoardGraph> = OnceLock::new();
    BOARD.get_or_init(|| {
        let bytes = fs::read("data/europe.json").expect("failed to read europe.json");
        let map = conductor::parse_map_json(&bytes).expect("failed to parse europe.json");
        BoardGraph::build(&map).expect("europe map must import")
    })
}

fn card() -> impl Strategy<Value = Card> {
    prop_oneof![
        4 => (0..Color::COUNT).prop_map(|i| Card::Train(Color::all()[i])),
        1 => Just(Card::Locomotive),
    ]
}

/// A plausible-looking claim: mostly one color plus some locomotives.
fn claim_request() -> impl Strategy<Value = ClaimRequest> {
    (
        0u16..110,
        0u8..=PLAYERS,
        prop::option::weighted(0.9, 0..Color::COUNT),
        0usize..7,
        0usize..4,
        prop::option::of(([card(), card(), card()], prop::option::of(0usize..4))),
    )
        .prop_map(|(route, player, color, n_color, n_wild, tunnel)| {
            let color = color.map(|i| Color::all()[i]);
            let mut cards = vec![Card::Locomotive; n_wild];
            if let Some(c) = color {
                cards.extend(std::iter::repeat(Card::Train(c)).take(n_color));
            }
            let req = ClaimRequest::new(route, player, color, cards);
            match tunnel {
                None => req,
                Some((revealed, None)) => req.with_tunnel(revealed, TunnelResponse::Decline),
                Some((revealed, Some(extra))) => {
                    let pay = color.map_or(Card::Locomotive, Card::Train);
                    req.with_tunnel(revealed, TunnelResponse::Pay(vec![pay; extra]))
                }
            }
        })
}

fn policy() -> impl Strategy<Value = ParallelPolicy> {
    prop_oneof![
        Just(ParallelPolicy::SingleClaim),
        Just(ParallelPolicy::DistinctOwners),
        Just(ParallelPolicy::Unrestricted),
    ]
}

fn seeded_ledger(board: &BoardGraph, rules: &Rules) -> ClaimLedger {
    let mut ledger = ClaimLedger::new(board.route_count(), rules.players, rules.initial_trains);
    for p in 0..rules.players {
        for c in Color::all() {
            ledger.give(p, Card::Train(c), CARDS_EACH);
        }
        ledger.give(p, Card::Locomotive, CARDS_EACH);
    }
    ledger
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn claim_sequences_preserve_invariants(
        policy in policy(),
        requests in prop::collection::vec(claim_request(), 1..120),
    ) {
        let board = europe();
        let rules = Rules::for_players(PLAYERS).unwrap().with_parallel(policy);
        let mut ledger = seeded_ledger(board, &rules);
        let mut spent = vec![0u32; PLAYERS as usize];
        let full_hand = CARDS_EACH * (Color::COUNT as u32 + 1);

        for req in &requests {
            let before = ledger.clone();
            match attempt_claim(board, &rules, &mut ledger, req) {
                ClaimResult::Rejected(_) => prop_assert_eq!(&ledger, &before),
                ClaimResult::Accepted(a) => {
                    prop_assert_eq!(before.owner_of(a.route), None);
                    prop_assert_eq!(ledger.owner_of(a.route), Some(req.player));
                    prop_assert_eq!(ledger.claimed_count(), before.claimed_count() + 1);
                    let length = board.route_by_id(a.route).unwrap().length;
                    prop_assert_eq!(a.spent.len() as u32, length + a.surcharge);
                    let after = ledger.hand(req.player).unwrap().total();
                    prop_assert_eq!(after + a.spent.len() as u32, before.hand(req.player).unwrap().total());
                    spent[req.player as usize] += a.spent.len() as u32;
                }
            }
        }

        for p in 0..PLAYERS {
            prop_assert_eq!(ledger.hand(p).unwrap().total() + spent[p as usize], full_hand);

            let laid: u32 = ledger
                .owned_routes(p)
                .map(|r| board.route_by_id(r).unwrap().length)
                .sum();
            prop_assert_eq!(ledger.trains_left(p).unwrap() + laid, rules.initial_trains);
            prop_assert!(longest_path(board, &ledger, p) <= laid);
        }

        for set in board.parallel_sets() {
            let owners: Vec<_> = set.iter().filter_map(|&r| ledger.owner_of(r)).collect();
            match policy {
                ParallelPolicy::SingleClaim => prop_assert!(owners.len() <= 1),
                ParallelPolicy::DistinctOwners => {
                    let mut dedup = owners.clone();
                    dedup.sort_unstable();
                    dedup.dedup();
                    prop_assert_eq!(dedup.len(), owners.len());
                }
                ParallelPolicy::Unrestricted => {}
            }
        }
    }
}
