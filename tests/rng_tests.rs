use std::collections::HashMap;

use rand::Rng;
use conductor::{
    draw_card, reveal_tunnel, rng_for_game, Card, Color, Deck, DeckConfig, DeckKind, FiniteDeck,
    OutOfCards,
};

fn sample(seq_len: usize, seed: u64, game_id: u64, turn: u32) -> Vec<u64> {
    let mut rng = rng_for_game(seed, game_id, turn);
    (0..seq_len).map(|_| rng.gen::<u64>()).collect()
}

#[test]
fn rng_stability_same_triple() {
    let a = sample(16, 0xDEAD_BEEFu64, 0xCAFE_BABEu64, 7);
    let b = sample(16, 0xDEAD_BEEFu64, 0xCAFE_BABEu64, 7);
    assert_eq!(a, b, "rng_for_game must produce stable sequences for identical (seed, game_id, turn)");
}

#[test]
fn rng_diff_for_different_triples() {
    let base_seed: u64 = 0x00C0_FFEEu64;
    let s1 = sample(16, base_seed, 1001, 3);
    let s2 = sample(16, base_seed, 1001, 4);
    let s3 = sample(16, base_seed.wrapping_add(1), 1001, 3);
    let s4 = sample(16, base_seed, 1002, 3);
    assert_ne!(s1, s2, "changing turn should alter sequence");
    assert_ne!(s1, s3, "changing seed should alter sequence");
    assert_ne!(s1, s4, "changing game_id should alter sequence");
}

#[test]
fn tunnel_reveal_replays() {
    let deck = DeckConfig::default();
    let a = reveal_tunnel(&mut rng_for_game(5, 6, 7), &deck);
    let b = reveal_tunnel(&mut rng_for_game(5, 6, 7), &deck);
    assert_eq!(a, b);
}

#[test]
fn default_deck_draws_follow_weights() {
    let deck = DeckConfig::default();
    assert_eq!(deck.total(), Some(110));

    let mut rng = rng_for_game(11, 0, 0);
    let n = 110_000;
    let mut counts: HashMap<Card, u32> = HashMap::new();
    for _ in 0..n {
        *counts.entry(draw_card(&mut rng, &deck)).or_default() += 1;
    }
    assert_eq!(counts.len(), 9, "every color and the locomotive appear");
    // expected 14_000 locomotives and 12_000 of each color
    let locos = counts[&Card::Locomotive];
    assert!((13_000..15_000).contains(&locos), "locomotives drawn: {locos}");
    for (card, &c) in &counts {
        if !card.is_wild() {
            assert!((11_000..13_000).contains(&c), "{card} drawn {c} times");
        }
    }
}

#[test]
fn locomotive_only_deck() {
    let deck = DeckConfig {
        cards_per_color: 0,
        locomotives: 3,
        ..DeckConfig::default()
    };
    let mut rng = rng_for_game(1, 2, 3);
    assert!((0..100).all(|_| draw_card(&mut rng, &deck) == Card::Locomotive));
}

#[test]
fn deck_total_reports_overflow() {
    let deck = DeckConfig {
        cards_per_color: 600_000_000,
        ..DeckConfig::default()
    };
    assert_eq!(deck.total(), None);
    // a misconfigured deck still draws something
    assert_eq!(draw_card(&mut rng_for_game(0, 0, 0), &deck), Card::Locomotive);
}

#[test]
fn configured_colors_limit_draws() {
    let deck = DeckConfig {
        kind: DeckKind::Uniform,
        colors: vec![Color::Red, Color::Blue],
        cards_per_color: 5,
        locomotives: 0,
    };
    assert_eq!(deck.total(), Some(10));
    let mut rng = rng_for_game(3, 3, 3);
    for _ in 0..500 {
        let card = draw_card(&mut rng, &deck);
        assert!(matches!(card, Card::Train(Color::Red | Color::Blue)), "drew {card}");
    }
}

#[test]
fn finite_deck_runs_dry_and_refills_from_discards() {
    let config = DeckConfig::default();
    let mut deck = FiniteDeck::new(&config);
    assert_eq!(deck.len(), 110);
    assert_eq!(deck.count(Card::Locomotive), 14);
    assert_eq!(deck.count(Card::Train(Color::Pink)), 12);

    let mut rng = rng_for_game(9, 9, 9);
    let mut drawn = Vec::new();
    while let Some(card) = deck.draw(&mut rng) {
        drawn.push(card);
    }
    assert!(deck.is_empty());
    assert_eq!(drawn.len(), 110);
    assert_eq!(drawn.iter().filter(|c| c.is_wild()).count(), 14);
    for c in Color::all() {
        assert_eq!(drawn.iter().filter(|&&d| d == Card::Train(c)).count(), 12);
    }
    assert_eq!(deck.draw(&mut rng), None);

    deck.discard(Card::Train(Color::Green));
    assert_eq!(deck.len(), 1);
    assert_eq!(deck.draw(&mut rng), Some(Card::Train(Color::Green)));
}

#[test]
fn finite_draw_many_is_all_or_nothing() {
    let config = DeckConfig {
        colors: vec![Color::Black],
        cards_per_color: 2,
        locomotives: 1,
        ..DeckConfig::default()
    };
    let mut deck = FiniteDeck::new(&config);
    let mut rng = rng_for_game(1, 0, 0);
    assert_eq!(
        deck.draw_many(&mut rng, 4),
        Err(OutOfCards {
            needed: 4,
            available: 3
        })
    );
    assert_eq!(deck.len(), 3);
    assert_eq!(deck.draw_many(&mut rng, 3).map(|v| v.len()), Ok(3));
    assert!(deck.is_empty());
}

#[test]
fn deck_kind_selects_draw_behaviour() {
    let finite = DeckConfig::default();
    assert_eq!(finite.kind, DeckKind::Finite);
    let mut deck = Deck::from_config(&finite);
    assert_eq!(deck.remaining(), Some(110));
    let mut rng = rng_for_game(2, 2, 2);
    let hand = deck.draw_many(&mut rng, 10).unwrap();
    assert_eq!(deck.remaining(), Some(100));
    deck.discard(hand);
    assert_eq!(deck.remaining(), Some(110));

    let uniform = DeckConfig {
        kind: DeckKind::Uniform,
        ..DeckConfig::default()
    };
    let mut deck = Deck::from_config(&uniform);
    assert_eq!(deck.remaining(), None);
    assert_eq!(deck.draw_many(&mut rng, 500).unwrap().len(), 500);
    deck.discard([Card::Locomotive]);
    assert_eq!(deck.remaining(), None);
}

#[test]
fn finite_draws_replay_from_the_same_seed() {
    let draw = || {
        let mut deck = Deck::from_config(&DeckConfig::default());
        deck.draw_many(&mut rng_for_game(77, 1, 0), 20).unwrap()
    };
    assert_eq!(draw(), draw());
}
