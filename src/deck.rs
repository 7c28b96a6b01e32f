use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Card, Color};

/// How cards leave and return to the draw pile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeckKind {
    /// Draws with replacement, weighted by the configured counts. Discards vanish.
    Uniform,
    /// A real pile: a drawn card is gone until it is discarded back.
    #[default]
    Finite,
}

/// Composition of the train-card deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckConfig {
    #[serde(rename = "type")]
    pub kind: DeckKind,
    /// Colors in the deck. Fixed-color tracks on the board must use one of these.
    pub colors: Vec<Color>,
    pub cards_per_color: u32,
    pub locomotives: u32,
}

impl Default for DeckConfig {
    fn default() -> Self {
        // 8 colors x 12 + 14 locomotives = 110 cards
        Self {
            kind: DeckKind::Finite,
            colors: Color::all().to_vec(),
            cards_per_color: 12,
            locomotives: 14,
        }
    }
}

impl DeckConfig {
    /// Colored cards plus locomotives, or None if that does not fit in a `u32`.
    pub fn total(&self) -> Option<u32> {
        let colors = u32::try_from(self.colors.len()).ok()?;
        self.cards_per_color
            .checked_mul(colors)?
            .checked_add(self.locomotives)
    }

    /// First color listed twice, if any.
    pub fn duplicate_color(&self) -> Option<Color> {
        let mut seen = [false; Color::COUNT];
        self.colors.iter().copied().find(|c| {
            let dup = seen[c.index()];
            seen[c.index()] = true;
            dup
        })
    }

    #[inline]
    pub fn has_color(&self, color: Color) -> bool {
        self.colors.contains(&color)
    }
}

/// Draw one card with replacement. Returns a locomotive if the deck is configured empty.
pub fn draw_card<R: Rng + ?Sized>(rng: &mut R, deck: &DeckConfig) -> Card {
    let total = match deck.total() {
        Some(t) if t > 0 => t,
        _ => return Card::Locomotive,
    };
    let pick = rng.gen_range(0..total);
    if pick < deck.locomotives {
        return Card::Locomotive;
    }
    let idx = (pick - deck.locomotives) / deck.cards_per_color.max(1);
    usize::try_from(idx)
        .ok()
        .and_then(|i| deck.colors.get(i))
        .map_or(Card::Locomotive, |&c| Card::Train(c))
}

/// The three cards turned over when a player tries to build a tunnel.
pub fn reveal_tunnel<R: Rng + ?Sized>(rng: &mut R, deck: &DeckConfig) -> [Card; 3] {
    [
        draw_card(rng, deck),
        draw_card(rng, deck),
        draw_card(rng, deck),
    ]
}

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("deck ran out of cards: needed {needed}, {available} left")]
pub struct OutOfCards {
    pub needed: u64,
    pub available: u64,
}

// Slot 0..COUNT are colors by index, the last slot is locomotives.
const LOCO_SLOT: usize = Color::COUNT;

/// Finite draw pile kept as per-card counts. Draws are uniform over the
/// remaining cards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FiniteDeck {
    counts: [u64; Color::COUNT + 1],
    remaining: u64,
}

impl FiniteDeck {
    pub fn new(config: &DeckConfig) -> Self {
        let mut deck = Self::default();
        for &c in &config.colors {
            deck.discard_n(Card::Train(c), u64::from(config.cards_per_color));
        }
        deck.discard_n(Card::Locomotive, u64::from(config.locomotives));
        deck
    }

    #[inline]
    fn slot(card: Card) -> usize {
        match card {
            Card::Train(c) => c.index(),
            Card::Locomotive => LOCO_SLOT,
        }
    }

    #[inline]
    fn card_at(slot: usize) -> Card {
        Color::all()
            .get(slot)
            .map_or(Card::Locomotive, |&c| Card::Train(c))
    }

    #[inline]
    pub fn len(&self) -> u64 {
        self.remaining
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.remaining == 0
    }

    #[inline]
    pub fn count(&self, card: Card) -> u64 {
        self.counts[Self::slot(card)]
    }

    /// Remove one random card; None once the pile is empty.
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Card> {
        if self.remaining == 0 {
            return None;
        }
        let mut pick = rng.gen_range(0..self.remaining);
        for (slot, n) in self.counts.iter_mut().enumerate() {
            if pick < *n {
                *n -= 1;
                self.remaining -= 1;
                return Some(Self::card_at(slot));
            }
            pick -= *n;
        }
        None
    }

    /// Draw `n` cards, or none at all if fewer remain.
    pub fn draw_many<R: Rng + ?Sized>(&mut self, rng: &mut R, n: u32) -> Result<Vec<Card>, OutOfCards> {
        let needed = u64::from(n);
        if needed > self.remaining {
            return Err(OutOfCards {
                needed,
                available: self.remaining,
            });
        }
        Ok((0..n).filter_map(|_| self.draw(rng)).collect())
    }

    #[inline]
    pub fn discard(&mut self, card: Card) {
        self.discard_n(card, 1);
    }

    fn discard_n(&mut self, card: Card, n: u64) {
        let slot = &mut self.counts[Self::slot(card)];
        *slot = slot.saturating_add(n);
        self.remaining = self.remaining.saturating_add(n);
    }
}

/// A draw pile built from a [`DeckConfig`], either kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deck {
    Uniform(DeckConfig),
    Finite(FiniteDeck),
}

impl Deck {
    pub fn from_config(config: &DeckConfig) -> Self {
        match config.kind {
            DeckKind::Uniform => Deck::Uniform(config.clone()),
            DeckKind::Finite => Deck::Finite(FiniteDeck::new(config)),
        }
    }

    /// Cards left to draw; None for a uniform deck, which never runs out.
    #[inline]
    pub fn remaining(&self) -> Option<u64> {
        match self {
            Deck::Uniform(_) => None,
            Deck::Finite(f) => Some(f.len()),
        }
    }

    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Card> {
        match self {
            Deck::Uniform(config) => match config.total() {
                Some(t) if t > 0 => Some(draw_card(rng, config)),
                _ => None,
            },
            Deck::Finite(f) => f.draw(rng),
        }
    }

    pub fn draw_many<R: Rng + ?Sized>(&mut self, rng: &mut R, n: u32) -> Result<Vec<Card>, OutOfCards> {
        if let Deck::Finite(f) = self {
            return f.draw_many(rng, n);
        }
        (0..n)
            .map(|_| {
                self.draw(rng).ok_or(OutOfCards {
                    needed: u64::from(n),
                    available: 0,
                })
            })
            .collect()
    }

    /// Return spent cards to the pile. A uniform deck drops them.
    pub fn discard<I: IntoIterator<Item = Card>>(&mut self, cards: I) {
        if let Deck::Finite(f) = self {
            for card in cards {
                f.discard(card);
            }
        }
    }
}
