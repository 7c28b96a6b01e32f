use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::{debug, info};
use rand::Rng;

use crate::board::BoardGraph;
use crate::connectivity::{is_connected, longest_path_with_limits, LongestPath};
use crate::deck::{Deck, OutOfCards};
use crate::destinations::Destination;
use crate::engine::claim::{attempt_claim, ClaimRequest, ClaimResult};
use crate::engine::score::{final_scores, ScoreCard};
use crate::ledger::{ClaimLedger, Hand};
use crate::rules::{ConfigError, Rules};
use crate::types::{Card, CityId, PlayerId, RouteId};

/// Everything a claim or a draw may change, kept under one lock.
#[derive(Debug, Clone)]
struct Table {
    ledger: ClaimLedger,
    deck: Deck,
    faceup: Vec<Card>,
}

/// One running game: a shared read-only board, fixed rules, the only
/// ledger for this game and its draw pile.
///
/// Claims and draws take the write lock; scoring queries take the read lock,
/// so a traversal never observes a claim half-way.
#[derive(Debug)]
pub struct GameSession {
    board: Arc<BoardGraph>,
    rules: Rules,
    table: RwLock<Table>,
}

impl GameSession {
    pub fn new(board: Arc<BoardGraph>, rules: Rules) -> Result<Self, ConfigError> {
        rules.validate_for(&board)?;
        let ledger = ClaimLedger::new(board.route_count(), rules.players, rules.initial_trains);
        let deck = Deck::from_config(&rules.deck);
        info!(
            "new session: {} players, {:?} parallel routes, {} routes on board",
            rules.players,
            rules.parallel,
            board.route_count()
        );
        Ok(Self {
            board,
            rules,
            table: RwLock::new(Table {
                ledger,
                deck,
                faceup: Vec::new(),
            }),
        })
    }

    #[inline]
    pub fn board(&self) -> &Arc<BoardGraph> {
        &self.board
    }

    #[inline]
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    // A panic while holding the lock cannot leave a half-applied claim behind,
    // because the table is only written after every rule has passed.
    fn read(&self) -> RwLockReadGuard<'_, Table> {
        self.table.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Table> {
        self.table.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Serialized claim entry point. Spent cards go back to the deck.
    pub fn attempt_claim(&self, req: &ClaimRequest) -> ClaimResult {
        let mut table = self.write();
        let res = attempt_claim(&self.board, &self.rules, &mut table.ledger, req);
        if let ClaimResult::Accepted(a) = &res {
            table.deck.discard(a.spent.iter().copied());
        }
        res
    }

    /// Deal cards to a player directly, bypassing the deck.
    pub fn give(&self, player: PlayerId, card: Card, n: u32) -> bool {
        self.write().ledger.give(player, card, n)
    }

    /// Deal every starting hand and lay out the face-up cards.
    ///
    /// All or nothing: if the deck cannot cover the whole opening, nothing is dealt.
    pub fn deal_opening<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<Card>, OutOfCards> {
        let mut table = self.write();
        let mut deck = table.deck.clone();
        let mut hands = Vec::with_capacity(table.ledger.player_count());
        for _ in table.ledger.players() {
            hands.push(deck.draw_many(rng, self.rules.initial_hand_size)?);
        }
        let faceup = deck.draw_many(rng, self.rules.faceup_cards)?;

        for (player, hand) in table.ledger.players().zip(hands).collect::<Vec<_>>() {
            for card in hand {
                table.ledger.give(player, card, 1);
            }
        }
        debug!("opening dealt; {:?} cards left in the deck", deck.remaining());
        table.deck = deck;
        table.faceup.clone_from(&faceup);
        Ok(faceup)
    }

    /// Draw the top card of the deck into `player`'s hand.
    pub fn draw_blind<R: Rng + ?Sized>(&self, player: PlayerId, rng: &mut R) -> Option<Card> {
        let mut table = self.write();
        if !table.ledger.has_player(player) {
            return None;
        }
        let card = table.deck.draw(rng)?;
        table.ledger.give(player, card, 1);
        Some(card)
    }

    /// Take the face-up card at `index` and refill its slot from the deck.
    /// The row shrinks when the deck is exhausted.
    pub fn take_faceup<R: Rng + ?Sized>(&self, player: PlayerId, index: usize, rng: &mut R) -> Option<Card> {
        let mut table = self.write();
        if !table.ledger.has_player(player) || index >= table.faceup.len() {
            return None;
        }
        let refill = table.deck.draw(rng);
        let card = match refill {
            Some(refill) => std::mem::replace(&mut table.faceup[index], refill),
            None => table.faceup.remove(index),
        };
        table.ledger.give(player, card, 1);
        Some(card)
    }

    pub fn faceup(&self) -> Vec<Card> {
        self.read().faceup.clone()
    }

    /// Cards left in the deck; None for a deck that never runs out.
    pub fn deck_remaining(&self) -> Option<u64> {
        self.read().deck.remaining()
    }

    /// Copy of the ledger for lock-free inspection.
    pub fn snapshot(&self) -> ClaimLedger {
        self.read().ledger.clone()
    }

    pub fn hand(&self, player: PlayerId) -> Option<Hand> {
        self.read().ledger.hand(player).cloned()
    }

    pub fn owner_of(&self, route: RouteId) -> Option<PlayerId> {
        self.read().ledger.owner_of(route)
    }

    pub fn longest_path(&self, player: PlayerId) -> LongestPath {
        let table = self.read();
        longest_path_with_limits(&self.board, &table.ledger, player, self.rules.search)
    }

    pub fn is_connected(&self, player: PlayerId, a: CityId, b: CityId) -> bool {
        let table = self.read();
        is_connected(&self.board, &table.ledger, player, a, b)
    }

    /// True once `player` is below the train minimum and the last round starts.
    pub fn final_round_triggered(&self, player: PlayerId) -> bool {
        self.read()
            .ledger
            .trains_left(player)
            .is_some_and(|t| t < self.rules.minimum_trains)
    }

    pub fn final_scores(&self, goals: &[Vec<Destination>]) -> Vec<ScoreCard> {
        let table = self.read();
        final_scores(&self.board, &self.rules, &table.ledger, goals)
    }
}
