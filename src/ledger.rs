use crate::types::{Card, Color, PlayerId, RouteId};

/// Card counts held by one player.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Hand {
    colors: [u32; Color::COUNT],
    wilds: u32,
}

impl Hand {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tally a sequence of cards.
    pub fn from_cards(cards: &[Card]) -> Self {
        let mut h = Self::default();
        for &c in cards {
            h.add(c, 1);
        }
        h
    }

    #[inline]
    pub fn count(&self, card: Card) -> u32 {
        match card {
            Card::Train(c) => self.colors[c.index()],
            Card::Locomotive => self.wilds,
        }
    }

    #[inline]
    pub fn colored(&self, color: Color) -> u32 {
        self.colors[color.index()]
    }

    #[inline]
    pub fn wilds(&self) -> u32 {
        self.wilds
    }

    /// Number of cards held, saturating at `u32::MAX`.
    #[inline]
    pub fn total(&self) -> u32 {
        self.colors
            .iter()
            .fold(self.wilds, |acc, &n| acc.saturating_add(n))
    }

    #[inline]
    pub fn add(&mut self, card: Card, n: u32) {
        match card {
            Card::Train(c) => {
                let slot = &mut self.colors[c.index()];
                *slot = slot.saturating_add(n);
            }
            Card::Locomotive => self.wilds = self.wilds.saturating_add(n),
        }
    }

    /// True if every count in `other` is covered by this hand.
    pub fn covers(&self, other: &Hand) -> bool {
        self.wilds >= other.wilds
            && self
                .colors
                .iter()
                .zip(other.colors.iter())
                .all(|(have, need)| have >= need)
    }

    /// Remove `other`. Callers check `covers` first.
    fn subtract(&mut self, other: &Hand) {
        for (have, need) in self.colors.iter_mut().zip(other.colors.iter()) {
            *have -= need;
        }
        self.wilds -= other.wilds;
    }
}

/// Per-game mutable state: who owns which route, and what each player holds.
///
/// Ownership only changes through the claim engine, and never reverts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClaimLedger {
    owner_of: Vec<Option<PlayerId>>,
    hands: Vec<Hand>,
    trains: Vec<u32>,
}

impl ClaimLedger {
    pub fn new(route_count: usize, players: u8, initial_trains: u32) -> Self {
        Self {
            owner_of: vec![None; route_count],
            hands: vec![Hand::default(); players as usize],
            trains: vec![initial_trains; players as usize],
        }
    }

    #[inline]
    pub fn route_count(&self) -> usize {
        self.owner_of.len()
    }

    #[inline]
    pub fn player_count(&self) -> usize {
        self.hands.len()
    }

    #[inline]
    pub fn has_player(&self, player: PlayerId) -> bool {
        (player as usize) < self.hands.len()
    }

    #[inline]
    pub fn owner_of(&self, route: RouteId) -> Option<PlayerId> {
        self.owner_of.get(route as usize).copied().flatten()
    }

    #[inline]
    pub fn is_claimed(&self, route: RouteId) -> bool {
        self.owner_of(route).is_some()
    }

    #[inline]
    pub fn hand(&self, player: PlayerId) -> Option<&Hand> {
        self.hands.get(player as usize)
    }

    #[inline]
    pub fn trains_left(&self, player: PlayerId) -> Option<u32> {
        self.trains.get(player as usize).copied()
    }

    /// Player ids in seat order.
    pub fn players(&self) -> impl Iterator<Item = PlayerId> {
        (0..self.hands.len()).filter_map(|p| PlayerId::try_from(p).ok())
    }

    /// Hand `n` copies of `card` to `player`. Counts saturate rather than wrap.
    /// Returns false for an unknown player.
    pub fn give(&mut self, player: PlayerId, card: Card, n: u32) -> bool {
        match self.hands.get_mut(player as usize) {
            Some(h) => {
                h.add(card, n);
                true
            }
            None => false,
        }
    }

    /// Routes owned by `player`, in id order.
    pub fn owned_routes(&self, player: PlayerId) -> impl Iterator<Item = RouteId> + '_ {
        self.owner_of
            .iter()
            .enumerate()
            .filter(move |(_, o)| **o == Some(player))
            .filter_map(|(id, _)| RouteId::try_from(id).ok())
    }

    pub fn claimed_count(&self) -> usize {
        self.owner_of.iter().filter(|o| o.is_some()).count()
    }

    /// Apply an accepted claim. The engine has already checked every precondition.
    pub(crate) fn record_claim(&mut self, route: RouteId, player: PlayerId, spent: &Hand, trains: u32) {
        let p = player as usize;
        self.hands[p].subtract(spent);
        self.trains[p] -= trains;
        self.owner_of[route as usize] = Some(player);
    }
}
