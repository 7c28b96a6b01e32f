use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::BoardGraph;
use crate::connectivity::SearchLimits;
use crate::deck::DeckConfig;
use crate::types::{Color, TrackColor};

pub const MIN_PLAYERS: u8 = 2;
pub const MAX_PLAYERS: u8 = 5;

/// How many routes of a parallel set may be claimed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParallelPolicy {
    /// Only one route of each parallel set may ever be claimed (2-3 players).
    SingleClaim,
    /// Every route may be claimed, but never two of a set by the same player (4+ players).
    DistinctOwners,
    /// No restriction at all.
    Unrestricted,
}

/// Points awarded per claimed route, indexed by route length (entry 0 is length 1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoringTable(Vec<u32>);

impl Default for ScoringTable {
    fn default() -> Self {
        Self(vec![1, 2, 4, 7, 10, 15, 18, 21])
    }
}

impl ScoringTable {
    pub fn new(points: Vec<u32>) -> Result<Self, ConfigError> {
        let t = Self(points);
        t.validate()?;
        Ok(t)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.0.is_empty() {
            return Err(ConfigError::EmptyScoringTable);
        }
        if self.0.windows(2).any(|w| w[1] < w[0]) {
            return Err(ConfigError::NonMonotonicScoringTable);
        }
        Ok(())
    }

    /// Longest route length with its own table entry.
    #[inline]
    pub fn max_length(&self) -> u32 {
        u32::try_from(self.0.len()).unwrap_or(u32::MAX)
    }

    /// Points for a route of `length`. Lengths past the table saturate to the last entry.
    #[inline]
    pub fn points_for(&self, length: u32) -> u32 {
        if length == 0 {
            return 0;
        }
        let idx = usize::try_from(length - 1)
            .unwrap_or(usize::MAX)
            .min(self.0.len().saturating_sub(1));
        self.0.get(idx).copied().unwrap_or(0)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("player count {0} is outside 2..=5")]
    PlayerCount(u8),

    #[error("scoring table is empty")]
    EmptyScoringTable,

    #[error("scoring table must be non-decreasing")]
    NonMonotonicScoringTable,

    #[error("scoring table covers lengths up to {table}, but the board has a route of length {route}")]
    ScoringTableTooShort { table: u32, route: u32 },

    #[error("deck must contain at least one card")]
    EmptyDeck,

    #[error("deck size does not fit in a 32-bit count")]
    DeckTooLarge,

    #[error("deck lists {0} more than once")]
    DuplicateDeckColor(Color),

    #[error("board has {0} track but the deck has no {0} cards")]
    TrackColorNotInDeck(Color),

    #[error("failed to decode rules JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Rule variant for one game session. Immutable once the session starts.
///
/// Omitted fields decode to the defaults for the decoded player count, so a
/// four-player file without `parallel` gets `DistinctOwners`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RulesFile")]
pub struct Rules {
    pub players: u8,
    pub parallel: ParallelPolicy,
    pub scoring: ScoringTable,
    /// Trains each player starts with; every unit of claimed length uses one.
    pub initial_trains: u32,
    /// Below this many trains the final round begins.
    pub minimum_trains: u32,
    /// Bonus for the longest continuous trail (shared on ties).
    pub longest_path_bonus: u32,
    /// Cards dealt to each player before the first turn.
    pub initial_hand_size: u32,
    /// Cards laid face up to choose from.
    pub faceup_cards: u32,
    pub deck: DeckConfig,
    pub search: SearchLimits,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            players: 2,
            parallel: ParallelPolicy::SingleClaim,
            scoring: ScoringTable::default(),
            initial_trains: 45,
            minimum_trains: 3,
            longest_path_bonus: 10,
            initial_hand_size: 4,
            faceup_cards: 5,
            deck: DeckConfig::default(),
            search: SearchLimits::default(),
        }
    }
}

impl Rules {
    /// Standard rules for `players`; parallel routes open up from four players on.
    pub fn for_players(players: u8) -> Result<Self, ConfigError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&players) {
            return Err(ConfigError::PlayerCount(players));
        }
        let parallel = if players <= 3 {
            ParallelPolicy::SingleClaim
        } else {
            ParallelPolicy::DistinctOwners
        };
        Ok(Self {
            players,
            parallel,
            ..Self::default()
        })
    }

    #[inline]
    pub fn with_parallel(mut self, parallel: ParallelPolicy) -> Self {
        self.parallel = parallel;
        self
    }

    /// Decode a rules override; omitted fields keep the defaults for its player count.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Self::from_json_for(s, None)
    }

    /// Like [`Rules::from_json_str`], but `players`, when given, replaces the
    /// file's player count before any defaults are chosen.
    pub fn from_json_for(s: &str, players: Option<u8>) -> Result<Self, ConfigError> {
        let mut file: RulesFile = serde_json::from_str(s)?;
        if players.is_some() {
            file.players = players;
        }
        Rules::try_from(file)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&self.players) {
            return Err(ConfigError::PlayerCount(self.players));
        }
        self.scoring.validate()?;
        if let Some(color) = self.deck.duplicate_color() {
            return Err(ConfigError::DuplicateDeckColor(color));
        }
        match self.deck.total() {
            None => Err(ConfigError::DeckTooLarge),
            Some(0) => Err(ConfigError::EmptyDeck),
            Some(_) => Ok(()),
        }
    }

    /// Check this variant can score every route on `board`.
    pub fn validate_for(&self, board: &BoardGraph) -> Result<(), ConfigError> {
        self.validate()?;
        let longest = board.max_route_length();
        if longest > self.scoring.max_length() {
            return Err(ConfigError::ScoringTableTooShort {
                table: self.scoring.max_length(),
                route: longest,
            });
        }
        let missing = board.routes().find_map(|r| match r.color {
            TrackColor::Fixed(c) if !self.deck.has_color(c) => Some(c),
            _ => None,
        });
        match missing {
            Some(c) => Err(ConfigError::TrackColorNotInDeck(c)),
            None => Ok(()),
        }
    }

    #[inline]
    pub fn length_to_points(&self, length: u32) -> u32 {
        self.scoring.points_for(length)
    }
}

/// Wire form of [`Rules`]: every field optional.
#[derive(Debug, Default, Deserialize)]
struct RulesFile {
    players: Option<u8>,
    parallel: Option<ParallelPolicy>,
    scoring: Option<ScoringTable>,
    initial_trains: Option<u32>,
    minimum_trains: Option<u32>,
    longest_path_bonus: Option<u32>,
    initial_hand_size: Option<u32>,
    faceup_cards: Option<u32>,
    deck: Option<DeckConfig>,
    search: Option<SearchLimits>,
}

impl TryFrom<RulesFile> for Rules {
    type Error = ConfigError;

    fn try_from(f: RulesFile) -> Result<Self, Self::Error> {
        let base = Rules::for_players(f.players.unwrap_or(MIN_PLAYERS))?;
        let rules = Rules {
            players: base.players,
            parallel: f.parallel.unwrap_or(base.parallel),
            scoring: f.scoring.unwrap_or(base.scoring),
            initial_trains: f.initial_trains.unwrap_or(base.initial_trains),
            minimum_trains: f.minimum_trains.unwrap_or(base.minimum_trains),
            longest_path_bonus: f.longest_path_bonus.unwrap_or(base.longest_path_bonus),
            initial_hand_size: f.initial_hand_size.unwrap_or(base.initial_hand_size),
            faceup_cards: f.faceup_cards.unwrap_or(base.faceup_cards),
            deck: f.deck.unwrap_or(base.deck),
            search: f.search.unwrap_or(base.search),
        };
        rules.validate()?;
        Ok(rules)
    }
}
