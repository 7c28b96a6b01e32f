#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)] // may be revisited

pub mod types;
pub mod map;
pub mod board;
pub mod rules;
pub mod deck;
pub mod rng;
pub mod ledger;
pub mod connectivity;
pub mod destinations;
pub mod session;

pub mod engine {
    pub mod claim;
    pub mod score;
}

// Re-exports: stable minimal API surface for external callers
pub use crate::board::{BoardGraph, City, ImportError, ImportErrorKind, Route};
pub use crate::connectivity::{is_connected, longest_path, longest_path_with_limits, LongestPath, SearchLimits};
pub use crate::deck::{draw_card, reveal_tunnel, Deck, DeckConfig, DeckKind, FiniteDeck, OutOfCards};
pub use crate::destinations::{random_destination, shortest_distance, Destination};
pub use crate::engine::claim::{
    attempt_claim, evaluate_claim, open_routes, ClaimAccepted, ClaimRejection, ClaimRequest,
    ClaimResult, TunnelOutcome, TunnelResponse,
};
pub use crate::engine::score::{final_scores, route_points, ScoreCard};
pub use crate::ledger::{ClaimLedger, Hand};
pub use crate::map::{parse_map_json, MapData, MapParseError, RouteRecord};
pub use crate::rng::rng_for_game;
pub use crate::rules::{ConfigError, ParallelPolicy, Rules, ScoringTable};
pub use crate::session::GameSession;
pub use crate::types::{Card, CityId, Color, PlayerId, RouteId, TrackColor};
