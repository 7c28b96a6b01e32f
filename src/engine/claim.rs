use std::fmt;

use log::debug;

use crate::board::{BoardGraph, Route};
use crate::ledger::{ClaimLedger, Hand};
use crate::rules::{ParallelPolicy, Rules};
use crate::types::{Card, Color, PlayerId, RouteId, TrackColor};

/// The player's answer to a tunnel reveal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TunnelResponse {
    Decline,
    /// Extra cards offered to cover the surcharge.
    Pay(Vec<Card>),
}

/// The three revealed cards plus the player's response, supplied by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TunnelOutcome {
    pub revealed: [Card; 3],
    pub response: TunnelResponse,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimRequest {
    pub route: RouteId,
    pub player: PlayerId,
    /// Color being paid. `None` means locomotives only.
    pub color: Option<Color>,
    pub cards: Vec<Card>,
    pub tunnel: Option<TunnelOutcome>,
}

impl ClaimRequest {
    pub fn new(route: RouteId, player: PlayerId, color: Option<Color>, cards: Vec<Card>) -> Self {
        Self {
            route,
            player,
            color,
            cards,
            tunnel: None,
        }
    }

    pub fn with_tunnel(mut self, revealed: [Card; 3], response: TunnelResponse) -> Self {
        self.tunnel = Some(TunnelOutcome { revealed, response });
        self
    }
}

/// Why a claim was refused. Each variant maps to exactly one rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimRejection {
    UnknownRoute,
    UnknownPlayer,
    AlreadyClaimed { owner: PlayerId },
    ParallelRouteUnavailable,
    SelfParallelForbidden,
    ColorMismatch { route: TrackColor, used: Option<Color> },
    InsufficientOrWrongCards { needed: u32, provided: u32 },
    TunnelRevealMissing,
    TunnelSurchargeDeclined { surcharge: u32 },
    InsufficientFerryWilds { needed: u32, provided: u32 },
    InsufficientHand,
    InsufficientTrains { needed: u32, left: u32 },
}

impl fmt::Display for ClaimRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClaimRejection::UnknownRoute => write!(f, "no such route"),
            ClaimRejection::UnknownPlayer => write!(f, "no such player"),
            ClaimRejection::AlreadyClaimed { owner } => {
                write!(f, "route is already claimed by player {owner}")
            }
            ClaimRejection::ParallelRouteUnavailable => {
                write!(f, "a parallel route between these cities is already claimed")
            }
            ClaimRejection::SelfParallelForbidden => {
                write!(f, "cannot claim two routes between the same cities")
            }
            ClaimRejection::ColorMismatch { route, used } => match used {
                Some(c) => write!(f, "cannot claim a {route} route with {c} cards"),
                None => write!(f, "a {route} route paid without a color needs only locomotives"),
            },
            ClaimRejection::InsufficientOrWrongCards { needed, provided } => {
                write!(f, "needs {needed} matching cards, got {provided}")
            }
            ClaimRejection::TunnelRevealMissing => write!(f, "tunnel claim needs a card reveal"),
            ClaimRejection::TunnelSurchargeDeclined { surcharge } => {
                write!(f, "declined tunnel surcharge of {surcharge}")
            }
            ClaimRejection::InsufficientFerryWilds { needed, provided } => {
                write!(f, "ferry needs {needed} locomotives, got {provided}")
            }
            ClaimRejection::InsufficientHand => write!(f, "player does not hold those cards"),
            ClaimRejection::InsufficientTrains { needed, left } => {
                write!(f, "needs {needed} trains, {left} left")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimAccepted {
    pub route: RouteId,
    pub player: PlayerId,
    pub points: u32,
    /// Every card deducted, including any tunnel surcharge.
    pub spent: Vec<Card>,
    pub surcharge: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimResult {
    Accepted(ClaimAccepted),
    Rejected(ClaimRejection),
}

impl ClaimResult {
    #[inline]
    pub fn accepted(&self) -> bool {
        matches!(self, ClaimResult::Accepted(_))
    }

    #[inline]
    pub fn points_awarded(&self) -> u32 {
        match self {
            ClaimResult::Accepted(a) => a.points,
            ClaimResult::Rejected(_) => 0,
        }
    }

    #[inline]
    pub fn rejection(&self) -> Option<&ClaimRejection> {
        match self {
            ClaimResult::Accepted(_) => None,
            ClaimResult::Rejected(r) => Some(r),
        }
    }
}

/// Ownership and parallel-set checks (unknown ids, rules 1-3).
fn check_availability(
    board: &BoardGraph,
    rules: &Rules,
    ledger: &ClaimLedger,
    route: RouteId,
    player: PlayerId,
) -> Result<(), ClaimRejection> {
    if board.route_by_id(route).is_none() || (route as usize) >= ledger.route_count() {
        return Err(ClaimRejection::UnknownRoute);
    }
    if !ledger.has_player(player) {
        return Err(ClaimRejection::UnknownPlayer);
    }
    if let Some(owner) = ledger.owner_of(route) {
        return Err(ClaimRejection::AlreadyClaimed { owner });
    }

    let mut siblings = board
        .parallel_set_of(route)
        .iter()
        .copied()
        .filter(|&id| id != route);
    match rules.parallel {
        ParallelPolicy::SingleClaim => {
            if siblings.any(|id| ledger.is_claimed(id)) {
                return Err(ClaimRejection::ParallelRouteUnavailable);
            }
        }
        ParallelPolicy::DistinctOwners => {
            if siblings.any(|id| ledger.owner_of(id) == Some(player)) {
                return Err(ClaimRejection::SelfParallelForbidden);
            }
        }
        ParallelPolicy::Unrestricted => {}
    }
    Ok(())
}

/// Card counts are tiny; saturate instead of truncating on absurd input.
#[inline]
fn count_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

#[inline]
fn card_fits(card: Card, color: Option<Color>) -> bool {
    card.is_wild() || (color.is_some() && card.color() == color)
}

/// Rule 6: returns the surcharge cards to add to the payment.
fn resolve_tunnel(
    route: &Route,
    paid: Option<Color>,
    tunnel: Option<&TunnelOutcome>,
) -> Result<Vec<Card>, ClaimRejection> {
    if !route.tunnel {
        return Ok(Vec::new());
    }
    let outcome = tunnel.ok_or(ClaimRejection::TunnelRevealMissing)?;
    let surcharge = count_u32(outcome.revealed.iter().filter(|&&c| card_fits(c, paid)).count());

    match &outcome.response {
        TunnelResponse::Decline if surcharge > 0 => {
            Err(ClaimRejection::TunnelSurchargeDeclined { surcharge })
        }
        TunnelResponse::Decline => Ok(Vec::new()),
        TunnelResponse::Pay(extra) => {
            let fitting = count_u32(extra.iter().filter(|&&c| card_fits(c, paid)).count());
            if count_u32(extra.len()) != surcharge || fitting != surcharge {
                return Err(ClaimRejection::InsufficientOrWrongCards {
                    needed: surcharge,
                    provided: fitting,
                });
            }
            Ok(extra.clone())
        }
    }
}

/// Run every rule against a read-only ledger. On success returns the route and
/// the full set of cards to deduct.
pub fn evaluate_claim<'b>(
    board: &'b BoardGraph,
    rules: &Rules,
    ledger: &ClaimLedger,
    req: &ClaimRequest,
) -> Result<(&'b Route, Vec<Card>), ClaimRejection> {
    check_availability(board, rules, ledger, req.route, req.player)?;
    let route = board
        .route_by_id(req.route)
        .ok_or(ClaimRejection::UnknownRoute)?;

    // Rule 4: color legality
    let all_wild = req.cards.iter().all(|c| c.is_wild());
    let color_ok = match (req.color, route.color) {
        _ if all_wild => true,
        (None, _) => false,
        (Some(_), TrackColor::Gray) => true,
        (Some(used), TrackColor::Fixed(fixed)) => used == fixed,
    };
    if !color_ok {
        return Err(ClaimRejection::ColorMismatch {
            route: route.color,
            used: req.color,
        });
    }

    // Rule 5: exact count, every card of the named color or wild
    let fitting = count_u32(req.cards.iter().filter(|&&c| card_fits(c, req.color)).count());
    if count_u32(req.cards.len()) != route.length || fitting != route.length {
        return Err(ClaimRejection::InsufficientOrWrongCards {
            needed: route.length,
            provided: fitting,
        });
    }

    // Rule 6: an all-locomotive payment only matches revealed locomotives
    let paid = if all_wild { None } else { req.color };
    let extra = resolve_tunnel(route, paid, req.tunnel.as_ref())?;
    let mut spent = req.cards.clone();
    spent.extend(extra);

    // Rule 7
    let wilds = count_u32(spent.iter().filter(|c| c.is_wild()).count());
    if wilds < route.ferries {
        return Err(ClaimRejection::InsufficientFerryWilds {
            needed: route.ferries,
            provided: wilds,
        });
    }

    // Rule 8
    let hand = ledger.hand(req.player).ok_or(ClaimRejection::UnknownPlayer)?;
    if !hand.covers(&Hand::from_cards(&spent)) {
        return Err(ClaimRejection::InsufficientHand);
    }

    let left = ledger.trains_left(req.player).unwrap_or(0);
    if left < route.length {
        return Err(ClaimRejection::InsufficientTrains {
            needed: route.length,
            left,
        });
    }

    Ok((route, spent))
}

/// Single mutation entry point for the ledger.
///
/// The ledger is written only when every rule passes; a rejection leaves it untouched.
pub fn attempt_claim(
    board: &BoardGraph,
    rules: &Rules,
    ledger: &mut ClaimLedger,
    req: &ClaimRequest,
) -> ClaimResult {
    match evaluate_claim(board, rules, ledger, req) {
        Ok((route, spent)) => {
            let surcharge = count_u32(spent.len() - req.cards.len());
            ledger.record_claim(route.id, req.player, &Hand::from_cards(&spent), route.length);
            ClaimResult::Accepted(ClaimAccepted {
                route: route.id,
                player: req.player,
                points: rules.length_to_points(route.length),
                spent,
                surcharge,
            })
        }
        Err(reason) => {
            debug!(
                "claim of route {} by player {} rejected: {reason}",
                req.route, req.player
            );
            ClaimResult::Rejected(reason)
        }
    }
}

/// Unclaimed routes `player` could still take under the parallel policy,
/// ignoring cards.
pub fn open_routes(
    board: &BoardGraph,
    rules: &Rules,
    ledger: &ClaimLedger,
    player: PlayerId,
) -> Vec<RouteId> {
    board
        .routes()
        .map(|r| r.id)
        .filter(|&id| check_availability(board, rules, ledger, id, player).is_ok())
        .collect()
}
