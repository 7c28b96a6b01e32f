use std::cmp::Reverse;
use std::collections::BinaryHeap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::board::BoardGraph;
use crate::ledger::ClaimLedger;
use crate::connectivity::is_connected;
use crate::types::{CityId, PlayerId};

/// A point-to-point goal: worth `points` if completed, minus `points` if not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Destination {
    pub from: CityId,
    pub to: CityId,
    pub points: u32,
}

impl Destination {
    #[inline]
    pub fn fulfilled_by(&self, board: &BoardGraph, ledger: &ClaimLedger, player: PlayerId) -> bool {
        is_connected(board, ledger, player, self.from, self.to)
    }
}

/// Generated goals must span at least this many cities...
pub const MIN_DESTINATION_CITIES: usize = 3;
/// ...and at least this much total route length.
pub const MIN_DESTINATION_LENGTH: u32 = 5;
const MAX_DRAW_ATTEMPTS: u32 = 10_000;

/// Shortest path over the whole board by route length, ignoring ownership.
/// Returns the visited cities (inclusive) and the total length.
pub fn shortest_distance(board: &BoardGraph, a: CityId, b: CityId) -> Option<(Vec<CityId>, u32)> {
    let n = board.city_count();
    if (a as usize) >= n || (b as usize) >= n {
        return None;
    }
    let mut dist = vec![u32::MAX; n];
    let mut prev: Vec<Option<CityId>> = vec![None; n];
    let mut heap = BinaryHeap::new();
    dist[a as usize] = 0;
    heap.push(Reverse((0u32, a)));

    while let Some(Reverse((d, city))) = heap.pop() {
        if d > dist[city as usize] {
            continue;
        }
        if city == b {
            break;
        }
        for route in board.routes_at(city) {
            let Some(next) = route.other_end(city) else { continue };
            let nd = d.saturating_add(route.length);
            if nd < dist[next as usize] {
                dist[next as usize] = nd;
                prev[next as usize] = Some(city);
                heap.push(Reverse((nd, next)));
            }
        }
    }

    if dist[b as usize] == u32::MAX {
        return None;
    }
    let mut path = vec![b];
    let mut cur = b;
    while let Some(p) = prev[cur as usize] {
        path.push(p);
        cur = p;
    }
    path.reverse();
    Some((path, dist[b as usize]))
}

/// Draw a random goal between two non-adjacent cities whose shortest path
/// passes through at least three cities and is at least five long.
/// Returns None if the board offers no such pair within a bounded number of draws.
pub fn random_destination<R: Rng + ?Sized>(board: &BoardGraph, rng: &mut R) -> Option<Destination> {
    let n = CityId::try_from(board.city_count()).unwrap_or(CityId::MAX);
    if usize::from(n) < MIN_DESTINATION_CITIES {
        return None;
    }
    for _ in 0..MAX_DRAW_ATTEMPTS {
        let from = rng.gen_range(0..n);
        let to = rng.gen_range(0..n);
        if from == to || board.are_adjacent(from, to) {
            continue;
        }
        let Some((path, length)) = shortest_distance(board, from, to) else { continue };
        if path.len() >= MIN_DESTINATION_CITIES && length >= MIN_DESTINATION_LENGTH {
            return Some(Destination {
                from,
                to,
                points: length,
            });
        }
    }
    None
}
