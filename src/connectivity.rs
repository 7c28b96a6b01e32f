use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

use log::warn;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::board::BoardGraph;
use crate::ledger::ClaimLedger;
use crate::types::{CityId, PlayerId};

/// Cutoffs for the longest-path search. When either is hit the search stops
/// and reports the best trail found so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchLimits {
    /// Maximum DFS expansions across all start cities.
    pub max_steps: Option<u64>,
    pub time_ms: Option<u64>,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            max_steps: Some(20_000_000),
            time_ms: None,
        }
    }
}

impl SearchLimits {
    #[inline]
    pub const fn unbounded() -> Self {
        Self {
            max_steps: None,
            time_ms: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LongestPath {
    /// Total route length of the best trail found.
    pub length: u32,
    /// False when a cutoff stopped the search early.
    pub exhaustive: bool,
    pub steps: u64,
}

/// Owned-subgraph in local edge numbering: `adj[city]` holds (edge, other end, length).
struct OwnedGraph {
    adj: Vec<Vec<(usize, CityId, u32)>>,
    edges: usize,
}

impl OwnedGraph {
    fn build(board: &BoardGraph, ledger: &ClaimLedger, player: PlayerId) -> Self {
        let mut adj = vec![Vec::new(); board.city_count()];
        let mut edges = 0usize;
        for rid in ledger.owned_routes(player) {
            let Some(route) = board.route_by_id(rid) else { continue };
            let (a, b) = route.endpoints;
            adj[a as usize].push((edges, b, route.length));
            adj[b as usize].push((edges, a, route.length));
            edges += 1;
        }
        Self { adj, edges }
    }

    fn start_cities(&self) -> Vec<CityId> {
        (0..self.adj.len())
            .filter(|&c| !self.adj[c].is_empty())
            .filter_map(|c| CityId::try_from(c).ok())
            .collect()
    }
}

struct Budget {
    steps: AtomicU64,
    max_steps: Option<u64>,
    deadline: Option<Instant>,
    cut: AtomicBool,
}

impl Budget {
    fn new(limits: SearchLimits) -> Self {
        Self {
            steps: AtomicU64::new(0),
            max_steps: limits.max_steps,
            deadline: limits
                .time_ms
                .map(|ms| Instant::now() + Duration::from_millis(ms)),
            cut: AtomicBool::new(false),
        }
    }

    /// Count one expansion; false once any cutoff has been reached.
    #[inline]
    fn tick(&self) -> bool {
        if self.cut.load(Ordering::Relaxed) {
            return false;
        }
        let n = self.steps.fetch_add(1, Ordering::Relaxed) + 1;
        let over_steps = self.max_steps.is_some_and(|m| n > m);
        // clock reads are comparatively slow; sample them
        let over_time = n % 1024 == 0 && self.deadline.is_some_and(|d| Instant::now() >= d);
        if over_steps || over_time {
            self.cut.store(true, Ordering::Relaxed);
            return false;
        }
        true
    }
}

/// One level of the explicit DFS stack.
struct Frame {
    city: CityId,
    /// Next adjacency slot of `city` to try.
    next: usize,
    acc: u32,
    /// Edge taken to reach `city`; released when the frame pops.
    via: Option<usize>,
}

/// Longest trail starting at `start`. Iterative, so depth is bounded by
/// heap rather than the worker's stack.
fn trail_dfs(g: &OwnedGraph, start: CityId, used: &mut [bool], budget: &Budget) -> u32 {
    let mut best = 0;
    if !budget.tick() {
        return best;
    }
    let mut stack = vec![Frame {
        city: start,
        next: 0,
        acc: 0,
        via: None,
    }];
    while let Some(frame) = stack.last_mut() {
        let Some(&(edge, other, len)) = g.adj[frame.city as usize].get(frame.next) else {
            if let Some(edge) = frame.via {
                used[edge] = false;
            }
            stack.pop();
            continue;
        };
        frame.next += 1;
        if used[edge] {
            continue;
        }
        if !budget.tick() {
            break;
        }
        let acc = frame.acc.saturating_add(len);
        used[edge] = true;
        best = best.max(acc);
        stack.push(Frame {
            city: other,
            next: 0,
            acc,
            via: Some(edge),
        });
    }
    best
}

/// Longest trail (no route repeated, cities may repeat) through `player`'s routes.
pub fn longest_path_with_limits(
    board: &BoardGraph,
    ledger: &ClaimLedger,
    player: PlayerId,
    limits: SearchLimits,
) -> LongestPath {
    let g = OwnedGraph::build(board, ledger, player);
    if g.edges == 0 {
        return LongestPath {
            length: 0,
            exhaustive: true,
            steps: 0,
        };
    }

    let budget = Budget::new(limits);
    let length = g
        .start_cities()
        .par_iter()
        .map(|&start| {
            let mut used = vec![false; g.edges];
            trail_dfs(&g, start, &mut used, &budget)
        })
        .max()
        .unwrap_or(0);

    let exhaustive = !budget.cut.load(Ordering::Relaxed);
    let steps = budget.steps.load(Ordering::Relaxed);
    if !exhaustive {
        warn!(
            "longest path search for player {player} stopped after {steps} steps; best so far {length}"
        );
    }
    LongestPath {
        length,
        exhaustive,
        steps,
    }
}

#[inline]
pub fn longest_path(board: &BoardGraph, ledger: &ClaimLedger, player: PlayerId) -> u32 {
    longest_path_with_limits(board, ledger, player, SearchLimits::default()).length
}

/// Whether `player`'s routes join `a` and `b`. A city is connected to itself.
pub fn is_connected(
    board: &BoardGraph,
    ledger: &ClaimLedger,
    player: PlayerId,
    a: CityId,
    b: CityId,
) -> bool {
    let n = board.city_count();
    if (a as usize) >= n || (b as usize) >= n {
        return false;
    }
    if a == b {
        return true;
    }

    let mut visited = vec![false; n];
    let mut queue = VecDeque::new();
    visited[a as usize] = true;
    queue.push_back(a);

    while let Some(city) = queue.pop_front() {
        for &rid in board.route_ids_at(city) {
            if ledger.owner_of(rid) != Some(player) {
                continue;
            }
            let Some(next) = board.route_by_id(rid).and_then(|r| r.other_end(city)) else {
                continue;
            };
            if next == b {
                return true;
            }
            if !visited[next as usize] {
                visited[next as usize] = true;
                queue.push_back(next);
            }
        }
    }
    false
}
