use crate::board::BoardGraph;
use crate::connectivity::longest_path_with_limits;
use crate::destinations::Destination;
use crate::ledger::ClaimLedger;
use crate::rules::Rules;
use crate::types::PlayerId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreCard {
    pub player: PlayerId,
    pub route_points: u32,
    pub destinations_completed: u32,
    pub destinations_failed: u32,
    /// Completed goal points minus failed goal points.
    pub destination_points: i64,
    pub longest_path: u32,
    pub longest_path_bonus: u32,
    pub total: i64,
}

/// Points earned from claimed routes alone.
pub fn route_points(board: &BoardGraph, rules: &Rules, ledger: &ClaimLedger, player: PlayerId) -> u32 {
    ledger
        .owned_routes(player)
        .filter_map(|rid| board.route_by_id(rid))
        .map(|r| rules.length_to_points(r.length))
        .sum()
}

/// End-of-game scoring. `goals[p]` lists player `p`'s destinations; missing
/// entries mean no goals. Every player tied for the longest trail gets the bonus.
pub fn final_scores(
    board: &BoardGraph,
    rules: &Rules,
    ledger: &ClaimLedger,
    goals: &[Vec<Destination>],
) -> Vec<ScoreCard> {
    let mut cards: Vec<ScoreCard> = ledger
        .players()
        .map(|player| {
            let mut card = ScoreCard {
                player,
                route_points: route_points(board, rules, ledger, player),
                longest_path: longest_path_with_limits(board, ledger, player, rules.search).length,
                ..ScoreCard::default()
            };
            for goal in goals.get(usize::from(player)).map(Vec::as_slice).unwrap_or(&[]) {
                if goal.fulfilled_by(board, ledger, player) {
                    card.destinations_completed += 1;
                    card.destination_points += i64::from(goal.points);
                } else {
                    card.destinations_failed += 1;
                    card.destination_points -= i64::from(goal.points);
                }
            }
            card
        })
        .collect();

    let best = cards.iter().map(|c| c.longest_path).max().unwrap_or(0);
    for card in &mut cards {
        if best > 0 && card.longest_path == best {
            card.longest_path_bonus = rules.longest_path_bonus;
        }
        card.total = i64::from(card.route_points)
            + card.destination_points
            + i64::from(card.longest_path_bonus);
    }
    cards
}
