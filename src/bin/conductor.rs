use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use conductor::{parse_map_json, random_destination, rng_for_game, BoardGraph, GameSession, Rules};

#[derive(Debug, Parser)]
#[command(name = "conductor", version, about = "Route-claiming train game board loader")]
struct Args {
    /// Map JSON file: an array of route records
    map: PathBuf,

    /// Number of players (2..=5, default 2); selects the parallel-route variant.
    /// Overrides the player count of a --rules file.
    #[arg(long)]
    players: Option<u8>,

    /// Optional rules JSON; omitted fields take the defaults for the player count
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Seed for generated destinations (deterministic)
    #[arg(long, default_value_t = 0x00C0FFEEu64)]
    seed: u64,

    /// Number of destination goals to generate and print
    #[arg(long, default_value_t = 0)]
    destinations: u32,
}

fn load_rules(args: &Args) -> Result<Rules, Box<dyn std::error::Error>> {
    let rules = match &args.rules {
        Some(path) => {
            let text = fs::read_to_string(path)
                .map_err(|e| format!("Failed to read rules {}: {e}", path.display()))?;
            Rules::from_json_for(&text, args.players)
                .map_err(|e| format!("Invalid rules {}: {e}", path.display()))?
        }
        None => Rules::for_players(args.players.unwrap_or(2))
            .map_err(|e| format!("Invalid rules: {e}"))?,
    };
    Ok(rules)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let map_path = &args.map;

    let bytes = fs::read(map_path)
        .map_err(|e| format!("Failed to read map {}: {e}", map_path.display()))?;
    let map = parse_map_json(&bytes).map_err(|e| format!("Map parse error: {e}"))?;
    let board = Arc::new(BoardGraph::build(&map).map_err(|e| format!("Map import error: {e}"))?);
    println!(
        "[conductor] Loaded {} cities, {} routes ({} parallel sets).",
        board.city_count(),
        board.route_count(),
        board.parallel_sets().count()
    );

    let rules = load_rules(&args)?;
    let session = GameSession::new(Arc::clone(&board), rules)
        .map_err(|e| format!("Invalid rules for this map: {e}"))?;
    println!(
        "[conductor] Rules: {} players, parallel routes {:?}, {} trains each.",
        session.rules().players,
        session.rules().parallel,
        session.rules().initial_trains
    );

    let mut rng = rng_for_game(args.seed, 0, 0);
    for i in 0..args.destinations {
        match random_destination(&board, &mut rng) {
            Some(d) => {
                let from = board.city_by_id(d.from).map_or("?", |c| c.name.as_str());
                let to = board.city_by_id(d.to).map_or("?", |c| c.name.as_str());
                println!("[conductor] Destination {}: {from} - {to} ({})", i + 1, d.points);
            }
            None => {
                eprintln!("[conductor] Warning: board has no pair suitable for a destination");
                break;
            }
        }
    }

    Ok(())
}
