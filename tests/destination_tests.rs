use std::fs;

use conductor::{
    random_destination, rng_for_game, shortest_distance, BoardGraph, MapData, RouteRecord,
};

fn europe() -> BoardGraph {
    let bytes = fs::read("data/europe.json").expect("failed to read europe.json");
    let map = conductor::parse_map_json(&bytes).expect("failed to parse europe.json");
    BoardGraph::build(&map).expect("europe map must import")
}

#[test]
fn shortest_distance_on_europe() {
    let board = europe();
    let id = |n: &str| board.city_by_name(n).unwrap().id;

    let (path, len) = shortest_distance(&board, id("Paris"), id("Frankfurt")).unwrap();
    assert_eq!(path, vec![id("Paris"), id("Frankfurt")]);
    assert_eq!(len, 3);

    let (path, len) = shortest_distance(&board, id("Lisboa"), id("Moskva")).unwrap();
    assert_eq!(len, 28);
    assert_eq!(path.first(), Some(&id("Lisboa")));
    assert_eq!(path.last(), Some(&id("Moskva")));
    // consecutive cities on the path are joined by a route
    for w in path.windows(2) {
        assert!(board.are_adjacent(w[0], w[1]));
    }

    let (path, len) = shortest_distance(&board, id("Wien"), id("Wien")).unwrap();
    assert_eq!(path, vec![id("Wien")]);
    assert_eq!(len, 0);
}

#[test]
fn shortest_distance_handles_disconnected_and_unknown_cities() {
    let board = BoardGraph::build(&MapData::new(vec![
        RouteRecord::new("A", "B", "Gray", 1),
        RouteRecord::new("C", "D", "Gray", 1),
    ]))
    .unwrap();
    assert!(shortest_distance(&board, 0, 2).is_none());
    assert!(shortest_distance(&board, 0, 40).is_none());
}

#[test]
fn random_destinations_meet_generation_constraints() {
    let board = europe();
    let mut rng = rng_for_game(0x00C0_FFEE, 7, 0);
    for _ in 0..50 {
        let d = random_destination(&board, &mut rng).expect("europe always has goals");
        assert_ne!(d.from, d.to);
        assert!(!board.are_adjacent(d.from, d.to));
        let (path, len) = shortest_distance(&board, d.from, d.to).unwrap();
        assert!(path.len() >= 3);
        assert!(len >= 5);
        assert_eq!(d.points, len);
    }
}

#[test]
fn random_destinations_replay_from_the_same_seed() {
    let board = europe();
    let draw = |seed| {
        let mut rng = rng_for_game(seed, 1, 2);
        (0..10)
            .map(|_| random_destination(&board, &mut rng).unwrap())
            .collect::<Vec<_>>()
    };
    assert_eq!(draw(42), draw(42));
}

#[test]
fn tiny_board_has_no_valid_destination() {
    let board = BoardGraph::build(&MapData::new(vec![
        RouteRecord::new("A", "B", "Gray", 1),
        RouteRecord::new("B", "C", "Gray", 1),
    ]))
    .unwrap();
    let mut rng = rng_for_game(1, 1, 1);
    assert!(random_destination(&board, &mut rng).is_none());
}

#[test]
fn huge_route_lengths_saturate_instead_of_overflowing() {
    let board = BoardGraph::build(&MapData::new(vec![
        RouteRecord::new("A", "B", "Gray", 3_000_000_000),
        RouteRecord::new("B", "C", "Gray", 3_000_000_000),
    ]))
    .unwrap();
    let (path, len) = shortest_distance(&board, 0, 2).unwrap();
    assert_eq!(path, vec![0, 1, 2]);
    assert_eq!(len, u32::MAX);
}
