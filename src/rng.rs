use rand::SeedableRng;
use rand_pcg::Pcg64;

/// Deterministic RNG for a given (seed, game_id, turn) triple.
///
/// The per-turn seed is `seed ^ game_id ^ turn`, fed to PCG-64, so a host can
/// replay tunnel reveals and destination draws exactly.
#[inline]
pub fn rng_for_game(seed: u64, game_id: u64, turn: u32) -> Pcg64 {
    let derived: u64 = seed ^ game_id ^ u64::from(turn);
    Pcg64::seed_from_u64(derived)
}
