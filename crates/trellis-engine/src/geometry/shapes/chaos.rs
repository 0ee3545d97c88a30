use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Corner set the chaos game jumps toward.
pub const CHAOS_TRIANGLE: [[f32; 2]; 3] = [[-0.6, -0.6], [0.6, -0.6], [0.0, 0.6]];

pub const DEFAULT_CHAOS_POINTS: usize = 10_000;

/// Runs the chaos game with a `ChaCha8Rng` seeded from `seed`.
///
/// Same seed, same points. Output is `count` xy pairs, flattened.
pub fn chaos_game(seed: u64, count: usize) -> Vec<f32> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    chaos_game_with(&mut rng, &CHAOS_TRIANGLE, count)
}

/// Midpoint iteration from the origin: `next = (current + corner) / 2`, where `corner` is
/// drawn uniformly from `corners` at every step. The origin itself is not emitted.
pub fn chaos_game_with<R: Rng>(rng: &mut R, corners: &[[f32; 2]], count: usize) -> Vec<f32> {
    let mut out = Vec::with_capacity(count * 2);
    if corners.is_empty() {
        return out;
    }

    let mut current = [0.0f32, 0.0];
    for _ in 0..count {
        let corner = corners[rng.gen_range(0..corners.len())];
        current = [(current[0] + corner[0]) / 2.0, (current[1] + corner[1]) / 2.0];
        out.extend_from_slice(&current);
    }
    out
}
