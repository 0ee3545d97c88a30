use std::collections::HashMap;
use std::sync::Arc;

/// Outer triangle of the subdivision gasket.
pub const GASKET_TRIANGLE: [[f32; 2]; 3] = [[-1.0, -1.0], [0.0, 1.0], [1.0, -1.0]];

/// Depth limit. Depth `d` yields `3 * 4^d` vertices; 8 is already ~200k.
pub const MAX_GASKET_DEPTH: u32 = 8;

/// Subdivides [`GASKET_TRIANGLE`] `depth` times into `4^depth` triangles.
///
/// Each triangle `(a, b, c)` with edge midpoints `ab`, `bc`, `ca` splits into
/// `(a, ab, ca)`, `(b, bc, ab)`, `(c, ca, bc)` and the centre `(ab, bc, ca)`.
/// Output is flattened xy pairs, three per triangle. `depth` is capped at
/// [`MAX_GASKET_DEPTH`].
pub fn subdivide(depth: u32) -> Vec<f32> {
    let depth = depth.min(MAX_GASKET_DEPTH);
    let mut out = Vec::with_capacity(3 * 2 * 4usize.pow(depth));
    let [a, b, c] = GASKET_TRIANGLE;
    divide(a, b, c, depth, &mut out);
    out
}

fn divide(a: [f32; 2], b: [f32; 2], c: [f32; 2], depth: u32, out: &mut Vec<f32>) {
    if depth == 0 {
        out.extend_from_slice(&[a[0], a[1], b[0], b[1], c[0], c[1]]);
        return;
    }

    let ab = mid(a, b);
    let bc = mid(b, c);
    let ca = mid(c, a);
    let depth = depth - 1;

    divide(a, ab, ca, depth, out);
    divide(b, bc, ab, depth, out);
    divide(c, ca, bc, depth, out);
    divide(ab, bc, ca, depth, out);
}

#[inline]
fn mid(p: [f32; 2], q: [f32; 2]) -> [f32; 2] {
    [(p[0] + q[0]) * 0.5, (p[1] + q[1]) * 0.5]
}

/// Per-depth memo of [`subdivide`] results.
///
/// Results are shared immutable slices, so handing one to an upload does not copy the
/// cached data.
#[derive(Debug, Default)]
pub struct GasketCache {
    levels: HashMap<u32, Arc<[f32]>>,
}

impl GasketCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, depth: u32) -> Arc<[f32]> {
        let depth = depth.min(MAX_GASKET_DEPTH);
        self.levels
            .entry(depth)
            .or_insert_with(|| {
                log::debug!("gasket: subdividing to depth {depth}");
                subdivide(depth).into()
            })
            .clone()
    }

    #[inline]
    pub fn is_cached(&self, depth: u32) -> bool {
        self.levels.contains_key(&depth.min(MAX_GASKET_DEPTH))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_zero_is_the_outer_triangle() {
        assert_eq!(subdivide(0), vec![-1.0, -1.0, 0.0, 1.0, 1.0, -1.0]);
    }

    #[test]
    fn each_level_quadruples_the_triangles() {
        for depth in 0..=5 {
            assert_eq!(subdivide(depth).len(), 6 * 4usize.pow(depth), "depth {depth}");
        }
    }

    #[test]
    fn first_level_follows_corner_order() {
        let v = subdivide(1);
        // (a, ab, ca)
        assert_eq!(&v[0..6], &[-1.0, -1.0, -0.5, 0.0, 0.0, -1.0]);
        // centre (ab, bc, ca)
        assert_eq!(&v[18..24], &[-0.5, 0.0, 0.5, 0.0, 0.0, -1.0]);
    }

    #[test]
    fn depth_is_capped() {
        assert_eq!(subdivide(MAX_GASKET_DEPTH + 3).len(), subdivide(MAX_GASKET_DEPTH).len());
    }

    #[test]
    fn cache_returns_the_same_allocation() {
        let mut cache = GasketCache::new();
        assert!(!cache.is_cached(3));

        let first = cache.get(3);
        let second = cache.get(3);

        assert!(cache.is_cached(3));
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(&*first, subdivide(3).as_slice());
    }
}
