/// A flat square at constant depth, drawn as a four-vertex triangle fan.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthQuad {
    /// xyz per corner, fan order.
    pub positions: [f32; 12],
    pub color: [f32; 4],
    pub depth: f32,
}

impl DepthQuad {
    /// Square with the given half-extent whose corners all sit at `z = depth`.
    pub fn square(half: f32, depth: f32, color: [f32; 4]) -> Self {
        Self {
            positions: [
                -half, -half, depth, //
                half, -half, depth, //
                half, half, depth, //
                -half, half, depth,
            ],
            color,
            depth,
        }
    }
}

/// A large red square at depth -0.5 and a smaller green one at -0.2.
pub fn depth_quads() -> [DepthQuad; 2] {
    [
        DepthQuad::square(0.5, -0.5, [1.0, 0.0, 0.0, 1.0]),
        DepthQuad::square(0.2, -0.2, [0.0, 1.0, 0.0, 1.0]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_share_the_quad_depth() {
        for quad in depth_quads() {
            assert!(quad.positions.chunks_exact(3).all(|p| p[2] == quad.depth));
        }
    }

    #[test]
    fn red_is_further_back_and_larger() {
        let [red, green] = depth_quads();
        assert!(red.depth < green.depth);
        assert!(red.positions[3] > green.positions[3]);
    }
}
