/// Eight face colours indexed by cube corner. Only the first corner of each face picks
/// the colour, so corner 0 and 7 never lead a face.
pub type Palette = [[f32; 4]; 8];

/// Muted face colours: purple, teal, olive, maroon, dark green, navy, light grey.
pub const MUTED_PALETTE: Palette = [
    [0.5, 0.0, 0.5, 1.0],
    [0.0, 0.5, 0.5, 1.0],
    [0.5, 0.5, 0.0, 1.0],
    [0.5, 0.0, 0.0, 1.0],
    [0.0, 0.5, 0.0, 1.0],
    [0.0, 0.0, 0.5, 1.0],
    [0.7, 0.7, 0.7, 1.0],
    [1.0, 1.0, 1.0, 1.0],
];

/// Black, red, yellow, green, blue, magenta, cyan, white.
pub const PRIMARY_PALETTE: Palette = [
    [0.0, 0.0, 0.0, 1.0],
    [1.0, 0.0, 0.0, 1.0],
    [1.0, 1.0, 0.0, 1.0],
    [0.0, 1.0, 0.0, 1.0],
    [0.0, 0.0, 1.0, 1.0],
    [1.0, 0.0, 1.0, 1.0],
    [0.0, 1.0, 1.0, 1.0],
    [1.0, 1.0, 1.0, 1.0],
];

const CORNERS: [[f32; 4]; 8] = [
    [-0.5, -0.5, 0.5, 1.0],
    [-0.5, 0.5, 0.5, 1.0],
    [0.5, 0.5, 0.5, 1.0],
    [0.5, -0.5, 0.5, 1.0],
    [-0.5, -0.5, -0.5, 1.0],
    [-0.5, 0.5, -0.5, 1.0],
    [0.5, 0.5, -0.5, 1.0],
    [0.5, -0.5, -0.5, 1.0],
];

const FACES: [[usize; 4]; 6] = [
    [1, 0, 3, 2],
    [2, 3, 7, 6],
    [3, 0, 4, 7],
    [6, 5, 1, 2],
    [4, 5, 6, 7],
    [5, 4, 0, 1],
];

/// Unit cube centred on the origin as a plain triangle list.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorCube {
    /// Homogeneous positions, 4 floats per vertex.
    pub positions: Vec<f32>,
    /// RGBA, 4 floats per vertex.
    pub colors: Vec<f32>,
}

impl ColorCube {
    pub const VERTEX_COUNT: u32 = 36;
}

/// Builds the 36-vertex solid-faced cube. Each face quad `(a, b, c, d)` becomes
/// triangles `(a, b, c)` and `(a, c, d)`, all coloured `palette[a]`.
pub fn color_cube(palette: &Palette) -> ColorCube {
    let mut positions = Vec::with_capacity(ColorCube::VERTEX_COUNT as usize * 4);
    let mut colors = Vec::with_capacity(ColorCube::VERTEX_COUNT as usize * 4);

    for [a, b, c, d] in FACES {
        for corner in [a, b, c, a, c, d] {
            positions.extend_from_slice(&CORNERS[corner]);
            colors.extend_from_slice(&palette[a]);
        }
    }

    ColorCube { positions, colors }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thirty_six_vertices() {
        let cube = color_cube(&MUTED_PALETTE);
        assert_eq!(cube.positions.len(), 36 * 4);
        assert_eq!(cube.colors.len(), 36 * 4);
    }

    #[test]
    fn faces_are_solid() {
        let cube = color_cube(&PRIMARY_PALETTE);
        for face in cube.colors.chunks_exact(6 * 4) {
            let first = &face[0..4];
            assert!(face.chunks_exact(4).all(|c| c == first));
        }
        // First face is led by corner 1 (red).
        assert_eq!(&cube.colors[0..4], &PRIMARY_PALETTE[1]);
    }

    #[test]
    fn every_vertex_is_a_corner() {
        let cube = color_cube(&MUTED_PALETTE);
        for v in cube.positions.chunks_exact(4) {
            assert!(v[..3].iter().all(|c| c.abs() == 0.5));
            assert_eq!(v[3], 1.0);
        }
    }
}
