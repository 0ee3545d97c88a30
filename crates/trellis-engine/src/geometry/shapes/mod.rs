//! Procedural vertex data.
//!
//! Every generator here is a pure function of its inputs and returns flat `f32` arrays
//! ready for [`GeometryStore::upload`](crate::geometry::GeometryStore::upload).

pub mod chaos;
pub mod cube;
pub mod gasket;
pub mod quads;

pub use chaos::{chaos_game, chaos_game_with, CHAOS_TRIANGLE, DEFAULT_CHAOS_POINTS};
pub use cube::{color_cube, ColorCube, Palette, MUTED_PALETTE, PRIMARY_PALETTE};
pub use gasket::{subdivide, GasketCache, GASKET_TRIANGLE, MAX_GASKET_DEPTH};
pub use quads::{depth_quads, DepthQuad};
