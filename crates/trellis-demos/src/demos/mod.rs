//! The demos, one module each.
//!
//! Every demo is an [`App`] plus the bits `main` needs to launch it: a title, the clear
//! state, whether it starts paused, and a short key reference.

mod chaos;
mod cube;
mod gasket;
mod hidden;
mod triangles;
mod viewer;

pub use chaos::Chaos;
pub use cube::Cube;
pub use gasket::Gasket;
pub use hidden::Hidden;
pub use triangles::Triangles;
pub use viewer::Viewer;

use trellis_engine::binding::{AttributeLayout, Geometry};
use trellis_engine::core::{App, Commands, RenderContext};
use trellis_engine::geometry::shapes::ColorCube;
use trellis_engine::geometry::UsageHint;
use trellis_engine::input::Key;
use trellis_engine::render::ClearState;
use trellis_engine::shader::ShaderProgram;
use trellis_engine::Result;

pub(crate) mod shaders {
    pub const POINTS_VS: &str = include_str!("../../shaders/points.vert.wgsl");
    pub const FLAT_VS: &str = include_str!("../../shaders/flat.vert.wgsl");
    pub const CUBE_VS: &str = include_str!("../../shaders/cube.vert.wgsl");
    pub const VIEWER_VS: &str = include_str!("../../shaders/viewer.vert.wgsl");

    pub const RED_FS: &str = include_str!("../../shaders/red.frag.wgsl");
    pub const UNIFORM_COLOR_FS: &str = include_str!("../../shaders/uniform_color.frag.wgsl");
    pub const VARYING_COLOR_FS: &str = include_str!("../../shaders/varying_color.frag.wgsl");
}

pub trait Demo: App + 'static {
    fn title(&self) -> &'static str;

    fn clear(&self) -> ClearState;

    fn start_paused(&self) -> bool {
        false
    }

    /// One line per key binding.
    fn controls(&self) -> &'static [&'static str] {
        &["Esc: quit"]
    }
}

/// Keys every demo shares. Returns `true` if `key` was consumed.
pub(crate) fn common_key(key: Key, commands: &mut Commands) -> bool {
    match key {
        Key::Escape => {
            commands.exit();
            true
        }
        _ => false,
    }
}

/// Uploads `cube` into two static buffers and binds them to `v_position` / `v_color`.
pub(crate) fn bind_color_cube(
    render: &mut RenderContext,
    program: &ShaderProgram,
    cube: &ColorCube,
) -> Result<Geometry> {
    let positions = render.create_buffer(UsageHint::Static);
    render.upload(positions, &cube.positions, 4)?;
    render.bind_attribute(program, "v_position", positions, AttributeLayout::packed(4))?;

    let colors = render.create_buffer(UsageHint::Static);
    render.upload(colors, &cube.colors, 4)?;
    render.bind_attribute(program, "v_color", colors, AttributeLayout::packed(4))?;

    render.geometry()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use trellis_engine::frame::{FrameLoop, LoopConfig, LoopState, ManualScheduler, PausePolicy};
    use trellis_engine::geometry::shapes::DEFAULT_CHAOS_POINTS;
    use trellis_engine::render::{RecordedFrame, RecordingSurface};
    use trellis_engine::scene::{DepthTest, Topology};
    use trellis_engine::time::FrameClock;

    use super::*;

    fn launch<D: Demo>(demo: &mut D) -> FrameLoop<ManualScheduler> {
        let config = LoopConfig {
            clear: demo.clear(),
            ..LoopConfig::default()
        };
        let mut frame_loop = FrameLoop::new(ManualScheduler::new(), config);
        frame_loop.setup(demo, (512, 512)).expect("setup");
        if demo.start_paused() {
            frame_loop.start_paused();
        } else {
            frame_loop.start();
        }
        frame_loop
    }

    fn run<D: Demo>(frame_loop: &mut FrameLoop<ManualScheduler>, demo: &mut D, surface: &mut RecordingSurface, n: usize) {
        let mut clock = FrameClock::fixed_step(Duration::from_millis(16));
        frame_loop.run_until_idle(n, demo, surface, &mut clock);
    }

    fn last(surface: &RecordingSurface) -> &RecordedFrame {
        surface.last_frame().expect("at least one frame")
    }

    // ── static demos ─────────────────────────────────────────────────────

    #[test]
    fn chaos_draws_every_point_once() {
        let mut demo = Chaos::new(7);
        let mut frame_loop = launch(&mut demo);
        let mut surface = RecordingSurface::new(512, 512);
        run(&mut frame_loop, &mut demo, &mut surface, 2);

        let frame = last(&surface);
        assert_eq!(frame.draws.len(), 1);
        assert_eq!(frame.draws[0].topology, Topology::Points);
        assert_eq!(frame.draws[0].vertices, 0..DEFAULT_CHAOS_POINTS as u32);
    }

    #[test]
    fn triangles_share_one_buffer() {
        let mut demo = Triangles::default();
        let mut frame_loop = launch(&mut demo);
        let mut surface = RecordingSurface::new(512, 512);
        run(&mut frame_loop, &mut demo, &mut surface, 1);

        let frame = last(&surface);
        assert_eq!(frame.draws.len(), 2);
        assert_eq!(frame.draws[0].vertices, 0..3);
        assert_eq!(frame.draws[1].vertices, 3..6);
        assert_eq!(frame.draws[0].attributes, frame.draws[1].attributes);
        assert_ne!(frame.draws[0].uniform(0), frame.draws[1].uniform(0));
        assert!(frame.draws.iter().all(|d| d.depth_test == DepthTest::LessEqual));
    }

    #[test]
    fn hidden_surface_paints_back_to_front() {
        let mut demo = Hidden::default();
        let mut frame_loop = launch(&mut demo);
        let mut surface = RecordingSurface::new(512, 512);
        run(&mut frame_loop, &mut demo, &mut surface, 1);

        let frame = last(&surface);
        assert_eq!(frame.draws.len(), 2);
        assert!(frame.draws.iter().all(|d| d.topology == Topology::TriangleFan));
        assert!(frame.draws.iter().all(|d| d.depth_test == DepthTest::Disabled));
        // Red (farther) first: its colour's red channel is 1.0.
        let red = frame.draws[0].uniform(0).expect("u_color");
        assert_eq!(&red[0..4], &1.0f32.to_le_bytes());
    }

    // ── animated demos ───────────────────────────────────────────────────

    #[test]
    fn cube_waits_for_enter() {
        let mut demo = Cube::new();
        let mut frame_loop = launch(&mut demo);
        let mut surface = RecordingSurface::new(512, 512);
        assert_eq!(frame_loop.state(), LoopState::Paused);

        run(&mut frame_loop, &mut demo, &mut surface, 3);
        assert_eq!(frame_loop.channels().get_vec3("theta").unwrap(), [0.0; 3]);
        assert_eq!(last(&surface).draws[0].vertices, 0..36);

        frame_loop.handle_key(Key::Enter, &mut demo);
        assert_eq!(frame_loop.state(), LoopState::Running);
        run(&mut frame_loop, &mut demo, &mut surface, 2);

        let [x, y, z] = frame_loop.channels().get_vec3("theta").unwrap();
        assert!(x > 0.0);
        assert_eq!((y, z), (0.0, 0.0));
    }

    #[test]
    fn cube_axis_keys_pick_the_rotation_axis() {
        let mut demo = Cube::new();
        let mut frame_loop = launch(&mut demo);
        let mut surface = RecordingSurface::new(512, 512);

        frame_loop.handle_key(Key::Z, &mut demo);
        frame_loop.handle_key(Key::Space, &mut demo);
        run(&mut frame_loop, &mut demo, &mut surface, 2);

        let [x, _, z] = frame_loop.channels().get_vec3("theta").unwrap();
        assert_eq!(x, 0.0);
        assert!(z > 0.0);
    }

    #[test]
    fn cube_stop_then_restart_draws_again() {
        let mut demo = Cube::new();
        let mut frame_loop = launch(&mut demo);
        let mut surface = RecordingSurface::new(512, 512);

        frame_loop.handle_key(Key::Enter, &mut demo);
        run(&mut frame_loop, &mut demo, &mut surface, 2);

        frame_loop.handle_key(Key::S, &mut demo);
        assert_eq!(frame_loop.state(), LoopState::Paused);
        assert_eq!(frame_loop.scheduler().pending(), 0);

        let drawn = frame_loop.frames_drawn();
        let [stopped_at, _, _] = frame_loop.channels().get_vec3("theta").unwrap();
        run(&mut frame_loop, &mut demo, &mut surface, 3);
        assert_eq!(frame_loop.frames_drawn(), drawn);

        frame_loop.handle_key(Key::Space, &mut demo);
        assert_eq!(frame_loop.state(), LoopState::Running);
        run(&mut frame_loop, &mut demo, &mut surface, 2);

        assert_eq!(frame_loop.frames_drawn(), drawn + 2);
        let [x, _, _] = frame_loop.channels().get_vec3("theta").unwrap();
        assert!(x > stopped_at);
    }

    #[test]
    fn cube_draws_its_first_frame_under_halt_policy() {
        let mut demo = Cube::new();
        let config = LoopConfig {
            clear: demo.clear(),
            pause_policy: PausePolicy::Halt,
            ..LoopConfig::default()
        };
        let mut frame_loop = FrameLoop::new(ManualScheduler::new(), config);
        frame_loop.setup(&mut demo, (512, 512)).expect("setup");
        frame_loop.start_paused();
        let mut surface = RecordingSurface::new(512, 512);

        run(&mut frame_loop, &mut demo, &mut surface, 3);

        assert_eq!(frame_loop.state(), LoopState::Paused);
        assert_eq!(frame_loop.frames_drawn(), 1);
        assert_eq!(last(&surface).draws[0].vertices, 0..36);
    }

    #[test]
    fn viewer_presets_move_the_camera() {
        let mut demo = Viewer::new();
        let mut frame_loop = launch(&mut demo);
        let mut surface = RecordingSurface::new(512, 512);
        run(&mut frame_loop, &mut demo, &mut surface, 1);
        let front = last(&surface).draws[0].uniform(0).expect("model_view").to_vec();

        frame_loop.handle_key(Key::V, &mut demo);
        run(&mut frame_loop, &mut demo, &mut surface, 1);

        let phi = frame_loop.channels().get_f32("phi").unwrap();
        assert!((phi - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
        assert_ne!(last(&surface).draws[0].uniform(0).expect("model_view"), front.as_slice());
    }

    #[test]
    fn viewer_width_slider_halves_into_the_channel() {
        let mut demo = Viewer::new();
        let mut frame_loop = launch(&mut demo);
        let mut surface = RecordingSurface::new(512, 512);

        frame_loop.handle_key(Key::Digit2, &mut demo);
        run(&mut frame_loop, &mut demo, &mut surface, 1);

        let half = frame_loop.channels().get_f32("half_width").unwrap();
        assert!((half - 1.05).abs() < 1e-5);
    }

    #[test]
    fn gasket_reuploads_on_depth_change() {
        let mut demo = Gasket::new();
        let mut frame_loop = launch(&mut demo);
        let mut surface = RecordingSurface::new(512, 512);
        run(&mut frame_loop, &mut demo, &mut surface, 1);
        assert_eq!(last(&surface).draws[0].vertices, 0..3);
        let before = last(&surface).draws[0].attributes[0].2;

        frame_loop.handle_key(Key::ArrowUp, &mut demo);
        frame_loop.handle_key(Key::ArrowUp, &mut demo);
        run(&mut frame_loop, &mut demo, &mut surface, 1);

        let draw = &last(&surface).draws[0];
        assert_eq!(draw.topology, Topology::Triangles);
        assert_eq!(draw.vertices, 0..48);
        assert!(draw.attributes[0].2 > before, "buffer generation moves on re-upload");
    }

    #[test]
    fn gasket_depth_stops_at_the_cap() {
        let mut demo = Gasket::new();
        let mut frame_loop = launch(&mut demo);
        let mut surface = RecordingSurface::new(512, 512);

        frame_loop.handle_key(Key::ArrowDown, &mut demo);
        run(&mut frame_loop, &mut demo, &mut surface, 1);
        assert_eq!(frame_loop.channels().get_int("depth").unwrap(), 0);

        for _ in 0..20 {
            frame_loop.handle_key(Key::ArrowUp, &mut demo);
        }
        run(&mut frame_loop, &mut demo, &mut surface, 1);
        assert_eq!(frame_loop.channels().get_int("depth").unwrap(), 8);
    }
}
