use trellis_engine::core::{App, Commands, SetupCtx, TickCtx};
use trellis_engine::geometry::shapes::{color_cube, ColorCube, PRIMARY_PALETTE};
use trellis_engine::input::{Conversion, Key, Slider};
use trellis_engine::paint::Color;
use trellis_engine::param::{Channels, ParameterChannel};
use trellis_engine::render::ClearState;
use trellis_engine::scene::{DepthTest, OrbitCamera, Topology, Uniforms};
use trellis_engine::shader::ShaderProgram;
use trellis_engine::Result;

use super::{bind_color_cube, common_key, shaders, Demo};

/// Camera presets as `(theta°, phi°, radius)`.
const FRONT: (f32, f32, f32) = (0.0, 0.0, 1.0);
const SIDE: (f32, f32, f32) = (0.0, 90.0, 1.0);
const ISOMETRIC: (f32, f32, f32) = (45.0, 45.0, 0.282_842_7);

#[derive(Debug)]
struct Sliders {
    radius: Slider,
    theta: Slider,
    phi: Slider,
    width: Slider,
    height: Slider,
    depth: Slider,
}

impl Default for Sliders {
    fn default() -> Self {
        Self {
            radius: Slider::new("radius", 1.0, 0.05, 2.0, 0.05),
            theta: Slider::new("theta", 0.0, -90.0, 90.0, 5.0),
            phi: Slider::new("phi", 0.0, -180.0, 180.0, 5.0),
            width: Slider::new("width", 2.0, 0.1, 4.0, 0.1),
            height: Slider::new("height", 2.0, 0.1, 4.0, 0.1),
            depth: Slider::new("depth", 2.0, 0.1, 4.0, 0.1),
        }
    }
}

/// Primary-coloured cube seen through an orbiting orthographic camera.
#[derive(Debug)]
pub struct Viewer {
    sliders: Sliders,
}

impl Viewer {
    pub fn new() -> Self {
        Self {
            sliders: Sliders::default(),
        }
    }

    fn preset(&mut self, (theta, phi, radius): (f32, f32, f32), commands: &mut Commands) {
        commands.input(self.sliders.theta.set(theta));
        commands.input(self.sliders.phi.set(phi));
        commands.input(self.sliders.radius.set(radius));
    }
}

impl App for Viewer {
    fn setup(&mut self, ctx: &mut SetupCtx<'_>) -> Result<()> {
        let program = ShaderProgram::compile(shaders::VIEWER_VS, shaders::VARYING_COLOR_FS)?;
        ctx.render.use_program(&program);
        ctx.scene.set_depth_test(DepthTest::Less);

        let cube = color_cube(&PRIMARY_PALETTE);
        let geometry = bind_color_cube(ctx.render, &program, &cube)?;
        ctx.scene.add_entry(
            geometry,
            Topology::Triangles,
            0..ColorCube::VERTEX_COUNT,
            Uniforms::new(),
            None,
        );

        // Sizes stay unclamped; the sliders bound them.
        let camera = OrbitCamera::default();
        ctx.channels.register(ParameterChannel::new("radius", camera.radius));
        ctx.channels.register(ParameterChannel::new("theta", camera.theta));
        ctx.channels.register(ParameterChannel::new("phi", camera.phi));
        ctx.channels.register(ParameterChannel::new("half_width", camera.half_width));
        ctx.channels.register(ParameterChannel::new("half_height", camera.half_height));
        ctx.channels.register(ParameterChannel::new("half_depth", camera.half_depth));

        ctx.router.route("theta", "theta", Conversion::DegreesToRadians);
        ctx.router.route("phi", "phi", Conversion::DegreesToRadians);
        ctx.router.route("width", "half_width", Conversion::HalfExtent);
        ctx.router.route("height", "half_height", Conversion::HalfExtent);
        ctx.router.route("depth", "half_depth", Conversion::HalfExtent);
        Ok(())
    }

    fn prepare(&mut self, ctx: &mut TickCtx<'_>) -> Result<()> {
        let channels = ctx.channels;
        let camera = OrbitCamera {
            radius: channels.get_f32("radius")?,
            theta: channels.get_f32("theta")?,
            phi: channels.get_f32("phi")?,
            half_width: channels.get_f32("half_width")?,
            half_height: channels.get_f32("half_height")?,
            half_depth: channels.get_f32("half_depth")?,
        };
        ctx.uniforms.set("model_view", camera.model_view());
        ctx.uniforms.set("projection", camera.projection());
        Ok(())
    }

    fn on_key(&mut self, key: Key, _channels: &Channels, commands: &mut Commands) {
        if common_key(key, commands) {
            return;
        }
        let s = &mut self.sliders;
        let event = match key {
            Key::W => s.theta.increase(),
            Key::S => s.theta.decrease(),
            Key::D => s.phi.increase(),
            Key::A => s.phi.decrease(),
            Key::E => s.radius.increase(),
            Key::Q => s.radius.decrease(),
            Key::Digit2 => s.width.increase(),
            Key::Digit1 => s.width.decrease(),
            Key::Digit4 => s.height.increase(),
            Key::Digit3 => s.height.decrease(),
            Key::Digit6 => s.depth.increase(),
            Key::Digit5 => s.depth.decrease(),
            Key::F => return self.preset(FRONT, commands),
            Key::V => return self.preset(SIDE, commands),
            Key::I => return self.preset(ISOMETRIC, commands),
            _ => return,
        };
        commands.input(event);
    }
}

impl Demo for Viewer {
    fn title(&self) -> &'static str {
        "trellis: viewer"
    }

    fn clear(&self) -> ClearState {
        ClearState::color(Color::WHITE)
    }

    fn controls(&self) -> &'static [&'static str] {
        &[
            "W / S: theta",
            "A / D: phi",
            "Q / E: radius",
            "1 / 2: width, 3 / 4: height, 5 / 6: depth",
            "F: front, V: side, I: isometric",
            "Esc: quit",
        ]
    }
}
