use std::f32::consts::PI;

use trellis_engine::core::{App, Commands, SetupCtx, TickCtx};
use trellis_engine::geometry::shapes::{color_cube, ColorCube, MUTED_PALETTE};
use trellis_engine::input::{Conversion, InputEvent, Key, Slider};
use trellis_engine::paint::Color;
use trellis_engine::param::{AxisSelect, Channels, ParameterChannel, RangePolicy, Rate, UpdateRule};
use trellis_engine::render::ClearState;
use trellis_engine::scene::{DepthTest, Topology, Uniforms};
use trellis_engine::shader::ShaderProgram;
use trellis_engine::Result;

use super::{bind_color_cube, common_key, shaders, Demo};

/// Slider units are tenths of a degree per tick.
const SPEED_SCALE: f32 = PI / 1800.0;
const INITIAL_SPEED: f32 = 10.0;

/// Solid-faced cube spinning about one axis at a time. Starts paused.
#[derive(Debug)]
pub struct Cube {
    speed: Slider,
}

impl Cube {
    pub fn new() -> Self {
        Self {
            speed: Slider::new("speed", INITIAL_SPEED, 0.0, 100.0, 5.0),
        }
    }
}

impl App for Cube {
    fn setup(&mut self, ctx: &mut SetupCtx<'_>) -> Result<()> {
        let program = ShaderProgram::compile(shaders::CUBE_VS, shaders::VARYING_COLOR_FS)?;
        ctx.render.use_program(&program);
        ctx.scene.set_depth_test(DepthTest::Less);

        let cube = color_cube(&MUTED_PALETTE);
        let geometry = bind_color_cube(ctx.render, &program, &cube)?;
        ctx.scene.add_entry(
            geometry,
            Topology::Triangles,
            0..ColorCube::VERTEX_COUNT,
            Uniforms::new(),
            None,
        );

        ctx.channels
            .register(ParameterChannel::new("speed", self.speed.value() * SPEED_SCALE));
        ctx.channels
            .register(ParameterChannel::new("axis", 0).with_policy(RangePolicy::Clamp { min: 0.0, max: 2.0 }));
        ctx.channels.register(ParameterChannel::angles("theta").with_rule(UpdateRule::IncrementAxis {
            axis: AxisSelect::Channel("axis".into()),
            rate: Rate::Channel("speed".into()),
        }));

        ctx.router.route("speed", "speed", Conversion::Scale(SPEED_SCALE));
        ctx.router.route("axis", "axis", Conversion::Round);
        Ok(())
    }

    fn prepare(&mut self, ctx: &mut TickCtx<'_>) -> Result<()> {
        let theta = ctx.channels.get_vec3("theta")?;
        ctx.uniforms.set("theta", theta);
        Ok(())
    }

    fn on_key(&mut self, key: Key, _channels: &Channels, commands: &mut Commands) {
        if common_key(key, commands) {
            return;
        }
        match key {
            Key::Enter => commands.resume(),
            Key::Space => commands.toggle_pause(),
            Key::S => commands.halt(),
            Key::X => commands.input(InputEvent::new("axis", 0.0)),
            Key::Y => commands.input(InputEvent::new("axis", 1.0)),
            Key::Z => commands.input(InputEvent::new("axis", 2.0)),
            Key::ArrowUp => commands.input(self.speed.increase()),
            Key::ArrowDown => commands.input(self.speed.decrease()),
            _ => {}
        }
    }
}

impl Demo for Cube {
    fn title(&self) -> &'static str {
        "trellis: colour cube"
    }

    fn clear(&self) -> ClearState {
        ClearState::color(Color::WHITE)
    }

    fn start_paused(&self) -> bool {
        true
    }

    fn controls(&self) -> &'static [&'static str] {
        &[
            "Enter: start",
            "Space: pause / resume",
            "S: stop (Enter / Space restarts)",
            "X / Y / Z: rotation axis",
            "Up / Down: speed",
            "Esc: quit",
        ]
    }
}
