use trellis_engine::binding::AttributeLayout;
use trellis_engine::core::{App, Commands, SetupCtx, TickCtx};
use trellis_engine::geometry::UsageHint;
use trellis_engine::input::Key;
use trellis_engine::paint::Color;
use trellis_engine::param::Channels;
use trellis_engine::render::ClearState;
use trellis_engine::scene::{DepthTest, Topology, Uniforms};
use trellis_engine::shader::ShaderProgram;
use trellis_engine::Result;

use super::{common_key, shaders, Demo};

/// Six xyz vertices: two triangles in one buffer.
const POSITIONS: [f32; 18] = [
    0.4, 0.5, 0.0, //
    -0.4, 0.5, 0.2, //
    0.0, -0.5, 0.1, //
    -0.5, -0.5, 0.1, //
    0.5, -0.5, 0.1, //
    0.0, 0.0, 0.1,
];

const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
const BLUE: [f32; 4] = [0.0, 0.0, 1.0, 1.0];

/// A red and a blue triangle drawn from sub-ranges of a single buffer.
#[derive(Debug, Default)]
pub struct Triangles;

impl App for Triangles {
    fn setup(&mut self, ctx: &mut SetupCtx<'_>) -> Result<()> {
        let program = ShaderProgram::compile(shaders::FLAT_VS, shaders::UNIFORM_COLOR_FS)?;
        ctx.render.use_program(&program);
        ctx.scene.set_depth_test(DepthTest::LessEqual);

        let buffer = ctx.render.create_buffer(UsageHint::Static);
        ctx.render.upload(buffer, &POSITIONS, 3)?;
        ctx.render
            .bind_attribute(&program, "a_position", buffer, AttributeLayout::packed(3))?;

        let geometry = ctx.render.geometry()?;
        for (range, color) in [(0..3, RED), (3..6, BLUE)] {
            ctx.scene.add_entry(
                geometry.clone(),
                Topology::Triangles,
                range,
                Uniforms::new().with("u_color", color),
                None,
            );
        }
        Ok(())
    }

    fn prepare(&mut self, _ctx: &mut TickCtx<'_>) -> Result<()> {
        Ok(())
    }

    fn on_key(&mut self, key: Key, _channels: &Channels, commands: &mut Commands) {
        common_key(key, commands);
    }
}

impl Demo for Triangles {
    fn title(&self) -> &'static str {
        "trellis: triangles"
    }

    fn clear(&self) -> ClearState {
        ClearState::color(Color::rgb(0.0, 1.0, 0.0))
    }
}
