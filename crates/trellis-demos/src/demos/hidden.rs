use trellis_engine::binding::AttributeLayout;
use trellis_engine::core::{App, Commands, SetupCtx, TickCtx};
use trellis_engine::geometry::shapes::depth_quads;
use trellis_engine::geometry::UsageHint;
use trellis_engine::input::Key;
use trellis_engine::paint::Color;
use trellis_engine::param::Channels;
use trellis_engine::render::ClearState;
use trellis_engine::scene::{DepthTest, Topology, Uniforms};
use trellis_engine::shader::ShaderProgram;
use trellis_engine::Result;

use super::{common_key, shaders, Demo};

/// Two overlapping squares with the depth test off; depth keys alone decide which
/// ends up on top.
#[derive(Debug, Default)]
pub struct Hidden;

impl App for Hidden {
    fn setup(&mut self, ctx: &mut SetupCtx<'_>) -> Result<()> {
        let program = ShaderProgram::compile(shaders::FLAT_VS, shaders::UNIFORM_COLOR_FS)?;
        ctx.render.use_program(&program);
        ctx.scene.set_depth_test(DepthTest::Disabled);

        // Pushed front first so the sort has something to do.
        for quad in depth_quads().into_iter().rev() {
            let buffer = ctx.render.create_buffer(UsageHint::Static);
            ctx.render.upload(buffer, &quad.positions, 3)?;
            ctx.render
                .bind_attribute(&program, "a_position", buffer, AttributeLayout::packed(3))?;

            let geometry = ctx.render.geometry()?;
            ctx.scene.add_entry(
                geometry,
                Topology::TriangleFan,
                0..4,
                Uniforms::new().with("u_color", quad.color),
                Some(quad.depth),
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

impl Demo for Hidden {
    fn title(&self) -> &'static str {
        "trellis: hidden surface"
    }

    fn clear(&self) -> ClearState {
        ClearState::color(Color::BLACK)
    }
}
