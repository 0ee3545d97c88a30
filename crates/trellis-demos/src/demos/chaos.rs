use trellis_engine::binding::AttributeLayout;
use trellis_engine::core::{App, Commands, SetupCtx, TickCtx};
use trellis_engine::geometry::shapes::{chaos_game, DEFAULT_CHAOS_POINTS};
use trellis_engine::geometry::UsageHint;
use trellis_engine::input::Key;
use trellis_engine::paint::Color;
use trellis_engine::param::Channels;
use trellis_engine::render::ClearState;
use trellis_engine::scene::{Topology, Uniforms};
use trellis_engine::shader::ShaderProgram;
use trellis_engine::Result;

use super::{common_key, shaders, Demo};

/// Red Sierpinski points on black, generated once from a seed.
#[derive(Debug)]
pub struct Chaos {
    seed: u64,
}

impl Chaos {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl App for Chaos {
    fn setup(&mut self, ctx: &mut SetupCtx<'_>) -> Result<()> {
        let program = ShaderProgram::compile(shaders::POINTS_VS, shaders::RED_FS)?;
        ctx.render.use_program(&program);

        let points = chaos_game(self.seed, DEFAULT_CHAOS_POINTS);
        let buffer = ctx.render.create_buffer(UsageHint::Static);
        ctx.render.upload(buffer, &points, 2)?;
        ctx.render
            .bind_attribute(&program, "a_position", buffer, AttributeLayout::packed(2))?;

        let count = ctx.render.element_count(buffer)? as u32;
        log::debug!("chaos: {count} points from seed {}", self.seed);

        let geometry = ctx.render.geometry()?;
        ctx.scene
            .add_entry(geometry, Topology::Points, 0..count, Uniforms::new(), None);
        Ok(())
    }

    fn prepare(&mut self, _ctx: &mut TickCtx<'_>) -> Result<()> {
        Ok(())
    }

    fn on_key(&mut self, key: Key, _channels: &Channels, commands: &mut Commands) {
        common_key(key, commands);
    }
}

impl Demo for Chaos {
    fn title(&self) -> &'static str {
        "trellis: chaos game"
    }

    fn clear(&self) -> ClearState {
        ClearState::color(Color::BLACK)
    }
}
