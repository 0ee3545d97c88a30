use trellis_engine::binding::AttributeLayout;
use trellis_engine::core::{App, Commands, RenderContext, SetupCtx, TickCtx};
use trellis_engine::geometry::shapes::{GasketCache, MAX_GASKET_DEPTH};
use trellis_engine::geometry::{BufferHandle, UsageHint};
use trellis_engine::input::{Conversion, Key, Slider};
use trellis_engine::paint::Color;
use trellis_engine::param::{Channels, ParameterChannel, RangePolicy};
use trellis_engine::render::ClearState;
use trellis_engine::scene::{Scene, Topology, Uniforms};
use trellis_engine::shader::ShaderProgram;
use trellis_engine::Result;

use super::{common_key, shaders, Demo};

/// Recursively subdivided triangle; the depth slider rebuilds the geometry.
#[derive(Debug)]
pub struct Gasket {
    depth: Slider,
    cache: GasketCache,
    program: Option<ShaderProgram>,
    buffer: Option<BufferHandle>,
    shown: Option<u32>,
}

impl Gasket {
    pub fn new() -> Self {
        Self {
            depth: Slider::new("depth", 0.0, 0.0, MAX_GASKET_DEPTH as f32, 1.0),
            cache: GasketCache::new(),
            program: None,
            buffer: None,
            shown: None,
        }
    }

    /// Uploads the triangles for `depth` and rebuilds the scene around them.
    fn show(&mut self, depth: u32, render: &mut RenderContext, scene: &mut Scene) -> Result<()> {
        let (Some(program), Some(buffer)) = (&self.program, self.buffer) else {
            return Ok(());
        };

        let points = self.cache.get(depth);
        render.upload(buffer, &points, 2)?;
        render.bind_attribute(program, "a_position", buffer, AttributeLayout::packed(2))?;
        let count = render.element_count(buffer)? as u32;

        scene.clear();
        scene.add_entry(render.geometry()?, Topology::Triangles, 0..count, Uniforms::new(), None);

        log::debug!("gasket: depth {depth}, {count} vertices");
        self.shown = Some(depth);
        Ok(())
    }
}

impl App for Gasket {
    fn setup(&mut self, ctx: &mut SetupCtx<'_>) -> Result<()> {
        let program = ShaderProgram::compile(shaders::POINTS_VS, shaders::RED_FS)?;
        ctx.render.use_program(&program);
        self.program = Some(program);
        self.buffer = Some(ctx.render.create_buffer(UsageHint::Dynamic));

        ctx.channels.register(
            ParameterChannel::new("depth", self.depth.value() as i32).with_policy(RangePolicy::Clamp {
                min: 0.0,
                max: MAX_GASKET_DEPTH as f32,
            }),
        );
        ctx.router.route("depth", "depth", Conversion::Round);

        self.show(self.depth.value() as u32, ctx.render, ctx.scene)
    }

    fn prepare(&mut self, ctx: &mut TickCtx<'_>) -> Result<()> {
        let depth = ctx.channels.get_int("depth")?.max(0) as u32;
        if self.shown != Some(depth) {
            self.show(depth, ctx.render, ctx.scene)?;
        }
        Ok(())
    }

    fn on_key(&mut self, key: Key, _channels: &Channels, commands: &mut Commands) {
        if common_key(key, commands) {
            return;
        }
        match key {
            Key::ArrowUp => commands.input(self.depth.increase()),
            Key::ArrowDown => commands.input(self.depth.decrease()),
            _ => {}
        }
    }
}

impl Demo for Gasket {
    fn title(&self) -> &'static str {
        "trellis: gasket"
    }

    fn clear(&self) -> ClearState {
        ClearState::color(Color::rgb(0.4, 0.5, 1.0))
    }

    fn controls(&self) -> &'static [&'static str] {
        &["Up / Down: subdivision depth", "Esc: quit"]
    }
}
