use crate::binding::{AttributeBinding, AttributeLayout, Geometry, VertexState};
use crate::error::{EngineError, Result};
use crate::geometry::{BufferHandle, GeometryStore, UsageHint};
use crate::shader::ShaderProgram;

/// Explicit render state: geometry buffers, the active program and its enabled attributes.
///
/// One instance is owned by the frame loop and lent to the app during setup and ticks.
#[derive(Debug, Default)]
pub struct RenderContext {
    geometry: GeometryStore,
    active: Option<ShaderProgram>,
    vertex_state: VertexState,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    // ── programs ─────────────────────────────────────────────────────────

    /// Makes `program` the target of subsequent binds and draws.
    ///
    /// Switching to a different program disables every enabled attribute; they must be
    /// bound again for the new program.
    pub fn use_program(&mut self, program: &ShaderProgram) {
        if self.vertex_state.switch_program(program.id()) {
            log::debug!("program {:?} active; enabled attributes cleared", program.id());
        }
        self.active = Some(program.clone());
    }

    #[inline]
    pub fn active_program(&self) -> Option<&ShaderProgram> {
        self.active.as_ref()
    }

    // ── geometry ─────────────────────────────────────────────────────────

    pub fn create_buffer(&mut self, usage: UsageHint) -> BufferHandle {
        self.geometry.create(usage)
    }

    /// Replaces a buffer's contents. Bindings made before this call become stale.
    pub fn upload(&mut self, buffer: BufferHandle, values: &[f32], group_size: usize) -> Result<()> {
        self.geometry.upload(buffer, values, group_size)
    }

    pub fn element_count(&self, buffer: BufferHandle) -> Result<usize> {
        self.geometry.element_count(buffer)
    }

    #[inline]
    pub fn geometry_store(&self) -> &GeometryStore {
        &self.geometry
    }

    // ── attributes ───────────────────────────────────────────────────────

    /// Binds `buffer` to the vertex input `name` of the active `program`.
    ///
    /// Binding the same buffer with the same layout at the same generation is a no-op.
    pub fn bind_attribute(
        &mut self,
        program: &ShaderProgram,
        name: &str,
        buffer: BufferHandle,
        layout: AttributeLayout,
    ) -> Result<AttributeBinding> {
        match &self.active {
            Some(active) if active.id() == program.id() => {}
            _ => return Err(EngineError::NoActiveProgram),
        }

        let location = program
            .attribute_location(name)
            .map_err(|_| EngineError::AttributeNotFound { name: name.to_owned() })?;
        layout.validate(name)?;
        let generation = self.geometry.generation(buffer)?;

        let binding = AttributeBinding {
            program: program.id(),
            name: name.into(),
            location: location.location,
            buffer,
            layout,
            generation,
        };

        if self.vertex_state.enable(binding.clone()) {
            log::trace!(
                "bound `{name}` (location {}) to buffer #{} at generation {generation}",
                location.location,
                buffer.index()
            );
        }
        Ok(binding)
    }

    /// The binding currently enabled at `location`, if any.
    pub fn enabled_attribute(&self, location: u32) -> Option<&AttributeBinding> {
        self.vertex_state.get(location)
    }

    pub fn enabled_attribute_count(&self) -> usize {
        self.vertex_state.len()
    }

    /// Snapshot of the enabled attributes for use in scene entries.
    pub fn geometry(&self) -> Result<Geometry> {
        self.vertex_state.snapshot().ok_or(EngineError::NoActiveProgram)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VS: &str = r"
        @vertex
        fn vs_main(@location(0) a_position: vec2<f32>) -> @builtin(position) vec4<f32> {
            return vec4<f32>(a_position, 0.0, 1.0);
        }
    ";
    const FS: &str = r"
        @fragment
        fn fs_main() -> @location(0) vec4<f32> {
            return vec4<f32>(1.0, 0.0, 0.0, 1.0);
        }
    ";

    fn program() -> ShaderProgram {
        ShaderProgram::compile(VS, FS).expect("test program links")
    }

    fn ctx_with_points() -> (RenderContext, ShaderProgram, BufferHandle) {
        let mut ctx = RenderContext::new();
        let program = program();
        ctx.use_program(&program);
        let buffer = ctx.create_buffer(UsageHint::Static);
        ctx.upload(buffer, &[0.0, 0.0, 1.0, 1.0], 2).expect("upload");
        (ctx, program, buffer)
    }

    // ── binding ──────────────────────────────────────────────────────────

    #[test]
    fn bind_requires_active_program() {
        let mut ctx = RenderContext::new();
        let program = program();
        let buffer = ctx.create_buffer(UsageHint::Static);

        let err = ctx
            .bind_attribute(&program, "a_position", buffer, AttributeLayout::packed(2))
            .unwrap_err();
        assert_eq!(err, EngineError::NoActiveProgram);
    }

    #[test]
    fn unknown_attribute_is_reported_by_name() {
        let (mut ctx, program, buffer) = ctx_with_points();
        let err = ctx
            .bind_attribute(&program, "a_color", buffer, AttributeLayout::packed(4))
            .unwrap_err();
        assert_eq!(err, EngineError::AttributeNotFound { name: "a_color".into() });
    }

    #[test]
    fn rebinding_is_idempotent() {
        let (mut ctx, program, buffer) = ctx_with_points();
        let a = ctx
            .bind_attribute(&program, "a_position", buffer, AttributeLayout::packed(2))
            .expect("bind");
        let b = ctx
            .bind_attribute(&program, "a_position", buffer, AttributeLayout::packed(2))
            .expect("rebind");

        assert_eq!(a, b);
        assert_eq!(ctx.enabled_attribute_count(), 1);
    }

    #[test]
    fn upload_makes_bindings_stale() {
        let (mut ctx, program, buffer) = ctx_with_points();
        let binding = ctx
            .bind_attribute(&program, "a_position", buffer, AttributeLayout::packed(2))
            .expect("bind");
        assert!(binding.is_current(ctx.geometry_store()));

        ctx.upload(buffer, &[0.5, 0.5], 2).expect("re-upload");
        assert!(!binding.is_current(ctx.geometry_store()));
        assert!(matches!(
            binding.ensure_current(ctx.geometry_store()),
            Err(EngineError::StaleBinding { location: 0, .. })
        ));
    }

    // ── program switch ───────────────────────────────────────────────────

    #[test]
    fn switching_program_clears_enabled_attributes() {
        let (mut ctx, first, buffer) = ctx_with_points();
        ctx.bind_attribute(&first, "a_position", buffer, AttributeLayout::packed(2))
            .expect("bind");

        let second = program();
        ctx.use_program(&second);
        assert_eq!(ctx.enabled_attribute_count(), 0);

        // Re-using the same program keeps state.
        ctx.bind_attribute(&second, "a_position", buffer, AttributeLayout::packed(2))
            .expect("bind");
        ctx.use_program(&second);
        assert_eq!(ctx.enabled_attribute_count(), 1);
    }

    #[test]
    fn geometry_snapshot_is_sorted_and_tagged() {
        let (mut ctx, program, buffer) = ctx_with_points();
        ctx.bind_attribute(&program, "a_position", buffer, AttributeLayout::packed(2))
            .expect("bind");

        let geometry = ctx.geometry().expect("snapshot");
        assert_eq!(geometry.program(), program.id());
        assert_eq!(geometry.bindings().len(), 1);
        assert_eq!(geometry.vertex_count(ctx.geometry_store()), Ok(2));
    }

    #[test]
    fn geometry_without_program_fails() {
        let ctx = RenderContext::new();
        assert_eq!(ctx.geometry(), Err(EngineError::NoActiveProgram));
    }
}
