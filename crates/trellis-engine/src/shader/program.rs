use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use naga::valid::{Capabilities, ValidationFlags, Validator};

use crate::error::{EngineError, Result, ShaderStage};

use super::reflect::{self, InterfaceVar, UniformVar};

/// Entry point name expected in the vertex source.
pub const VERTEX_ENTRY: &str = "vs_main";
/// Entry point name expected in the fragment source.
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// Bind group holding every uniform of a program.
pub const UNIFORM_GROUP: u32 = 0;

static NEXT_PROGRAM_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a linked program.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ProgramId(u64);

impl ProgramId {
    fn next() -> Self {
        Self(NEXT_PROGRAM_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Resolved vertex attribute: shader location plus the declared component count.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct AttributeLocation {
    pub location: u32,
    pub components: u32,
}

/// Resolved uniform: binding slot within [`UNIFORM_GROUP`] plus its byte size.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct UniformLocation {
    pub binding: u32,
    pub size: u32,
}

/// A linked vertex/fragment pair.
///
/// Both stages are parsed and validated up front; reflection data (attribute and uniform
/// locations) is computed once at link time and kept for the program lifetime. The value is
/// immutable afterwards and cheap to clone.
#[derive(Debug, Clone)]
pub struct ShaderProgram {
    id: ProgramId,
    vertex_source: Arc<str>,
    fragment_source: Arc<str>,
    attributes: Arc<HashMap<String, AttributeLocation>>,
    uniforms: Arc<HashMap<String, UniformLocation>>,
}

impl ShaderProgram {
    /// Compiles and links a WGSL vertex/fragment pair.
    ///
    /// Errors:
    /// - [`EngineError::ShaderCompile`] if either stage fails to parse or validate
    /// - [`EngineError::ShaderLink`] if the stages compiled but do not fit together
    pub fn compile(vertex_source: &str, fragment_source: &str) -> Result<Self> {
        let vertex = compile_stage(ShaderStage::Vertex, vertex_source)?;
        let fragment = compile_stage(ShaderStage::Fragment, fragment_source)?;

        let linked = link(&vertex, &fragment).map_err(|log| {
            log::error!("shader program failed to link: {log}");
            EngineError::ShaderLink { log }
        })?;

        let program = Self {
            id: ProgramId::next(),
            vertex_source: Arc::from(vertex_source),
            fragment_source: Arc::from(fragment_source),
            attributes: Arc::new(linked.attributes),
            uniforms: Arc::new(linked.uniforms),
        };

        log::debug!(
            "linked program {:?}: {} attribute(s), {} uniform(s)",
            program.id,
            program.attributes.len(),
            program.uniforms.len()
        );

        Ok(program)
    }

    #[inline]
    pub fn id(&self) -> ProgramId {
        self.id
    }

    pub fn vertex_source(&self) -> &str {
        &self.vertex_source
    }

    pub fn fragment_source(&self) -> &str {
        &self.fragment_source
    }

    /// Looks up a vertex attribute by name.
    pub fn attribute_location(&self, name: &str) -> Result<AttributeLocation> {
        self.attributes
            .get(name)
            .copied()
            .ok_or_else(|| EngineError::LocationNotFound { name: name.to_owned() })
    }

    /// Looks up a uniform by name.
    pub fn uniform_location(&self, name: &str) -> Result<UniformLocation> {
        self.uniforms
            .get(name)
            .copied()
            .ok_or_else(|| EngineError::LocationNotFound { name: name.to_owned() })
    }

    /// Uniforms sorted by binding slot.
    pub fn uniforms(&self) -> Vec<(&str, UniformLocation)> {
        let mut out: Vec<_> = self.uniforms.iter().map(|(n, u)| (n.as_str(), *u)).collect();
        out.sort_by_key(|(_, u)| u.binding);
        out
    }

    /// Attributes sorted by shader location.
    pub fn attributes(&self) -> Vec<(&str, AttributeLocation)> {
        let mut out: Vec<_> = self.attributes.iter().map(|(n, a)| (n.as_str(), *a)).collect();
        out.sort_by_key(|(_, a)| a.location);
        out
    }
}

impl PartialEq for ShaderProgram {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ShaderProgram {}

// ── compile ───────────────────────────────────────────────────────────────

struct CompiledStage {
    module: naga::Module,
}

fn compile_stage(stage: ShaderStage, source: &str) -> Result<CompiledStage> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| {
        let log = e.emit_to_string(source);
        log::error!("{stage} shader failed to parse:\n{log}");
        EngineError::ShaderCompile { stage, log }
    })?;

    Validator::new(ValidationFlags::all(), Capabilities::default())
        .validate(&module)
        .map_err(|e| {
            let log = e.emit_to_string(source);
            log::error!("{stage} shader failed validation:\n{log}");
            EngineError::ShaderCompile { stage, log }
        })?;

    Ok(CompiledStage { module })
}

// ── link ──────────────────────────────────────────────────────────────────

struct Linked {
    attributes: HashMap<String, AttributeLocation>,
    uniforms: HashMap<String, UniformLocation>,
}

fn link(vertex: &CompiledStage, fragment: &CompiledStage) -> std::result::Result<Linked, String> {
    let vs = reflect::find_entry_point(&vertex.module, VERTEX_ENTRY, naga::ShaderStage::Vertex)
        .ok_or_else(|| format!("vertex stage has no `@vertex fn {VERTEX_ENTRY}`"))?;
    let fs = reflect::find_entry_point(&fragment.module, FRAGMENT_ENTRY, naga::ShaderStage::Fragment)
        .ok_or_else(|| format!("fragment stage has no `@fragment fn {FRAGMENT_ENTRY}`"))?;

    let varyings = reflect::entry_outputs(&vertex.module, vs);
    for input in reflect::entry_inputs(&fragment.module, fs) {
        check_varying(&input, &varyings)?;
    }

    let mut attributes = HashMap::new();
    for input in reflect::entry_inputs(&vertex.module, vs) {
        let Some(name) = input.name else {
            return Err(format!("vertex input at location {} has no name", input.location));
        };
        if !input.is_float || input.components == 0 {
            return Err(format!("vertex input `{name}` must be an f32 scalar or vector"));
        }
        attributes.insert(
            name,
            AttributeLocation {
                location: input.location,
                components: input.components,
            },
        );
    }

    let mut uniforms: HashMap<String, UniformLocation> = HashMap::new();
    let mut by_binding: HashMap<u32, UniformVar> = HashMap::new();
    let declared = reflect::uniforms(&vertex.module)
        .into_iter()
        .chain(reflect::uniforms(&fragment.module));

    for var in declared {
        if var.group != UNIFORM_GROUP {
            return Err(format!(
                "uniform `{}` is in group {}; only group {UNIFORM_GROUP} is supported",
                var.name, var.group
            ));
        }
        if let Some(prev) = by_binding.get(&var.binding) {
            if prev.name != var.name || prev.size != var.size {
                return Err(format!(
                    "binding {} is `{}` ({} bytes) in one stage and `{}` ({} bytes) in the other",
                    var.binding, prev.name, prev.size, var.name, var.size
                ));
            }
            continue;
        }
        if let Some(existing) = uniforms.get(&var.name) {
            return Err(format!(
                "uniform `{}` is declared at bindings {} and {}",
                var.name, existing.binding, var.binding
            ));
        }
        uniforms.insert(
            var.name.clone(),
            UniformLocation {
                binding: var.binding,
                size: var.size,
            },
        );
        by_binding.insert(var.binding, var);
    }

    Ok(Linked { attributes, uniforms })
}

fn check_varying(input: &InterfaceVar, varyings: &[InterfaceVar]) -> std::result::Result<(), String> {
    let label = input.name.as_deref().unwrap_or("<unnamed>");
    let Some(out) = varyings.iter().find(|v| v.location == input.location) else {
        return Err(format!(
            "fragment input `{label}` at location {} is not written by the vertex stage",
            input.location
        ));
    };
    if out.components != input.components || out.is_float != input.is_float {
        return Err(format!(
            "fragment input `{label}` at location {} does not match the vertex output type",
            input.location
        ));
    }
    Ok(())
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
        @group(0) @binding(0) var<uniform> u_color: vec4<f32>;

        @fragment
        fn fs_main() -> @location(0) vec4<f32> {
            return u_color;
        }
    ";

    // ── compile ───────────────────────────────────────────────────────────

    #[test]
    fn valid_pair_links() {
        let program = ShaderProgram::compile(VS, FS).expect("program links");

        let pos = program.attribute_location("a_position").expect("attribute");
        assert_eq!(pos, AttributeLocation { location: 0, components: 2 });

        let color = program.uniform_location("u_color").expect("uniform");
        assert_eq!(color, UniformLocation { binding: 0, size: 16 });
    }

    #[test]
    fn invalid_fragment_source_is_a_compile_error() {
        let broken = "@fragment fn fs_main() -> @location(0) vec4<f32> { return oops; }";
        match ShaderProgram::compile(VS, broken) {
            Err(EngineError::ShaderCompile { stage, log }) => {
                assert_eq!(stage, ShaderStage::Fragment);
                assert!(!log.is_empty());
            }
            other => panic!("expected a fragment compile error, got {other:?}"),
        }
    }

    #[test]
    fn invalid_vertex_source_reports_vertex_stage() {
        let broken = "@vertex fn vs_main( -> @builtin(position) vec4<f32> {}";
        let err = ShaderProgram::compile(broken, FS).unwrap_err();
        assert!(matches!(err, EngineError::ShaderCompile { stage: ShaderStage::Vertex, .. }));
    }

    #[test]
    fn type_error_fails_validation() {
        let mistyped = r"
            @fragment
            fn fs_main() -> @location(0) vec4<f32> {
                let x: f32 = 1.0;
                return x;
            }
        ";
        let err = ShaderProgram::compile(VS, mistyped).unwrap_err();
        assert!(matches!(err, EngineError::ShaderCompile { stage: ShaderStage::Fragment, .. }));
    }

    // ── link ──────────────────────────────────────────────────────────────

    #[test]
    fn missing_entry_point_is_a_link_error() {
        let wrong_name = r"
            @fragment
            fn main() -> @location(0) vec4<f32> {
                return vec4<f32>(1.0);
            }
        ";
        let err = ShaderProgram::compile(VS, wrong_name).unwrap_err();
        assert!(matches!(err, EngineError::ShaderLink { .. }));
    }

    #[test]
    fn unmatched_varying_is_a_link_error() {
        let wants_color = r"
            @fragment
            fn fs_main(@location(0) color: vec4<f32>) -> @location(0) vec4<f32> {
                return color;
            }
        ";
        let err = ShaderProgram::compile(VS, wants_color).unwrap_err();
        assert!(matches!(err, EngineError::ShaderLink { .. }));
    }

    #[test]
    fn conflicting_uniform_bindings_are_a_link_error() {
        let vs = r"
            @group(0) @binding(0) var<uniform> u_scale: f32;

            @vertex
            fn vs_main(@location(0) a_position: vec2<f32>) -> @builtin(position) vec4<f32> {
                return vec4<f32>(a_position * u_scale, 0.0, 1.0);
            }
        ";
        let err = ShaderProgram::compile(vs, FS).unwrap_err();
        assert!(matches!(err, EngineError::ShaderLink { .. }));
    }

    #[test]
    fn shared_uniform_declared_in_both_stages_links() {
        let vs = r"
            @group(0) @binding(0) var<uniform> u_color: vec4<f32>;

            @vertex
            fn vs_main(@location(0) a_position: vec2<f32>) -> @builtin(position) vec4<f32> {
                return vec4<f32>(a_position, u_color.a, 1.0);
            }
        ";
        let program = ShaderProgram::compile(vs, FS).expect("links");
        assert_eq!(program.uniforms().len(), 1);
    }

    // ── lookup ────────────────────────────────────────────────────────────

    #[test]
    fn unknown_names_fail_explicitly() {
        let program = ShaderProgram::compile(VS, FS).expect("program links");

        assert_eq!(
            program.attribute_location("vPosition"),
            Err(EngineError::LocationNotFound { name: "vPosition".into() })
        );
        assert!(matches!(
            program.uniform_location("theta"),
            Err(EngineError::LocationNotFound { .. })
        ));
    }

    #[test]
    fn each_compile_gets_a_fresh_identity() {
        let a = ShaderProgram::compile(VS, FS).expect("links");
        let b = ShaderProgram::compile(VS, FS).expect("links");
        assert_ne!(a.id(), b.id());
        assert_eq!(a.clone(), a);
    }
}
