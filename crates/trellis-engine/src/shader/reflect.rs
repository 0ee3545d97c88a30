//! naga-based reflection over a validated WGSL module.

use naga::{AddressSpace, Binding, Module, ScalarKind, TypeInner};

/// A location-bound value crossing a stage boundary (vertex input, varying, ...).
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct InterfaceVar {
    pub name: Option<String>,
    pub location: u32,
    /// Scalar count (1 for `f32`, 2..=4 for vectors); 0 for anything else.
    pub components: u32,
    pub is_float: bool,
}

/// A `var<uniform>` declaration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct UniformVar {
    pub name: String,
    pub group: u32,
    pub binding: u32,
    pub size: u32,
}

pub(crate) fn find_entry_point<'m>(
    module: &'m Module,
    name: &str,
    stage: naga::ShaderStage,
) -> Option<&'m naga::EntryPoint> {
    module
        .entry_points
        .iter()
        .find(|ep| ep.name == name && ep.stage == stage)
}

/// Location-bound inputs of an entry point, including members of struct arguments.
pub(crate) fn entry_inputs(module: &Module, ep: &naga::EntryPoint) -> Vec<InterfaceVar> {
    let mut out = Vec::new();
    for arg in &ep.function.arguments {
        collect_bound(module, arg.name.as_deref(), arg.ty, arg.binding.as_ref(), &mut out);
    }
    out
}

/// Location-bound outputs of an entry point (the function result, flattened).
pub(crate) fn entry_outputs(module: &Module, ep: &naga::EntryPoint) -> Vec<InterfaceVar> {
    let mut out = Vec::new();
    if let Some(result) = &ep.function.result {
        collect_bound(module, None, result.ty, result.binding.as_ref(), &mut out);
    }
    out
}

fn collect_bound(
    module: &Module,
    name: Option<&str>,
    ty: naga::Handle<naga::Type>,
    binding: Option<&Binding>,
    out: &mut Vec<InterfaceVar>,
) {
    match binding {
        Some(Binding::Location { location, .. }) => {
            let (components, is_float) = shape_of(&module.types[ty].inner);
            out.push(InterfaceVar {
                name: name.map(str::to_owned),
                location: *location,
                components,
                is_float,
            });
        }
        Some(Binding::BuiltIn(_)) => {}
        None => {
            if let TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for member in members {
                    collect_bound(module, member.name.as_deref(), member.ty, member.binding.as_ref(), out);
                }
            }
        }
    }
}

fn shape_of(inner: &TypeInner) -> (u32, bool) {
    match inner {
        TypeInner::Scalar(scalar) => (1, scalar.kind == ScalarKind::Float),
        TypeInner::Vector { size, scalar } => (*size as u32, scalar.kind == ScalarKind::Float),
        _ => (0, false),
    }
}

/// All `var<uniform>` globals with their resource binding and byte size.
///
/// Uniforms without a `@group/@binding` never pass validation, so they are not expected here.
pub(crate) fn uniforms(module: &Module) -> Vec<UniformVar> {
    let gctx = module.to_ctx();
    module
        .global_variables
        .iter()
        .filter(|(_, var)| var.space == AddressSpace::Uniform)
        .filter_map(|(_, var)| {
            let binding = var.binding.as_ref()?;
            let size = module.types[var.ty].inner.try_size(gctx)?;
            Some(UniformVar {
                name: var.name.clone().unwrap_or_default(),
                group: binding.group,
                binding: binding.binding,
                size,
            })
        })
        .collect()
}
