//! Shader program lifecycle.
//!
//! Programs are WGSL vertex/fragment pairs. Compilation and linking run on naga (parse,
//! validate, interface checks) so failures surface before any GPU object exists and without
//! requiring a device. The GPU modules themselves are created lazily by the render backend.

mod program;
mod reflect;

pub use program::{
    AttributeLocation, ProgramId, ShaderProgram, UniformLocation, FRAGMENT_ENTRY, UNIFORM_GROUP,
    VERTEX_ENTRY,
};
