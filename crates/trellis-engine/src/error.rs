use std::fmt;

use thiserror::Error;

/// Pipeline stage a shader diagnostic refers to.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Error taxonomy for the renderer core.
///
/// Startup errors (`SurfaceUnavailable`, `ShaderCompile`, `ShaderLink`) are fatal and
/// keep the frame loop from starting. Everything else is raised per operation; inside a
/// tick it ends that frame early and is logged by the loop.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("{stage} shader failed to compile:\n{log}")]
    ShaderCompile { stage: ShaderStage, log: String },

    #[error("shader program failed to link: {log}")]
    ShaderLink { log: String },

    #[error("no attribute or uniform named `{name}` in the program")]
    LocationNotFound { name: String },

    #[error("invalid geometry: {len} values cannot be grouped by {group_size}")]
    InvalidGeometry { len: usize, group_size: usize },

    #[error("attribute `{name}` is not an input of the vertex stage")]
    AttributeNotFound { name: String },

    #[error("stale binding for attribute location {location}: {reason}")]
    StaleBinding { location: u32, reason: String },

    #[error("render surface unavailable: {reason}")]
    SurfaceUnavailable { reason: String },

    #[error("invalid layout for attribute `{name}`: {reason}")]
    InvalidAttributeLayout { name: String, reason: String },

    #[error("uniform `{name}` expects {expected} bytes, got {actual}")]
    UniformMismatch { name: String, expected: u32, actual: u32 },

    #[error("unknown geometry buffer #{index}")]
    UnknownBuffer { index: usize },

    #[error("no parameter channel named `{name}`")]
    ChannelNotFound { name: String },

    #[error("parameter channel `{name}` holds a {actual}, not a {expected}")]
    ChannelType { name: String, expected: &'static str, actual: &'static str },

    #[error("vertex range {start}..{end} exceeds the {available} vertices bound at location {location}")]
    VertexRangeOutOfBounds { start: u32, end: u32, available: u32, location: u32 },

    #[error("no shader program is active")]
    NoActiveProgram,

    #[error("draw issued outside begin_frame/end_frame")]
    FrameNotStarted,
}

impl EngineError {
    /// Returns true for errors that keep the frame loop from starting.
    pub fn is_startup_fatal(&self) -> bool {
        matches!(
            self,
            EngineError::ShaderCompile { .. }
                | EngineError::ShaderLink { .. }
                | EngineError::SurfaceUnavailable { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
