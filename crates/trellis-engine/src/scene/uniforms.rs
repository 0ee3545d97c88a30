use std::collections::BTreeMap;

use glam::Mat4;

use crate::error::{EngineError, Result};
use crate::shader::ShaderProgram;

/// A value for one uniform. Byte sizes follow the WGSL uniform layout.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Int(i32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    /// Column-major, as WGSL `mat4x4<f32>`.
    Mat4(Mat4),
}

impl UniformValue {
    pub fn size(&self) -> u32 {
        match self {
            UniformValue::Float(_) | UniformValue::Int(_) => 4,
            UniformValue::Vec2(_) => 8,
            UniformValue::Vec3(_) => 12,
            UniformValue::Vec4(_) => 16,
            UniformValue::Mat4(_) => 64,
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            UniformValue::Float(v) => bytemuck::bytes_of(v).to_vec(),
            UniformValue::Int(v) => bytemuck::bytes_of(v).to_vec(),
            UniformValue::Vec2(v) => bytemuck::cast_slice(v).to_vec(),
            UniformValue::Vec3(v) => bytemuck::cast_slice(v).to_vec(),
            UniformValue::Vec4(v) => bytemuck::cast_slice(v).to_vec(),
            UniformValue::Mat4(m) => bytemuck::cast_slice(&m.to_cols_array()).to_vec(),
        }
    }
}

impl From<f32> for UniformValue {
    fn from(v: f32) -> Self {
        UniformValue::Float(v)
    }
}

impl From<[f32; 3]> for UniformValue {
    fn from(v: [f32; 3]) -> Self {
        UniformValue::Vec3(v)
    }
}

impl From<[f32; 4]> for UniformValue {
    fn from(v: [f32; 4]) -> Self {
        UniformValue::Vec4(v)
    }
}

impl From<Mat4> for UniformValue {
    fn from(m: Mat4) -> Self {
        UniformValue::Mat4(m)
    }
}

/// Named uniform values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Uniforms {
    values: BTreeMap<String, UniformValue>,
}

impl Uniforms {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<UniformValue>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<UniformValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&UniformValue> {
        self.values.get(name)
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &UniformValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Uniform bytes ready for one binding slot.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformSlot {
    pub binding: u32,
    pub bytes: Vec<u8>,
}

/// Builds the full uniform set for one draw of `program`.
///
/// Entry values win over frame values. Every uniform the program declares gets a slot;
/// unset ones are zero-filled. Entry values naming a uniform the program lacks fail with
/// [`EngineError::LocationNotFound`]; frame values the program does not use are skipped.
pub fn resolve_uniforms(
    program: &ShaderProgram,
    frame: &Uniforms,
    entry: &Uniforms,
) -> Result<Vec<UniformSlot>> {
    for (name, _) in entry.iter() {
        program.uniform_location(name)?;
    }

    let mut slots = Vec::new();
    for (name, location) in program.uniforms() {
        let bytes = match entry.get(name).or_else(|| frame.get(name)) {
            Some(value) => {
                if value.size() != location.size {
                    return Err(EngineError::UniformMismatch {
                        name: name.to_owned(),
                        expected: location.size,
                        actual: value.size(),
                    });
                }
                value.to_bytes()
            }
            None => vec![0; location.size as usize],
        };
        slots.push(UniformSlot {
            binding: location.binding,
            bytes,
        });
    }
    Ok(slots)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VS: &str = r"
        @group(0) @binding(0) var<uniform> u_offset: vec3<f32>;

        @vertex
        fn vs_main(@location(0) a_position: vec4<f32>) -> @builtin(position) vec4<f32> {
            return a_position + vec4<f32>(u_offset, 0.0);
        }
    ";
    const FS: &str = r"
        @group(0) @binding(1) var<uniform> u_color: vec4<f32>;

        @fragment
        fn fs_main() -> @location(0) vec4<f32> {
            return u_color;
        }
    ";

    fn program() -> ShaderProgram {
        ShaderProgram::compile(VS, FS).expect("test program links")
    }

    #[test]
    fn entry_values_override_frame_values() {
        let frame = Uniforms::new().with("u_color", [1.0f32, 0.0, 0.0, 1.0]);
        let entry = Uniforms::new().with("u_color", [0.0f32, 0.0, 1.0, 1.0]);

        let slots = resolve_uniforms(&program(), &frame, &entry).expect("resolve");
        let color = slots.iter().find(|s| s.binding == 1).expect("color slot");
        assert_eq!(color.bytes, UniformValue::Vec4([0.0, 0.0, 1.0, 1.0]).to_bytes());
    }

    #[test]
    fn unset_uniforms_are_zero_filled() {
        let slots = resolve_uniforms(&program(), &Uniforms::new(), &Uniforms::new()).expect("resolve");
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0], UniformSlot { binding: 0, bytes: vec![0; 12] });
        assert_eq!(slots[1].bytes.len(), 16);
    }

    #[test]
    fn size_mismatch_is_reported() {
        let entry = Uniforms::new().with("u_color", 1.0f32);
        let err = resolve_uniforms(&program(), &Uniforms::new(), &entry).unwrap_err();
        assert_eq!(
            err,
            EngineError::UniformMismatch { name: "u_color".into(), expected: 16, actual: 4 }
        );
    }

    #[test]
    fn unknown_entry_uniform_fails_but_unknown_frame_uniform_is_skipped() {
        let frame = Uniforms::new().with("u_time", 1.0f32);
        assert!(resolve_uniforms(&program(), &frame, &Uniforms::new()).is_ok());

        let entry = Uniforms::new().with("u_time", 1.0f32);
        assert_eq!(
            resolve_uniforms(&program(), &Uniforms::new(), &entry),
            Err(EngineError::LocationNotFound { name: "u_time".into() })
        );
    }

    #[test]
    fn matrices_are_column_major() {
        let m = Mat4::from_translation(glam::Vec3::new(1.0, 2.0, 3.0));
        let bytes = UniformValue::Mat4(m).to_bytes();
        let translation: &[u8] = bytemuck::cast_slice(&[1.0f32, 2.0, 3.0]);
        assert_eq!(&bytes[48..60], translation);
    }
}
