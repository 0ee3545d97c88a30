use std::fmt;

/// Value held by a [`ParameterChannel`](super::ParameterChannel).
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ParamValue {
    Float(f32),
    Int(i32),
    Vec3([f32; 3]),
}

impl ParamValue {
    pub fn kind(&self) -> &'static str {
        match self {
            ParamValue::Float(_) => "float",
            ParamValue::Int(_) => "int",
            ParamValue::Vec3(_) => "vec3",
        }
    }

    /// Converts to the variant of `like`. Float and int convert into each other (ints
    /// round to nearest); vec3 only matches vec3.
    pub fn coerce_like(self, like: &ParamValue) -> Option<ParamValue> {
        match (self, like) {
            (ParamValue::Float(v), ParamValue::Float(_)) => Some(ParamValue::Float(v)),
            (ParamValue::Int(v), ParamValue::Float(_)) => Some(ParamValue::Float(v as f32)),
            (ParamValue::Int(v), ParamValue::Int(_)) => Some(ParamValue::Int(v)),
            (ParamValue::Float(v), ParamValue::Int(_)) if v.is_finite() => {
                Some(ParamValue::Int(v.round() as i32))
            }
            (ParamValue::Vec3(v), ParamValue::Vec3(_)) => Some(ParamValue::Vec3(v)),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Float(v) => write!(f, "{v}"),
            ParamValue::Int(v) => write!(f, "{v}"),
            ParamValue::Vec3([x, y, z]) => write!(f, "({x}, {y}, {z})"),
        }
    }
}

impl From<f32> for ParamValue {
    fn from(v: f32) -> Self {
        ParamValue::Float(v)
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        ParamValue::Int(v)
    }
}

impl From<[f32; 3]> for ParamValue {
    fn from(v: [f32; 3]) -> Self {
        ParamValue::Vec3(v)
    }
}
