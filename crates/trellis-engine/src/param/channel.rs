use std::f32::consts::TAU;

use super::ParamValue;

/// How out-of-range values are brought back in. Applied per component.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub enum RangePolicy {
    /// Used as-is.
    #[default]
    Unbounded,
    /// Wraps into `[min, max)`.
    Wrap { min: f32, max: f32 },
    /// Clamps into `[min, max]`.
    Clamp { min: f32, max: f32 },
}

impl RangePolicy {
    pub fn apply_f32(&self, v: f32) -> f32 {
        match *self {
            RangePolicy::Unbounded => v,
            RangePolicy::Wrap { min, max } => {
                let span = max - min;
                if !(span > 0.0) || !v.is_finite() {
                    return v;
                }
                let wrapped = min + (v - min).rem_euclid(span);
                // rem_euclid can round up to `span` for tiny negative inputs.
                if wrapped >= max { min } else { wrapped }
            }
            RangePolicy::Clamp { min, max } => v.max(min).min(max),
        }
    }

    pub fn apply(&self, value: ParamValue) -> ParamValue {
        match value {
            ParamValue::Float(v) => ParamValue::Float(self.apply_f32(v)),
            ParamValue::Int(v) => match self {
                RangePolicy::Unbounded => ParamValue::Int(v),
                _ => ParamValue::Int(self.apply_f32(v as f32).round() as i32),
            },
            ParamValue::Vec3(v) => ParamValue::Vec3(v.map(|c| self.apply_f32(c))),
        }
    }
}

/// Source of a per-tick increment.
#[derive(Debug, Clone, PartialEq)]
pub enum Rate {
    Fixed(f32),
    /// Current committed value of another float or int channel.
    Channel(String),
}

/// Which component of a vec3 channel an axis rule advances.
#[derive(Debug, Clone, PartialEq)]
pub enum AxisSelect {
    Fixed(usize),
    /// Current committed value of an int channel; out-of-range axes are ignored.
    Channel(String),
}

/// Continuous change applied once per running tick.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateRule {
    /// `value += rate` (every component of a vec3).
    Increment { rate: Rate },
    /// `value[axis] += rate` on a vec3 channel.
    IncrementAxis { axis: AxisSelect, rate: Rate },
}

/// A named, externally settable value.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterChannel {
    name: String,
    value: ParamValue,
    policy: RangePolicy,
    rule: Option<UpdateRule>,
    revision: u64,
}

impl ParameterChannel {
    pub fn new(name: impl Into<String>, initial: impl Into<ParamValue>) -> Self {
        Self {
            name: name.into(),
            value: initial.into(),
            policy: RangePolicy::Unbounded,
            rule: None,
            revision: 0,
        }
    }

    /// Float angle in radians starting at 0, wrapping into `[0, 2π)`.
    pub fn angle(name: impl Into<String>) -> Self {
        Self::new(name, 0.0f32).with_policy(RangePolicy::Wrap { min: 0.0, max: TAU })
    }

    /// Vec3 of angles in radians, each wrapping into `[0, 2π)`.
    pub fn angles(name: impl Into<String>) -> Self {
        Self::new(name, [0.0f32; 3]).with_policy(RangePolicy::Wrap { min: 0.0, max: TAU })
    }

    pub fn with_policy(mut self, policy: RangePolicy) -> Self {
        self.policy = policy;
        self.value = policy.apply(self.value);
        self
    }

    pub fn with_rule(mut self, rule: UpdateRule) -> Self {
        self.rule = Some(rule);
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn get(&self) -> ParamValue {
        self.value
    }

    #[inline]
    pub fn policy(&self) -> RangePolicy {
        self.policy
    }

    #[inline]
    pub fn rule(&self) -> Option<&UpdateRule> {
        self.rule.as_ref()
    }

    /// Number of committed changes so far.
    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Applies this channel's range policy to `value`.
    pub fn clamp_or_wrap(&self, value: ParamValue) -> ParamValue {
        self.policy.apply(value)
    }

    pub(crate) fn store(&mut self, value: ParamValue) -> bool {
        let value = self.policy.apply(value);
        if value == self.value {
            return false;
        }
        self.value = value;
        self.revision += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn angle_wraps_into_full_turn() {
        let ch = ParameterChannel::angle("theta");
        let cases = [(0.0, 0.0), (TAU, 0.0), (TAU + 1.0, 1.0), (-1.0, TAU - 1.0), (3.0 * TAU + 0.5, 0.5)];
        for (input, expected) in cases {
            let ParamValue::Float(v) = ch.clamp_or_wrap(ParamValue::Float(input)) else {
                panic!("angle stays a float");
            };
            assert!((v - expected).abs() < 1e-4, "{input} -> {v}, expected {expected}");
            assert!((0.0..TAU).contains(&v));
        }
    }

    #[test]
    fn unbounded_is_permissive() {
        let ch = ParameterChannel::new("radius", 1.0f32);
        assert_eq!(ch.clamp_or_wrap(ParamValue::Float(-40.0)), ParamValue::Float(-40.0));
    }

    #[test]
    fn clamp_applies_per_component() {
        let policy = RangePolicy::Clamp { min: 0.0, max: 1.0 };
        assert_eq!(policy.apply(ParamValue::Vec3([-1.0, 0.5, 2.0])), ParamValue::Vec3([0.0, 0.5, 1.0]));
        assert_eq!(policy.apply(ParamValue::Int(7)), ParamValue::Int(1));
    }

    #[test]
    fn store_bumps_revision_only_on_change() {
        let mut ch = ParameterChannel::new("depth", 0);
        assert!(ch.store(ParamValue::Int(3)));
        assert!(!ch.store(ParamValue::Int(3)));
        assert_eq!(ch.revision(), 1);
    }
}
