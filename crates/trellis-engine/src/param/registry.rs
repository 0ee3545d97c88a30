use std::collections::BTreeMap;

use crate::error::{EngineError, Result};

use super::{AxisSelect, ParamValue, ParameterChannel, Rate, UpdateRule};

/// Registry of parameter channels with staged writes.
///
/// `set` only records the latest value per channel; [`commit`](Self::commit) makes the
/// staged values visible. Reads always see committed values.
#[derive(Debug, Default)]
pub struct Channels {
    channels: BTreeMap<String, ParameterChannel>,
    pending: BTreeMap<String, ParamValue>,
}

impl Channels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a channel, replacing any channel with the same name.
    pub fn register(&mut self, channel: ParameterChannel) {
        let name = channel.name().to_owned();
        if self.channels.insert(name.clone(), channel).is_some() {
            log::warn!("parameter channel `{name}` registered twice; keeping the latest");
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.channels.contains_key(name)
    }

    pub fn channel(&self, name: &str) -> Result<&ParameterChannel> {
        self.channels
            .get(name)
            .ok_or_else(|| EngineError::ChannelNotFound { name: name.to_owned() })
    }

    // ── writes ───────────────────────────────────────────────────────────

    /// Stages `value` for the next commit. A later `set` before the commit wins.
    ///
    /// Float and int values convert into each other to match the channel.
    pub fn set(&mut self, name: &str, value: impl Into<ParamValue>) -> Result<()> {
        let value = value.into();
        let channel = self.channel(name)?;
        let current = channel.get();
        let coerced = value.coerce_like(&current).ok_or_else(|| EngineError::ChannelType {
            name: name.to_owned(),
            expected: current.kind(),
            actual: value.kind(),
        })?;

        self.pending.insert(name.to_owned(), coerced);
        Ok(())
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Applies staged writes. Returns the number of channels whose value changed.
    pub fn commit(&mut self) -> usize {
        let mut changed = 0;
        for (name, value) in std::mem::take(&mut self.pending) {
            if let Some(channel) = self.channels.get_mut(&name) {
                if channel.store(value) {
                    log::trace!("channel `{name}` = {}", channel.get());
                    changed += 1;
                }
            }
        }
        changed
    }

    /// Runs every channel's update rule once, in name order, against committed values.
    ///
    /// Rules reading a missing or mistyped channel fail the call after the remaining rules
    /// have run; the first such error is returned.
    pub fn apply_rules(&mut self) -> Result<()> {
        let mut updates = Vec::new();
        let mut first_error = None;

        for (name, channel) in &self.channels {
            let Some(rule) = channel.rule() else { continue };
            match self.evaluate(channel.get(), rule) {
                Ok(Some(next)) => updates.push((name.clone(), next)),
                Ok(None) => {}
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }

        for (name, next) in updates {
            if let Some(channel) = self.channels.get_mut(&name) {
                channel.store(next);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn evaluate(&self, current: ParamValue, rule: &UpdateRule) -> Result<Option<ParamValue>> {
        match rule {
            UpdateRule::Increment { rate } => {
                let rate = self.rate(rate)?;
                Ok(Some(match current {
                    ParamValue::Float(v) => ParamValue::Float(v + rate),
                    ParamValue::Int(v) => ParamValue::Int(v + rate.round() as i32),
                    ParamValue::Vec3(v) => ParamValue::Vec3(v.map(|c| c + rate)),
                }))
            }
            UpdateRule::IncrementAxis { axis, rate } => {
                let ParamValue::Vec3(mut v) = current else {
                    return Ok(None);
                };
                let axis = match axis {
                    AxisSelect::Fixed(a) => *a,
                    AxisSelect::Channel(name) => match usize::try_from(self.get_int(name)?) {
                        Ok(a) => a,
                        Err(_) => return Ok(None),
                    },
                };
                let Some(component) = v.get_mut(axis) else {
                    return Ok(None);
                };
                *component += self.rate(rate)?;
                Ok(Some(ParamValue::Vec3(v)))
            }
        }
    }

    fn rate(&self, rate: &Rate) -> Result<f32> {
        match rate {
            Rate::Fixed(r) => Ok(*r),
            Rate::Channel(name) => self.get_f32(name),
        }
    }

    // ── reads ────────────────────────────────────────────────────────────

    pub fn get(&self, name: &str) -> Result<ParamValue> {
        self.channel(name).map(ParameterChannel::get)
    }

    /// Float value; int channels are widened.
    pub fn get_f32(&self, name: &str) -> Result<f32> {
        match self.get(name)? {
            ParamValue::Float(v) => Ok(v),
            ParamValue::Int(v) => Ok(v as f32),
            other => Err(type_error(name, "float", &other)),
        }
    }

    pub fn get_int(&self, name: &str) -> Result<i32> {
        match self.get(name)? {
            ParamValue::Int(v) => Ok(v),
            other => Err(type_error(name, "int", &other)),
        }
    }

    pub fn get_vec3(&self, name: &str) -> Result<[f32; 3]> {
        match self.get(name)? {
            ParamValue::Vec3(v) => Ok(v),
            other => Err(type_error(name, "vec3", &other)),
        }
    }

    /// Number of committed changes to `name`.
    pub fn revision(&self, name: &str) -> Result<u64> {
        self.channel(name).map(ParameterChannel::revision)
    }
}

fn type_error(name: &str, expected: &'static str, actual: &ParamValue) -> EngineError {
    EngineError::ChannelType {
        name: name.to_owned(),
        expected,
        actual: actual.kind(),
    }
}
