use std::collections::HashMap;

use crate::error::Result;
use crate::param::{Channels, ParamValue};

use super::InputEvent;

/// Unit conversion from raw input values to channel values.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub enum Conversion {
    #[default]
    Identity,
    DegreesToRadians,
    Scale(f32),
    /// `raw / 2`, for extents given as full widths.
    HalfExtent,
    /// Nearest integer.
    Round,
}

impl Conversion {
    pub fn apply(self, raw: f32) -> ParamValue {
        match self {
            Conversion::Identity => ParamValue::Float(raw),
            Conversion::DegreesToRadians => ParamValue::Float(raw.to_radians()),
            Conversion::Scale(k) => ParamValue::Float(raw * k),
            Conversion::HalfExtent => ParamValue::Float(raw * 0.5),
            Conversion::Round => ParamValue::Int(raw.round() as i32),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Route {
    channel: String,
    conversion: Conversion,
}

/// Maps input events onto channel writes.
///
/// Inputs without a route write their raw value to the channel of the same name.
#[derive(Debug, Default)]
pub struct InputRouter {
    routes: HashMap<String, Route>,
}

impl InputRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes `input` to `channel` through `conversion`.
    pub fn route(&mut self, input: impl Into<String>, channel: impl Into<String>, conversion: Conversion) {
        self.routes.insert(
            input.into(),
            Route {
                channel: channel.into(),
                conversion,
            },
        );
    }

    /// Builder form of [`route`](Self::route).
    pub fn with_route(mut self, input: impl Into<String>, channel: impl Into<String>, conversion: Conversion) -> Self {
        self.route(input, channel, conversion);
        self
    }

    /// Converts `event` and stages the result on its channel.
    pub fn dispatch(&self, event: &InputEvent, channels: &mut Channels) -> Result<()> {
        let (channel, conversion) = match self.routes.get(&event.channel) {
            Some(route) => (route.channel.as_str(), route.conversion),
            None => (event.channel.as_str(), Conversion::Identity),
        };

        let value = conversion.apply(event.raw);
        log::trace!("input `{}` ({}) -> channel `{channel}` = {value}", event.channel, event.raw);
        channels.set(channel, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::param::ParameterChannel;

    fn channels() -> Channels {
        let mut c = Channels::new();
        c.register(ParameterChannel::angle("theta"));
        c.register(ParameterChannel::new("right", 1.0f32));
        c.register(ParameterChannel::new("depth", 0));
        c
    }

    #[test]
    fn conversions() {
        assert_eq!(Conversion::HalfExtent.apply(3.0), ParamValue::Float(1.5));
        assert_eq!(Conversion::Scale(0.1).apply(50.0), ParamValue::Float(5.0));
        assert_eq!(Conversion::Round.apply(2.5), ParamValue::Int(3));
        let ParamValue::Float(r) = Conversion::DegreesToRadians.apply(180.0) else {
            panic!("radians are floats");
        };
        assert!((r - std::f32::consts::PI).abs() < 1e-6);
    }

    #[test]
    fn routed_event_is_converted_and_staged() {
        let router = InputRouter::new()
            .with_route("theta_slider", "theta", Conversion::DegreesToRadians)
            .with_route("width_slider", "right", Conversion::HalfExtent);
        let mut c = channels();

        router.dispatch(&InputEvent::new("width_slider", 4.0), &mut c).expect("dispatch");
        router.dispatch(&InputEvent::new("theta_slider", 90.0), &mut c).expect("dispatch");
        assert_eq!(c.get_f32("right"), Ok(1.0), "not visible before commit");

        c.commit();
        assert_eq!(c.get_f32("right"), Ok(2.0));
        let theta = c.get_f32("theta").expect("theta");
        assert!((theta - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn unrouted_event_targets_same_name() {
        let router = InputRouter::new();
        let mut c = channels();
        router.dispatch(&InputEvent::new("depth", 4.0), &mut c).expect("dispatch");
        c.commit();
        assert_eq!(c.get_int("depth"), Ok(4));
    }

    #[test]
    fn unknown_channel_surfaces_an_error() {
        let router = InputRouter::new();
        let mut c = channels();
        assert_eq!(
            router.dispatch(&InputEvent::new("zoom", 1.0), &mut c),
            Err(EngineError::ChannelNotFound { name: "zoom".into() })
        );
    }
}
