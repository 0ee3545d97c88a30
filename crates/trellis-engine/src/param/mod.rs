//! Named parameters read by the frame loop.
//!
//! External writes are staged and become visible at the next commit; the loop commits once
//! at the start of every tick, so a tick never observes two values for one channel.

mod channel;
mod registry;
mod value;

pub use channel::{AxisSelect, ParameterChannel, RangePolicy, Rate, UpdateRule};
pub use registry::Channels;
pub use value::ParamValue;
