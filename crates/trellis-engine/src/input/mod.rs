//! Input boundary.
//!
//! Public API is platform-agnostic and does not expose winit types. The runtime translates
//! keyboard events into [`Key`]s; apps turn keys into [`InputEvent`]s which the
//! [`InputRouter`] converts into parameter channel writes.

pub(crate) mod platform;
mod router;
mod slider;
mod types;

pub use router::{Conversion, InputRouter};
pub use slider::Slider;
pub use types::{InputEvent, Key, KeyState};
