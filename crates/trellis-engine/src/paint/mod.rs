//! Color representation shared by clear state and demos.

mod color;

pub use color::Color;
