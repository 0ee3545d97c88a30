//! Vertex attribute bindings.
//!
//! A binding wires one geometry buffer to one named vertex input of a program. Bindings
//! capture the buffer generation they were made against; draws refuse bindings whose buffer
//! has been re-uploaded since.

mod attribute;
mod layout;
mod state;

pub use attribute::{AttributeBinding, Geometry};
pub use layout::AttributeLayout;
pub(crate) use state::VertexState;
