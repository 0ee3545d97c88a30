//! Core engine-facing contracts.
//!
//! This module defines the interface between the frame loop and applications: the explicit
//! render context, the app trait with its per-phase contexts, and the command buffer.

mod app;
mod command;
mod ctx;

pub use app::{App, SetupCtx, TickCtx};
pub use command::{Command, Commands};
pub use ctx::RenderContext;
