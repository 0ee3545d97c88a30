use crate::error::EngineError;
use crate::render::ClearState;

/// Frame loop lifecycle: `Idle → Running ⇄ Paused → Stopped`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum LoopState {
    #[default]
    Idle,
    Running,
    Paused,
    /// Terminal.
    Stopped,
}

/// What a paused loop does with its schedule.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum PausePolicy {
    /// Keep ticking: clear and redraw unchanged state, skip continuous updates.
    #[default]
    KeepScheduling,
    /// Cancel the pending tick on pause; `resume` schedules again.
    Halt,
}

/// Frame loop configuration.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct LoopConfig {
    pub pause_policy: PausePolicy,
    pub clear: ClearState,
}

/// What one `fire` did.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Token was not the pending one, or the loop is not live.
    Ignored,
    /// Frame presented with this many draw calls.
    Drawn { draws: usize },
    /// Surface asked to skip this frame.
    Skipped,
    /// The tick ended early; scheduling continues. `entry` is the scene entry that
    /// failed, if the failure happened while drawing.
    Failed { error: EngineError, entry: Option<usize> },
    /// The surface is gone; the loop has stopped.
    Fatal { error: EngineError },
}
