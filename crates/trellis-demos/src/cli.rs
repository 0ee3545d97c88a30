use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "trellis-demos",
    version,
    about = "Small interactive rendering demos on the trellis engine"
)]
pub struct Cli {
    /// Demo to run.
    #[arg(value_enum, value_name = "DEMO")]
    pub demo: DemoKind,

    /// Run against an in-memory surface instead of opening a window.
    #[arg(long)]
    pub headless: bool,

    /// Ticks to run in headless mode.
    #[arg(long, value_name = "N", default_value_t = 120)]
    pub frames: usize,

    /// Seed for the chaos game.
    #[arg(long, value_name = "N", default_value_t = 1)]
    pub seed: u64,

    /// Log filter in `env_logger` syntax; falls back to `RUST_LOG`.
    #[arg(long, value_name = "FILTER", env = "TRELLIS_LOG")]
    pub log: Option<String>,

    /// Cancel scheduling while paused instead of redrawing unchanged frames.
    #[arg(long)]
    pub halt_on_pause: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum DemoKind {
    /// Sierpinski points from the chaos game.
    Chaos,
    /// Two coloured triangles from one buffer.
    Triangles,
    /// Two overlapping squares drawn back to front.
    Hidden,
    /// Rotating colour cube with start/stop/pause.
    Cube,
    /// Orbit viewer with an orthographic camera.
    Viewer,
    /// Recursive triangle subdivision.
    Gasket,
}
