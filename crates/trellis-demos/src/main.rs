mod cli;
mod demos;
mod headless;

use anyhow::Result;
use clap::Parser;

use trellis_engine::device::GpuInit;
use trellis_engine::frame::{LoopConfig, PausePolicy};
use trellis_engine::logging::{init_logging, LoggingConfig};
use trellis_engine::window::{Runtime, RuntimeConfig};

use crate::cli::{Cli, DemoKind};
use crate::demos::{Chaos, Cube, Demo, Gasket, Hidden, Triangles, Viewer};

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(LoggingConfig {
        env_filter: cli.log.clone(),
        ..LoggingConfig::default()
    });

    match cli.demo {
        DemoKind::Chaos => launch(Chaos::new(cli.seed), &cli),
        DemoKind::Triangles => launch(Triangles::default(), &cli),
        DemoKind::Hidden => launch(Hidden::default(), &cli),
        DemoKind::Cube => launch(Cube::new(), &cli),
        DemoKind::Viewer => launch(Viewer::new(), &cli),
        DemoKind::Gasket => launch(Gasket::new(), &cli),
    }
}

fn launch<D: Demo>(demo: D, cli: &Cli) -> Result<()> {
    let loop_config = LoopConfig {
        pause_policy: if cli.halt_on_pause {
            PausePolicy::Halt
        } else {
            PausePolicy::KeepScheduling
        },
        clear: demo.clear(),
    };

    log::info!("{}", demo.title());
    for line in demo.controls() {
        log::info!("  {line}");
    }

    if cli.headless {
        return headless::run(demo, loop_config, cli.frames);
    }

    let config = RuntimeConfig {
        title: demo.title().to_string(),
        start_paused: demo.start_paused(),
        ..RuntimeConfig::default()
    };
    // Colours are authored for a plain (non-sRGB) canvas.
    let gpu_init = GpuInit {
        prefer_srgb: false,
        ..GpuInit::default()
    };

    Runtime::run(config, gpu_init, loop_config, demo)
}
