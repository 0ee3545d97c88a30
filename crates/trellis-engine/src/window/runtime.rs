use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::App;
use crate::device::{Gpu, GpuInit};
use crate::frame::{FrameLoop, LoopConfig, RedrawScheduler, TickOutcome};
use crate::input::platform::winit::translate_key_event;
use crate::input::KeyState;
use crate::render::GpuRenderer;
use crate::time::FrameClock;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    /// Start in `Paused`; the first frame is still drawn.
    pub start_paused: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "trellis".to_string(),
            initial_size: LogicalSize::new(512.0, 512.0),
            start_paused: false,
        }
    }
}

/// Entry point for the windowed runtime.
pub struct Runtime;

impl Runtime {
    /// Opens a window, runs `app`'s setup, starts the frame loop and blocks until exit.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, loop_config: LoopConfig, app: A) -> Result<()>
    where
        A: App + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gpu_init, loop_config, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.failure.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    clock: FrameClock,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<A>
where
    A: App + 'static,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    frame_loop: FrameLoop<RedrawScheduler>,
    window: Option<(WindowId, WindowEntry)>,
    renderer: Option<GpuRenderer>,

    /// Startup error reported from `Runtime::run`.
    failure: Option<anyhow::Error>,
}

impl<A> AppState<A>
where
    A: App + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, loop_config: LoopConfig, app: A) -> Self {
        Self {
            config,
            gpu_init,
            app,
            frame_loop: FrameLoop::new(RedrawScheduler::new(), loop_config),
            window: None,
            renderer: None,
            failure: None,
        }
    }

    fn create_window_entry(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let id = window.id();
        let gpu_init = self.gpu_init.clone();

        let entry = WindowEntryTryBuilder {
            clock: FrameClock::default(),
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed for window")?;

        let (renderer, size) = entry.with_gpu(|gpu| (GpuRenderer::new(gpu), gpu.size()));

        self.frame_loop
            .setup(&mut self.app, (size.width, size.height))
            .context("app setup failed")?;

        if self.config.start_paused {
            self.frame_loop.start_paused();
        } else {
            self.frame_loop.start();
        }

        self.renderer = Some(renderer);
        self.window = Some((id, entry));
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.failure = Some(err);
        self.frame_loop.stop();
        event_loop.exit();
    }

    /// Fires the armed tick against the window surface. Redraws the platform asks for while
    /// nothing is armed (expose, resize while halted) get a one-off repaint tick.
    fn redraw(&mut self) {
        let token = match self.frame_loop.scheduler_mut().take_armed() {
            Some(token) => token,
            None => {
                if !self.frame_loop.request_repaint() {
                    return;
                }
                let scheduler = self.frame_loop.scheduler_mut();
                // Already inside a redraw; don't ask the window for another one.
                scheduler.take_redraw_request();
                let Some(token) = scheduler.take_armed() else {
                    return;
                };
                token
            }
        };

        // Split borrows to avoid `self` capture inside `ouroboros` closures.
        let (app, frame_loop, renderer) = (&mut self.app, &mut self.frame_loop, &mut self.renderer);
        let (Some((_, entry)), Some(renderer)) = (self.window.as_mut(), renderer.as_mut()) else {
            return;
        };

        entry.with_mut(|fields| {
            let time = fields.clock.tick();
            let mut surface = renderer.surface(fields.gpu);
            if let TickOutcome::Fatal { error } = frame_loop.fire(token, app, &mut surface, time) {
                log::error!("render surface lost: {error}");
            }
        });
    }

    fn request_redraw_if_armed(&mut self) {
        if !self.frame_loop.scheduler_mut().take_redraw_request() {
            return;
        }
        if let Some((_, entry)) = &self.window {
            entry.with_window(|w| w.request_redraw());
        }
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: App + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(e) = self.create_window_entry(event_loop) {
            self.fail(event_loop, e);
            return;
        }

        self.request_redraw_if_armed();
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.frame_loop.exit_requested() {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);
        self.request_redraw_if_armed();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        if !matches!(&self.window, Some((id, _)) if *id == window_id) {
            return;
        }

        match &event {
            WindowEvent::CloseRequested => {
                self.frame_loop.stop();
                self.window = None;
                event_loop.exit();
                return;
            }

            WindowEvent::Resized(new_size) => {
                if let Some((_, entry)) = self.window.as_mut() {
                    entry.with_gpu_mut(|gpu| gpu.resize(*new_size));
                }
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some((_, entry)) = self.window.as_mut() {
                    let new_size = entry.with_window(|w| w.inner_size());
                    entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let Some((key, KeyState::Pressed)) = translate_key_event(event) {
                    self.frame_loop.handle_key(key, &mut self.app);
                }
            }

            WindowEvent::RedrawRequested => self.redraw(),

            _ => {}
        }

        if self.frame_loop.exit_requested() {
            event_loop.exit();
        }
    }
}
