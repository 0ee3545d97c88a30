use crate::core::{App, Command, Commands, RenderContext, SetupCtx, TickCtx};
use crate::error::{EngineError, Result};
use crate::input::{InputEvent, InputRouter, Key};
use crate::param::Channels;
use crate::render::{FrameStatus, RenderSurface};
use crate::scene::{DrawFailure, Scene, Uniforms};
use crate::time::{FrameClock, FrameTime};

use super::{LoopConfig, LoopState, ManualScheduler, PausePolicy, Scheduler, TickOutcome, TickToken};

/// Cooperative per-frame driver.
///
/// Owns the render context, the scene, the parameter channels and the frame uniforms.
/// Exactly one tick runs at a time; the next one is scheduled only after the current one
/// has finished (and its buffered commands have been applied).
///
/// Tick steps:
/// 1) commit staged channel writes
/// 2) clear (`RenderSurface::begin_frame`)
/// 3) running only: channel update rules, then [`App::advance`]
/// 4) [`App::prepare`]
/// 5) [`Scene::draw`] with the active program
/// 6) present (`RenderSurface::end_frame`)
/// 7) apply buffered commands, then schedule the next tick if still live
pub struct FrameLoop<S: Scheduler> {
    scheduler: S,
    config: LoopConfig,
    state: LoopState,
    pending: Option<TickToken>,
    /// Paused by [`halt`](Self::halt): no ticks until resumed, whatever the pause policy.
    halted: bool,

    render: RenderContext,
    scene: Scene,
    channels: Channels,
    router: InputRouter,
    uniforms: Uniforms,
    commands: Commands,

    ticks_run: u64,
    frames_drawn: u64,
    exit_requested: bool,
}

struct TickError {
    error: EngineError,
    entry: Option<usize>,
}

impl From<EngineError> for TickError {
    fn from(error: EngineError) -> Self {
        Self { error, entry: None }
    }
}

impl From<DrawFailure> for TickError {
    fn from(f: DrawFailure) -> Self {
        Self {
            error: f.error,
            entry: Some(f.entry),
        }
    }
}

impl<S: Scheduler> FrameLoop<S> {
    pub fn new(scheduler: S, config: LoopConfig) -> Self {
        Self {
            scheduler,
            config,
            state: LoopState::Idle,
            pending: None,
            halted: false,
            render: RenderContext::new(),
            scene: Scene::new(),
            channels: Channels::new(),
            router: InputRouter::new(),
            uniforms: Uniforms::new(),
            commands: Commands::default(),
            ticks_run: 0,
            frames_drawn: 0,
            exit_requested: false,
        }
    }

    /// Runs [`App::setup`]. Any error is fatal to startup; the loop stays `Idle`.
    pub fn setup<A: App + ?Sized>(&mut self, app: &mut A, surface_size: (u32, u32)) -> Result<()> {
        let mut ctx = SetupCtx {
            render: &mut self.render,
            scene: &mut self.scene,
            channels: &mut self.channels,
            router: &mut self.router,
            uniforms: &mut self.uniforms,
            surface_size,
        };
        app.setup(&mut ctx).inspect_err(|e| log::error!("setup failed: {e}"))
    }

    // ── state machine ────────────────────────────────────────────────────

    /// `Idle → Running`; schedules the first tick.
    pub fn start(&mut self) -> bool {
        if self.state != LoopState::Idle {
            log::warn!("frame loop: start ignored in state {:?}", self.state);
            return false;
        }
        self.transition(LoopState::Running);
        self.arm();
        true
    }

    /// `Idle → Paused`; still schedules one tick so the initial state is drawn.
    ///
    /// Under [`PausePolicy::Halt`] nothing is scheduled after that first tick until
    /// `resume`.
    pub fn start_paused(&mut self) -> bool {
        if self.state != LoopState::Idle {
            log::warn!("frame loop: start ignored in state {:?}", self.state);
            return false;
        }
        self.transition(LoopState::Paused);
        self.arm();
        true
    }

    /// `Running → Paused`. Under [`PausePolicy::Halt`] the pending tick is cancelled.
    pub fn pause(&mut self) -> bool {
        if self.state != LoopState::Running {
            return false;
        }
        self.transition(LoopState::Paused);
        if self.config.pause_policy == PausePolicy::Halt {
            self.disarm();
        }
        true
    }

    /// `Running | Paused → Paused` with the pending tick cancelled regardless of the pause
    /// policy. `resume` (or `toggle_pause`) schedules again.
    pub fn halt(&mut self) -> bool {
        if !matches!(self.state, LoopState::Running | LoopState::Paused) {
            return false;
        }
        if self.state != LoopState::Paused {
            self.transition(LoopState::Paused);
        }
        self.halted = true;
        self.disarm();
        true
    }

    /// `Paused → Running`; schedules a tick if none is pending.
    pub fn resume(&mut self) -> bool {
        if self.state != LoopState::Paused {
            return false;
        }
        self.halted = false;
        self.transition(LoopState::Running);
        self.arm();
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        match self.state {
            LoopState::Running => self.pause(),
            LoopState::Paused => self.resume(),
            _ => false,
        }
    }

    /// Any live state `→ Stopped`; cancels the pending tick. Further ticks are ignored.
    pub fn stop(&mut self) -> bool {
        if self.state == LoopState::Stopped {
            return false;
        }
        self.transition(LoopState::Stopped);
        self.disarm();
        true
    }

    fn transition(&mut self, to: LoopState) {
        log::debug!("frame loop: {:?} -> {:?}", self.state, to);
        self.state = to;
    }

    fn arm(&mut self) {
        if self.pending.is_none() {
            self.pending = Some(self.scheduler.schedule_next_tick());
        }
    }

    /// Schedules a one-off tick to redraw the current state, e.g. after the window was
    /// exposed or resized while halted. No-op if a tick is already pending or the loop is
    /// not live.
    pub fn request_repaint(&mut self) -> bool {
        if !matches!(self.state, LoopState::Running | LoopState::Paused) || self.pending.is_some() {
            return false;
        }
        self.pending = Some(self.scheduler.schedule_next_tick());
        true
    }

    fn disarm(&mut self) {
        if let Some(token) = self.pending.take() {
            self.scheduler.cancel(token);
        }
    }

    // ── ticks ────────────────────────────────────────────────────────────

    /// Runs the tick for `token`.
    ///
    /// Tokens other than the pending one (cancelled, stale, fired after `stop`) are
    /// ignored. Errors end the tick early and are logged; scheduling continues unless the
    /// surface is gone.
    pub fn fire<A: App + ?Sized>(
        &mut self,
        token: TickToken,
        app: &mut A,
        surface: &mut dyn RenderSurface,
        time: FrameTime,
    ) -> TickOutcome {
        if self.pending != Some(token) {
            log::trace!("frame loop: ignoring tick {}", token.id());
            return TickOutcome::Ignored;
        }
        self.pending = None;

        if !matches!(self.state, LoopState::Running | LoopState::Paused) {
            return TickOutcome::Ignored;
        }

        self.ticks_run += 1;
        let outcome = self.run_tick(app, surface, time);

        match &outcome {
            TickOutcome::Failed { error, entry: Some(entry) } => {
                log::error!("frame {}: scene entry #{entry} failed: {error}", time.frame_index);
            }
            TickOutcome::Failed { error, entry: None } => {
                log::error!("frame {}: {error}", time.frame_index);
            }
            TickOutcome::Fatal { error } => {
                log::error!("frame {}: {error}; stopping frame loop", time.frame_index);
                self.stop();
                self.exit_requested = true;
            }
            TickOutcome::Skipped => log::warn!("frame {}: surface skipped the frame", time.frame_index),
            _ => {}
        }

        self.apply_buffered();

        match (self.state, self.config.pause_policy) {
            (LoopState::Running, _) => self.arm(),
            (LoopState::Paused, PausePolicy::KeepScheduling) if !self.halted => self.arm(),
            _ => {}
        }

        outcome
    }

    fn run_tick<A: App + ?Sized>(
        &mut self,
        app: &mut A,
        surface: &mut dyn RenderSurface,
        time: FrameTime,
    ) -> TickOutcome {
        self.channels.commit();

        match surface.begin_frame(&self.config.clear) {
            Ok(FrameStatus::Ready) => {}
            Ok(FrameStatus::Skip) => return TickOutcome::Skipped,
            Err(error) => return surface_failure(error),
        }

        let body = self.tick_body(app, surface, time);
        let end = surface.end_frame();

        match (body, end) {
            (Ok(draws), Ok(())) => {
                self.frames_drawn += 1;
                TickOutcome::Drawn { draws }
            }
            (Err(TickError { error, entry }), _) => TickOutcome::Failed { error, entry },
            (Ok(_), Err(error)) => surface_failure(error),
        }
    }

    fn tick_body<A: App + ?Sized>(
        &mut self,
        app: &mut A,
        surface: &mut dyn RenderSurface,
        time: FrameTime,
    ) -> std::result::Result<usize, TickError> {
        let running = self.state == LoopState::Running;
        if running {
            self.channels.apply_rules()?;
        }

        {
            let mut ctx = TickCtx {
                render: &mut self.render,
                scene: &mut self.scene,
                channels: &self.channels,
                uniforms: &mut self.uniforms,
                commands: &mut self.commands,
                time,
                state: self.state,
                surface_size: surface.size(),
            };
            if running {
                app.advance(&mut ctx)?;
            }
            app.prepare(&mut ctx)?;
        }

        let program = self
            .render
            .active_program()
            .cloned()
            .ok_or(EngineError::NoActiveProgram)?;

        let draws = self.scene.draw(&self.render, &program, &self.uniforms, surface)?;
        Ok(draws)
    }

    // ── input & commands ─────────────────────────────────────────────────

    /// Forwards a key press to the app and applies the commands it raised.
    pub fn handle_key<A: App + ?Sized>(&mut self, key: Key, app: &mut A) {
        app.on_key(key, &self.channels, &mut self.commands);
        self.apply_buffered();
    }

    /// Converts `event` through the input router and stages the channel write.
    pub fn handle_input(&mut self, event: &InputEvent) -> Result<()> {
        self.router
            .dispatch(event, &mut self.channels)
            .inspect_err(|e| log::warn!("input `{}` dropped: {e}", event.channel))
    }

    pub fn apply_command(&mut self, command: Command) {
        match command {
            Command::Input(event) => {
                // Already logged by handle_input.
                let _ = self.handle_input(&event);
            }
            Command::Start => {
                self.start();
            }
            Command::Stop => {
                self.stop();
            }
            Command::Pause => {
                self.pause();
            }
            Command::Halt => {
                self.halt();
            }
            Command::Resume => {
                self.resume();
            }
            Command::TogglePause => {
                self.toggle_pause();
            }
            Command::Exit => {
                self.stop();
                self.exit_requested = true;
            }
        }
    }

    fn apply_buffered(&mut self) {
        for command in self.commands.take() {
            self.apply_command(command);
        }
    }

    // ── accessors ────────────────────────────────────────────────────────

    #[inline]
    pub fn state(&self) -> LoopState {
        self.state
    }

    #[inline]
    pub fn config(&self) -> &LoopConfig {
        &self.config
    }

    /// Token the loop will accept next, if any.
    #[inline]
    pub fn pending_token(&self) -> Option<TickToken> {
        self.pending
    }

    /// Ticks that ran (drawn, skipped or failed).
    #[inline]
    pub fn ticks_run(&self) -> u64 {
        self.ticks_run
    }

    /// Ticks that presented a frame without error.
    #[inline]
    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    #[inline]
    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    #[inline]
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    #[inline]
    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    #[inline]
    pub fn render(&self) -> &RenderContext {
        &self.render
    }

    #[inline]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[inline]
    pub fn channels(&self) -> &Channels {
        &self.channels
    }

    #[inline]
    pub fn uniforms(&self) -> &Uniforms {
        &self.uniforms
    }
}

impl FrameLoop<ManualScheduler> {
    /// Fires due tokens until `limit` ticks ran or nothing is scheduled.
    /// Returns the number of tokens fired.
    pub fn run_until_idle<A: App + ?Sized>(
        &mut self,
        limit: usize,
        app: &mut A,
        surface: &mut dyn RenderSurface,
        clock: &mut FrameClock,
    ) -> usize {
        let mut fired = 0;
        while fired < limit {
            let Some(token) = self.scheduler.next_due() else { break };
            self.fire(token, app, surface, clock.tick());
            fired += 1;
        }
        fired
    }
}

fn surface_failure(error: EngineError) -> TickOutcome {
    if matches!(error, EngineError::SurfaceUnavailable { .. }) {
        TickOutcome::Fatal { error }
    } else {
        TickOutcome::Failed { error, entry: None }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::binding::AttributeLayout;
    use crate::geometry::UsageHint;
    use crate::param::{ParameterChannel, Rate, UpdateRule};
    use crate::render::RecordingSurface;
    use crate::scene::Topology;
    use crate::shader::ShaderProgram;

    const VS: &str = r"
        @group(0) @binding(0) var<uniform> u_theta: f32;

        @vertex
        fn vs_main(@location(0) a_position: vec2<f32>) -> @builtin(position) vec4<f32> {
            return vec4<f32>(a_position * cos(u_theta), 0.0, 1.0);
        }
    ";
    const FS: &str = r"
        @fragment
        fn fs_main() -> @location(0) vec4<f32> {
            return vec4<f32>(1.0, 1.0, 1.0, 1.0);
        }
    ";

    /// Spinning triangle: `theta` advances by 0.1 per running tick.
    #[derive(Default)]
    struct Spinner {
        program: Option<ShaderProgram>,
        advanced: usize,
        prepared: usize,
        fail_prepare: bool,
        stop_in_prepare: bool,
    }

    impl App for Spinner {
        fn setup(&mut self, ctx: &mut SetupCtx<'_>) -> Result<()> {
            let program = ShaderProgram::compile(VS, FS)?;
            ctx.render.use_program(&program);
            let buffer = ctx.render.create_buffer(UsageHint::Static);
            ctx.render.upload(buffer, &[0.0, 0.0, 1.0, 0.0, 0.0, 1.0], 2)?;
            ctx.render
                .bind_attribute(&program, "a_position", buffer, AttributeLayout::packed(2))?;
            let geometry = ctx.render.geometry()?;
            ctx.scene
                .add_entry(geometry, Topology::Triangles, 0..3, Uniforms::new(), None);

            ctx.channels.register(
                ParameterChannel::angle("theta").with_rule(UpdateRule::Increment { rate: Rate::Fixed(0.1) }),
            );
            self.program = Some(program);
            Ok(())
        }

        fn advance(&mut self, _ctx: &mut TickCtx<'_>) -> Result<()> {
            self.advanced += 1;
            Ok(())
        }

        fn prepare(&mut self, ctx: &mut TickCtx<'_>) -> Result<()> {
            self.prepared += 1;
            if self.stop_in_prepare {
                ctx.commands.stop();
            }
            if self.fail_prepare {
                return Err(EngineError::ChannelNotFound { name: "missing".into() });
            }
            let theta = ctx.channels.get_f32("theta")?;
            ctx.uniforms.set("u_theta", theta);
            Ok(())
        }

        fn on_key(&mut self, key: Key, _channels: &Channels, commands: &mut Commands) {
            if key == Key::Space {
                commands.toggle_pause();
            }
        }
    }

    fn started(policy: PausePolicy) -> (FrameLoop<ManualScheduler>, Spinner) {
        let config = LoopConfig {
            pause_policy: policy,
            ..LoopConfig::default()
        };
        let mut frame_loop = FrameLoop::new(ManualScheduler::new(), config);
        let mut app = Spinner::default();
        frame_loop.setup(&mut app, (64, 64)).expect("setup");
        assert!(frame_loop.start());
        (frame_loop, app)
    }

    fn clock() -> FrameClock {
        FrameClock::fixed_step(Duration::from_millis(16))
    }

    fn theta(frame_loop: &FrameLoop<ManualScheduler>) -> f32 {
        frame_loop.channels().get_f32("theta").expect("theta")
    }

    // ── lifecycle ────────────────────────────────────────────────────────

    #[test]
    fn start_schedules_exactly_one_tick() {
        let (frame_loop, _) = started(PausePolicy::KeepScheduling);
        assert_eq!(frame_loop.state(), LoopState::Running);
        assert_eq!(frame_loop.scheduler().pending(), 1);
        assert!(frame_loop.pending_token().is_some());
    }

    #[test]
    fn start_twice_is_ignored() {
        let (mut frame_loop, _) = started(PausePolicy::KeepScheduling);
        assert!(!frame_loop.start());
        assert_eq!(frame_loop.scheduler().pending(), 1);
    }

    #[test]
    fn running_ticks_draw_and_advance() {
        let (mut frame_loop, mut app) = started(PausePolicy::KeepScheduling);
        let mut surface = RecordingSurface::new(64, 64);

        let fired = frame_loop.run_until_idle(3, &mut app, &mut surface, &mut clock());

        assert_eq!(fired, 3);
        assert_eq!(frame_loop.frames_drawn(), 3);
        assert_eq!(app.advanced, 3);
        assert_eq!(surface.frames().len(), 3);
        assert_eq!(surface.draw_count(), 3);
        assert!((theta(&frame_loop) - 0.3).abs() < 1e-5);
        // Next tick is armed again.
        assert_eq!(frame_loop.scheduler().pending(), 1);
    }

    #[test]
    fn paused_ticks_redraw_without_advancing() {
        let (mut frame_loop, mut app) = started(PausePolicy::KeepScheduling);
        let mut surface = RecordingSurface::new(64, 64);
        let mut clock = clock();

        frame_loop.run_until_idle(2, &mut app, &mut surface, &mut clock);
        let before = theta(&frame_loop);

        assert!(frame_loop.pause());
        frame_loop.run_until_idle(4, &mut app, &mut surface, &mut clock);

        assert_eq!(theta(&frame_loop), before);
        assert_eq!(app.advanced, 2);
        assert_eq!(app.prepared, 6);
        assert_eq!(frame_loop.frames_drawn(), 6);

        assert!(frame_loop.resume());
        frame_loop.run_until_idle(1, &mut app, &mut surface, &mut clock);
        assert!(theta(&frame_loop) > before);
    }

    #[test]
    fn halt_policy_cancels_pending_tick() {
        let (mut frame_loop, mut app) = started(PausePolicy::Halt);
        let mut surface = RecordingSurface::new(64, 64);

        assert!(frame_loop.pause());
        assert_eq!(frame_loop.scheduler().pending(), 0);
        assert_eq!(frame_loop.run_until_idle(5, &mut app, &mut surface, &mut clock()), 0);

        assert!(frame_loop.resume());
        assert_eq!(frame_loop.scheduler().pending(), 1);
    }

    #[test]
    fn paused_start_draws_one_frame_under_halt_policy() {
        let config = LoopConfig {
            pause_policy: PausePolicy::Halt,
            ..LoopConfig::default()
        };
        let mut frame_loop = FrameLoop::new(ManualScheduler::new(), config);
        let mut app = Spinner::default();
        frame_loop.setup(&mut app, (64, 64)).expect("setup");
        let mut surface = RecordingSurface::new(64, 64);
        let mut clock = clock();

        assert!(frame_loop.start_paused());
        assert_eq!(frame_loop.state(), LoopState::Paused);
        assert_eq!(frame_loop.run_until_idle(5, &mut app, &mut surface, &mut clock), 1);
        assert_eq!(frame_loop.frames_drawn(), 1);
        assert_eq!(app.advanced, 0);
        assert_eq!(frame_loop.scheduler().pending(), 0);

        assert!(frame_loop.resume());
        frame_loop.run_until_idle(2, &mut app, &mut surface, &mut clock);
        assert_eq!(frame_loop.frames_drawn(), 3);
        assert!(theta(&frame_loop) > 0.0);
    }

    #[test]
    fn paused_start_requires_idle() {
        let (mut frame_loop, _) = started(PausePolicy::KeepScheduling);
        assert!(!frame_loop.start_paused());
        assert_eq!(frame_loop.state(), LoopState::Running);
        assert_eq!(frame_loop.scheduler().pending(), 1);
    }

    #[test]
    fn halt_cancels_even_when_keep_scheduling() {
        let (mut frame_loop, mut app) = started(PausePolicy::KeepScheduling);
        let mut surface = RecordingSurface::new(64, 64);
        let mut clock = clock();
        frame_loop.run_until_idle(1, &mut app, &mut surface, &mut clock);

        assert!(frame_loop.halt());
        assert_eq!(frame_loop.state(), LoopState::Paused);
        assert_eq!(frame_loop.scheduler().pending(), 0);
        assert_eq!(frame_loop.run_until_idle(5, &mut app, &mut surface, &mut clock), 0);

        assert!(frame_loop.toggle_pause());
        assert_eq!(frame_loop.state(), LoopState::Running);
        assert_eq!(frame_loop.run_until_idle(2, &mut app, &mut surface, &mut clock), 2);
        assert_eq!(frame_loop.frames_drawn(), 3);
        assert_eq!(frame_loop.scheduler().pending(), 1);
    }

    #[test]
    fn halt_while_paused_stops_the_paused_redraws() {
        let (mut frame_loop, mut app) = started(PausePolicy::KeepScheduling);
        let mut surface = RecordingSurface::new(64, 64);
        let mut clock = clock();

        assert!(frame_loop.pause());
        frame_loop.run_until_idle(2, &mut app, &mut surface, &mut clock);
        assert_eq!(frame_loop.scheduler().pending(), 1);

        frame_loop.apply_command(Command::Halt);
        assert_eq!(frame_loop.state(), LoopState::Paused);
        assert_eq!(frame_loop.scheduler().pending(), 0);
        assert_eq!(frame_loop.run_until_idle(5, &mut app, &mut surface, &mut clock), 0);
        assert!(!frame_loop.exit_requested());
    }

    #[test]
    fn repaint_fires_once_while_halted() {
        let (mut frame_loop, mut app) = started(PausePolicy::Halt);
        let mut surface = RecordingSurface::new(64, 64);
        let mut clock = clock();

        assert!(!frame_loop.request_repaint());
        assert!(frame_loop.pause());
        assert!(frame_loop.request_repaint());
        assert!(!frame_loop.request_repaint());

        assert_eq!(frame_loop.run_until_idle(5, &mut app, &mut surface, &mut clock), 1);
        assert_eq!(frame_loop.frames_drawn(), 1);
        assert_eq!(app.advanced, 0);
        assert_eq!(frame_loop.pending_token(), None);
    }

    #[test]
    fn repaint_is_refused_once_stopped() {
        let (mut frame_loop, _) = started(PausePolicy::KeepScheduling);
        assert!(frame_loop.stop());
        assert!(!frame_loop.request_repaint());
        assert_eq!(frame_loop.scheduler().pending(), 0);
    }

    #[test]
    fn stop_is_terminal() {
        let (mut frame_loop, mut app) = started(PausePolicy::KeepScheduling);
        let mut surface = RecordingSurface::new(64, 64);
        let token = frame_loop.pending_token().expect("armed");

        assert!(frame_loop.stop());
        assert_eq!(frame_loop.scheduler().pending(), 0);
        assert!(!frame_loop.start());
        assert!(!frame_loop.resume());

        let outcome = frame_loop.fire(token, &mut app, &mut surface, FrameTime::fixed(0, 0.016));
        assert_eq!(outcome, TickOutcome::Ignored);
        assert_eq!(frame_loop.ticks_run(), 0);
    }

    #[test]
    fn stop_raised_mid_tick_prevents_rescheduling() {
        let (mut frame_loop, mut app) = started(PausePolicy::KeepScheduling);
        app.stop_in_prepare = true;
        let mut surface = RecordingSurface::new(64, 64);

        let fired = frame_loop.run_until_idle(10, &mut app, &mut surface, &mut clock());

        assert_eq!(fired, 1);
        assert_eq!(frame_loop.state(), LoopState::Stopped);
        assert_eq!(frame_loop.ticks_run(), 1);
        assert_eq!(frame_loop.pending_token(), None);
    }

    #[test]
    fn stale_token_is_ignored() {
        let (mut frame_loop, mut app) = started(PausePolicy::KeepScheduling);
        let mut surface = RecordingSurface::new(64, 64);
        let first = frame_loop.scheduler_mut().next_due().expect("due");
        frame_loop.fire(first, &mut app, &mut surface, FrameTime::fixed(0, 0.016));

        let again = frame_loop.fire(first, &mut app, &mut surface, FrameTime::fixed(1, 0.016));
        assert_eq!(again, TickOutcome::Ignored);
        assert_eq!(frame_loop.ticks_run(), 1);
    }

    // ── failures ─────────────────────────────────────────────────────────

    #[test]
    fn failed_tick_keeps_scheduling() {
        let (mut frame_loop, mut app) = started(PausePolicy::KeepScheduling);
        app.fail_prepare = true;
        let mut surface = RecordingSurface::new(64, 64);

        let token = frame_loop.scheduler_mut().next_due().expect("due");
        let outcome = frame_loop.fire(token, &mut app, &mut surface, FrameTime::fixed(0, 0.016));

        assert!(matches!(outcome, TickOutcome::Failed { entry: None, .. }));
        assert_eq!(frame_loop.frames_drawn(), 0);
        assert_eq!(frame_loop.state(), LoopState::Running);
        assert_eq!(frame_loop.scheduler().pending(), 1);
        // The frame was still closed.
        assert_eq!(surface.frames().len(), 1);
    }

    #[test]
    fn lost_surface_stops_the_loop() {
        let (mut frame_loop, mut app) = started(PausePolicy::KeepScheduling);
        let mut surface = RecordingSurface::new(64, 64);
        surface.lose();

        let token = frame_loop.scheduler_mut().next_due().expect("due");
        let outcome = frame_loop.fire(token, &mut app, &mut surface, FrameTime::fixed(0, 0.016));

        assert!(matches!(outcome, TickOutcome::Fatal { error: EngineError::SurfaceUnavailable { .. } }));
        assert_eq!(frame_loop.state(), LoopState::Stopped);
        assert!(frame_loop.exit_requested());
        assert_eq!(frame_loop.scheduler().pending(), 0);
    }

    #[test]
    fn skipped_frame_commits_but_does_not_draw() {
        let (mut frame_loop, mut app) = started(PausePolicy::KeepScheduling);
        let mut surface = RecordingSurface::new(64, 64);
        surface.skip_frames(1);
        frame_loop.handle_input(&InputEvent::new("theta", 1.0)).expect("input");

        let token = frame_loop.scheduler_mut().next_due().expect("due");
        let outcome = frame_loop.fire(token, &mut app, &mut surface, FrameTime::fixed(0, 0.016));

        assert_eq!(outcome, TickOutcome::Skipped);
        assert_eq!(theta(&frame_loop), 1.0);
        assert_eq!(app.prepared, 0);
        assert!(surface.frames().is_empty());
        assert_eq!(frame_loop.scheduler().pending(), 1);
    }

    #[test]
    fn draw_outside_a_frame_is_not_fatal() {
        let outcome = surface_failure(EngineError::FrameNotStarted);
        assert!(matches!(outcome, TickOutcome::Failed { entry: None, .. }));

        let gone = surface_failure(EngineError::SurfaceUnavailable { reason: "lost".into() });
        assert!(matches!(gone, TickOutcome::Fatal { .. }));
    }

    // ── input ────────────────────────────────────────────────────────────

    #[test]
    fn input_is_visible_from_the_next_tick() {
        let (mut frame_loop, mut app) = started(PausePolicy::KeepScheduling);
        let mut surface = RecordingSurface::new(64, 64);
        assert!(frame_loop.pause());

        frame_loop.handle_input(&InputEvent::new("theta", 2.0)).expect("input");
        assert_eq!(theta(&frame_loop), 0.0);

        frame_loop.run_until_idle(1, &mut app, &mut surface, &mut clock());
        assert_eq!(theta(&frame_loop), 2.0);

        let draw = &surface.last_frame().expect("frame").draws[0];
        assert_eq!(draw.uniform(0), Some(bytemuck::bytes_of(&2.0f32)));
    }

    #[test]
    fn key_commands_toggle_pause() {
        let (mut frame_loop, mut app) = started(PausePolicy::KeepScheduling);

        frame_loop.handle_key(Key::Space, &mut app);
        assert_eq!(frame_loop.state(), LoopState::Paused);
        frame_loop.handle_key(Key::Space, &mut app);
        assert_eq!(frame_loop.state(), LoopState::Running);
        // Still exactly one tick in flight.
        assert_eq!(frame_loop.scheduler().pending(), 1);
    }

    #[test]
    fn exit_command_stops_and_flags() {
        let (mut frame_loop, _) = started(PausePolicy::KeepScheduling);
        frame_loop.apply_command(Command::Exit);
        assert_eq!(frame_loop.state(), LoopState::Stopped);
        assert!(frame_loop.exit_requested());
    }
}
