use std::time::{Duration, Instant};

/// Frame timing snapshot handed to each tick.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameTime {
    /// Time elapsed since the previous tick, in seconds.
    pub dt: f32,

    /// Total of all `dt`s so far, in seconds.
    pub elapsed: f32,

    /// Monotonic tick counter.
    pub frame_index: u64,
}

impl FrameTime {
    /// Snapshot for frame `frame_index` of a fixed-step timeline.
    pub fn fixed(frame_index: u64, dt: f32) -> Self {
        Self {
            dt,
            elapsed: dt * frame_index as f32,
            frame_index,
        }
    }
}

#[derive(Debug, Clone)]
enum Source {
    Realtime { last: Instant },
    FixedStep(Duration),
}

/// Frame clock producing `FrameTime` snapshots.
///
/// Real-time clocks measure wall time between ticks; fixed-step clocks advance by the same
/// amount every tick, which keeps headless runs and tests deterministic.
///
/// Delta time is clamped to avoid pathological values when the application is paused
/// by the debugger, minimized, or stalls.
#[derive(Debug, Clone)]
pub struct FrameClock {
    source: Source,
    frame_index: u64,
    elapsed: f32,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    /// Real-time clock with default clamps (0.1 ms .. 250 ms).
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    /// Real-time clock with custom delta-time clamps.
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            source: Source::Realtime { last: Instant::now() },
            frame_index: 0,
            elapsed: 0.0,
            dt_min,
            dt_max,
        }
    }

    /// Clock that advances by exactly `step` per tick.
    pub fn fixed_step(step: Duration) -> Self {
        Self {
            source: Source::FixedStep(step),
            frame_index: 0,
            elapsed: 0.0,
            dt_min: Duration::ZERO,
            dt_max: Duration::MAX,
        }
    }

    /// Resets the real-time baseline.
    ///
    /// Useful after surface reconfigure events or when resuming from suspension.
    pub fn reset(&mut self) {
        if let Source::Realtime { last } = &mut self.source {
            *last = Instant::now();
        }
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        let dt = match &mut self.source {
            Source::Realtime { last } => {
                let now = Instant::now();
                let dt = now.saturating_duration_since(*last);
                *last = now;
                dt.clamp(self.dt_min, self.dt_max)
            }
            Source::FixedStep(step) => *step,
        };

        let dt = dt.as_secs_f32();
        self.elapsed += dt;

        let ft = FrameTime {
            dt,
            elapsed: self.elapsed,
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
