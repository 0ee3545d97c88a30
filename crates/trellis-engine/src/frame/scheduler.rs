use std::collections::VecDeque;

/// Handle for one scheduled tick.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct TickToken(u64);

impl TickToken {
    #[inline]
    pub fn id(self) -> u64 {
        self.0
    }
}

/// "Call me again next frame" capability.
///
/// The frame loop arms at most one token at a time and only fires the token it armed last;
/// a cancelled token may still be delivered by the scheduler and is then ignored.
pub trait Scheduler {
    fn schedule_next_tick(&mut self) -> TickToken;

    fn cancel(&mut self, token: TickToken);
}

/// Queue-backed scheduler driven by hand.
///
/// Used by headless runs and tests: pop the next due token and fire it.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    queue: VecDeque<TickToken>,
    scheduled: u64,
    cancelled: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns the oldest scheduled token.
    pub fn next_due(&mut self) -> Option<TickToken> {
        self.queue.pop_front()
    }

    /// Tokens scheduled and not yet taken or cancelled.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn scheduled_count(&self) -> u64 {
        self.scheduled
    }

    pub fn cancelled_count(&self) -> u64 {
        self.cancelled
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_next_tick(&mut self) -> TickToken {
        self.next_id += 1;
        let token = TickToken(self.next_id);
        self.queue.push_back(token);
        self.scheduled += 1;
        token
    }

    fn cancel(&mut self, token: TickToken) {
        let before = self.queue.len();
        self.queue.retain(|t| *t != token);
        if self.queue.len() != before {
            self.cancelled += 1;
        }
    }
}

/// Scheduler tied to window redraws.
///
/// Arming a token raises a redraw request; the runtime forwards it to the window and fires
/// the armed token when the redraw arrives.
#[derive(Debug, Default)]
pub struct RedrawScheduler {
    next_id: u64,
    armed: Option<TickToken>,
    redraw_requested: bool,
}

impl RedrawScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn armed(&self) -> Option<TickToken> {
        self.armed
    }

    /// Takes the armed token for firing.
    pub fn take_armed(&mut self) -> Option<TickToken> {
        self.armed.take()
    }

    /// Returns true once per arming; the runtime then requests a window redraw.
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }
}

impl Scheduler for RedrawScheduler {
    fn schedule_next_tick(&mut self) -> TickToken {
        self.next_id += 1;
        let token = TickToken(self.next_id);
        self.armed = Some(token);
        self.redraw_requested = true;
        token
    }

    fn cancel(&mut self, token: TickToken) {
        if self.armed == Some(token) {
            self.armed = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_tokens_come_out_in_order() {
        let mut s = ManualScheduler::new();
        let a = s.schedule_next_tick();
        let b = s.schedule_next_tick();
        assert_ne!(a, b);
        assert_eq!(s.next_due(), Some(a));
        assert_eq!(s.next_due(), Some(b));
        assert_eq!(s.next_due(), None);
    }

    #[test]
    fn manual_cancel_removes_queued_token() {
        let mut s = ManualScheduler::new();
        let a = s.schedule_next_tick();
        s.cancel(a);
        s.cancel(a);
        assert_eq!(s.pending(), 0);
        assert_eq!(s.cancelled_count(), 1);
    }

    #[test]
    fn redraw_request_is_raised_once_per_arming() {
        let mut s = RedrawScheduler::new();
        let token = s.schedule_next_tick();
        assert!(s.take_redraw_request());
        assert!(!s.take_redraw_request());
        assert_eq!(s.take_armed(), Some(token));
        assert_eq!(s.armed(), None);
    }

    #[test]
    fn redraw_cancel_only_drops_matching_token() {
        let mut s = RedrawScheduler::new();
        let old = s.schedule_next_tick();
        let new = s.schedule_next_tick();
        s.cancel(old);
        assert_eq!(s.armed(), Some(new));
        s.cancel(new);
        assert_eq!(s.armed(), None);
    }
}
