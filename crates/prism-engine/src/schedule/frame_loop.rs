use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::time::{FrameClock, FrameTime};

/// Returned by a tick function.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TickControl {
    Continue,
    Stop,
}

/// Why a loop stopped.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum StopReason {
    /// A [`CancelToken`] was triggered.
    Cancelled,
    /// The tick function returned [`TickControl::Stop`].
    Requested,
    /// The configured tick limit was reached.
    TickLimit,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LoopState {
    Running,
    Stopped(StopReason),
}

/// Shared cancellation flag. Cloning yields another handle to the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests a stop at the next scheduling boundary.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// One-tick-per-resume scheduler.
///
/// Owns the frame clock, so every tick sees a fresh [`FrameTime`]. Once
/// stopped it stays stopped; further resumes are no-ops.
#[derive(Debug)]
pub struct FrameLoop {
    clock: FrameClock,
    cancel: CancelToken,
    tick_limit: Option<u64>,
    ticks: u64,
    state: LoopState,
}

impl FrameLoop {
    pub fn new(clock: FrameClock) -> Self {
        Self {
            clock,
            cancel: CancelToken::new(),
            tick_limit: None,
            ticks: 0,
            state: LoopState::Running,
        }
    }

    /// Stops after `limit` ticks. `None` runs until cancelled.
    pub fn with_tick_limit(mut self, limit: Option<u64>) -> Self {
        self.tick_limit = limit;
        self
    }

    /// Uses an existing token, so a handle can be given out before the loop
    /// is built.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    /// Handle that stops this loop from anywhere, including other threads.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    #[inline]
    pub fn state(&self) -> LoopState {
        self.state
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Ticks completed so far.
    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Checks the stop conditions that apply before a tick runs.
    ///
    /// Hosts call this before acquiring per-tick resources so a cancelled
    /// loop does not acquire drawables it will never present.
    pub fn poll_stop(&mut self) -> LoopState {
        if self.state == LoopState::Running {
            if self.cancel.is_cancelled() {
                self.stop(StopReason::Cancelled);
            } else if self.limit_reached() {
                self.stop(StopReason::TickLimit);
            }
        }
        self.state
    }

    /// Runs one tick, unless the loop has stopped.
    pub fn resume<F>(&mut self, tick: F) -> LoopState
    where
        F: FnOnce(FrameTime) -> TickControl,
    {
        if self.poll_stop() != LoopState::Running {
            return self.state;
        }

        let time = self.clock.tick();
        let control = tick(time);
        self.ticks += 1;

        if control == TickControl::Stop {
            self.stop(StopReason::Requested);
        } else if self.limit_reached() {
            self.stop(StopReason::TickLimit);
        }

        self.state
    }

    /// Resumes up to `max_ticks` times back to back, for hosts without a
    /// refresh signal (tests, headless runs). Returns the ticks run by this call.
    pub fn run_bounded<F>(&mut self, max_ticks: u64, mut tick: F) -> u64
    where
        F: FnMut(FrameTime) -> TickControl,
    {
        let start = self.ticks;
        for _ in 0..max_ticks {
            if self.resume(&mut tick) != LoopState::Running {
                break;
            }
        }
        self.ticks - start
    }

    fn limit_reached(&self) -> bool {
        self.tick_limit.is_some_and(|limit| self.ticks >= limit)
    }

    fn stop(&mut self, reason: StopReason) {
        log::info!("frame loop stopped after {} ticks: {reason:?}", self.ticks);
        self.state = LoopState::Stopped(reason);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn fixed() -> FrameLoop {
        FrameLoop::new(FrameClock::fixed_step(Duration::from_millis(16)))
    }

    #[test]
    fn resume_runs_exactly_one_tick() {
        let mut lp = fixed();
        let mut calls = 0;
        lp.resume(|_| {
            calls += 1;
            TickControl::Continue
        });
        assert_eq!(calls, 1);
        assert_eq!(lp.ticks(), 1);
        assert!(lp.is_running());
    }

    #[test]
    fn run_bounded_is_deterministic() {
        let mut lp = fixed();
        let mut frames = Vec::new();
        let ran = lp.run_bounded(5, |t| {
            frames.push((t.frame_index, t.elapsed));
            TickControl::Continue
        });
        assert_eq!(ran, 5);
        assert_eq!(frames.iter().map(|f| f.0).collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);
        assert!((frames[4].1 - 0.080).abs() < 1e-9);
    }

    #[test]
    fn tick_stop_request_ends_loop() {
        let mut lp = fixed();
        let ran = lp.run_bounded(10, |t| {
            if t.frame_index == 2 {
                TickControl::Stop
            } else {
                TickControl::Continue
            }
        });
        assert_eq!(ran, 3);
        assert_eq!(lp.state(), LoopState::Stopped(StopReason::Requested));
    }

    #[test]
    fn tick_limit_stops_after_last_tick() {
        let mut lp = fixed().with_tick_limit(Some(4));
        let ran = lp.run_bounded(100, |_| TickControl::Continue);
        assert_eq!(ran, 4);
        assert_eq!(lp.state(), LoopState::Stopped(StopReason::TickLimit));
    }

    #[test]
    fn zero_tick_limit_never_ticks() {
        let mut lp = fixed().with_tick_limit(Some(0));
        let mut called = false;
        lp.resume(|_| {
            called = true;
            TickControl::Continue
        });
        assert!(!called);
        assert_eq!(lp.state(), LoopState::Stopped(StopReason::TickLimit));
    }

    #[test]
    fn cancel_takes_effect_at_next_boundary() {
        let mut lp = fixed();
        let token = lp.cancel_token();
        let ran = lp.run_bounded(10, |t| {
            if t.frame_index == 1 {
                token.cancel();
            }
            TickControl::Continue
        });
        // The cancelling tick completes; the next one never starts.
        assert_eq!(ran, 2);
        assert_eq!(lp.state(), LoopState::Stopped(StopReason::Cancelled));
    }

    #[test]
    fn cancel_from_another_thread() {
        let mut lp = fixed();
        let token = lp.cancel_token();
        std::thread::spawn(move || token.cancel()).join().unwrap();
        assert_eq!(lp.poll_stop(), LoopState::Stopped(StopReason::Cancelled));
    }

    #[test]
    fn external_token_is_shared() {
        let token = CancelToken::new();
        let mut lp = fixed().with_cancel_token(token.clone());
        assert!(lp.is_running());
        token.cancel();
        assert!(lp.cancel_token().is_cancelled());
        assert_eq!(lp.run_bounded(3, |_| TickControl::Continue), 0);
    }

    #[test]
    fn stopped_loop_ignores_resume() {
        let mut lp = fixed();
        lp.cancel_token().cancel();
        let mut called = false;
        lp.resume(|_| {
            called = true;
            TickControl::Continue
        });
        assert!(!called);
        assert_eq!(lp.ticks(), 0);
    }
}
