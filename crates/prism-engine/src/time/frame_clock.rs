use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds since the previous tick (clamped).
    pub dt: f32,

    /// Seconds since the clock started, unclamped. Drives time-varying colors.
    pub elapsed: f64,

    /// Timestamp of the tick. Synthetic under a fixed-step clock.
    pub now: Instant,

    /// Monotonic frame counter, starting at 0.
    pub frame_index: u64,
}

#[derive(Debug, Clone, Copy)]
enum Source {
    Realtime,
    FixedStep(Duration),
}

/// Produces [`FrameTime`] snapshots.
///
/// Delta time is clamped so a debugger pause or a minimized window does not
/// feed a huge step into animation code. `elapsed` is never clamped: color
/// cycles follow wall-clock time the way a refresh-driven loop observes it.
#[derive(Debug, Clone)]
pub struct FrameClock {
    source: Source,
    start: Instant,
    last: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    /// Wall-clock driven clock with default clamps (0.1 ms .. 250 ms).
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            source: Source::Realtime,
            start: now,
            last: now,
            frame_index: 0,
            dt_min: Duration::from_micros(100),
            dt_max: Duration::from_millis(250),
        }
    }

    /// Clock that advances by exactly `step` per tick, ignoring wall time.
    ///
    /// The first tick reports `elapsed == step`.
    pub fn fixed_step(step: Duration) -> Self {
        Self {
            source: Source::FixedStep(step),
            ..Self::new()
        }
    }

    /// Advances the clock and returns the new snapshot.
    pub fn tick(&mut self) -> FrameTime {
        let now = match self.source {
            Source::Realtime => Instant::now(),
            Source::FixedStep(step) => self.last + step,
        };

        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);

        self.last = now;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            elapsed: now.saturating_duration_since(self.start).as_secs_f64(),
            now,
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_step_elapsed_accumulates() {
        let mut clock = FrameClock::fixed_step(Duration::from_millis(16));
        let a = clock.tick();
        let b = clock.tick();
        let c = clock.tick();
        assert!((a.elapsed - 0.016).abs() < 1e-9);
        assert!((b.elapsed - 0.032).abs() < 1e-9);
        assert!((c.elapsed - 0.048).abs() < 1e-9);
    }

    #[test]
    fn frame_index_starts_at_zero() {
        let mut clock = FrameClock::fixed_step(Duration::from_millis(10));
        assert_eq!(clock.tick().frame_index, 0);
        assert_eq!(clock.tick().frame_index, 1);
    }

    #[test]
    fn dt_is_clamped_but_elapsed_is_not() {
        let mut clock = FrameClock::fixed_step(Duration::from_secs(2));
        let ft = clock.tick();
        assert!((ft.dt - 0.25).abs() < 1e-6);
        assert!((ft.elapsed - 2.0).abs() < 1e-9);
    }

    #[test]
    fn dt_lower_clamp() {
        let mut clock = FrameClock::fixed_step(Duration::ZERO);
        let ft = clock.tick();
        assert!((ft.dt - 0.0001).abs() < 1e-7);
        assert_eq!(ft.elapsed, 0.0);
    }

    #[test]
    fn realtime_elapsed_is_monotonic() {
        let mut clock = FrameClock::new();
        let a = clock.tick();
        let b = clock.tick();
        assert!(b.elapsed >= a.elapsed);
        assert!(a.dt > 0.0);
    }
}
