use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time elapsed since the previous tick, in seconds. Always > 0.
    pub dt: f32,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Monotonic tick counter, starting at 0.
    pub tick_index: u64,
}

/// Frame clock producing clamped `FrameTime` snapshots.
///
/// One clock per driver loop; the delta it produces is what `new_frame`
/// requires to be strictly positive, so the minimum clamp doubles as that
/// guarantee even on platforms with coarse timers.
///
/// Delta time is clamped to avoid pathological values when the application
/// is paused by a debugger, minimized, or stalls.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    tick_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    /// Creates a clock with default clamps.
    ///
    /// Clamp rationale:
    /// - minimum prevents zero-dt from tight loops and coarse timers
    /// - maximum prevents animation jumps after long stalls
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
            tick_index: 0,
            dt_min: Duration::from_micros(100), // 0.0001s
            dt_max: Duration::from_millis(250), // 0.25s
        }
    }

    /// Creates a clock with custom delta-time clamps.
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            last: Instant::now(),
            tick_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Resets the baseline, e.g. when resuming from suspension.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);
        self.last = now;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            now,
            tick_index: self.tick_index,
        };
        self.tick_index = self.tick_index.wrapping_add(1);
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
    fn dt_is_always_positive() {
        let mut clock = FrameClock::new();
        // Immediate tick: well under the minimum clamp.
        let ft = clock.tick();
        assert!(ft.dt > 0.0);
    }

    #[test]
    fn dt_is_clamped_above() {
        let mut clock = FrameClock::with_clamps(
            Duration::from_micros(100),
            Duration::from_millis(10),
        );
        std::thread::sleep(Duration::from_millis(20));
        let ft = clock.tick();
        assert!(ft.dt <= 0.0101);
    }

    #[test]
    fn tick_index_is_monotonic() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick().tick_index, 0);
        assert_eq!(clock.tick().tick_index, 1);
        assert_eq!(clock.tick().tick_index, 2);
    }
}
