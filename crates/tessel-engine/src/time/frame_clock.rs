use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time since the previous tick, in seconds.
    pub dt: f32,

    /// Same as `dt`, in milliseconds. This is what `Scene::frame` takes.
    pub delta_ms: f32,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

#[derive(Debug, Copy, Clone, PartialEq)]
enum Source {
    /// Wall clock, clamped to `[min, max]`.
    Wall { min: Duration, max: Duration },
    /// Same step every tick, regardless of wall time.
    Fixed(Duration),
}

/// Produces `FrameTime` snapshots for the update tick.
///
/// Wall-clock deltas are clamped so a debugger pause or a stalled frame
/// does not teleport animated nodes. A fixed clock ignores wall time, which
/// makes headless runs and tests deterministic.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    frame_index: u64,
    source: Source,
}

impl FrameClock {
    /// Wall clock with default clamps (0.1 ms to 250 ms).
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    /// Wall clock with custom delta-time clamps.
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            last: Instant::now(),
            frame_index: 0,
            source: Source::Wall {
                min: dt_min,
                max: dt_max,
            },
        }
    }

    /// Clock that advances by exactly `step` per tick.
    pub fn fixed(step: Duration) -> Self {
        Self {
            last: Instant::now(),
            frame_index: 0,
            source: Source::Fixed(step),
        }
    }

    /// Fixed clock at `fps` ticks per simulated second.
    pub fn fixed_fps(fps: u32) -> Self {
        Self::fixed(Duration::from_secs(1) / fps.max(1))
    }

    #[inline]
    pub fn is_fixed(&self) -> bool {
        matches!(self.source, Source::Fixed(_))
    }

    /// Resets the wall-clock baseline, e.g. when resuming from suspension.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let dt = match self.source {
            Source::Wall { min, max } => now.saturating_duration_since(self.last).clamp(min, max),
            Source::Fixed(step) => step,
        };
        self.last = now;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            delta_ms: dt.as_secs_f32() * 1000.0,
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
    fn fixed_clock_repeats_its_step() {
        let mut clock = FrameClock::fixed(Duration::from_millis(20));
        let a = clock.tick();
        let b = clock.tick();
        assert_eq!(a.frame_index, 0);
        assert_eq!(b.frame_index, 1);
        assert!((a.delta_ms - 20.0).abs() < 1e-4);
        assert!((b.dt - 0.02).abs() < 1e-6);
        assert!(clock.is_fixed());
    }

    #[test]
    fn fixed_fps_divides_a_second() {
        let mut clock = FrameClock::fixed_fps(50);
        assert!((clock.tick().delta_ms - 20.0).abs() < 1e-4);
    }

    #[test]
    fn wall_clock_is_clamped() {
        let mut clock = FrameClock::with_clamps(Duration::from_millis(5), Duration::from_millis(10));
        let ft = clock.tick();
        assert!(ft.delta_ms >= 5.0 - 1e-4 && ft.delta_ms <= 10.0 + 1e-4);
    }
}
