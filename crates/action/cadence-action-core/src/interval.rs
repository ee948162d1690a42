//! Interval timing: fixed duration plus a direction/mode model.
//!
//! `done()` is `runtime > duration` regardless of direction. Direction only
//! changes which logical time `get_runtime()` reports:
//! Forward → `runtime`, Backward → `duration - runtime`.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

impl Direction {
    #[inline]
    pub fn flipped(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

/// What a restart does to the direction.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Direction flips on every restart.
    PingPong,
    /// Direction is kept across restarts.
    #[default]
    Repeat,
}

/// Template-side timing parameters of an interval action.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Timing {
    /// Seconds.
    pub duration: f32,
    #[serde(default)]
    pub direction: Direction,
    #[serde(default)]
    pub mode: Mode,
}

impl Timing {
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            direction: Direction::Forward,
            mode: Mode::Repeat,
        }
    }
}

/// Runtime interval state carried by one running instance.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Interval {
    pub duration: f32,
    pub direction: Direction,
    pub mode: Mode,
}

impl From<Timing> for Interval {
    fn from(t: Timing) -> Self {
        Self {
            duration: t.duration,
            direction: t.direction,
            mode: t.mode,
        }
    }
}

impl Interval {
    /// Logical time for the given elapsed runtime.
    #[inline]
    pub fn get_runtime(&self, runtime: f32) -> f32 {
        match self.direction {
            Direction::Forward => runtime,
            Direction::Backward => self.duration - runtime,
        }
    }

    /// Normalized progress in [0, 1]. A zero-length interval sits at its end
    /// (forward) or its beginning (backward).
    #[inline]
    pub fn progress(&self, runtime: f32) -> f32 {
        if self.duration <= 0.0 {
            return match self.direction {
                Direction::Forward => 1.0,
                Direction::Backward => 0.0,
            };
        }
        (self.get_runtime(runtime) / self.duration).clamp(0.0, 1.0)
    }

    /// Strictly greater: a run landing exactly on `duration` finishes one frame later.
    #[inline]
    pub fn done(&self, runtime: f32) -> bool {
        runtime > self.duration
    }

    /// Restart hook: PingPong flips the direction, Repeat keeps it.
    #[inline]
    pub fn on_restart(&mut self) {
        if self.mode == Mode::PingPong {
            self.direction = self.direction.flipped();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backward_reports_remaining_time() {
        let mut iv = Interval::from(Timing::new(2.0));
        assert_eq!(iv.get_runtime(0.5), 0.5);
        iv.direction = Direction::Backward;
        assert_eq!(iv.get_runtime(0.5), 1.5);
        assert_eq!(iv.progress(0.5), 0.75);
    }

    #[test]
    fn done_is_strict_at_the_boundary() {
        let iv = Interval::from(Timing::new(1.0));
        assert!(!iv.done(1.0));
        assert!(iv.done(1.0 + 1e-4));
    }

    #[test]
    fn repeat_mode_keeps_direction() {
        let mut iv = Interval::from(Timing::new(1.0));
        iv.on_restart();
        assert_eq!(iv.direction, Direction::Forward);
        iv.mode = Mode::PingPong;
        iv.on_restart();
        assert_eq!(iv.direction, Direction::Backward);
        iv.on_restart();
        assert_eq!(iv.direction, Direction::Forward);
    }

    #[test]
    fn zero_duration_progress_is_defined() {
        let mut iv = Interval::from(Timing::new(0.0));
        assert_eq!(iv.progress(0.0), 1.0);
        iv.direction = Direction::Backward;
        assert_eq!(iv.progress(0.0), 0.0);
    }
}
