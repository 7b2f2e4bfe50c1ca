//! Two-clock time model
//!
//! Every frame advances a real (unscaled) clock by the wall-clock delta and a
//! scaled clock by `delta * time_scale`. Slow motion lowers the scale, pause
//! and the explosion sequence drive it to 0.

use serde::{Deserialize, Serialize};

/// Which clock a timed task runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeSource {
    /// Frame time multiplied by the time scale (stops at scale 0)
    Scaled,
    /// Wall-clock frame time, unaffected by the time scale
    Unscaled,
}

/// Frame clock with a mutable global time scale
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clock {
    time_scale: f32,
    scaled_time: f64,
    unscaled_time: f64,
    delta: f32,
    unscaled_delta: f32,
    frame: u64,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock {
    pub fn new() -> Self {
        Self {
            time_scale: 1.0,
            scaled_time: 0.0,
            unscaled_time: 0.0,
            delta: 0.0,
            unscaled_delta: 0.0,
            frame: 0,
        }
    }

    /// Start a new frame that lasted `real_dt` wall-clock seconds
    pub fn advance(&mut self, real_dt: f32) {
        let real_dt = if real_dt.is_finite() { real_dt.max(0.0) } else { 0.0 };
        self.unscaled_delta = real_dt;
        self.delta = real_dt * self.time_scale;
        self.unscaled_time += real_dt as f64;
        self.scaled_time += self.delta as f64;
        self.frame += 1;
    }

    /// Current time on the given clock
    pub fn now(&self, source: TimeSource) -> f64 {
        match source {
            TimeSource::Scaled => self.scaled_time,
            TimeSource::Unscaled => self.unscaled_time,
        }
    }

    /// Length of the current frame on the given clock
    pub fn delta(&self, source: TimeSource) -> f32 {
        match source {
            TimeSource::Scaled => self.delta,
            TimeSource::Unscaled => self.unscaled_delta,
        }
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Set the global time scale (clamped to >= 0). Takes effect next frame.
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = if scale.is_finite() { scale.max(0.0) } else { 1.0 };
    }

    /// Frames advanced since creation
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

/// A one-shot countdown on one of the two clocks
///
/// Dropping or replacing the value cancels it; there is nothing else to tear down.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Countdown {
    pub source: TimeSource,
    pub remaining: f32,
}

impl Countdown {
    pub fn scaled(seconds: f32) -> Self {
        Self {
            source: TimeSource::Scaled,
            remaining: seconds,
        }
    }

    pub fn unscaled(seconds: f32) -> Self {
        Self {
            source: TimeSource::Unscaled,
            remaining: seconds,
        }
    }

    /// Consume this frame's delta; returns true once the countdown has elapsed
    pub fn tick(&mut self, clock: &Clock) -> bool {
        self.remaining -= clock.delta(self.source);
        self.is_elapsed()
    }

    pub fn is_elapsed(&self) -> bool {
        !(self.remaining > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaled_time_follows_scale() {
        let mut clock = Clock::new();
        clock.advance(0.5);
        clock.set_time_scale(0.5);
        clock.advance(0.5);
        assert_eq!(clock.now(TimeSource::Unscaled), 1.0);
        assert_eq!(clock.now(TimeSource::Scaled), 0.75);
        assert_eq!(clock.delta(TimeSource::Scaled), 0.25);
        assert_eq!(clock.delta(TimeSource::Unscaled), 0.5);
        assert_eq!(clock.frame(), 2);
    }

    #[test]
    fn test_zero_scale_freezes_scaled_time() {
        let mut clock = Clock::new();
        clock.set_time_scale(0.0);
        for _ in 0..10 {
            clock.advance(0.25);
        }
        assert_eq!(clock.now(TimeSource::Scaled), 0.0);
        assert_eq!(clock.now(TimeSource::Unscaled), 2.5);
    }

    #[test]
    fn test_bad_input_is_sanitized() {
        let mut clock = Clock::new();
        clock.set_time_scale(-3.0);
        assert_eq!(clock.time_scale(), 0.0);
        clock.set_time_scale(f32::NAN);
        assert_eq!(clock.time_scale(), 1.0);
        clock.advance(f32::INFINITY);
        assert_eq!(clock.now(TimeSource::Unscaled), 0.0);
    }

    #[test]
    fn test_countdown_on_scaled_clock_stalls_at_zero_scale() {
        let mut clock = Clock::new();
        let mut countdown = Countdown::scaled(0.5);
        clock.set_time_scale(0.0);
        clock.advance(1.0);
        assert!(!countdown.tick(&clock));
        clock.set_time_scale(1.0);
        clock.advance(0.5);
        assert!(countdown.tick(&clock));
    }

    #[test]
    fn test_unscaled_countdown_ignores_scale() {
        let mut clock = Clock::new();
        let mut countdown = Countdown::unscaled(0.5);
        clock.set_time_scale(0.0);
        clock.advance(0.5);
        assert!(countdown.tick(&clock));
    }
}
