//! Combo streak tracking
//!
//! A slice within `window` scaled seconds of the previous one extends the
//! streak and multiplies its points by `min(count, 5)`. The streak ends once
//! scaled time reaches `last slice + window` with no further slice.

use serde::{Deserialize, Serialize};

use super::clock::{Clock, TimeSource};
use crate::consts::MAX_COMBO_BONUS;

/// Result of registering one scoring slice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComboHit {
    /// Streak length after this slice
    pub count: u32,
    /// Point multiplier for this slice (1 outside a combo)
    pub bonus: u32,
    /// Whether this slice extended a streak (combo text shown)
    pub extended: bool,
}

/// Rolling combo counter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComboTracker {
    count: u32,
    last_slice_time: Option<f64>,
    window: f32,
    /// Scaled time at which the streak resets; set by every extending slice
    deadline: Option<f64>,
}

impl ComboTracker {
    pub fn new(window: f32) -> Self {
        Self {
            count: 0,
            last_slice_time: None,
            window,
            deadline: None,
        }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn window(&self) -> f32 {
        self.window
    }

    /// Register a scoring slice at scaled time `now`
    pub fn register_slice(&mut self, now: f64) -> ComboHit {
        let in_window = self
            .last_slice_time
            .is_some_and(|last| now - last < self.window as f64);

        let hit = if in_window {
            self.count += 1;
            self.deadline = Some(now + self.window as f64);
            ComboHit {
                count: self.count,
                bonus: self.count.min(MAX_COMBO_BONUS),
                extended: true,
            }
        } else {
            self.count = 1;
            self.deadline = None;
            ComboHit {
                count: 1,
                bonus: 1,
                extended: false,
            }
        };

        self.last_slice_time = Some(now);
        hit
    }

    /// Check the pending reset; returns true on the frame the streak resets
    pub fn tick(&mut self, clock: &Clock) -> bool {
        let Some(deadline) = self.deadline else {
            return false;
        };
        if clock.now(TimeSource::Scaled) >= deadline {
            self.deadline = None;
            self.count = 0;
            return true;
        }
        false
    }

    /// Clear the streak and cancel the pending reset
    pub fn reset(&mut self) {
        self.count = 0;
        self.last_slice_time = None;
        self.deadline = None;
    }
}

/// Text shown for an active combo
pub fn combo_text(count: u32) -> String {
    format!("{count}x COMBO!")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_slice_is_not_a_combo() {
        let mut combo = ComboTracker::new(1.0);
        let hit = combo.register_slice(0.0);
        assert_eq!(hit, ComboHit { count: 1, bonus: 1, extended: false });
    }

    #[test]
    fn test_streak_and_cap() {
        let mut combo = ComboTracker::new(1.0);
        let mut t = 0.0;
        let mut bonuses = Vec::new();
        for _ in 0..7 {
            bonuses.push(combo.register_slice(t).bonus);
            t += 0.5;
        }
        assert_eq!(bonuses, vec![1, 2, 3, 4, 5, 5, 5]);
        assert_eq!(combo.count(), 7);
    }

    #[test]
    fn test_exact_window_boundary_breaks_streak() {
        let mut combo = ComboTracker::new(1.0);
        combo.register_slice(0.0);
        let hit = combo.register_slice(1.0);
        assert!(!hit.extended);
        assert_eq!(hit.count, 1);
    }

    #[test]
    fn test_streak_resets_once_at_deadline() {
        let mut combo = ComboTracker::new(1.0);
        let mut clock = Clock::new();
        combo.register_slice(0.0);
        combo.register_slice(0.25);
        assert_eq!(combo.count(), 2);

        let mut resets = 0;
        for _ in 0..12 {
            clock.advance(0.125);
            if combo.tick(&clock) {
                resets += 1;
            }
        }
        assert_eq!(resets, 1);
        assert_eq!(combo.count(), 0);
    }

    #[test]
    fn test_extending_slice_moves_deadline() {
        let mut combo = ComboTracker::new(1.0);
        let mut clock = Clock::new();
        combo.register_slice(0.0);
        combo.register_slice(0.5);
        clock.advance(0.75);
        assert!(!combo.tick(&clock));
        // Re-arms the full window from this slice
        combo.register_slice(0.75);
        clock.advance(0.75);
        assert!(!combo.tick(&clock));
        assert_eq!(combo.count(), 3);
        clock.advance(0.25);
        assert!(combo.tick(&clock));
    }

    #[test]
    fn test_slice_in_arming_frame_gets_full_window() {
        let mut combo = ComboTracker::new(1.0);
        let mut clock = Clock::new();
        clock.advance(0.25);
        combo.register_slice(clock.now(TimeSource::Scaled));
        combo.register_slice(clock.now(TimeSource::Scaled));
        // Same frame the streak was extended in
        assert!(!combo.tick(&clock));

        for _ in 0..9 {
            clock.advance(0.1);
            assert!(!combo.tick(&clock));
        }
        assert_eq!(combo.count(), 2);
        let hit = combo.register_slice(clock.now(TimeSource::Scaled));
        assert!(hit.extended);
        assert_eq!(hit.count, 3);
    }

    #[test]
    fn test_new_streak_clears_stale_deadline() {
        let mut combo = ComboTracker::new(1.0);
        let mut clock = Clock::new();
        combo.register_slice(0.0);
        combo.register_slice(0.0);
        clock.advance(1.0);
        // Lands exactly on the deadline: starts a fresh streak
        let hit = combo.register_slice(clock.now(TimeSource::Scaled));
        assert!(!hit.extended);
        assert!(!combo.tick(&clock));
        assert_eq!(combo.count(), 1);
    }

    #[test]
    fn test_combo_text() {
        assert_eq!(combo_text(3), "3x COMBO!");
    }
}
