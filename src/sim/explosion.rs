//! Bomb explosion sequence
//!
//! Runs on unscaled time because it drives the time scale itself:
//! 1. fade the overlay to white while the time scale falls from 1 to 0
//! 2. hold at time scale 0
//! 3. show game over
//! 4. fade the overlay back to transparent

use serde::{Deserialize, Serialize};

use super::clock::{Clock, TimeSource};
use crate::tuning::ExplosionTiming;
use crate::{clamp01, lerp};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ExplosionPhase {
    FadeOut { elapsed: f32 },
    Hold { elapsed: f32 },
    FadeIn { elapsed: f32 },
    Done,
}

/// What the session should apply after one frame of the sequence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExplosionStep {
    /// Overlay opacity (0 transparent, 1 white)
    pub overlay_alpha: f32,
    /// New global time scale, if this phase drives it
    pub time_scale: Option<f32>,
    /// The game-over panel should appear this frame
    pub show_game_over: bool,
    /// The sequence ended this frame
    pub finished: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplosionSequence {
    phase: ExplosionPhase,
    timing: ExplosionTiming,
}

impl ExplosionSequence {
    pub fn new(timing: ExplosionTiming) -> Self {
        Self {
            phase: ExplosionPhase::FadeOut { elapsed: 0.0 },
            timing,
        }
    }

    pub fn phase(&self) -> ExplosionPhase {
        self.phase
    }

    pub fn is_done(&self) -> bool {
        self.phase == ExplosionPhase::Done
    }

    fn fraction(&self, elapsed: f32) -> f32 {
        if self.timing.fade > 0.0 {
            clamp01(elapsed / self.timing.fade)
        } else {
            1.0
        }
    }

    /// Advance one frame on the unscaled clock; `None` once finished
    pub fn tick(&mut self, clock: &Clock) -> Option<ExplosionStep> {
        let dt = clock.delta(TimeSource::Unscaled);
        let step = match self.phase {
            ExplosionPhase::FadeOut { elapsed } => {
                let elapsed = elapsed + dt;
                if elapsed >= self.timing.fade {
                    self.phase = ExplosionPhase::Hold { elapsed: 0.0 };
                    ExplosionStep {
                        overlay_alpha: 1.0,
                        time_scale: Some(0.0),
                        show_game_over: false,
                        finished: false,
                    }
                } else {
                    self.phase = ExplosionPhase::FadeOut { elapsed };
                    let t = self.fraction(elapsed);
                    ExplosionStep {
                        overlay_alpha: lerp(0.0, 1.0, t),
                        time_scale: Some(lerp(1.0, 0.0, t)),
                        show_game_over: false,
                        finished: false,
                    }
                }
            }
            ExplosionPhase::Hold { elapsed } => {
                let elapsed = elapsed + dt;
                let show_game_over = elapsed >= self.timing.hold;
                self.phase = if show_game_over {
                    ExplosionPhase::FadeIn { elapsed: 0.0 }
                } else {
                    ExplosionPhase::Hold { elapsed }
                };
                ExplosionStep {
                    overlay_alpha: 1.0,
                    time_scale: None,
                    show_game_over,
                    finished: false,
                }
            }
            ExplosionPhase::FadeIn { elapsed } => {
                let elapsed = elapsed + dt;
                let finished = elapsed >= self.timing.fade;
                self.phase = if finished {
                    ExplosionPhase::Done
                } else {
                    ExplosionPhase::FadeIn { elapsed }
                };
                ExplosionStep {
                    overlay_alpha: if finished {
                        0.0
                    } else {
                        lerp(1.0, 0.0, self.fraction(elapsed))
                    },
                    time_scale: None,
                    show_game_over: false,
                    finished,
                }
            }
            ExplosionPhase::Done => return None,
        };
        Some(step)
    }
}
