//! Platform abstraction layer
//!
//! Contracts for the collaborators the runtime drives:
//! - Presentation (one-way HUD pushes)
//! - Entity instantiation/removal
//! - Blade (slicing input) enable/disable
//!
//! Every method has a no-op default so a host can implement only what it
//! has. The core never reads state back from these.

use crate::highscores::{HighScoreStore, MemoryHighScores};
use crate::sim::{EntityId, PowerUpKind, SpawnRequest};

/// One-way state push to the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub enum HudEvent {
    Score(u64),
    /// Combo text; `None` hides the combo display
    Combo(Option<String>),
    /// Full-screen flash overlay opacity
    Overlay(f32),
    PausePanel(bool),
    /// Game-over panel with final and high score texts
    GameOver {
        final_score: String,
        high_score: String,
    },
    HideGameOver,
    /// Power-up indicator; `None` hides it
    PowerUp(Option<PowerUpKind>),
    /// Power-up duration bar fill in [0, 1]
    PowerUpBar(f32),
}

/// Presentation service
pub trait Presentation {
    fn push(&mut self, _event: &HudEvent) {}
}

/// Entity instantiation service
pub trait EntityService {
    /// Create the entity for `request`, apply its launch force, and show it
    fn spawn(&mut self, _id: EntityId, _request: &SpawnRequest) {}
    /// Remove a spawned entity (lifetime ran out or the play area was cleared)
    fn despawn(&mut self, _id: EntityId) {}
}

/// Slicing input source
pub trait Blade {
    fn set_enabled(&mut self, _enabled: bool) {}
}

/// Collaborator that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct Headless;

impl Presentation for Headless {}
impl EntityService for Headless {}
impl Blade for Headless {}

/// Presentation that writes HUD pushes to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogPresentation;

impl Presentation for LogPresentation {
    fn push(&mut self, event: &HudEvent) {
        match event {
            HudEvent::PowerUpBar(_) | HudEvent::Overlay(_) => log::trace!("{event:?}"),
            _ => log::debug!("{event:?}"),
        }
    }
}

/// Bundle of collaborators owned by a session
pub struct Services {
    pub presentation: Box<dyn Presentation>,
    pub entities: Box<dyn EntityService>,
    pub blade: Box<dyn Blade>,
    pub store: Box<dyn HighScoreStore>,
}

impl Default for Services {
    fn default() -> Self {
        Self::headless()
    }
}

impl Services {
    /// No-op collaborators with an in-memory high-score store
    pub fn headless() -> Self {
        Self {
            presentation: Box::new(Headless),
            entities: Box::new(Headless),
            blade: Box::new(Headless),
            store: Box::new(MemoryHighScores::default()),
        }
    }

    pub fn with_presentation(mut self, presentation: impl Presentation + 'static) -> Self {
        self.presentation = Box::new(presentation);
        self
    }

    pub fn with_entities(mut self, entities: impl EntityService + 'static) -> Self {
        self.entities = Box::new(entities);
        self
    }

    pub fn with_blade(mut self, blade: impl Blade + 'static) -> Self {
        self.blade = Box::new(blade);
        self
    }

    pub fn with_store(mut self, store: impl HighScoreStore + 'static) -> Self {
        self.store = Box::new(store);
        self
    }
}

/// Last state pushed to the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub struct Hud {
    pub score_text: String,
    pub combo_text: Option<String>,
    pub overlay_alpha: f32,
    pub pause_visible: bool,
    pub game_over_visible: bool,
    pub final_score_text: String,
    pub high_score_text: String,
    pub power_up: Option<PowerUpKind>,
    pub power_up_label: &'static str,
    pub power_up_bar: f32,
}

impl Default for Hud {
    fn default() -> Self {
        Self {
            score_text: "0".to_string(),
            combo_text: None,
            overlay_alpha: 0.0,
            pause_visible: false,
            game_over_visible: false,
            final_score_text: String::new(),
            high_score_text: String::new(),
            power_up: None,
            power_up_label: "",
            power_up_bar: 0.0,
        }
    }
}

impl Hud {
    pub fn apply(&mut self, event: &HudEvent) {
        match event {
            HudEvent::Score(score) => self.score_text = score.to_string(),
            HudEvent::Combo(text) => self.combo_text = text.clone(),
            HudEvent::Overlay(alpha) => self.overlay_alpha = *alpha,
            HudEvent::PausePanel(visible) => self.pause_visible = *visible,
            HudEvent::GameOver {
                final_score,
                high_score,
            } => {
                self.final_score_text = final_score.clone();
                self.high_score_text = high_score.clone();
                self.game_over_visible = true;
            }
            HudEvent::HideGameOver => self.game_over_visible = false,
            HudEvent::PowerUp(kind) => {
                self.power_up = *kind;
                self.power_up_label = kind.map_or("", |k| k.label());
            }
            HudEvent::PowerUpBar(fill) => self.power_up_bar = *fill,
        }
    }
}
