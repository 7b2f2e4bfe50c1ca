//! Session runtime
//!
//! All gameplay timing lives here. Single-threaded and frame-driven:
//! - Two explicit clocks (scaled / unscaled)
//! - Seeded RNG only
//! - Timed tasks are plain countdown values owned by their component;
//!   cancelling one drops it and runs its restoration synchronously

pub mod clock;
pub mod combo;
pub mod explosion;
pub mod powerup;
pub mod registry;
pub mod spawn;
pub mod state;
pub mod tick;

pub use clock::{Clock, Countdown, TimeSource};
pub use combo::{ComboHit, ComboTracker, combo_text};
pub use explosion::{ExplosionPhase, ExplosionSequence, ExplosionStep};
pub use powerup::{EffectTargets, PowerUpEngine, PowerUpKind, PowerUpTick};
pub use registry::{EntityId, EntityRegistry, LiveEntity};
pub use spawn::{SpawnCategory, SpawnProcess, SpawnRequest, pick_category};
pub use state::{DEFAULT_SEED, Session, SessionPhase, SliceOutcome};
pub use tick::{TickInput, tick};
