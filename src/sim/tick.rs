//! Per-frame session advance
//!
//! One call per rendered frame. Every timed task (combo timeout, power-up
//! countdown, spawn loop, explosion sequence, entity lifetimes) runs here in a
//! fixed order, so nothing ever runs concurrently with anything else.

use super::clock::TimeSource;
use super::powerup::{EffectTargets, PowerUpTick};
use super::registry::EntityId;
use super::state::{Session, SessionPhase};
use crate::consts::MAX_FRAME_DT;
use crate::platform::HudEvent;

/// Input collected for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pause toggle (escape / P)
    pub pause: bool,
    /// Entities the blade cut this frame
    pub slices: Vec<EntityId>,
}

/// Advance the session by one frame that took `real_dt` wall-clock seconds
pub fn tick(session: &mut Session, input: &TickInput, real_dt: f32) {
    session.clock.advance(real_dt.min(MAX_FRAME_DT));

    if input.pause {
        session.toggle_pause();
    }
    for &id in &input.slices {
        session.slice(id);
    }

    tick_combo(session);
    tick_power_up(session);
    tick_spawner(session);
    tick_explosion(session);
    expire_entities(session);
}

fn tick_combo(session: &mut Session) {
    if session.combo.tick(&session.clock) {
        session.push(HudEvent::Combo(None));
    }
}

fn tick_power_up(session: &mut Session) {
    let paused = session.is_paused();
    let mut scale = session.effective_time_scale();
    let result = {
        let mut targets = EffectTargets {
            time_scale: &mut scale,
            spawner: &mut session.spawner_config,
        };
        session.power_ups.tick(&session.clock, paused, &mut targets)
    };
    session.set_effective_time_scale(scale);

    match result {
        PowerUpTick::Progress(fill) => session.push(HudEvent::PowerUpBar(fill)),
        PowerUpTick::Expired(_) => {
            session.push(HudEvent::PowerUpBar(0.0));
            session.push(HudEvent::PowerUp(None));
        }
        PowerUpTick::Idle | PowerUpTick::Frozen => {}
    }
}

fn tick_spawner(session: &mut Session) {
    let Some(request) = session.spawner.tick(
        &session.clock,
        &session.spawner_config,
        &session.tuning.catalog,
    ) else {
        return;
    };

    let now = session.clock.now(TimeSource::Scaled);
    let id = session
        .registry
        .insert(request.category.clone(), now, request.lifetime);
    log::debug!(
        "Spawn {:?} {:?} at ({:.2}, {:.2}, {:.2}) angle {:.1} force {:.1}",
        id,
        request.category,
        request.position.x,
        request.position.y,
        request.position.z,
        request.angle,
        request.force
    );
    session.services.entities.spawn(id, &request);
}

fn tick_explosion(session: &mut Session) {
    let Some(step) = session
        .explosion
        .as_mut()
        .and_then(|sequence| sequence.tick(&session.clock))
    else {
        return;
    };

    if let Some(scale) = step.time_scale {
        session.clock.set_time_scale(scale);
    }
    session.push(HudEvent::Overlay(step.overlay_alpha));
    if step.show_game_over {
        session.show_game_over();
    }
    if step.finished {
        session.explosion = None;
        session.phase = SessionPhase::GameOver;
        log::info!("Game over");
    }
}

fn expire_entities(session: &mut Session) {
    let now = session.clock.now(TimeSource::Scaled);
    for id in session.registry.expire(now) {
        session.services.entities.despawn(id);
    }
}
