//! Fixed timestep simulation tick
//!
//! One tick per rendered frame. Resolver order is fixed and significant
//! for determinism: movement first so the contact check sees the
//! player's latest position, then combat, then streaming, then due
//! timers, with the cosmetic effect sweep closing the frame.

use glam::Vec2;

use super::state::{Phase, SimState};
use super::{combat, movement};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Directional movement intent (Directional mode; zero = idle)
    pub move_dir: Vec2,
    /// Ground point clicked this tick (ClickToMove mode)
    pub click_target: Option<Vec2>,
    /// Aim point on the ground plane; drives facing and bullet direction
    pub aim: Option<Vec2>,
    /// Fire a bullet toward the aim point
    pub fire: bool,
    /// Explicit plant action (Directional mode)
    pub plant_bomb: bool,
    /// Pointer hit-test point for collecting a planted bomb
    pub collect_at: Option<Vec2>,
    /// Begin the run from `Idle`
    pub start: bool,
    /// Demo autopilot - synthesizes movement and combat intent
    pub idle_mode: bool,
}

/// Advance the simulation by one tick
pub fn tick(state: &mut SimState, input: &TickInput, dt: f32) {
    state.clock.advance(dt);

    match state.phase {
        Phase::Idle => {
            if input.start {
                state.start();
            }
            return;
        }
        // Terminal: simulation frozen, only the effect sweep keeps
        // running so the presentation layer gets its removals
        Phase::Won | Phase::Lost => {
            expire_effects(state);
            return;
        }
        Phase::Running => {}
    }

    let input = if input.idle_mode {
        autopilot(state, input)
    } else {
        input.clone()
    };

    // 1. Player movement (click arrival may plant)
    movement::resolve(state, &input, dt);

    // 2. Discrete actions at the post-movement position
    if input.plant_bomb {
        combat::plant_bomb(state);
    }
    if let Some(point) = input.collect_at {
        combat::try_collect_bomb(state, point);
    }
    if input.fire {
        if let Some(aim) = input.aim {
            combat::fire_bullet(state, aim);
        }
    }

    // 3. Enemy pursuit and the contact check (may end the run)
    combat::advance_enemies(state, dt);

    // 4. Bullet advance and hit-test
    combat::advance_bullets(state, dt);

    // 5. Pickup proximity collection
    combat::check_pickups(state);

    if state.running() {
        // 6. Terrain streaming
        state.stream_neighbors();

        // 7. Due timers (fuses, pickup expiry, pickup spawner)
        let due = state.scheduler.pop_due(state.clock.now_ms());
        for kind in due {
            combat::on_timer(state, kind);
        }
    }

    // 8. Cosmetic effect expiry
    expire_effects(state);
}

/// Drop transient effects whose wall-clock lifetime has elapsed
fn expire_effects(state: &mut SimState) {
    let now = state.clock.now_ms();
    let mut expired = Vec::new();
    state.effects.retain(|e| {
        if e.expired(now) {
            expired.push(e.id);
            false
        } else {
            true
        }
    });
    for id in expired {
        state
            .events
            .push(super::state::GameEvent::EffectExpired { id });
    }
}

/// Demo autopilot: kite away from the nearest enemy, shoot when armed,
/// drop a bomb when the chase gets close, detour to pickups when safe
fn autopilot(state: &SimState, base: &TickInput) -> TickInput {
    let mut input = base.clone();
    let player = state.player.pos;

    let nearest = state.enemies.iter().min_by(|a, b| {
        a.pos
            .distance(player)
            .total_cmp(&b.pos.distance(player))
    });

    if let Some(enemy) = nearest {
        let threat_dist = enemy.pos.distance(player);
        input.move_dir = crate::direction_to(enemy.pos, player);
        input.aim = Some(enemy.pos);
        input.fire = state.ammo > 0;
        input.plant_bomb = threat_dist < 2.5;

        // Safe enough to detour for ammo
        if threat_dist > 5.0 {
            if let Some(pickup) = state.pickups.first() {
                input.move_dir = crate::direction_to(player, pickup.pos);
            }
        }
    }

    input
}
