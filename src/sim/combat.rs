//! Combat resolution: bombs, bullets, pursuit, pickups
//!
//! Everything that kills, scores, or ends the run. All entry points take
//! the owned [`SimState`] by exclusive reference; timer-driven paths
//! (fuse expiry, pickup expiry) re-validate their target by id before
//! acting, so a bomb collected ahead of its fuse is a clean no-op.

use glam::Vec2;

use super::entities::{Bomb, Bullet, EffectKind, EntityId};
use super::scheduler::TimerKind;
use super::state::{GameEvent, Phase, SimState};
use crate::consts::{EXPLOSION_EFFECT_MS, HIT_EFFECT_MS};

/// Plant a bomb at the player's feet
///
/// Silently refused at the bomb cap - a normal gameplay refusal, not an
/// error. The fuse is armed as an independent one-shot timer.
pub fn plant_bomb(state: &mut SimState) -> bool {
    if !state.running() || state.bombs.len() >= state.tuning.bomb_cap {
        return false;
    }

    let id = state.next_entity_id();
    let pos = state.player.pos;
    let now = state.clock.now_ms();
    state.bombs.push(Bomb {
        id,
        pos,
        planted_ms: now,
    });
    state.scheduler.schedule(
        now + state.tuning.bomb_fuse_ms,
        TimerKind::BombFuse { bomb: id },
    );
    state.events.push(GameEvent::BombPlanted { id, pos });
    log::debug!("bomb {:?} planted at {:?}", id, pos);
    true
}

/// Pointer hit-test collection of a planted bomb
///
/// Only bombs past the grace period are collectible; success removes the
/// bomb (its fuse later finds nothing) and awards the small collect bonus.
pub fn try_collect_bomb(state: &mut SimState, point: Vec2) -> bool {
    if !state.running() {
        return false;
    }
    let now = state.clock.now_ms();
    let min_age = state.tuning.bomb_min_collect_age_ms;
    let pick = state.tuning.bomb_pick_radius;

    let Some(idx) = state
        .bombs
        .iter()
        .position(|b| b.pos.distance(point) < pick && b.collectible(now, min_age))
    else {
        return false;
    };

    let bomb = state.bombs.remove(idx);
    state.score += state.tuning.score_bomb_collect;
    state.events.push(GameEvent::BombCollected { id: bomb.id });
    true
}

/// Fire a bullet from the player toward an aim point
///
/// Needs ammo and a lapsed fire cooldown; both refusals are silent.
pub fn fire_bullet(state: &mut SimState, aim: Vec2) -> bool {
    if !state.running() || state.ammo == 0 {
        return false;
    }
    let now = state.clock.now_ms();
    if now - state.last_fire_ms < state.tuning.fire_cooldown_ms {
        return false;
    }
    let dir = crate::direction_to(state.player.pos, aim);
    if dir == Vec2::ZERO {
        return false;
    }

    let id = state.next_entity_id();
    let pos = state.player.pos;
    state.bullets.push(Bullet {
        id,
        pos,
        dir,
        fired_ms: now,
    });
    state.ammo -= 1;
    state.last_fire_ms = now;
    state.player.facing = crate::facing_angle(dir);
    state.events.push(GameEvent::BulletFired { id, pos, dir });
    true
}

/// Fuse expiry handler
///
/// Liveness guard first: a bomb collected before its fuse fired is gone
/// and the timer does nothing. Otherwise every enemy inside the blast
/// radius dies, each kill scoring and scheduling two replacements.
pub fn explode_bomb(state: &mut SimState, bomb_id: EntityId) {
    let Some(idx) = state.bombs.iter().position(|b| b.id == bomb_id) else {
        return;
    };
    let bomb = state.bombs.remove(idx);
    state.events.push(GameEvent::BombExploded {
        id: bomb.id,
        pos: bomb.pos,
    });
    state.spawn_effect(EffectKind::Explosion, bomb.pos, EXPLOSION_EFFECT_MS);

    let blast = state.tuning.blast_radius;
    let killed: Vec<(EntityId, Vec2)> = state
        .enemies
        .iter()
        .filter(|e| e.pos.distance(bomb.pos) < blast)
        .map(|e| (e.id, e.pos))
        .collect();

    for &(enemy_id, pos) in &killed {
        state.enemies.retain(|e| e.id != enemy_id);
        state.score += state.tuning.score_bomb_kill;
        state.events.push(GameEvent::EnemyKilled { id: enemy_id, pos });
        for _ in 0..state.tuning.respawns_per_kill {
            state.spawn_enemy_near_player();
        }
    }

    if !killed.is_empty() {
        log::info!(
            "bomb {:?} killed {} enemies (score {})",
            bomb.id,
            killed.len(),
            state.score
        );
    }
}

/// Enemy pursuit and the melee-contact lose condition
///
/// Runs after movement so contact is judged against the player's latest
/// position. The first enemy inside the contact radius ends the run.
pub fn advance_enemies(state: &mut SimState, dt: f32) {
    if !state.running() {
        return;
    }
    let target = state.player.pos;
    let step = state.tuning.enemy_speed * dt;

    for enemy in &mut state.enemies {
        let dir = (target - enemy.pos).normalize_or_zero();
        enemy.pos += dir * step;
        if dir != Vec2::ZERO {
            enemy.facing = crate::facing_angle(dir);
        }
    }

    let contact = state.tuning.contact_radius;
    if state.enemies.iter().any(|e| e.pos.distance(target) < contact) {
        lose(state);
    }
}

/// `Running -> Lost`, exactly once
fn lose(state: &mut SimState) {
    if state.phase != Phase::Running {
        return;
    }
    state.phase = Phase::Lost;
    state.player.alive = false;
    let pos = state.player.pos;
    state.spawn_effect(EffectKind::DeathSplash, pos, HIT_EFFECT_MS);
    state.events.push(GameEvent::GameLost { pos });
    log::info!("player caught, final score {}", state.score);
}

/// Advance every bullet and resolve hits and expiry
pub fn advance_bullets(state: &mut SimState, dt: f32) {
    if !state.running() {
        return;
    }
    let step = state.tuning.bullet_speed * dt;
    for bullet in &mut state.bullets {
        bullet.pos += bullet.dir * step;
    }

    // First enemy within the hit radius takes the bullet; an enemy
    // already claimed by an earlier bullet this tick cannot die twice
    let hit_radius = state.tuning.bullet_hit_radius;
    let mut spent_bullets: Vec<EntityId> = Vec::new();
    let mut killed: Vec<(EntityId, Vec2)> = Vec::new();

    for bullet in &state.bullets {
        let claimed = killed.iter().map(|(id, _)| *id).collect::<Vec<_>>();
        if let Some(enemy) = state
            .enemies
            .iter()
            .find(|e| !claimed.contains(&e.id) && e.pos.distance(bullet.pos) < hit_radius)
        {
            spent_bullets.push(bullet.id);
            killed.push((enemy.id, enemy.pos));
        }
    }

    for &(enemy_id, pos) in &killed {
        state.enemies.retain(|e| e.id != enemy_id);
        state.score += state.tuning.score_bullet_kill;
        state.events.push(GameEvent::EnemyKilled { id: enemy_id, pos });
        state.spawn_effect(EffectKind::HitSplash, pos, HIT_EFFECT_MS);
        for _ in 0..state.tuning.respawns_per_kill {
            state.spawn_enemy_near_player();
        }
    }
    if !spent_bullets.is_empty() {
        state.bullets.retain(|b| !spent_bullets.contains(&b.id));
        for id in spent_bullets {
            state.events.push(GameEvent::BulletRemoved { id });
        }
    }

    // Silent removal past max age, no score change
    let now = state.clock.now_ms();
    let ttl = state.tuning.bullet_ttl_ms;
    let mut timed_out: Vec<EntityId> = Vec::new();
    state.bullets.retain(|b| {
        if b.expired(now, ttl) {
            timed_out.push(b.id);
            false
        } else {
            true
        }
    });
    for id in timed_out {
        state.events.push(GameEvent::BulletRemoved { id });
    }
}

/// Proximity collection of ammo pickups
pub fn check_pickups(state: &mut SimState) {
    if !state.running() {
        return;
    }
    let player = state.player.pos;
    let radius = state.tuning.pickup_collect_radius;

    let mut collected: Vec<EntityId> = Vec::new();
    state.pickups.retain(|p| {
        if p.pos.distance(player) < radius {
            collected.push(p.id);
            false
        } else {
            true
        }
    });
    for id in collected {
        state.ammo += state.tuning.pickup_ammo_bonus;
        state.events.push(GameEvent::PickupCollected { id });
        log::debug!("pickup {:?} collected, ammo {}", id, state.ammo);
    }
}

/// Pickup lifetime expiry; a collected pickup is already gone
pub fn expire_pickup(state: &mut SimState, pickup_id: EntityId) {
    let Some(idx) = state.pickups.iter().position(|p| p.id == pickup_id) else {
        return;
    };
    state.pickups.remove(idx);
    state.events.push(GameEvent::PickupExpired { id: pickup_id });
}

/// Dispatch one due timer
pub fn on_timer(state: &mut SimState, kind: TimerKind) {
    match kind {
        TimerKind::BombFuse { bomb } => explode_bomb(state, bomb),
        TimerKind::PickupExpiry { pickup } => expire_pickup(state, pickup),
        TimerKind::PickupSpawn => {
            if state.running() {
                state.spawn_pickup_near_player();
            }
            // The spawner re-arms for the whole session
            let next = state.clock.now_ms() + state.tuning.pickup_interval_ms;
            state.scheduler.schedule(next, TimerKind::PickupSpawn);
        }
    }
}
