//! Game state and core simulation types
//!
//! One owned [`SimState`] holds every mutable counter and entity
//! collection; resolvers receive it by exclusive reference each tick.
//! Timers reference entities by id only and re-validate liveness when
//! they fire.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use super::clock::Clock;
use super::entities::{Bomb, Bullet, Effect, EffectKind, Enemy, EntityId, IdGen, Pickup, Player};
use super::grid::{GridStreamer, TerrainKind, TileCoord};
use super::movement::MoveMode;
use super::scheduler::{Scheduler, TimerKind};
use crate::consts::*;
use crate::tuning::Tuning;

/// Overall run state
///
/// `Won` is reserved: the base design has survival-only scoring with no
/// victory condition, so nothing produces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    /// Pre-start, simulation paused
    Idle,
    /// Tick loop active
    Running,
    /// Terminal (reserved, unreachable)
    Won,
    /// Terminal, enemy made contact
    Lost,
}

impl Phase {
    pub fn terminal(self) -> bool {
        matches!(self, Phase::Won | Phase::Lost)
    }
}

/// Read-only scoreboard snapshot published after every state-affecting tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HudSnapshot {
    pub bomb_count: usize,
    pub bomb_cap: usize,
    pub ammo: u32,
    pub score: u64,
    pub phase: Phase,
}

/// Presentation deltas emitted by the simulation, drained by the host
/// once per tick
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Async tile creation request; the host answers with
    /// [`SimState::tile_arrived`] once the model landed
    TileRequested { coord: TileCoord, kind: TerrainKind },
    GameStarted,
    GameLost { pos: Vec2 },
    EnemySpawned { id: EntityId, pos: Vec2 },
    EnemyKilled { id: EntityId, pos: Vec2 },
    BombPlanted { id: EntityId, pos: Vec2 },
    BombExploded { id: EntityId, pos: Vec2 },
    BombCollected { id: EntityId },
    BulletFired { id: EntityId, pos: Vec2, dir: Vec2 },
    /// Bullet left play, either by hitting an enemy or by timing out
    BulletRemoved { id: EntityId },
    PickupSpawned { id: EntityId, pos: Vec2 },
    PickupCollected { id: EntityId },
    PickupExpired { id: EntityId },
    EffectSpawned { id: EntityId, kind: EffectKind, pos: Vec2, ttl_ms: f64 },
    EffectExpired { id: EntityId },
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct SimState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub clock: Clock,
    pub phase: Phase,
    /// Monotonic while running, frozen at terminal phases
    pub score: u64,
    pub ammo: u32,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub bombs: Vec<Bomb>,
    pub bullets: Vec<Bullet>,
    pub pickups: Vec<Pickup>,
    /// Transient presentation-only effects
    pub effects: Vec<Effect>,
    pub grid: GridStreamer,
    pub scheduler: Scheduler,
    pub move_mode: MoveMode,
    pub tuning: Tuning,
    /// Clock time of the last shot (fire-rate cooldown)
    pub last_fire_ms: f64,
    /// Pending presentation deltas
    pub events: Vec<GameEvent>,
    pub(crate) rng: Pcg32,
    ids: IdGen,
}

impl SimState {
    /// Create a fresh session in `Idle`
    ///
    /// Requests the origin tile and arms the periodic pickup spawner.
    pub fn new(seed: u64, tuning: Tuning, move_mode: MoveMode) -> Self {
        let mut state = Self {
            seed,
            clock: Clock::new(),
            phase: Phase::Idle,
            score: 0,
            ammo: 0,
            // Center of the origin tile
            player: Player::new(Vec2::new(TILE_SIZE / 2.0, TILE_SIZE / 2.0)),
            enemies: Vec::new(),
            bombs: Vec::new(),
            bullets: Vec::new(),
            pickups: Vec::new(),
            effects: Vec::new(),
            grid: GridStreamer::new(),
            scheduler: Scheduler::new(),
            move_mode,
            tuning,
            last_fire_ms: f64::NEG_INFINITY,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            ids: IdGen::new(),
        };

        state.grid.request_origin(&mut state.events);
        let first_spawn = state.tuning.pickup_interval_ms;
        state.scheduler.schedule(first_spawn, TimerKind::PickupSpawn);
        state
    }

    /// Begin the run: `Idle` -> `Running`, first enemy appears
    pub fn start(&mut self) {
        if self.phase != Phase::Idle {
            return;
        }
        self.phase = Phase::Running;
        let (x, z) = INITIAL_ENEMY_POS;
        self.spawn_enemy_at(Vec2::new(x, z));
        self.events.push(GameEvent::GameStarted);
        log::info!("run started (seed {})", self.seed);
    }

    pub fn running(&self) -> bool {
        self.phase == Phase::Running
    }

    /// Allocate a new entity id
    pub fn next_entity_id(&mut self) -> EntityId {
        self.ids.next()
    }

    pub fn spawn_enemy_at(&mut self, pos: Vec2) -> EntityId {
        let id = self.next_entity_id();
        let facing = crate::facing_angle(crate::direction_to(pos, self.player.pos));
        self.enemies.push(Enemy { id, pos, facing });
        self.events.push(GameEvent::EnemySpawned { id, pos });
        id
    }

    /// Replacement spawn at a random bearing around the player
    pub fn spawn_enemy_near_player(&mut self) -> EntityId {
        let angle = self.rng.random_range(0.0..std::f32::consts::TAU);
        let dist = self.tuning.enemy_respawn_dist;
        let pos = self.player.pos + Vec2::new(angle.cos(), angle.sin()) * dist;
        self.spawn_enemy_at(pos)
    }

    /// Periodic ammo pickup, dropped a short random distance from the
    /// player; expires if uncollected
    pub fn spawn_pickup_near_player(&mut self) -> EntityId {
        let angle = self.rng.random_range(0.0..std::f32::consts::TAU);
        let dist = self.rng.random_range(PICKUP_MIN_DIST..PICKUP_MAX_DIST);
        let pos = self.player.pos + Vec2::new(angle.cos(), angle.sin()) * dist;

        let id = self.next_entity_id();
        let now = self.clock.now_ms();
        self.pickups.push(Pickup {
            id,
            pos,
            spawned_ms: now,
        });
        self.scheduler.schedule(
            now + self.tuning.pickup_ttl_ms,
            TimerKind::PickupExpiry { pickup: id },
        );
        self.events.push(GameEvent::PickupSpawned { id, pos });
        id
    }

    /// Emit a transient effect; the per-tick expiry pass removes it
    pub fn spawn_effect(&mut self, kind: EffectKind, pos: Vec2, ttl_ms: f64) -> EntityId {
        let id = self.next_entity_id();
        self.effects.push(Effect {
            id,
            kind,
            pos,
            spawned_ms: self.clock.now_ms(),
            ttl_ms,
        });
        self.events.push(GameEvent::EffectSpawned { id, kind, pos, ttl_ms });
        id
    }

    /// Issue neighbor tile requests around the player's current position
    pub fn stream_neighbors(&mut self) {
        let now = self.clock.now_ms();
        self.grid
            .ensure_neighbors(self.player.pos, now, &mut self.rng, &mut self.events);
    }

    /// Host callback: a requested tile's model loaded and its entry
    /// animation completed
    pub fn tile_arrived(&mut self, coord: TileCoord) {
        if let Some(kind) = self.grid.tile_arrived(coord) {
            log::debug!("tile arrived {:?} ({})", coord, kind.as_str());
        }
    }

    /// Host callback: a tile load failed; the coordinate becomes
    /// requestable again
    pub fn tile_request_failed(&mut self, coord: TileCoord) {
        self.grid.request_failed(coord);
    }

    /// Scoreboard snapshot for the UI collaborator
    pub fn hud(&self) -> HudSnapshot {
        HudSnapshot {
            bomb_count: self.bombs.len(),
            bomb_cap: self.tuning.bomb_cap,
            ammo: self.ammo,
            score: self.score,
            phase: self.phase,
        }
    }

    /// Take the presentation deltas accumulated since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
