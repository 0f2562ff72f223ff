//! Entity types and identity
//!
//! Flat vectors of plain structs, iterated in id order for deterministic
//! results. Ids are allocated from a monotonic counter and never reused;
//! a stale id held by a timer simply fails its lookup.

use glam::Vec2;

/// Unique identifier for an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

/// Monotonic id allocator
#[derive(Debug, Clone)]
pub struct IdGen {
    next: u32,
}

impl IdGen {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn next(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next += 1;
        id
    }
}

impl Default for IdGen {
    fn default() -> Self {
        Self::new()
    }
}

/// The player character (singleton, owned by the simulation)
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub facing: f32,
    pub alive: bool,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            facing: 0.0,
            alive: true,
        }
    }
}

/// A pursuing enemy
#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: EntityId,
    pub pos: Vec2,
    pub facing: f32,
}

/// A planted time-delayed bomb
#[derive(Debug, Clone)]
pub struct Bomb {
    pub id: EntityId,
    pub pos: Vec2,
    /// Clock time the bomb was planted
    pub planted_ms: f64,
}

impl Bomb {
    pub fn age_ms(&self, now_ms: f64) -> f64 {
        now_ms - self.planted_ms
    }

    /// Manual collection is only allowed after a short grace period
    pub fn collectible(&self, now_ms: f64, min_age_ms: f64) -> bool {
        self.age_ms(now_ms) > min_age_ms
    }
}

/// A fired projectile
#[derive(Debug, Clone)]
pub struct Bullet {
    pub id: EntityId,
    pub pos: Vec2,
    /// Unit direction on the ground plane
    pub dir: Vec2,
    pub fired_ms: f64,
}

impl Bullet {
    pub fn expired(&self, now_ms: f64, ttl_ms: f64) -> bool {
        now_ms - self.fired_ms > ttl_ms
    }
}

/// An ammo pickup floating near the player
#[derive(Debug, Clone)]
pub struct Pickup {
    pub id: EntityId,
    pub pos: Vec2,
    pub spawned_ms: f64,
}

/// Transient presentation-only effect kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    /// Explosion flash at a detonated bomb
    Explosion,
    /// Splash where a bullet hit an enemy
    HitSplash,
    /// Splash where the player was caught
    DeathSplash,
}

/// A transient visual effect
///
/// Never feeds back into gameplay; the core only tracks its lifetime so
/// it can tell the presentation layer when to drop it.
#[derive(Debug, Clone)]
pub struct Effect {
    pub id: EntityId,
    pub kind: EffectKind,
    pub pos: Vec2,
    pub spawned_ms: f64,
    pub ttl_ms: f64,
}

impl Effect {
    pub fn expired(&self, now_ms: f64) -> bool {
        now_ms - self.spawned_ms >= self.ttl_ms
    }
}
