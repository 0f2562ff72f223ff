//! Bombtrot - an isometric bomb-runner arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid streaming, entities, combat, game state)
//! - `bridge`: Presentation boundary (scene spawn/remove contract)
//! - `tuning`: Data-driven game balance

pub mod bridge;
pub mod sim;
pub mod tuning;

pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
///
/// Positions are 2D ground-plane coordinates: `Vec2::x` is world x,
/// `Vec2::y` is world z. The vertical axis never enters the simulation.
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per rendered frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Terrain tile footprint (world units, square)
    pub const TILE_SIZE: f32 = 4.0;
    /// Distance from a tile edge that triggers a neighbor request
    pub const EDGE_SPAWN_MARGIN: f32 = 1.5;
    /// Minimum clock time between edge checks (bounds request volume)
    pub const EDGE_CHECK_INTERVAL_MS: f64 = 100.0;

    /// Player movement speed (units/sec)
    pub const PLAYER_SPEED: f32 = 3.0;
    /// Enemy pursuit speed (units/sec)
    pub const ENEMY_SPEED: f32 = 1.8;
    /// Bullet speed (units/sec)
    pub const BULLET_SPEED: f32 = 12.0;
    /// Click-to-move arrival threshold
    pub const ARRIVE_RADIUS: f32 = 0.1;

    /// Maximum simultaneously planted bombs
    pub const BOMB_CAP: usize = 5;
    /// Bomb fuse duration
    pub const BOMB_FUSE_MS: f64 = 3000.0;
    /// Minimum bomb age before manual collection is allowed
    pub const BOMB_MIN_COLLECT_AGE_MS: f64 = 1000.0;
    /// Pointer hit-test radius for collecting a planted bomb
    pub const BOMB_PICK_RADIUS: f32 = 0.4;
    /// Explosion kill radius
    pub const BLAST_RADIUS: f32 = 1.5;

    /// Bullet-vs-enemy hit radius
    pub const BULLET_HIT_RADIUS: f32 = 0.5;
    /// Bullet time-to-live
    pub const BULLET_TTL_MS: f64 = 3000.0;
    /// Minimum clock time between shots
    pub const FIRE_COOLDOWN_MS: f64 = 250.0;

    /// Enemy touching distance that ends the game
    pub const CONTACT_RADIUS: f32 = 0.8;
    /// Distance from the player at which replacement enemies appear
    pub const ENEMY_RESPAWN_DIST: f32 = 8.0;
    /// Replacement spawns scheduled per kill
    pub const RESPAWNS_PER_KILL: u32 = 2;
    /// Initial enemy position at game start
    pub const INITIAL_ENEMY_POS: (f32, f32) = (8.0, 8.0);

    /// Ammo pickup spawn period
    pub const PICKUP_INTERVAL_MS: f64 = 15000.0;
    /// Uncollected pickup lifetime
    pub const PICKUP_TTL_MS: f64 = 10000.0;
    /// Player-to-pickup collection radius
    pub const PICKUP_COLLECT_RADIUS: f32 = 0.8;
    /// Ammo granted per pickup
    pub const PICKUP_AMMO_BONUS: u32 = 5;
    /// Pickup spawn distance band around the player
    pub const PICKUP_MIN_DIST: f32 = 2.0;
    pub const PICKUP_MAX_DIST: f32 = 4.0;

    /// Score awards
    pub const SCORE_BOMB_KILL: u64 = 10;
    pub const SCORE_BULLET_KILL: u64 = 5;
    pub const SCORE_BOMB_COLLECT: u64 = 1;

    /// Transient effect lifetimes (presentation only)
    pub const EXPLOSION_EFFECT_MS: f64 = 300.0;
    pub const HIT_EFFECT_MS: f64 = 1000.0;
}

/// Facing angle (radians, y-axis rotation) for a ground-plane direction
///
/// Matches the isometric model convention: zero faces +z, positive
/// rotates toward +x.
#[inline]
pub fn facing_angle(dir: Vec2) -> f32 {
    dir.x.atan2(dir.y)
}

/// Direction from `from` to `to` on the ground plane, or zero if coincident
#[inline]
pub fn direction_to(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).normalize_or_zero()
}
