//! Data-driven game balance
//!
//! Every gameplay constant the resolvers read lives here, so a balance
//! pass is a JSON edit rather than a recompile. Defaults mirror
//! [`crate::consts`].

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Gameplay balance knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Movement ===
    /// Player movement speed (units/sec)
    pub player_speed: f32,
    /// Enemy pursuit speed (units/sec)
    pub enemy_speed: f32,
    /// Click-to-move arrival threshold
    pub arrive_radius: f32,

    // === Bombs ===
    pub bomb_cap: usize,
    pub bomb_fuse_ms: f64,
    pub bomb_min_collect_age_ms: f64,
    pub bomb_pick_radius: f32,
    pub blast_radius: f32,

    // === Bullets ===
    pub bullet_speed: f32,
    pub bullet_hit_radius: f32,
    pub bullet_ttl_ms: f64,
    pub fire_cooldown_ms: f64,

    // === Enemies ===
    pub contact_radius: f32,
    pub enemy_respawn_dist: f32,
    pub respawns_per_kill: u32,

    // === Pickups ===
    pub pickup_interval_ms: f64,
    pub pickup_ttl_ms: f64,
    pub pickup_collect_radius: f32,
    pub pickup_ammo_bonus: u32,

    // === Scoring ===
    pub score_bomb_kill: u64,
    pub score_bullet_kill: u64,
    pub score_bomb_collect: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_speed: PLAYER_SPEED,
            enemy_speed: ENEMY_SPEED,
            arrive_radius: ARRIVE_RADIUS,

            bomb_cap: BOMB_CAP,
            bomb_fuse_ms: BOMB_FUSE_MS,
            bomb_min_collect_age_ms: BOMB_MIN_COLLECT_AGE_MS,
            bomb_pick_radius: BOMB_PICK_RADIUS,
            blast_radius: BLAST_RADIUS,

            bullet_speed: BULLET_SPEED,
            bullet_hit_radius: BULLET_HIT_RADIUS,
            bullet_ttl_ms: BULLET_TTL_MS,
            fire_cooldown_ms: FIRE_COOLDOWN_MS,

            contact_radius: CONTACT_RADIUS,
            enemy_respawn_dist: ENEMY_RESPAWN_DIST,
            respawns_per_kill: RESPAWNS_PER_KILL,

            pickup_interval_ms: PICKUP_INTERVAL_MS,
            pickup_ttl_ms: PICKUP_TTL_MS,
            pickup_collect_radius: PICKUP_COLLECT_RADIUS,
            pickup_ammo_bonus: PICKUP_AMMO_BONUS,

            score_bomb_kill: SCORE_BOMB_KILL,
            score_bullet_kill: SCORE_BULLET_KILL,
            score_bomb_collect: SCORE_BOMB_COLLECT,
        }
    }
}

impl Tuning {
    /// Parse tuning overrides from a JSON document
    ///
    /// Missing fields keep their defaults, so a tuning file only needs
    /// the knobs it changes.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize the full tuning table (for dumping current balance)
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
