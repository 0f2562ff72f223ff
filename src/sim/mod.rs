//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies
//!
//! The host drives it with [`tick`] once per frame, answers async tile
//! requests through [`SimState::tile_arrived`], and drains
//! [`GameEvent`]s to mirror the state into its scene graph.

pub mod clock;
pub mod combat;
pub mod entities;
pub mod grid;
pub mod movement;
pub mod scheduler;
pub mod state;
pub mod tick;

pub use clock::Clock;
pub use entities::{Bomb, Bullet, Effect, EffectKind, Enemy, EntityId, Pickup, Player};
pub use grid::{GridStreamer, TerrainKind, TileCoord};
pub use movement::MoveMode;
pub use scheduler::{Scheduler, TimerKind};
pub use state::{GameEvent, HudSnapshot, Phase, SimState};
pub use tick::{TickInput, tick};
