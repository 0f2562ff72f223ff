//! Presentation boundary
//!
//! The simulation never talks to a scene graph directly; it emits
//! [`GameEvent`]s and the host mirrors them through a
//! [`PresentationBridge`]. [`SceneSync`] is the stock mirror: it owns
//! the entity-to-handle mapping, applies each drained event as a
//! spawn/remove call, and pushes fresh positions for the movers every
//! frame.

use std::collections::HashMap;

use glam::Vec2;

use crate::sim::{EntityId, GameEvent, SimState, TileCoord};

/// What a spawned scene node represents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneKind {
    Tile,
    Player,
    Enemy,
    Bomb,
    Bullet,
    Pickup,
    Effect,
}

/// Opaque handle to a node owned by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SceneHandle(pub u64);

/// Host-side scene graph operations the simulation mirror drives
///
/// `remove` must be idempotent: timers and expiry sweeps can both name
/// the same entity in one frame.
pub trait PresentationBridge {
    fn spawn(&mut self, kind: SceneKind, pos: Vec2) -> SceneHandle;
    fn set_position(&mut self, handle: SceneHandle, pos: Vec2);
    fn remove(&mut self, handle: SceneHandle);
    fn position(&self, handle: SceneHandle) -> Option<Vec2>;
}

/// Applies simulation deltas to a [`PresentationBridge`]
#[derive(Debug, Default)]
pub struct SceneSync {
    entities: HashMap<EntityId, SceneHandle>,
    tiles: HashMap<TileCoord, SceneHandle>,
    player: Option<SceneHandle>,
}

impl SceneSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mirror one tick's worth of drained events into the bridge
    ///
    /// Returns the tile coordinates whose scene nodes were created this
    /// call; the host acknowledges each with
    /// [`SimState::tile_arrived`] once its load/entry animation is done.
    pub fn apply_events(
        &mut self,
        bridge: &mut dyn PresentationBridge,
        events: &[GameEvent],
    ) -> Vec<TileCoord> {
        let mut arrived = Vec::new();
        for event in events {
            match *event {
                GameEvent::TileRequested { coord, .. } => {
                    let center = coord.center();
                    let handle = bridge.spawn(SceneKind::Tile, center);
                    self.tiles.insert(coord, handle);
                    arrived.push(coord);
                }
                GameEvent::EnemySpawned { id, pos } => {
                    let handle = bridge.spawn(SceneKind::Enemy, pos);
                    self.entities.insert(id, handle);
                }
                GameEvent::BombPlanted { id, pos } => {
                    let handle = bridge.spawn(SceneKind::Bomb, pos);
                    self.entities.insert(id, handle);
                }
                GameEvent::BulletFired { id, pos, .. } => {
                    let handle = bridge.spawn(SceneKind::Bullet, pos);
                    self.entities.insert(id, handle);
                }
                GameEvent::PickupSpawned { id, pos } => {
                    let handle = bridge.spawn(SceneKind::Pickup, pos);
                    self.entities.insert(id, handle);
                }
                GameEvent::EffectSpawned { id, pos, .. } => {
                    let handle = bridge.spawn(SceneKind::Effect, pos);
                    self.entities.insert(id, handle);
                }
                GameEvent::EnemyKilled { id, .. }
                | GameEvent::BombExploded { id, .. }
                | GameEvent::BombCollected { id }
                | GameEvent::BulletRemoved { id }
                | GameEvent::PickupCollected { id }
                | GameEvent::PickupExpired { id }
                | GameEvent::EffectExpired { id } => {
                    if let Some(handle) = self.entities.remove(&id) {
                        bridge.remove(handle);
                    }
                }
                GameEvent::GameStarted => {}
                GameEvent::GameLost { .. } => {
                    if let Some(handle) = self.player.take() {
                        bridge.remove(handle);
                    }
                }
            }
        }
        arrived
    }

    /// Push current positions for everything that moves
    pub fn sync_positions(&mut self, bridge: &mut dyn PresentationBridge, state: &SimState) {
        if state.player.alive {
            let handle = *self
                .player
                .get_or_insert_with(|| bridge.spawn(SceneKind::Player, state.player.pos));
            bridge.set_position(handle, state.player.pos);
        }
        for enemy in &state.enemies {
            if let Some(&handle) = self.entities.get(&enemy.id) {
                bridge.set_position(handle, enemy.pos);
            }
        }
        for bullet in &state.bullets {
            if let Some(&handle) = self.entities.get(&bullet.id) {
                bridge.set_position(handle, bullet.pos);
            }
        }
    }

    pub fn live_entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn tile_node_count(&self) -> usize {
        self.tiles.len()
    }
}

/// In-memory bridge for tests and the headless demo binary
#[derive(Debug, Default)]
pub struct RecordingBridge {
    next_handle: u64,
    nodes: HashMap<SceneHandle, (SceneKind, Vec2)>,
    pub spawns: Vec<SceneKind>,
    pub removals: u64,
}

impl RecordingBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn count_of(&self, kind: SceneKind) -> usize {
        self.nodes.values().filter(|(k, _)| *k == kind).count()
    }
}

impl PresentationBridge for RecordingBridge {
    fn spawn(&mut self, kind: SceneKind, pos: Vec2) -> SceneHandle {
        let handle = SceneHandle(self.next_handle);
        self.next_handle += 1;
        self.nodes.insert(handle, (kind, pos));
        self.spawns.push(kind);
        handle
    }

    fn set_position(&mut self, handle: SceneHandle, pos: Vec2) {
        if let Some(node) = self.nodes.get_mut(&handle) {
            node.1 = pos;
        }
    }

    fn remove(&mut self, handle: SceneHandle) {
        if self.nodes.remove(&handle).is_some() {
            self.removals += 1;
        }
    }

    fn position(&self, handle: SceneHandle) -> Option<Vec2> {
        self.nodes.get(&handle).map(|(_, pos)| *pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::{tick, MoveMode, TickInput};
    use crate::tuning::Tuning;

    fn run_frame(
        state: &mut SimState,
        sync: &mut SceneSync,
        bridge: &mut RecordingBridge,
        input: &TickInput,
    ) {
        tick(state, input, SIM_DT);
        let events = state.drain_events();
        let arrived = sync.apply_events(bridge, &events);
        for coord in arrived {
            state.tile_arrived(coord);
        }
        sync.sync_positions(bridge, state);
    }

    #[test]
    fn test_tile_request_round_trip() {
        let mut state = SimState::new(7, Tuning::default(), MoveMode::directional());
        let mut sync = SceneSync::new();
        let mut bridge = RecordingBridge::new();

        // The origin request was queued at construction
        run_frame(&mut state, &mut sync, &mut bridge, &TickInput::default());
        assert_eq!(bridge.count_of(SceneKind::Tile), 1);
        assert_eq!(sync.tile_node_count(), 1);
        assert!(state.grid.has_tile(TileCoord { x: 0, z: 0 }));
    }

    #[test]
    fn test_spawn_and_remove_mirrored() {
        let mut state = SimState::new(7, Tuning::default(), MoveMode::directional());
        let mut sync = SceneSync::new();
        let mut bridge = RecordingBridge::new();

        let start = TickInput {
            start: true,
            ..Default::default()
        };
        run_frame(&mut state, &mut sync, &mut bridge, &start);
        assert_eq!(bridge.count_of(SceneKind::Enemy), 1);

        let plant = TickInput {
            plant_bomb: true,
            ..Default::default()
        };
        run_frame(&mut state, &mut sync, &mut bridge, &plant);
        assert_eq!(bridge.count_of(SceneKind::Bomb), 1);

        // Ride out the fuse: bomb node goes, explosion effect appears
        // then expires
        let fuse_ticks = (state.tuning.bomb_fuse_ms / 1000.0 * 60.0) as u32 + 2;
        for _ in 0..fuse_ticks {
            run_frame(&mut state, &mut sync, &mut bridge, &TickInput::default());
        }
        assert_eq!(bridge.count_of(SceneKind::Bomb), 0);
        for _ in 0..30 {
            run_frame(&mut state, &mut sync, &mut bridge, &TickInput::default());
        }
        assert_eq!(bridge.count_of(SceneKind::Effect), 0);
    }

    #[test]
    fn test_positions_follow_the_sim() {
        let mut state = SimState::new(7, Tuning::default(), MoveMode::directional());
        let mut sync = SceneSync::new();
        let mut bridge = RecordingBridge::new();

        let start = TickInput {
            start: true,
            ..Default::default()
        };
        run_frame(&mut state, &mut sync, &mut bridge, &start);

        let walk = TickInput {
            move_dir: Vec2::new(1.0, 0.0),
            ..Default::default()
        };
        for _ in 0..30 {
            run_frame(&mut state, &mut sync, &mut bridge, &walk);
        }

        let enemy = &state.enemies[0];
        let handle = sync.entities[&enemy.id];
        assert_eq!(bridge.position(handle), Some(enemy.pos));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut bridge = RecordingBridge::new();
        let handle = bridge.spawn(SceneKind::Bomb, Vec2::ZERO);
        bridge.remove(handle);
        bridge.remove(handle);
        assert_eq!(bridge.removals, 1);
        assert_eq!(bridge.live_nodes(), 0);
    }
}
