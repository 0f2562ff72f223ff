//! Grid streamer: lazily discovered terrain tiles
//!
//! Terrain is an unbounded grid of fixed-size square tiles discovered as
//! the player walks. When the player comes within a margin of a tile
//! edge, a creation request for the neighbor goes out to the presentation
//! host (asset loads are async); an in-flight marker per coordinate
//! prevents duplicate requests until the host reports arrival. Tile kind
//! is rolled at request time from the seeded RNG, independent of
//! neighbors - non-contiguous biomes are accepted by design.

use std::collections::HashMap;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::state::GameEvent;
use crate::consts::{EDGE_CHECK_INTERVAL_MS, EDGE_SPAWN_MARGIN, TILE_SIZE};

/// Integer tile coordinate on the ground plane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    pub x: i32,
    pub z: i32,
}

impl TileCoord {
    /// Tile containing a continuous ground position
    pub fn containing(pos: Vec2) -> Self {
        Self {
            x: (pos.x / TILE_SIZE).floor() as i32,
            z: (pos.y / TILE_SIZE).floor() as i32,
        }
    }

    /// Ground-plane center of this tile
    pub fn center(self) -> Vec2 {
        Vec2::new(
            (self.x as f32 + 0.5) * TILE_SIZE,
            (self.z as f32 + 0.5) * TILE_SIZE,
        )
    }
}

/// Closed set of terrain kinds; only water blocks movement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerrainKind {
    Open,
    Forest,
    Water,
    Mountain,
    Desert,
}

impl TerrainKind {
    pub fn passable(self) -> bool {
        self != TerrainKind::Water
    }

    /// Uniform roll over the closed kind set
    pub fn sample(rng: &mut Pcg32) -> Self {
        match rng.random_range(0..5u32) {
            0 => TerrainKind::Open,
            1 => TerrainKind::Forest,
            2 => TerrainKind::Water,
            3 => TerrainKind::Mountain,
            _ => TerrainKind::Desert,
        }
    }

    /// Model/style hint for the presentation layer
    pub fn as_str(self) -> &'static str {
        match self {
            TerrainKind::Open => "plain",
            TerrainKind::Forest => "forest",
            TerrainKind::Water => "water",
            TerrainKind::Mountain => "mountain",
            TerrainKind::Desert => "desert",
        }
    }
}

/// Discovered tiles plus in-flight creation requests
#[derive(Debug, Clone, Default)]
pub struct GridStreamer {
    /// Committed tiles; kind is immutable once present
    tiles: HashMap<TileCoord, TerrainKind>,
    /// In-flight requests with the kind already rolled
    pending: HashMap<TileCoord, TerrainKind>,
    last_check_ms: f64,
}

impl GridStreamer {
    pub fn new() -> Self {
        Self {
            tiles: HashMap::new(),
            pending: HashMap::new(),
            last_check_ms: f64::NEG_INFINITY,
        }
    }

    /// Request the session's first tile (always forest, like the start
    /// of every run)
    pub fn request_origin(&mut self, events: &mut Vec<GameEvent>) {
        self.request(TileCoord { x: 0, z: 0 }, TerrainKind::Forest, events);
    }

    /// Issue neighbor requests if the player is near any tile edge
    ///
    /// Rate-limited to one edge check per [`EDGE_CHECK_INTERVAL_MS`] of
    /// clock time regardless of tick rate.
    pub fn ensure_neighbors(
        &mut self,
        player_pos: Vec2,
        now_ms: f64,
        rng: &mut Pcg32,
        events: &mut Vec<GameEvent>,
    ) {
        if now_ms - self.last_check_ms < EDGE_CHECK_INTERVAL_MS {
            return;
        }
        self.last_check_ms = now_ms;

        let here = TileCoord::containing(player_pos);
        let rel_x = player_pos.x.rem_euclid(TILE_SIZE);
        let rel_z = player_pos.y.rem_euclid(TILE_SIZE);

        if rel_x > TILE_SIZE - EDGE_SPAWN_MARGIN {
            self.request_random(TileCoord { x: here.x + 1, z: here.z }, rng, events);
        }
        if rel_x < EDGE_SPAWN_MARGIN {
            self.request_random(TileCoord { x: here.x - 1, z: here.z }, rng, events);
        }
        if rel_z > TILE_SIZE - EDGE_SPAWN_MARGIN {
            self.request_random(TileCoord { x: here.x, z: here.z + 1 }, rng, events);
        }
        if rel_z < EDGE_SPAWN_MARGIN {
            self.request_random(TileCoord { x: here.x, z: here.z - 1 }, rng, events);
        }
    }

    fn request_random(&mut self, coord: TileCoord, rng: &mut Pcg32, events: &mut Vec<GameEvent>) {
        if self.tiles.contains_key(&coord) || self.pending.contains_key(&coord) {
            return;
        }
        // Kind is rolled now, at request time, not when the tile lands
        let kind = TerrainKind::sample(rng);
        self.request(coord, kind, events);
    }

    fn request(&mut self, coord: TileCoord, kind: TerrainKind, events: &mut Vec<GameEvent>) {
        if self.tiles.contains_key(&coord) || self.pending.contains_key(&coord) {
            return;
        }
        log::debug!("requesting tile {:?} ({})", coord, kind.as_str());
        self.pending.insert(coord, kind);
        events.push(GameEvent::TileRequested { coord, kind });
    }

    /// Host notification: the tile's model landed and its entry animation
    /// finished. Commits the tile and clears the in-flight marker.
    pub fn tile_arrived(&mut self, coord: TileCoord) -> Option<TerrainKind> {
        let kind = self.pending.remove(&coord)?;
        self.tiles.entry(coord).or_insert(kind);
        Some(kind)
    }

    /// Host notification: the tile load failed. Clears the in-flight
    /// marker so the coordinate can be requested again later.
    pub fn request_failed(&mut self, coord: TileCoord) {
        if self.pending.remove(&coord).is_some() {
            log::debug!("tile request failed, marker cleared: {:?}", coord);
        }
    }

    /// Terrain kind under a continuous position; `None` while the tile is
    /// undiscovered or still in flight (treated as passable - the tile
    /// will arrive before the player can reach its interior)
    pub fn terrain_kind_at(&self, pos: Vec2) -> Option<TerrainKind> {
        self.tiles.get(&TileCoord::containing(pos)).copied()
    }

    pub fn has_tile(&self, coord: TileCoord) -> bool {
        self.tiles.contains_key(&coord)
    }

    pub fn in_flight(&self, coord: TileCoord) -> bool {
        self.pending.contains_key(&coord)
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Directly commit a tile (host-driven setup, tests)
    pub fn insert_tile(&mut self, coord: TileCoord, kind: TerrainKind) {
        self.tiles.entry(coord).or_insert(kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(7)
    }

    fn tile_requests(events: &[GameEvent]) -> Vec<TileCoord> {
        events
            .iter()
            .filter_map(|e| match e {
                GameEvent::TileRequested { coord, .. } => Some(*coord),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_containing_floor_division() {
        assert_eq!(
            TileCoord::containing(Vec2::new(2.0, 2.0)),
            TileCoord { x: 0, z: 0 }
        );
        assert_eq!(
            TileCoord::containing(Vec2::new(4.5, -0.1)),
            TileCoord { x: 1, z: -1 }
        );
        assert_eq!(
            TileCoord::containing(Vec2::new(-4.0, -4.1)),
            TileCoord { x: -1, z: -2 }
        );
    }

    #[test]
    fn test_single_in_flight_request_per_coordinate() {
        let mut grid = GridStreamer::new();
        let mut rng = rng();
        let mut events = Vec::new();

        // Near the +x edge of tile (0,0)
        let pos = Vec2::new(3.0, 2.0);
        let mut now = 0.0;
        for _ in 0..20 {
            grid.ensure_neighbors(pos, now, &mut rng, &mut events);
            now += 200.0; // Past the rate limit every time
        }

        let requests = tile_requests(&events);
        assert_eq!(requests, vec![TileCoord { x: 1, z: 0 }]);
        assert!(grid.in_flight(TileCoord { x: 1, z: 0 }));
    }

    #[test]
    fn test_arrival_commits_kind_rolled_at_request_time() {
        let mut grid = GridStreamer::new();
        let mut rng = rng();
        let mut events = Vec::new();

        grid.ensure_neighbors(Vec2::new(3.0, 2.0), 0.0, &mut rng, &mut events);
        let coord = TileCoord { x: 1, z: 0 };
        let requested_kind = match events[0] {
            GameEvent::TileRequested { kind, .. } => kind,
            _ => panic!("expected tile request"),
        };

        let arrived = grid.tile_arrived(coord).unwrap();
        assert_eq!(arrived, requested_kind);
        assert!(!grid.in_flight(coord));
        assert_eq!(grid.terrain_kind_at(Vec2::new(5.0, 1.0)), Some(requested_kind));

        // Re-arrival of the same coordinate is a no-op
        assert!(grid.tile_arrived(coord).is_none());
        assert_eq!(grid.tile_count(), 1);
    }

    #[test]
    fn test_no_re_request_after_arrival() {
        let mut grid = GridStreamer::new();
        let mut rng = rng();
        let mut events = Vec::new();

        grid.ensure_neighbors(Vec2::new(3.0, 2.0), 0.0, &mut rng, &mut events);
        grid.tile_arrived(TileCoord { x: 1, z: 0 });

        events.clear();
        grid.ensure_neighbors(Vec2::new(3.0, 2.0), 500.0, &mut rng, &mut events);
        assert!(tile_requests(&events).is_empty());
    }

    #[test]
    fn test_failed_request_clears_marker_and_allows_retry() {
        let mut grid = GridStreamer::new();
        let mut rng = rng();
        let mut events = Vec::new();

        grid.ensure_neighbors(Vec2::new(3.0, 2.0), 0.0, &mut rng, &mut events);
        let coord = TileCoord { x: 1, z: 0 };
        assert!(grid.in_flight(coord));

        grid.request_failed(coord);
        assert!(!grid.in_flight(coord));
        assert!(!grid.has_tile(coord));

        events.clear();
        grid.ensure_neighbors(Vec2::new(3.0, 2.0), 500.0, &mut rng, &mut events);
        assert_eq!(tile_requests(&events), vec![coord]);
    }

    #[test]
    fn test_edge_checks_rate_limited() {
        let mut grid = GridStreamer::new();
        let mut rng = rng();
        let mut events = Vec::new();

        // First check requests the +x neighbor
        grid.ensure_neighbors(Vec2::new(3.0, 2.0), 0.0, &mut rng, &mut events);
        assert_eq!(events.len(), 1);

        // 50 ms later, now near the -x edge too: suppressed by the limiter
        grid.ensure_neighbors(Vec2::new(0.5, 2.0), 50.0, &mut rng, &mut events);
        assert_eq!(events.len(), 1);

        // Past the interval the new edge is picked up
        grid.ensure_neighbors(Vec2::new(0.5, 2.0), 150.0, &mut rng, &mut events);
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_corner_requests_both_neighbors() {
        let mut grid = GridStreamer::new();
        let mut rng = rng();
        let mut events = Vec::new();

        // Near both the +x and +z edges at once
        grid.ensure_neighbors(Vec2::new(3.0, 3.0), 0.0, &mut rng, &mut events);
        let mut requests = tile_requests(&events);
        requests.sort_by_key(|c| (c.x, c.z));
        assert_eq!(
            requests,
            vec![TileCoord { x: 0, z: 1 }, TileCoord { x: 1, z: 0 }]
        );
    }

    #[test]
    fn test_unknown_terrain_is_none() {
        let grid = GridStreamer::new();
        assert_eq!(grid.terrain_kind_at(Vec2::new(100.0, 100.0)), None);
    }

    #[test]
    fn test_kind_immutable_once_assigned() {
        let mut grid = GridStreamer::new();
        let coord = TileCoord { x: 0, z: 0 };
        grid.insert_tile(coord, TerrainKind::Water);
        grid.insert_tile(coord, TerrainKind::Desert);
        assert_eq!(grid.terrain_kind_at(Vec2::new(1.0, 1.0)), Some(TerrainKind::Water));
    }
}
