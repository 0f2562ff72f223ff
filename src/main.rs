//! Bombtrot entry point
//!
//! Headless demo driver: runs the simulation on the autopilot for a
//! fixed stretch of simulated time, mirroring state into a
//! [`RecordingBridge`] the way a real presentation host would, and logs
//! HUD snapshots along the way.
//!
//! Usage: `bombtrot [seed] [seconds]`. `BOMBTROT_TUNING` may point at a
//! JSON file overriding balance values.

use std::time::{SystemTime, UNIX_EPOCH};

use bombtrot::bridge::{RecordingBridge, SceneSync};
use bombtrot::consts::{MAX_SUBSTEPS, SIM_DT};
use bombtrot::sim::{tick, MoveMode, Phase, SimState, TickInput};
use bombtrot::tuning::Tuning;

struct Demo {
    state: SimState,
    sync: SceneSync,
    bridge: RecordingBridge,
    input: TickInput,
    accumulator: f32,
}

impl Demo {
    fn new(seed: u64, tuning: Tuning) -> Self {
        Self {
            state: SimState::new(seed, tuning, MoveMode::directional()),
            sync: SceneSync::new(),
            bridge: RecordingBridge::new(),
            input: TickInput {
                idle_mode: true,
                ..Default::default()
            },
            accumulator: 0.0,
        }
    }

    /// Run simulation ticks for one frame's worth of elapsed time
    fn update(&mut self, dt: f32) {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, &self.input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.start = false;
            self.input.fire = false;
            self.input.plant_bomb = false;
            self.input.click_target = None;
            self.input.collect_at = None;

            self.mirror();
        }
    }

    /// Drain deltas into the scene mirror and acknowledge tile loads
    ///
    /// A real host answers `tile_arrived` after the model finishes its
    /// entry animation; the headless bridge answers immediately.
    fn mirror(&mut self) {
        let events = self.state.drain_events();
        let arrived = self.sync.apply_events(&mut self.bridge, &events);
        for coord in arrived {
            self.state.tile_arrived(coord);
        }
        self.sync.sync_positions(&mut self.bridge, &self.state);
    }
}

fn load_tuning() -> Tuning {
    let Ok(path) = std::env::var("BOMBTROT_TUNING") else {
        return Tuning::default();
    };
    match std::fs::read_to_string(&path) {
        Ok(json) => match Tuning::from_json(&json) {
            Ok(tuning) => {
                log::info!("tuning loaded from {}", path);
                tuning
            }
            Err(err) => {
                log::warn!("bad tuning file {}: {}, using defaults", path, err);
                Tuning::default()
            }
        },
        Err(err) => {
            log::warn!("cannot read {}: {}, using defaults", path, err);
            Tuning::default()
        }
    }
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        });
    let seconds: f32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(30.0);

    log::info!("bombtrot demo starting (seed {}, {}s)", seed, seconds);

    let mut demo = Demo::new(seed, load_tuning());
    demo.mirror();
    demo.input.start = true;

    let total_ticks = (seconds / SIM_DT).ceil() as u64;
    let ticks_per_second = (1.0 / SIM_DT).round() as u64;

    for n in 0..total_ticks {
        demo.update(SIM_DT);

        if n % ticks_per_second == 0 {
            match serde_json::to_string(&demo.state.hud()) {
                Ok(json) => log::info!("hud {}", json),
                Err(err) => log::warn!("hud serialize failed: {}", err),
            }
        }
        if demo.state.phase.terminal() {
            break;
        }
    }

    let hud = demo.state.hud();
    let outcome = match hud.phase {
        Phase::Lost => "caught",
        Phase::Running | Phase::Idle => "survived",
        Phase::Won => "won",
    };
    log::info!(
        "demo over: {} after {:.1}s, score {}, {} tiles streamed, {} scene nodes live",
        outcome,
        demo.state.clock.now_ms() / 1000.0,
        hud.score,
        demo.state.grid.tile_count(),
        demo.bridge.live_nodes(),
    );
}
