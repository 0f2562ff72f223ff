//! Movement and input resolution
//!
//! One consolidated resolver with two mutually exclusive modes picked at
//! session start: legacy click-to-move (steer toward a clicked ground
//! point, plant a bomb on arrival) and direct directional input. Both
//! funnel into the same candidate-position check; terrain is the only
//! thing that blocks movement, and only water terrain at that.

use glam::Vec2;

use super::state::SimState;
use super::tick::TickInput;

/// Movement strategy, fixed for the session
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveMode {
    /// Steer toward a clicked ground point; arriving plants a bomb
    ClickToMove { target: Option<Vec2> },
    /// Unit intent vector straight from held keys
    Directional,
}

impl MoveMode {
    pub fn click_to_move() -> Self {
        MoveMode::ClickToMove { target: None }
    }

    pub fn directional() -> Self {
        MoveMode::Directional
    }
}

/// Advance the player one tick from input intent and terrain
pub fn resolve(state: &mut SimState, input: &TickInput, dt: f32) {
    accept_click_target(state, input);

    let mut arrived = false;
    let desired = match state.move_mode {
        MoveMode::Directional => {
            let v = input.move_dir;
            (v.length_squared() > 1e-6).then(|| v.normalize())
        }
        MoveMode::ClickToMove { target: Some(t) } => {
            let to_target = t - state.player.pos;
            if to_target.length() < state.tuning.arrive_radius {
                arrived = true;
                None
            } else {
                Some(to_target.normalize())
            }
        }
        MoveMode::ClickToMove { target: None } => None,
    };

    if arrived {
        clear_target(state);
        // Move-stop plant; silently refused at the bomb cap
        super::combat::plant_bomb(state);
    }

    if let Some(dir) = desired {
        let candidate = state.player.pos + dir * state.tuning.player_speed * dt;
        let blocked = state
            .grid
            .terrain_kind_at(candidate)
            .is_some_and(|k| !k.passable());

        if blocked {
            // Water is the sole blocking rule; a click route into water
            // is abandoned rather than re-tried every tick
            clear_target(state);
        } else {
            state.player.pos = candidate;
            state.player.facing = crate::facing_angle(dir);
        }
    }

    // Facing tracks the aim point when one is supplied
    if let Some(aim) = input.aim {
        let dir = crate::direction_to(state.player.pos, aim);
        if dir != Vec2::ZERO {
            state.player.facing = crate::facing_angle(dir);
        }
    }
}

fn accept_click_target(state: &mut SimState, input: &TickInput) {
    let Some(click) = input.click_target else {
        return;
    };
    if let MoveMode::ClickToMove { ref mut target } = state.move_mode {
        let on_water = state
            .grid
            .terrain_kind_at(click)
            .is_some_and(|k| !k.passable());
        if !on_water {
            *target = Some(click);
        }
    }
}

fn clear_target(state: &mut SimState) {
    if let MoveMode::ClickToMove { ref mut target } = state.move_mode {
        *target = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::grid::{TerrainKind, TileCoord};
    use crate::sim::state::Phase;
    use crate::tuning::Tuning;

    fn directional_state() -> SimState {
        let mut state = SimState::new(1, Tuning::default(), MoveMode::directional());
        state.phase = Phase::Running;
        state
    }

    fn click_state() -> SimState {
        let mut state = SimState::new(1, Tuning::default(), MoveMode::click_to_move());
        state.phase = Phase::Running;
        state
    }

    #[test]
    fn test_directional_move_and_facing() {
        let mut state = directional_state();
        let start = state.player.pos;

        let input = TickInput {
            move_dir: Vec2::new(1.0, 0.0),
            ..Default::default()
        };
        resolve(&mut state, &input, SIM_DT);

        let expected = start + Vec2::new(state.tuning.player_speed * SIM_DT, 0.0);
        assert!((state.player.pos - expected).length() < 1e-5);
        assert!((state.player.facing - crate::facing_angle(Vec2::new(1.0, 0.0))).abs() < 1e-5);
    }

    #[test]
    fn test_water_candidate_rejects_move() {
        let mut state = directional_state();
        // Player stands on the unknown (passable) tile (1,0); tile (0,0)
        // is water, so stepping back west must be refused
        state.player.pos = Vec2::new(4.03, 2.0);
        state.grid.insert_tile(TileCoord { x: 0, z: 0 }, TerrainKind::Water);

        let before = state.player.pos;
        let input = TickInput {
            move_dir: Vec2::new(-1.0, 0.0),
            ..Default::default()
        };
        resolve(&mut state, &input, SIM_DT);
        assert_eq!(state.player.pos, before);

        // Moving the other way is fine
        let input = TickInput {
            move_dir: Vec2::new(1.0, 0.0),
            ..Default::default()
        };
        resolve(&mut state, &input, SIM_DT);
        assert!(state.player.pos.x > before.x);
    }

    #[test]
    fn test_undiscovered_terrain_is_passable() {
        let mut state = directional_state();
        state.player.pos = Vec2::new(100.0, 100.0);
        let input = TickInput {
            move_dir: Vec2::new(0.0, 1.0),
            ..Default::default()
        };
        resolve(&mut state, &input, SIM_DT);
        assert!(state.player.pos.y > 100.0);
    }

    #[test]
    fn test_click_steers_then_plants_on_arrival() {
        let mut state = click_state();
        let goal = state.player.pos + Vec2::new(0.5, 0.0);

        let click = TickInput {
            click_target: Some(goal),
            ..Default::default()
        };
        resolve(&mut state, &click, SIM_DT);
        assert!(matches!(
            state.move_mode,
            MoveMode::ClickToMove { target: Some(_) }
        ));

        // Walk until arrival; the stop plants a bomb
        let idle = TickInput::default();
        for _ in 0..60 {
            resolve(&mut state, &idle, SIM_DT);
        }
        assert!(matches!(state.move_mode, MoveMode::ClickToMove { target: None }));
        assert_eq!(state.bombs.len(), 1);
        assert!((state.player.pos - goal).length() < state.tuning.arrive_radius + 0.1);
    }

    #[test]
    fn test_click_on_water_refused() {
        let mut state = click_state();
        state.grid.insert_tile(TileCoord { x: 5, z: 5 }, TerrainKind::Water);

        let click = TickInput {
            click_target: Some(Vec2::new(22.0, 22.0)),
            ..Default::default()
        };
        resolve(&mut state, &click, SIM_DT);
        assert!(matches!(state.move_mode, MoveMode::ClickToMove { target: None }));
    }

    #[test]
    fn test_aim_overrides_facing() {
        let mut state = directional_state();
        let aim = state.player.pos + Vec2::new(0.0, 5.0);
        let input = TickInput {
            move_dir: Vec2::new(1.0, 0.0),
            aim: Some(aim),
            ..Default::default()
        };
        resolve(&mut state, &input, SIM_DT);

        // Facing tracks the aim point from the post-movement position,
        // not the eastward movement direction
        let expected = crate::facing_angle(crate::direction_to(state.player.pos, aim));
        assert!((state.player.facing - expected).abs() < 1e-5);
        assert!((state.player.facing - crate::facing_angle(Vec2::new(1.0, 0.0))).abs() > 0.5);
    }
}
