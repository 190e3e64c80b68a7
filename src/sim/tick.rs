//! Per-frame simulation step
//!
//! One call per display frame. The order is fixed; later stages read what
//! earlier stages wrote:
//! 1. difficulty from elapsed time
//! 2. player motion
//! 3. frame counter and spawning
//! 4. obstacle advance, collision, ramp jumps, pruning
//! 5. game over on any blocking contact
//! 6. score

use super::collision::{CollisionResult, Effect, evaluate, lane_edge};
use super::difficulty::{spawn_frequency, speed_multiplier};
use super::random::RandomSource;
use super::score;
use super::state::{GameOverCause, GamePhase, GameState};

/// Player/obstacle motion per step, in nominal frames
const FRAME_DT: f32 = 1.0;

/// What happened during one step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameEvents {
    /// Id of the obstacle spawned on cadence this frame
    pub spawned: Option<u32>,
    /// Obstacles culled behind the player
    pub pruned: usize,
    /// A ramp launched the player
    pub jumped: bool,
    /// Set on the frame the run ended
    pub game_over: Option<GameOverCause>,
}

/// Advance the run by one frame at wall-clock time `now_ms`.
///
/// Does nothing once the run is over.
pub fn tick<R: RandomSource>(state: &mut GameState<R>, now_ms: f64) -> FrameEvents {
    let mut events = FrameEvents::default();
    if state.phase == GamePhase::GameOver {
        return events;
    }

    let ramp_duration_ms = state.config.ramp_duration_ms;
    let max_multiplier = state.config.max_speed_multiplier;
    let base_frequency = state.config.base_frequency;
    let obstacle_speed = state.config.obstacle_speed;
    let prune_margin = state.config.prune_margin;

    // 1. Difficulty
    let multiplier = speed_multiplier(now_ms - state.run_start_ms, ramp_duration_ms, max_multiplier);
    state.speed_multiplier = multiplier;

    // 2. Player
    let player_before = state.player.position;
    state.player.advance(FRAME_DT, multiplier);
    let player_shift = state.player.position - player_before;

    // 3. Spawning
    state.frame += 1;
    let frequency = spawn_frequency(base_frequency, multiplier);
    events.spawned = state
        .spawner
        .tick(state.frame, frequency, state.player.position.z, &mut state.rng);

    // 4. Obstacles
    state.spawner.advance_all(obstacle_speed * multiplier * FRAME_DT);

    let player_bounds = state.player.bounds();
    let mut blocked_by = lane_edge(state.player.position.x, state.player.lane_limit())
        .is_blocking()
        .then_some(GameOverCause::LaneEdge);
    let mut launch = false;

    for obstacle in state.spawner.iter() {
        // Previous position as seen from where the player is now, so the
        // sweep covers the relative motion of both
        let prev = obstacle.prev_position + player_shift;
        match evaluate(&player_bounds, obstacle, prev, obstacle.position) {
            CollisionResult::None => {}
            CollisionResult::Interactive(Effect::TriggerJump) => launch = true,
            CollisionResult::Blocking => {
                if blocked_by.is_none() {
                    blocked_by = Some(GameOverCause::Obstacle {
                        id: obstacle.id,
                        kind: obstacle.kind,
                    });
                }
            }
        }
    }

    if launch {
        events.jumped = state.player.request_jump(&mut state.rng);
        if events.jumped {
            log::debug!(
                "Ramp jump at frame {} (vy {:.3})",
                state.frame,
                state.player.vertical_velocity
            );
        }
    }

    events.pruned = state.spawner.prune_behind(state.player.position.z, prune_margin);

    // 5. Game over
    if let Some(cause) = blocked_by {
        state.end_run(cause);
        events.game_over = Some(cause);
        return events;
    }

    // 6. Score
    (state.score, state.last_score_ms) =
        score::tick(state.score, now_ms, state.last_score_ms, multiplier);

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::obstacle::{HazardModel, ObstacleKind};
    use crate::sim::player::LateralIntent;
    use crate::sim::random::{ScriptedSource, seeded};

    const ROCK: ObstacleKind = ObstacleKind::Hazard(HazardModel::Rock);

    /// Every random draw is 0.999: all spawns are ramps hugging the right
    /// lane edge, which leaves the middle of the lane clear.
    fn clear_lane_game(config: GameConfig) -> GameState<ScriptedSource> {
        GameState::new(config, ScriptedSource::constant(0.999), 0.0).expect("valid config")
    }

    #[test]
    fn test_scenario_a_constant_forward_progress() {
        let mut state = clear_lane_game(GameConfig::default());
        let mut last_z = state.player().position.z;
        for _ in 0..1000 {
            let events = tick(&mut state, 0.0);
            assert!(events.game_over.is_none());
            let z = state.player().position.z;
            assert!(z < last_z);
            assert!((last_z - z - 0.2).abs() < 1e-3);
            last_z = z;
        }
        assert_eq!(state.phase(), GamePhase::Running);
        assert_eq!(state.frame(), 1000);
        assert!((state.player().position.z + 200.0).abs() < 0.05);
    }

    #[test]
    fn test_scenario_b_single_hazard_ends_run_once() {
        let mut state = clear_lane_game(GameConfig::default());
        let rock = state.place_obstacle(ROCK, 0.0, -10.0);

        let mut over_at = None;
        let mut transitions = 0;
        for step in 1..=100u64 {
            let events = tick(&mut state, 0.0);
            if let Some(cause) = events.game_over {
                transitions += 1;
                over_at = Some(step);
                assert_eq!(cause, GameOverCause::Obstacle { id: rock, kind: ROCK });
            }
        }
        // 10 units apart, closing 0.4 per frame, contact at 0.75 apart
        assert_eq!(over_at, Some(24));
        assert_eq!(transitions, 1);
        assert!(state.is_game_over());
        assert_eq!(state.frame(), 24);
    }

    #[test]
    fn test_scenario_c_lane_edge_is_fatal() {
        let mut state = clear_lane_game(GameConfig::default());
        state.set_lateral_intent(LateralIntent::Left);

        let mut cause = None;
        for _ in 0..200 {
            if let Some(c) = tick(&mut state, 0.0).game_over {
                cause = Some(c);
                break;
            }
            assert!(state.player().position.x > -20.0);
        }
        assert_eq!(cause, Some(GameOverCause::LaneEdge));
        assert_eq!(state.player().position.x, -20.0);
        // ceil(20 / 0.3) frames to reach the edge
        assert_eq!(state.frame(), 67);
    }

    #[test]
    fn test_game_over_halts_simulation() {
        let mut state = clear_lane_game(GameConfig::default());
        state.place_obstacle(ROCK, 0.0, -1.0);
        assert!(tick(&mut state, 0.0).game_over.is_some());

        let frozen = state.snapshot();
        for i in 0..50 {
            assert_eq!(tick(&mut state, i as f64 * 1000.0), FrameEvents::default());
        }
        assert_eq!(state.snapshot(), frozen);
    }

    #[test]
    fn test_swept_collision_at_high_multiplier() {
        // Ramp saturates immediately; a frame closes 0.2 * 40 * 2 = 16 units
        let config = GameConfig {
            ramp_duration_ms: 1.0,
            max_speed_multiplier: 40.0,
            ..Default::default()
        };
        let mut state = clear_lane_game(config);
        state.clear_obstacles();
        let rock = state.place_obstacle(ROCK, 0.0, -5.0);

        let events = tick(&mut state, 10.0);
        // Rock slid 8 units to z=3 while the player skied 8 units to z=-8.
        // Neither end of the rock's own path touches the player; only the
        // relative sweep sees them cross.
        let player = state.player().position.z;
        let rock_z = state
            .spawner()
            .iter()
            .find(|o| o.id == rock)
            .map(|o| o.position.z)
            .expect("rock is still live");
        assert!(rock_z > player + 1.0);
        assert_eq!(events.game_over, Some(GameOverCause::Obstacle { id: rock, kind: ROCK }));
    }

    #[test]
    fn test_ramp_launches_over_rock() {
        let mut state = clear_lane_game(GameConfig::default());
        state.clear_obstacles();
        state.place_obstacle(ObstacleKind::Ramp, 0.0, -5.0);
        state.place_obstacle(ROCK, 0.0, -15.0);

        let mut jumps = 0;
        let mut was_airborne = false;
        for _ in 0..300 {
            let events = tick(&mut state, 0.0);
            assert!(events.game_over.is_none(), "ramp or rock ended the run");
            if events.jumped {
                jumps += 1;
            }
            was_airborne |= state.player().is_airborne();
        }
        assert_eq!(jumps, 1);
        assert!(was_airborne);
        assert!(!state.player().is_airborne());
        assert_eq!(state.player().position.y, state.config().ground_height);
    }

    #[test]
    fn test_prepopulation_matches_steady_state() {
        let mut state = clear_lane_game(GameConfig::default());
        let spacing = state.config().closing_speed(1.0) * state.config().base_frequency as f32;
        let initial: Vec<u32> = state.spawner().iter().map(|o| o.id).collect();
        assert_eq!(initial.len(), 25);

        let zs: Vec<f32> = state.spawner().iter().map(|o| o.position.z).collect();
        for pair in zs.windows(2) {
            assert!((pair[1] - pair[0] - spacing).abs() < 1e-3);
        }

        for _ in 0..100 {
            tick(&mut state, 0.0);
        }
        let spawned: Vec<f32> = state
            .spawner()
            .iter()
            .filter(|o| !initial.contains(&o.id))
            .map(|o| o.position.z)
            .collect();
        assert_eq!(spawned.len(), 5);
        for pair in spawned.windows(2) {
            assert!((pair[0] - pair[1] - spacing).abs() < 1e-3);
        }

        // No gap where the pre-populated run hands over to spawning
        let farthest_initial = state
            .spawner()
            .iter()
            .find(|o| o.id == initial[0])
            .map(|o| o.position.z)
            .expect("still ahead of the player");
        let gap = farthest_initial - spawned[0];
        assert!(gap > 0.0 && gap <= spacing + 1e-3, "gap {gap}");
    }

    #[test]
    fn test_score_follows_time_at_1x() {
        let config = GameConfig {
            ramp_duration_ms: 1.0e12,
            ..Default::default()
        };
        let mut state = clear_lane_game(config);
        for i in 1..=100 {
            tick(&mut state, i as f64 * 100.0);
        }
        assert_eq!(state.score(), 10);
    }

    #[test]
    fn test_difficulty_speeds_up_the_run() {
        let mut state = clear_lane_game(GameConfig::default());
        tick(&mut state, 0.0);
        let early = state.speed_multiplier();
        tick(&mut state, 60_000.0);
        let mid = state.speed_multiplier();
        tick(&mut state, 600_000.0);
        let late = state.speed_multiplier();
        assert_eq!(early, 1.0);
        assert!(mid > early);
        assert_eq!(late, state.config().max_speed_multiplier);

        let z = state.player().position.z;
        tick(&mut state, 600_000.0);
        assert!((z - state.player().position.z - 0.2 * late).abs() < 1e-3);
    }

    #[test]
    fn test_reset_after_game_over() {
        let mut state = GameState::new(GameConfig::default(), seeded(5), 0.0).expect("valid config");
        state.set_lateral_intent(LateralIntent::Right);
        let mut now = 0.0;
        while !state.is_game_over() {
            now += 250.0;
            tick(&mut state, now);
        }
        let best = state.best_score();
        assert_eq!(best, state.score());

        state.reset(now);
        assert_eq!(state.phase(), GamePhase::Running);
        assert_eq!(state.frame(), 0);
        assert_eq!(state.raw_score(), 0.0);
        assert_eq!(state.speed_multiplier(), 1.0);
        assert!(state.game_over_cause().is_none());
        assert_eq!(state.player().position.x, 0.0);
        assert_eq!(state.player().position.z, 0.0);
        assert_eq!(state.player().intent, LateralIntent::None);
        assert_eq!(state.spawner().len(), 25);
        assert_eq!(state.best_score(), best);

        tick(&mut state, now + 16.0);
        assert_eq!(state.frame(), 1);
    }

    #[test]
    fn test_reset_while_running_is_idempotent() {
        let mut state = clear_lane_game(GameConfig::default());
        for _ in 0..10 {
            tick(&mut state, 0.0);
        }
        state.reset(0.0);
        let first = state.snapshot();
        state.reset(0.0);
        let second = state.snapshot();
        assert_eq!(first.player, second.player);
        assert_eq!(first.obstacles.len(), second.obstacles.len());
        assert_eq!(first.frame, 0);
    }

    #[test]
    fn test_determinism() {
        let mut a = GameState::new(GameConfig::default(), seeded(99_999), 0.0).expect("valid config");
        let mut b = GameState::new(GameConfig::default(), seeded(99_999), 0.0).expect("valid config");

        let intents = [LateralIntent::Left, LateralIntent::None, LateralIntent::Right];
        for i in 0..600u32 {
            let intent = intents[(i / 40) as usize % intents.len()];
            a.set_lateral_intent(intent);
            b.set_lateral_intent(intent);
            let now = i as f64 * 16.0;
            assert_eq!(tick(&mut a, now), tick(&mut b, now));
        }
        assert_eq!(a.snapshot(), b.snapshot());
    }
}
