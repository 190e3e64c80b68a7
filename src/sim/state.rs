//! Run state and presentation snapshot
//!
//! `GameState` owns everything a run needs: the player, the obstacle
//! spawner, the injected random source and the score/time bookkeeping.

use glam::Vec3;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::difficulty::speed_multiplier;
use super::obstacle::{ObstacleKind, ObstacleSpawner};
use super::player::{LateralIntent, Player};
use super::random::RandomSource;
use super::score;
use crate::config::{ConfigError, GameConfig};

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Running,
    /// Terminal until `reset`
    GameOver,
}

/// What ended the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverCause {
    Obstacle { id: u32, kind: ObstacleKind },
    /// Skied into the cliffs at the lane edge
    LaneEdge,
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct GameState<R = Pcg32> {
    pub(crate) config: GameConfig,
    pub(crate) rng: R,
    pub(crate) player: Player,
    pub(crate) spawner: ObstacleSpawner,
    /// Accumulated score (displayed floored)
    pub(crate) score: f64,
    /// Best displayed score this session; survives reset
    pub(crate) best_score: u64,
    pub(crate) phase: GamePhase,
    /// Simulation frames since the run started
    pub(crate) frame: u64,
    pub(crate) run_start_ms: f64,
    pub(crate) last_score_ms: f64,
    /// Multiplier used by the most recent frame
    pub(crate) speed_multiplier: f32,
    pub(crate) game_over_cause: Option<GameOverCause>,
}

impl<R: RandomSource> GameState<R> {
    /// Validate the config and start a run at `now_ms`
    pub fn new(config: GameConfig, rng: R, now_ms: f64) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut state = Self {
            player: Player::new(&config),
            spawner: ObstacleSpawner::new(&config),
            config,
            rng,
            score: 0.0,
            best_score: 0,
            phase: GamePhase::Running,
            frame: 0,
            run_start_ms: now_ms,
            last_score_ms: now_ms,
            speed_multiplier: 1.0,
            game_over_cause: None,
        };
        state.populate();

        Ok(state)
    }

    /// Re-initialize everything except the session best and start a new run.
    ///
    /// Valid from either phase.
    pub fn reset(&mut self, now_ms: f64) {
        self.player.reset();
        self.spawner.clear();
        self.score = 0.0;
        self.phase = GamePhase::Running;
        self.frame = 0;
        self.run_start_ms = now_ms;
        self.last_score_ms = now_ms;
        self.speed_multiplier = 1.0;
        self.game_over_cause = None;
        self.populate();

        log::info!("Run reset ({} obstacles on the slope)", self.spawner.len());
    }

    /// Pre-populate the slope at the start-of-run difficulty
    fn populate(&mut self) {
        let multiplier = speed_multiplier(
            0.0,
            self.config.ramp_duration_ms,
            self.config.max_speed_multiplier,
        );
        self.spawner.prepopulate(
            self.player.position.z,
            self.config.base_frequency,
            self.config.closing_speed(multiplier),
            &mut self.rng,
        );
    }

    pub(crate) fn end_run(&mut self, cause: GameOverCause) {
        self.phase = GamePhase::GameOver;
        self.game_over_cause = Some(cause);
        self.best_score = self.best_score.max(score::display(self.score));
        log::info!(
            "Run over at frame {}: {:?} (score {}, best {})",
            self.frame,
            cause,
            score::display(self.score),
            self.best_score
        );
    }

    pub fn set_lateral_intent(&mut self, intent: LateralIntent) {
        self.player.set_lateral_intent(intent);
    }

    pub fn set_boost(&mut self, active: bool) {
        self.player.set_boost(active);
    }

    /// Put a specific obstacle on the slope (hosts and scripted scenarios)
    pub fn place_obstacle(&mut self, kind: ObstacleKind, x: f32, z: f32) -> u32 {
        self.spawner.place(kind, x, z)
    }

    /// Remove every live obstacle without touching the rest of the run
    pub fn clear_obstacles(&mut self) {
        self.spawner.clear();
    }
}

impl<R> GameState<R> {
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn spawner(&self) -> &ObstacleSpawner {
        &self.spawner
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn game_over_cause(&self) -> Option<GameOverCause> {
        self.game_over_cause
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Accumulated (unfloored) score
    pub fn raw_score(&self) -> f64 {
        self.score
    }

    /// Score as displayed
    pub fn score(&self) -> u64 {
        score::display(self.score)
    }

    pub fn best_score(&self) -> u64 {
        self.best_score
    }

    pub fn speed_multiplier(&self) -> f32 {
        self.speed_multiplier
    }

    /// Everything the presentation layer reads after a frame
    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            player: PlayerView {
                position: self.player.position,
                lean: self.player.lean,
                airborne: self.player.is_airborne(),
            },
            obstacles: self
                .spawner
                .iter()
                .map(|o| ObstacleView {
                    id: o.id,
                    kind: o.kind,
                    position: o.position,
                    past_player: o.past_player,
                })
                .collect(),
            score: self.score(),
            best_score: self.best_score,
            speed_multiplier: self.speed_multiplier,
            frame: self.frame,
            game_over: self.is_game_over(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub position: Vec3,
    pub lean: f32,
    pub airborne: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleView {
    pub id: u32,
    pub kind: ObstacleKind,
    pub position: Vec3,
    pub past_player: bool,
}

/// Read-only view of a frame for rendering and HUD
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub player: PlayerView,
    pub obstacles: Vec<ObstacleView>,
    pub score: u64,
    pub best_score: u64,
    pub speed_multiplier: f32,
    pub frame: u64,
    pub game_over: bool,
}
