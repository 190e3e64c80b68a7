//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed step per display frame
//! - Injected RNG only
//! - Time comes in as an argument, never from an ambient clock
//! - No rendering or platform dependencies

pub mod aabb;
pub mod collision;
pub mod difficulty;
pub mod obstacle;
pub mod player;
pub mod random;
pub mod score;
pub mod state;
pub mod tick;

pub use aabb::Aabb;
pub use collision::{CollisionResult, Effect, evaluate, lane_edge};
pub use difficulty::{spawn_frequency, speed_multiplier};
pub use obstacle::{HazardModel, Obstacle, ObstacleKind, ObstacleSpawner};
pub use player::{JumpState, LateralIntent, Player};
pub use random::{RandomSource, ScriptedSource, seeded};
pub use state::{FrameSnapshot, GameOverCause, GamePhase, GameState, ObstacleView, PlayerView};
pub use tick::{FrameEvents, tick};
