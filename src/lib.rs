//! Ski Rush - An endless downhill skiing runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (player kinematics, obstacles, collisions, scoring)
//! - `config`: Run configuration and validation

pub mod config;
pub mod sim;

pub use config::{ConfigError, GameConfig, KindWeights};

/// Default tuning constants
///
/// Speeds and distances are in world units per nominal display frame.
pub mod consts {
    /// Lane half-width (player must stay inside ±LANE_LIMIT)
    pub const LANE_LIMIT: f32 = 20.0;

    /// Player forward speed at 1x difficulty
    pub const FORWARD_SPEED: f32 = 0.2;
    /// Obstacle advance toward the player at 1x difficulty
    pub const OBSTACLE_SPEED: f32 = 0.2;
    /// Lateral movement per frame while steering
    pub const LATERAL_STEP: f32 = 0.3;
    /// Forward speed multiplier while boosting
    pub const BOOST_FACTOR: f32 = 2.0;

    /// Vertical velocity lost per frame while airborne
    pub const GRAVITY: f32 = 0.02;
    /// Minimum take-off velocity off a ramp
    pub const JUMP_VELOCITY_BASE: f32 = 0.5;
    /// Random extra take-off velocity (0..this)
    pub const JUMP_VELOCITY_EXTRA: f32 = 0.3;

    /// Time for the difficulty ramp to reach its cap
    pub const RAMP_DURATION_MS: f64 = 120_000.0;
    /// Difficulty cap
    pub const MAX_SPEED_MULTIPLIER: f32 = 4.0;

    /// Frames between spawns at 1x difficulty
    pub const BASE_OBSTACLE_FREQUENCY: u32 = 20;
    /// How far ahead of the player obstacles appear
    pub const SPAWN_DISTANCE: f32 = 200.0;
    /// How far behind the player obstacles are culled
    pub const PRUNE_MARGIN: f32 = 50.0;
    /// Upper bound on obstacles placed ahead of the player at run start
    pub const MAX_PREPOPULATED: f32 = 1000.0;
    /// Hazard hitbox size relative to its visual bounds
    pub const HITBOX_SCALE: f32 = 0.5;

    /// Player box centre height when standing on the snow
    pub const GROUND_HEIGHT: f32 = -1.0;
    /// Snow surface height (obstacles stand on it)
    pub const SNOW_SURFACE: f32 = GROUND_HEIGHT - PLAYER_HALF_HEIGHT;
    /// Player box half extents
    pub const PLAYER_HALF_WIDTH: f32 = 0.5;
    pub const PLAYER_HALF_HEIGHT: f32 = 1.0;
    pub const PLAYER_HALF_DEPTH: f32 = 0.25;

    /// Maximum lean angle while steering (radians)
    pub const MAX_LEAN: f32 = 0.3;
    /// Per-frame lean smoothing factor
    pub const LEAN_SMOOTHING: f32 = 0.9;
}
