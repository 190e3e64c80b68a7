//! Run configuration
//!
//! All tuning is fixed for the duration of a run. Hosts may ship a JSON
//! override; anything left out falls back to the defaults in `consts`.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Invalid configuration, reported by `GameConfig::validate`
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be positive (got {value})")]
    NonPositive { field: &'static str, value: f64 },
    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f64 },
    #[error("base obstacle frequency must be at least one frame")]
    ZeroFrequency,
    #[error("speed multiplier cap must be at least 1 (got {0})")]
    MultiplierCap(f32),
    #[error("boost factor must be at least 1 (got {0})")]
    BoostFactor(f32),
    #[error("hitbox scale must be in (0, 1] (got {0})")]
    HitboxScale(f32),
    #[error("pre-population would place {0} obstacles (limit {max})", max = MAX_PREPOPULATED)]
    TooDense(f32),
    #[error("at least one obstacle kind needs a positive weight")]
    NoObstacleKinds,
    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Relative spawn weights per obstacle kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KindWeights {
    pub rock: f32,
    pub tree: f32,
    pub ramp: f32,
}

impl Default for KindWeights {
    /// Even three-way split
    fn default() -> Self {
        Self {
            rock: 1.0,
            tree: 1.0,
            ramp: 1.0,
        }
    }
}

impl KindWeights {
    pub fn total(&self) -> f32 {
        self.rock + self.tree + self.ramp
    }
}

/// Constants supplied at construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Lane & player ===
    /// Lane half-width
    pub lane_limit: f32,
    /// Player box centre height when grounded
    pub ground_height: f32,
    /// Player box half extents
    pub player_half_extents: Vec3,
    /// Forward progress per frame at 1x
    pub base_forward_speed: f32,
    /// Lateral shift per frame while steering
    pub lateral_step: f32,
    pub boost_factor: f32,
    pub max_lean: f32,

    // === Jump ===
    pub gravity: f32,
    pub jump_velocity_base: f32,
    pub jump_velocity_extra: f32,

    // === Difficulty ===
    pub ramp_duration_ms: f64,
    pub max_speed_multiplier: f32,

    // === Obstacles ===
    /// Obstacle advance per frame at 1x
    pub obstacle_speed: f32,
    /// Frames between spawns at 1x
    pub base_frequency: u32,
    pub spawn_distance: f32,
    pub prune_margin: f32,
    pub kind_weights: KindWeights,
    pub hitbox_scale: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            lane_limit: LANE_LIMIT,
            ground_height: GROUND_HEIGHT,
            player_half_extents: Vec3::new(PLAYER_HALF_WIDTH, PLAYER_HALF_HEIGHT, PLAYER_HALF_DEPTH),
            base_forward_speed: FORWARD_SPEED,
            lateral_step: LATERAL_STEP,
            boost_factor: BOOST_FACTOR,
            max_lean: MAX_LEAN,

            gravity: GRAVITY,
            jump_velocity_base: JUMP_VELOCITY_BASE,
            jump_velocity_extra: JUMP_VELOCITY_EXTRA,

            ramp_duration_ms: RAMP_DURATION_MS,
            max_speed_multiplier: MAX_SPEED_MULTIPLIER,

            obstacle_speed: OBSTACLE_SPEED,
            base_frequency: BASE_OBSTACLE_FREQUENCY,
            spawn_distance: SPAWN_DISTANCE,
            prune_margin: PRUNE_MARGIN,
            kind_weights: KindWeights::default(),
            hitbox_scale: HITBOX_SCALE,
        }
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    // Written as a negation so NaN is rejected too
    if !(value > 0.0) {
        return Err(ConfigError::NonPositive { field, value });
    }
    Ok(())
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(value >= 0.0) {
        return Err(ConfigError::Negative { field, value });
    }
    Ok(())
}

impl GameConfig {
    /// Parse a (possibly partial) JSON config and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject configurations that would make per-frame behavior undefined
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("lane_limit", self.lane_limit as f64)?;
        positive("base_forward_speed", self.base_forward_speed as f64)?;
        positive("obstacle_speed", self.obstacle_speed as f64)?;
        positive("lateral_step", self.lateral_step as f64)?;
        positive("gravity", self.gravity as f64)?;
        positive("jump_velocity_base", self.jump_velocity_base as f64)?;
        positive("ramp_duration_ms", self.ramp_duration_ms)?;
        positive("spawn_distance", self.spawn_distance as f64)?;
        positive("player_half_extents.x", self.player_half_extents.x as f64)?;
        positive("player_half_extents.y", self.player_half_extents.y as f64)?;
        positive("player_half_extents.z", self.player_half_extents.z as f64)?;

        non_negative("jump_velocity_extra", self.jump_velocity_extra as f64)?;
        non_negative("prune_margin", self.prune_margin as f64)?;
        non_negative("max_lean", self.max_lean as f64)?;

        if self.base_frequency == 0 {
            return Err(ConfigError::ZeroFrequency);
        }
        if !(self.max_speed_multiplier >= 1.0) {
            return Err(ConfigError::MultiplierCap(self.max_speed_multiplier));
        }
        if !(self.boost_factor >= 1.0) {
            return Err(ConfigError::BoostFactor(self.boost_factor));
        }
        if !(self.hitbox_scale > 0.0 && self.hitbox_scale <= 1.0) {
            return Err(ConfigError::HitboxScale(self.hitbox_scale));
        }

        // Slow speeds over a long approach pack the start of the run
        let spacing = self.base_frequency as f32 * self.closing_speed(1.0);
        let prepopulated = (self.spawn_distance / spacing).ceil();
        if !(prepopulated <= MAX_PREPOPULATED) {
            return Err(ConfigError::TooDense(prepopulated));
        }

        let w = &self.kind_weights;
        non_negative("kind_weights.rock", w.rock as f64)?;
        non_negative("kind_weights.tree", w.tree as f64)?;
        non_negative("kind_weights.ramp", w.ramp as f64)?;
        if !(w.total() > 0.0) {
            return Err(ConfigError::NoObstacleKinds);
        }

        log::debug!("Config validated: lane ±{}, base frequency {}", self.lane_limit, self.base_frequency);
        Ok(())
    }

    /// Per-frame approach speed of a fresh obstacle at the given multiplier
    /// (the player skis toward it while it slides toward the player)
    pub fn closing_speed(&self, speed_multiplier: f32) -> f32 {
        (self.base_forward_speed + self.obstacle_speed) * speed_multiplier
    }
}
