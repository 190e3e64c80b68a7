//! Player kinematics
//!
//! The skier moves downhill (toward -z) on its own; input only steers, boosts
//! and, via ramps, jumps. Lane bounds are a hard clamp here; reaching the
//! edge is reported as fatal by the collision module, never by the player.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::random::RandomSource;
use crate::config::GameConfig;
use crate::consts::LEAN_SMOOTHING;

/// Steering direction requested by the input collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LateralIntent {
    Left,
    Right,
    #[default]
    None,
}

impl LateralIntent {
    /// Combine held keys; both held cancel out
    pub fn from_keys(left: bool, right: bool) -> Self {
        match (left, right) {
            (true, false) => LateralIntent::Left,
            (false, true) => LateralIntent::Right,
            _ => LateralIntent::None,
        }
    }

    /// -1 for left, +1 for right, 0 otherwise
    pub fn sign(self) -> f32 {
        match self {
            LateralIntent::Left => -1.0,
            LateralIntent::Right => 1.0,
            LateralIntent::None => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JumpState {
    Grounded,
    Airborne,
}

/// Player tuning, copied out of the run config
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PlayerParams {
    lane_limit: f32,
    ground_height: f32,
    half_extents: Vec3,
    forward_speed: f32,
    lateral_step: f32,
    boost_factor: f32,
    max_lean: f32,
    gravity: f32,
    jump_velocity_base: f32,
    jump_velocity_extra: f32,
}

/// The skier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Box centre: x lateral, y height, z forward progress (decreasing)
    pub position: Vec3,
    pub intent: LateralIntent,
    pub boost: bool,
    pub vertical_velocity: f32,
    pub jump: JumpState,
    /// Roll angle in radians, positive when leaning left
    pub lean: f32,
    params: PlayerParams,
}

impl Player {
    pub fn new(config: &GameConfig) -> Self {
        let params = PlayerParams {
            lane_limit: config.lane_limit,
            ground_height: config.ground_height,
            half_extents: config.player_half_extents,
            forward_speed: config.base_forward_speed,
            lateral_step: config.lateral_step,
            boost_factor: config.boost_factor,
            max_lean: config.max_lean,
            gravity: config.gravity,
            jump_velocity_base: config.jump_velocity_base,
            jump_velocity_extra: config.jump_velocity_extra,
        };
        Self {
            position: Vec3::new(0.0, params.ground_height, 0.0),
            intent: LateralIntent::None,
            boost: false,
            vertical_velocity: 0.0,
            jump: JumpState::Grounded,
            lean: 0.0,
            params,
        }
    }

    /// Back to the start line; tuning is kept
    pub fn reset(&mut self) {
        self.position = Vec3::new(0.0, self.params.ground_height, 0.0);
        self.intent = LateralIntent::None;
        self.boost = false;
        self.vertical_velocity = 0.0;
        self.jump = JumpState::Grounded;
        self.lean = 0.0;
    }

    pub fn set_lateral_intent(&mut self, intent: LateralIntent) {
        self.intent = intent;
    }

    pub fn set_boost(&mut self, active: bool) {
        self.boost = active;
    }

    #[inline]
    pub fn is_airborne(&self) -> bool {
        self.jump == JumpState::Airborne
    }

    #[inline]
    pub fn lane_limit(&self) -> f32 {
        self.params.lane_limit
    }

    #[inline]
    pub fn ground_height(&self) -> f32 {
        self.params.ground_height
    }

    /// Start a jump with a randomised take-off velocity.
    ///
    /// Returns false (and does nothing) if already airborne.
    pub fn request_jump(&mut self, rng: &mut impl RandomSource) -> bool {
        if self.is_airborne() {
            return false;
        }
        let extra = rng.next_unit() * self.params.jump_velocity_extra;
        self.vertical_velocity = self.params.jump_velocity_base + extra;
        self.jump = JumpState::Airborne;
        true
    }

    /// Forward speed this frame at the given difficulty
    pub fn forward_speed(&self, speed_multiplier: f32) -> f32 {
        let boost = if self.boost { self.params.boost_factor } else { 1.0 };
        self.params.forward_speed * speed_multiplier * boost
    }

    /// Advance by `dt` nominal frames
    pub fn advance(&mut self, dt: f32, speed_multiplier: f32) {
        let forward = self.forward_speed(speed_multiplier);
        let p = &self.params;

        self.position.z -= forward * dt;

        let direction = self.intent.sign();
        self.position.x = (self.position.x + direction * p.lateral_step * dt)
            .clamp(-p.lane_limit, p.lane_limit);

        // Lean toward the steering side, relax back to upright otherwise
        let target = -direction * p.max_lean;
        self.lean = target + (self.lean - target) * LEAN_SMOOTHING.powf(dt);

        if self.jump == JumpState::Airborne {
            self.vertical_velocity -= p.gravity * dt;
            self.position.y += self.vertical_velocity * dt;
            if self.position.y <= p.ground_height {
                self.position.y = p.ground_height;
                self.vertical_velocity = 0.0;
                self.jump = JumpState::Grounded;
            }
        }
    }

    /// Collision volume at the current position
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.position, self.params.half_extents)
    }
}
