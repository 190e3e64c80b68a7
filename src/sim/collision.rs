//! Player vs obstacle collision
//!
//! Two tiers: a discrete AABB overlap at the obstacle's current position,
//! then (only on a miss) a swept test along the obstacle's path this frame.
//! At high speed multipliers an obstacle can move further per frame than the
//! combined box depths, so overlap alone lets it tunnel through the player.
//!
//! Everything here is a pure function of its inputs.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::obstacle::Obstacle;

/// Side effect an interactive obstacle has on the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    TriggerJump,
}

/// Result of a collision check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionResult {
    None,
    /// Fatal contact
    Blocking,
    /// Contact that changes the player instead of ending the run
    Interactive(Effect),
}

impl CollisionResult {
    pub fn is_blocking(self) -> bool {
        self == CollisionResult::Blocking
    }

    /// What touching an obstacle of this kind means
    fn on_contact(obstacle: &Obstacle) -> Self {
        if obstacle.kind.is_interactive() {
            CollisionResult::Interactive(Effect::TriggerJump)
        } else {
            CollisionResult::Blocking
        }
    }
}

/// Evaluate one obstacle against the player for the frame in which its
/// anchor moved from `prev_pos` to `new_pos`
pub fn evaluate(player: &Aabb, obstacle: &Obstacle, prev_pos: Vec3, new_pos: Vec3) -> CollisionResult {
    let volume = obstacle.collision_volume_at(new_pos);
    if player.intersects(&volume) {
        return CollisionResult::on_contact(obstacle);
    }

    if swept_hit(player, obstacle, prev_pos, new_pos) {
        return CollisionResult::on_contact(obstacle);
    }

    CollisionResult::None
}

/// Cast the collision volume's centre along its path against the player box
/// grown by the volume's half extents
fn swept_hit(player: &Aabb, obstacle: &Obstacle, prev_pos: Vec3, new_pos: Vec3) -> bool {
    let local = obstacle.collision_local();
    let start = prev_pos + local.center;
    let travel = new_pos - prev_pos;
    let distance = travel.length();
    if distance < 1e-6 {
        return false;
    }

    let target = player.expanded(local.half_extents);
    match target.ray_entry(start, travel / distance) {
        Some(t) => t <= distance,
        None => false,
    }
}

/// The lane edge is cliff terrain: touching it ends the run
pub fn lane_edge(player_x: f32, lane_limit: f32) -> CollisionResult {
    if player_x.abs() >= lane_limit {
        CollisionResult::Blocking
    } else {
        CollisionResult::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::obstacle::{HazardModel, ObstacleKind};
    use crate::sim::player::Player;
    use proptest::prelude::*;

    const ROCK: ObstacleKind = ObstacleKind::Hazard(HazardModel::Rock);

    fn player_box() -> Aabb {
        Player::new(&GameConfig::default()).bounds()
    }

    /// Obstacle anchor on the snow at (x, z)
    fn anchor(x: f32, z: f32) -> Vec3 {
        Vec3::new(x, crate::consts::SNOW_SURFACE, z)
    }

    fn obstacle(kind: ObstacleKind, at: Vec3) -> Obstacle {
        Obstacle::new(1, kind, at, crate::consts::HITBOX_SCALE)
    }

    #[test]
    fn test_overlap_is_blocking() {
        let o = obstacle(ROCK, anchor(0.0, 0.0));
        let r = evaluate(&player_box(), &o, anchor(0.0, -0.2), anchor(0.0, 0.0));
        assert_eq!(r, CollisionResult::Blocking);
    }

    #[test]
    fn test_ramp_triggers_jump() {
        let o = obstacle(ObstacleKind::Ramp, anchor(0.5, 0.0));
        let r = evaluate(&player_box(), &o, anchor(0.5, -0.2), anchor(0.5, 0.0));
        assert_eq!(r, CollisionResult::Interactive(Effect::TriggerJump));
        assert!(!r.is_blocking());
    }

    #[test]
    fn test_far_obstacle_is_none() {
        let o = obstacle(ROCK, anchor(0.0, -50.0));
        let r = evaluate(&player_box(), &o, anchor(0.0, -50.4), anchor(0.0, -50.0));
        assert_eq!(r, CollisionResult::None);
    }

    #[test]
    fn test_visual_overlap_outside_hitbox_is_fair_miss() {
        // Inside the tree's wide visual bounds but clear of its trimmed hitbox
        let at = anchor(1.6, 0.0);
        let o = obstacle(ObstacleKind::Hazard(HazardModel::Tree), at);
        assert!(player_box().intersects(&o.visual_bounds()));
        let r = evaluate(&player_box(), &o, at - Vec3::Z * 0.4, at);
        assert_eq!(r, CollisionResult::None);
    }

    #[test]
    fn test_swept_catches_tunneling() {
        // Rock jumps from 3 units ahead to 3 units behind in one frame
        let prev = anchor(0.0, -3.0);
        let new = anchor(0.0, 3.0);
        let o = obstacle(ROCK, new);
        let player = player_box();
        assert!(!player.intersects(&o.collision_volume_at(prev)));
        assert!(!player.intersects(&o.collision_volume_at(new)));
        assert_eq!(evaluate(&player, &o, prev, new), CollisionResult::Blocking);
    }

    #[test]
    fn test_swept_ramp_is_still_interactive() {
        let prev = anchor(0.0, -4.0);
        let new = anchor(0.0, 4.0);
        let o = obstacle(ObstacleKind::Ramp, new);
        assert_eq!(
            evaluate(&player_box(), &o, prev, new),
            CollisionResult::Interactive(Effect::TriggerJump)
        );
    }

    #[test]
    fn test_swept_misses_when_short_or_off_lane() {
        let player = player_box();
        // Path stops short of the player
        let o = obstacle(ROCK, anchor(0.0, -5.0));
        assert_eq!(evaluate(&player, &o, anchor(0.0, -11.0), anchor(0.0, -5.0)), CollisionResult::None);
        // Path passes beside the player
        let o = obstacle(ROCK, anchor(4.0, 3.0));
        assert_eq!(evaluate(&player, &o, anchor(4.0, -3.0), anchor(4.0, 3.0)), CollisionResult::None);
    }

    #[test]
    fn test_evaluate_is_idempotent() {
        let prev = anchor(0.0, -3.0);
        let new = anchor(0.0, 3.0);
        let o = obstacle(ROCK, new);
        let player = player_box();
        assert_eq!(evaluate(&player, &o, prev, new), evaluate(&player, &o, prev, new));
    }

    #[test]
    fn test_lane_edge() {
        assert_eq!(lane_edge(0.0, 20.0), CollisionResult::None);
        assert_eq!(lane_edge(19.9, 20.0), CollisionResult::None);
        assert_eq!(lane_edge(20.0, 20.0), CollisionResult::Blocking);
        assert_eq!(lane_edge(-20.0, 20.0), CollisionResult::Blocking);
    }

    proptest! {
        /// Any per-frame advance that carries an in-lane hazard across the
        /// player must be caught, however fast
        #[test]
        fn high_speed_crossing_is_blocking(
            x in -0.9f32..0.9,
            before in 1.0f32..40.0,
            after in 1.0f32..40.0,
        ) {
            let prev = anchor(x, -before);
            let new = anchor(x, after);
            let o = obstacle(ROCK, new);
            prop_assert_eq!(evaluate(&player_box(), &o, prev, new), CollisionResult::Blocking);
        }
    }
}
