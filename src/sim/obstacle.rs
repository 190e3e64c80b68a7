//! Obstacles and their lifecycle
//!
//! The spawner exclusively owns the live obstacle collection. Everything else
//! (collision, presentation) only gets a read-only view.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::random::RandomSource;
use crate::config::{GameConfig, KindWeights};

/// Visual model of a hazard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardModel {
    Rock,
    Tree,
}

impl HazardModel {
    /// Visual bounding box relative to the obstacle's anchor on the snow
    pub fn visual_bounds(self) -> Aabb {
        match self {
            // Wide, low boulder
            HazardModel::Rock => Aabb::new(Vec3::new(0.0, 0.6, 0.0), Vec3::new(1.0, 0.6, 1.0)),
            // Tall pine with sparse outer branches
            HazardModel::Tree => Aabb::new(Vec3::new(0.0, 3.0, 0.0), Vec3::new(1.5, 3.0, 1.5)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Ends the run on contact
    Hazard(HazardModel),
    /// Launches the player into a jump on contact
    Ramp,
}

impl ObstacleKind {
    pub fn is_interactive(self) -> bool {
        match self {
            ObstacleKind::Hazard(_) => false,
            ObstacleKind::Ramp => true,
        }
    }

    /// Body bounds relative to the anchor
    pub fn body(self) -> Aabb {
        match self {
            ObstacleKind::Hazard(model) => model.visual_bounds(),
            ObstacleKind::Ramp => Aabb::new(Vec3::new(0.0, 0.25, 0.0), Vec3::new(1.5, 0.25, 1.0)),
        }
    }

    /// Weighted pick; `u` in `[0, 1)`
    pub fn choose(weights: &KindWeights, u: f32) -> Self {
        let candidates = [
            (ObstacleKind::Hazard(HazardModel::Rock), weights.rock),
            (ObstacleKind::Hazard(HazardModel::Tree), weights.tree),
            (ObstacleKind::Ramp, weights.ramp),
        ];
        let mut roll = u * weights.total();
        let mut last = candidates[0].0;
        for (kind, weight) in candidates {
            if weight <= 0.0 {
                continue;
            }
            if roll < weight {
                return kind;
            }
            roll -= weight;
            last = kind;
        }
        // Rounding pushed the roll past the end
        last
    }
}

/// A live obstacle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    /// Anchor on the snow surface
    pub position: Vec3,
    /// Anchor before this frame's advance
    pub prev_position: Vec3,
    /// Visual bounds, relative to the anchor
    pub body: Aabb,
    /// Collision volume relative to the anchor, when it differs from the body.
    /// Stored relative so it moves with the obstacle and is dropped with it.
    pub hitbox: Option<Aabb>,
    /// Set once the obstacle has slid behind the player
    pub past_player: bool,
}

impl Obstacle {
    pub fn new(id: u32, kind: ObstacleKind, position: Vec3, hitbox_scale: f32) -> Self {
        let body = kind.body();
        let hitbox = match kind {
            ObstacleKind::Hazard(_) => Some(body.scaled(hitbox_scale)),
            ObstacleKind::Ramp => None,
        };
        Self {
            id,
            kind,
            position,
            prev_position: position,
            body,
            hitbox,
            past_player: false,
        }
    }

    /// Collision volume relative to the anchor
    pub fn collision_local(&self) -> Aabb {
        self.hitbox.unwrap_or(self.body)
    }

    /// Collision volume with the anchor at `anchor`
    pub fn collision_volume_at(&self, anchor: Vec3) -> Aabb {
        self.collision_local().translated(anchor)
    }

    /// Visual bounds in world space
    pub fn visual_bounds(&self) -> Aabb {
        self.body.translated(self.position)
    }
}

/// Spawns, advances and culls obstacles
#[derive(Debug, Clone)]
pub struct ObstacleSpawner {
    obstacles: Vec<Obstacle>,
    next_id: u32,
    lane_limit: f32,
    spawn_distance: f32,
    surface_y: f32,
    weights: KindWeights,
    hitbox_scale: f32,
}

impl ObstacleSpawner {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            obstacles: Vec::new(),
            next_id: 1,
            lane_limit: config.lane_limit,
            spawn_distance: config.spawn_distance,
            surface_y: config.ground_height - config.player_half_extents.y,
            weights: config.kind_weights,
            hitbox_scale: config.hitbox_scale,
        }
    }

    /// Live obstacles in spawn order
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// Height of the snow surface obstacles stand on
    pub fn surface_y(&self) -> f32 {
        self.surface_y
    }

    /// Drop every obstacle (ids keep counting up)
    pub fn clear(&mut self) {
        self.obstacles.clear();
    }

    /// Spawn on cadence: when `frame` is a multiple of `frequency`
    pub fn tick(
        &mut self,
        frame: u64,
        frequency: u32,
        player_z: f32,
        rng: &mut impl RandomSource,
    ) -> Option<u32> {
        if frame.is_multiple_of(frequency.max(1) as u64) {
            Some(self.spawn_at(0.0, player_z, rng))
        } else {
            None
        }
    }

    /// Spawn a random obstacle `spawn_distance` ahead of the player, pulled
    /// `offset_z` back toward the player.
    ///
    /// Draws the kind first, then the lateral position.
    pub fn spawn_at(&mut self, offset_z: f32, player_z: f32, rng: &mut impl RandomSource) -> u32 {
        let kind = ObstacleKind::choose(&self.weights, rng.next_unit());
        let x = (rng.next_unit() - 0.5) * 2.0 * self.lane_limit;
        let z = player_z - self.spawn_distance + offset_z;
        self.place(kind, x, z)
    }

    /// Place a specific obstacle at lateral `x`, forward `z`
    pub fn place(&mut self, kind: ObstacleKind, x: f32, z: f32) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        let position = Vec3::new(x, self.surface_y, z);
        self.obstacles
            .push(Obstacle::new(id, kind, position, self.hitbox_scale));
        log::trace!("Spawned obstacle {} ({:?}) at x={:.2} z={:.2}", id, kind, x, z);
        id
    }

    /// Fill the approach with the density the steady-state cadence produces.
    ///
    /// `closing_speed` is how far an obstacle approaches the player per frame.
    pub fn prepopulate(
        &mut self,
        player_z: f32,
        frequency: u32,
        closing_speed: f32,
        rng: &mut impl RandomSource,
    ) -> usize {
        let spacing = frequency.max(1) as f32 * closing_speed;
        if spacing <= 0.0 {
            return 0;
        }
        let count = (self.spawn_distance / spacing).ceil() as usize;
        for i in 0..count {
            self.spawn_at(i as f32 * spacing, player_z, rng);
        }
        log::debug!("Pre-populated {} obstacles, spacing {:.2}", count, spacing);
        count
    }

    /// Slide every obstacle `distance` toward the player (+z), remembering
    /// where it was for the swept collision test
    pub fn advance_all(&mut self, distance: f32) {
        for obstacle in &mut self.obstacles {
            obstacle.prev_position = obstacle.position;
            obstacle.position.z += distance;
        }
    }

    /// Flag obstacles that have slid past the player and cull those more than
    /// `margin` behind. Returns how many were removed.
    pub fn prune_behind(&mut self, player_z: f32, margin: f32) -> usize {
        let before = self.obstacles.len();
        self.obstacles.retain_mut(|o| {
            if o.position.z > player_z {
                o.past_player = true;
            }
            o.position.z <= player_z + margin
        });
        let removed = before - self.obstacles.len();
        if removed > 0 {
            log::trace!("Pruned {} obstacles behind z={:.2}", removed, player_z);
        }
        removed
    }
}
