//! Axis-aligned bounding boxes for player and obstacle collision volumes
//!
//! A box is stored as centre + half extents so hitboxes can be scaled about
//! their centroid without moving them.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// An axis-aligned box in world (or obstacle-local) space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub center: Vec3,
    pub half_extents: Vec3,
}

impl Aabb {
    pub fn new(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            center,
            half_extents: half_extents.abs(),
        }
    }

    #[inline]
    pub fn min(&self) -> Vec3 {
        self.center - self.half_extents
    }

    #[inline]
    pub fn max(&self) -> Vec3 {
        self.center + self.half_extents
    }

    /// Same box moved by `offset`
    #[inline]
    pub fn translated(&self, offset: Vec3) -> Self {
        Self {
            center: self.center + offset,
            half_extents: self.half_extents,
        }
    }

    /// Same centroid, extents multiplied by `factor`
    pub fn scaled(&self, factor: f32) -> Self {
        Self::new(self.center, self.half_extents * factor)
    }

    /// Minkowski sum with a box of the given half extents
    pub fn expanded(&self, half_extents: Vec3) -> Self {
        Self::new(self.center, self.half_extents + half_extents.abs())
    }

    /// Overlap test (touching faces count as overlap)
    pub fn intersects(&self, other: &Aabb) -> bool {
        let (a_min, a_max) = (self.min(), self.max());
        let (b_min, b_max) = (other.min(), other.max());
        a_min.cmple(b_max).all() && b_min.cmple(a_max).all()
    }

    pub fn contains_point(&self, p: Vec3) -> bool {
        p.cmpge(self.min()).all() && p.cmple(self.max()).all()
    }

    /// Slab ray test
    ///
    /// `dir` must be normalized. Returns the distance along the ray at which
    /// it enters the box (0 if the origin is already inside), or `None` if
    /// the ray misses or the box lies entirely behind the origin.
    pub fn ray_entry(&self, origin: Vec3, dir: Vec3) -> Option<f32> {
        let min = self.min();
        let max = self.max();
        let mut t_near = 0.0_f32;
        let mut t_far = f32::INFINITY;

        for axis in 0..3 {
            let o = origin[axis];
            let d = dir[axis];
            if d.abs() < 1e-8 {
                // Parallel to this slab: must already be inside it
                if o < min[axis] || o > max[axis] {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / d;
            let mut t0 = (min[axis] - o) * inv;
            let mut t1 = (max[axis] - o) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_near = t_near.max(t0);
            t_far = t_far.min(t1);
            if t_near > t_far {
                return None;
            }
        }

        Some(t_near)
    }
}
