/// Axis-Aligned Bounding Boxes
///
/// Plain data plus free functions, shared by player collision and
/// projectile hit detection.
use glam::Vec3;

/// Axis-Aligned Bounding Box - pure data structure
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    pub min: Vec3,
    pub max: Vec3,
}

/// Create new AABB from min/max points
pub fn create_aabb(min: Vec3, max: Vec3) -> AABB {
    AABB { min, max }
}

/// Box standing on `feet` (bottom centre) with the given width and height
pub fn aabb_from_feet(feet: Vec3, width: f32, height: f32) -> AABB {
    let half = width * 0.5;
    AABB {
        min: Vec3::new(feet.x - half, feet.y, feet.z - half),
        max: Vec3::new(feet.x + half, feet.y + height, feet.z + half),
    }
}

pub fn aabb_center(aabb: &AABB) -> Vec3 {
    (aabb.min + aabb.max) * 0.5
}

/// Test if two AABBs overlap with positive volume. Touching faces do not count,
/// so a body resting on a surface is not colliding with it.
pub fn aabb_overlaps(a: &AABB, b: &AABB) -> bool {
    a.min.x < b.max.x
        && a.max.x > b.min.x
        && a.min.y < b.max.y
        && a.max.y > b.min.y
        && a.min.z < b.max.z
        && a.max.z > b.min.z
}

/// Test if AABB contains a point (inclusive)
pub fn aabb_contains_point(aabb: &AABB, point: Vec3) -> bool {
    point.cmpge(aabb.min).all() && point.cmple(aabb.max).all()
}

/// Create translated copy of AABB
pub fn aabb_translated(aabb: &AABB, offset: Vec3) -> AABB {
    AABB {
        min: aabb.min + offset,
        max: aabb.max + offset,
    }
}

/// Offset a unit-cube-local box to a block position
pub fn aabb_at_block(local: &AABB, block_min: Vec3) -> AABB {
    aabb_translated(local, block_min)
}

/// Intersection of the segment `start..end` with the box (slab method).
///
/// Returns the parametric entry point in `0..=1`; a segment starting inside
/// the box returns 0.
pub fn aabb_segment_intersection(aabb: &AABB, start: Vec3, end: Vec3) -> Option<f32> {
    let delta = end - start;
    let mut t_enter = 0.0f32;
    let mut t_exit = 1.0f32;

    for axis in 0..3 {
        let origin = start[axis];
        let d = delta[axis];
        let (lo, hi) = (aabb.min[axis], aabb.max[axis]);

        if d.abs() < f32::EPSILON {
            if origin < lo || origin > hi {
                return None;
            }
            continue;
        }

        let inv = 1.0 / d;
        let mut t0 = (lo - origin) * inv;
        let mut t1 = (hi - origin) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_enter = t_enter.max(t0);
        t_exit = t_exit.min(t1);
        if t_enter > t_exit {
            return None;
        }
    }
    Some(t_enter)
}
