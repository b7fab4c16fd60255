//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree over the scene's primitives, built once before
//! rendering and immutable afterwards. Traversal prunes whole subtrees
//! with a single box test, and returns exactly the hit a linear scan
//! over the same primitives would return.

use crate::{HitRecord, Hittable};
use ember_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// Maximum primitives per leaf node before splitting.
const LEAF_MAX_SIZE: usize = 4;

/// BVH node - either a branch with two children or a leaf holding a
/// few primitives.
pub enum BvhNode {
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
    Leaf {
        objects: Vec<Arc<dyn Hittable>>,
        bbox: Aabb,
    },
}

impl BvhNode {
    /// Build a BVH over a set of objects.
    ///
    /// Panics on an empty set: a BVH over nothing is a scene
    /// construction bug, not a render-time condition. Every object
    /// must report a finite bounding box; unbounded shapes do not
    /// belong in a BVH.
    pub fn new(objects: Vec<Arc<dyn Hittable>>) -> Self {
        assert!(!objects.is_empty(), "cannot build a BVH over zero objects");
        let root = Self::build(objects);
        log::debug!(
            "built BVH: {} primitives, depth {}",
            root.primitive_count(),
            root.depth()
        );
        root
    }

    /// Build from a hittable list, consuming it.
    pub fn from_list(list: crate::HittableList) -> Self {
        Self::new(list.into_objects())
    }

    /// Recursive median-split construction: sort objects by bounding
    /// box centroid along the widest axis of the centroid spread,
    /// split in half, recurse.
    fn build(mut objects: Vec<Arc<dyn Hittable>>) -> Self {
        let n = objects.len();

        let bounds = objects
            .iter()
            .map(|o| o.bounding_box())
            .fold(Aabb::EMPTY, |acc, b| Aabb::surrounding(&acc, &b));

        if n <= LEAF_MAX_SIZE {
            return BvhNode::Leaf {
                objects,
                bbox: bounds,
            };
        }

        // Split axis from the spread of centroids, not the aggregate
        // box, so a single huge primitive cannot dominate the choice
        let centroid_bounds = objects.iter().fold(Aabb::EMPTY, |acc, obj| {
            let c = obj.bounding_box().centroid();
            Aabb::surrounding(&acc, &Aabb::from_points(c, c))
        });
        let axis = centroid_bounds.longest_axis();

        objects.sort_unstable_by(|a, b| {
            let a_val = a.bounding_box().centroid()[axis];
            let b_val = b.bounding_box().centroid()[axis];
            a_val
                .partial_cmp(&b_val)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mid = n / 2;
        let right_objects = objects.split_off(mid);
        let left_objects = objects;

        BvhNode::Branch {
            left: Box::new(Self::build(left_objects)),
            right: Box::new(Self::build(right_objects)),
            bbox: bounds,
        }
    }

    fn primitive_count(&self) -> usize {
        match self {
            BvhNode::Leaf { objects, .. } => objects.len(),
            BvhNode::Branch { left, right, .. } => {
                left.primitive_count() + right.primitive_count()
            }
        }
    }

    fn depth(&self) -> usize {
        match self {
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

impl Hittable for BvhNode {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        match self {
            BvhNode::Leaf { objects, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return false;
                }

                let mut hit_anything = false;
                let mut closest = ray_t.max;
                for obj in objects {
                    let interval = Interval::new(ray_t.min, closest);
                    if obj.hit(ray, interval, rec, rng) {
                        hit_anything = true;
                        closest = rec.t;
                    }
                }
                hit_anything
            }

            BvhNode::Branch { left, right, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return false;
                }

                let hit_left = left.hit(ray, ray_t, rec, rng);

                // Only search the right subtree up to the left hit
                let right_max = if hit_left { rec.t } else { ray_t.max };
                let hit_right = right.hit(ray, Interval::new(ray_t.min, right_max), rec, rng);

                hit_left || hit_right
            }
        }
    }

    fn bounding_box(&self) -> Aabb {
        match self {
            BvhNode::Leaf { bbox, .. } => *bbox,
            BvhNode::Branch { bbox, .. } => *bbox,
        }
    }
}
