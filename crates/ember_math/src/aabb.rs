use crate::{Interval, Ray, Vec3};

/// Axis-aligned bounding box, stored as min/max corners.
///
/// Invariant: `min <= max` componentwise for any box built through the
/// constructors. Flat boxes (rects) are padded so the slab test never
/// collapses to a zero-width interval.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Create a box from two opposite corners, in any order.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        let mut aabb = Self {
            min: a.min(b),
            max: a.max(b),
        };
        aabb.pad_to_minimums();
        aabb
    }

    /// The tightest box containing both boxes.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            min: box0.min.min(box1.min),
            max: box0.max.max(box1.max),
        }
    }

    /// The extent of the box along one axis (0=X, 1=Y, 2=Z).
    pub fn axis_interval(&self, n: usize) -> Interval {
        Interval::new(self.min[n], self.max[n])
    }

    /// Center point of the box.
    pub fn centroid(&self) -> Vec3 {
        0.5 * (self.min + self.max)
    }

    /// Index of the axis with the largest extent.
    pub fn longest_axis(&self) -> usize {
        let size = self.max - self.min;
        if size.x > size.y && size.x > size.z {
            0
        } else if size.y > size.z {
            1
        } else {
            2
        }
    }

    /// The box moved by an offset vector.
    pub fn translate(&self, offset: Vec3) -> Aabb {
        Aabb {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Slab test: does the ray pass through the box within `ray_t`?
    ///
    /// Works on the reciprocal direction. A zero direction component
    /// yields infinite slab parameters that compare correctly in IEEE
    /// arithmetic, so no division guard is needed.
    pub fn hit(&self, r: &Ray, mut ray_t: Interval) -> bool {
        for axis in 0..3 {
            let inv_d = 1.0 / r.direction[axis];
            let mut t0 = (self.min[axis] - r.origin[axis]) * inv_d;
            let mut t1 = (self.max[axis] - r.origin[axis]) * inv_d;
            if inv_d < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }

            ray_t.min = t0.max(ray_t.min);
            ray_t.max = t1.min(ray_t.max);
            if ray_t.max <= ray_t.min {
                return false;
            }
        }
        true
    }

    /// Pad near-flat axes so the slab test keeps a usable interval.
    fn pad_to_minimums(&mut self) {
        let delta = 1e-4;
        for axis in 0..3 {
            if self.max[axis] - self.min[axis] < delta {
                self.min[axis] -= delta / 2.0;
                self.max[axis] += delta / 2.0;
            }
        }
    }

    pub const EMPTY: Aabb = Aabb {
        min: Vec3::INFINITY,
        max: Vec3::NEG_INFINITY,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points_orders_corners() {
        let aabb = Aabb::from_points(Vec3::new(5.0, 0.0, 2.0), Vec3::new(1.0, 4.0, -2.0));
        assert_eq!(aabb.min, Vec3::new(1.0, 0.0, -2.0));
        assert_eq!(aabb.max, Vec3::new(5.0, 4.0, 2.0));
    }

    #[test]
    fn test_surrounding_contains_both() {
        let box0 = Aabb::from_points(Vec3::new(-3.0, 1.0, 0.0), Vec3::new(2.0, 2.0, 4.0));
        let box1 = Aabb::from_points(Vec3::new(0.0, -5.0, 1.0), Vec3::new(7.0, 0.0, 2.0));
        let s = Aabb::surrounding(&box0, &box1);

        for b in [&box0, &box1] {
            assert!(s.min.cmple(b.min).all());
            assert!(s.max.cmpge(b.max).all());
        }
    }

    #[test]
    fn test_hit() {
        let aabb = Aabb::from_points(Vec3::splat(-1.0), Vec3::splat(1.0));

        // Towards the box
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z, 0.0);
        assert!(aabb.hit(&ray, Interval::new(0.0, 100.0)));

        // Away from the box
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::NEG_Z, 0.0);
        assert!(!aabb.hit(&ray, Interval::new(0.0, 100.0)));

        // Parallel to the box but off to the side: the zero direction
        // component must not break the slab test.
        let ray = Ray::new(Vec3::new(10.0, 0.0, 0.0), Vec3::Z, 0.0);
        assert!(!aabb.hit(&ray, Interval::new(0.0, 100.0)));
    }

    #[test]
    fn test_flat_box_is_padded() {
        let aabb = Aabb::from_points(Vec3::new(0.0, 1.0, 0.0), Vec3::new(4.0, 1.0, 4.0));
        assert!(aabb.max.y > aabb.min.y);

        let ray = Ray::new(Vec3::new(2.0, 5.0, 2.0), Vec3::NEG_Y, 0.0);
        assert!(aabb.hit(&ray, Interval::new(0.0, 100.0)));
    }

    #[test]
    fn test_longest_axis() {
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::new(1.0, 10.0, 2.0));
        assert_eq!(aabb.longest_axis(), 1);
    }

    #[test]
    fn test_translate() {
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::ONE).translate(Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(aabb.min.x, 5.0);
        assert_eq!(aabb.max.x, 6.0);
    }
}
