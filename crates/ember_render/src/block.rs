//! Axis-aligned box built from six rectangle faces.

use crate::{
    hittable::{HitRecord, Hittable, HittableList},
    rect::{XyRect, XzRect, YzRect},
    Material,
};
use ember_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// An axis-aligned box, held as a flat list of its six faces.
///
/// Face normals face the incoming ray through the usual front-face
/// bookkeeping, so interior and exterior hits both shade correctly.
pub struct Block {
    pmin: Vec3,
    pmax: Vec3,
    sides: HittableList,
}

impl Block {
    pub fn new(p0: Vec3, p1: Vec3, material: Arc<dyn Material>) -> Self {
        let pmin = p0.min(p1);
        let pmax = p0.max(p1);

        let mut sides = HittableList::new();
        sides.add(Arc::new(XyRect::new(
            pmin.x,
            pmax.x,
            pmin.y,
            pmax.y,
            pmax.z,
            Arc::clone(&material),
        )));
        sides.add(Arc::new(XyRect::new(
            pmin.x,
            pmax.x,
            pmin.y,
            pmax.y,
            pmin.z,
            Arc::clone(&material),
        )));
        sides.add(Arc::new(XzRect::new(
            pmin.x,
            pmax.x,
            pmin.z,
            pmax.z,
            pmax.y,
            Arc::clone(&material),
        )));
        sides.add(Arc::new(XzRect::new(
            pmin.x,
            pmax.x,
            pmin.z,
            pmax.z,
            pmin.y,
            Arc::clone(&material),
        )));
        sides.add(Arc::new(YzRect::new(
            pmin.y,
            pmax.y,
            pmin.z,
            pmax.z,
            pmax.x,
            Arc::clone(&material),
        )));
        sides.add(Arc::new(YzRect::new(
            pmin.y,
            pmax.y,
            pmin.z,
            pmax.z,
            pmin.x,
            material,
        )));

        Self { pmin, pmax, sides }
    }
}

impl Hittable for Block {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        self.sides.hit(ray, ray_t, rec, rng)
    }

    fn bounding_box(&self) -> Aabb {
        Aabb::from_points(self.pmin, self.pmax)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Lambertian;
    use crate::Color;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_block_hit_from_each_side() {
        let block = Block::new(
            Vec3::ZERO,
            Vec3::ONE,
            Arc::new(Lambertian::new(Color::new(0.7, 0.7, 0.7))),
        );
        let mut rng = StdRng::seed_from_u64(0);
        let center = Vec3::splat(0.5);

        for dir in [
            Vec3::X,
            Vec3::NEG_X,
            Vec3::Y,
            Vec3::NEG_Y,
            Vec3::Z,
            Vec3::NEG_Z,
        ] {
            let origin = center + dir * 3.0;
            let ray = Ray::new(origin, -dir, 0.0);
            let mut rec = HitRecord::default();
            assert!(block.hit(&ray, Interval::new(1e-3, f32::INFINITY), &mut rec, &mut rng));
            // First face from this side is 2.5 away
            assert!((rec.t - 2.5).abs() < 1e-3);
            // Reported normal faces the ray
            assert!(rec.normal.dot(ray.direction) < 0.0);
        }
    }

    #[test]
    fn test_block_bounding_box() {
        let block = Block::new(
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(2.0, 4.0, 6.0),
            Arc::new(Lambertian::new(Color::new(0.7, 0.7, 0.7))),
        );
        let bbox = block.bounding_box();
        assert_eq!(bbox.min, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(bbox.max, Vec3::new(2.0, 4.0, 6.0));
    }
}
