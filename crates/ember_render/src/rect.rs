//! Axis-aligned rectangle primitives.
//!
//! Each rect lives in a plane of fixed coordinate k and is bounded by
//! 2D extents in the remaining two axes. The bounding box is padded in
//! the flat dimension so the BVH slab test never degenerates.

use crate::{
    hittable::{HitRecord, Hittable},
    sampling::gen_f32,
    Material,
};
use ember_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// Rectangle in the z = k plane, spanning [x0,x1] x [y0,y1].
pub struct XyRect {
    x0: f32,
    x1: f32,
    y0: f32,
    y1: f32,
    k: f32,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl XyRect {
    pub fn new(x0: f32, x1: f32, y0: f32, y1: f32, k: f32, material: Arc<dyn Material>) -> Self {
        let bbox = Aabb::from_points(Vec3::new(x0, y0, k), Vec3::new(x1, y1, k));
        Self {
            x0,
            x1,
            y0,
            y1,
            k,
            material,
            bbox,
        }
    }
}

impl Hittable for XyRect {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        _rng: &mut dyn RngCore,
    ) -> bool {
        let t = (self.k - ray.origin.z) / ray.direction.z;
        if !ray_t.surrounds(t) {
            return false;
        }
        let p = ray.at(t);
        if p.x < self.x0 || p.x > self.x1 || p.y < self.y0 || p.y > self.y1 {
            return false;
        }

        rec.u = (p.x - self.x0) / (self.x1 - self.x0);
        rec.v = (p.y - self.y0) / (self.y1 - self.y0);
        rec.t = t;
        rec.p = p;
        rec.set_face_normal(ray, Vec3::Z);
        rec.material = self.material.as_ref();
        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// Rectangle in the y = k plane, spanning [x0,x1] x [z0,z1].
///
/// This is the rect used as a ceiling light, so it also supports
/// light importance sampling through `pdf_value`/`random`.
pub struct XzRect {
    x0: f32,
    x1: f32,
    z0: f32,
    z1: f32,
    k: f32,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl XzRect {
    pub fn new(x0: f32, x1: f32, z0: f32, z1: f32, k: f32, material: Arc<dyn Material>) -> Self {
        let bbox = Aabb::from_points(Vec3::new(x0, k, z0), Vec3::new(x1, k, z1));
        Self {
            x0,
            x1,
            z0,
            z1,
            k,
            material,
            bbox,
        }
    }

    fn area(&self) -> f32 {
        (self.x1 - self.x0) * (self.z1 - self.z0)
    }
}

impl Hittable for XzRect {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        _rng: &mut dyn RngCore,
    ) -> bool {
        let t = (self.k - ray.origin.y) / ray.direction.y;
        if !ray_t.surrounds(t) {
            return false;
        }
        let p = ray.at(t);
        if p.x < self.x0 || p.x > self.x1 || p.z < self.z0 || p.z > self.z1 {
            return false;
        }

        rec.u = (p.x - self.x0) / (self.x1 - self.x0);
        rec.v = (p.z - self.z0) / (self.z1 - self.z0);
        rec.t = t;
        rec.p = p;
        rec.set_face_normal(ray, Vec3::Y);
        rec.material = self.material.as_ref();
        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3, rng: &mut dyn RngCore) -> f32 {
        // Converts the rect's area density into a solid-angle density
        // using an actual traced hit: dist^2 / (cos(theta) * area).
        let mut rec = HitRecord::default();
        let ray = Ray::new(origin, direction, 0.0);
        if !self.hit(&ray, Interval::new(1e-3, f32::INFINITY), &mut rec, rng) {
            return 0.0;
        }

        let distance_squared = rec.t * rec.t * direction.length_squared();
        let cosine = (direction.dot(rec.normal) / direction.length()).abs();
        if cosine <= 1e-8 {
            return 0.0;
        }

        distance_squared / (cosine * self.area())
    }

    fn random(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        let random_point = Vec3::new(
            self.x0 + gen_f32(rng) * (self.x1 - self.x0),
            self.k,
            self.z0 + gen_f32(rng) * (self.z1 - self.z0),
        );
        random_point - origin
    }
}

/// Rectangle in the x = k plane, spanning [y0,y1] x [z0,z1].
pub struct YzRect {
    y0: f32,
    y1: f32,
    z0: f32,
    z1: f32,
    k: f32,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl YzRect {
    pub fn new(y0: f32, y1: f32, z0: f32, z1: f32, k: f32, material: Arc<dyn Material>) -> Self {
        let bbox = Aabb::from_points(Vec3::new(k, y0, z0), Vec3::new(k, y1, z1));
        Self {
            y0,
            y1,
            z0,
            z1,
            k,
            material,
            bbox,
        }
    }
}

impl Hittable for YzRect {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        _rng: &mut dyn RngCore,
    ) -> bool {
        let t = (self.k - ray.origin.x) / ray.direction.x;
        if !ray_t.surrounds(t) {
            return false;
        }
        let p = ray.at(t);
        if p.y < self.y0 || p.y > self.y1 || p.z < self.z0 || p.z > self.z1 {
            return false;
        }

        rec.u = (p.y - self.y0) / (self.y1 - self.y0);
        rec.v = (p.z - self.z0) / (self.z1 - self.z0);
        rec.t = t;
        rec.p = p;
        rec.set_face_normal(ray, Vec3::X);
        rec.material = self.material.as_ref();
        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::DiffuseLight;
    use crate::Color;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn light_rect() -> XzRect {
        XzRect::new(
            -1.0,
            1.0,
            -1.0,
            1.0,
            2.0,
            Arc::new(DiffuseLight::new(Color::splat(4.0))),
        )
    }

    #[test]
    fn test_rect_hit_and_uv() {
        let rect = light_rect();
        let mut rng = StdRng::seed_from_u64(0);

        let ray = Ray::new(Vec3::new(0.5, 0.0, 0.5), Vec3::Y, 0.0);
        let mut rec = HitRecord::default();
        assert!(rect.hit(&ray, Interval::new(1e-3, f32::INFINITY), &mut rec, &mut rng));
        assert!((rec.t - 2.0).abs() < 1e-5);
        assert!((rec.u - 0.75).abs() < 1e-5);
        assert!((rec.v - 0.75).abs() < 1e-5);
    }

    #[test]
    fn test_rect_miss_outside_extent() {
        let rect = light_rect();
        let mut rng = StdRng::seed_from_u64(0);

        let ray = Ray::new(Vec3::new(3.0, 0.0, 0.0), Vec3::Y, 0.0);
        let mut rec = HitRecord::default();
        assert!(!rect.hit(&ray, Interval::new(1e-3, f32::INFINITY), &mut rec, &mut rng));
    }

    #[test]
    fn test_pdf_value_straight_below() {
        let rect = light_rect();
        let mut rng = StdRng::seed_from_u64(0);

        // From 2 below the center, the whole rect is 2 away at cos=1:
        // pdf = d^2 / (cos * area) = 4 / (1 * 4) = 1
        let pdf = rect.pdf_value(Vec3::ZERO, Vec3::Y, &mut rng);
        assert!((pdf - 1.0).abs() < 1e-4);

        // Directions that miss the rect carry zero density
        assert_eq!(rect.pdf_value(Vec3::ZERO, Vec3::NEG_Y, &mut rng), 0.0);
    }

    #[test]
    fn test_random_points_at_rect() {
        let rect = light_rect();
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..100 {
            let dir = rect.random(Vec3::ZERO, &mut rng);
            let mut rec = HitRecord::default();
            let ray = Ray::new(Vec3::ZERO, dir, 0.0);
            assert!(rect.hit(&ray, Interval::new(1e-3, f32::INFINITY), &mut rec, &mut rng));
        }
    }
}
