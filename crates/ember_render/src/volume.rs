//! Participating media with constant density.

use crate::hittable::{HitRecord, Hittable};
use crate::material::{Color, Isotropic, Material};
use crate::sampling::gen_f32;
use ember_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// Convex boundary filled with a uniform scattering medium (smoke,
/// fog). Rays probabilistically scatter inside it; the scatter
/// distance follows an exponential distribution with mean 1/density.
pub struct ConstantMedium {
    boundary: Arc<dyn Hittable>,
    neg_inv_density: f32,
    phase_function: Arc<dyn Material>,
}

impl ConstantMedium {
    pub fn new(boundary: Arc<dyn Hittable>, density: f32, albedo: Color) -> Self {
        Self {
            boundary,
            neg_inv_density: -1.0 / density,
            phase_function: Arc::new(Isotropic::new(albedo)),
        }
    }

    pub fn with_phase(
        boundary: Arc<dyn Hittable>,
        density: f32,
        phase_function: Arc<dyn Material>,
    ) -> Self {
        Self {
            boundary,
            neg_inv_density: -1.0 / density,
            phase_function,
        }
    }
}

impl Hittable for ConstantMedium {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        // Entry and exit of the boundary, allowing origins inside it
        let mut rec1 = HitRecord::default();
        let mut rec2 = HitRecord::default();

        if !self
            .boundary
            .hit(ray, Interval::UNIVERSE, &mut rec1, rng)
        {
            return false;
        }
        if !self.boundary.hit(
            ray,
            Interval::new(rec1.t + 1e-4, f32::INFINITY),
            &mut rec2,
            rng,
        ) {
            return false;
        }

        let mut t1 = rec1.t.max(ray_t.min);
        let t2 = rec2.t.min(ray_t.max);
        if t1 >= t2 {
            return false;
        }
        if t1 < 0.0 {
            t1 = 0.0;
        }

        let ray_length = ray.direction.length();
        let distance_inside = (t2 - t1) * ray_length;
        let hit_distance = self.neg_inv_density * gen_f32(rng).ln();
        if hit_distance > distance_inside {
            return false;
        }

        rec.t = t1 + hit_distance / ray_length;
        rec.p = ray.at(rec.t);
        // Arbitrary: a medium has no surface orientation
        rec.normal = Vec3::X;
        rec.front_face = true;
        rec.material = self.phase_function.as_ref();
        true
    }

    fn bounding_box(&self) -> Aabb {
        self.boundary.bounding_box()
    }
}
