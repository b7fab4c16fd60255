//! Sphere primitives, static and moving.

use crate::{
    hittable::{HitRecord, Hittable},
    sampling::random_to_sphere,
    Material,
};
use ember_math::{Aabb, Interval, Onb, Ray, Vec3};
use rand::RngCore;
use std::f32::consts::PI;
use std::sync::Arc;

/// A sphere fixed in space.
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32, material: Arc<dyn Material>) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);
        let bbox = Aabb::from_points(center - rvec, center + rvec);

        Self {
            center,
            radius,
            material,
            bbox,
        }
    }

    /// Lat-long UV coordinates for a point on the unit sphere.
    fn get_sphere_uv(p: Vec3) -> (f32, f32) {
        // theta: angle down from +Y, phi: angle around Y from -X
        let theta = (-p.y).acos();
        let phi = (-p.z).atan2(p.x) + PI;

        (phi / (2.0 * PI), theta / PI)
    }

    /// Shared quadratic solve for static and moving spheres.
    ///
    /// The factor of 2 is pre-cancelled: with h = d.oc the
    /// discriminant is h^2 - a*c and the roots are (h +- sqrt)/a.
    fn hit_at_center<'a>(
        center: Vec3,
        radius: f32,
        material: &'a dyn Material,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
    ) -> bool {
        let oc = center - ray.origin;
        let a = ray.direction.length_squared();
        let h = ray.direction.dot(oc);
        let c = oc.length_squared() - radius * radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return false;
        }

        let sqrtd = discriminant.sqrt();

        // Nearest root within range, else the far one
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return false;
            }
        }

        rec.t = root;
        rec.p = ray.at(rec.t);
        let outward_normal = (rec.p - center) / radius;
        rec.set_face_normal(ray, outward_normal);
        (rec.u, rec.v) = Self::get_sphere_uv(outward_normal);
        rec.material = material;

        true
    }
}

impl Hittable for Sphere {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        _rng: &mut dyn RngCore,
    ) -> bool {
        Self::hit_at_center(
            self.center,
            self.radius,
            self.material.as_ref(),
            ray,
            ray_t,
            rec,
        )
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3, rng: &mut dyn RngCore) -> f32 {
        // Only count directions that actually reach the sphere
        let mut rec = HitRecord::default();
        let ray = Ray::new(origin, direction, 0.0);
        if !self.hit(&ray, Interval::new(1e-3, f32::INFINITY), &mut rec, rng) {
            return 0.0;
        }

        let dist_sq = (self.center - origin).length_squared();
        let cos_theta_max = (1.0 - self.radius * self.radius / dist_sq).max(0.0).sqrt();
        let solid_angle = 2.0 * PI * (1.0 - cos_theta_max);
        if solid_angle <= 0.0 {
            return 0.0;
        }

        1.0 / solid_angle
    }

    fn random(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        let direction = self.center - origin;
        let uvw = Onb::from_w(direction);
        uvw.local(random_to_sphere(
            self.radius,
            direction.length_squared(),
            rng,
        ))
    }
}

/// A sphere whose center moves linearly between two keyframes over
/// the shutter interval, for motion blur.
pub struct MovingSphere {
    center0: Vec3,
    center1: Vec3,
    time0: f32,
    time1: f32,
    radius: f32,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl MovingSphere {
    pub fn new(
        center0: Vec3,
        center1: Vec3,
        time0: f32,
        time1: f32,
        radius: f32,
        material: Arc<dyn Material>,
    ) -> Self {
        assert!(time1 > time0, "shutter interval must be non-empty");
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);
        // Box covering the whole sweep
        let bbox = Aabb::surrounding(
            &Aabb::from_points(center0 - rvec, center0 + rvec),
            &Aabb::from_points(center1 - rvec, center1 + rvec),
        );

        Self {
            center0,
            center1,
            time0,
            time1,
            radius,
            material,
            bbox,
        }
    }

    /// The center at a given ray time.
    pub fn center(&self, time: f32) -> Vec3 {
        let s = (time - self.time0) / (self.time1 - self.time0);
        self.center0.lerp(self.center1, s)
    }
}

impl Hittable for MovingSphere {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        _rng: &mut dyn RngCore,
    ) -> bool {
        Sphere::hit_at_center(
            self.center(ray.time),
            self.radius,
            self.material.as_ref(),
            ray,
            ray_t,
            rec,
        )
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Lambertian;
    use crate::Color;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn test_sphere() -> Sphere {
        Sphere::new(
            Vec3::new(0.0, 0.0, -1.0),
            0.5,
            Arc::new(Lambertian::new(Color::new(0.5, 0.5, 0.5))),
        )
    }

    #[test]
    fn test_sphere_hit() {
        let sphere = test_sphere();
        let mut rng = StdRng::seed_from_u64(0);

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 0.0);
        let mut rec = HitRecord::default();
        assert!(sphere.hit(
            &ray,
            Interval::new(1e-3, f32::INFINITY),
            &mut rec,
            &mut rng
        ));
        assert!((rec.t - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = test_sphere();
        let mut rng = StdRng::seed_from_u64(0);

        let ray = Ray::new(Vec3::ZERO, Vec3::Y, 0.0);
        let mut rec = HitRecord::default();
        assert!(!sphere.hit(
            &ray,
            Interval::new(1e-3, f32::INFINITY),
            &mut rec,
            &mut rng
        ));
    }

    #[test]
    fn test_hit_point_lies_on_surface() {
        let center = Vec3::new(1.5, -0.5, -3.0);
        let radius = 0.75;
        let sphere = Sphere::new(
            center,
            radius,
            Arc::new(Lambertian::new(Color::new(0.5, 0.5, 0.5))),
        );
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..100 {
            // Random rays from outside, aimed near the sphere
            let origin = Vec3::new(
                crate::gen_f32(&mut rng) * 4.0 - 2.0,
                crate::gen_f32(&mut rng) * 4.0 - 2.0,
                2.0,
            );
            let target = center
                + Vec3::new(
                    crate::gen_f32(&mut rng) - 0.5,
                    crate::gen_f32(&mut rng) - 0.5,
                    crate::gen_f32(&mut rng) - 0.5,
                );
            let ray = Ray::new(origin, target - origin, 0.0);

            let mut rec = HitRecord::default();
            if sphere.hit(&ray, Interval::new(1e-3, f32::INFINITY), &mut rec, &mut rng) {
                assert!(((rec.p - center).length() - radius).abs() < 1e-3);
                // Outward geometric normal agrees with the hit side
                assert!(rec.normal.dot(ray.direction) < 0.0);
            }
        }
    }

    #[test]
    fn test_moving_sphere_follows_keyframes() {
        let sphere = MovingSphere::new(
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::new(2.0, 0.0, -1.0),
            0.0,
            1.0,
            0.5,
            Arc::new(Lambertian::new(Color::new(0.5, 0.5, 0.5))),
        );
        let mut rng = StdRng::seed_from_u64(0);

        // At time 0 the sphere sits at x=0, at time 1 at x=2
        let early = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 0.0);
        let late = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 1.0);
        let mut rec = HitRecord::default();

        assert!(sphere.hit(
            &early,
            Interval::new(1e-3, f32::INFINITY),
            &mut rec,
            &mut rng
        ));
        assert!(!sphere.hit(
            &late,
            Interval::new(1e-3, f32::INFINITY),
            &mut rec,
            &mut rng
        ));

        // The sweep box covers both keyframes
        let bbox = sphere.bounding_box();
        assert!(bbox.min.x <= -0.5 && bbox.max.x >= 2.5);
    }
}
