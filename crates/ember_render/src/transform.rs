//! Instancing combinators: translate, rotate about Y, flip normals.
//!
//! Transforms move the ray into the wrapped object's local frame,
//! delegate, and move the resulting hit back into world space. The
//! wrapped object itself is never modified.

use crate::hittable::{HitRecord, Hittable};
use ember_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// Moves a wrapped object by a fixed offset.
pub struct Translate {
    object: Arc<dyn Hittable>,
    offset: Vec3,
    bbox: Aabb,
}

impl Translate {
    pub fn new(object: Arc<dyn Hittable>, offset: Vec3) -> Self {
        let bbox = object.bounding_box().translate(offset);
        Self {
            object,
            offset,
            bbox,
        }
    }
}

impl Hittable for Translate {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        // Move the ray backwards instead of the object forwards
        let moved = Ray::new(ray.origin - self.offset, ray.direction, ray.time);
        if !self.object.hit(&moved, ray_t, rec, rng) {
            return false;
        }
        rec.p += self.offset;
        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// Rotates a wrapped object about the world Y axis.
pub struct RotateY {
    object: Arc<dyn Hittable>,
    sin_theta: f32,
    cos_theta: f32,
    bbox: Aabb,
}

impl RotateY {
    pub fn new(object: Arc<dyn Hittable>, degrees: f32) -> Self {
        let radians = degrees.to_radians();
        let sin_theta = radians.sin();
        let cos_theta = radians.cos();

        // Rotate all 8 corners of the local box and take axis-aligned
        // extrema. Conservative, not tight.
        let local = object.bounding_box();
        let mut min = Vec3::INFINITY;
        let mut max = Vec3::NEG_INFINITY;
        for i in 0..2 {
            for j in 0..2 {
                for k in 0..2 {
                    let x = if i == 0 { local.min.x } else { local.max.x };
                    let y = if j == 0 { local.min.y } else { local.max.y };
                    let z = if k == 0 { local.min.z } else { local.max.z };

                    let corner = Vec3::new(
                        cos_theta * x + sin_theta * z,
                        y,
                        -sin_theta * x + cos_theta * z,
                    );
                    min = min.min(corner);
                    max = max.max(corner);
                }
            }
        }

        Self {
            object,
            sin_theta,
            cos_theta,
            bbox: Aabb::from_points(min, max),
        }
    }

    fn to_local(&self, v: Vec3) -> Vec3 {
        Vec3::new(
            self.cos_theta * v.x - self.sin_theta * v.z,
            v.y,
            self.sin_theta * v.x + self.cos_theta * v.z,
        )
    }

    fn to_world(&self, v: Vec3) -> Vec3 {
        Vec3::new(
            self.cos_theta * v.x + self.sin_theta * v.z,
            v.y,
            -self.sin_theta * v.x + self.cos_theta * v.z,
        )
    }
}

impl Hittable for RotateY {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        let rotated = Ray::new(self.to_local(ray.origin), self.to_local(ray.direction), ray.time);
        if !self.object.hit(&rotated, ray_t, rec, rng) {
            return false;
        }
        rec.p = self.to_world(rec.p);
        rec.normal = self.to_world(rec.normal);
        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// Inverts the reported surface side of a wrapped object.
///
/// Useful for one-sided lights and inverted shells; geometry is
/// unchanged, only the normal and front-face flag are negated.
pub struct FlipNormals {
    object: Arc<dyn Hittable>,
}

impl FlipNormals {
    pub fn new(object: Arc<dyn Hittable>) -> Self {
        Self { object }
    }
}

impl Hittable for FlipNormals {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        if !self.object.hit(ray, ray_t, rec, rng) {
            return false;
        }
        rec.normal = -rec.normal;
        rec.front_face = !rec.front_face;
        true
    }

    fn bounding_box(&self) -> Aabb {
        self.object.bounding_box()
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3, rng: &mut dyn RngCore) -> f32 {
        self.object.pdf_value(origin, direction, rng)
    }

    fn random(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        self.object.random(origin, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Lambertian;
    use crate::{Block, Color, Sphere};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn gray() -> Arc<Lambertian> {
        Arc::new(Lambertian::new(Color::new(0.5, 0.5, 0.5)))
    }

    #[test]
    fn test_translate_moves_hit_point() {
        let sphere = Arc::new(Sphere::new(Vec3::ZERO, 1.0, gray()));
        let moved = Translate::new(sphere, Vec3::new(5.0, 0.0, 0.0));
        let mut rng = StdRng::seed_from_u64(0);

        let ray = Ray::new(Vec3::new(5.0, 0.0, 5.0), Vec3::NEG_Z, 0.0);
        let mut rec = HitRecord::default();
        assert!(moved.hit(&ray, Interval::new(1e-3, f32::INFINITY), &mut rec, &mut rng));
        assert!((rec.p - Vec3::new(5.0, 0.0, 1.0)).length() < 1e-3);

        let bbox = moved.bounding_box();
        assert!((bbox.min.x - 4.0).abs() < 1e-3 && (bbox.max.x - 6.0).abs() < 1e-3);
    }

    #[test]
    fn test_rotate_y_round_trips_hit() {
        // A unit block rotated 45 degrees, hit straight down the z axis
        let block = Arc::new(Block::new(Vec3::splat(-0.5), Vec3::splat(0.5), gray()));
        let rotated = RotateY::new(block, 45.0);
        let mut rng = StdRng::seed_from_u64(0);

        let ray = Ray::new(Vec3::new(0.2, 0.0, 5.0), Vec3::NEG_Z, 0.0);
        let mut rec = HitRecord::default();
        assert!(rotated.hit(&ray, Interval::new(1e-3, f32::INFINITY), &mut rec, &mut rng));

        // Hit point stays on the ray, on the near face of the rotated
        // block (closer than the unrotated face at z = 0.5 would be)
        assert!((rec.p - ray.at(rec.t)).length() < 1e-3);
        assert!(rec.p.z > 0.5 && rec.p.z < 0.5_f32 * 2.0_f32.sqrt() + 1e-3);
        assert!(rec.normal.dot(ray.direction) < 0.0);
    }

    #[test]
    fn test_rotate_y_bbox_covers_rotation() {
        let block = Arc::new(Block::new(Vec3::splat(-0.5), Vec3::splat(0.5), gray()));
        let rotated = RotateY::new(block, 45.0);
        let bbox = rotated.bounding_box();

        // Footprint grows to sqrt(2) across x/z, y untouched
        let half_diag = 0.5_f32 * 2.0_f32.sqrt();
        assert!(bbox.max.x >= half_diag - 1e-3);
        assert!(bbox.min.z <= -half_diag + 1e-3);
        assert!((bbox.max.y - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_flip_normals() {
        let sphere = Arc::new(Sphere::new(Vec3::ZERO, 1.0, gray()));
        let flipped = FlipNormals::new(Arc::clone(&sphere) as Arc<dyn Hittable>);
        let mut rng = StdRng::seed_from_u64(0);

        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z, 0.0);
        let mut plain = HitRecord::default();
        let mut flip = HitRecord::default();
        assert!(sphere.hit(&ray, Interval::new(1e-3, f32::INFINITY), &mut plain, &mut rng));
        assert!(flipped.hit(&ray, Interval::new(1e-3, f32::INFINITY), &mut flip, &mut rng));

        assert_eq!(plain.t, flip.t);
        assert!((plain.normal + flip.normal).length() < 1e-6);
        assert_ne!(plain.front_face, flip.front_face);
    }
}
