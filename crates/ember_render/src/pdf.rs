//! Probability density functions over scatter directions.
//!
//! A `Pdf` answers two questions: how likely was a given direction
//! (`value`), and give me a direction distributed accordingly
//! (`generate`). The integrator divides sampled radiance by `value`,
//! so any direction `generate` can produce must have nonzero density.

use crate::hittable::Hittable;
use crate::sampling::{gen_f32, random_cosine_direction, random_unit_vector};
use ember_math::{Onb, Vec3};
use rand::RngCore;
use std::f32::consts::PI;

pub trait Pdf {
    /// Density of `direction` under this distribution.
    fn value(&self, direction: Vec3, rng: &mut dyn RngCore) -> f32;

    /// Draw a direction from this distribution.
    fn generate(&self, rng: &mut dyn RngCore) -> Vec3;
}

/// Cosine-weighted hemisphere about a surface normal.
pub struct CosinePdf {
    uvw: Onb,
}

impl CosinePdf {
    pub fn new(w: Vec3) -> Self {
        Self { uvw: Onb::from_w(w) }
    }
}

impl Pdf for CosinePdf {
    fn value(&self, direction: Vec3, _rng: &mut dyn RngCore) -> f32 {
        let cosine = direction.normalize().dot(self.uvw.w());
        (cosine / PI).max(0.0)
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        self.uvw.local(random_cosine_direction(rng))
    }
}

/// Uniform distribution over the whole sphere of directions.
pub struct SpherePdf;

impl Pdf for SpherePdf {
    fn value(&self, _direction: Vec3, _rng: &mut dyn RngCore) -> f32 {
        1.0 / (4.0 * PI)
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        random_unit_vector(rng)
    }
}

/// Importance-samples directions towards a target shape from a fixed
/// origin. Created per scatter event.
pub struct HittablePdf<'a> {
    objects: &'a dyn Hittable,
    origin: Vec3,
}

impl<'a> HittablePdf<'a> {
    pub fn new(objects: &'a dyn Hittable, origin: Vec3) -> Self {
        Self { objects, origin }
    }
}

impl<'a> Pdf for HittablePdf<'a> {
    fn value(&self, direction: Vec3, rng: &mut dyn RngCore) -> f32 {
        self.objects.pdf_value(self.origin, direction, rng)
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        self.objects.random(self.origin, rng)
    }
}

/// A 50/50 blend of two strategies; hedges light sampling against
/// material sampling so neither's blind spots dominate the variance.
pub struct MixturePdf<'a> {
    p0: &'a dyn Pdf,
    p1: &'a dyn Pdf,
}

impl<'a> MixturePdf<'a> {
    pub fn new(p0: &'a dyn Pdf, p1: &'a dyn Pdf) -> Self {
        Self { p0, p1 }
    }
}

impl<'a> Pdf for MixturePdf<'a> {
    fn value(&self, direction: Vec3, rng: &mut dyn RngCore) -> f32 {
        0.5 * self.p0.value(direction, rng) + 0.5 * self.p1.value(direction, rng)
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        if gen_f32(rng) < 0.5 {
            self.p0.generate(rng)
        } else {
            self.p1.generate(rng)
        }
    }
}
