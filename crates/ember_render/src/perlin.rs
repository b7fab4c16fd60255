//! Perlin lattice noise for procedural textures.

use crate::sampling::{gen_f32, random_unit_vector};
use ember_math::Vec3;
use rand::{Rng, RngCore};

const POINT_COUNT: usize = 256;

/// Gradient noise over a lattice of random unit vectors, looked up
/// through shuffled permutation tables.
pub struct Perlin {
    ranvec: Vec<Vec3>,
    perm_x: Vec<usize>,
    perm_y: Vec<usize>,
    perm_z: Vec<usize>,
}

impl Perlin {
    pub fn new(rng: &mut dyn RngCore) -> Self {
        let ranvec = (0..POINT_COUNT).map(|_| random_unit_vector(rng)).collect();
        Self {
            ranvec,
            perm_x: Self::generate_perm(rng),
            perm_y: Self::generate_perm(rng),
            perm_z: Self::generate_perm(rng),
        }
    }

    /// Smoothed gradient noise in roughly [-1, 1].
    pub fn noise(&self, p: Vec3) -> f32 {
        let u = p.x - p.x.floor();
        let v = p.y - p.y.floor();
        let w = p.z - p.z.floor();

        let i = p.x.floor() as i64;
        let j = p.y.floor() as i64;
        let k = p.z.floor() as i64;

        let mut c = [[[Vec3::ZERO; 2]; 2]; 2];
        for (di, plane) in c.iter_mut().enumerate() {
            for (dj, row) in plane.iter_mut().enumerate() {
                for (dk, cell) in row.iter_mut().enumerate() {
                    let index = self.perm_x[((i + di as i64) & 255) as usize]
                        ^ self.perm_y[((j + dj as i64) & 255) as usize]
                        ^ self.perm_z[((k + dk as i64) & 255) as usize];
                    *cell = self.ranvec[index];
                }
            }
        }

        Self::perlin_interp(&c, u, v, w)
    }

    /// Turbulence: sum of octaves of |noise|.
    pub fn turb(&self, p: Vec3, depth: u32) -> f32 {
        let mut accum = 0.0;
        let mut temp_p = p;
        let mut weight = 1.0;
        for _ in 0..depth {
            accum += weight * self.noise(temp_p);
            weight *= 0.5;
            temp_p *= 2.0;
        }
        accum.abs()
    }

    /// Trilinear gradient interpolation with Hermite smoothing.
    fn perlin_interp(c: &[[[Vec3; 2]; 2]; 2], u: f32, v: f32, w: f32) -> f32 {
        let uu = u * u * (3.0 - 2.0 * u);
        let vv = v * v * (3.0 - 2.0 * v);
        let ww = w * w * (3.0 - 2.0 * w);

        let mut accum = 0.0;
        for i in 0..2 {
            for j in 0..2 {
                for k in 0..2 {
                    let (fi, fj, fk) = (i as f32, j as f32, k as f32);
                    let weight_v = Vec3::new(u - fi, v - fj, w - fk);
                    accum += (fi * uu + (1.0 - fi) * (1.0 - uu))
                        * (fj * vv + (1.0 - fj) * (1.0 - vv))
                        * (fk * ww + (1.0 - fk) * (1.0 - ww))
                        * c[i][j][k].dot(weight_v);
                }
            }
        }
        accum
    }

    fn generate_perm(rng: &mut dyn RngCore) -> Vec<usize> {
        let mut p: Vec<usize> = (0..POINT_COUNT).collect();
        // Fisher-Yates shuffle
        for i in (1..POINT_COUNT).rev() {
            let target = rng.gen_range(0..=i);
            p.swap(i, target);
        }
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_noise_is_bounded_and_continuousish() {
        let mut rng = StdRng::seed_from_u64(5);
        let perlin = Perlin::new(&mut rng);

        for _ in 0..500 {
            let p = Vec3::new(
                gen_f32(&mut rng) * 20.0,
                gen_f32(&mut rng) * 20.0,
                gen_f32(&mut rng) * 20.0,
            );
            let n = perlin.noise(p);
            assert!(n.abs() <= 1.0 + 1e-3);

            // Nearby points give nearby noise
            let n2 = perlin.noise(p + Vec3::splat(1e-4));
            assert!((n - n2).abs() < 1e-2);
        }
    }

    #[test]
    fn test_turbulence_is_nonnegative() {
        let mut rng = StdRng::seed_from_u64(5);
        let perlin = Perlin::new(&mut rng);
        for _ in 0..100 {
            let p = Vec3::new(gen_f32(&mut rng), gen_f32(&mut rng), gen_f32(&mut rng)) * 10.0;
            assert!(perlin.turb(p, 7) >= 0.0);
        }
    }
}
