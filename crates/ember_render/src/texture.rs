//! Textures: color as a function of surface coordinates and position.

use crate::material::Color;
use crate::perlin::Perlin;
use ember_math::Vec3;
use std::sync::Arc;

/// Trait for anything that can answer "what color is this point".
pub trait Texture: Send + Sync {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color;
}

/// A single flat color.
pub struct SolidColor {
    albedo: Color,
}

impl SolidColor {
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }
}

impl Texture for SolidColor {
    fn value(&self, _u: f32, _v: f32, _p: Vec3) -> Color {
        self.albedo
    }
}

/// 3D checker pattern: the sign of a product of sines picks between
/// the odd and even texture.
pub struct CheckerTexture {
    odd: Arc<dyn Texture>,
    even: Arc<dyn Texture>,
}

impl CheckerTexture {
    pub fn new(odd: Arc<dyn Texture>, even: Arc<dyn Texture>) -> Self {
        Self { odd, even }
    }

    /// Checker over two flat colors.
    pub fn from_colors(odd: Color, even: Color) -> Self {
        Self {
            odd: Arc::new(SolidColor::new(odd)),
            even: Arc::new(SolidColor::new(even)),
        }
    }
}

impl Texture for CheckerTexture {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color {
        let sines = (10.0 * p.x).sin() * (10.0 * p.y).sin() * (10.0 * p.z).sin();
        if sines < 0.0 {
            self.odd.value(u, v, p)
        } else {
            self.even.value(u, v, p)
        }
    }
}

/// Marble-like noise texture: a sine banded by turbulence.
pub struct NoiseTexture {
    noise: Perlin,
    scale: f32,
}

impl NoiseTexture {
    pub fn new(noise: Perlin, scale: f32) -> Self {
        Self { noise, scale }
    }
}

impl Texture for NoiseTexture {
    fn value(&self, _u: f32, _v: f32, p: Vec3) -> Color {
        let bands = (self.scale * p.z + 10.0 * self.noise.turb(p, 7)).sin();
        Color::splat(0.5) * (1.0 + bands)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_solid_color_ignores_coordinates() {
        let tex = SolidColor::new(Color::new(0.1, 0.2, 0.3));
        assert_eq!(tex.value(0.0, 0.0, Vec3::ZERO), Color::new(0.1, 0.2, 0.3));
        assert_eq!(
            tex.value(0.9, 0.4, Vec3::splat(100.0)),
            Color::new(0.1, 0.2, 0.3)
        );
    }

    #[test]
    fn test_checker_alternates() {
        let tex = CheckerTexture::from_colors(Color::ZERO, Color::ONE);
        // sin(10 * pi/20) = sin(pi/2) > 0 on all axes -> even
        let even_p = Vec3::splat(std::f32::consts::PI / 20.0);
        // negate one axis -> odd
        let odd_p = Vec3::new(-even_p.x, even_p.y, even_p.z);

        assert_eq!(tex.value(0.0, 0.0, even_p), Color::ONE);
        assert_eq!(tex.value(0.0, 0.0, odd_p), Color::ZERO);
    }

    #[test]
    fn test_noise_texture_stays_in_gamut() {
        let mut rng = StdRng::seed_from_u64(9);
        let tex = NoiseTexture::new(Perlin::new(&mut rng), 4.0);
        for i in 0..100 {
            let p = Vec3::splat(i as f32 * 0.37);
            let c = tex.value(0.0, 0.0, p);
            assert!(c.min_element() >= 0.0 && c.max_element() <= 1.0 + 1e-4);
        }
    }
}
