//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing with configurable depth
//! - Mixture importance sampling of lights and material PDFs
//! - Gamma correction
//! - Anti-aliasing via multi-sampling

use crate::pdf::{HittablePdf, MixturePdf, Pdf};
use crate::{Camera, Color, HitRecord, Hittable, ScatterRecord};
use ember_math::{Interval, Ray};
use rand::RngCore;
use std::path::Path;

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Background color when ray doesn't hit anything
    pub background: Color,
    /// Whether to use sky gradient instead of solid background
    pub use_sky_gradient: bool,
    /// Tile edge length in pixels for the parallel renderer
    pub tile_size: u32,
    /// Worker threads (0 = all available cores)
    pub threads: usize,
    /// Base seed; each tile derives its RNG stream from this
    pub seed: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_pixel: 100,
            max_depth: 50,
            background: Color::ZERO,
            use_sky_gradient: false,
            tile_size: crate::tile::DEFAULT_TILE_SIZE,
            threads: 0,
            seed: 0,
        }
    }
}

/// Compute the color seen by a ray.
///
/// This is the core path tracing function. It traces the ray through
/// the scene, bouncing off surfaces and accumulating color. When
/// `lights` is given, diffuse bounces draw directions from a 50/50
/// mixture of the light PDF and the material PDF, with the estimator
/// weighted by `scattering_pdf / sampling_pdf`.
pub fn ray_color(
    ray: &Ray,
    world: &dyn Hittable,
    lights: Option<&dyn Hittable>,
    depth: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    // If we've exceeded max depth, return black (no light)
    if depth == 0 {
        return Color::ZERO;
    }

    let mut rec = HitRecord::default();

    // Check if ray hits anything
    if !world.hit(ray, Interval::new(0.001, f32::INFINITY), &mut rec, rng) {
        // Ray didn't hit anything - return background
        if config.use_sky_gradient {
            return sky_gradient(ray);
        }
        return config.background;
    }

    // Get emission from material (for lights)
    let emission = rec.material.emitted(rec.u, rec.v, rec.p);

    // Try to scatter the ray
    let scatter = match rec.material.scatter(ray, &rec, rng) {
        Some(scatter) => scatter,
        // Ray was absorbed - just return emission
        None => return emission,
    };

    match scatter {
        // Specular bounces follow a single fixed direction; no
        // density weighting applies.
        ScatterRecord::Specular { ray: scattered, attenuation } => {
            emission + attenuation * ray_color(&scattered, world, lights, depth - 1, config, rng)
        }
        ScatterRecord::Diffuse { attenuation, pdf } => {
            let (direction, sampling_pdf) = match lights {
                Some(lights) => {
                    let light_pdf = HittablePdf::new(lights, rec.p);
                    let mixture = MixturePdf::new(&light_pdf, pdf.as_ref());
                    let direction = mixture.generate(rng);
                    (direction, mixture.value(direction, rng))
                }
                None => {
                    let direction = pdf.generate(rng);
                    (direction, pdf.value(direction, rng))
                }
            };

            // Degenerate sample (e.g. direction in the light's own
            // plane); contributes nothing
            if sampling_pdf <= 1e-8 {
                return emission;
            }

            let scattered = Ray::new(rec.p, direction, ray.time);
            let scattering_pdf = rec.material.scattering_pdf(ray, &rec, &scattered);
            let incoming = ray_color(&scattered, world, lights, depth - 1, config, rng);

            emission + attenuation * scattering_pdf * incoming / sampling_pdf
        }
    }
}

/// Compute sky gradient background.
fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction.normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Clamp a value to [0, 1] range.
#[inline]
pub fn clamp_01(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

/// Convert a color to 8-bit RGBA.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    // Apply gamma correction and convert to 0-255
    let r = (255.0 * clamp_01(linear_to_gamma(color.x))) as u8;
    let g = (255.0 * clamp_01(linear_to_gamma(color.y))) as u8;
    let b = (255.0 * clamp_01(linear_to_gamma(color.z))) as u8;
    [r, g, b, 255]
}

/// Render a single pixel with multi-sampling.
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    lights: Option<&dyn Hittable>,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let mut pixel_color = Color::ZERO;

    for _ in 0..config.samples_per_pixel {
        // Camera.get_ray already adds random offset for anti-aliasing
        let ray = camera.get_ray(x, y, rng);
        let sample = ray_color(&ray, world, lights, config.max_depth, config, rng);
        // Importance sampling can produce the occasional NaN
        // (0 * inf along degenerate paths); drop those samples
        pixel_color += scrub_nan(sample);
    }

    // Average the samples
    pixel_color / config.samples_per_pixel as f32
}

/// Replace NaN components with zero.
#[inline]
fn scrub_nan(c: Color) -> Color {
    Color::new(
        if c.x.is_nan() { 0.0 } else { c.x },
        if c.y.is_nan() { 0.0 } else { c.y },
        if c.z.is_nan() { 0.0 } else { c.z },
    )
}

/// Simple image buffer for storing render output.
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width * height) as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Convert to RGBA bytes (for display or saving).
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity((self.width * self.height * 4) as usize);
        for color in &self.pixels {
            let rgba = color_to_rgba(*color);
            bytes.extend_from_slice(&rgba);
        }
        bytes
    }

    /// Save the buffer as a PNG file (gamma corrected).
    pub fn save_png(&self, path: impl AsRef<Path>) -> image::ImageResult<()> {
        image::save_buffer(
            path,
            &self.to_rgba(),
            self.width,
            self.height,
            image::ColorType::Rgba8,
        )
    }
}

/// Render the entire scene to an image buffer.
///
/// This is a simple single-threaded renderer for testing; use
/// [`crate::tile::render`] for the threaded tile renderer.
pub fn render_single_threaded(
    camera: &Camera,
    world: &dyn Hittable,
    lights: Option<&dyn Hittable>,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> ImageBuffer {
    let mut image = ImageBuffer::new(camera.image_width, camera.image_height);

    for y in 0..camera.image_height {
        for x in 0..camera.image_width {
            let color = render_pixel(camera, world, lights, x, y, config, rng);
            image.set(x, y, color);
        }
    }

    image
}
