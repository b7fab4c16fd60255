//! Random sphere field with motion blur, defocus blur and a checker
//! ground under a sky gradient. Writes `one_weekend.png`.
//!
//! Usage: cargo run --release --example one_weekend [spp]

use anyhow::Result;
use ember_render::{one_weekend_camera, random_spheres, Color, RenderConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Instant;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let samples: u32 = std::env::args()
        .nth(1)
        .map(|s| s.parse())
        .transpose()?
        .unwrap_or(100);

    let mut rng = StdRng::seed_from_u64(2024);
    let scene = random_spheres(&mut rng);
    let camera = one_weekend_camera(1200, 675, samples);
    let config = RenderConfig {
        samples_per_pixel: camera.samples_per_pixel,
        max_depth: camera.max_depth,
        background: Color::ZERO,
        use_sky_gradient: true,
        seed: 0xBEEF,
        ..Default::default()
    };

    let start = Instant::now();
    let image = scene.render(&camera, &config);
    log::info!("Render finished in {:.1}s", start.elapsed().as_secs_f32());

    image.save_png("one_weekend.png")?;
    log::info!("Wrote one_weekend.png");
    Ok(())
}
