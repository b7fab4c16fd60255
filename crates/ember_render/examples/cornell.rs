//! Cornell box demo: rotated block, glass sphere, sampled ceiling
//! light. Writes `cornell.png`.
//!
//! Usage: cargo run --release --example cornell [spp]

use anyhow::Result;
use ember_render::{cornell_box, cornell_camera, RenderConfig};
use std::time::Instant;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let samples: u32 = std::env::args()
        .nth(1)
        .map(|s| s.parse())
        .transpose()?
        .unwrap_or(200);

    let scene = cornell_box();
    let camera = cornell_camera(600, 600, samples);
    let config = RenderConfig {
        samples_per_pixel: camera.samples_per_pixel,
        max_depth: camera.max_depth,
        background: camera.background,
        seed: 0xC0FFEE,
        ..Default::default()
    };

    let start = Instant::now();
    let image = scene.render(&camera, &config);
    log::info!("Render finished in {:.1}s", start.elapsed().as_secs_f32());

    image.save_png("cornell.png")?;
    log::info!("Wrote cornell.png");
    Ok(())
}
