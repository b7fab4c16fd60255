//! Tile-parallel rendering on the thread pool.
//!
//! The image is cut into rectangular tiles, each rendered by one
//! [`TileTask`] with its own deterministic RNG stream. Tiles never
//! overlap, so workers write the shared image without locking.

use crate::pool::{Task, ThreadPool};
use crate::renderer::{render_pixel, ImageBuffer, RenderConfig};
use crate::{Camera, Color, Hittable};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Default tile edge length in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 64;

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy)]
pub struct Tile {
    /// X coordinate of the tile's top-left corner
    pub x: u32,
    /// Y coordinate of the tile's top-left corner
    pub y: u32,
    /// Width of the tile in pixels
    pub width: u32,
    /// Height of the tile in pixels
    pub height: u32,
    /// Index of this tile in the render order
    pub index: usize,
}

impl Tile {
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    /// Get the total number of pixels in this tile.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }
}

/// Generate tiles for an image, sorted from the center outward.
///
/// Center-out ordering mimics production renderers: the visually
/// important middle of the frame finishes first.
pub fn generate_tiles(width: u32, height: u32, tile_size: u32) -> Vec<Tile> {
    assert!(tile_size > 0, "tile_size must be positive");
    let mut tiles = Vec::new();
    let mut index = 0;

    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let tw = tile_size.min(width - x);
            let th = tile_size.min(height - y);
            tiles.push(Tile::new(x, y, tw, th, index));
            index += 1;
            x += tile_size;
        }
        y += tile_size;
    }

    sort_center_out(&mut tiles, width, height);

    // Re-index in render order
    for (i, tile) in tiles.iter_mut().enumerate() {
        tile.index = i;
    }

    tiles
}

/// Sort tiles by distance from the image center.
fn sort_center_out(tiles: &mut [Tile], width: u32, height: u32) {
    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;

    tiles.sort_by(|a, b| {
        let a_dx = a.x as f32 + a.width as f32 / 2.0 - center_x;
        let a_dy = a.y as f32 + a.height as f32 / 2.0 - center_y;
        let b_dx = b.x as f32 + b.width as f32 / 2.0 - center_x;
        let b_dy = b.y as f32 + b.height as f32 / 2.0 - center_y;

        let a_dist = a_dx * a_dx + a_dy * a_dy;
        let b_dist = b_dx * b_dx + b_dy * b_dy;

        a_dist
            .partial_cmp(&b_dist)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Image buffer writable from multiple worker threads.
///
/// Soundness rests on the tile schedule: every pixel belongs to
/// exactly one tile, and each tile is rendered by exactly one task,
/// so no two threads ever touch the same cell.
pub struct SharedImage {
    width: u32,
    height: u32,
    pixels: Vec<UnsafeCell<Color>>,
}

unsafe impl Sync for SharedImage {}

impl SharedImage {
    pub fn new(width: u32, height: u32) -> Self {
        let mut pixels = Vec::with_capacity((width * height) as usize);
        pixels.resize_with((width * height) as usize, || UnsafeCell::new(Color::ZERO));
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Write a pixel.
    ///
    /// # Safety
    /// No other thread may read or write `(x, y)` concurrently. The
    /// tile renderer guarantees this by assigning disjoint tiles.
    pub unsafe fn write(&self, x: u32, y: u32, color: Color) {
        let idx = (y * self.width + x) as usize;
        *self.pixels[idx].get() = color;
    }

    /// Convert into a plain [`ImageBuffer`] once all writers are done.
    pub fn into_image(self) -> ImageBuffer {
        let mut image = ImageBuffer::new(self.width, self.height);
        for (idx, cell) in self.pixels.into_iter().enumerate() {
            image.pixels[idx] = cell.into_inner();
        }
        image
    }
}

/// One tile's worth of rendering: owns its exclusive pixel region and
/// a deterministic RNG seed, shares camera/world/lights/image.
pub struct TileTask {
    pub tile: Tile,
    pub seed: u64,
    pub camera: Arc<Camera>,
    pub world: Arc<dyn Hittable>,
    pub lights: Option<Arc<dyn Hittable>>,
    pub config: Arc<RenderConfig>,
    pub image: Arc<SharedImage>,
    pub completed: Arc<AtomicUsize>,
    pub total: usize,
}

impl Task for TileTask {
    fn run(&mut self) {
        let mut rng = StdRng::seed_from_u64(self.seed);
        for local_y in 0..self.tile.height {
            for local_x in 0..self.tile.width {
                let x = self.tile.x + local_x;
                let y = self.tile.y + local_y;
                let color = render_pixel(
                    &self.camera,
                    self.world.as_ref(),
                    self.lights.as_deref(),
                    x,
                    y,
                    &self.config,
                    &mut rng,
                );
                // Safe: this task is the sole writer of this tile
                unsafe {
                    self.image.write(x, y, color);
                }
            }
        }

        let done = self.completed.fetch_add(1, Ordering::Relaxed) + 1;
        if done % 16 == 0 || done == self.total {
            log::info!("Rendered {}/{} tiles", done, self.total);
        }
    }
}

/// Render the scene tile-parallel and return the finished image.
///
/// Reproducible: each tile derives its RNG stream from `config.seed`
/// and its index, so the output is identical for a given seed
/// regardless of thread count.
pub fn render(
    camera: &Camera,
    world: Arc<dyn Hittable>,
    lights: Option<Arc<dyn Hittable>>,
    config: &RenderConfig,
) -> ImageBuffer {
    let width = camera.image_width;
    let height = camera.image_height;
    let tiles = generate_tiles(width, height, config.tile_size);
    let total = tiles.len();

    let threads = if config.threads == 0 {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    } else {
        config.threads
    };

    log::info!(
        "Rendering {}x{} at {} spp: {} tiles on {} threads",
        width,
        height,
        config.samples_per_pixel,
        total,
        threads
    );

    let image = Arc::new(SharedImage::new(width, height));
    let camera = Arc::new(camera.clone());
    let config_arc = Arc::new(config.clone());
    let completed = Arc::new(AtomicUsize::new(0));

    let pool = ThreadPool::new(threads);
    for tile in tiles {
        pool.add_task(Box::new(TileTask {
            tile,
            seed: config.seed.wrapping_add(tile.index as u64),
            camera: Arc::clone(&camera),
            world: Arc::clone(&world),
            lights: lights.clone(),
            config: Arc::clone(&config_arc),
            image: Arc::clone(&image),
            completed: Arc::clone(&completed),
            total,
        }));
    }
    pool.join();

    match Arc::try_unwrap(image) {
        Ok(image) => image.into_image(),
        // Unreachable: join() outlived every task clone
        Err(shared) => {
            let mut image = ImageBuffer::new(width, height);
            for y in 0..height {
                for x in 0..width {
                    image.set(x, y, unsafe {
                        *shared.pixels[(y * width + x) as usize].get()
                    });
                }
            }
            image
        }
    }
}
