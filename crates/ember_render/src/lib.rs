//! ember_render - CPU Monte Carlo path tracer.
//!
//! Estimates per-pixel radiance by recursively sampling light transport
//! paths through a BVH-indexed scene, with light importance sampling
//! for diffuse bounces, and renders tile-parallel on a thread pool.

mod block;
mod bvh;
mod camera;
mod hittable;
mod material;
mod pdf;
mod perlin;
mod pool;
mod rect;
mod renderer;
mod sampling;
mod scene;
mod sphere;
mod texture;
mod tile;
mod transform;
mod volume;

pub use block::Block;
pub use bvh::BvhNode;
pub use camera::Camera;
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{
    Color, Dielectric, DiffuseLight, Isotropic, Lambertian, Material, Metal, ScatterRecord,
};
pub use pdf::{CosinePdf, HittablePdf, MixturePdf, Pdf, SpherePdf};
pub use perlin::Perlin;
pub use pool::{Task, ThreadPool, WorkQueue};
pub use rect::{XyRect, XzRect, YzRect};
pub use renderer::{
    color_to_rgba, linear_to_gamma, ray_color, render_pixel, render_single_threaded, ImageBuffer,
    RenderConfig,
};
pub use sampling::{
    gen_f32, random_cosine_direction, random_in_unit_disk, random_in_unit_sphere,
    random_unit_vector,
};
pub use scene::{
    cornell_box, cornell_camera, marble_and_smoke, one_weekend_camera, random_spheres, Scene,
};
pub use sphere::{MovingSphere, Sphere};
pub use texture::{CheckerTexture, NoiseTexture, SolidColor, Texture};
pub use tile::{generate_tiles, render, SharedImage, Tile, TileTask, DEFAULT_TILE_SIZE};
pub use transform::{FlipNormals, RotateY, Translate};
pub use volume::ConstantMedium;

/// Re-export the math types the renderer API speaks.
pub use ember_math::{Aabb, Interval, Onb, Ray, Vec3};
