//! Scene aggregate and ready-made demo scenes.

use crate::renderer::{ImageBuffer, RenderConfig};
use crate::sampling::gen_f32;
use crate::{
    Block, BvhNode, Camera, CheckerTexture, Color, ConstantMedium, Dielectric, DiffuseLight,
    Hittable, HittableList, Lambertian, Material, Metal, MovingSphere, NoiseTexture, RotateY,
    Sphere, Texture, Translate, XyRect, XzRect, YzRect,
};
use ember_math::Vec3;
use rand::RngCore;
use std::sync::Arc;

/// A renderable scene: the world geometry plus the subset of objects
/// the integrator importance-samples as lights.
pub struct Scene {
    pub world: Arc<dyn Hittable>,
    pub lights: Option<Arc<dyn Hittable>>,
}

impl Scene {
    pub fn new(world: Arc<dyn Hittable>) -> Self {
        Self {
            world,
            lights: None,
        }
    }

    pub fn with_lights(mut self, lights: Arc<dyn Hittable>) -> Self {
        self.lights = Some(lights);
        self
    }

    /// Render this scene tile-parallel per `config`.
    pub fn render(&self, camera: &Camera, config: &RenderConfig) -> ImageBuffer {
        crate::tile::render(
            camera,
            Arc::clone(&self.world),
            self.lights.clone(),
            config,
        )
    }
}

/// Cornell box with a rotated block, a glass sphere, and an
/// importance-sampled ceiling light.
pub fn cornell_box() -> Scene {
    let red: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.65, 0.05, 0.05)));
    let white: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.73, 0.73, 0.73)));
    let green: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.12, 0.45, 0.15)));
    let light: Arc<dyn Material> = Arc::new(DiffuseLight::new(Color::new(15.0, 15.0, 15.0)));
    let glass: Arc<dyn Material> = Arc::new(Dielectric::new(1.5));

    let mut world = HittableList::new();

    // Walls
    world.add(Arc::new(YzRect::new(0.0, 555.0, 0.0, 555.0, 555.0, green)));
    world.add(Arc::new(YzRect::new(0.0, 555.0, 0.0, 555.0, 0.0, red)));
    world.add(Arc::new(XzRect::new(
        0.0,
        555.0,
        0.0,
        555.0,
        0.0,
        Arc::clone(&white),
    )));
    world.add(Arc::new(XzRect::new(
        0.0,
        555.0,
        0.0,
        555.0,
        555.0,
        Arc::clone(&white),
    )));
    world.add(Arc::new(XyRect::new(
        0.0,
        555.0,
        0.0,
        555.0,
        555.0,
        Arc::clone(&white),
    )));

    // Ceiling light
    let lamp = Arc::new(XzRect::new(213.0, 343.0, 227.0, 332.0, 554.0, light));
    world.add(lamp.clone());

    // Tall block, rotated and pushed to the back left
    let block = Arc::new(Block::new(
        Vec3::ZERO,
        Vec3::new(165.0, 330.0, 165.0),
        white,
    ));
    let block = Arc::new(RotateY::new(block, 15.0));
    let block = Arc::new(Translate::new(block, Vec3::new(265.0, 0.0, 295.0)));
    world.add(block);

    // Glass sphere where the short block sits in the classic scene
    let sphere = Arc::new(Sphere::new(Vec3::new(190.0, 90.0, 190.0), 90.0, glass));
    world.add(sphere.clone());

    // Sample both the lamp and the glass sphere
    let mut lights = HittableList::new();
    lights.add(lamp);
    lights.add(sphere);

    Scene::new(Arc::new(BvhNode::from_list(world))).with_lights(Arc::new(lights))
}

/// Camera matching [`cornell_box`].
pub fn cornell_camera(width: u32, height: u32, samples: u32) -> Camera {
    let mut camera = Camera::new()
        .with_resolution(width, height)
        .with_quality(samples, 50)
        .with_position(
            Vec3::new(278.0, 278.0, -800.0),
            Vec3::new(278.0, 278.0, 0.0),
            Vec3::Y,
        )
        .with_lens(40.0, 0.0, 10.0)
        .with_background(Color::ZERO);
    camera.initialize();
    camera
}

/// Random sphere field with motion blur and a checker ground.
pub fn random_spheres(rng: &mut dyn RngCore) -> Scene {
    let mut world = HittableList::new();

    let checker: Arc<dyn Texture> = Arc::new(CheckerTexture::from_colors(
        Color::new(0.2, 0.3, 0.1),
        Color::new(0.9, 0.9, 0.9),
    ));
    let ground: Arc<dyn Material> = Arc::new(Lambertian::textured(checker));
    world.add(Arc::new(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        ground,
    )));

    for a in -11..11 {
        for b in -11..11 {
            let choose_mat = gen_f32(rng);
            let center = Vec3::new(
                a as f32 + 0.9 * gen_f32(rng),
                0.2,
                b as f32 + 0.9 * gen_f32(rng),
            );
            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            if choose_mat < 0.8 {
                // Diffuse, bobbing upward over the shutter
                let albedo = Color::new(gen_f32(rng), gen_f32(rng), gen_f32(rng))
                    * Color::new(gen_f32(rng), gen_f32(rng), gen_f32(rng));
                let material: Arc<dyn Material> = Arc::new(Lambertian::new(albedo));
                let center1 = center + Vec3::new(0.0, 0.5 * gen_f32(rng), 0.0);
                world.add(Arc::new(MovingSphere::new(
                    center, center1, 0.0, 1.0, 0.2, material,
                )));
            } else if choose_mat < 0.95 {
                let albedo = Color::new(
                    0.5 * (1.0 + gen_f32(rng)),
                    0.5 * (1.0 + gen_f32(rng)),
                    0.5 * (1.0 + gen_f32(rng)),
                );
                let material: Arc<dyn Material> = Arc::new(Metal::new(albedo, 0.5 * gen_f32(rng)));
                world.add(Arc::new(Sphere::new(center, 0.2, material)));
            } else {
                let material: Arc<dyn Material> = Arc::new(Dielectric::new(1.5));
                world.add(Arc::new(Sphere::new(center, 0.2, material)));
            }
        }
    }

    let glass: Arc<dyn Material> = Arc::new(Dielectric::new(1.5));
    world.add(Arc::new(Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0, glass)));
    let diffuse: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.4, 0.2, 0.1)));
    world.add(Arc::new(Sphere::new(Vec3::new(-4.0, 1.0, 0.0), 1.0, diffuse)));
    let metal: Arc<dyn Material> = Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0));
    world.add(Arc::new(Sphere::new(Vec3::new(4.0, 1.0, 0.0), 1.0, metal)));

    Scene::new(Arc::new(BvhNode::from_list(world)))
}

/// Camera matching [`random_spheres`].
pub fn one_weekend_camera(width: u32, height: u32, samples: u32) -> Camera {
    let mut camera = Camera::new()
        .with_resolution(width, height)
        .with_quality(samples, 50)
        .with_position(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y)
        .with_lens(20.0, 0.6, 10.0)
        .with_shutter(0.0, 1.0);
    camera.initialize();
    camera
}

/// Two perlin-noise spheres under a sky gradient, plus a smoke ball.
pub fn marble_and_smoke(rng: &mut dyn RngCore) -> Scene {
    let mut world = HittableList::new();

    let noise: Arc<dyn Texture> = Arc::new(NoiseTexture::new(crate::Perlin::new(rng), 4.0));
    let marble: Arc<dyn Material> = Arc::new(Lambertian::textured(noise));
    world.add(Arc::new(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        Arc::clone(&marble),
    )));
    world.add(Arc::new(Sphere::new(Vec3::new(0.0, 2.0, 0.0), 2.0, marble)));

    let fog_boundary: Arc<dyn Material> = Arc::new(Dielectric::new(1.5));
    let boundary: Arc<dyn Hittable> =
        Arc::new(Sphere::new(Vec3::new(4.0, 1.0, 2.0), 1.0, fog_boundary));
    world.add(Arc::new(ConstantMedium::new(
        boundary,
        2.0,
        Color::new(0.8, 0.8, 0.9),
    )));

    Scene::new(Arc::new(BvhNode::from_list(world)))
}
