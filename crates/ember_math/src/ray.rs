use crate::Vec3;

/// A ray in 3D space with origin, direction, and time.
///
/// `time` is the instant the ray was cast within the camera's shutter
/// interval and is what moving geometry evaluates itself against.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub time: f32,
}

impl Ray {
    /// Create a new ray.
    pub fn new(origin: Vec3, direction: Vec3, time: f32) -> Self {
        Self {
            origin,
            direction,
            time,
        }
    }

    /// The point along the ray at parameter t: origin + t * direction.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Vec3::new(1.0, 2.0, 3.0), Vec3::X, 0.0);

        assert_eq!(ray.at(0.0), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(ray.at(2.0), Vec3::new(3.0, 2.0, 3.0));
        assert_eq!(ray.at(-1.0), Vec3::new(0.0, 2.0, 3.0));
    }

    #[test]
    fn test_ray_carries_time() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Y, 0.75);
        assert_eq!(ray.time, 0.75);
    }
}
