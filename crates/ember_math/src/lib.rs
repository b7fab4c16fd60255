//! Geometry kernel for the ember path tracer.
//!
//! Pure math, no state: rays, parameter intervals, axis-aligned
//! bounding boxes and orthonormal bases. Vector math comes from glam.

// Re-export glam for convenience
pub use glam::*;

mod aabb;
mod interval;
mod onb;
mod ray;

pub use aabb::Aabb;
pub use interval::Interval;
pub use onb::Onb;
pub use ray::Ray;
