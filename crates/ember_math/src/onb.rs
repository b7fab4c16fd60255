use crate::Vec3;

/// Orthonormal basis built around a given w axis.
///
/// Used to express z-up hemisphere samples in the frame of a surface
/// normal.
#[derive(Debug, Copy, Clone)]
pub struct Onb {
    u: Vec3,
    v: Vec3,
    w: Vec3,
}

impl Onb {
    /// Build a basis whose w axis points along `w` (normalized here).
    pub fn from_w(w: Vec3) -> Self {
        let w = w.normalize();
        // Pick any axis not parallel to w to start the frame
        let a = if w.x.abs() > 0.9 { Vec3::Y } else { Vec3::X };
        let v = w.cross(a).normalize();
        let u = w.cross(v);
        Self { u, v, w }
    }

    pub fn u(&self) -> Vec3 {
        self.u
    }

    pub fn v(&self) -> Vec3 {
        self.v
    }

    pub fn w(&self) -> Vec3 {
        self.w
    }

    /// Map a vector given in this basis into world space.
    pub fn local(&self, a: Vec3) -> Vec3 {
        a.x * self.u + a.y * self.v + a.z * self.w
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basis_is_orthonormal() {
        for w in [Vec3::new(0.3, -0.6, 0.9), Vec3::X, Vec3::new(-2.0, 0.1, 0.0)] {
            let onb = Onb::from_w(w);

            assert!((onb.u().length() - 1.0).abs() < 1e-5);
            assert!((onb.v().length() - 1.0).abs() < 1e-5);
            assert!((onb.w().length() - 1.0).abs() < 1e-5);
            assert!(onb.u().dot(onb.v()).abs() < 1e-5);
            assert!(onb.u().dot(onb.w()).abs() < 1e-5);
            assert!(onb.v().dot(onb.w()).abs() < 1e-5);
        }
    }

    #[test]
    fn test_local_z_maps_to_w() {
        let onb = Onb::from_w(Vec3::new(1.0, 2.0, -1.0));
        let mapped = onb.local(Vec3::Z);
        assert!((mapped - onb.w()).length() < 1e-5);
    }
}
