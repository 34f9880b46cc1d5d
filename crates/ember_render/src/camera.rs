//! Camera for primary ray generation.

use crate::{sampling::random_in_unit_disk, Ray};
use ember_math::Vec3;
use rand::Rng;

/// Inputs the camera is derived from.
///
/// The camera itself is immutable; when any of these change, rebuild it
/// with [`Camera::new`].
#[derive(Debug, Clone, Copy)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub vfov: f64,
    /// Width over height of the image
    pub aspect_ratio: f64,
    pub look_from: Vec3,
    pub look_at: Vec3,
    /// World-space up used to build the view basis
    pub vup: Vec3,
    /// Lens diameter; 0 gives a pinhole camera
    pub aperture: f64,
    /// Distance to the plane of perfect focus
    pub focus_dist: f64,
}

impl Default for CameraConfig {
    /// The preset view over the cover scene.
    fn default() -> Self {
        let look_from = Vec3::new(13.0, 2.0, 3.0);
        let look_at = Vec3::ZERO;

        Self {
            vfov: 30.0,
            aspect_ratio: 16.0 / 9.0,
            look_from,
            look_at,
            vup: Vec3::Y,
            aperture: 0.1,
            focus_dist: (look_from - look_at).length() / 2.0,
        }
    }
}

/// Maps normalized viewport coordinates plus a lens sample to world-space
/// rays, modeling depth of field with a thin-lens aperture.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    origin: Vec3,
    lower_left_corner: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    lens_radius: f64,
}

impl Camera {
    /// Build the camera from its configuration.
    pub fn new(config: &CameraConfig) -> Self {
        let theta = config.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h;
        let viewport_width = config.aspect_ratio * viewport_height;

        let w = (config.look_from - config.look_at).normalize();
        let u = config.vup.cross(w).normalize();
        let v = w.cross(u);

        let origin = config.look_from;
        let horizontal = config.focus_dist * viewport_width * u;
        let vertical = config.focus_dist * viewport_height * v;
        let lower_left_corner =
            origin - horizontal / 2.0 - vertical / 2.0 - config.focus_dist * w;

        Self {
            origin,
            lower_left_corner,
            horizontal,
            vertical,
            u,
            v,
            w,
            lens_radius: config.aperture / 2.0,
        }
    }

    /// Ray through normalized viewport coordinates (s, t) in [0, 1].
    ///
    /// The origin is jittered across the lens disk; with a zero aperture
    /// the jitter vanishes and this is a pinhole camera.
    pub fn get_ray(&self, s: f64, t: f64, rng: &mut impl Rng) -> Ray {
        let rd = self.lens_radius * random_in_unit_disk(rng);
        let offset = self.u * rd.x + self.v * rd.y;

        Ray::new(
            self.origin + offset,
            self.lower_left_corner + s * self.horizontal + t * self.vertical
                - self.origin
                - offset,
        )
    }

    /// The orthonormal view basis (u, v, w); w points away from the scene.
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        (self.u, self.v, self.w)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(&CameraConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn pinhole_down_z() -> Camera {
        Camera::new(&CameraConfig {
            vfov: 90.0,
            aspect_ratio: 1.0,
            look_from: Vec3::ZERO,
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            aperture: 0.0,
            focus_dist: 1.0,
        })
    }

    #[test]
    fn test_basis_is_orthonormal() {
        let camera = Camera::default();
        let (u, v, w) = camera.basis();

        for vector in [u, v, w] {
            assert!((vector.length() - 1.0).abs() < 1e-12);
        }
        assert!(u.dot(v).abs() < 1e-12);
        assert!(u.dot(w).abs() < 1e-12);
        assert!(v.dot(w).abs() < 1e-12);
        assert!((u.cross(v) - w).length() < 1e-12);
    }

    #[test]
    fn test_center_ray_points_at_target() {
        let camera = pinhole_down_z();
        let mut rng = StdRng::seed_from_u64(42);

        let ray = camera.get_ray(0.5, 0.5, &mut rng);
        assert!((ray.direction().normalize() - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-12);
    }

    #[test]
    fn test_pinhole_origin_is_fixed() {
        let camera = pinhole_down_z();
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..32 {
            assert_eq!(camera.get_ray(0.25, 0.75, &mut rng).origin(), Vec3::ZERO);
        }
    }

    #[test]
    fn test_aperture_jitters_origin() {
        let config = CameraConfig {
            aperture: 2.0,
            ..CameraConfig::default()
        };
        let camera = Camera::new(&config);
        let mut rng = StdRng::seed_from_u64(42);

        let a = camera.get_ray(0.5, 0.5, &mut rng).origin();
        let b = camera.get_ray(0.5, 0.5, &mut rng).origin();
        assert_ne!(a, b);
    }
}
