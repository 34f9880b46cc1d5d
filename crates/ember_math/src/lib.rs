//! Math support for the ember path tracer.
//!
//! The renderer works in `f64` throughout, so glam's `DVec3` is re-exported
//! as the single vector type. It stands in for points, directions and RGB
//! colors alike.

pub use glam::DVec3 as Vec3;

mod interval;
pub use interval::Interval;

/// Componentwise epsilon used by [`Vec3Ext::near_zero`].
pub const NEAR_ZERO_EPS: f64 = 1e-8;

/// Extension methods on [`Vec3`] that glam does not provide.
pub trait Vec3Ext {
    /// True if every component is smaller in magnitude than [`NEAR_ZERO_EPS`].
    ///
    /// Used to catch degenerate scatter directions before they are handed
    /// to `normalize`, which would produce NaN on a zero vector.
    fn near_zero(self) -> bool;
}

impl Vec3Ext for Vec3 {
    fn near_zero(self) -> bool {
        self.abs().max_element() < NEAR_ZERO_EPS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_creation() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.x, 1.0);
        assert_eq!(v.y, 2.0);
        assert_eq!(v.z, 3.0);
    }

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(a.dot(b), 32.0);
        assert_eq!(a.cross(b), Vec3::new(-3.0, 6.0, -3.0));
    }

    #[test]
    fn test_near_zero() {
        assert!(Vec3::ZERO.near_zero());
        assert!(Vec3::splat(1e-9).near_zero());
        assert!(Vec3::new(-1e-9, 1e-9, 0.0).near_zero());

        // A single large component is enough to disqualify the vector.
        assert!(!Vec3::new(1e-9, 1e-9, 1e-4).near_zero());
        assert!(!Vec3::X.near_zero());
    }
}
