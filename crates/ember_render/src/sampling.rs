//! Random direction sampling shared by the materials, the camera lens and
//! the scene builder.

use ember_math::Vec3;
use rand::Rng;

/// Random point inside the unit sphere (rejection sampled).
pub fn random_in_unit_sphere(rng: &mut impl Rng) -> Vec3 {
    loop {
        let p = random_range(rng, -1.0, 1.0);
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Random unit-length direction, uniform over the sphere.
pub fn random_unit_vector(rng: &mut impl Rng) -> Vec3 {
    loop {
        let p = random_range(rng, -1.0, 1.0);
        let len_sq = p.length_squared();
        // Reject points so close to the center that normalizing them
        // amplifies floating-point noise.
        if len_sq > 1e-6 && len_sq <= 1.0 {
            return p / len_sq.sqrt();
        }
    }
}

/// Random point inside the unit disk in the xy plane.
pub fn random_in_unit_disk(rng: &mut impl Rng) -> Vec3 {
    loop {
        let p = Vec3::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0), 0.0);
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Vector with each component drawn uniformly from [0, 1).
pub fn random_vec3(rng: &mut impl Rng) -> Vec3 {
    Vec3::new(rng.gen(), rng.gen(), rng.gen())
}

/// Vector with each component drawn uniformly from [min, max).
pub fn random_range(rng: &mut impl Rng, min: f64, max: f64) -> Vec3 {
    Vec3::new(
        rng.gen_range(min..max),
        rng.gen_range(min..max),
        rng.gen_range(min..max),
    )
}
