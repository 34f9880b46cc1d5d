//! Recursive radiance estimation.

use crate::{Color, Ray, World};
use ember_math::Interval;
use rand::Rng;

/// Hits closer than this are ignored so a bounced ray does not re-hit the
/// surface it just left ("shadow acne").
const T_MIN: f64 = 0.001;

/// Estimate the radiance arriving along `ray`.
///
/// One Monte Carlo path: intersect, scatter, recurse, attenuate. A path
/// ends on a miss (sky), on absorption, or when `depth` runs out; the
/// depth cutoff returns black, trading a little energy for a hard bound
/// on recursion.
pub fn ray_color(ray: &Ray, world: &World, depth: u32, rng: &mut impl Rng) -> Color {
    if depth == 0 {
        return Color::ZERO;
    }

    if let Some(rec) = world.hit(ray, Interval::new(T_MIN, f64::INFINITY)) {
        return match rec.material.scatter(ray, &rec, rng) {
            Some((attenuation, scattered)) => {
                attenuation * ray_color(&scattered, world, depth - 1, rng)
            }
            None => Color::ZERO,
        };
    }

    sky_color(ray)
}

/// Vertical white-to-blue gradient seen by rays that escape the scene.
pub fn sky_color(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize();
    let t = 0.5 * (unit_direction.y + 1.0);
    (1.0 - t) * Color::ONE + t * Color::new(0.5, 0.7, 1.0)
}
