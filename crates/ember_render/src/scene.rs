//! Preset scene construction.

use crate::{sampling, Color, Hittable, Material, Sphere, World};
use ember_math::Vec3;
use rand::Rng;

/// Build the preset cover scene: a huge ground sphere, a grid of
/// `(2 * spread)^2` cells of small randomized spheres, and three large
/// signature spheres.
///
/// The structure is deterministic; placement and materials draw from the
/// process-wide RNG, so two runs produce different layouts.
pub fn init_scene(spread: i32) -> World {
    scene_with_rng(spread, &mut rand::thread_rng())
}

/// As [`init_scene`], with an explicit random source.
pub fn scene_with_rng(spread: i32, rng: &mut impl Rng) -> World {
    let mut world = World::new();

    // Ground
    world.add(Hittable::Sphere(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        Material::lambertian(Color::splat(0.5)),
    )));

    for a in -spread..spread {
        for b in -spread..spread {
            let center = Vec3::new(
                a as f64 + 0.9 * rng.gen::<f64>(),
                0.2,
                b as f64 + 0.9 * rng.gen::<f64>(),
            );

            // Keep the area around the big metal sphere clear.
            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let choose_mat: f64 = rng.gen();
            let material = if choose_mat < 0.8 {
                // Diffuse
                let albedo = sampling::random_vec3(rng) * sampling::random_vec3(rng);
                Material::lambertian(albedo)
            } else if choose_mat < 0.95 {
                // Metal
                let albedo = sampling::random_range(rng, 0.5, 1.0);
                let roughness = rng.gen_range(0.0..0.5);
                Material::metal(albedo, roughness)
            } else {
                // Glass
                Material::dielectric(1.5)
            };

            world.add(Hittable::Sphere(Sphere::new(center, 0.2, material)));
        }
    }

    world.add(Hittable::Sphere(Sphere::new(
        Vec3::new(0.0, 1.0, 0.0),
        1.0,
        Material::dielectric(1.5),
    )));
    world.add(Hittable::Sphere(Sphere::new(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        Material::lambertian(Color::new(0.4, 0.2, 0.1)),
    )));
    world.add(Hittable::Sphere(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Material::metal(Color::new(0.7, 0.6, 0.5), 0.0),
    )));

    log::info!("scene built: {} objects (spread {})", world.len(), spread);

    world
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_zero_spread_has_only_fixed_spheres() {
        let mut rng = StdRng::seed_from_u64(5);
        let world = scene_with_rng(0, &mut rng);

        // Ground plus the three signature spheres.
        assert_eq!(world.len(), 4);
    }

    #[test]
    fn test_ground_sphere_comes_first() {
        let mut rng = StdRng::seed_from_u64(6);
        let world = scene_with_rng(1, &mut rng);

        let Some(Hittable::Sphere(ground)) = world.objects().next() else {
            panic!("world is empty");
        };
        assert_eq!(ground.radius(), 1000.0);
        assert_eq!(ground.center(), Vec3::new(0.0, -1000.0, 0.0));
    }

    #[test]
    fn test_small_spheres_sit_on_the_ground() {
        let mut rng = StdRng::seed_from_u64(7);
        let world = scene_with_rng(3, &mut rng);

        // At most 4 fixed + 36 grid spheres; the clear zone may drop some.
        assert!(world.len() <= 4 + 36);
        assert!(world.len() > 4);

        for object in world.objects().skip(1) {
            let Hittable::Sphere(sphere) = object;
            if sphere.radius() == 0.2 {
                assert_eq!(sphere.center().y, 0.2);
                assert!((sphere.center() - Vec3::new(4.0, 0.2, 0.0)).length() > 0.9);
            }
        }
    }
}
