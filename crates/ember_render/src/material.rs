//! Surface scattering models.

use crate::{
    hittable::HitRecord,
    sampling::{random_in_unit_sphere, random_unit_vector},
    Color, Ray,
};
use ember_math::{Vec3, Vec3Ext};
use rand::Rng;

/// How light interacts with a surface.
///
/// The material set is closed (diffuse, fuzzy mirror, glass), so dispatch
/// is a plain match. Materials are small immutable values and are copied
/// into every object that uses them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Material {
    /// Diffuse reflection with the given base color.
    Lambertian { albedo: Color },
    /// Mirror reflection perturbed by `roughness` (0 = polished, 1 = rough).
    Metal { albedo: Color, roughness: f64 },
    /// Glass-like refraction with the given index of refraction.
    Dielectric { refractive_index: f64 },
}

impl Material {
    /// Diffuse material with the given albedo.
    pub fn lambertian(albedo: Color) -> Self {
        Material::Lambertian { albedo }
    }

    /// Reflective material; `roughness` is clamped to [0, 1].
    pub fn metal(albedo: Color, roughness: f64) -> Self {
        Material::Metal {
            albedo,
            roughness: roughness.clamp(0.0, 1.0),
        }
    }

    /// Refractive material (1.0 = air, 1.5 = glass, 2.4 = diamond).
    pub fn dielectric(refractive_index: f64) -> Self {
        Material::Dielectric { refractive_index }
    }

    /// Scatter an incoming ray at a surface hit.
    ///
    /// Returns the attenuation color and the scattered ray, or None if the
    /// ray is absorbed and the path ends with no contribution.
    pub fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut impl Rng,
    ) -> Option<(Color, Ray)> {
        match *self {
            Material::Lambertian { albedo } => {
                let direction = diffuse_direction(rec.normal, random_unit_vector(rng));
                Some((albedo, Ray::new(rec.p, direction)))
            }
            Material::Metal { albedo, roughness } => {
                let reflected = reflect(ray_in.direction().normalize(), rec.normal);
                let direction = reflected + roughness * random_in_unit_sphere(rng);

                // Fuzzing can push the ray below the surface; absorb it there.
                if direction.dot(rec.normal) > 0.0 {
                    Some((albedo, Ray::new(rec.p, direction)))
                } else {
                    None
                }
            }
            Material::Dielectric { refractive_index } => {
                let eta_ratio = if rec.front_face {
                    1.0 / refractive_index
                } else {
                    refractive_index
                };

                let unit_direction = ray_in.direction().normalize();
                let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
                let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

                // Past the critical angle refraction is impossible.
                let cannot_refract = eta_ratio * sin_theta > 1.0;
                let direction =
                    if cannot_refract || reflectance(cos_theta, eta_ratio) > rng.gen::<f64>() {
                        reflect(unit_direction, rec.normal)
                    } else {
                        refract(unit_direction, rec.normal, eta_ratio)
                    };

                // Glass absorbs nothing.
                Some((Color::ONE, Ray::new(rec.p, direction)))
            }
        }
    }
}

/// Diffuse bounce direction: the hemisphere sample `normal + unit vector`,
/// falling back to the normal itself when the sample cancels it.
fn diffuse_direction(normal: Vec3, random_unit: Vec3) -> Vec3 {
    let direction = normal + random_unit;
    if direction.near_zero() {
        normal
    } else {
        direction
    }
}

/// Reflect `v` about the unit normal `n`.
#[inline]
fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract the unit vector `uv` through a surface with unit normal `n`.
#[inline]
fn refract(uv: Vec3, n: Vec3, etai_over_etat: f64) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

/// Schlick's approximation for Fresnel reflectance.
fn reflectance(cosine: f64, eta_ratio: f64) -> f64 {
    let r0 = ((1.0 - eta_ratio) / (1.0 + eta_ratio)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}
