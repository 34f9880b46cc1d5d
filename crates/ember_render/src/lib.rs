//! ember render core - CPU Monte Carlo path tracing.
//!
//! Scenes are flat lists of spheres carrying diffuse, metal or glass
//! materials. Radiance is estimated by recursive path tracing, and a
//! band-partitioned multi-threaded scheduler writes finished pixels into
//! a shared RGBA8 buffer that a display layer can snapshot while the
//! render is still in flight.

mod ray;
mod color;
mod sampling;
mod hittable;
mod material;
mod sphere;
mod camera;
mod integrator;
mod scene;
mod session;

pub use ray::Ray;
pub use color::{convert_channel, to_rgba8, Color};
pub use hittable::{HitRecord, Hittable, World};
pub use material::Material;
pub use sphere::Sphere;
pub use camera::{Camera, CameraConfig};
pub use integrator::{ray_color, sky_color};
pub use scene::{init_scene, scene_with_rng};
pub use session::{
    start_render, Framebuffer, RenderHandle, RenderSession, RenderSettings, SessionError,
};
pub use sampling::{random_in_unit_disk, random_in_unit_sphere, random_unit_vector};

/// Re-export the math types.
pub use ember_math::{Interval, Vec3, Vec3Ext};
