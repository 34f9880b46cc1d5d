//! Hit records and the scene aggregate.

use crate::{material::Material, sphere::Sphere, Ray};
use ember_math::{Interval, Vec3};

/// Record of a ray-object intersection.
///
/// Created fresh for each successful intersection test and never stored.
#[derive(Debug, Clone, Copy)]
pub struct HitRecord {
    /// Point of intersection
    pub p: Vec3,
    /// Surface normal at the intersection, unit length, always pointing
    /// against the incoming ray
    pub normal: Vec3,
    /// Material at the intersection point
    pub material: Material,
    /// Parameter t where the intersection occurs
    pub t: f64,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
}

impl HitRecord {
    /// Build a record from the geometric outward normal.
    ///
    /// `outward_normal` must be unit length. The stored normal is flipped
    /// to face the incoming ray; `front_face` records which side was hit.
    pub fn new(ray: &Ray, p: Vec3, outward_normal: Vec3, t: f64, material: Material) -> Self {
        let front_face = ray.direction().dot(outward_normal) < 0.0;
        let normal = if front_face {
            outward_normal
        } else {
            -outward_normal
        };

        Self {
            p,
            normal,
            material,
            t,
            front_face,
        }
    }
}

/// A geometric primitive that rays can intersect.
///
/// The object set is closed, so dispatch is a plain match rather than a
/// trait object.
#[derive(Debug, Clone)]
pub enum Hittable {
    Sphere(Sphere),
}

impl Hittable {
    /// Test the ray against this object within `ray_t`.
    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        match self {
            Hittable::Sphere(sphere) => sphere.hit(ray, ray_t),
        }
    }
}

/// Flat, unordered aggregate of scene objects.
///
/// Populated once at setup and read-only while a render is in flight, so
/// workers can share it without locking.
#[derive(Debug, Default, Clone)]
pub struct World {
    objects: Vec<Hittable>,
}

impl World {
    /// Create a new empty world.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    /// Add an object to the scene.
    pub fn add(&mut self, object: Hittable) {
        self.objects.push(object);
    }

    /// Remove all objects.
    pub fn clear(&mut self) {
        self.objects.clear();
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the world is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Iterate over the objects in insertion order.
    pub fn objects(&self) -> impl Iterator<Item = &Hittable> {
        self.objects.iter()
    }

    /// Return the closest hit along the ray within `ray_t`, if any.
    ///
    /// Every object is tested; the interval's upper bound shrinks to the
    /// closest hit found so far, so insertion order cannot change the
    /// result.
    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        let mut closest: Option<HitRecord> = None;
        let mut closest_so_far = ray_t.max;

        for object in &self.objects {
            if let Some(rec) = object.hit(ray, Interval::new(ray_t.min, closest_so_far)) {
                closest_so_far = rec.t;
                closest = Some(rec);
            }
        }

        closest
    }
}
