use glam::{vec2, Vec3};

use crate::{Hit, Ray};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    pub fn hit(&self, ray: Ray, hit: &mut Hit) -> bool {
        let oc = ray.origin() - self.center;
        let a = ray.direction().length_squared();
        let b = oc.dot(ray.direction());
        let c = oc.length_squared() - self.radius * self.radius;
        let discriminant = b * b - a * c;

        if a == 0.0 || discriminant < 0.0 {
            return false;
        }

        let sqrt_d = discriminant.sqrt();

        // Prefer the entry point; fall back to the exit point when the ray
        // starts inside the sphere
        let distance = [(-b - sqrt_d) / a, (-b + sqrt_d) / a]
            .into_iter()
            .find(|&distance| distance > 0.0);

        let Some(distance) = distance else {
            return false;
        };

        if distance >= hit.distance {
            return false;
        }

        let point = ray.at(distance);
        let normal = (point - self.center) / self.radius;

        hit.distance = distance;
        hit.point = point;
        hit.normal = normal;
        hit.uv = vec2(
            0.5 + normal.z.atan2(normal.x) / core::f32::consts::TAU,
            0.5 - normal.y.clamp(-1.0, 1.0).asin() / core::f32::consts::PI,
        );

        true
    }
}
