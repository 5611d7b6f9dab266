use bytemuck::{Pod, Zeroable};
use glam::{vec2, Vec3};

use crate::{Hit, Ray};

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Triangle {
    pub positions: [Vec3; 3],
}

impl Triangle {
    pub fn new(p0: Vec3, p1: Vec3, p2: Vec3) -> Self {
        Self {
            positions: [p0, p1, p2],
        }
    }

    pub fn positions(&self) -> [Vec3; 3] {
        self.positions
    }

    pub fn position0(&self) -> Vec3 {
        self.positions[0]
    }

    pub fn position1(&self) -> Vec3 {
        self.positions[1]
    }

    pub fn position2(&self) -> Vec3 {
        self.positions[2]
    }

    pub fn center(&self) -> Vec3 {
        self.positions.into_iter().sum::<Vec3>() / 3.0
    }

    /// Geometric normal, following the winding order.
    pub fn normal(&self) -> Vec3 {
        let v0v1 = self.position1() - self.position0();
        let v0v2 = self.position2() - self.position0();

        v0v1.cross(v0v2).normalize_or_zero()
    }

    /// Möller-Trumbore intersection.
    pub fn hit(&self, ray: Ray, hit: &mut Hit) -> bool {
        let v0v1 = self.position1() - self.position0();
        let v0v2 = self.position2() - self.position0();

        // ---

        let pvec = ray.direction().cross(v0v2);
        let det = v0v1.dot(pvec);

        if det.abs() < f32::EPSILON {
            return false;
        }

        // ---

        let inv_det = 1.0 / det;
        let tvec = ray.origin() - self.position0();
        let u = tvec.dot(pvec) * inv_det;
        let qvec = tvec.cross(v0v1);
        let v = ray.direction().dot(qvec) * inv_det;
        let distance = v0v2.dot(qvec) * inv_det;

        if (u < 0.0)
            | (u > 1.0)
            | (v < 0.0)
            | (u + v > 1.0)
            | (distance <= 0.0)
            | (distance >= hit.distance)
        {
            return false;
        }

        hit.distance = distance;
        hit.point = ray.at(distance);
        hit.normal = self.normal();
        hit.uv = vec2(u, v);

        true
    }
}
