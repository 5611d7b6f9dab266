use glam::Vec3;
use strata_geometry::{Hit, Ray, Sphere, Triangle};

use crate::BoundingBox;

/// Something a BVH can be built over.
pub trait BvhPrimitive {
    fn bounds(&self) -> BoundingBox;

    /// Point used to decide on which side of a splitting plane this primitive
    /// lands.
    fn center(&self) -> Vec3 {
        self.bounds().center()
    }

    /// Intersects the ray with this primitive.
    ///
    /// Implementations must report hits only when they are strictly closer
    /// than `hit.distance`, updating `hit` when they do - traversal relies on
    /// this to skip subtrees that cannot contain anything closer.
    fn hit(&self, ray: Ray, hit: &mut Hit) -> bool;
}

impl BvhPrimitive for Triangle {
    fn bounds(&self) -> BoundingBox {
        self.positions().into_iter().collect()
    }

    fn center(&self) -> Vec3 {
        Triangle::center(self)
    }

    fn hit(&self, ray: Ray, hit: &mut Hit) -> bool {
        Triangle::hit(self, ray, hit)
    }
}

impl BvhPrimitive for Sphere {
    fn bounds(&self) -> BoundingBox {
        let radius = Vec3::splat(self.radius.abs());

        BoundingBox::new(self.center - radius, self.center + radius)
    }

    fn center(&self) -> Vec3 {
        self.center
    }

    fn hit(&self, ray: Ray, hit: &mut Hit) -> bool {
        Sphere::hit(self, ray, hit)
    }
}

impl<T> BvhPrimitive for &T
where
    T: BvhPrimitive,
{
    fn bounds(&self) -> BoundingBox {
        T::bounds(self)
    }

    fn center(&self) -> Vec3 {
        T::center(self)
    }

    fn hit(&self, ray: Ray, hit: &mut Hit) -> bool {
        T::hit(self, ray, hit)
    }
}

#[cfg(test)]
mod tests {
    use glam::vec3;

    use super::*;

    #[test]
    fn triangle() {
        let target = Triangle::new(
            vec3(0.0, 0.0, 0.0),
            vec3(3.0, 0.0, 1.0),
            vec3(0.0, 3.0, 2.0),
        );

        assert_eq!(
            BoundingBox::new(Vec3::ZERO, vec3(3.0, 3.0, 2.0)),
            BvhPrimitive::bounds(&target),
        );

        assert_eq!(vec3(1.0, 1.0, 1.0), BvhPrimitive::center(&target));
    }

    #[test]
    fn sphere() {
        let target = Sphere::new(vec3(1.0, 2.0, 3.0), 0.5);

        assert_eq!(
            BoundingBox::new(vec3(0.5, 1.5, 2.5), vec3(1.5, 2.5, 3.5)),
            BvhPrimitive::bounds(&target),
        );
    }
}
