use std::ops::{Add, AddAssign};

use glam::Vec3;
use strata_geometry::Ray;

use crate::Axis;

/// Axis-aligned bounding box.
///
/// The default box is empty (`min = +inf`, `max = -inf`), so growing it by
/// anything yields the other operand unchanged.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    min: Vec3,
    max: Vec3,
}

impl BoundingBox {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn empty() -> Self {
        Self::new(
            Vec3::splat(f32::INFINITY),
            Vec3::splat(f32::NEG_INFINITY),
        )
    }

    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        points.into_iter().collect()
    }

    pub fn reset(&mut self) {
        *self = Self::empty();
    }

    pub fn grow(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn min(&self) -> Vec3 {
        self.min
    }

    pub fn max(&self) -> Vec3 {
        self.max
    }

    pub fn extent(&self) -> Vec3 {
        self.max() - self.min()
    }

    pub fn center(&self) -> Vec3 {
        (self.min() + self.max()) * 0.5
    }

    pub fn center_on(&self, axis: Axis) -> f32 {
        (self.min[axis] + self.max[axis]) * 0.5
    }

    /// Returns whether this box contains at least one point.
    pub fn is_set(&self) -> bool {
        self.min.cmple(self.max).all()
    }

    /// Surface area; empty and degenerate boxes yield zero.
    pub fn area(&self) -> f32 {
        if !self.is_set() {
            return 0.0;
        }

        let extent = self.extent();
        let area = 2.0
            * (extent.x * extent.y + extent.y * extent.z + extent.z * extent.x);

        if area.is_finite() {
            area.max(0.0)
        } else {
            0.0
        }
    }

    /// Axis with the greatest extent; ties prefer the lower axis.
    pub fn longest_axis(&self) -> Axis {
        let extent = self.extent();
        let mut axis = Axis::X;

        if extent.y > extent[axis] {
            axis = Axis::Y;
        }

        if extent.z > extent[axis] {
            axis = Axis::Z;
        }

        axis
    }

    /// Returns whether `other` lies completely inside this box; empty boxes
    /// are contained by everything.
    pub fn contains(&self, other: &Self) -> bool {
        !other.is_set()
            || (self.min.cmple(other.min).all()
                && other.max.cmple(self.max).all())
    }

    /// Slab test; returns the entry and exit distances along the ray.
    ///
    /// The entry distance is negative when the ray starts inside the box.
    pub fn intersect(&self, ray: &Ray) -> Option<(f32, f32)> {
        if !self.is_set() {
            return None;
        }

        let hit_min = (self.min - ray.origin()) * ray.inv_direction();
        let hit_max = (self.max - ray.origin()) * ray.inv_direction();

        // A ray parallel to a slab and starting right on its face yields
        // `0 * inf = NaN` there; such a slab doesn't bound the ray at all
        let on_face = hit_min.is_nan_mask() | hit_max.is_nan_mask();

        let t_min = Vec3::select(
            on_face,
            Vec3::splat(f32::NEG_INFINITY),
            hit_min.min(hit_max),
        )
        .max_element();

        let t_max = Vec3::select(
            on_face,
            Vec3::splat(f32::INFINITY),
            hit_min.max(hit_max),
        )
        .min_element();

        if t_max >= t_min && t_max >= 0.0 {
            Some((t_min, t_max))
        } else {
            None
        }
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}

impl Add<Vec3> for BoundingBox {
    type Output = Self;

    fn add(mut self, rhs: Vec3) -> Self::Output {
        self += rhs;
        self
    }
}

impl AddAssign<Vec3> for BoundingBox {
    fn add_assign(&mut self, rhs: Vec3) {
        self.grow(rhs);
    }
}

impl FromIterator<Vec3> for BoundingBox {
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = Vec3>,
    {
        let mut this = Self::default();

        for item in iter {
            this += item;
        }

        this
    }
}

impl Add<Self> for BoundingBox {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self::Output {
        self += rhs;
        self
    }
}

impl AddAssign<Self> for BoundingBox {
    fn add_assign(&mut self, rhs: Self) {
        self.min = self.min.min(rhs.min);
        self.max = self.max.max(rhs.max);
    }
}

impl FromIterator<Self> for BoundingBox {
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = Self>,
    {
        let mut this = Self::default();

        for item in iter {
            this += item;
        }

        this
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::vec3;

    use super::*;

    fn unit() -> BoundingBox {
        BoundingBox::new(Vec3::ZERO, Vec3::ONE)
    }

    #[test]
    fn empty() {
        let target = BoundingBox::default();

        assert!(!target.is_set());
        assert_eq!(0.0, target.area());
        assert_eq!(unit(), target + unit());
        assert_eq!(unit(), unit() + target);
    }

    #[test]
    fn reset() {
        let mut target = unit();

        target.reset();

        assert_eq!(BoundingBox::empty(), target);
    }

    #[test]
    fn grow() {
        let target = BoundingBox::from_points([
            vec3(1.0, -2.0, 3.0),
            vec3(-1.0, 4.0, 0.0),
            vec3(0.0, 0.0, 5.0),
        ]);

        assert_eq!(vec3(-1.0, -2.0, 0.0), target.min());
        assert_eq!(vec3(1.0, 4.0, 5.0), target.max());
        assert_eq!(vec3(2.0, 6.0, 5.0), target.extent());
    }

    #[test]
    fn grow_by_box() {
        let target: BoundingBox = [
            unit(),
            BoundingBox::new(vec3(2.0, 2.0, 2.0), vec3(3.0, 3.0, 3.0)),
            BoundingBox::empty(),
        ]
        .into_iter()
        .collect();

        assert_eq!(BoundingBox::new(Vec3::ZERO, Vec3::splat(3.0)), target);
    }

    #[test]
    fn area() {
        assert_relative_eq!(6.0, unit().area());

        assert_relative_eq!(
            2.0 * (2.0 * 3.0 + 3.0 * 4.0 + 4.0 * 2.0),
            BoundingBox::new(Vec3::ZERO, vec3(2.0, 3.0, 4.0)).area(),
        );

        // Flat box
        assert_relative_eq!(
            2.0,
            BoundingBox::new(Vec3::ZERO, vec3(1.0, 1.0, 0.0)).area(),
        );

        // Single point
        assert_eq!(0.0, BoundingBox::from_points([Vec3::ONE]).area());

        // Unbounded
        assert_eq!(
            0.0,
            BoundingBox::new(
                Vec3::splat(f32::NEG_INFINITY),
                Vec3::splat(f32::INFINITY),
            )
            .area(),
        );
    }

    #[test]
    fn center() {
        let target = BoundingBox::new(vec3(0.0, 2.0, -4.0), vec3(2.0, 4.0, 4.0));

        assert_eq!(vec3(1.0, 3.0, 0.0), target.center());
        assert_eq!(1.0, target.center_on(Axis::X));
        assert_eq!(3.0, target.center_on(Axis::Y));
        assert_eq!(0.0, target.center_on(Axis::Z));
    }

    #[test]
    fn longest_axis() {
        let aabb = |x, y, z| BoundingBox::new(Vec3::ZERO, vec3(x, y, z));

        assert_eq!(Axis::X, aabb(3.0, 2.0, 1.0).longest_axis());
        assert_eq!(Axis::Y, aabb(1.0, 3.0, 2.0).longest_axis());
        assert_eq!(Axis::Z, aabb(1.0, 2.0, 3.0).longest_axis());

        // Ties
        assert_eq!(Axis::X, aabb(1.0, 1.0, 1.0).longest_axis());
        assert_eq!(Axis::Y, aabb(1.0, 2.0, 2.0).longest_axis());
    }

    #[test]
    fn contains() {
        let inner = BoundingBox::new(Vec3::splat(0.25), Vec3::splat(0.75));

        assert!(unit().contains(&inner));
        assert!(unit().contains(&unit()));
        assert!(unit().contains(&BoundingBox::empty()));
        assert!(!inner.contains(&unit()));
    }

    #[test]
    fn intersect() {
        let ray = Ray::new(vec3(-5.0, 0.5, 0.5), vec3(1.0, 0.0, 0.0));
        let (t_min, t_max) = unit().intersect(&ray).unwrap();

        assert_relative_eq!(5.0, t_min);
        assert_relative_eq!(6.0, t_max);
    }

    #[test]
    fn intersect_inside() {
        let ray = Ray::new(Vec3::splat(0.5), vec3(1.0, 0.0, 0.0));
        let (t_min, t_max) = unit().intersect(&ray).unwrap();

        assert!(t_min < 0.0);
        assert_relative_eq!(0.5, t_max);
    }

    #[test]
    fn intersect_miss() {
        let ray = Ray::new(vec3(-5.0, 5.0, 5.0), vec3(1.0, 0.0, 0.0));

        assert_eq!(None, unit().intersect(&ray));
    }

    #[test]
    fn intersect_behind() {
        let ray = Ray::new(vec3(-5.0, 0.5, 0.5), vec3(-1.0, 0.0, 0.0));

        assert_eq!(None, unit().intersect(&ray));
    }

    #[test]
    fn intersect_origin_on_face() {
        let ray = Ray::new(vec3(0.0, 0.25, 10.0), vec3(0.0, 0.0, -1.0));
        let (t_min, t_max) = unit().intersect(&ray).unwrap();

        assert_relative_eq!(9.0, t_min);
        assert_relative_eq!(10.0, t_max);

        let ray = Ray::new(vec3(1.0, 1.0, -3.0), vec3(-0.0, 0.0, 1.0));
        let (t_min, t_max) = unit().intersect(&ray).unwrap();

        assert_relative_eq!(3.0, t_min);
        assert_relative_eq!(4.0, t_max);

        // Flat box, with the ray running inside its plane
        let flat = BoundingBox::new(Vec3::ZERO, vec3(1.0, 1.0, 0.0));
        let ray = Ray::new(vec3(-2.0, 0.5, 0.0), vec3(1.0, 0.0, 0.0));
        let (t_min, t_max) = flat.intersect(&ray).unwrap();

        assert_relative_eq!(2.0, t_min);
        assert_relative_eq!(3.0, t_max);

        let ray = Ray::new(vec3(1.5, 0.0, 10.0), vec3(0.0, 0.0, -1.0));

        assert_eq!(None, unit().intersect(&ray));
    }

    #[test]
    fn intersect_empty() {
        let ray = Ray::new(vec3(-5.0, 0.5, 0.5), vec3(1.0, 1.0, 1.0));

        assert_eq!(None, BoundingBox::empty().intersect(&ray));
    }
}
