use glam::{Vec2, Vec3};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    /// Distance to the nearest intersection found so far; primitives must
    /// only report hits strictly closer than this.
    pub distance: f32,
    pub point: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
    pub primitive_id: Option<PrimitiveId>,
}

impl Hit {
    pub fn none() -> Self {
        Self {
            distance: f32::INFINITY,
            point: Vec3::ZERO,
            normal: Vec3::ZERO,
            uv: Vec2::ZERO,
            primitive_id: None,
        }
    }

    /// Creates an empty hit that only accepts intersections closer than
    /// `distance`, e.g. for shadow rays towards a light.
    pub fn within(distance: f32) -> Self {
        Self {
            distance,
            ..Self::none()
        }
    }

    pub fn is_some(&self) -> bool {
        self.primitive_id.is_some()
    }

    pub fn is_none(&self) -> bool {
        !self.is_some()
    }
}

impl Default for Hit {
    fn default() -> Self {
        Self::none()
    }
}

/// Index of a primitive inside the slice a BVH was built from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrimitiveId(u32);

impl PrimitiveId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}
