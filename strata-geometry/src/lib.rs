//! Rays, hits and primitives consumed by Strata's BVH.

#![allow(clippy::manual_range_contains)]

mod hit;
mod ray;
mod sphere;
mod triangle;

pub use self::hit::*;
pub use self::ray::*;
pub use self::sphere::*;
pub use self::triangle::*;

pub mod prelude {
    pub use glam::*;

    pub use crate::*;
}
