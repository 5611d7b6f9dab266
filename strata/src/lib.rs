//! Bounding volume hierarchy for ray tracing static triangle meshes.
//!
//! ```
//! use strata::prelude::*;
//!
//! let triangles = [Triangle::new(
//!     vec3(0.0, 0.0, 0.0),
//!     vec3(1.0, 0.0, 0.0),
//!     vec3(0.0, 1.0, 0.0),
//! )];
//!
//! let bvh = Bvh::build(&triangles);
//! let ray = Ray::new(vec3(0.25, 0.25, 10.0), vec3(0.0, 0.0, -1.0));
//! let mut hit = Hit::none();
//!
//! assert!(bvh.trace_nearest(&triangles, ray, &mut hit));
//! assert_eq!(10.0, hit.distance);
//! ```

mod bvh;
mod utils;

pub use strata_geometry::*;

pub use self::bvh::*;
pub use self::utils::*;

pub mod prelude {
    pub use strata_geometry::prelude::*;

    pub use crate::{
        BoundingBox, Bvh, BvhConfig, BvhPrimitive, SplitStrategy,
        TracingMode,
    };
}
