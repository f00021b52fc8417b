//! Geometric primitives for visibility testing
//!
//! Bounding volumes and the frustum containment predicates used by the scene
//! visibility queries.

mod bounds;
mod frustum;

pub use bounds::{Aabb, BoundingSphere, BoundingVolume};
pub use frustum::{Frustum, Plane};
