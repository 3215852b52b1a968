// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Stand-In Scene
//!
//! In-memory scene graph used as the host for object substitution.
//!
//! Objects live in a slot map with stable, generational keys, so handles held
//! by callers stay valid while other objects are duplicated or deleted. Every
//! object carries an object-local triangle mesh, an 8-corner bounding box
//! derived from it, a pose (position, Euler rotation, scale), a visibility
//! flag, an explicit static-geometry flag and a typed property bag.
//!
//! Two overlap queries are provided: a cheap world-space AABB test and an
//! exact triangle-level test. Neither counts touching surfaces as overlap.

pub mod bounds;
pub mod error;
pub mod intersect;
pub mod keys;
pub mod mesh;
pub mod object;
pub mod properties;
pub mod scene;
pub mod selection;
pub mod serialization;

// Re-export nalgebra types for convenience
pub use nalgebra::{Matrix4, Point3, Vector3};

pub use bounds::{Aabb, BoundingBox};
pub use error::{Error, Result};
pub use intersect::{meshes_intersect, triangles_intersect, MeshIntersection};
pub use keys::ObjectKey;
pub use mesh::TriangleMesh;
pub use object::{Pose, SceneObject};
pub use properties::{merge_properties, Properties, PropertyValue};
pub use scene::Scene;
pub use selection::{PropertyMatch, Selector};
pub use serialization::{ObjectSnapshot, SceneSnapshot, ShapeSnapshot};
