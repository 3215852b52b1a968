// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scene objects and their poses.

use nalgebra::{Matrix4, Point3, Rotation3, Vector3};
use serde::{Deserialize, Serialize};

use crate::bounds::{Aabb, BoundingBox};
use crate::mesh::TriangleMesh;
use crate::properties::{Properties, PropertyValue};

/// Position, orientation and scale of an object.
///
/// `rotation` holds XYZ Euler angles in radians; the combined rotation is
/// `Rz * Ry * Rx`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pose {
    pub position: [f64; 3],
    pub rotation: [f64; 3],
    pub scale: [f64; 3],
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            rotation: [0.0; 3],
            scale: [1.0; 3],
        }
    }
}

impl Pose {
    pub fn position_vector(&self) -> Vector3<f64> {
        Vector3::from(self.position)
    }

    pub fn scale_vector(&self) -> Vector3<f64> {
        Vector3::from(self.scale)
    }

    /// Rotation matrix for the Euler angles.
    pub fn rotation_matrix(&self) -> Rotation3<f64> {
        let [rx, ry, rz] = self.rotation;
        Rotation3::from_euler_angles(rx, ry, rz)
    }

    /// Builds the TRS model matrix (`T * R * S`).
    pub fn matrix(&self) -> Matrix4<f64> {
        Matrix4::new_translation(&self.position_vector())
            * self.rotation_matrix().to_homogeneous()
            * Matrix4::new_nonuniform_scaling(&self.scale_vector())
    }
}

/// Complete data for one scene object.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    /// Human-readable label, used in diagnostics and selection.
    pub name: String,
    pub pose: Pose,
    /// Object-local geometry used by the exact overlap test.
    pub mesh: TriangleMesh,
    /// Object-local, unscaled bounding box derived from `mesh`.
    pub bounding_box: BoundingBox,
    /// Whether the object participates in rendering.
    pub visible: bool,
    /// Ground/floor geometry that placement checks ignore.
    pub is_static: bool,
    /// Arbitrary string tags (e.g. "furniture", "template").
    pub tags: Vec<String>,
    pub properties: Properties,
}

impl SceneObject {
    /// Creates a visible, non-static object at the origin with the bounding
    /// box computed from `mesh`.
    pub fn new(name: impl Into<String>, mesh: TriangleMesh) -> Self {
        let bounding_box = mesh
            .extents()
            .map(|(min, max)| BoundingBox::from_extents(min, max))
            .unwrap_or_default();
        Self {
            name: name.into(),
            pose: Pose::default(),
            mesh,
            bounding_box,
            visible: true,
            is_static: false,
            tags: Vec::new(),
            properties: Properties::new(),
        }
    }

    /// Convenience: an axis-aligned cuboid with the given half extents.
    pub fn cuboid(name: impl Into<String>, half_extents: [f64; 3]) -> Self {
        Self::new(name, TriangleMesh::cuboid(half_extents))
    }

    pub fn with_position(mut self, position: [f64; 3]) -> Self {
        self.pose.position = position;
        self
    }

    pub fn with_rotation(mut self, rotation: [f64; 3]) -> Self {
        self.pose.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: [f64; 3]) -> Self {
        self.pose.scale = scale;
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn with_property(
        mut self,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Marks the object as static ground geometry.
    pub fn as_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Returns true if the object carries the given tag.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Object-to-world matrix.
    pub fn world_matrix(&self) -> Matrix4<f64> {
        self.pose.matrix()
    }

    /// World-space AABB of the bounding box under the current pose.
    pub fn world_aabb(&self) -> Aabb {
        self.bounding_box.world_aabb(&self.world_matrix())
    }

    /// Mesh triangles in world space under the current pose.
    pub fn world_triangles(&self) -> Vec<[Point3<f64>; 3]> {
        self.mesh.world_triangles(&self.world_matrix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn bounding_box_follows_mesh() {
        let obj = SceneObject::cuboid("Table", [1.0, 0.5, 0.4]);
        assert_eq!(obj.bounding_box.corner(0), Point3::new(-1.0, -0.5, -0.4));
        assert_eq!(obj.bounding_box.corner(6), Point3::new(1.0, 0.5, 0.4));
    }

    #[test]
    fn empty_mesh_gets_zero_box() {
        let obj = SceneObject::new("Empty", TriangleMesh::new());
        assert_eq!(obj.bounding_box, BoundingBox::zero());
    }

    #[test]
    fn world_aabb_uses_pose() {
        let obj = SceneObject::cuboid("Shelf", [1.0, 1.0, 1.0])
            .with_position([5.0, 0.0, 0.0])
            .with_scale([2.0, 1.0, 1.0]);
        let aabb = obj.world_aabb();

        assert_relative_eq!(aabb.min.x, 3.0);
        assert_relative_eq!(aabb.max.x, 7.0);
        assert_relative_eq!(aabb.max.y, 1.0);
    }

    #[test]
    fn matrix_applies_scale_before_rotation() {
        let pose = Pose {
            position: [0.0; 3],
            rotation: [0.0, 0.0, FRAC_PI_2],
            scale: [2.0, 1.0, 1.0],
        };
        let p = pose.matrix().transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p, Point3::new(0.0, 2.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn builder_sets_flags() {
        let obj = SceneObject::cuboid("Floor", [10.0, 10.0, 0.1])
            .as_static()
            .hidden()
            .with_tag("ground")
            .with_property("category_id", 1i64);

        assert!(obj.is_static);
        assert!(!obj.visible);
        assert!(obj.has_tag("ground"));
        assert_eq!(obj.properties.get("category_id"), Some(&PropertyValue::Int(1)));
    }
}
