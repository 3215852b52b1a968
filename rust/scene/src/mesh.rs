// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Object-local triangle meshes.

use nalgebra::{Matrix4, Point3};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Indexed triangle mesh in object-local coordinates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriangleMesh {
    pub positions: Vec<[f64; 3]>,
    pub indices: Vec<[u32; 3]>,
}

impl TriangleMesh {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mesh from raw positions and triangle indices, checking that
    /// every index refers to an existing position.
    pub fn from_parts(
        name: &str,
        positions: Vec<[f64; 3]>,
        indices: Vec<[u32; 3]>,
    ) -> Result<Self> {
        let count = positions.len();
        if let Some(bad) = indices
            .iter()
            .flat_map(|tri| tri.iter())
            .find(|&&i| i as usize >= count)
        {
            return Err(Error::InvalidMesh {
                name: name.to_string(),
                reason: format!("index {bad} out of range for {count} positions"),
            });
        }
        Ok(Self { positions, indices })
    }

    /// Axis-aligned cuboid centered at the origin.
    pub fn cuboid(half_extents: [f64; 3]) -> Self {
        let [hx, hy, hz] = half_extents;
        Self::box_between([-hx, -hy, -hz], [hx, hy, hz])
    }

    /// Axis-aligned box spanning `min`..`max` (12 triangles).
    pub fn box_between(min: [f64; 3], max: [f64; 3]) -> Self {
        let positions = vec![
            [min[0], min[1], min[2]],
            [max[0], min[1], min[2]],
            [max[0], max[1], min[2]],
            [min[0], max[1], min[2]],
            [min[0], min[1], max[2]],
            [max[0], min[1], max[2]],
            [max[0], max[1], max[2]],
            [min[0], max[1], max[2]],
        ];
        let indices = vec![
            [0, 2, 1], [0, 3, 2], // bottom
            [4, 5, 6], [4, 6, 7], // top
            [0, 1, 5], [0, 5, 4], // front
            [2, 3, 7], [2, 7, 6], // back
            [0, 4, 7], [0, 7, 3], // left
            [1, 2, 6], [1, 6, 5], // right
        ];
        Self { positions, indices }
    }

    /// Returns the number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Returns the number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    /// Returns `true` if the mesh has no triangles.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Local-space extents as `(min, max)`, or `None` for a mesh without
    /// positions.
    pub fn extents(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = self.positions.first()?;
        let mut min = Point3::from(*first);
        let mut max = min;
        for p in &self.positions[1..] {
            for axis in 0..3 {
                min[axis] = min[axis].min(p[axis]);
                max[axis] = max[axis].max(p[axis]);
            }
        }
        Some((min, max))
    }

    /// Triangles transformed by `matrix` into world space. Mirroring
    /// transforms have their winding reversed so faces keep pointing out.
    pub fn world_triangles(&self, matrix: &Matrix4<f64>) -> Vec<[Point3<f64>; 3]> {
        let world: Vec<Point3<f64>> = self
            .positions
            .iter()
            .map(|p| matrix.transform_point(&Point3::from(*p)))
            .collect();
        let mirrored = matrix.fixed_view::<3, 3>(0, 0).determinant() < 0.0;

        self.indices
            .iter()
            .map(|&[a, b, c]| {
                let (b, c) = if mirrored { (c, b) } else { (b, c) };
                [world[a as usize], world[b as usize], world[c as usize]]
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cuboid_has_twelve_triangles() {
        let mesh = TriangleMesh::cuboid([0.5, 1.0, 2.0]);
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.triangle_count(), 12);

        let (min, max) = mesh.extents().unwrap();
        assert_eq!(min, Point3::new(-0.5, -1.0, -2.0));
        assert_eq!(max, Point3::new(0.5, 1.0, 2.0));
    }

    #[test]
    fn empty_mesh_has_no_extents() {
        assert!(TriangleMesh::new().extents().is_none());
        assert!(TriangleMesh::new().is_empty());
    }

    #[test]
    fn from_parts_rejects_out_of_range_index() {
        let err = TriangleMesh::from_parts(
            "Tri",
            vec![[0.0; 3], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            vec![[0, 1, 3]],
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidMesh { .. }));
    }

    #[test]
    fn world_triangles_apply_translation() {
        let mesh = TriangleMesh::cuboid([1.0, 1.0, 1.0]);
        let m = Matrix4::new_translation(&nalgebra::Vector3::new(10.0, 0.0, 0.0));
        let tris = mesh.world_triangles(&m);
        assert_eq!(tris.len(), 12);
        assert!(tris.iter().flatten().all(|p| p.x >= 9.0 && p.x <= 11.0));
    }

    #[test]
    fn mirroring_keeps_faces_pointing_out() {
        let mesh = TriangleMesh::cuboid([1.0, 1.0, 1.0]);
        let mirror = Matrix4::new_nonuniform_scaling(&nalgebra::Vector3::new(-1.0, 1.0, 1.0));
        for tri in mesh.world_triangles(&mirror) {
            let normal = (tri[1] - tri[0]).cross(&(tri[2] - tri[0]));
            let centroid = (tri[0].coords + tri[1].coords + tri[2].coords) / 3.0;
            assert!(normal.dot(&centroid) > 0.0);
        }
    }
}
