// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bounding volumes: the object-local 8-corner box and world-space AABBs.

use nalgebra::{Matrix4, Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Object-local bounding box stored as 8 corners.
///
/// Corner order is fixed:
///
/// | index | corner     |
/// |-------|------------|
/// | 0     | (-x,-y,-z) |
/// | 1     | (-x,-y,+z) |
/// | 2     | (-x,+y,+z) |
/// | 3     | (-x,+y,-z) |
/// | 4     | (+x,-y,-z) |
/// | 5     | (+x,-y,+z) |
/// | 6     | (+x,+y,+z) |
/// | 7     | (+x,+y,-z) |
///
/// so the edges 0–1 (z), 0–3 (y) and 0–4 (x) are mutually orthogonal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub corners: [[f64; 3]; 8],
}

impl BoundingBox {
    /// Builds the box spanning `min`..`max`.
    pub fn from_extents(min: Point3<f64>, max: Point3<f64>) -> Self {
        let (a, b) = (min, max);
        Self {
            corners: [
                [a.x, a.y, a.z],
                [a.x, a.y, b.z],
                [a.x, b.y, b.z],
                [a.x, b.y, a.z],
                [b.x, a.y, a.z],
                [b.x, a.y, b.z],
                [b.x, b.y, b.z],
                [b.x, b.y, a.z],
            ],
        }
    }

    /// A box collapsed onto the origin.
    pub fn zero() -> Self {
        Self {
            corners: [[0.0; 3]; 8],
        }
    }

    /// Returns corner `i` as a point.
    pub fn corner(&self, i: usize) -> Point3<f64> {
        Point3::from(self.corners[i])
    }

    /// Returns all corners as points.
    pub fn points(&self) -> [Point3<f64>; 8] {
        self.corners.map(Point3::from)
    }

    /// Returns the box with every corner multiplied componentwise by `scale`.
    pub fn scaled(&self, scale: &Vector3<f64>) -> Self {
        Self {
            corners: self
                .corners
                .map(|[x, y, z]| [x * scale.x, y * scale.y, z * scale.z]),
        }
    }

    /// World-space AABB enclosing this box after applying `matrix`.
    pub fn world_aabb(&self, matrix: &Matrix4<f64>) -> Aabb {
        let transformed = self.points().map(|p| matrix.transform_point(&p));
        Aabb::from_points(&transformed)
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::zero()
    }
}

/// World-space axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl Aabb {
    /// Creates an AABB from `min`/`max` corners.
    pub fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
        Self { min, max }
    }

    /// Smallest AABB containing every point. An empty slice yields an
    /// inverted box that overlaps nothing.
    pub fn from_points(points: &[Point3<f64>]) -> Self {
        let mut min = Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY);
        let mut max = Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in points {
            for axis in 0..3 {
                min[axis] = min[axis].min(p[axis]);
                max[axis] = max[axis].max(p[axis]);
            }
        }
        Self { min, max }
    }

    /// True if the interiors overlap. Boxes that only touch (shared face,
    /// edge or corner) do not overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        (0..3).all(|axis| self.min[axis] < other.max[axis] && other.min[axis] < self.max[axis])
    }

    /// Size along each axis.
    pub fn size(&self) -> Vector3<f64> {
        self.max - self.min
    }

    /// Center point.
    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }
}
