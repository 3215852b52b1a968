// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Exact triangle-mesh overlap.
//!
//! Meshes are treated as closed solids with outward-facing triangles. Two
//! solids overlap when the region they share has volume; surfaces that only
//! touch do not count. The test has three parts:
//!
//! - Crossing triangles, found with the Separating Axis Theorem over both face
//!   normals and the nine edge–edge cross products.
//! - Coplanar triangles facing the same way whose in-plane overlap has area.
//!   Both solids then lie on the same side of the shared face. Coplanar
//!   triangles facing opposite ways are two solids resting face to face.
//! - Containment: when no surfaces meet, a vertex of one mesh strictly inside
//!   the other (parity ray cast) means one solid encloses the other.
//!
//! Triangle pairs go through a per-triangle AABB rejection first.

use nalgebra::{Point3, Vector3};

use crate::bounds::Aabb;
use crate::object::SceneObject;

/// Interval tolerance for the separating-axis projections.
const EPSILON: f64 = 1e-9;

/// Skewed so rays rarely graze edges or vertices of axis-aligned meshes.
const RAY_DIRECTION: [f64; 3] = [0.5711, 0.6213, 0.5365];

/// Result of an exact mesh–mesh test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MeshIntersection {
    /// True if the two solids share volume.
    pub hit: bool,
    /// Triangle pairs that survived the AABB rejection and were SAT-tested.
    pub pairs_tested: usize,
    /// Indices `(a, b)` of the first intersecting triangle pair.
    pub first_hit: Option<(usize, usize)>,
    /// The hit came from one mesh lying inside the other.
    pub contained: bool,
}

type Triangle = [Point3<f64>; 3];

fn face_normal(tri: &Triangle) -> Vector3<f64> {
    (tri[1] - tri[0]).cross(&(tri[2] - tri[0]))
}

fn project(tri: &Triangle, axis: &Vector3<f64>) -> (f64, f64) {
    let d0 = tri[0].coords.dot(axis);
    let d1 = tri[1].coords.dot(axis);
    let d2 = tri[2].coords.dot(axis);
    (d0.min(d1).min(d2), d0.max(d1).max(d2))
}

fn separated_on(a: &Triangle, b: &Triangle, axis: &Vector3<f64>) -> bool {
    let len = axis.norm();
    if len < 1e-12 {
        return false; // degenerate axis carries no information
    }
    let axis = axis / len;
    let (min_a, max_a) = project(a, &axis);
    let (min_b, max_b) = project(b, &axis);
    max_a <= min_b + EPSILON || max_b <= min_a + EPSILON
}

/// `Some(same_facing)` when both triangles lie in one plane.
fn coplanar(a: &Triangle, b: &Triangle) -> Option<bool> {
    let na = face_normal(a);
    let nb = face_normal(b);
    let (la, lb) = (na.norm(), nb.norm());
    if la < 1e-12 || lb < 1e-12 {
        return None;
    }
    let (ua, ub) = (na / la, nb / lb);
    if ua.cross(&ub).norm() > 1e-9 {
        return None;
    }
    let offset = ua.dot(&a[0].coords);
    if b.iter().any(|p| (ua.dot(&p.coords) - offset).abs() > EPSILON) {
        return None;
    }
    Some(ua.dot(&ub) > 0.0)
}

/// In-plane SAT for coplanar triangles: true if the overlap has area.
fn coplanar_overlap(a: &Triangle, b: &Triangle) -> bool {
    let normal = face_normal(a);
    let edges = [
        a[1] - a[0],
        a[2] - a[1],
        a[0] - a[2],
        b[1] - b[0],
        b[2] - b[1],
        b[0] - b[2],
    ];
    !edges.iter().any(|e| separated_on(a, b, &e.cross(&normal)))
}

/// True if the two triangles cross, or are coplanar, face the same way and
/// overlap with positive area.
pub fn triangles_intersect(a: &Triangle, b: &Triangle) -> bool {
    if let Some(same_facing) = coplanar(a, b) {
        return same_facing && coplanar_overlap(a, b);
    }

    let edges_a = [a[1] - a[0], a[2] - a[1], a[0] - a[2]];
    let edges_b = [b[1] - b[0], b[2] - b[1], b[0] - b[2]];

    if separated_on(a, b, &face_normal(a)) || separated_on(a, b, &face_normal(b)) {
        return false;
    }

    for ea in &edges_a {
        for eb in &edges_b {
            if separated_on(a, b, &ea.cross(eb)) {
                return false;
            }
        }
    }

    true
}

/// True if `p` lies on the triangle, within [`EPSILON`].
fn on_triangle(tri: &Triangle, p: &Point3<f64>) -> bool {
    let n = face_normal(tri);
    let len = n.norm();
    if len < 1e-12 || (n.dot(&(p - tri[0])) / len).abs() > EPSILON {
        return false;
    }
    let (v0, v1, v2) = (tri[1] - tri[0], tri[2] - tri[0], p - tri[0]);
    let (d00, d01, d11) = (v0.dot(&v0), v0.dot(&v1), v1.dot(&v1));
    let (d20, d21) = (v2.dot(&v0), v2.dot(&v1));
    let denom = d00 * d11 - d01 * d01;
    let v = (d11 * d20 - d01 * d21) / denom;
    let w = (d00 * d21 - d01 * d20) / denom;
    v >= -EPSILON && w >= -EPSILON && v + w <= 1.0 + EPSILON
}

/// Möller–Trumbore ray-triangle test. Hits at the origin do not count.
fn ray_intersects_triangle(tri: &Triangle, origin: &Point3<f64>, dir: &Vector3<f64>) -> bool {
    let edge1 = tri[1] - tri[0];
    let edge2 = tri[2] - tri[0];

    let h = dir.cross(&edge2);
    let a = edge1.dot(&h);
    if a.abs() < 1e-12 {
        return false; // ray parallel to triangle
    }

    let f = 1.0 / a;
    let s = origin - tri[0];
    let u = f * s.dot(&h);
    if !(0.0..=1.0).contains(&u) {
        return false;
    }

    let q = s.cross(&edge1);
    let v = f * dir.dot(&q);
    if v < 0.0 || u + v > 1.0 {
        return false;
    }

    f * edge2.dot(&q) > EPSILON
}

/// True if `p` is strictly inside the closed mesh. Points on the surface are
/// outside.
fn contains_point(tris: &[Triangle], p: &Point3<f64>) -> bool {
    if tris.iter().any(|t| on_triangle(t, p)) {
        return false;
    }
    let dir = Vector3::from(RAY_DIRECTION);
    let crossings = tris.iter().filter(|t| ray_intersects_triangle(t, p, &dir)).count();
    crossings % 2 == 1
}

/// True if any vertex of `inner` lies strictly inside `outer`.
fn any_vertex_inside(inner: &[Triangle], outer: &[Triangle], outer_box: &Aabb) -> bool {
    inner
        .iter()
        .flatten()
        .filter(|p| outer_box.contains_strict(p))
        .any(|p| contains_point(outer, p))
}

/// Exact overlap test between the world-space meshes of two objects.
pub fn meshes_intersect(a: &SceneObject, b: &SceneObject) -> MeshIntersection {
    let tris_a = a.world_triangles();
    let tris_b = b.world_triangles();
    let boxes_b: Vec<Aabb> = tris_b.iter().map(|t| Aabb::from_points(t)).collect();

    let mut result = MeshIntersection::default();
    for (i, ta) in tris_a.iter().enumerate() {
        let box_a = Aabb::from_points(ta);
        for (j, tb) in tris_b.iter().enumerate() {
            if !box_a.overlaps_inclusive(&boxes_b[j]) {
                continue;
            }
            result.pairs_tested += 1;
            if triangles_intersect(ta, tb) {
                result.hit = true;
                result.first_hit = Some((i, j));
                return result;
            }
        }
    }

    let mesh_box_a = Aabb::from_points(&tris_a.concat());
    let mesh_box_b = Aabb::from_points(&tris_b.concat());
    if mesh_box_a.overlaps(&mesh_box_b)
        && (any_vertex_inside(&tris_a, &tris_b, &mesh_box_b)
            || any_vertex_inside(&tris_b, &tris_a, &mesh_box_a))
    {
        result.hit = true;
        result.contained = true;
    }
    result
}

impl Aabb {
    /// Like [`Aabb::overlaps`] but counts touching boxes as overlapping.
    /// Flat triangles have zero-thickness boxes, so the strict test would
    /// discard axis-aligned pairs that still cross.
    pub fn overlaps_inclusive(&self, other: &Aabb) -> bool {
        (0..3).all(|axis| self.min[axis] <= other.max[axis] && other.min[axis] <= self.max[axis])
    }

    fn contains_strict(&self, p: &Point3<f64>) -> bool {
        (0..3).all(|axis| self.min[axis] < p[axis] && p[axis] < self.max[axis])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tri(p: [[f64; 3]; 3]) -> Triangle {
        p.map(Point3::from)
    }

    #[test]
    fn crossing_triangles_intersect() {
        let a = tri([[-1.0, -1.0, 0.0], [1.0, -1.0, 0.0], [0.0, 1.0, 0.0]]);
        let b = tri([[0.0, 0.0, -1.0], [0.0, 0.0, 1.0], [0.0, 2.0, 0.0]]);
        assert!(triangles_intersect(&a, &b));
        assert!(triangles_intersect(&b, &a));
    }

    #[test]
    fn parallel_triangles_do_not_intersect() {
        let a = tri([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
        let b = tri([[0.0, 0.0, 0.5], [1.0, 0.0, 0.5], [0.0, 1.0, 0.5]]);
        assert!(!triangles_intersect(&a, &b));
    }

    #[test]
    fn coplanar_same_facing_overlap_intersects() {
        let a = tri([[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 2.0, 0.0]]);
        let b = tri([[0.5, 0.5, 0.0], [3.0, 0.5, 0.0], [0.5, 3.0, 0.0]]);
        assert!(triangles_intersect(&a, &b));
        assert!(triangles_intersect(&b, &a));
    }

    #[test]
    fn coplanar_opposite_facing_only_touch() {
        let a = tri([[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 2.0, 0.0]]);
        let flipped = tri([[0.5, 0.5, 0.0], [0.5, 3.0, 0.0], [3.0, 0.5, 0.0]]);
        assert!(!triangles_intersect(&a, &flipped));
    }

    #[test]
    fn coplanar_triangles_sharing_an_edge_only_touch() {
        let a = tri([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
        let b = tri([[1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]]);
        assert!(!triangles_intersect(&a, &b));
    }

    #[test]
    fn tilted_triangle_piercing_plane_intersects() {
        let a = tri([[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 2.0, 0.0]]);
        let b = tri([[0.5, 0.5, -0.1], [3.0, 0.5, 0.3], [0.5, 3.0, 0.3]]);
        assert!(triangles_intersect(&a, &b));
    }

    #[test]
    fn boxes_sharing_a_face_do_not_intersect() {
        let lower = SceneObject::cuboid("Lower", [1.0, 1.0, 1.0]);
        let upper = SceneObject::cuboid("Upper", [1.0, 1.0, 1.0]).with_position([0.0, 0.0, 2.0]);
        assert!(!meshes_intersect(&lower, &upper).hit);
    }

    #[test]
    fn side_by_side_boxes_do_not_intersect() {
        let left = SceneObject::cuboid("Left", [0.5; 3]).with_position([0.0, 0.0, 0.5]);
        let right = SceneObject::cuboid("Right", [0.5; 3]).with_position([1.0, 0.0, 0.5]);
        assert!(!meshes_intersect(&left, &right).hit);
    }

    #[test]
    fn overlapping_boxes_intersect() {
        let a = SceneObject::cuboid("A", [1.0, 1.0, 1.0]);
        let b = SceneObject::cuboid("B", [1.0, 1.0, 1.0]).with_position([1.5, 0.3, 0.2]);
        let result = meshes_intersect(&a, &b);
        assert!(result.hit);
        assert!(result.first_hit.is_some());
        assert!(result.pairs_tested >= 1);
    }

    #[test]
    fn same_height_boxes_overlapping_on_a_floor_intersect() {
        // Shared top, bottom, front and back planes; no triangles cross.
        let cabinet = SceneObject::cuboid("Cabinet", [0.5; 3]).with_position([0.5, 0.0, 0.5]);
        let stool = SceneObject::cuboid("Stool", [0.5; 3]).with_position([0.0, 0.0, 0.5]);
        let result = meshes_intersect(&cabinet, &stool);
        assert!(result.hit);
        assert!(!result.contained);
    }

    #[test]
    fn coincident_boxes_intersect() {
        let a = SceneObject::cuboid("A", [0.4; 3]);
        let b = SceneObject::cuboid("B", [0.4; 3]);
        assert!(meshes_intersect(&a, &b).hit);
    }

    #[test]
    fn rotated_box_clears_corner_gap() {
        // Axis-aligned bounds overlap, but the rotated diamond does not reach the cube.
        let cube = SceneObject::cuboid("Cube", [1.0, 1.0, 1.0]);
        let diamond = SceneObject::cuboid("Diamond", [0.5, 0.5, 0.5])
            .with_position([1.4, 1.4, 0.0])
            .with_rotation([0.0, 0.0, std::f64::consts::FRAC_PI_4]);

        assert!(cube.world_aabb().overlaps(&diamond.world_aabb()));
        assert!(!meshes_intersect(&cube, &diamond).hit);
    }

    #[test]
    fn enclosed_mesh_intersects() {
        let wardrobe = SceneObject::cuboid("Wardrobe", [1.0; 3]);
        let stool = SceneObject::cuboid("Stool", [0.15; 3]).with_position([0.2, -0.3, 0.1]);

        let inside = meshes_intersect(&wardrobe, &stool);
        assert!(inside.hit);
        assert!(inside.contained);
        assert_eq!(inside.first_hit, None);
        assert!(meshes_intersect(&stool, &wardrobe).contained);
    }

    #[test]
    fn point_containment_excludes_surface() {
        let cube = SceneObject::cuboid("Cube", [1.0; 3]).world_triangles();
        assert!(contains_point(&cube, &Point3::new(0.2, 0.1, -0.3)));
        assert!(!contains_point(&cube, &Point3::new(1.0, 0.0, 0.0)));
        assert!(!contains_point(&cube, &Point3::new(1.0, 1.0, 1.0)));
        assert!(!contains_point(&cube, &Point3::new(2.0, 0.0, 0.0)));
    }
}
