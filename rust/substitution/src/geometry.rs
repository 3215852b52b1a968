// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Distance and bounding-box side ratios.

use std::fmt;

use nalgebra::{Point3, Vector3};
use standin_scene::BoundingBox;

use crate::error::{Error, Result};

/// Corner pairs whose edge lengths drive the scale ratio, in output order.
///
/// With the fixed corner order these are the y, x and z edges, so the first
/// ratio component comes from the y extent. The pairing is a rough,
/// non-axis-aligned approximation and is kept as is.
pub const RATIO_EDGES: [(usize, usize); 3] = [(0, 3), (0, 4), (0, 1)];

/// Scale axis of a ratio component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        })
    }
}

/// Euclidean distance between two points.
pub fn distance(p1: &Point3<f64>, p2: &Point3<f64>) -> f64 {
    (p1 - p2).norm()
}

/// Per-axis side-length ratios `bb1 / bb2` over [`RATIO_EDGES`].
///
/// A zero-length edge in `bb2` yields a non-finite component (`inf`, or
/// `NaN` when both edges are zero).
pub fn bounding_box_ratios(bb1: &BoundingBox, bb2: &BoundingBox) -> Vector3<f64> {
    let ratio = |(i, j): (usize, usize)| {
        distance(&bb1.corner(i), &bb1.corner(j)) / distance(&bb2.corner(i), &bb2.corner(j))
    };
    Vector3::new(ratio(RATIO_EDGES[0]), ratio(RATIO_EDGES[1]), ratio(RATIO_EDGES[2]))
}

/// Axes whose ratio component is not finite.
pub fn degenerate_axes(ratios: &Vector3<f64>) -> Vec<Axis> {
    Axis::ALL
        .into_iter()
        .filter(|axis| !ratios[axis.index()].is_finite())
        .collect()
}

/// Like [`bounding_box_ratios`] but fails with
/// [`Error::DegenerateGeometry`] when any component is not finite.
pub fn checked_bounding_box_ratios(
    object: &str,
    bb1: &BoundingBox,
    bb2: &BoundingBox,
) -> Result<Vector3<f64>> {
    let ratios = bounding_box_ratios(bb1, bb2);
    let axes = degenerate_axes(&ratios);
    if axes.is_empty() {
        Ok(ratios)
    } else {
        Err(Error::DegenerateGeometry {
            object: object.to_string(),
            axes,
        })
    }
}
