// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pose alignment of a replacement onto a source object.

use standin_scene::{BoundingBox, ObjectKey, Pose};

use crate::error::{Error, HostOperation, Result};
use crate::geometry::{bounding_box_ratios, checked_bounding_box_ratios, degenerate_axes, Axis};
use crate::host::SceneHost;

/// What [`align`] did to the replacement.
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    /// Replacement pose before alignment.
    pub previous: Pose,
    /// Replacement pose after alignment.
    pub aligned: Pose,
    /// Scale components left untouched because their ratio was not finite.
    pub degenerate_axes: Vec<Axis>,
}

fn source_frame<H: SceneHost + ?Sized>(host: &H, source: ObjectKey) -> Result<(Pose, BoundingBox)> {
    let src = host
        .object(source)
        .map_err(|e| Error::host(HostOperation::Lookup, host.name_of(source), e))?;
    Ok((src.pose, src.bounding_box))
}

/// Moves `replacement` onto `source`: copies position and rotation and, when
/// `apply_scale` is set, sets the scale to the ratios between the two local,
/// unscaled bounding boxes. The source's own scale is not part of the ratio.
///
/// Non-finite ratio components are skipped; that axis keeps its current
/// scale and is listed in [`Alignment::degenerate_axes`].
pub fn align<H: SceneHost + ?Sized>(
    host: &mut H,
    source: ObjectKey,
    replacement: ObjectKey,
    apply_scale: bool,
) -> Result<Alignment> {
    let (source_pose, source_box) = source_frame(host, source)?;

    let name = host.name_of(replacement);
    let target = host
        .object_mut(replacement)
        .map_err(|e| Error::host(HostOperation::Update, name.clone(), e))?;

    let previous = target.pose;
    target.pose.position = source_pose.position;
    target.pose.rotation = source_pose.rotation;

    let mut degenerate = Vec::new();
    if apply_scale {
        let ratios = bounding_box_ratios(&source_box, &target.bounding_box);
        degenerate = degenerate_axes(&ratios);
        for axis in Axis::ALL {
            let i = axis.index();
            if ratios[i].is_finite() {
                target.pose.scale[i] = ratios[i];
            }
        }
    }
    let aligned = target.pose;

    if !degenerate.is_empty() {
        tracing::warn!(
            replacement = %name,
            axes = ?degenerate,
            "Degenerate bounding box, scaling skipped on some axes"
        );
    }

    Ok(Alignment {
        previous,
        aligned,
        degenerate_axes: degenerate,
    })
}

/// Fails with [`Error::DegenerateGeometry`] when aligning `replacement` onto
/// `source` would have to skip scaling on some axis. Nothing is modified.
pub fn check_scaling<H: SceneHost + ?Sized>(
    host: &H,
    source: ObjectKey,
    replacement: ObjectKey,
) -> Result<()> {
    let (_, source_box) = source_frame(host, source)?;
    let target = host
        .object(replacement)
        .map_err(|e| Error::host(HostOperation::Lookup, host.name_of(replacement), e))?;
    checked_bounding_box_ratios(&target.name, &source_box, &target.bounding_box).map(|_| ())
}

/// Writes `pose` back onto an object, undoing an alignment.
pub fn restore_pose<H: SceneHost + ?Sized>(
    host: &mut H,
    key: ObjectKey,
    pose: Pose,
) -> Result<()> {
    let name = host.name_of(key);
    host.object_mut(key)
        .map_err(|e| Error::host(HostOperation::Update, name, e))?
        .pose = pose;
    Ok(())
}
