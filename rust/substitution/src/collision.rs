// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Placement check for a posed replacement candidate.
//!
//! Every live object except the candidate, the source it replaces and static
//! ground geometry is tested. The bounding-box pre-test discards almost all
//! pairs; the exact test only runs when the pre-test reports a possible
//! overlap, and the scan stops at the first confirmed intersection.

use standin_scene::ObjectKey;

use crate::error::{Error, HostOperation, Result};
use crate::host::SceneHost;

/// Verdict of [`can_place`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    Clear,
    Blocked {
        by: ObjectKey,
        name: String,
        details: Option<String>,
    },
}

impl Placement {
    pub fn is_clear(&self) -> bool {
        matches!(self, Placement::Clear)
    }
}

/// Decides whether `candidate`, in its current pose, can stay in the scene
/// in place of `source`.
pub fn can_place<H: SceneHost + ?Sized>(
    host: &H,
    candidate: ObjectKey,
    source: ObjectKey,
) -> Result<Placement> {
    let mut prefilter_hits = 0usize;
    let mut tested = 0usize;

    for other in host.objects() {
        if other == candidate || other == source {
            continue;
        }
        let object = host
            .object(other)
            .map_err(|e| Error::host(HostOperation::Lookup, host.name_of(other), e))?;
        // Ground is always beneath placed objects; testing it is wasted work.
        if object.is_static {
            continue;
        }

        tested += 1;
        let maybe = host
            .bounding_boxes_overlap(other, candidate)
            .map_err(|e| Error::host(HostOperation::Overlap, object.name.clone(), e))?;
        if !maybe {
            continue;
        }

        prefilter_hits += 1;
        let intersection = host
            .exact_intersects(other, candidate)
            .map_err(|e| Error::host(HostOperation::Overlap, object.name.clone(), e))?;
        if intersection.hit {
            tracing::debug!(
                candidate = %host.name_of(candidate),
                blocker = %object.name,
                tested,
                prefilter_hits,
                "Placement blocked"
            );
            return Ok(Placement::Blocked {
                by: other,
                name: object.name.clone(),
                details: intersection.details,
            });
        }
    }

    tracing::trace!(
        candidate = %host.name_of(candidate),
        tested,
        prefilter_hits,
        "Placement clear"
    );
    Ok(Placement::Clear)
}
