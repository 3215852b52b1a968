// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for substitution runs.

use std::fmt;

use thiserror::Error;

use crate::geometry::Axis;

/// Result type for substitution operations
pub type Result<T> = std::result::Result<T, Error>;

/// Host-side operations whose failure aborts a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostOperation {
    Lookup,
    Update,
    Overlap,
    Duplicate,
    Delete,
    SetVisible,
}

impl HostOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            HostOperation::Lookup => "lookup",
            HostOperation::Update => "update",
            HostOperation::Overlap => "overlap test",
            HostOperation::Duplicate => "duplicate",
            HostOperation::Delete => "delete",
            HostOperation::SetVisible => "set visibility",
        }
    }
}

impl fmt::Display for HostOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while planning or applying substitutions
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration cannot produce a valid run. Raised before any scene
    /// mutation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A zero-length bounding-box edge prevents a finite scale ratio.
    #[error("Degenerate bounding box on '{object}' along {}", format_axes(.axes))]
    DegenerateGeometry { object: String, axes: Vec<Axis> },

    /// The host rejected an operation on an object.
    #[error("Host {operation} failed for '{object}': {source}")]
    HostOperationFailure {
        operation: HostOperation,
        object: String,
        source: standin_scene::Error,
    },

    #[error("Scene error: {0}")]
    Scene(#[from] standin_scene::Error),
}

fn format_axes(axes: &[Axis]) -> String {
    axes.iter().map(Axis::to_string).collect::<Vec<_>>().join(", ")
}

impl Error {
    pub(crate) fn host(
        operation: HostOperation,
        object: impl Into<String>,
        source: standin_scene::Error,
    ) -> Self {
        Error::HostOperationFailure {
            operation,
            object: object.into(),
            source,
        }
    }
}
