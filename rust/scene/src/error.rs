// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for scene operations.

use crate::keys::ObjectKey;

/// Result type alias for scene operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during scene operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A referenced object was not found in the scene.
    #[error("scene object not found: {0:?}")]
    ObjectNotFound(ObjectKey),

    /// A mesh references vertices that do not exist.
    #[error("invalid mesh for '{name}': {reason}")]
    InvalidMesh { name: String, reason: String },

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}
