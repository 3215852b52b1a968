// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON serialization for scenes.
//!
//! Slot-map keys are not portable, so a snapshot is simply the ordered list
//! of objects. Shapes can be given either as a cuboid shorthand or as a full
//! indexed triangle mesh; snapshots written by [`Scene::to_json`] always use
//! the mesh form.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::mesh::TriangleMesh;
use crate::object::{Pose, SceneObject};
use crate::properties::Properties;
use crate::scene::Scene;

/// Serializable representation of a whole scene.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneSnapshot {
    pub objects: Vec<ObjectSnapshot>,
}

/// Geometry of a snapshot object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShapeSnapshot {
    Cuboid {
        half_extents: [f64; 3],
    },
    Mesh {
        positions: Vec<[f64; 3]>,
        indices: Vec<[u32; 3]>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectSnapshot {
    pub name: String,
    #[serde(default)]
    pub pose: Pose,
    pub shape: ShapeSnapshot,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Properties::is_empty")]
    pub properties: Properties,
}

fn default_visible() -> bool {
    true
}

impl ObjectSnapshot {
    fn into_object(self) -> Result<SceneObject> {
        let mesh = match self.shape {
            ShapeSnapshot::Cuboid { half_extents } => TriangleMesh::cuboid(half_extents),
            ShapeSnapshot::Mesh { positions, indices } => {
                TriangleMesh::from_parts(&self.name, positions, indices)?
            }
        };
        let mut object = SceneObject::new(self.name, mesh);
        object.pose = self.pose;
        object.visible = self.visible;
        object.is_static = self.is_static;
        object.tags = self.tags;
        object.properties = self.properties;
        Ok(object)
    }

    fn from_object(object: &SceneObject) -> Self {
        Self {
            name: object.name.clone(),
            pose: object.pose,
            shape: ShapeSnapshot::Mesh {
                positions: object.mesh.positions.clone(),
                indices: object.mesh.indices.clone(),
            },
            visible: object.visible,
            is_static: object.is_static,
            tags: object.tags.clone(),
            properties: object.properties.clone(),
        }
    }
}

impl Scene {
    /// Builds a scene from a snapshot, preserving object order.
    pub fn from_snapshot(snapshot: SceneSnapshot) -> Result<Self> {
        let mut scene = Scene::new();
        for object in snapshot.objects {
            scene.insert(object.into_object()?);
        }
        Ok(scene)
    }

    /// Creates a serializable snapshot of the scene.
    pub fn to_snapshot(&self) -> SceneSnapshot {
        SceneSnapshot {
            objects: self.iter().map(|(_, o)| ObjectSnapshot::from_object(o)).collect(),
        }
    }

    /// Parses a scene from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: SceneSnapshot =
            serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))?;
        Self::from_snapshot(snapshot)
    }

    /// Serializes the scene to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.to_snapshot())
            .map_err(|e| Error::Serialization(e.to_string()))
    }
}
