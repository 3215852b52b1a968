// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Criteria-based object selection.

use serde::{Deserialize, Serialize};

use crate::keys::ObjectKey;
use crate::object::SceneObject;
use crate::properties::PropertyValue;
use crate::scene::Scene;

/// A single custom-property condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyMatch {
    pub key: String,
    /// Required value; `None` only requires the key to be present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<PropertyValue>,
}

/// Selection criteria. Every criterion that is set must match; an empty
/// selector matches every object.
///
/// ```
/// use standin_scene::{Scene, SceneObject, Selector};
///
/// let mut scene = Scene::new();
/// scene.insert(SceneObject::cuboid("Chair", [0.3; 3]).with_tag("furniture"));
/// scene.insert(SceneObject::cuboid("Floor", [5.0, 5.0, 0.1]).as_static());
///
/// let furniture = scene.select(&Selector::tagged("furniture"));
/// assert_eq!(furniture.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Selector {
    /// Exact name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_contains: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<PropertyMatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_static: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
}

impl Selector {
    /// Matches every object.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn tagged(tag: impl Into<String>) -> Self {
        Self {
            tag: Some(tag.into()),
            ..Self::default()
        }
    }

    pub fn named_like(prefix: impl Into<String>) -> Self {
        Self {
            name_prefix: Some(prefix.into()),
            ..Self::default()
        }
    }

    /// Adds a property condition.
    pub fn with_property(mut self, key: impl Into<String>, value: Option<PropertyValue>) -> Self {
        self.properties.push(PropertyMatch {
            key: key.into(),
            value,
        });
        self
    }

    /// Returns true if the object satisfies every criterion.
    pub fn matches(&self, object: &SceneObject) -> bool {
        if let Some(name) = &self.name {
            if object.name != *name {
                return false;
            }
        }
        if let Some(prefix) = &self.name_prefix {
            if !object.name.starts_with(prefix.as_str()) {
                return false;
            }
        }
        if let Some(part) = &self.name_contains {
            if !object.name.contains(part.as_str()) {
                return false;
            }
        }
        if let Some(tag) = &self.tag {
            if !object.has_tag(tag) {
                return false;
            }
        }
        if let Some(is_static) = self.is_static {
            if object.is_static != is_static {
                return false;
            }
        }
        if let Some(visible) = self.visible {
            if object.visible != visible {
                return false;
            }
        }
        self.properties.iter().all(|cond| match (object.properties.get(&cond.key), &cond.value) {
            (Some(_), None) => true,
            (Some(actual), Some(expected)) => actual == expected,
            (None, _) => false,
        })
    }
}

impl Scene {
    /// Keys of every object matching `selector`, in scene order.
    pub fn select(&self, selector: &Selector) -> Vec<ObjectKey> {
        self.iter()
            .filter(|(_, object)| selector.matches(object))
            .map(|(key, _)| key)
            .collect()
    }
}
