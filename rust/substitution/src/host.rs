// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The scene services a substitution run consumes.
//!
//! Everything the engine needs from the outside world goes through
//! [`SceneHost`]: object lookup and mutation, the two overlap tests,
//! duplication, deletion, visibility and the final refresh. The engine holds
//! the host mutably for the duration of one run and never caches objects
//! across calls.

use standin_scene::{meshes_intersect, ObjectKey, Scene, SceneObject, Selector};

/// Outcome of an exact overlap test.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Intersection {
    pub hit: bool,
    /// Host-specific diagnostic, e.g. which triangles met.
    pub details: Option<String>,
}

/// Services provided by the scene that owns the objects.
pub trait SceneHost {
    /// Resolves selection criteria to an ordered list of objects.
    fn select(&self, selector: &Selector) -> Vec<ObjectKey>;

    /// Every live object, in stable scene order.
    fn objects(&self) -> Vec<ObjectKey>;

    fn object(&self, key: ObjectKey) -> standin_scene::Result<&SceneObject>;

    fn object_mut(&mut self, key: ObjectKey) -> standin_scene::Result<&mut SceneObject>;

    /// Cheap, conservative overlap pre-test on bounding volumes.
    fn bounding_boxes_overlap(&self, a: ObjectKey, b: ObjectKey) -> standin_scene::Result<bool>;

    /// Expensive exact geometric overlap test.
    fn exact_intersects(&self, a: ObjectKey, b: ObjectKey) -> standin_scene::Result<Intersection>;

    /// Clones an object. Hosts may return zero or more new handles.
    fn duplicate(&mut self, key: ObjectKey) -> standin_scene::Result<Vec<ObjectKey>>;

    fn delete(&mut self, key: ObjectKey) -> standin_scene::Result<()>;

    fn set_visible(&mut self, key: ObjectKey, visible: bool) -> standin_scene::Result<()>;

    /// Recomputes dependent scene state after a batch of edits.
    fn refresh(&mut self);

    /// Object name for diagnostics; falls back to the key for missing objects.
    fn name_of(&self, key: ObjectKey) -> String {
        self.object(key)
            .map(|o| o.name.clone())
            .unwrap_or_else(|_| format!("{key:?}"))
    }
}

impl SceneHost for Scene {
    fn select(&self, selector: &Selector) -> Vec<ObjectKey> {
        Scene::select(self, selector)
    }

    fn objects(&self) -> Vec<ObjectKey> {
        self.keys().collect()
    }

    fn object(&self, key: ObjectKey) -> standin_scene::Result<&SceneObject> {
        self.try_get(key)
    }

    fn object_mut(&mut self, key: ObjectKey) -> standin_scene::Result<&mut SceneObject> {
        self.try_get_mut(key)
    }

    fn bounding_boxes_overlap(&self, a: ObjectKey, b: ObjectKey) -> standin_scene::Result<bool> {
        Ok(self.try_get(a)?.world_aabb().overlaps(&self.try_get(b)?.world_aabb()))
    }

    fn exact_intersects(&self, a: ObjectKey, b: ObjectKey) -> standin_scene::Result<Intersection> {
        let result = meshes_intersect(self.try_get(a)?, self.try_get(b)?);
        let details = if result.contained {
            Some("one mesh lies inside the other".to_string())
        } else {
            result.first_hit.map(|(i, j)| {
                format!("triangles {i} and {j} overlap ({} pairs tested)", result.pairs_tested)
            })
        };
        Ok(Intersection {
            hit: result.hit,
            details,
        })
    }

    fn duplicate(&mut self, key: ObjectKey) -> standin_scene::Result<Vec<ObjectKey>> {
        Ok(vec![Scene::duplicate(self, key)?])
    }

    fn delete(&mut self, key: ObjectKey) -> standin_scene::Result<()> {
        self.remove(key).map(|_| ())
    }

    fn set_visible(&mut self, key: ObjectKey, visible: bool) -> standin_scene::Result<()> {
        Scene::set_visible(self, key, visible)
    }

    fn refresh(&mut self) {
        Scene::refresh(self);
    }
}
