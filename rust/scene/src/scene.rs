// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Arena-based scene storage.
//!
//! The [`Scene`] owns every object in a slot map with stable, generational
//! keys and keeps a separate insertion-ordered key list, so iteration and
//! selection are deterministic even though slot maps reuse freed slots.
//!
//! Mutations made through the scene mark objects dirty; [`Scene::refresh`]
//! clears the dirty set and advances the revision counter, standing in for the
//! transform/dependency update a render host performs after edits.

use rustc_hash::FxHashSet;
use slotmap::SlotMap;

use crate::error::{Error, Result};
use crate::keys::ObjectKey;
use crate::object::SceneObject;

/// The central container for scene objects.
///
/// # Example
///
/// ```
/// use standin_scene::{Scene, SceneObject};
///
/// let mut scene = Scene::new();
/// let chair = scene.insert(SceneObject::cuboid("Chair", [0.3, 0.3, 0.5]));
/// let copy = scene.duplicate(chair).unwrap();
///
/// assert_eq!(scene.len(), 2);
/// assert_eq!(scene.get(copy).unwrap().name, "Chair.001");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Scene {
    objects: SlotMap<ObjectKey, SceneObject>,
    order: Vec<ObjectKey>,
    dirty: FxHashSet<ObjectKey>,
    revision: u64,
}

impl Scene {
    /// Creates a new, empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an object and returns its key.
    pub fn insert(&mut self, object: SceneObject) -> ObjectKey {
        let key = self.objects.insert(object);
        self.order.push(key);
        self.dirty.insert(key);
        key
    }

    /// Returns the object for the given key, or `None` if not found.
    pub fn get(&self, key: ObjectKey) -> Option<&SceneObject> {
        self.objects.get(key)
    }

    /// Returns a mutable reference to the object and marks it dirty.
    pub fn get_mut(&mut self, key: ObjectKey) -> Option<&mut SceneObject> {
        let object = self.objects.get_mut(key)?;
        self.dirty.insert(key);
        Some(object)
    }

    /// Like [`Scene::get`] but returns an error for a missing key.
    pub fn try_get(&self, key: ObjectKey) -> Result<&SceneObject> {
        self.objects.get(key).ok_or(Error::ObjectNotFound(key))
    }

    /// Like [`Scene::get_mut`] but returns an error for a missing key.
    pub fn try_get_mut(&mut self, key: ObjectKey) -> Result<&mut SceneObject> {
        self.get_mut(key).ok_or(Error::ObjectNotFound(key))
    }

    /// Returns `true` if the scene contains this key.
    pub fn contains(&self, key: ObjectKey) -> bool {
        self.objects.contains_key(key)
    }

    /// Removes the object from the scene.
    pub fn remove(&mut self, key: ObjectKey) -> Result<SceneObject> {
        let object = self.objects.remove(key).ok_or(Error::ObjectNotFound(key))?;
        self.order.retain(|&k| k != key);
        self.dirty.remove(&key);
        tracing::trace!(name = %object.name, "Removed object");
        Ok(object)
    }

    /// Copies an object (pose, mesh, flags and properties included) under a
    /// fresh name and appends it to the scene order.
    ///
    /// Naming follows the `Name.001`, `Name.002`, … convention, skipping
    /// suffixes already in use.
    pub fn duplicate(&mut self, key: ObjectKey) -> Result<ObjectKey> {
        let mut copy = self.try_get(key)?.clone();
        copy.name = self.unique_name(&copy.name);
        tracing::trace!(name = %copy.name, "Duplicated object");
        Ok(self.insert(copy))
    }

    /// Sets the render visibility of an object.
    pub fn set_visible(&mut self, key: ObjectKey, visible: bool) -> Result<()> {
        self.try_get_mut(key)?.visible = visible;
        Ok(())
    }

    /// Finds the first object with exactly this name.
    pub fn find_by_name(&self, name: &str) -> Option<ObjectKey> {
        self.order
            .iter()
            .copied()
            .find(|&k| self.objects[k].name == name)
    }

    /// Keys of all objects in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = ObjectKey> + '_ {
        self.order.iter().copied()
    }

    /// Iterate over `(key, &object)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectKey, &SceneObject)> {
        self.order.iter().map(move |&k| (k, &self.objects[k]))
    }

    /// Total number of objects currently in the scene.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Returns `true` if the object was modified since the last refresh.
    pub fn is_dirty(&self, key: ObjectKey) -> bool {
        self.dirty.contains(&key)
    }

    /// Number of objects modified since the last refresh.
    pub fn dirty_count(&self) -> usize {
        self.dirty.len()
    }

    /// Number of completed refreshes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Settles pending edits: clears the dirty set and advances the revision.
    ///
    /// Returns the number of objects that were dirty.
    pub fn refresh(&mut self) -> usize {
        let settled = self.dirty.len();
        self.dirty.clear();
        self.revision += 1;
        tracing::debug!(revision = self.revision, settled, "Scene refreshed");
        settled
    }

    fn unique_name(&self, name: &str) -> String {
        let base = strip_numeric_suffix(name);
        let taken: FxHashSet<&str> = self.objects.values().map(|o| o.name.as_str()).collect();
        (1u32..)
            .map(|n| format!("{base}.{n:03}"))
            .find(|candidate| !taken.contains(candidate.as_str()))
            .unwrap_or_else(|| format!("{base}.copy"))
    }
}

/// `"Chair.004"` → `"Chair"`; names without a 3-digit suffix are unchanged.
fn strip_numeric_suffix(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((base, suffix))
            if !base.is_empty()
                && suffix.len() == 3
                && suffix.bytes().all(|b| b.is_ascii_digit()) =>
        {
            base
        }
        _ => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_remove() {
        let mut scene = Scene::new();
        let a = scene.insert(SceneObject::cuboid("A", [1.0; 3]));
        assert!(scene.contains(a));
        assert_eq!(scene.len(), 1);

        let removed = scene.remove(a).unwrap();
        assert_eq!(removed.name, "A");
        assert!(!scene.contains(a));
        assert!(scene.is_empty());
        assert!(matches!(scene.remove(a), Err(Error::ObjectNotFound(_))));
    }

    #[test]
    fn keys_are_stable_after_other_removal() {
        let mut scene = Scene::new();
        let a = scene.insert(SceneObject::cuboid("A", [1.0; 3]));
        let b = scene.insert(SceneObject::cuboid("B", [1.0; 3]).with_position([3.0, 0.0, 0.0]));
        scene.remove(a).unwrap();

        let c = scene.insert(SceneObject::cuboid("C", [1.0; 3]));
        assert!(!scene.contains(a));
        assert_ne!(a, c);
        assert_eq!(scene.get(b).unwrap().pose.position, [3.0, 0.0, 0.0]);
    }

    #[test]
    fn iteration_follows_insertion_order() {
        let mut scene = Scene::new();
        let a = scene.insert(SceneObject::cuboid("A", [1.0; 3]));
        scene.insert(SceneObject::cuboid("B", [1.0; 3]));
        scene.remove(a).unwrap();
        scene.insert(SceneObject::cuboid("C", [1.0; 3]));

        let names: Vec<_> = scene.iter().map(|(_, o)| o.name.as_str()).collect();
        assert_eq!(names, ["B", "C"]);
    }

    #[test]
    fn duplicate_names_skip_taken_suffixes() {
        let mut scene = Scene::new();
        let chair = scene.insert(
            SceneObject::cuboid("Chair", [1.0; 3]).with_property("seats", 1i64),
        );
        let first = scene.duplicate(chair).unwrap();
        let second = scene.duplicate(first).unwrap();
        let third = scene.duplicate(chair).unwrap();

        assert_eq!(scene.get(first).unwrap().name, "Chair.001");
        assert_eq!(scene.get(second).unwrap().name, "Chair.002");
        assert_eq!(scene.get(third).unwrap().name, "Chair.003");
        assert_eq!(scene.get(third).unwrap().properties, scene.get(chair).unwrap().properties);
    }

    #[test]
    fn strip_suffix_only_for_three_digits() {
        assert_eq!(strip_numeric_suffix("Chair.012"), "Chair");
        assert_eq!(strip_numeric_suffix("Chair.12"), "Chair.12");
        assert_eq!(strip_numeric_suffix("v1.5.abc"), "v1.5.abc");
        assert_eq!(strip_numeric_suffix(".001"), ".001");
    }

    #[test]
    fn refresh_clears_dirty_set() {
        let mut scene = Scene::new();
        let a = scene.insert(SceneObject::cuboid("A", [1.0; 3]));
        assert_eq!(scene.refresh(), 1);
        assert!(!scene.is_dirty(a));

        scene.set_visible(a, false).unwrap();
        assert!(scene.is_dirty(a));
        assert_eq!(scene.dirty_count(), 1);
        assert_eq!(scene.refresh(), 1);
        assert_eq!(scene.revision(), 2);
    }

    #[test]
    fn find_by_name() {
        let mut scene = Scene::new();
        scene.insert(SceneObject::cuboid("Floor", [5.0, 5.0, 0.1]).as_static());
        let lamp = scene.insert(SceneObject::cuboid("Lamp", [0.2; 3]));
        assert_eq!(scene.find_by_name("Lamp"), Some(lamp));
        assert_eq!(scene.find_by_name("Sofa"), None);
    }
}
