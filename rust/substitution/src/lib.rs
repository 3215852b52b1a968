// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Stand-In Substitution
//!
//! Stochastic, collision-aware replacement of scene objects.
//!
//! Given a list of source objects already placed in a scene and a pool of
//! replacement candidates, the [`SubstitutionEngine`] swaps a configurable
//! fraction of the sources for randomly drawn replacements. Each replacement
//! takes the source's position and orientation and is rescaled so its bounding
//! box approximates the source's. A substitution is rejected when the posed
//! replacement would overlap any other non-static object in the scene.
//!
//! The scene itself is reached through the [`SceneHost`] trait; an
//! implementation for [`standin_scene::Scene`] is provided.
//!
//! ```
//! use standin_scene::{Scene, SceneObject, Selector};
//! use standin_substitution::{ReplacerConfig, SubstitutionEngine};
//!
//! let mut scene = Scene::new();
//! scene.insert(SceneObject::cuboid("Chair", [0.3, 0.3, 0.5]).with_tag("source"));
//! scene.insert(SceneObject::cuboid("Stool", [0.2, 0.2, 0.4]).with_tag("pool").hidden());
//!
//! let config = ReplacerConfig {
//!     objects_to_be_replaced: Selector::tagged("source"),
//!     objects_to_replace_with: Selector::tagged("pool"),
//!     seed: Some(7),
//!     ..ReplacerConfig::default()
//! };
//!
//! let report = SubstitutionEngine::new(config).unwrap().run(&mut scene).unwrap();
//! assert_eq!(report.accepted_count(), 1);
//! ```

pub mod align;
pub mod collision;
pub mod config;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod host;
pub mod planner;
pub mod report;

pub use align::{align, check_scaling, restore_pose, Alignment};
pub use collision::{can_place, Placement};
pub use config::ReplacerConfig;
pub use engine::SubstitutionEngine;
pub use error::{Error, HostOperation, Result};
pub use geometry::{bounding_box_ratios, checked_bounding_box_ratios, distance, Axis};
pub use host::{Intersection, SceneHost};
pub use planner::{assignment_count, plan, Assignment};
pub use report::{RejectReason, RunReport, SubstitutionOutcome, SubstitutionRecord};
