// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Substitution run orchestration.

use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use standin_scene::{merge_properties, ObjectKey};

use crate::align::{align, check_scaling, restore_pose};
use crate::collision::{can_place, Placement};
use crate::config::ReplacerConfig;
use crate::error::{Error, HostOperation, Result};
use crate::host::SceneHost;
use crate::planner::{plan, Assignment};
use crate::report::{RejectReason, RunReport, SubstitutionOutcome, SubstitutionRecord};

/// Applies planned substitutions to a scene, one at a time.
///
/// The engine owns its random source so repeated runs with the same seed
/// produce the same assignments.
pub struct SubstitutionEngine<R = StdRng> {
    config: ReplacerConfig,
    rng: R,
}

impl SubstitutionEngine<StdRng> {
    /// Validates `config` and seeds from `config.seed`, or from entropy.
    pub fn new(config: ReplacerConfig) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }
}

impl<R: Rng> SubstitutionEngine<R> {
    pub fn with_rng(config: ReplacerConfig, rng: R) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, rng })
    }

    pub fn config(&self) -> &ReplacerConfig {
        &self.config
    }

    /// Resolves both selectors against `host` and runs over the result.
    pub fn run<H: SceneHost + ?Sized>(&mut self, host: &mut H) -> Result<RunReport> {
        let sources = host.select(&self.config.objects_to_be_replaced);
        let mut pool = host.select(&self.config.objects_to_replace_with);
        self.run_with(host, &sources, &mut pool)
    }

    /// Runs over explicit source and pool lists.
    ///
    /// Accepted substitutions refill their pool slot with a duplicate of the
    /// used entry, so `pool` reflects the refilled slots when this returns.
    /// Fails before touching the scene if the configuration cannot produce a
    /// plan. Host failures abort the run.
    pub fn run_with<H: SceneHost + ?Sized>(
        &mut self,
        host: &mut H,
        sources: &[ObjectKey],
        pool: &mut Vec<ObjectKey>,
    ) -> Result<RunReport> {
        let started = Instant::now();
        let assignments =
            plan(sources.len(), pool.len(), self.config.replace_ratio, &mut self.rng)?;

        tracing::info!(
            sources = sources.len(),
            pool = pool.len(),
            attempts = assignments.len(),
            "Starting substitution run"
        );

        let mut report = RunReport::default();
        for assignment in assignments {
            let record = self.substitute(host, sources, pool, assignment)?;
            report.records.push(record);
        }

        host.refresh();
        report.pool = pool.clone();

        tracing::info!(
            accepted = report.accepted_count(),
            rejected = report.rejected_count(),
            elapsed_ms = started.elapsed().as_millis(),
            "Substitution run complete"
        );
        Ok(report)
    }

    fn substitute<H: SceneHost + ?Sized>(
        &self,
        host: &mut H,
        sources: &[ObjectKey],
        pool: &mut [ObjectKey],
        assignment: Assignment,
    ) -> Result<SubstitutionRecord> {
        let source = sources[assignment.source_index];
        let replacement = pool[assignment.pool_index];

        let mut record = SubstitutionRecord {
            assignment,
            source,
            source_name: host.name_of(source),
            replacement,
            replacement_name: host.name_of(replacement),
            outcome: SubstitutionOutcome::Accepted,
            blocked_by: None,
            details: None,
            degenerate_axes: Vec::new(),
            pool_refill: None,
            properties_copied: 0,
        };

        if self.config.strict_scaling {
            match check_scaling(host, source, replacement) {
                Ok(()) => {}
                Err(Error::DegenerateGeometry { axes, .. }) => {
                    tracing::warn!(
                        source = %record.source_name,
                        replacement = %record.replacement_name,
                        axes = ?axes,
                        "Degenerate bounding box, substitution rejected"
                    );
                    record.degenerate_axes = axes;
                    record.outcome = SubstitutionOutcome::Rejected {
                        reason: RejectReason::DegenerateGeometry,
                    };
                    return Ok(record);
                }
                Err(err) => return Err(err),
            }
        }

        let alignment = align(host, source, replacement, true)?;
        record.degenerate_axes = alignment.degenerate_axes.clone();
        let placement = can_place(host, replacement, source)?;

        match placement {
            Placement::Clear => {
                if self.config.copy_properties {
                    record.properties_copied = copy_properties(host, source, replacement)?;
                }

                let copies = host.duplicate(replacement).map_err(|e| {
                    Error::host(HostOperation::Duplicate, record.replacement_name.clone(), e)
                })?;
                if let Some(&refill) = copies.first() {
                    pool[assignment.pool_index] = refill;
                    record.pool_refill = Some(refill);
                }

                // Show the replacement before the source goes away.
                host.set_visible(replacement, true).map_err(|e| {
                    Error::host(HostOperation::SetVisible, record.replacement_name.clone(), e)
                })?;
                host.set_visible(source, false).map_err(|e| {
                    Error::host(HostOperation::SetVisible, record.source_name.clone(), e)
                })?;
                host.delete(source).map_err(|e| {
                    Error::host(HostOperation::Delete, record.source_name.clone(), e)
                })?;

                tracing::info!(
                    source = %record.source_name,
                    replacement = %record.replacement_name,
                    properties = record.properties_copied,
                    "Substitution accepted"
                );
            }
            Placement::Blocked { name, details, .. } => {
                if self.config.restore_on_reject {
                    restore_pose(host, replacement, alignment.previous)?;
                }

                tracing::info!(
                    source = %record.source_name,
                    replacement = %record.replacement_name,
                    blocked_by = %name,
                    "Substitution rejected"
                );
                record.outcome = SubstitutionOutcome::Rejected {
                    reason: RejectReason::Collision,
                };
                record.blocked_by = Some(name);
                record.details = details;
            }
        }

        Ok(record)
    }
}

fn copy_properties<H: SceneHost + ?Sized>(
    host: &mut H,
    source: ObjectKey,
    replacement: ObjectKey,
) -> Result<usize> {
    let properties = host
        .object(source)
        .map_err(|e| Error::host(HostOperation::Lookup, host.name_of(source), e))?
        .properties
        .clone();
    let name = host.name_of(replacement);
    let target = host
        .object_mut(replacement)
        .map_err(|e| Error::host(HostOperation::Update, name, e))?;
    Ok(merge_properties(&mut target.properties, &properties))
}

#[cfg(test)]
mod tests {
    use super::*;
    use standin_scene::{Scene, SceneObject, Selector};

    fn config(seed: u64) -> ReplacerConfig {
        ReplacerConfig {
            objects_to_be_replaced: Selector::tagged("source"),
            objects_to_replace_with: Selector::tagged("pool"),
            seed: Some(seed),
            ..ReplacerConfig::default()
        }
    }

    #[test]
    fn invalid_ratio_fails_at_construction() {
        let config = ReplacerConfig {
            replace_ratio: 2.0,
            ..ReplacerConfig::default()
        };
        assert!(matches!(SubstitutionEngine::new(config), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn same_seed_same_assignments() {
        let build = || {
            let mut scene = Scene::new();
            for i in 0..6 {
                scene.insert(
                    SceneObject::cuboid(format!("Chair{i}"), [0.3; 3])
                        .with_position([i as f64 * 3.0, 0.0, 0.0])
                        .with_tag("source"),
                );
            }
            for i in 0..3 {
                scene.insert(
                    SceneObject::cuboid(format!("Stool{i}"), [0.2; 3])
                        .with_position([i as f64 * 3.0, 50.0, 0.0])
                        .with_tag("pool")
                        .hidden(),
                );
            }
            scene
        };

        let mut first = build();
        let mut second = build();
        let a = SubstitutionEngine::new(config(21)).unwrap().run(&mut first).unwrap();
        let b = SubstitutionEngine::new(config(21)).unwrap().run(&mut second).unwrap();

        let picks = |r: &RunReport| r.records.iter().map(|x| x.assignment).collect::<Vec<_>>();
        assert_eq!(picks(&a), picks(&b));
        assert_eq!(a.len(), 6);
    }

    #[test]
    fn copies_properties_onto_replacement() {
        let mut scene = Scene::new();
        scene.insert(
            SceneObject::cuboid("Chair", [0.3; 3])
                .with_tag("source")
                .with_property("material", "oak")
                .with_property("price", 40.0),
        );
        let stool = scene.insert(
            SceneObject::cuboid("Stool", [0.2; 3])
                .with_tag("pool")
                .with_property("material", "pine")
                .hidden(),
        );

        let report = SubstitutionEngine::new(config(1)).unwrap().run(&mut scene).unwrap();
        assert_eq!(report.records[0].properties_copied, 2);

        let props = &scene.get(stool).unwrap().properties;
        assert_eq!(props["material"].as_str(), Some("oak"));
        assert_eq!(props["price"].as_f64(), Some(40.0));
        assert_eq!(props.len(), 2);
    }
}
