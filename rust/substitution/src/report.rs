// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-run record of what was attempted and what happened.

use std::fmt;

use standin_scene::ObjectKey;

use crate::geometry::Axis;
use crate::planner::Assignment;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The posed replacement overlaps another non-static object.
    Collision,
    /// Strict scaling found a non-finite bounding-box ratio. The scene was
    /// left untouched.
    DegenerateGeometry,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::Collision => f.write_str("collision"),
            RejectReason::DegenerateGeometry => f.write_str("degenerate geometry"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubstitutionOutcome {
    Accepted,
    Rejected { reason: RejectReason },
}

impl SubstitutionOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubstitutionOutcome::Accepted)
    }
}

/// One attempted substitution.
#[derive(Debug, Clone, PartialEq)]
pub struct SubstitutionRecord {
    pub assignment: Assignment,
    pub source: ObjectKey,
    pub source_name: String,
    /// The pool entry that was posed at the source.
    pub replacement: ObjectKey,
    pub replacement_name: String,
    pub outcome: SubstitutionOutcome,
    /// Name of the first object found overlapping a rejected replacement.
    pub blocked_by: Option<String>,
    /// Host diagnostic for the blocking overlap.
    pub details: Option<String>,
    pub degenerate_axes: Vec<Axis>,
    /// Duplicate written back into the pool slot after an accept.
    pub pool_refill: Option<ObjectKey>,
    /// Properties merged onto the replacement.
    pub properties_copied: usize,
}

/// Everything a run did, in attempt order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    pub records: Vec<SubstitutionRecord>,
    /// Pool contents at the end of the run.
    pub pool: Vec<ObjectKey>,
}

impl RunReport {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn accepted(&self) -> impl Iterator<Item = &SubstitutionRecord> {
        self.records.iter().filter(|r| r.outcome.is_accepted())
    }

    pub fn rejected(&self) -> impl Iterator<Item = &SubstitutionRecord> {
        self.records.iter().filter(|r| !r.outcome.is_accepted())
    }

    pub fn accepted_count(&self) -> usize {
        self.accepted().count()
    }

    pub fn rejected_count(&self) -> usize {
        self.rejected().count()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} attempted, {} accepted, {} rejected",
            self.len(),
            self.accepted_count(),
            self.rejected_count()
        )?;
        for record in &self.records {
            match record.outcome {
                SubstitutionOutcome::Accepted => {
                    writeln!(f, "  {} -> {}", record.source_name, record.replacement_name)?
                }
                SubstitutionOutcome::Rejected { reason } => writeln!(
                    f,
                    "  {} -x {} ({reason}{})",
                    record.source_name,
                    record.replacement_name,
                    record
                        .blocked_by
                        .as_deref()
                        .map(|b| format!(" with {b}"))
                        .unwrap_or_default()
                )?,
            }
        }
        Ok(())
    }
}
