//! Batch Orchestrator
//!
//! Walks every parent object in listing order, one at a time: plan, confirm,
//! apply. Listings happen once up front. Any error stops the run; a `no`
//! answer stops it cleanly, leaving everything after the current object
//! untouched and everything before it migrated.

use std::fmt;

use tracing::{info, warn};

use runmigrate_common::ResourceIdentity;

use super::confirm::{ConfirmationController, Prompter, Verdict};
use super::planner::Planner;
use super::{Change, MigrationAction, SkipReason};
use crate::accessor::ClusterAccessor;
use crate::Result;

/// What happened to one object
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Migrated,
    Skipped(SkipReason),
    /// The operator declined this object and the run stopped here
    Aborted,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Migrated => f.write_str("migrated"),
            Outcome::Skipped(reason) => write!(f, "skipped ({})", reason),
            Outcome::Aborted => f.write_str("aborted"),
        }
    }
}

/// Per-object outcomes of one run, in processing order
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MigrationReport {
    pub entries: Vec<(ResourceIdentity, Outcome)>,
}

impl MigrationReport {
    fn record(&mut self, identity: ResourceIdentity, outcome: Outcome) {
        info!(identity = %identity, outcome = %outcome, "processed");
        self.entries.push((identity, outcome));
    }

    /// Whether the operator stopped the run
    pub fn aborted(&self) -> bool {
        self.entries
            .last()
            .is_some_and(|(_, outcome)| *outcome == Outcome::Aborted)
    }

    pub fn count(&self, outcome: Outcome) -> usize {
        self.entries.iter().filter(|(_, o)| *o == outcome).count()
    }

    pub fn outcome(&self, name: &str) -> Option<Outcome> {
        self.entries
            .iter()
            .find(|(identity, _)| identity.name == name)
            .map(|(_, outcome)| *outcome)
    }
}

impl fmt::Display for MigrationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (identity, outcome) in &self.entries {
            writeln!(f, "{}: {}", identity.name, outcome)?;
        }
        write!(
            f,
            "{} migrated, {} skipped (already migrated), {} skipped (no children)",
            self.count(Outcome::Migrated),
            self.count(Outcome::Skipped(SkipReason::AlreadyMigrated)),
            self.count(Outcome::Skipped(SkipReason::NoChildren)),
        )?;
        if self.aborted() {
            write!(f, ", aborted")?;
        }
        Ok(())
    }
}

/// Drives one migration pass over every object of the planner's kind
pub struct BatchOrchestrator<'a, P> {
    accessor: &'a dyn ClusterAccessor,
    planner: &'a dyn Planner,
    confirmation: ConfirmationController<P>,
}

impl<'a, P: Prompter> BatchOrchestrator<'a, P> {
    pub fn new(
        accessor: &'a dyn ClusterAccessor,
        planner: &'a dyn Planner,
        confirmation: ConfirmationController<P>,
    ) -> Self {
        Self {
            accessor,
            planner,
            confirmation,
        }
    }

    /// Run the pass to completion, abort, or the first error
    pub async fn run(mut self) -> Result<MigrationReport> {
        let parents = self.accessor.list_names(self.planner.parent_kind()).await?;
        info!(
            kind = %self.planner.parent_kind().plural,
            count = parents.len(),
            "migrating objects"
        );

        let children: Vec<String> = match self.planner.child_kind() {
            Some(kind) => self
                .accessor
                .list_names(kind)
                .await?
                .into_iter()
                .map(|identity| identity.name)
                .collect(),
            None => Vec::new(),
        };

        let mut report = MigrationReport::default();
        for identity in parents {
            info!(identity = %identity, "planning");
            let decision = self
                .planner
                .plan(self.accessor, &identity, &children)
                .await?;

            let change = match decision.action {
                MigrationAction::Skip(reason) => {
                    report.record(decision.identity, Outcome::Skipped(reason));
                    continue;
                }
                MigrationAction::Migrate(change) => change,
            };

            if self.confirmation.confirm(&identity.name, &change).await? == Verdict::Abort {
                warn!(identity = %identity, "aborted by operator");
                report.record(decision.identity, Outcome::Aborted);
                return Ok(report);
            }

            self.apply(&decision.identity, &change).await?;
            report.record(decision.identity, Outcome::Migrated);
        }

        Ok(report)
    }

    async fn apply(&self, identity: &ResourceIdentity, change: &Change) -> Result<()> {
        match change {
            Change::StatusPatch { patch } => {
                info!(identity = %identity, "patching status");
                self.accessor.apply_status_patch(identity, patch).await
            }
            Change::FullApply { document, .. } => {
                info!(identity = %identity, "applying v1 document");
                self.accessor.apply_full(identity, document).await
            }
        }
    }
}
