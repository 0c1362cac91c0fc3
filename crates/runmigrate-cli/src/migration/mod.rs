//! Storage version migration
//!
//! A migration pass walks every object of one kind, asks a [`Planner`] what
//! (if anything) has to be written for it, gates each write behind the
//! [`confirm::ConfirmationController`], and applies approved changes through
//! the [`ClusterAccessor`](crate::accessor::ClusterAccessor).
//!
//! - [`reconstruct`] - rebuilds PipelineRun -> TaskRun links lost in conversion
//! - [`planner`] - per-object migration decisions
//! - [`confirm`] - interactive yes/no/all gate
//! - [`render`] - human-readable rendering of a planned change
//! - [`batch`] - the orchestrating loop and its report

pub mod batch;
pub mod confirm;
pub mod planner;
pub mod reconstruct;
pub mod render;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use runmigrate_common::ResourceIdentity;

pub use batch::{BatchOrchestrator, MigrationReport, Outcome};
pub use confirm::{Answer, ConfirmationController, ConfirmationState, Prompter, Verdict};
pub use planner::{LinkagePlanner, Planner, StorageRewritePlanner};

/// Status field of a v1 PipelineRun holding its child references
pub const LINKAGE_FIELD: &str = "childReferences";

/// Status field of a v1beta1 PipelineRun mapping TaskRun names to their status
pub const AUTHORITATIVE_LINKAGE_FIELD: &str = "taskRuns";

/// A link from a parent run's status to a child object it spawned
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildReference {
    pub api_version: String,
    pub kind: String,
    pub name: String,
    pub pipeline_task_name: String,
}

/// Why an object was left untouched
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// The v1 status already carries the linkage field
    AlreadyMigrated,
    /// No child objects could be attributed to the parent
    NoChildren,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::AlreadyMigrated => f.write_str("already migrated"),
            SkipReason::NoChildren => f.write_str("no children"),
        }
    }
}

/// A write planned for one object
#[derive(Clone, Debug, PartialEq)]
pub enum Change {
    /// Merge patch for the status subresource
    StatusPatch { patch: Value },
    /// Full v1 document replacing the stored object; `previous` is the
    /// v1beta1 view of the same object, kept for review
    FullApply { document: Value, previous: Value },
}

/// What to do with one object
#[derive(Clone, Debug, PartialEq)]
pub enum MigrationAction {
    Skip(SkipReason),
    Migrate(Change),
}

/// Planner output for one object
#[derive(Clone, Debug, PartialEq)]
pub struct MigrationDecision {
    pub identity: ResourceIdentity,
    pub action: MigrationAction,
}

impl MigrationDecision {
    pub fn skip(identity: ResourceIdentity, reason: SkipReason) -> Self {
        Self {
            identity,
            action: MigrationAction::Skip(reason),
        }
    }

    pub fn migrate(identity: ResourceIdentity, change: Change) -> Self {
        Self {
            identity,
            action: MigrationAction::Migrate(change),
        }
    }
}
