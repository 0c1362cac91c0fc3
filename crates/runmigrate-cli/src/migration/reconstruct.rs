//! Reference Reconstructor
//!
//! Converting a stored v1beta1 PipelineRun to v1 loses the link to its
//! TaskRuns. The v1beta1 status records them under `status.taskRuns` (keyed
//! by TaskRun name) when the run got far enough to write it; otherwise the
//! children are recovered by name, since Tekton names every TaskRun after
//! the PipelineRun that created it.
//!
//! The name-prefix fallback is lossy: a parent named `build` also claims the
//! children of `build-2`.

use serde_json::Value;
use tracing::debug;

use runmigrate_common::ResourceIdentity;

use super::{ChildReference, AUTHORITATIVE_LINKAGE_FIELD};

/// Fields shared by every reconstructed [`ChildReference`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChildTemplate {
    pub api_version: String,
    pub kind: String,
    /// Fixed pipeline task label; per-child labels are not recovered
    pub pipeline_task_name: String,
}

impl ChildTemplate {
    pub fn reference(&self, name: &str) -> ChildReference {
        ChildReference {
            api_version: self.api_version.clone(),
            kind: self.kind.clone(),
            name: name.to_string(),
            pipeline_task_name: self.pipeline_task_name.clone(),
        }
    }
}

/// Child names recorded by the parent itself in its v1beta1 status, if any
pub fn authoritative_children(old_record: &Value) -> Option<Vec<String>> {
    old_record
        .get("status")?
        .get(AUTHORITATIVE_LINKAGE_FIELD)?
        .as_object()
        .map(|runs| runs.keys().cloned().collect())
}

/// Children whose name starts with the parent's name
pub fn children_by_prefix(parent: &str, all_children: &[String]) -> Vec<String> {
    all_children
        .iter()
        .filter(|child| child.starts_with(parent))
        .cloned()
        .collect()
}

/// Derive the child references of `parent` from its v1beta1 record.
///
/// Returns an empty list when nothing can be attributed to the parent,
/// which usually means the run never launched any work.
pub fn reconstruct(
    parent: &ResourceIdentity,
    old_record: &Value,
    all_children: &[String],
    template: &ChildTemplate,
) -> Vec<ChildReference> {
    let names = match authoritative_children(old_record) {
        Some(names) => {
            debug!(parent = %parent, count = names.len(), "using recorded task runs");
            names
        }
        None => {
            let names = children_by_prefix(&parent.name, all_children);
            debug!(parent = %parent, count = names.len(), "matched task runs by name prefix");
            names
        }
    };

    names.iter().map(|name| template.reference(name)).collect()
}
