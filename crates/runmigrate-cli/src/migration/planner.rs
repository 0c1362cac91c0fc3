//! Migration Planner
//!
//! Decides, per object, whether anything has to be written and builds the
//! write. Planners only read; every write goes through the orchestrator
//! after confirmation.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use runmigrate_common::{ResourceIdentity, ResourceKind, SchemaVersion};

use super::reconstruct::{reconstruct, ChildTemplate};
use super::{Change, MigrationDecision, SkipReason, LINKAGE_FIELD};
use crate::accessor::ClusterAccessor;
use crate::Result;

/// Plans the migration of every object of one kind
#[async_trait]
pub trait Planner: Send + Sync {
    /// Kind whose objects are enumerated and migrated
    fn parent_kind(&self) -> &ResourceKind;

    /// Kind whose names must be listed once before planning starts
    fn child_kind(&self) -> Option<&ResourceKind>;

    /// Decide what to do with one object.
    ///
    /// `children` holds the names listed for [`Planner::child_kind`] and is
    /// empty when the planner has no child kind.
    async fn plan(
        &self,
        accessor: &dyn ClusterAccessor,
        identity: &ResourceIdentity,
        children: &[String],
    ) -> Result<MigrationDecision>;
}

/// Whether a v1 record already carries child references.
///
/// Presence of the key is enough, an empty list included.
pub fn has_linkage(record: &Value) -> bool {
    record
        .get("status")
        .and_then(Value::as_object)
        .is_some_and(|status| status.contains_key(LINKAGE_FIELD))
}

/// Restores `status.childReferences` on PipelineRuns
pub struct LinkagePlanner {
    parent_kind: ResourceKind,
    child_kind: ResourceKind,
    template: ChildTemplate,
}

impl LinkagePlanner {
    pub fn new(group: &str, pipeline_task_name: impl Into<String>) -> Self {
        let child_kind = ResourceKind::task_runs(group);
        let template = ChildTemplate {
            api_version: child_kind.api_version(SchemaVersion::V1),
            kind: child_kind.kind.clone(),
            pipeline_task_name: pipeline_task_name.into(),
        };
        Self {
            parent_kind: ResourceKind::pipeline_runs(group),
            child_kind,
            template,
        }
    }
}

#[async_trait]
impl Planner for LinkagePlanner {
    fn parent_kind(&self) -> &ResourceKind {
        &self.parent_kind
    }

    fn child_kind(&self) -> Option<&ResourceKind> {
        Some(&self.child_kind)
    }

    async fn plan(
        &self,
        accessor: &dyn ClusterAccessor,
        identity: &ResourceIdentity,
        children: &[String],
    ) -> Result<MigrationDecision> {
        let current = accessor.fetch(identity, SchemaVersion::V1).await?;
        if has_linkage(&current) {
            debug!(identity = %identity, "child references already present");
            return Ok(MigrationDecision::skip(
                identity.clone(),
                SkipReason::AlreadyMigrated,
            ));
        }

        let old = accessor.fetch(identity, SchemaVersion::V1beta1).await?;
        let references = reconstruct(identity, &old, children, &self.template);
        if references.is_empty() {
            return Ok(MigrationDecision::skip(
                identity.clone(),
                SkipReason::NoChildren,
            ));
        }

        let patch = json!({ "status": { LINKAGE_FIELD: references } });
        Ok(MigrationDecision::migrate(
            identity.clone(),
            Change::StatusPatch { patch },
        ))
    }
}

/// Re-stores objects by writing back their v1 representation
pub struct StorageRewritePlanner {
    kind: ResourceKind,
}

impl StorageRewritePlanner {
    pub fn new(kind: ResourceKind) -> Self {
        Self { kind }
    }
}

#[async_trait]
impl Planner for StorageRewritePlanner {
    fn parent_kind(&self) -> &ResourceKind {
        &self.kind
    }

    fn child_kind(&self) -> Option<&ResourceKind> {
        None
    }

    async fn plan(
        &self,
        accessor: &dyn ClusterAccessor,
        identity: &ResourceIdentity,
        _children: &[String],
    ) -> Result<MigrationDecision> {
        let document = accessor.fetch(identity, SchemaVersion::V1).await?;
        let previous = accessor.fetch(identity, SchemaVersion::V1beta1).await?;
        Ok(MigrationDecision::migrate(
            identity.clone(),
            Change::FullApply { document, previous },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessor::MockClusterAccessor;
    use crate::migration::MigrationAction;

    fn pipeline_run(name: &str) -> ResourceIdentity {
        ResourceIdentity::new(ResourceKind::pipeline_runs("tekton.dev"), name, "image-build")
    }

    fn children(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn empty_linkage_list_counts_as_migrated() {
        assert!(has_linkage(&json!({"status": {"childReferences": []}})));
        assert!(!has_linkage(&json!({"status": {"conditions": []}})));
        assert!(!has_linkage(&json!({"metadata": {}})));
    }

    #[tokio::test]
    async fn already_migrated_run_is_skipped_without_reading_v1beta1() {
        let mut accessor = MockClusterAccessor::new();
        accessor
            .expect_fetch()
            .withf(|_, version| *version == SchemaVersion::V1)
            .times(1)
            .returning(|_, _| Ok(json!({"status": {"childReferences": []}})));
        accessor
            .expect_fetch()
            .withf(|_, version| *version == SchemaVersion::V1beta1)
            .never();

        let planner = LinkagePlanner::new("tekton.dev", "build-from-git");
        let id = pipeline_run("build-1");
        let decision = planner
            .plan(&accessor, &id, &children(&["build-1-t1"]))
            .await
            .unwrap();

        assert_eq!(
            decision.action,
            MigrationAction::Skip(SkipReason::AlreadyMigrated)
        );
    }

    #[tokio::test]
    async fn planning_twice_after_migration_still_skips() {
        let mut accessor = MockClusterAccessor::new();
        accessor.expect_fetch().times(2).returning(|_, _| {
            Ok(json!({"status": {"childReferences": [{"name": "build-1-t1"}]}}))
        });
        accessor.expect_apply_status_patch().never();

        let planner = LinkagePlanner::new("tekton.dev", "build-from-git");
        let id = pipeline_run("build-1");
        for _ in 0..2 {
            let decision = planner.plan(&accessor, &id, &[]).await.unwrap();
            assert_eq!(
                decision.action,
                MigrationAction::Skip(SkipReason::AlreadyMigrated)
            );
        }
    }

    #[tokio::test]
    async fn prefix_fallback_builds_status_patch() {
        let mut accessor = MockClusterAccessor::new();
        accessor
            .expect_fetch()
            .withf(|_, version| *version == SchemaVersion::V1)
            .returning(|_, _| Ok(json!({"status": {"conditions": []}})));
        accessor
            .expect_fetch()
            .withf(|_, version| *version == SchemaVersion::V1beta1)
            .returning(|_, _| Ok(json!({"status": {"conditions": []}})));

        let planner = LinkagePlanner::new("tekton.dev", "build-from-git");
        let id = pipeline_run("run-a");
        let decision = planner
            .plan(&accessor, &id, &children(&["run-a-t1", "run-a-t2", "run-b-t1"]))
            .await
            .unwrap();

        let expected = json!({
            "status": {
                "childReferences": [
                    {
                        "apiVersion": "tekton.dev/v1",
                        "kind": "TaskRun",
                        "name": "run-a-t1",
                        "pipelineTaskName": "build-from-git"
                    },
                    {
                        "apiVersion": "tekton.dev/v1",
                        "kind": "TaskRun",
                        "name": "run-a-t2",
                        "pipelineTaskName": "build-from-git"
                    }
                ]
            }
        });
        assert_eq!(
            decision.action,
            MigrationAction::Migrate(Change::StatusPatch { patch: expected })
        );
    }

    #[tokio::test]
    async fn no_children_skips() {
        let mut accessor = MockClusterAccessor::new();
        accessor
            .expect_fetch()
            .returning(|_, _| Ok(json!({"status": {}})));

        let planner = LinkagePlanner::new("tekton.dev", "build-from-git");
        let decision = planner
            .plan(&accessor, &pipeline_run("lonely"), &children(&["other-t1"]))
            .await
            .unwrap();

        assert_eq!(decision.action, MigrationAction::Skip(SkipReason::NoChildren));
    }

    #[tokio::test]
    async fn fetch_failure_propagates() {
        let mut accessor = MockClusterAccessor::new();
        accessor.expect_fetch().returning(|id, version| {
            Err(runmigrate_common::Error::accessor(
                id.kind.qualified(version),
                "get",
                id.name.clone(),
                "forbidden",
            )
            .into())
        });

        let planner = LinkagePlanner::new("tekton.dev", "build-from-git");
        let err = planner
            .plan(&accessor, &pipeline_run("build-1"), &[])
            .await
            .unwrap_err();

        assert!(err.to_string().contains("get pipelineruns.v1.tekton.dev/build-1"));
    }

    #[tokio::test]
    async fn storage_rewrite_plans_full_apply_of_v1() {
        let mut accessor = MockClusterAccessor::new();
        accessor
            .expect_fetch()
            .withf(|_, version| *version == SchemaVersion::V1)
            .returning(|_, _| Ok(json!({"apiVersion": "tekton.dev/v1"})));
        accessor
            .expect_fetch()
            .withf(|_, version| *version == SchemaVersion::V1beta1)
            .returning(|_, _| Ok(json!({"apiVersion": "tekton.dev/v1beta1"})));

        let planner = StorageRewritePlanner::new(ResourceKind::task_runs("tekton.dev"));
        assert!(planner.child_kind().is_none());

        let id = ResourceIdentity::new(planner.parent_kind().clone(), "t1", "image-build");
        let decision = planner.plan(&accessor, &id, &[]).await.unwrap();

        assert_eq!(
            decision.action,
            MigrationAction::Migrate(Change::FullApply {
                document: json!({"apiVersion": "tekton.dev/v1"}),
                previous: json!({"apiVersion": "tekton.dev/v1beta1"}),
            })
        );
    }
}
