//! Cluster Accessor
//!
//! Typed read/write access to versioned custom resources in one namespace.
//! Every object is addressed through a [`ResourceKind`] plus an explicit
//! [`SchemaVersion`], so the same object can be read under both its old and
//! new representation.

use async_trait::async_trait;
use kube::api::{Api, DynamicObject, ListParams, Patch, PatchParams, PostParams};
use kube::Client;
use serde_json::Value;
use tracing::{debug, info};

#[cfg(test)]
use mockall::automock;

use runmigrate_common::{ResourceIdentity, ResourceKind, SchemaVersion, FIELD_MANAGER};

use crate::{Error, Result};

/// Trait abstracting the cluster calls made by a migration
///
/// This trait allows mocking the cluster in tests while using the real
/// client in production. None of the calls retry; a failure is returned as
/// an accessor error naming the kind, operation and target.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ClusterAccessor: Send + Sync {
    /// List every object of a kind, in the order the server returns them
    async fn list_names(&self, kind: &ResourceKind) -> Result<Vec<ResourceIdentity>>;

    /// Fetch one object as seen under a specific schema version
    async fn fetch(&self, identity: &ResourceIdentity, version: SchemaVersion) -> Result<Value>;

    /// Merge-patch the status subresource under the v1 schema
    ///
    /// Only `status` of the live object changes; spec and metadata are left
    /// alone. Writing the status is what makes the API server store the
    /// object under v1.
    async fn apply_status_patch(&self, identity: &ResourceIdentity, patch: &Value) -> Result<()>;

    /// Replace the object wholesale with a v1 document, creating it if absent
    async fn apply_full(&self, identity: &ResourceIdentity, document: &Value) -> Result<()>;
}

fn accessor_error(
    kind: &ResourceKind,
    version: SchemaVersion,
    operation: &str,
    target: &str,
    err: impl std::fmt::Display,
) -> Error {
    runmigrate_common::Error::accessor(kind.qualified(version), operation, target, err.to_string())
        .into()
}

/// Real cluster accessor backed by a kube [`Client`]
pub struct KubeAccessor {
    client: Client,
    namespace: String,
}

impl KubeAccessor {
    /// Create an accessor scoped to `namespace`
    pub fn new(client: Client, namespace: impl Into<String>) -> Self {
        Self {
            client,
            namespace: namespace.into(),
        }
    }

    fn api(&self, kind: &ResourceKind, version: SchemaVersion) -> Api<DynamicObject> {
        Api::namespaced_with(
            self.client.clone(),
            &self.namespace,
            &kind.api_resource(version),
        )
    }
}

#[async_trait]
impl ClusterAccessor for KubeAccessor {
    async fn list_names(&self, kind: &ResourceKind) -> Result<Vec<ResourceIdentity>> {
        let version = SchemaVersion::V1;
        let list = self
            .api(kind, version)
            .list(&ListParams::default())
            .await
            .map_err(|e| accessor_error(kind, version, "list", "*", e))?;

        let identities: Vec<ResourceIdentity> = list
            .items
            .into_iter()
            .filter_map(|obj| obj.metadata.name)
            .map(|name| ResourceIdentity::new(kind.clone(), name, self.namespace.as_str()))
            .collect();

        info!(
            kind = %kind.plural,
            namespace = %self.namespace,
            count = identities.len(),
            "listed objects"
        );
        Ok(identities)
    }

    async fn fetch(&self, identity: &ResourceIdentity, version: SchemaVersion) -> Result<Value> {
        let kind = &identity.kind;
        debug!(identity = %identity, version = %version, "fetching object");
        let obj = self
            .api(kind, version)
            .get(&identity.name)
            .await
            .map_err(|e| accessor_error(kind, version, "get", &identity.name, e))?;

        serde_json::to_value(obj).map_err(|e| {
            runmigrate_common::Error::serialization(format!(
                "failed to encode {} ({}): {}",
                identity, version, e
            ))
            .into()
        })
    }

    async fn apply_status_patch(&self, identity: &ResourceIdentity, patch: &Value) -> Result<()> {
        let kind = &identity.kind;
        let version = SchemaVersion::V1;
        self.api(kind, version)
            .patch_status(
                &identity.name,
                &PatchParams::apply(FIELD_MANAGER),
                &Patch::Merge(patch),
            )
            .await
            .map_err(|e| accessor_error(kind, version, "patch-status", &identity.name, e))?;

        debug!(identity = %identity, "patched status subresource");
        Ok(())
    }

    async fn apply_full(&self, identity: &ResourceIdentity, document: &Value) -> Result<()> {
        let kind = &identity.kind;
        let version = SchemaVersion::V1;
        let mut obj: DynamicObject = serde_json::from_value(document.clone()).map_err(|e| {
            runmigrate_common::Error::serialization(format!(
                "invalid document for {}: {}",
                identity, e
            ))
        })?;

        let api = self.api(kind, version);
        let params = PostParams {
            field_manager: Some(FIELD_MANAGER.to_string()),
            ..Default::default()
        };

        match api.replace(&identity.name, &params, &obj).await {
            Ok(_) => {}
            Err(kube::Error::Api(ae)) if ae.code == 404 => {
                debug!(identity = %identity, "object not found, creating it");
                obj.metadata.resource_version = None;
                api.create(&params, &obj)
                    .await
                    .map_err(|e| accessor_error(kind, version, "create", &identity.name, e))?;
            }
            Err(e) => return Err(accessor_error(kind, version, "replace", &identity.name, e)),
        }

        debug!(identity = %identity, "replaced object");
        Ok(())
    }
}
