//! Resource identities and schema versions
//!
//! A [`ResourceIdentity`] names one object in one namespace. The same object
//! can be read under either [`SchemaVersion`]; both reads describe the same
//! logical object even though their field layouts differ.

use std::fmt;

use kube::discovery::ApiResource;

use crate::kube_utils::build_api_resource;

/// Stored representation of a resource
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SchemaVersion {
    /// The representation being migrated to
    V1,
    /// The legacy representation objects are still stored under
    V1beta1,
}

impl SchemaVersion {
    /// Version string as it appears in an apiVersion
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaVersion::V1 => "v1",
            SchemaVersion::V1beta1 => "v1beta1",
        }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A namespaced custom resource kind within an API group
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResourceKind {
    /// API group (e.g., "tekton.dev")
    pub group: String,
    /// Kind (e.g., "PipelineRun")
    pub kind: String,
    /// Plural resource name (e.g., "pipelineruns")
    pub plural: String,
}

impl ResourceKind {
    /// Build a kind from its group, kind and plural name
    pub fn new(
        group: impl Into<String>,
        kind: impl Into<String>,
        plural: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            kind: kind.into(),
            plural: plural.into(),
        }
    }

    /// Tekton PipelineRuns in the given group
    pub fn pipeline_runs(group: &str) -> Self {
        Self::new(group, "PipelineRun", "pipelineruns")
    }

    /// Tekton TaskRuns in the given group
    pub fn task_runs(group: &str) -> Self {
        Self::new(group, "TaskRun", "taskruns")
    }

    /// Full apiVersion under a schema version (e.g., "tekton.dev/v1")
    pub fn api_version(&self, version: SchemaVersion) -> String {
        format!("{}/{}", self.group, version)
    }

    /// Fully qualified resource name (e.g., "pipelineruns.v1.tekton.dev")
    pub fn qualified(&self, version: SchemaVersion) -> String {
        format!("{}.{}.{}", self.plural, version, self.group)
    }

    /// ApiResource addressing this kind under a specific schema version
    pub fn api_resource(&self, version: SchemaVersion) -> ApiResource {
        let mut ar = build_api_resource(&self.api_version(version), &self.kind);
        ar.plural = self.plural.clone();
        ar
    }
}

/// Identifies a cluster object within one namespace
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResourceIdentity {
    /// Kind of the object
    pub kind: ResourceKind,
    /// Object name
    pub name: String,
    /// Namespace the object lives in
    pub namespace: String,
}

impl ResourceIdentity {
    /// Create a new identity
    pub fn new(kind: ResourceKind, name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            namespace: namespace.into(),
        }
    }
}

impl fmt::Display for ResourceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind.plural, self.name)
    }
}
