//! Common types for runmigrate: errors, resource identities, and kube helpers

#![deny(missing_docs)]

pub mod error;
pub mod kube_utils;
pub mod resource;

pub use error::Error;
pub use resource::{ResourceIdentity, ResourceKind, SchemaVersion};

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Namespace the build pipeline runs live in
pub const DEFAULT_NAMESPACE: &str = "image-build";

/// API group of the Tekton pipeline resources
pub const TEKTON_GROUP: &str = "tekton.dev";

/// Pipeline task every build pipeline run launches
pub const DEFAULT_PIPELINE_TASK_NAME: &str = "build-from-git";

/// Field manager recorded on every write issued by the migration
pub const FIELD_MANAGER: &str = "runmigrate";
