//! Options shared by every migration command
//!
//! Each option can also be set through the environment:
//! - `RUNMIGRATE_NAMESPACE` - namespace holding the runs (default `image-build`)
//! - `RUNMIGRATE_GROUP` - API group of the run kinds (default `tekton.dev`)
//! - `RUNMIGRATE_KUBECONFIG` - kubeconfig path; when unset, kube's own
//!   resolution applies (`KUBECONFIG`, `~/.kube/config`, in-cluster)

use std::path::PathBuf;

use clap::Args;

use runmigrate_common::{DEFAULT_NAMESPACE, TEKTON_GROUP};

use crate::migration::ConfirmationState;

/// Cluster and confirmation options for a migration pass
#[derive(Args, Debug, Clone)]
pub struct MigrateArgs {
    /// Namespace to migrate
    #[arg(short = 'n', long, env = "RUNMIGRATE_NAMESPACE", default_value = DEFAULT_NAMESPACE)]
    pub namespace: String,

    /// API group of the migrated kinds
    #[arg(long, env = "RUNMIGRATE_GROUP", default_value = TEKTON_GROUP)]
    pub group: String,

    /// Path to kubeconfig file
    #[arg(short = 'k', long, env = "RUNMIGRATE_KUBECONFIG")]
    pub kubeconfig: Option<PathBuf>,

    /// Apply every change without asking
    #[arg(short = 'y', long)]
    pub yes: bool,
}

impl MigrateArgs {
    /// Confirmation state the run starts in
    pub fn initial_confirmation(&self) -> ConfirmationState {
        if self.yes {
            ConfirmationState::ApproveAll
        } else {
            ConfirmationState::PerItem
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: MigrateArgs,
    }

    #[test]
    fn defaults_target_build_namespace() {
        let cli = TestCli::parse_from(["test"]);
        assert_eq!(cli.args.namespace, "image-build");
        assert_eq!(cli.args.group, "tekton.dev");
        assert_eq!(cli.args.initial_confirmation(), ConfirmationState::PerItem);
    }

    #[test]
    fn yes_starts_in_approve_all() {
        let cli = TestCli::parse_from(["test", "-y", "--namespace", "builds"]);
        assert_eq!(cli.args.namespace, "builds");
        assert_eq!(
            cli.args.initial_confirmation(),
            ConfirmationState::ApproveAll
        );
    }
}
