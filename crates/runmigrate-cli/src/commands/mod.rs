//! CLI commands

use tracing::info;

use runmigrate_common::kube_utils;

use crate::accessor::KubeAccessor;
use crate::config::MigrateArgs;
use crate::migration::confirm::StdinPrompter;
use crate::migration::{BatchOrchestrator, ConfirmationController, ConfirmationState, Planner};
use crate::Result;

pub mod pipelineruns;
pub mod taskruns;

/// Connect to the cluster and run one migration pass with `planner`.
///
/// Prints the per-object report when the pass ends. An operator abort is a
/// clean exit; cluster errors are returned.
pub async fn migrate(args: &MigrateArgs, planner: &dyn Planner) -> Result<()> {
    let client = kube_utils::create_client(args.kubeconfig.as_deref()).await?;
    let accessor = KubeAccessor::new(client, args.namespace.as_str());

    let prompter = StdinPrompter::stdin();
    let confirmation = match args.initial_confirmation() {
        ConfirmationState::PerItem => ConfirmationController::new(prompter),
        ConfirmationState::ApproveAll => ConfirmationController::approving_all(prompter),
    };

    info!(
        namespace = %args.namespace,
        kind = %planner.parent_kind().plural,
        "starting migration"
    );
    let report = BatchOrchestrator::new(&accessor, planner, confirmation)
        .run()
        .await?;

    println!("{}", report);
    if report.aborted() {
        println!("Aborting");
    } else {
        println!("Done. Run the functional tests to make sure everything works as expected.");
    }
    Ok(())
}
