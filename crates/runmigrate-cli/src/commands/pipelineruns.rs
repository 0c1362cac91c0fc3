//! Pipelineruns command - store PipelineRuns as v1
//!
//! Usage: runmigrate pipelineruns [--namespace <ns>] [--yes]
//!
//! Converting a stored v1beta1 PipelineRun drops the links to its TaskRuns.
//! For every PipelineRun whose v1 status lacks `childReferences`, the links
//! are rebuilt from the v1beta1 status (or from TaskRun names) and written
//! back through the status subresource, which stores the object as v1.
//!
//! Run this only after the v1 CRDs are installed.

use clap::Args;

use runmigrate_common::DEFAULT_PIPELINE_TASK_NAME;

use crate::config::MigrateArgs;
use crate::migration::LinkagePlanner;
use crate::Result;

/// Store PipelineRuns as v1, restoring their TaskRun child references
#[derive(Args, Debug)]
pub struct PipelineRunsArgs {
    #[command(flatten)]
    pub common: MigrateArgs,

    /// Pipeline task name recorded on every restored child reference
    #[arg(long, env = "RUNMIGRATE_PIPELINE_TASK_NAME", default_value = DEFAULT_PIPELINE_TASK_NAME)]
    pub pipeline_task_name: String,
}

pub async fn run(args: PipelineRunsArgs) -> Result<()> {
    let planner = LinkagePlanner::new(&args.common.group, args.pipeline_task_name);
    super::migrate(&args.common, &planner).await
}
