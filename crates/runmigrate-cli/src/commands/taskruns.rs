//! Taskruns command - store TaskRuns as v1
//!
//! Usage: runmigrate taskruns [--namespace <ns>] [--yes]
//!
//! Every TaskRun still stored as v1beta1 is converted on each read. Writing
//! back the v1 view of each TaskRun makes v1 the stored representation.

use clap::Args;

use runmigrate_common::ResourceKind;

use crate::config::MigrateArgs;
use crate::migration::StorageRewritePlanner;
use crate::Result;

/// Store TaskRuns as v1
#[derive(Args, Debug)]
pub struct TaskRunsArgs {
    #[command(flatten)]
    pub common: MigrateArgs,
}

pub async fn run(args: TaskRunsArgs) -> Result<()> {
    let planner = StorageRewritePlanner::new(ResourceKind::task_runs(&args.common.group));
    super::migrate(&args.common, &planner).await
}
