//! Named provisioning steps, executed in order.
pub mod config_files;
mod context;
pub mod home;
pub mod init_script;
pub mod inject;
pub mod transfer;

pub use context::Context;

use anyhow::Result;

use crate::logging::TaskStatus;

/// Outcome of a task that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskResult {
    /// Task did its work.
    Ok,
    /// Task had nothing to do.
    Skipped(String),
}

/// A named, executable step.
pub trait Task {
    /// Human-readable task name.
    fn name(&self) -> &str;

    /// Whether this task applies to the current run.
    fn should_run(&self, ctx: &Context) -> bool;

    /// Execute the task.
    ///
    /// # Errors
    ///
    /// Returns an error if the step cannot complete; during provisioning
    /// that aborts the run.
    fn run(&self, ctx: &Context) -> Result<TaskResult>;
}

/// The provisioning sequence, in execution order.
#[must_use]
pub fn all_provision_tasks() -> Vec<Box<dyn Task>> {
    vec![
        Box::new(home::EnsureHomeTree),
        Box::new(home::EnsureTopdirLink),
        Box::new(config_files::EnsureSkeletonDir),
        Box::new(config_files::EnsureTransferConfig),
        Box::new(inject::InjectSkeletons),
        Box::new(transfer::ApplyTransfers),
        Box::new(home::EnsureMarker),
        Box::new(init_script::GenerateInitScripts),
    ]
}

/// Execute a task, recording the result in the logger.
///
/// # Errors
///
/// Returns the task's error after recording it as failed.
pub fn execute(task: &dyn Task, ctx: &Context) -> Result<()> {
    if !task.should_run(ctx) {
        ctx.log
            .debug(&format!("skipping task: {} (not applicable)", task.name()));
        ctx.log
            .record_task(task.name(), TaskStatus::NotApplicable, None);
        return Ok(());
    }

    ctx.log.debug(&format!("running task: {}", task.name()));

    match task.run(ctx) {
        Ok(TaskResult::Ok) => {
            ctx.log.record_task(task.name(), TaskStatus::Ok, None);
            Ok(())
        }
        Ok(TaskResult::Skipped(reason)) => {
            ctx.log.debug(&format!("{}: skipped: {reason}", task.name()));
            ctx.log
                .record_task(task.name(), TaskStatus::Skipped, Some(&reason));
            Ok(())
        }
        Err(e) => {
            ctx.log
                .record_task(task.name(), TaskStatus::Failed, Some(&format!("{e:#}")));
            Err(e)
        }
    }
}
