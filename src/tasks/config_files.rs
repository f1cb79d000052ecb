//! Configuration directory scaffolding in the shared home.
use anyhow::Result;

use super::{Context, Task, TaskResult};
use crate::error::ProvisionError;
use crate::resources::fs::{ensure_directory_tree, touch_file};

/// Create `.multihome/skel/` (and `.multihome/` with it).
#[derive(Debug)]
pub struct EnsureSkeletonDir;

impl Task for EnsureSkeletonDir {
    fn name(&self) -> &'static str {
        "Create skeleton directory"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let path = &ctx.paths.skeleton_dir;
        if path.is_dir() {
            return Ok(TaskResult::Skipped("already exists".to_string()));
        }
        ensure_directory_tree(path).map_err(|source| ProvisionError::CreateDir {
            path: path.clone(),
            source,
        })?;
        Ok(TaskResult::Ok)
    }
}

/// Create an empty transfer file so users have something to edit.
///
/// An existing file is never truncated.
#[derive(Debug)]
pub struct EnsureTransferConfig;

impl Task for EnsureTransferConfig {
    fn name(&self) -> &'static str {
        "Create transfer config"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let path = &ctx.paths.transfer_config;
        if path.symlink_metadata().is_ok() {
            return Ok(TaskResult::Skipped("already exists".to_string()));
        }
        touch_file(path).map_err(|source| ProvisionError::Touch {
            path: path.clone(),
            source,
        })?;
        Ok(TaskResult::Ok)
    }
}
