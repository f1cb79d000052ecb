//! The per-host home itself: directory tree, link back, and marker.
use anyhow::Result;

use super::{Context, Task, TaskResult};
use crate::error::ProvisionError;
use crate::resources::fs::{ensure_directory_tree, touch_file};
use crate::resources::link::LinkResource;
use crate::resources::{Applicable as _, Resource as _, ResourceChange};

/// Create `<old>/home_local/<resolved>` and its ancestors.
#[derive(Debug)]
pub struct EnsureHomeTree;

impl Task for EnsureHomeTree {
    fn name(&self) -> &'static str {
        "Create per-host home"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let path = &ctx.paths.new_home;
        if path.is_dir() {
            return Ok(TaskResult::Skipped("already exists".to_string()));
        }
        ensure_directory_tree(path).map_err(|source| ProvisionError::CreateDir {
            path: path.clone(),
            source,
        })?;
        ctx.log.info(&format!("created {}", path.display()));
        Ok(TaskResult::Ok)
    }
}

/// Link `<new>/topdir` back to the shared home.
#[derive(Debug)]
pub struct EnsureTopdirLink;

impl Task for EnsureTopdirLink {
    fn name(&self) -> &'static str {
        "Link topdir"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let link = LinkResource::symbolic(ctx.paths.old_home.clone(), ctx.paths.topdir.clone());
        match link.ensure()? {
            ResourceChange::Applied => {
                ctx.log.debug(&format!("linked {}", link.description()));
                Ok(TaskResult::Ok)
            }
            ResourceChange::AlreadyCorrect => {
                Ok(TaskResult::Skipped("already linked".to_string()))
            }
            ResourceChange::Skipped { reason } => {
                ctx.log
                    .warn(&format!("{}: {reason}", ctx.paths.topdir.display()));
                Ok(TaskResult::Skipped(reason))
            }
        }
    }
}

/// Create the marker that records a completed first provisioning.
#[derive(Debug)]
pub struct EnsureMarker;

impl Task for EnsureMarker {
    fn name(&self) -> &'static str {
        "Write marker"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        if ctx.marker_present() {
            return Ok(TaskResult::Skipped("already provisioned".to_string()));
        }
        let path = &ctx.paths.marker;
        touch_file(path).map_err(|source| ProvisionError::Touch {
            path: path.clone(),
            source,
        })?;
        Ok(TaskResult::Ok)
    }
}
