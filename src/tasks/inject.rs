//! Seed the per-host home from the OS and user skeleton directories.
use anyhow::Result;

use super::{Context, Task, TaskResult};
use crate::resources::sync::{contents_of, failure_message};

/// Copy `/etc/skel/` and then `.multihome/skel/` into the per-host home.
///
/// Runs on first provisioning and on every update-mode run.
#[derive(Debug)]
pub struct InjectSkeletons;

impl Task for InjectSkeletons {
    fn name(&self) -> &'static str {
        "Inject skeletons"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.wants_injection()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let mode = ctx.copy_mode();
        let mut copied = 0usize;

        for dir in [&ctx.paths.system_skeleton_dir, &ctx.paths.skeleton_dir] {
            if !dir.is_dir() {
                ctx.log
                    .debug(&format!("no skeleton at {}, skipping", dir.display()));
                continue;
            }
            let source = contents_of(dir);
            ctx.log.debug(&format!(
                "syncing {} -> {} ({mode:?})",
                source.display(),
                ctx.paths.new_home.display()
            ));
            let result = ctx.sync.copy(&source, &ctx.paths.new_home, mode)?;
            if result.success() {
                copied += 1;
            } else {
                ctx.log.warn(&failure_message(&source, &result));
            }
        }

        if copied == 0 {
            return Ok(TaskResult::Skipped("nothing copied".to_string()));
        }
        Ok(TaskResult::Ok)
    }
}
