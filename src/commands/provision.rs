//! Provision the per-host home and report where it is.
use std::path::PathBuf;

use anyhow::Result;

use crate::error::ProvisionError;
use crate::tasks::{self, Context};

/// What a provisioning run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// The per-host home (or the shared home on a pass-through).
    pub new_home: PathBuf,
    /// Whether init scripts were written instead of a path to print.
    pub scripts_written: bool,
}

/// Provision the per-host home described by `ctx`.
///
/// Steps run in order and the first failing step aborts the run.
///
/// # Errors
///
/// Returns [`ProvisionError::Nested`] when started from inside a provisioned
/// home outside update mode, or the error of the first failing step.
pub fn run(ctx: &Context) -> Result<Outcome> {
    let paths = &ctx.paths;

    if !ctx.update && paths.nested_marker.symlink_metadata().is_ok() {
        return Err(ProvisionError::Nested {
            marker: paths.nested_marker.clone(),
        }
        .into());
    }

    if paths.is_pass_through() {
        ctx.log.debug(&format!(
            "{} is already the per-host home, nothing to do",
            paths.new_home.display()
        ));
        return Ok(Outcome {
            new_home: paths.new_home.clone(),
            scripts_written: false,
        });
    }

    for task in tasks::all_provision_tasks() {
        tasks::execute(task.as_ref(), ctx)?;
    }

    Ok(Outcome {
        new_home: paths.new_home.clone(),
        scripts_written: ctx.script,
    })
}
