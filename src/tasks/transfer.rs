//! Execute the transfer file against the per-host home.
use std::path::Path;

use anyhow::Result;

use super::{Context, Task, TaskResult};
use crate::config::lines::{self, CommentStyle, Diagnostic};
use crate::config::transfer::{TransferDirective, TransferKind, parse_directive};
use crate::error::ConfigError;
use crate::logging::Logger;
use crate::resources::link::LinkResource;
use crate::resources::sync::{CopyMode, SyncTool, failure_message};
use crate::resources::{Applicable as _, Resource as _, ResourceChange};

/// Counts for one pass over the transfer file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransferReport {
    /// Links created or copies that exited 0.
    pub applied: usize,
    /// Links that already pointed where they should.
    pub already_present: usize,
    /// Directives whose link or copy did not succeed.
    pub failed: usize,
    /// Lines that did not parse into a directive.
    pub invalid: usize,
}

enum Outcome {
    Applied,
    AlreadyPresent,
    Failed(String),
}

/// Apply every directive of the transfer file at `file`, in order.
///
/// Sources are resolved under `old_root`; destinations are the source's
/// final component directly under `new_root`. Per-line problems are logged
/// as warnings and never stop the pass. A missing file applies nothing.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file exists but cannot be read.
pub fn apply_transfer_directives(
    file: &Path,
    old_root: &Path,
    new_root: &Path,
    mode: CopyMode,
    sync: &SyncTool,
    log: &Logger,
) -> Result<TransferReport, ConfigError> {
    let text = lines::read_config(file)?;
    let mut report = TransferReport::default();
    for d in &text.diagnostics {
        log.warn(&d.to_string());
        report.invalid += 1;
    }

    for line in lines::meaningful_lines(&text.content, CommentStyle::FirstColumn) {
        let (directive, diagnostics) = parse_directive(file, line);
        for d in &diagnostics {
            log.warn(&d.to_string());
        }
        let Some(directive) = directive else {
            report.invalid += 1;
            continue;
        };

        match apply_one(&directive, old_root, new_root, mode, sync, log) {
            Outcome::Applied => report.applied += 1,
            Outcome::AlreadyPresent => report.already_present += 1,
            Outcome::Failed(message) => {
                log.warn(&Diagnostic::new(file, directive.line, message).to_string());
                report.failed += 1;
            }
        }
    }

    log.debug(&format!(
        "transfer: {} applied, {} already present, {} failed, {} invalid",
        report.applied, report.already_present, report.failed, report.invalid
    ));
    Ok(report)
}

fn apply_one(
    directive: &TransferDirective,
    old_root: &Path,
    new_root: &Path,
    mode: CopyMode,
    sync: &SyncTool,
    log: &Logger,
) -> Outcome {
    let source = old_root.join(&directive.path);
    let Some(name) = source.file_name() else {
        return Outcome::Failed(format!("no destination name for {}", source.display()));
    };
    let dest = new_root.join(name);

    let link = match directive.kind {
        TransferKind::SymLink => LinkResource::symbolic(source, dest),
        TransferKind::HardLink => LinkResource::hard(source, dest),
        TransferKind::Copy => {
            log.debug(&format!("copy {} -> {}", source.display(), dest.display()));
            return match sync.copy(&source, &dest, mode) {
                Ok(result) if result.success() => Outcome::Applied,
                Ok(result) => Outcome::Failed(failure_message(&source, &result)),
                Err(e) => Outcome::Failed(e.to_string()),
            };
        }
    };

    log.debug(&format!("{} {}", directive.kind, link.description()));
    match link.ensure() {
        Ok(ResourceChange::Applied) => Outcome::Applied,
        Ok(ResourceChange::AlreadyCorrect) => Outcome::AlreadyPresent,
        Ok(ResourceChange::Skipped { reason }) => {
            Outcome::Failed(format!("{}: {reason}", link.dest.display()))
        }
        Err(e) => Outcome::Failed(format!("{e:#}")),
    }
}

/// Apply the transfer file on first provisioning and in update mode.
#[derive(Debug)]
pub struct ApplyTransfers;

impl Task for ApplyTransfers {
    fn name(&self) -> &'static str {
        "Apply transfers"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.wants_injection()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let report = match apply_transfer_directives(
            &ctx.paths.transfer_config,
            &ctx.paths.old_home,
            &ctx.paths.new_home,
            ctx.copy_mode(),
            &ctx.sync,
            &ctx.log,
        ) {
            Ok(report) => report,
            Err(e) => {
                ctx.log.warn(&e.to_string());
                return Ok(TaskResult::Skipped("transfer file unreadable".to_string()));
            }
        };

        if report == TransferReport::default() {
            return Ok(TaskResult::Skipped("no directives".to_string()));
        }
        Ok(TaskResult::Ok)
    }
}
