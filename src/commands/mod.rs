//! Top-level command orchestration: provisioning and the self-test.
pub mod provision;

use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};

use crate::config::Paths;
use crate::config::host_groups;
use crate::config::layout::{SYSTEM_SKELETON_DIR, check_home_name};
use crate::error::ConfigError;
use crate::host::{self, HomeSource};
use crate::logging::Logger;
use crate::resources::sync::SyncTool;
use crate::tasks::{self, Context, Task};

/// Inputs of one run, gathered from the environment and the command line.
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Shared home directory.
    pub home: PathBuf,
    /// Where `home` came from.
    pub home_source: HomeSource,
    /// Node name, possibly with a domain part.
    pub nodename: String,
    /// Update mode.
    pub update: bool,
    /// Script mode.
    pub script: bool,
    /// `argv[0]`.
    pub entry_point: OsString,
    /// Located sync tool.
    pub sync: SyncTool,
    /// OS skeleton directory, normally `/etc/skel`.
    pub system_skeleton_dir: PathBuf,
}

impl Invocation {
    /// Gather the home directory and node name of this process.
    ///
    /// `hostname` overrides the kernel node name.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory or node name cannot be
    /// determined.
    pub fn detect(
        update: bool,
        script: bool,
        hostname: Option<String>,
        entry_point: OsString,
        sync: SyncTool,
    ) -> Result<Self> {
        let (home, home_source) = host::home_directory(update)?;
        let nodename = match hostname {
            Some(name) => name,
            None => host::nodename()?,
        };
        Ok(Self {
            home,
            home_source,
            nodename,
            update,
            script,
            entry_point,
            sync,
            system_skeleton_dir: PathBuf::from(SYSTEM_SKELETON_DIR),
        })
    }
}

/// Resolve the host identity and derive every path of the run.
///
/// Host-group rules are read from the shared home before anything else is
/// computed; their diagnostics are logged as warnings.
///
/// # Errors
///
/// Returns an error if the host-group file exists but cannot be read, or if
/// the resolved name cannot be used as a directory name.
pub fn setup(inv: Invocation, log: &Arc<Logger>) -> Result<Context> {
    let short = host::short_hostname(&inv.nodename);
    log.debug(&format!(
        "home {} (from {:?}), node {}",
        inv.home.display(),
        inv.home_source,
        inv.nodename
    ));

    let rules = Paths::host_group_config_for(&inv.home);
    let resolution = host_groups::resolve_host_identity(short, &rules)
        .with_context(|| format!("resolving host group for {short}"))?;
    for d in &resolution.diagnostics {
        log.warn(&d.to_string());
    }
    let identity = resolution.identity;
    if identity.matched {
        log.debug(&format!(
            "host group: {} -> {}",
            identity.short_hostname, identity.resolved
        ));
    }
    check_home_name(&identity.resolved).map_err(|reason| ConfigError::InvalidHomeName {
        name: identity.resolved.clone(),
        hostname: inv.nodename.clone(),
        reason,
    })?;

    let paths =
        Paths::derive(&inv.home, &identity.resolved).with_system_skeleton(&inv.system_skeleton_dir);

    Ok(Context {
        paths,
        identity,
        update: inv.update,
        script: inv.script,
        entry_point: inv.entry_point,
        sync: inv.sync,
        log: Arc::clone(log),
    })
}

/// Execute every task in order, print the summary, and bail if any task failed.
///
/// Unlike provisioning, a failing task does not stop the remaining ones.
///
/// # Errors
///
/// Returns an error if one or more tasks recorded a failure.
pub fn run_tasks_to_completion<'a>(
    tasks: impl IntoIterator<Item = &'a dyn Task>,
    ctx: &Context,
    log: &Logger,
) -> Result<()> {
    for task in tasks {
        log.stage(task.name());
        if let Err(e) = tasks::execute(task, ctx) {
            log.error(&format!("{}: {e:#}", task.name()));
        }
    }

    log.print_summary();

    if log.has_failures() {
        anyhow::bail!("{} task(s) failed", log.failure_count());
    }
    Ok(())
}
