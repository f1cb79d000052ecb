use std::ffi::OsString;
use std::sync::Arc;

use crate::config::Paths;
use crate::config::host_groups::ResolvedIdentity;
use crate::logging::Logger;
use crate::resources::sync::{CopyMode, SyncTool};

/// Everything a provisioning step needs, built once per run.
#[derive(Debug)]
pub struct Context {
    /// Paths derived from the shared home and resolved hostname.
    pub paths: Paths,
    /// Hostname before and after host-group substitution.
    pub identity: ResolvedIdentity,
    /// Re-sync skeletons and transfers into an existing per-host home.
    pub update: bool,
    /// Write init scripts instead of printing the per-host path.
    pub script: bool,
    /// How the program was invoked (`argv[0]`).
    pub entry_point: OsString,
    /// Sync tool used for skeletons and `T` directives.
    pub sync: SyncTool,
    /// Logger for output and task recording.
    pub log: Arc<Logger>,
}

impl Context {
    /// Copy mode implied by update mode.
    #[must_use]
    pub const fn copy_mode(&self) -> CopyMode {
        CopyMode::for_update(self.update)
    }

    /// Whether the per-host home has been provisioned before.
    #[must_use]
    pub fn marker_present(&self) -> bool {
        self.paths.marker.symlink_metadata().is_ok()
    }

    /// Whether skeletons and transfers should be (re)applied this run.
    #[must_use]
    pub fn wants_injection(&self) -> bool {
        self.update || !self.marker_present()
    }
}
