//! Domain-specific error types for multihome.
//!
//! Internal modules return typed errors built with [`thiserror`]; command
//! handlers at the CLI boundary convert them to [`anyhow::Error`] via `?`.
//! [`exit_code`] then turns whatever reached `main` into a process exit code.
//!
//! # Error types
//!
//! ```text
//! ConfigError:    home directory, node name, config files
//! ProvisionError: per-host home creation and scripts
//! ExecError:      external programs (rsync)
//! ```

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that arise while gathering the inputs of a run.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Neither the environment nor the account database names a home directory.
    #[error("Unable to determine home directory path")]
    HomeUnknown,

    /// The node name of this machine could not be read.
    #[error("Unable to determine hostname: {0}")]
    HostnameUnavailable(String),

    /// The name the per-host home would be created under is unusable.
    #[error("Invalid per-host home name {name:?} (from hostname {hostname:?}): {reason}")]
    InvalidHomeName {
        /// Resolved name.
        name: String,
        /// Node name it was derived from.
        hostname: String,
        /// Why it cannot be used.
        reason: String,
    },

    /// A config file exists but could not be read.
    #[error("IO error reading config file {}: {source}", path.display())]
    Io {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

/// Errors that abort provisioning of the per-host home.
#[derive(Error, Debug)]
pub enum ProvisionError {
    /// The tool was started from inside an already provisioned home.
    #[error("multihome cannot be nested (found {})", marker.display())]
    Nested {
        /// Marker file found in the current home.
        marker: PathBuf,
    },

    /// A core directory could not be created.
    #[error("cannot create directory {}: {source}", path.display())]
    CreateDir {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The link back to the shared home could not be created.
    #[error("cannot create symlink {} -> {}: {source}", link.display(), target.display())]
    Symlink {
        /// Path of the link.
        link: PathBuf,
        /// Where the link points.
        target: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A hard link could not be created.
    #[error("cannot create hard link {} => {}: {source}", link.display(), target.display())]
    HardLink {
        /// Path of the new link.
        link: PathBuf,
        /// Existing file it shares an inode with.
        target: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A marker or config file could not be created.
    #[error("cannot create file {}: {source}", path.display())]
    Touch {
        /// File that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// An init script could not be written.
    #[error("cannot write init script {}: {source}", path.display())]
    WriteScript {
        /// Script path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The running program could not be located for script generation.
    #[error("cannot locate the multihome program ({0})")]
    SelfLookup(String),
}

/// Errors that arise from spawning external programs.
#[derive(Error, Debug)]
pub enum ExecError {
    /// The program does not exist (historically exit status 127).
    #[error("command not found: {0}")]
    NotFound(String),

    /// The program exists but could not be started or waited on.
    #[error("failed to execute {program}: {source}")]
    Spawn {
        /// Program that failed to start.
        program: String,
        /// Underlying I/O error.
        source: io::Error,
    },
}

/// Derive a process exit code from an error that reached `main`.
///
/// The first [`io::Error`] in the chain that carries an OS error number
/// wins; every other failure exits with `1`.
#[must_use]
pub fn exit_code(err: &anyhow::Error) -> u8 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<io::Error>())
        .and_then(io::Error::raw_os_error)
        .and_then(|code| u8::try_from(code).ok())
        .filter(|&code| code != 0)
        .unwrap_or(1)
}
