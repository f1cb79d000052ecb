//! Recursive copies through `rsync`.
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::ExecError;
use crate::exec::{self, ExecResult, Executor};

/// Name of the sync tool looked up on `PATH`.
pub const SYNC_PROGRAM: &str = "rsync";

/// Whether a copy may overwrite newer files at the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CopyMode {
    /// Mirror the source.
    #[default]
    Normal,
    /// Skip files that are newer (or as new) at the destination.
    UpdateOnly,
}

impl CopyMode {
    /// Mode for a run with or without `--update`.
    #[must_use]
    pub const fn for_update(update: bool) -> Self {
        if update { Self::UpdateOnly } else { Self::Normal }
    }
}

/// Arguments passed to the sync tool for one copy.
#[must_use]
pub fn sync_args(source: &Path, dest: &Path, mode: CopyMode) -> Vec<OsString> {
    let mut args = vec![OsString::from("-aq")];
    if mode == CopyMode::UpdateOnly {
        args.push(OsString::from("--update"));
    }
    args.push(source.as_os_str().to_os_string());
    args.push(dest.as_os_str().to_os_string());
    args
}

/// Copy `source` to `dest` with the sync tool at `program`.
///
/// Returns the tool's result; a non-zero code is not an error here, see
/// [`failure_message`].
///
/// # Errors
///
/// Returns [`ExecError`] if the tool cannot be started.
///
/// # Panics
///
/// Panics if `source` or `dest` is empty.
pub fn bulk_copy(
    executor: &dyn Executor,
    program: &Path,
    source: &Path,
    dest: &Path,
    mode: CopyMode,
) -> Result<ExecResult, ExecError> {
    assert!(!source.as_os_str().is_empty(), "bulk_copy: empty source");
    assert!(!dest.as_os_str().is_empty(), "bulk_copy: empty destination");

    let args = sync_args(source, dest, mode);
    let refs: Vec<&OsStr> = args.iter().map(OsString::as_os_str).collect();
    executor.run_unchecked(program, &refs)
}

/// Describe a copy of `source` that exited non-zero, including what the
/// tool printed on stderr.
#[must_use]
pub fn failure_message(source: &Path, result: &ExecResult) -> String {
    let reason = result.stderr.trim();
    if reason.is_empty() {
        format!("{}: sync exited with status {}", source.display(), result.code)
    } else {
        format!(
            "{}: sync exited with status {}: {reason}",
            source.display(),
            result.code
        )
    }
}

/// `dir` with a trailing `/`, so the sync tool copies its contents rather
/// than the directory itself.
#[must_use]
pub fn contents_of(dir: &Path) -> PathBuf {
    let mut raw = dir.as_os_str().to_os_string();
    if !raw.to_string_lossy().ends_with('/') {
        raw.push("/");
    }
    PathBuf::from(raw)
}

/// A located sync tool together with the executor that runs it.
#[derive(Debug, Clone)]
pub struct SyncTool {
    program: PathBuf,
    executor: Arc<dyn Executor>,
}

impl SyncTool {
    /// Use the tool at `program`.
    #[must_use]
    pub fn new(program: PathBuf, executor: Arc<dyn Executor>) -> Self {
        Self { program, executor }
    }

    /// Find [`SYNC_PROGRAM`] on `PATH`.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError::NotFound`] if it is not installed.
    pub fn locate(executor: Arc<dyn Executor>) -> Result<Self, ExecError> {
        let program = exec::find_executable(OsStr::new(SYNC_PROGRAM))
            .ok_or_else(|| ExecError::NotFound(SYNC_PROGRAM.to_string()))?;
        Ok(Self::new(program, executor))
    }

    /// Absolute path of the tool.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Executor used to run the tool.
    #[must_use]
    pub fn executor(&self) -> &dyn Executor {
        self.executor.as_ref()
    }

    /// See [`bulk_copy`].
    ///
    /// # Errors
    ///
    /// Returns [`ExecError`] if the tool cannot be started.
    pub fn copy(
        &self,
        source: &Path,
        dest: &Path,
        mode: CopyMode,
    ) -> Result<ExecResult, ExecError> {
        bulk_copy(self.executor.as_ref(), &self.program, source, dest, mode)
    }

    /// Run the tool with `--version`.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError`] if the tool cannot be started.
    pub fn version(&self) -> Result<ExecResult, ExecError> {
        self.executor
            .run_unchecked(&self.program, &[OsStr::new("--version")])
    }
}
