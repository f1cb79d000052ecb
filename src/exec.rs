//! External process execution and executable lookup.
use std::ffi::{OsStr, OsString};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Output};

use crate::error::ExecError;

/// Exit status shells report for a command that could not be found.
pub const EXIT_NOT_FOUND: i32 = 127;

/// Result of a command execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecResult {
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
    /// Integer exit code; a child killed by signal `n` reports `128 + n`.
    pub code: i32,
}

impl ExecResult {
    /// Whether the child exited with status zero.
    #[must_use]
    pub const fn success(&self) -> bool {
        self.code == 0
    }
}

impl From<Output> for ExecResult {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            code: exit_code_of(output.status),
        }
    }
}

/// Map an [`ExitStatus`] to a single integer code.
#[must_use]
pub fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt as _;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    -1
}

/// Abstraction over spawning external programs.
///
/// Production code uses [`SystemExecutor`]; tests substitute a recorder so
/// that no real `rsync` is needed.
pub trait Executor: Send + Sync + std::fmt::Debug {
    /// Run `program` with `args`, wait for it, and return its captured output.
    ///
    /// A non-zero exit is *not* an error; inspect [`ExecResult::code`].
    ///
    /// # Errors
    ///
    /// Returns [`ExecError::NotFound`] when the program does not exist (or
    /// exits with status 127), and [`ExecError::Spawn`] for any other
    /// failure to start or wait on the child.
    fn run_unchecked(&self, program: &Path, args: &[&OsStr]) -> Result<ExecResult, ExecError>;
}

/// [`Executor`] that spawns real child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

impl Executor for SystemExecutor {
    fn run_unchecked(&self, program: &Path, args: &[&OsStr]) -> Result<ExecResult, ExecError> {
        let label = program.display().to_string();
        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|source| match source.kind() {
                io::ErrorKind::NotFound => ExecError::NotFound(label.clone()),
                _ => ExecError::Spawn {
                    program: label.clone(),
                    source,
                },
            })?;
        let result = ExecResult::from(output);
        if result.code == EXIT_NOT_FOUND {
            return Err(ExecError::NotFound(label));
        }
        Ok(result)
    }
}

/// Locate `name` the way a shell would, using the process `PATH`.
///
/// See [`find_executable_in`].
#[must_use]
pub fn find_executable(name: &OsStr) -> Option<PathBuf> {
    find_executable_in(name, std::env::var_os("PATH"))
}

/// Locate `name` using an explicit `PATH` value.
///
/// A name containing a path separator (including `./prog`) is taken
/// literally and only checked for existence. Otherwise every entry of
/// `path_var` is searched in order. The hit is returned as an absolute,
/// canonical path; `None` means the program was not found.
#[must_use]
pub fn find_executable_in(name: &OsStr, path_var: Option<OsString>) -> Option<PathBuf> {
    if name.is_empty() {
        return None;
    }
    let literal = Path::new(name);
    if literal.components().count() > 1 || name.to_string_lossy().starts_with("./") {
        return if literal.exists() {
            dunce::canonicalize(literal).ok()
        } else {
            None
        };
    }
    let cwd = std::env::current_dir().ok()?;
    let found = which::which_in(name, path_var, cwd).ok()?;
    dunce::canonicalize(found).ok()
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[cfg(unix)]
    fn make_executable(path: &Path) {
        use std::os::unix::fs::PermissionsExt as _;
        std::fs::write(path, "#!/bin/sh\nexit 0\n").unwrap();
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[test]
    fn run_echo() {
        let result = SystemExecutor
            .run_unchecked(Path::new("/bin/echo"), &[OsStr::new("testing")])
            .unwrap();
        assert!(result.success(), "echo should succeed");
        assert_eq!(result.stdout.trim(), "testing");
    }

    #[test]
    fn run_failure_reports_code() {
        let result = SystemExecutor
            .run_unchecked(Path::new("/bin/sh"), &[OsStr::new("-c"), OsStr::new("exit 3")])
            .unwrap();
        assert_eq!(result.code, 3);
        assert!(!result.success());
    }

    #[test]
    fn missing_program_is_not_found() {
        let err = SystemExecutor
            .run_unchecked(Path::new("/bin/unlikelyToExistAnywhere"), &[])
            .unwrap_err();
        assert!(matches!(err, ExecError::NotFound(_)), "got {err:?}");
    }

    #[test]
    fn exit_127_is_not_found() {
        let err = SystemExecutor
            .run_unchecked(Path::new("/bin/sh"), &[OsStr::new("-c"), OsStr::new("exit 127")])
            .unwrap_err();
        assert!(matches!(err, ExecError::NotFound(_)), "got {err:?}");
    }

    #[cfg(unix)]
    #[test]
    fn signal_maps_above_128() {
        let result = SystemExecutor
            .run_unchecked(
                Path::new("/bin/sh"),
                &[OsStr::new("-c"), OsStr::new("kill -TERM $$")],
            )
            .unwrap();
        assert_eq!(result.code, 128 + 15);
    }

    #[cfg(unix)]
    #[test]
    fn find_executable_searches_path_entries_in_order() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        make_executable(&second.path().join("tool"));
        make_executable(&first.path().join("tool"));

        let path_var = std::env::join_paths([first.path(), second.path()]).unwrap();
        let found = find_executable_in(OsStr::new("tool"), Some(path_var)).unwrap();
        assert_eq!(
            found,
            dunce::canonicalize(first.path().join("tool")).unwrap()
        );
    }

    #[test]
    fn find_executable_returns_none_when_missing() {
        let empty = tempfile::tempdir().unwrap();
        let path_var = std::env::join_paths([empty.path()]).unwrap();
        assert!(find_executable_in(OsStr::new("nope-12345"), Some(path_var)).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn find_executable_takes_paths_literally() {
        let dir = tempfile::tempdir().unwrap();
        let tool = dir.path().join("tool");
        make_executable(&tool);

        // Not on the (empty) PATH, but a path with a separator is checked directly.
        let found = find_executable_in(tool.as_os_str(), Some(OsString::new())).unwrap();
        assert_eq!(found, dunce::canonicalize(&tool).unwrap());
        assert!(
            find_executable_in(dir.path().join("absent").as_os_str(), None).is_none(),
            "missing literal path should not be found"
        );
    }

    #[test]
    fn find_executable_rejects_empty_name() {
        assert!(find_executable_in(OsStr::new(""), None).is_none());
    }
}
