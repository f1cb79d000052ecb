//! Directory, file and timestamp helpers.
use std::fs::{DirBuilder, OpenOptions};
use std::io;
use std::os::unix::fs::DirBuilderExt as _;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};

use crate::text::split_on;

/// Permission bits for directories created by multihome.
pub const DIR_MODE: u32 = 0o755;

/// Create `path` and any missing ancestors with mode `0755`.
///
/// Components that already exist are skipped, so concurrent runs racing on
/// the same tree both succeed. The first other failure is returned as-is.
///
/// # Errors
///
/// Returns the OS error of the first component that could not be created.
pub fn ensure_directory_tree(path: &Path) -> io::Result<()> {
    let mut builder = DirBuilder::new();
    builder.mode(DIR_MODE);

    let Some(text) = path.to_str() else {
        // Not UTF-8: let the standard library walk the components.
        return match builder.recursive(true).create(path) {
            Err(e) if e.kind() != io::ErrorKind::AlreadyExists => Err(e),
            _ => Ok(()),
        };
    };

    let parts = split_on(text, "/");
    let mut prefix = if text.starts_with('/') {
        PathBuf::from("/")
    } else {
        PathBuf::new()
    };

    for part in parts.iter().filter(|p| !p.is_empty()) {
        prefix.push(part);
        match builder.create(&prefix) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {}
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

/// Create `path` as an empty file, truncating it if it exists.
///
/// # Errors
///
/// Returns the OS error if the file cannot be opened for writing.
pub fn touch_file(path: &Path) -> io::Result<()> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map(drop)
}

/// Human-readable stamp used in generated files: `MM-DD-YYYY @ HH:MM:SS`.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use multihome::resources::fs::format_timestamp;
///
/// let at = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
/// assert_eq!(format_timestamp(&at), "03-09-2024 @ 07:05:01");
/// ```
#[must_use]
pub fn format_timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%m-%d-%Y @ %H:%M:%S").to_string()
}
