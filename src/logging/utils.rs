//! Utility functions for path resolution, ANSI stripping, and time formatting.
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;

/// Strip ANSI escape sequences from a string.
///
/// Handles SGR sequences (ending in `m`) and other CSI sequences (ending
/// in any letter in the `@`..`~` range).
pub(super) fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            if let Some(next) = chars.next()
                && next == '['
            {
                for inner in chars.by_ref() {
                    if ('@'..='~').contains(&inner) {
                        break;
                    }
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Cache root from `XDG_CACHE_HOME`, else `$HOME/.cache`, else `./.cache`.
pub(super) fn cache_root(xdg_cache_home: Option<OsString>, home: Option<OsString>) -> PathBuf {
    xdg_cache_home
        .filter(|v| !v.is_empty())
        .map_or_else(
            || {
                home.filter(|v| !v.is_empty())
                    .map_or_else(|| PathBuf::from("."), PathBuf::from)
                    .join(".cache")
            },
            PathBuf::from,
        )
}

/// Return the `$XDG_CACHE_HOME/multihome/` directory, creating it if needed.
pub(super) fn multihome_cache_dir() -> Option<PathBuf> {
    let dir = cache_root(std::env::var_os("XDG_CACHE_HOME"), std::env::var_os("HOME"))
        .join("multihome");
    fs::create_dir_all(&dir).ok()?;
    Some(dir)
}

/// Return the log file path for `name` under the multihome cache directory.
pub(super) fn log_file_path(name: &str) -> Option<PathBuf> {
    Some(multihome_cache_dir()?.join(format!("{name}.log")))
}

/// Format the current UTC time as `YYYY-MM-DD HH:MM:SS`.
pub(super) fn format_utc_datetime() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Format the current UTC time as `HH:MM:SS`.
pub(super) fn format_utc_time() -> String {
    chrono::Utc::now().format("%H:%M:%S").to_string()
}
