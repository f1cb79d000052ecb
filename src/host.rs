//! Facts about the machine and account multihome runs for.
use std::ffi::OsString;
use std::path::PathBuf;

use crate::error::ConfigError;

/// Environment variable holding the shared home while inside a per-host home.
pub const HOME_OLD_VAR: &str = "HOME_OLD";

/// Where the home directory of a run came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeSource {
    /// `HOME_OLD`, exported by the generated init scripts.
    HomeOld,
    /// `HOME`.
    Home,
    /// The account database entry of the effective user.
    AccountDatabase,
}

/// Read the node name of this machine.
///
/// # Errors
///
/// Returns [`ConfigError::HostnameUnavailable`] if the kernel call fails or
/// the name is not valid UTF-8.
pub fn nodename() -> Result<String, ConfigError> {
    let name = nix::unistd::gethostname()
        .map_err(|e| ConfigError::HostnameUnavailable(e.to_string()))?;
    name.into_string().map_err(|raw| {
        ConfigError::HostnameUnavailable(format!("not valid UTF-8: {}", raw.to_string_lossy()))
    })
}

/// Drop the domain part of a hostname.
///
/// # Examples
///
/// ```
/// use multihome::host::short_hostname;
///
/// assert_eq!(short_hostname("subdomain.domain.tld"), "subdomain");
/// assert_eq!(short_hostname("web01"), "web01");
/// ```
#[must_use]
pub fn short_hostname(name: &str) -> &str {
    name.split_once('.').map_or(name, |(short, _)| short)
}

/// Determine the shared home directory of the effective user.
///
/// Update mode consults `HOME_OLD` first, since the init scripts have already
/// pointed `HOME` at the per-host home by then. `HOME` comes next and the
/// account database is the last resort (e.g. after `env -i`).
///
/// # Errors
///
/// Returns [`ConfigError::HomeUnknown`] when no source yields a path.
pub fn home_directory(update: bool) -> Result<(PathBuf, HomeSource), ConfigError> {
    home_directory_from(update, |key| std::env::var_os(key), account_home)
}

/// [`home_directory`] with injectable environment and account lookups.
///
/// # Errors
///
/// Returns [`ConfigError::HomeUnknown`] when no source yields a path.
pub fn home_directory_from(
    update: bool,
    env: impl Fn(&str) -> Option<OsString>,
    account: impl FnOnce() -> Option<PathBuf>,
) -> Result<(PathBuf, HomeSource), ConfigError> {
    let non_empty = |key: &str| env(key).filter(|v| !v.is_empty()).map(PathBuf::from);

    if update && let Some(home) = non_empty(HOME_OLD_VAR) {
        return Ok((home, HomeSource::HomeOld));
    }
    if let Some(home) = non_empty("HOME") {
        return Ok((home, HomeSource::Home));
    }
    account()
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(|dir| (dir, HomeSource::AccountDatabase))
        .ok_or(ConfigError::HomeUnknown)
}

/// Home directory recorded in the account database for the effective uid.
fn account_home() -> Option<PathBuf> {
    let uid = nix::unistd::geteuid();
    nix::unistd::User::from_uid(uid).ok().flatten().map(|user| user.dir)
}
