//! Fixed on-disk layout and the paths derived from it.
use std::path::{Component, Path, PathBuf};

/// Directory under the shared home holding one subdirectory per host.
pub const HOME_LOCAL_DIR: &str = "home_local";
/// Link inside each per-host home pointing back at the shared home.
pub const TOPDIR_LINK: &str = "topdir";
/// Configuration directory under the shared home.
pub const CONFIG_DIR: &str = ".multihome";
/// Transfer directive file inside [`CONFIG_DIR`].
pub const TRANSFER_FILE: &str = "transfer";
/// Host-group rule file inside [`CONFIG_DIR`].
pub const HOST_GROUP_FILE: &str = "host_group";
/// User skeleton directory inside [`CONFIG_DIR`].
pub const SKELETON_DIR: &str = "skel";
/// POSIX shell init script inside [`CONFIG_DIR`].
pub const INIT_SH: &str = "init.sh";
/// csh init script inside [`CONFIG_DIR`].
pub const INIT_CSH: &str = "init.csh";
/// Sentinel written once a per-host home has been provisioned.
pub const MARKER_FILE: &str = ".multihome_controlled";
/// Operating system skeleton directory.
pub const SYSTEM_SKELETON_DIR: &str = "/etc/skel";

/// Check that `name` can be used as the per-host home directory name.
///
/// The name becomes a single component under [`HOME_LOCAL_DIR`], so it must
/// be non-empty, free of `/`, and neither `.` nor `..`.
///
/// # Errors
///
/// Returns a short reason when the name is unusable.
///
/// # Examples
///
/// ```
/// use multihome::config::layout::check_home_name;
///
/// assert!(check_home_name("web01").is_ok());
/// assert!(check_home_name("..").is_err());
/// ```
pub fn check_home_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("name is empty".to_string());
    }
    if name == "." || name == ".." {
        return Err(format!("name may not be '{name}'"));
    }
    if name.contains('/') {
        return Err(format!("name may not contain '/': {name}"));
    }
    Ok(())
}

/// `path` with `.` dropped and `..` folded into its parent, without touching
/// the filesystem.
fn lexically_normalized(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                } else if !matches!(out.components().next_back(), Some(Component::RootDir)) {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Every path a provisioning run touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    /// The shared home.
    pub old_home: PathBuf,
    /// `<old>/home_local/<resolved>`.
    pub new_home: PathBuf,
    /// `<new>/topdir`, a symlink to the shared home.
    pub topdir: PathBuf,
    /// `<old>/.multihome`.
    pub config_dir: PathBuf,
    /// User skeleton copied into every new per-host home.
    pub skeleton_dir: PathBuf,
    /// OS skeleton, copied before the user one.
    pub system_skeleton_dir: PathBuf,
    /// Transfer directives.
    pub transfer_config: PathBuf,
    /// Host-group rules.
    pub host_group_config: PathBuf,
    /// Generated POSIX sh snippet.
    pub init_sh: PathBuf,
    /// Generated csh snippet.
    pub init_csh: PathBuf,
    /// Marker inside the per-host home.
    pub marker: PathBuf,
    /// Marker inside the shared home; present only when running nested.
    pub nested_marker: PathBuf,
}

impl Paths {
    /// Paths for `resolved` under `old_home`.
    #[must_use]
    pub fn derive(old_home: &Path, resolved: &str) -> Self {
        let config_dir = old_home.join(CONFIG_DIR);
        let new_home = old_home.join(HOME_LOCAL_DIR).join(resolved);
        Self {
            old_home: old_home.to_path_buf(),
            topdir: new_home.join(TOPDIR_LINK),
            marker: new_home.join(MARKER_FILE),
            nested_marker: old_home.join(MARKER_FILE),
            skeleton_dir: config_dir.join(SKELETON_DIR),
            system_skeleton_dir: PathBuf::from(SYSTEM_SKELETON_DIR),
            transfer_config: config_dir.join(TRANSFER_FILE),
            host_group_config: config_dir.join(HOST_GROUP_FILE),
            init_sh: config_dir.join(INIT_SH),
            init_csh: config_dir.join(INIT_CSH),
            config_dir,
            new_home,
        }
    }

    /// Host-group rule file location, which is needed before the resolved
    /// name (and thus the rest of [`Paths`]) is known.
    #[must_use]
    pub fn host_group_config_for(old_home: &Path) -> PathBuf {
        old_home.join(CONFIG_DIR).join(HOST_GROUP_FILE)
    }

    /// Whether the per-host home would be the shared home itself.
    ///
    /// Both paths are resolved through the filesystem when they exist and
    /// normalized lexically otherwise.
    #[must_use]
    pub fn is_pass_through(&self) -> bool {
        match (
            dunce::canonicalize(&self.new_home),
            dunce::canonicalize(&self.old_home),
        ) {
            (Ok(new), Ok(old)) => new == old,
            _ => lexically_normalized(&self.new_home) == lexically_normalized(&self.old_home),
        }
    }

    /// Same paths with the OS skeleton directory moved, for tests.
    #[must_use]
    pub fn with_system_skeleton(mut self, dir: &Path) -> Self {
        self.system_skeleton_dir = dir.to_path_buf();
        self
    }
}
