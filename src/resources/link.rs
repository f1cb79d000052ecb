//! Symbolic and hard link resource.
use anyhow::Result;
use std::fmt;
use std::os::unix::fs::MetadataExt as _;
use std::path::{Path, PathBuf};

use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::error::ProvisionError;

/// Which kind of link to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// `symlink(2)`.
    Symbolic,
    /// `link(2)`.
    Hard,
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Symbolic => f.write_str("symlink"),
            Self::Hard => f.write_str("hard link"),
        }
    }
}

/// A link at `dest` referring to `source`.
#[derive(Debug, Clone)]
pub struct LinkResource {
    /// Link type.
    pub kind: LinkKind,
    /// What the link refers to.
    pub source: PathBuf,
    /// Where the link is created.
    pub dest: PathBuf,
}

impl LinkResource {
    /// A symbolic link at `dest` pointing to `source`.
    #[must_use]
    pub const fn symbolic(source: PathBuf, dest: PathBuf) -> Self {
        Self {
            kind: LinkKind::Symbolic,
            source,
            dest,
        }
    }

    /// A hard link at `dest` sharing the inode of `source`.
    #[must_use]
    pub const fn hard(source: PathBuf, dest: PathBuf) -> Self {
        Self {
            kind: LinkKind::Hard,
            source,
            dest,
        }
    }
}

impl Applicable for LinkResource {
    fn description(&self) -> String {
        match self.kind {
            LinkKind::Symbolic => {
                format!("{} -> {}", self.dest.display(), self.source.display())
            }
            LinkKind::Hard => format!("{} => {}", self.dest.display(), self.source.display()),
        }
    }

    fn apply(&self) -> Result<ResourceChange> {
        match self.kind {
            LinkKind::Symbolic => std::os::unix::fs::symlink(&self.source, &self.dest).map_err(
                |source| ProvisionError::Symlink {
                    link: self.dest.clone(),
                    target: self.source.clone(),
                    source,
                },
            )?,
            LinkKind::Hard => std::fs::hard_link(&self.source, &self.dest).map_err(|source| {
                ProvisionError::HardLink {
                    link: self.dest.clone(),
                    target: self.source.clone(),
                    source,
                }
            })?,
        }
        Ok(ResourceChange::Applied)
    }
}

impl Resource for LinkResource {
    fn current_state(&self) -> Result<ResourceState> {
        let Ok(meta) = self.dest.symlink_metadata() else {
            return Ok(ResourceState::Missing);
        };

        match self.kind {
            LinkKind::Symbolic => match std::fs::read_link(&self.dest) {
                Ok(existing) if existing == self.source => Ok(ResourceState::Correct),
                Ok(existing) => Ok(ResourceState::Incorrect {
                    current: format!("points to {}", existing.display()),
                }),
                Err(_) => Ok(ResourceState::Incorrect {
                    current: describe(&meta),
                }),
            },
            LinkKind::Hard => {
                if same_inode(&meta, &self.source) {
                    Ok(ResourceState::Correct)
                } else {
                    Ok(ResourceState::Incorrect {
                        current: describe(&meta),
                    })
                }
            }
        }
    }
}

fn same_inode(dest: &std::fs::Metadata, source: &Path) -> bool {
    source
        .symlink_metadata()
        .is_ok_and(|src| src.dev() == dest.dev() && src.ino() == dest.ino())
}

fn describe(meta: &std::fs::Metadata) -> String {
    let ft = meta.file_type();
    if ft.is_dir() {
        "directory".to_string()
    } else if ft.is_symlink() {
        "symlink".to_string()
    } else {
        "regular file".to_string()
    }
}
