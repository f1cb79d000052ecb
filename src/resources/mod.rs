//! Idempotent filesystem primitives (check + apply pattern).
pub mod fs;
pub mod link;
pub mod sync;

use anyhow::Result;

/// A change that can be described and applied.
pub trait Applicable {
    /// Human-readable description of this resource.
    fn description(&self) -> String;

    /// Apply the resource change.
    ///
    /// Implementations must not remove or overwrite anything already at the
    /// destination.
    ///
    /// # Errors
    ///
    /// Returns an error if the change cannot be made, carrying the
    /// underlying OS error.
    fn apply(&self) -> Result<ResourceChange>;
}

/// State of a resource on disk.
///
/// # Examples
///
/// ```
/// use multihome::resources::ResourceState;
///
/// let missing = ResourceState::Missing;
/// let wrong = ResourceState::Incorrect { current: "regular file".into() };
///
/// assert_ne!(missing, ResourceState::Correct);
/// assert_ne!(wrong, ResourceState::Correct);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceState {
    /// Nothing exists at the destination.
    Missing,
    /// The destination already matches the desired state.
    Correct,
    /// Something else occupies the destination.
    Incorrect {
        /// What is there instead.
        current: String,
    },
}

/// Result of applying a resource change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceChange {
    /// Resource was created.
    Applied,
    /// Resource was already correct (no change needed).
    AlreadyCorrect,
    /// Resource was left alone.
    Skipped {
        /// Reason why the resource was skipped.
        reason: String,
    },
}

/// Resources that can determine their own state before applying.
pub trait Resource: Applicable {
    /// Check the current state of the resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be determined.
    fn current_state(&self) -> Result<ResourceState>;

    /// Apply only when the destination is free.
    ///
    /// An occupied destination is reported as [`ResourceChange::Skipped`]
    /// instead of being replaced.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Resource::current_state`] and
    /// [`Applicable::apply`].
    fn ensure(&self) -> Result<ResourceChange> {
        match self.current_state()? {
            ResourceState::Missing => self.apply(),
            ResourceState::Correct => Ok(ResourceChange::AlreadyCorrect),
            ResourceState::Incorrect { current } => Ok(ResourceChange::Skipped {
                reason: format!("destination exists ({current})"),
            }),
        }
    }
}
