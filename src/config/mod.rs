//! Plain-text configuration read from the shared home.
pub mod host_groups;
pub mod layout;
pub mod lines;
pub mod transfer;

pub use layout::Paths;
