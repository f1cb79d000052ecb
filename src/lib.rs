//! Per-host home directories on a shared home.
//!
//! When one home directory is mounted on many machines, `multihome` gives
//! each machine (or group of machines) its own `HOME` under
//! `~/home_local/<host>`, seeded from skeleton directories and linked back
//! to the shared files the user chooses.
//!
//! The public API is organised into four layers:
//!
//! - **[`config`]**: the on-disk layout and the two line-oriented config files
//! - **[`resources`]**: idempotent `check + apply` primitives (links, trees, copies)
//! - **[`tasks`]**: named provisioning steps wired to resources
//! - **[`commands`]**: orchestration of provisioning and the self-test
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod host;
pub mod logging;
pub mod resources;
pub mod tasks;
pub mod text;
