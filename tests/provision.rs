#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::wildcard_imports,
    clippy::indexing_slicing
)]
//! Integration tests for provisioning a per-host home.
//!
//! These tests drive [`commands::setup`] and [`provision::run`] against a
//! temporary shared home, with a recording executor standing in for rsync.

mod common;

use std::collections::HashSet;
use std::ffi::OsString;

use multihome::commands::provision;
use multihome::logging::TaskStatus;
use multihome::tasks;

// ---------------------------------------------------------------------------
// Snapshot: provisioning sequence
// ---------------------------------------------------------------------------

/// Snapshot of all provisioning task names in execution order.
#[test]
fn provision_task_names() {
    let all_tasks = tasks::all_provision_tasks();
    let task_names: Vec<&str> = all_tasks.iter().map(|t| t.name()).collect();
    insta::assert_snapshot!("provision_task_names", task_names.join("\n"));
}

/// No two provisioning tasks may share the same name.
#[test]
fn provision_task_names_are_unique() {
    let tasks = tasks::all_provision_tasks();
    let mut seen: HashSet<&str> = HashSet::new();
    for task in &tasks {
        assert!(seen.insert(task.name()), "duplicate task name: {}", task.name());
    }
}

// ---------------------------------------------------------------------------
// First run
// ---------------------------------------------------------------------------

/// A fully qualified node name provisions `home_local/<short name>`.
#[test]
fn first_run_uses_short_hostname() {
    let home = common::TestHome::new();
    let ctx = home.context("web01.example.com");

    let outcome = provision::run(&ctx).unwrap();
    assert_eq!(outcome.new_home, home.path().join("home_local/web01"));
    assert!(outcome.new_home.is_dir());
    assert!(ctx.paths.marker.is_file());
}

/// `topdir` resolves back to the shared home.
#[test]
fn topdir_points_at_shared_home() {
    let home = common::TestHome::new();
    let ctx = home.context("web01");
    provision::run(&ctx).unwrap();

    assert_eq!(
        dunce::canonicalize(&ctx.paths.topdir).unwrap(),
        dunce::canonicalize(home.path()).unwrap()
    );
}

/// Config files are created empty so users can find where to edit.
#[test]
fn config_scaffolding_is_created() {
    let home = common::TestHome::new();
    let ctx = home.context("web01");
    provision::run(&ctx).unwrap();

    assert!(ctx.paths.skeleton_dir.is_dir());
    assert_eq!(std::fs::read_to_string(&ctx.paths.transfer_config).unwrap(), "");
}

/// An existing transfer file is never truncated.
#[test]
fn existing_transfer_file_is_kept() {
    let home = common::TestHomeBuilder::new()
        .with_transfer("L .ssh\n")
        .with_dir(".ssh")
        .build();
    let ctx = home.context("web01");
    provision::run(&ctx).unwrap();

    assert_eq!(
        std::fs::read_to_string(&ctx.paths.transfer_config).unwrap(),
        "L .ssh\n"
    );
    assert_eq!(
        std::fs::read_link(ctx.paths.new_home.join(".ssh")).unwrap(),
        home.path().join(".ssh")
    );
}

/// The OS skeleton is copied before the user skeleton, contents only.
#[test]
fn skeletons_are_injected_in_order() {
    let home = common::TestHomeBuilder::new().with_system_skel().build();
    let ctx = home.context("web01");
    provision::run(&ctx).unwrap();

    let calls = home.executor.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(
        calls[0][2],
        OsString::from(format!("{}/", home.system_skel.display()))
    );
    assert_eq!(
        calls[1][2],
        OsString::from(format!("{}/", ctx.paths.skeleton_dir.display()))
    );
    assert_eq!(calls[1][3], ctx.paths.new_home.clone().into_os_string());
}

// ---------------------------------------------------------------------------
// Re-runs
// ---------------------------------------------------------------------------

/// A second run prints the same path and copies nothing.
#[test]
fn second_run_is_idempotent() {
    let home = common::TestHomeBuilder::new().with_system_skel().build();
    let first = provision::run(&home.context("web01")).unwrap();
    let calls_after_first = home.executor.call_count();

    let ctx = home.context("web01");
    let second = provision::run(&ctx).unwrap();
    assert_eq!(first, second);
    assert_eq!(home.executor.call_count(), calls_after_first);

    let statuses: Vec<TaskStatus> = ctx.log.task_entries().iter().map(|e| e.status).collect();
    assert!(!statuses.contains(&TaskStatus::Ok), "nothing left to do: {statuses:?}");
    assert!(!statuses.contains(&TaskStatus::Failed));
}

/// Update mode re-injects with `--update` even though the marker exists.
#[test]
fn update_mode_resyncs_with_update_flag() {
    let home = common::TestHome::new();
    provision::run(&home.context("web01")).unwrap();
    let before = home.executor.call_count();

    let mut inv = home.invocation("web01");
    inv.update = true;
    provision::run(&home.context_for(inv)).unwrap();

    let calls = home.executor.calls();
    assert_eq!(calls.len(), before + 1);
    assert_eq!(calls[before][1], "-aq");
    assert_eq!(calls[before][2], "--update");
}

/// Running inside an already provisioned home is refused.
#[test]
fn nested_invocation_is_rejected() {
    let home = common::TestHomeBuilder::new()
        .with_file(".multihome_controlled", "")
        .build();
    let ctx = home.context("web01");

    let err = provision::run(&ctx).unwrap_err();
    assert!(err.to_string().contains("cannot be nested"), "got: {err}");
    assert_eq!(multihome::error::exit_code(&err), 1);
    assert!(!home.path().join("home_local").exists());
    assert!(!home.path().join(".multihome").exists());
    assert_eq!(home.executor.call_count(), 0);
}

// ---------------------------------------------------------------------------
// Host groups
// ---------------------------------------------------------------------------

/// Hosts matching a rule share one per-host home.
#[test]
fn host_group_rule_shares_home() {
    let home = common::TestHomeBuilder::new()
        .with_host_groups("# cluster nodes\n^node[0-9]+ = cluster\n")
        .build();

    let a = provision::run(&home.context("node01.hpc")).unwrap();
    let b = provision::run(&home.context("node17")).unwrap();
    assert_eq!(a.new_home, home.path().join("home_local/cluster"));
    assert_eq!(a, b);
}

/// A malformed host-group line does not stop provisioning.
#[test]
fn bad_host_group_line_falls_back_to_hostname() {
    let home = common::TestHomeBuilder::new()
        .with_host_groups("bad line without equals\n")
        .build();
    let ctx = home.context("web01");
    assert!(!ctx.identity.matched);

    let outcome = provision::run(&ctx).unwrap();
    assert_eq!(outcome.new_home, home.path().join("home_local/web01"));
}

/// A rule pointing at `..` is rejected, so the shared home is never used as
/// a per-host home and a second run still works.
#[test]
fn dot_dot_host_group_leaves_shared_home_alone() {
    let home = common::TestHomeBuilder::new()
        .with_host_groups("^web = ..\n")
        .build();

    let first = provision::run(&home.context("web01")).unwrap();
    assert_eq!(first.new_home, home.path().join("home_local/web01"));
    assert!(!home.path().join(".multihome_controlled").exists());
    assert!(home.path().join("topdir").symlink_metadata().is_err());

    let second = provision::run(&home.context("web01")).unwrap();
    assert_eq!(first, second);
}

/// A node name with nothing before its first dot cannot name a home.
#[test]
fn empty_short_hostname_is_rejected() {
    let home = common::TestHome::new();
    let log = std::sync::Arc::new(multihome::logging::Logger::with_log_file(None));
    for nodename in ["..", ".example.com"] {
        assert!(multihome::commands::setup(home.invocation(nodename), &log).is_err());
    }
    assert!(!home.path().join("home_local").exists());
}

// ---------------------------------------------------------------------------
// Script mode
// ---------------------------------------------------------------------------

/// Script mode writes both init scripts pointing at the program.
#[test]
fn script_mode_writes_init_scripts() {
    let home = common::TestHome::new();
    let mut inv = home.invocation("web01");
    inv.script = true;
    inv.entry_point = OsString::from("/bin/sh");
    let ctx = home.context_for(inv);

    let outcome = provision::run(&ctx).unwrap();
    assert!(outcome.scripts_written);

    let program = dunce::canonicalize("/bin/sh").unwrap();
    for script in [&ctx.paths.init_sh, &ctx.paths.init_csh] {
        let body = std::fs::read_to_string(script).unwrap();
        assert!(body.contains(&format!("'{}'", program.display())), "{body}");
        assert!(body.contains("This script was generated on "));
    }
}
