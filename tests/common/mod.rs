// Shared helpers for integration tests.
//
// Provides a temporary shared home with a fluent builder, plus an executor
// that records sync-tool calls instead of running rsync.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use multihome::commands::{self, Invocation};
use multihome::error::ExecError;
use multihome::exec::{ExecResult, Executor};
use multihome::host::HomeSource;
use multihome::logging::Logger;
use multihome::resources::sync::SyncTool;
use multihome::tasks::Context;

/// Executor that records every call and reports a fixed exit code.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    /// `[program, args...]` per call.
    pub calls: Mutex<Vec<Vec<OsString>>>,
    /// Exit code returned for every call.
    pub code: i32,
}

impl RecordingExecutor {
    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("calls lock").len()
    }

    pub fn calls(&self) -> Vec<Vec<OsString>> {
        self.calls.lock().expect("calls lock").clone()
    }
}

impl Executor for RecordingExecutor {
    fn run_unchecked(&self, program: &Path, args: &[&OsStr]) -> Result<ExecResult, ExecError> {
        let mut call = vec![program.as_os_str().to_os_string()];
        call.extend(args.iter().map(|a| a.to_os_string()));
        self.calls.lock().expect("calls lock").push(call);
        Ok(ExecResult {
            stdout: String::new(),
            stderr: String::new(),
            code: self.code,
        })
    }
}

/// An isolated shared home backed by a [`tempfile::TempDir`].
pub struct TestHome {
    /// Temporary directory acting as the shared home.
    pub root: tempfile::TempDir,
    /// Stand-in for `/etc/skel`, inside `root` but outside the layout.
    pub system_skel: PathBuf,
    /// Executor handed to every context built from this home.
    pub executor: Arc<RecordingExecutor>,
}

impl TestHome {
    /// An empty shared home.
    pub fn new() -> Self {
        TestHomeBuilder::new().build()
    }

    /// Path to the shared home.
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Invocation as `main` would build it for `nodename`.
    pub fn invocation(&self, nodename: &str) -> Invocation {
        Invocation {
            home: self.path().to_path_buf(),
            home_source: HomeSource::Home,
            nodename: nodename.to_string(),
            update: false,
            script: false,
            entry_point: OsString::from("multihome"),
            sync: SyncTool::new(PathBuf::from("/usr/bin/rsync"), self.executor.clone()),
            system_skeleton_dir: self.system_skel.clone(),
        }
    }

    /// Context for `invocation`, resolved the same way as a real run.
    pub fn context_for(&self, invocation: Invocation) -> Context {
        let log = Arc::new(Logger::with_log_file(None));
        commands::setup(invocation, &log).expect("setup")
    }

    /// Context for a plain run on `nodename`.
    pub fn context(&self, nodename: &str) -> Context {
        self.context_for(self.invocation(nodename))
    }
}

/// Fluent builder for [`TestHome`].
///
/// ```ignore
/// let home = TestHomeBuilder::new()
///     .with_transfer("L .ssh\n")
///     .with_dir(".ssh")
///     .build();
/// ```
pub struct TestHomeBuilder {
    transfer: Option<String>,
    host_groups: Option<String>,
    files: Vec<(String, String)>,
    dirs: Vec<String>,
    system_skel: bool,
    code: i32,
}

impl TestHomeBuilder {
    pub fn new() -> Self {
        Self {
            transfer: None,
            host_groups: None,
            files: Vec::new(),
            dirs: Vec::new(),
            system_skel: false,
            code: 0,
        }
    }

    /// Contents of `.multihome/transfer`.
    pub fn with_transfer(mut self, content: &str) -> Self {
        self.transfer = Some(content.to_string());
        self
    }

    /// Contents of `.multihome/host_group`.
    pub fn with_host_groups(mut self, content: &str) -> Self {
        self.host_groups = Some(content.to_string());
        self
    }

    /// A file relative to the shared home.
    pub fn with_file(mut self, rel: &str, content: &str) -> Self {
        self.files.push((rel.to_string(), content.to_string()));
        self
    }

    /// A directory relative to the shared home.
    pub fn with_dir(mut self, rel: &str) -> Self {
        self.dirs.push(rel.to_string());
        self
    }

    /// Create the stand-in `/etc/skel`.
    pub fn with_system_skel(mut self) -> Self {
        self.system_skel = true;
        self
    }

    /// Exit code the recording executor reports.
    pub fn with_sync_exit_code(mut self, code: i32) -> Self {
        self.code = code;
        self
    }

    pub fn build(self) -> TestHome {
        let root = tempfile::tempdir().expect("create temp dir");
        let home = root.path();
        let config = home.join(".multihome");

        if let Some(content) = &self.transfer {
            std::fs::create_dir_all(&config).expect("create config dir");
            std::fs::write(config.join("transfer"), content).expect("write transfer");
        }
        if let Some(content) = &self.host_groups {
            std::fs::create_dir_all(&config).expect("create config dir");
            std::fs::write(config.join("host_group"), content).expect("write host_group");
        }
        for rel in &self.dirs {
            std::fs::create_dir_all(home.join(rel)).expect("create dir");
        }
        for (rel, content) in &self.files {
            let path = home.join(rel);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).expect("create parent dir");
            }
            std::fs::write(path, content).expect("write file");
        }

        let system_skel = home.join("system-skel");
        if self.system_skel {
            std::fs::create_dir_all(&system_skel).expect("create system skel");
        }

        TestHome {
            root,
            system_skel,
            executor: Arc::new(RecordingExecutor {
                code: self.code,
                ..RecordingExecutor::default()
            }),
        }
    }
}
