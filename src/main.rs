use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::Parser;

use multihome::cli::Cli;
use multihome::commands::{self, Invocation};
use multihome::error::{self, ConfigError};
use multihome::exec::SystemExecutor;
use multihome::host;
use multihome::logging::{self, Logger};
use multihome::resources::sync::SyncTool;

fn main() -> ExitCode {
    let args = Cli::parse();
    let nodename = args.hostname.clone().map_or_else(host::nodename, Ok);

    let short = nodename
        .as_deref()
        .map_or("unknown", host::short_hostname)
        .to_string();
    let log_name = format!("{}-{short}", args.command_name());
    logging::init_subscriber(args.verbose, &log_name);
    let log = Arc::new(Logger::new(&log_name));

    match run(&args, nodename, &log) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log.error(&format!("{e:#}"));
            ExitCode::from(error::exit_code(&e))
        }
    }
}

fn run(args: &Cli, nodename: Result<String, ConfigError>, log: &Arc<Logger>) -> Result<()> {
    let sync = SyncTool::locate(Arc::new(SystemExecutor)).context("multihome needs rsync")?;
    log.debug(&format!("sync tool: {}", sync.program().display()));

    let entry_point = std::env::args_os().next().unwrap_or_default();
    let inv = Invocation::detect(
        args.update,
        args.script,
        Some(nodename?),
        entry_point,
        sync,
    )?;
    let ctx = commands::setup(inv, log)?;

    if args.tests {
        return commands::test::run(&ctx);
    }

    let outcome = commands::provision::run(&ctx)?;
    if !outcome.scripts_written {
        println!("{}", outcome.new_home.display());
    }
    Ok(())
}
