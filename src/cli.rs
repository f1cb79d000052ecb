//! Command-line interface.
use clap::Parser;

/// Version reported by `--version`.
pub const VERSION: &str = match option_env!("MULTIHOME_VERSION") {
    Some(v) => v,
    None => env!("CARGO_PKG_VERSION"),
};

/// Create and enter a per-host home directory under the shared home.
///
/// Prints the per-host home on stdout so login scripts can switch `HOME`
/// to it.
#[derive(Parser, Debug)]
#[command(name = "multihome", version = VERSION)]
pub struct Cli {
    /// Write init.sh and init.csh instead of printing the per-host home
    #[arg(short, long)]
    pub script: bool,

    /// Run self-tests and validate the configuration files
    #[arg(short, long)]
    pub tests: bool,

    /// Re-sync skeletons and transfers into an existing per-host home
    #[arg(short, long)]
    pub update: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Use this name instead of the machine's node name
    pub hostname: Option<String>,
}

impl Cli {
    /// Name of the command being run, used for the log file.
    #[must_use]
    pub const fn command_name(&self) -> &'static str {
        if self.tests { "test" } else { "provision" }
    }
}
