use std::io::IsTerminal;
use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::anyhow;
use clap::{ArgAction, Parser};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "tasknest-server",
    version,
    about = "TaskNest task API server"
)]
pub struct ServerCli {
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count)]
    pub quiet: u8,

    /// Path to a TOML config file. Defaults to `<config dir>/tasknest/server.toml`.
    #[arg(long = "config")]
    pub config: Option<PathBuf>,

    #[arg(long = "bind")]
    pub bind: Option<SocketAddr>,

    /// JSON-lines file holding the tasks. Without one, tasks live in memory.
    #[arg(long = "data-file")]
    pub data_file: Option<PathBuf>,

    /// Allowed browser origin for CORS; repeatable. None means any origin.
    #[arg(long = "cors-origin", action = ArgAction::Append)]
    pub cors_origins: Vec<String>,
}

pub fn default_filter(verbose: u8, quiet: u8) -> &'static str {
    if quiet >= 2 {
        "error"
    } else if quiet == 1 {
        "warn"
    } else if verbose >= 2 {
        "trace"
    } else if verbose == 1 {
        "debug"
    } else {
        "info,tasknest_server=debug"
    }
}

pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter(verbose, quiet)))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_line_number(true)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}
