//! tvshelf - browse the TVMaze show catalog from the terminal
//!
//! # Usage
//!
//! ```bash
//! tvshelf list --pages 2
//! tvshelf show 82
//! tvshelf episode 82 1 3
//! tvshelf search "the wire"
//! tvshelf favorites list --json
//! ```

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tvshelf::cli::{Cli, Command, ExitCode, Output};
use tvshelf::commands;
use tvshelf::config::Config;

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let exit_code = run_cli(cli).await;
    exit_code.into()
}

/// Logs go to stderr so JSON on stdout stays parseable
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "tvshelf=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Run CLI command and return exit code
async fn run_cli(cli: Cli) -> ExitCode {
    let output = Output::new(&cli);
    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };

    match cli.command {
        Command::List(cmd) => commands::list_cmd(cmd, &config, &output).await,
        Command::Show(cmd) => commands::show_cmd(cmd, &config, &output).await,
        Command::Episode(cmd) => commands::episode_cmd(cmd, &config, &output).await,
        Command::Search(cmd) => commands::search_cmd(cmd, &config, &output).await,
        Command::Favorites(cmd) => commands::favorites_cmd(cmd, &config, &output).await,
    }
}
