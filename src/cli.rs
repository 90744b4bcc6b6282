//! CLI - Command Line Interface for tvshelf
//!
//! Every screen of the catalog is scriptable. All output is JSON-parseable.
//!
//! # Examples
//!
//! ```bash
//! # Browse the show index, three pages deep
//! tvshelf list --pages 3
//!
//! # Show detail with seasons, then one episode
//! tvshelf show 82
//! tvshelf episode 82 1 3
//!
//! # Search and favorites
//! tvshelf search "girls" --json
//! tvshelf favorites add 82
//! tvshelf favorites list --sort name
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::app::SortCriteria;

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// General error
    Error = 1,
    /// Invalid arguments
    InvalidArgs = 2,
    /// Network error
    NetworkError = 3,
    /// Show, episode or search match not found
    NotFound = 4,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> std::process::ExitCode {
        std::process::ExitCode::from(code as u8)
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// tvshelf - browse the TVMaze show catalog
#[derive(Parser, Debug)]
#[command(
    name = "tvshelf",
    version,
    about = "Browse the TVMaze show catalog",
    long_about = "Page through the show index, read show details with episodes \
                  grouped by season, search by title and keep a local list \
                  of favorite shows.",
    after_help = "EXAMPLES:\n\
                  tvshelf list --pages 2            First two pages of shows\n\
                  tvshelf show 82                   Show detail and seasons\n\
                  tvshelf episode 82 1 3            Season 1, third episode\n\
                  tvshelf search \"the wire\"         Best match for a title\n\
                  tvshelf favorites add 82          Mark a show as favorite"
)]
pub struct Cli {
    /// Output format as JSON (default for non-TTY)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Log debug details to stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Check if JSON output should be used
    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Page through the show index
    #[command(visible_alias = "ls")]
    List(ListCmd),

    /// Show details and episodes grouped by season
    #[command(visible_alias = "i")]
    Show(ShowCmd),

    /// Details for one episode of a show
    #[command(visible_alias = "ep")]
    Episode(EpisodeCmd),

    /// Find a show by title
    #[command(visible_alias = "s")]
    Search(SearchCmd),

    /// Manage favorite shows
    #[command(visible_alias = "fav")]
    Favorites(FavoritesCmd),
}

/// Load pages of the show index
#[derive(Args, Debug)]
pub struct ListCmd {
    /// Number of pages to load (defaults to config or 1)
    #[arg(long, short = 'p')]
    pub pages: Option<u32>,

    /// Maximum number of shows to print
    #[arg(long, short = 'l')]
    pub limit: Option<usize>,
}

/// Show detail lookup
#[derive(Args, Debug)]
pub struct ShowCmd {
    /// TVMaze show id
    #[arg(required = true)]
    pub id: u64,
}

/// Episode lookup by position in the grouped season list
#[derive(Args, Debug)]
pub struct EpisodeCmd {
    /// TVMaze show id
    #[arg(required = true)]
    pub id: u64,

    /// Season position, starting at 1 (the first season listed)
    #[arg(required = true)]
    pub season: usize,

    /// Episode position within that season, starting at 1
    #[arg(required = true)]
    pub episode: usize,
}

impl EpisodeCmd {
    /// Zero-based (season, episode) positions, None if either is 0
    pub fn positions(&self) -> Option<(usize, usize)> {
        Some((self.season.checked_sub(1)?, self.episode.checked_sub(1)?))
    }
}

/// Search by title
#[derive(Args, Debug)]
pub struct SearchCmd {
    /// Search query (title)
    #[arg(required = true)]
    pub query: String,

    /// Return every match with its score instead of the best one
    #[arg(long, short = 'a')]
    pub all: bool,

    /// Maximum number of results with --all
    #[arg(long, short = 'l', default_value = "10")]
    pub limit: usize,
}

/// Favorites management
#[derive(Args, Debug)]
pub struct FavoritesCmd {
    #[command(subcommand)]
    pub action: FavoritesAction,
}

#[derive(Subcommand, Debug)]
pub enum FavoritesAction {
    /// List favorite shows
    List {
        /// Sort order
        #[arg(long, short = 's', value_enum, default_value = "added")]
        sort: FavoritesSort,
    },
    /// Mark a show as favorite
    Add {
        /// TVMaze show id
        id: u64,
    },
    /// Remove a show from favorites
    #[command(visible_alias = "rm")]
    Remove {
        /// TVMaze show id
        id: u64,
    },
}

/// Sort order for the favorites listing
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FavoritesSort {
    /// Order the shows were added in
    #[default]
    Added,
    /// By show id
    Id,
    /// Alphabetically by name
    Name,
}

impl FavoritesSort {
    pub fn criteria(self) -> Option<SortCriteria> {
        match self {
            FavoritesSort::Added => None,
            FavoritesSort::Id => Some(SortCriteria::Id),
            FavoritesSort::Name => Some(SortCriteria::Alphabetical),
        }
    }
}

// =============================================================================
// Output
// =============================================================================

/// JSON envelope for all command output
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub exit_code: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl<T: Serialize> JsonOutput<T> {
    /// Create success output with data
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            exit_code: 0,
        }
    }

    /// Create error output (no data)
    pub fn error_msg(msg: impl Into<String>, code: ExitCode) -> JsonOutput<()> {
        JsonOutput::<()> {
            data: None,
            error: Some(msg.into()),
            exit_code: code.into(),
        }
    }
}

/// Writes command results to stdout and diagnostics to stderr
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Print success data
    pub fn print<T: Serialize>(&self, data: T) -> anyhow::Result<()> {
        if self.json {
            let output = JsonOutput::success(data);
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        Ok(())
    }

    /// Print human-readable lines, or the data as JSON in JSON mode
    pub fn print_lines<T: Serialize>(&self, data: T, lines: &[String]) -> anyhow::Result<()> {
        if self.json {
            self.print(data)
        } else {
            for line in lines {
                println!("{}", line);
            }
            Ok(())
        }
    }

    /// Print error and return exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        if self.json {
            let output = JsonOutput::<()>::error_msg(&msg, code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Print info message (suppressed in quiet mode)
    pub fn info(&self, msg: impl std::fmt::Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
