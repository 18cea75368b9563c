use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "vortex")]
#[command(about = "Vortex - search many video catalogs at once")]
#[command(version)]
#[command(after_help = "\x1b[1;36mQuick Start:\x1b[0m
  vortex sources                          List sources available to you
  vortex search \"spirited away\"           Search every available source
  vortex search dune --type 1 --year 2021 Narrow by category and year
  vortex detail ffzy-12345                Show one entry with its episodes

\x1b[1;36mConfiguration:\x1b[0m
  vortex config path                      Where the config file is looked up
  vortex config show                      Print the resolved configuration
  vortex --config ./sources.yaml search x Use an explicit config file")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (TOML or YAML)
    #[arg(long, global = true, env = "VORTEX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Act as this identity when filtering sources (anonymous if omitted)
    #[arg(short, long, global = true)]
    pub user: Option<String>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Pretty)]
    pub output: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search all sources available to you
    ///
    /// Every source is queried concurrently with its own timeout; slow or
    /// failing sources are skipped and the rest are merged by priority.
    #[command(after_help = "\x1b[1;33mExamples:\x1b[0m
  vortex search \"cowboy bebop\"
  vortex search matrix --year 1999
  vortex search matrix --output json")]
    Search {
        /// Keyword to search for
        keyword: String,
        /// Upstream category id (1 movie, 2 tv, 3 anime, 4 variety, 5 documentary)
        #[arg(short = 't', long = "type")]
        category: Option<String>,
        /// Release year
        #[arg(short, long)]
        year: Option<String>,
        /// Maximum number of results to print (pretty output only)
        #[arg(short, long, default_value_t = 50)]
        limit: usize,
    },

    /// Show one entry by its composite id (`<source>-<id>`)
    #[command(alias = "get")]
    #[command(after_help = "\x1b[1;33mExamples:\x1b[0m
  vortex detail ffzy-12345
  vortex detail bgm-253 --output yaml")]
    Detail {
        /// Composite id as printed by `vortex search`
        id: String,
    },

    /// List sources available to you, in priority order
    #[command(alias = "ls")]
    Sources,

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Clone)]
pub enum ConfigAction {
    /// Print the resolved configuration
    Show,
    /// Print the default config file location
    Path,
    /// Validate a config file and report problems
    Check,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable formatted output
    Pretty,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Plain text output
    Text,
}
