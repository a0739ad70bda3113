//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Render a YAML card catalog to a static HTML page and mirror its images locally
#[derive(Parser, Debug)]
#[command(name = "cardcat")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Project directory holding cardcat.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render the catalog to <web-dir>/index.html
    Build {
        /// Catalog document (default: from config)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        document: Option<PathBuf>,
        /// Template directory (default: from config)
        #[arg(short, long, value_hint = ValueHint::DirPath)]
        templates: Option<PathBuf>,
        /// Output directory (default: from config)
        #[arg(short, long, value_hint = ValueHint::DirPath)]
        web_dir: Option<PathBuf>,
    },

    /// Download card images and record local paths in the document
    Download {
        /// Catalog document, rewritten in place if anything changes
        #[arg(value_hint = ValueHint::FilePath)]
        document: PathBuf,
        /// Destination root; images go to <web-dir>/<image-dir>/...
        #[arg(value_hint = ValueHint::DirPath)]
        web_dir: PathBuf,
        /// Do not retry cards that failed before
        #[arg(long)]
        skip_errored: bool,
        /// Per-request timeout in seconds
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,
        /// Reject bare-URL entries instead of converting them
        #[arg(long)]
        no_normalize: bool,
    },

    /// Convert bare-URL entries to {image_url: ...} mappings
    Normalize {
        /// Catalog document (default: from config)
        #[arg(value_hint = ValueHint::FilePath)]
        document: Option<PathBuf>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Show config paths
    Path,

    /// Print a config template
    Template,
}
