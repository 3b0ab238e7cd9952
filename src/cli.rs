//! Command-line interface for wslnet
//!
//! Uses clap with derive for type-safe CLI parsing

use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use std::path::PathBuf;

/// wslnet - (re)creates the WSL network with a fixed /24 subnet
#[derive(Parser, Debug)]
#[command(name = "wslnet")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Address the guest should hold; network and gateway are derived from it
    /// (default: 192.168.222.222)
    pub address: Option<String>,

    /// Configuration file path (default: ./wslnet.toml if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Show the derived addresses and network document without changing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Generate shell completion script and exit
    #[arg(long, value_enum)]
    pub completion: Option<Shell>,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Generate shell completion scripts
    pub fn generate_completion(shell: Shell) {
        let mut cmd = Self::command();
        clap_complete::generate(shell, &mut cmd, "wslnet", &mut std::io::stdout());
    }
}
