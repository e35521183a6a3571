//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--owner <OWNER>`: Organization or user owning the secrets (`GH_OWNER`)
//! - `--repo <REPO>`: Repository; omit for organization secrets (`GH_REPO`)
//! - `--env <ENV>`: Deployment environment; requires `--repo` (`GH_ENV`)
//! - `--visibility <all|private>`: Visibility of organization secrets
//! - `--api-base <URL>`: REST API base for GitHub Enterprise
//! - `--token <TOKEN>`: API token (`GH_TOKEN`, falling back to `GITHUB_TOKEN`)
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand, ValueEnum};

use crate::platform::Visibility;

/// ghsecrets - Manage encrypted GitHub Actions secrets
#[derive(Parser, Debug)]
#[command(name = "ghsecrets")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Organization or user that owns the secrets
    #[arg(long, global = true, env = "GH_OWNER")]
    pub owner: Option<String>,

    /// Repository name (omit for organization secrets)
    #[arg(long, global = true, env = "GH_REPO")]
    pub repo: Option<String>,

    /// Deployment environment (requires --repo)
    #[arg(long, global = true, env = "GH_ENV")]
    pub env: Option<String>,

    /// Visibility of organization secrets
    #[arg(long, global = true, value_parser = parse_visibility)]
    pub visibility: Option<Visibility>,

    /// REST API base URL (for GitHub Enterprise)
    #[arg(long, global = true, value_name = "URL")]
    pub api_base: Option<String>,

    /// API token
    #[arg(long, global = true, env = "GH_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

fn parse_visibility(s: &str) -> Result<Visibility, String> {
    Visibility::parse(s).ok_or_else(|| format!("invalid visibility '{}' (expected all or private)", s))
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show a secret's metadata
    #[command(
        name = "get",
        long_about = "Show a secret's metadata.\n\n\
            Secret values can never be read back; this prints the name and \
            timestamps of the secret, or reports that it does not exist.",
        after_help = "\
EXAMPLES:
    # Repository secret
    ghsecrets --owner octocat --repo hello-world get API_TOKEN

    # Machine-readable, failing if absent
    ghsecrets --owner octocat get DEPLOY_KEY --json --fail-missing"
    )]
    Get {
        /// Secret name
        name: String,

        /// Print metadata as JSON
        #[arg(long)]
        json: bool,

        /// Exit with status 2 if the secret does not exist
        #[arg(long)]
        fail_missing: bool,
    },

    /// Create or update a secret
    #[command(
        name = "set",
        long_about = "Create or update a secret.\n\n\
            The value is encrypted locally with the scope's public key before \
            it is sent. With neither --value nor --stdin, the value is read \
            from a hidden prompt.",
        after_help = "\
EXAMPLES:
    # Prompt for the value
    ghsecrets --owner octocat --repo hello-world set API_TOKEN

    # Environment secret from a file
    ghsecrets --owner octocat --repo hello-world --env production \\
        set TLS_KEY --stdin < key.pem"
    )]
    Set {
        /// Secret name
        name: String,

        /// Secret value (visible in shell history; prefer --stdin)
        #[arg(long, conflicts_with = "stdin")]
        value: Option<String>,

        /// Read the value from standard input
        #[arg(long)]
        stdin: bool,
    },

    /// Delete a secret
    #[command(name = "delete")]
    Delete {
        /// Secret name
        name: String,
    },

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        after_help = "\
EXAMPLES:
    # Bash
    ghsecrets completion bash > ~/.local/share/bash-completion/completions/ghsecrets

    # Zsh
    ghsecrets completion zsh > ~/.zfunc/_ghsecrets"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completion.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
