//! cli
//!
//! Command-line interface layer for ghsecrets.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Merge flags, environment, and the config file into a [`ManagerConfig`]
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. Handlers receive a [`Context`] holding a ready
//! [`SecretManager`]; all scope selection and encryption happens there.

pub mod args;
pub mod commands;

pub use args::{Cli, Command, Shell};

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context as _, Result};

use crate::auth::{StaticTokenProvider, TokenProvider};
use crate::core::config::Config;
use crate::manager::{ErrorKind, ManagerConfig, ManagerError, SecretManager};
use crate::platform::github::GitHubClient;
use crate::platform::PlatformError;
use crate::ui::output::Verbosity;
use crate::ui::prompts;

/// Execution context shared by command handlers.
pub struct Context {
    /// Manager for the selected scope
    pub manager: SecretManager,
    /// Output verbosity
    pub verbosity: Verbosity,
    /// Whether prompts may be shown
    pub interactive: bool,
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`. Returns the process
/// exit code on success.
pub fn run(cli: Cli) -> Result<ExitCode> {
    let verbosity = Verbosity::from_flags(cli.quiet, cli.debug);

    // completion needs no configuration or credentials
    if let Command::Completion { shell } = cli.command {
        commands::completion(shell)?;
        return Ok(ExitCode::SUCCESS);
    }

    let config = Config::load().context("failed to load configuration")?;
    let manager_config = manager_config(&cli, &config);
    let api_base = cli
        .api_base
        .clone()
        .unwrap_or_else(|| config.api_base().to_string());

    let provider = token_provider(cli.token.as_deref(), &api_base)?;
    let client = GitHubClient::with_api_base(provider, api_base);

    let ctx = Context {
        manager: SecretManager::new(manager_config, Arc::new(client)),
        verbosity,
        interactive: !cli.quiet && prompts::stdin_is_terminal(),
    };

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(commands::dispatch(cli.command, &ctx))
}

/// Merge flags (and their environment variables) over the config file.
fn manager_config(cli: &Cli, config: &Config) -> ManagerConfig {
    ManagerConfig {
        owner: cli
            .owner
            .clone()
            .or_else(|| config.owner().map(String::from))
            .unwrap_or_default(),
        repository: cli
            .repo
            .clone()
            .or_else(|| config.repository().map(String::from)),
        environment: cli
            .env
            .clone()
            .or_else(|| config.environment().map(String::from)),
        visibility: cli.visibility.or_else(|| config.visibility()),
    }
}

/// Build a token provider from `--token` or the environment.
fn token_provider(token: Option<&str>, api_base: &str) -> Result<Arc<dyn TokenProvider>> {
    let host = reqwest::Url::parse(api_base)
        .ok()
        .and_then(|u| u.host_str().map(String::from))
        .unwrap_or_else(|| "github.com".to_string());

    let provider = match token {
        Some(token) if !token.is_empty() => StaticTokenProvider::new(host, token),
        _ => StaticTokenProvider::from_env(&host)
            .context("no API token found; pass --token or set GH_TOKEN")?,
    };
    Ok(Arc::new(provider))
}

/// A follow-up suggestion for a failed command, if one applies.
pub fn hint_for(err: &anyhow::Error) -> Option<&'static str> {
    let err = err.downcast_ref::<ManagerError>()?;
    match err.kind() {
        ErrorKind::InvalidInput => Some("pass --owner, and --repo when using --env"),
        ErrorKind::Platform => match err.platform_error()? {
            PlatformError::AuthRequired
            | PlatformError::AuthFailed(_)
            | PlatformError::PermissionDenied(_) => {
                Some("check that the token can administer Actions secrets for this scope")
            }
            PlatformError::RateLimited => Some("wait for the rate limit to reset and retry"),
            _ => None,
        },
        _ => None,
    }
}
