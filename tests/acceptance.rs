//! Live acceptance tests against the real GitHub API.
//!
//! These tests create and delete real secrets. They only run with the
//! `live_github_tests` feature and `ACCEPTANCE_TESTS=run`, and need:
//!
//! - `GH_TOKEN` (or `GITHUB_TOKEN`): token that can administer Actions secrets
//! - `GH_OWNER`: organization or user
//! - `GH_REPO`: repository (optional; organization scope if unset)
//! - `GH_ENV`: environment (optional; requires `GH_REPO`)

#![cfg(feature = "live_github_tests")]

use std::sync::Arc;

use ghsecrets::auth::StaticTokenProvider;
use ghsecrets::manager::{ManagerConfig, SecretManager};
use ghsecrets::platform::github::GitHubClient;

fn live_manager() -> Option<SecretManager> {
    if std::env::var("ACCEPTANCE_TESTS").ok().as_deref() != Some("run") {
        eprintln!("Skipping: ACCEPTANCE_TESTS=run not set");
        return None;
    }
    let Ok(provider) = StaticTokenProvider::from_env("github.com") else {
        eprintln!("Skipping: GH_TOKEN/GITHUB_TOKEN not set");
        return None;
    };
    let Ok(owner) = std::env::var("GH_OWNER") else {
        eprintln!("Skipping: GH_OWNER not set");
        return None;
    };

    let mut config = ManagerConfig::new(owner);
    config.repository = std::env::var("GH_REPO").ok();
    config.environment = std::env::var("GH_ENV").ok();

    let client = GitHubClient::new(Arc::new(provider));
    Some(SecretManager::new(config, Arc::new(client)))
}

fn unique_name() -> String {
    format!(
        "GHSECRETS_ACCEPTANCE_{}",
        chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
    )
}

#[tokio::test]
async fn live_get_missing_secret_is_none() {
    let Some(manager) = live_manager() else {
        return;
    };

    let meta = manager.get_secret(&unique_name()).await.unwrap();
    assert!(meta.is_none());
}

#[tokio::test]
async fn live_create_then_destroy() {
    let Some(manager) = live_manager() else {
        return;
    };
    let name = unique_name();

    manager.update_secret(&name, "acceptance-value").await.unwrap();
    let meta = manager.get_secret(&name).await.unwrap().unwrap();
    assert!(meta.name.eq_ignore_ascii_case(&name));
    assert!(meta.created_at.timestamp() > 0);

    manager.update_secret(&name, "updated-value").await.unwrap();

    manager.delete_secret(&name).await.unwrap();
    assert!(manager.get_secret(&name).await.unwrap().is_none());
}
