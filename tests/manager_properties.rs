//! Behavioural properties of the secret manager, checked against the
//! in-memory mock platform.

use std::sync::Arc;

use proptest::prelude::*;

use ghsecrets::manager::crypto::seal;
use ghsecrets::manager::{ErrorKind, ManagerConfig, Scope, SecretManager};
use ghsecrets::platform::mock::{MockOperation, MockPlatform, ScopeKey};

fn manager(platform: &MockPlatform, config: ManagerConfig) -> SecretManager {
    SecretManager::new(config, Arc::new(platform.clone()))
}

fn env_config() -> ManagerConfig {
    ManagerConfig::new("acme")
        .with_repository("app")
        .with_environment("prod")
}

fn writes(platform: &MockPlatform) -> Vec<(String, String)> {
    platform
        .operations()
        .into_iter()
        .filter_map(|op| match op {
            MockOperation::CreateOrUpdateSecret {
                name,
                encrypted_value,
                ..
            } => Some((name, encrypted_value)),
            _ => None,
        })
        .collect()
}

// =============================================================================
// Configuration Validation
// =============================================================================

mod validation {
    use super::*;

    #[tokio::test]
    async fn empty_owner_fails_everything_without_calls() {
        for config in [
            ManagerConfig::new(""),
            ManagerConfig::new("").with_repository("app"),
            ManagerConfig::new("")
                .with_repository("app")
                .with_environment("prod"),
        ] {
            let platform = MockPlatform::new();
            let m = manager(&platform, config);
            assert_eq!(m.get_secret("A").await.unwrap_err().kind(), ErrorKind::InvalidInput);
            assert_eq!(
                m.update_secret("A", "v").await.unwrap_err().kind(),
                ErrorKind::InvalidInput
            );
            assert_eq!(m.delete_secret("A").await.unwrap_err().kind(), ErrorKind::InvalidInput);
            assert!(platform.operations().is_empty());
        }
    }

    #[tokio::test]
    async fn environment_without_repository_fails_everything() {
        let platform = MockPlatform::new();
        let m = manager(&platform, ManagerConfig::new("acme").with_environment("prod"));
        assert_eq!(m.get_secret("A").await.unwrap_err().kind(), ErrorKind::InvalidInput);
        assert_eq!(
            m.update_secret("A", "v").await.unwrap_err().kind(),
            ErrorKind::InvalidInput
        );
        assert_eq!(m.delete_secret("A").await.unwrap_err().kind(), ErrorKind::InvalidInput);
        assert!(platform.operations().is_empty());
    }
}

// =============================================================================
// Resolution and Caching
// =============================================================================

mod caching {
    use super::*;

    #[tokio::test]
    async fn many_calls_resolve_once() {
        let platform = MockPlatform::new().with_repository("acme", "app", Some(5));
        let m = manager(&platform, env_config());

        for i in 0..5 {
            m.update_secret(&format!("S{}", i), "v").await.unwrap();
            m.get_secret(&format!("S{}", i)).await.unwrap();
        }
        m.delete_secret("S0").await.unwrap();

        assert_eq!(
            platform.count_operations(|op| matches!(op, MockOperation::GetRepository { .. })),
            1
        );
        assert_eq!(m.scope(), Some(Scope::Environment));
    }

    #[tokio::test]
    async fn two_writes_fetch_key_once_and_differ() {
        let platform = MockPlatform::new();
        let m = manager(&platform, ManagerConfig::new("acme").with_repository("app"));

        m.update_secret("SAME", "value").await.unwrap();
        m.update_secret("SAME", "value").await.unwrap();

        assert_eq!(
            platform.count_operations(|op| matches!(op, MockOperation::GetPublicKey { .. })),
            1
        );
        let writes = writes(&platform);
        assert_eq!(writes.len(), 2);
        assert_ne!(writes[0].1, writes[1].1);
        assert_eq!(
            platform
                .reveal(&ScopeKey::repo("acme", "app"), "SAME")
                .unwrap(),
            b"value"
        );
    }

    #[tokio::test]
    async fn separate_managers_do_not_share_state() {
        let platform = MockPlatform::new();
        let a = manager(&platform, ManagerConfig::new("acme"));
        let b = manager(&platform, ManagerConfig::new("acme"));
        a.update_secret("X", "1").await.unwrap();
        b.update_secret("Y", "2").await.unwrap();
        assert_eq!(
            platform.count_operations(|op| matches!(op, MockOperation::GetPublicKey { .. })),
            2
        );
    }
}

// =============================================================================
// Lifecycle
// =============================================================================

mod lifecycle {
    use super::*;

    async fn round_trip(platform: MockPlatform, config: ManagerConfig, scope: ScopeKey) {
        let m = manager(&platform, config);

        assert!(m.get_secret("ROUND_TRIP").await.unwrap().is_none());

        m.update_secret("ROUND_TRIP", "payload").await.unwrap();
        let meta = m.get_secret("round_trip").await.unwrap().unwrap();
        assert!(meta.name.eq_ignore_ascii_case("round_trip"));
        assert!(meta.created_at.timestamp() > 0);
        assert!(meta.updated_at.timestamp() > 0);
        assert_eq!(platform.reveal(&scope, "ROUND_TRIP").unwrap(), b"payload");

        m.delete_secret("ROUND_TRIP").await.unwrap();
        assert!(m.get_secret("ROUND_TRIP").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn organization() {
        round_trip(
            MockPlatform::new(),
            ManagerConfig::new("acme"),
            ScopeKey::org("acme"),
        )
        .await;
    }

    #[tokio::test]
    async fn repository() {
        round_trip(
            MockPlatform::new(),
            ManagerConfig::new("acme").with_repository("app"),
            ScopeKey::repo("acme", "app"),
        )
        .await;
    }

    #[tokio::test]
    async fn environment() {
        round_trip(
            MockPlatform::new().with_repository("acme", "app", Some(12)),
            env_config(),
            ScopeKey::env(12, "prod"),
        )
        .await;
    }

    #[tokio::test]
    async fn scopes_are_isolated() {
        let platform = MockPlatform::new().with_repository("acme", "app", Some(12));
        let org = manager(&platform, ManagerConfig::new("acme"));
        let repo = manager(&platform, ManagerConfig::new("acme").with_repository("app"));
        let env = manager(&platform, env_config());

        repo.update_secret("SHARED_NAME", "repo").await.unwrap();

        assert!(org.get_secret("SHARED_NAME").await.unwrap().is_none());
        assert!(env.get_secret("SHARED_NAME").await.unwrap().is_none());
        assert!(repo.get_secret("SHARED_NAME").await.unwrap().is_some());
    }
}

// =============================================================================
// Environment Resolution Failures
// =============================================================================

mod environment_ids {
    use super::*;

    #[tokio::test]
    async fn zero_and_missing_ids_are_unable() {
        for id in [None, Some(0)] {
            let platform = MockPlatform::new().with_repository("acme", "app", id);
            let m = manager(&platform, env_config());
            assert_eq!(m.get_secret("A").await.unwrap_err().kind(), ErrorKind::Unable);
            assert_eq!(
                m.update_secret("A", "v").await.unwrap_err().kind(),
                ErrorKind::Unable
            );
            assert_eq!(m.delete_secret("A").await.unwrap_err().kind(), ErrorKind::Unable);
        }
    }

    #[tokio::test]
    async fn unknown_repository_is_platform_not_found() {
        let platform = MockPlatform::new();
        let m = manager(&platform, env_config());
        let err = m.get_secret("A").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Platform);
        assert!(err.platform_error().is_some_and(|e| e.is_not_found()));
    }
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn stored_values_unseal_to_plaintext(value in proptest::collection::vec(any::<u8>(), 0..256)) {
        let platform = MockPlatform::new();
        let m = manager(&platform, ManagerConfig::new("acme").with_repository("app"));

        let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
        rt.block_on(m.update_secret("P", &value)).unwrap();

        prop_assert_eq!(
            platform.reveal(&ScopeKey::repo("acme", "app"), "P").unwrap(),
            value
        );
    }

    #[test]
    fn sealing_is_randomised(value in proptest::collection::vec(any::<u8>(), 1..64)) {
        let key = "hBT5WZEj8ZoOv6TYJsfWq7MxTEQopZO5/IT3ZCVQPzs=";
        let a = seal(key, &value).unwrap();
        let b = seal(key, &value).unwrap();
        prop_assert_ne!(a, b);
    }
}
