//! End-to-end tests for the `ghsecrets` binary.
//!
//! Each test runs the binary with a cleared environment and a temporary
//! home directory. Tests that reach the network point `--api-base` at a
//! local wiremock server.

use std::fs;

use assert_cmd::Command;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use crypto_box::aead::OsRng;
use crypto_box::SecretKey;
use predicates::prelude::*;
use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Get a command for running ghsecrets in an isolated environment.
fn ghsecrets(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("ghsecrets").unwrap();
    cmd.env_clear().env("HOME", home.path());
    cmd
}

fn secret_json(name: &str) -> Value {
    json!({
        "name": name,
        "created_at": "2021-03-01T10:00:00Z",
        "updated_at": "2021-03-02T10:00:00Z",
    })
}

mod offline {
    use super::*;

    #[test]
    fn help_flag_works() {
        let home = TempDir::new().unwrap();
        ghsecrets(&home)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("GitHub Actions secrets"));
    }

    #[test]
    fn version_flag_works() {
        let home = TempDir::new().unwrap();
        ghsecrets(&home)
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("ghsecrets"));
    }

    #[test]
    fn completion_needs_no_token() {
        let home = TempDir::new().unwrap();
        ghsecrets(&home)
            .args(["completion", "bash"])
            .assert()
            .success()
            .stdout(predicate::str::contains("ghsecrets"));
    }

    #[test]
    fn missing_token_fails() {
        let home = TempDir::new().unwrap();
        ghsecrets(&home)
            .args(["--owner", "acme", "get", "X"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("no API token found"));
    }

    #[test]
    fn missing_owner_is_invalid_input() {
        let home = TempDir::new().unwrap();
        ghsecrets(&home)
            .env("GH_TOKEN", "ghp_x")
            .args(["get", "X"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("input is invalid"))
            .stderr(predicate::str::contains("hint:"));
    }

    #[test]
    fn environment_without_repository_is_invalid_input() {
        let home = TempDir::new().unwrap();
        ghsecrets(&home)
            .env("GH_TOKEN", "ghp_x")
            .args(["--owner", "acme", "--env", "prod", "delete", "X"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("environment requires a repository"));
    }

    #[test]
    fn set_without_value_is_refused_when_not_interactive() {
        let home = TempDir::new().unwrap();
        ghsecrets(&home)
            .env("GH_TOKEN", "ghp_x")
            .args(["--owner", "acme", "set", "X"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("pass --value or --stdin"));
    }

    #[test]
    fn invalid_config_file_fails() {
        let home = TempDir::new().unwrap();
        let dir = home.path().join(".ghsecrets");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("config.toml"), "visibility = \"everyone\"").unwrap();

        ghsecrets(&home)
            .env("GH_TOKEN", "ghp_x")
            .args(["get", "X"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("failed to load configuration"));
    }
}

mod against_mock_server {
    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn get_missing_secret() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/app/actions/secrets/NOPE"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})))
            .mount(&server)
            .await;
        let home = TempDir::new().unwrap();

        ghsecrets(&home)
            .env("GH_TOKEN", "ghp_x")
            .args(["--api-base", &server.uri(), "--owner", "acme", "--repo", "app"])
            .args(["get", "NOPE"])
            .assert()
            .success()
            .stdout(predicate::str::contains("NOPE: not found"));

        ghsecrets(&home)
            .env("GH_TOKEN", "ghp_x")
            .args(["--api-base", &server.uri(), "--owner", "acme", "--repo", "app"])
            .args(["get", "NOPE", "--fail-missing"])
            .assert()
            .code(2);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn get_json_uses_environment_variables() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/app/actions/secrets/TOKEN"))
            .respond_with(ResponseTemplate::new(200).set_body_json(secret_json("TOKEN")))
            .expect(1)
            .mount(&server)
            .await;
        let home = TempDir::new().unwrap();

        let output = ghsecrets(&home)
            .env("GH_TOKEN", "ghp_x")
            .env("GH_OWNER", "acme")
            .env("GH_REPO", "app")
            .args(["--api-base", &server.uri(), "get", "TOKEN", "--json"])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();

        let body: Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(body["name"], "TOKEN");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn set_from_stdin_seals_value() {
        let server = MockServer::start().await;
        let secret_key = SecretKey::generate(&mut OsRng);
        Mock::given(method("GET"))
            .and(path("/orgs/acme/actions/secrets/public-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "key_id": "kid-1",
                "key": STANDARD.encode(secret_key.public_key().as_bytes()),
            })))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/orgs/acme/actions/secrets/DEPLOY_KEY"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;
        let home = TempDir::new().unwrap();

        ghsecrets(&home)
            .args(["--token", "ghp_x", "--api-base", &server.uri(), "--owner", "acme"])
            .args(["--visibility", "all", "set", "DEPLOY_KEY", "--stdin"])
            .write_stdin("from-stdin\n")
            .assert()
            .success()
            .stdout(predicate::str::contains("Updated secret DEPLOY_KEY"));

        let requests = server.received_requests().await.unwrap();
        let put = requests
            .iter()
            .find(|r| r.method.as_str() == "PUT")
            .unwrap();
        let body: Value = serde_json::from_slice(&put.body).unwrap();
        assert_eq!(body["key_id"], "kid-1");
        assert_eq!(body["visibility"], "all");
        let sealed = STANDARD
            .decode(body["encrypted_value"].as_str().unwrap())
            .unwrap();
        assert_eq!(secret_key.unseal(&sealed).unwrap(), b"from-stdin");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn delete_reads_scope_from_config_file() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/repos/fileorg/filerepo/actions/secrets/OLD"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        let home = TempDir::new().unwrap();
        let dir = home.path().join(".ghsecrets");
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("config.toml"),
            format!(
                "api_base = \"{}\"\nowner = \"fileorg\"\nrepository = \"filerepo\"\n",
                server.uri()
            ),
        )
        .unwrap();

        ghsecrets(&home)
            .env("GITHUB_TOKEN", "ghp_x")
            .args(["-q", "delete", "OLD"])
            .assert()
            .success()
            .stdout(predicate::str::is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn auth_failure_prints_hint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/orgs/acme/actions/secrets/X"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        let home = TempDir::new().unwrap();

        ghsecrets(&home)
            .env("GH_TOKEN", "ghp_bad")
            .args(["--api-base", &server.uri(), "--owner", "acme", "get", "X"])
            .assert()
            .failure()
            .stderr(predicate::str::contains(
                "authentication failed: Invalid or expired token",
            ))
            .stderr(predicate::str::contains("hint:"));
    }
}
