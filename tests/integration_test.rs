use assert_cmd::Command;
use assert_cmd::cargo;
use mockito::{Matcher, Server};
use predicates::prelude::*;
use serde_json::json;
use tempfile::tempdir;

fn thomas(server: &Server) -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("thomas"));
    cmd.env_remove("THOMAS_USERNAME")
        .env_remove("THOMAS_PASSWORD")
        .env_remove("THOMAS_TIMEOUT")
        .env("THOMAS_URL", server.url());
    cmd
}

fn asia() -> serde_json::Value {
    json!({
        "type": "BayesianNetwork",
        "name": "Asia",
        "nodes": [{"RV": "smoke", "states": ["yes", "no"]}]
    })
}

fn mock_token(server: &mut Server, access_token: &str) -> mockito::Mock {
    server
        .mock("POST", "/token")
        .match_body(Matcher::Json(json!({"username": "alice", "password": "pw"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "access_token": access_token,
                "refresh_token": "refresh-token",
                "refresh_url": "/refresh"
            })
            .to_string(),
        )
        .create()
}

#[test]
fn test_list_without_credentials() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/network")
        .match_header("Authorization", Matcher::Missing)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[
                {"id": "asia", "name": "Asia", "owner": "melle", "created": "2020-01-01"},
                {"id": "lung", "name": "Lungcancer", "owner": "jane", "created": "2020-02-01"}
            ]"#,
        )
        .create();

    thomas(&server)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("id    name        owner"))
        .stdout(predicate::str::contains("lung  Lungcancer  jane"))
        .stdout(predicate::str::contains("created").not());

    mock.assert();
}

#[test]
fn test_show_after_authentication() {
    let mut server = Server::new();
    let token = mock_token(&mut server, "acc");
    let network = server
        .mock("GET", "/network/asia")
        .match_header("Authorization", "Bearer acc")
        .with_status(200)
        .with_body(json!({"id": "asia", "owner": "melle", "json": asia()}).to_string())
        .create();

    thomas(&server)
        .args(["--username", "alice", "--password", "pw", "show", "asia"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""owner": "melle""#))
        .stdout(predicate::str::contains(r#""RV": "smoke""#));

    token.assert();
    network.assert();
}

#[test]
fn test_credentials_from_environment() {
    let mut server = Server::new();
    let token = mock_token(&mut server, "acc");
    let list = server
        .mock("GET", "/network")
        .match_header("Authorization", "Bearer acc")
        .with_status(200)
        .with_body("[]")
        .create();

    thomas(&server)
        .env("THOMAS_USERNAME", "alice")
        .env("THOMAS_PASSWORD", "pw")
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No networks found."));

    token.assert();
    list.assert();
}

#[test]
fn test_authentication_requires_status_200() {
    let mut server = Server::new();
    let token = server
        .mock("POST", "/token")
        .with_status(201)
        .with_body(r#"{"access_token": "acc"}"#)
        .create();
    let list = server.mock("GET", "/network").expect(0).create();

    thomas(&server)
        .args(["-u", "alice", "--password", "pw", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to authenticate as 'alice'"));

    token.assert();
    list.assert();
}

#[test]
fn test_expired_token_is_refreshed_once() {
    let mut server = Server::new();
    let _token = mock_token(&mut server, "stale");
    let stale = server
        .mock("GET", "/network/asia")
        .match_header("Authorization", "Bearer stale")
        .with_status(401)
        .with_body(r#"{"msg": "Token has expired"}"#)
        .expect(1)
        .create();
    let refresh = server
        .mock("POST", "/refresh")
        .match_header("Authorization", "Bearer refresh-token")
        .with_status(200)
        .with_body(r#"{"_access_token": "fresh"}"#)
        .expect(1)
        .create();
    let fresh = server
        .mock("GET", "/network/asia")
        .match_header("Authorization", "Bearer fresh")
        .with_status(200)
        .with_body(json!({"id": "asia", "json": asia()}).to_string())
        .expect(1)
        .create();

    thomas(&server)
        .args(["-u", "alice", "--password", "pw", "show", "asia"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""name": "Asia""#));

    stale.assert();
    refresh.assert();
    fresh.assert();
}

#[test]
fn test_push_creates_network() {
    let mut server = Server::new();
    let dir = tempdir().unwrap();
    let file = dir.path().join("asia.json");
    std::fs::write(&file, asia().to_string()).unwrap();

    let create = server
        .mock("POST", "/network")
        .match_body(Matcher::Json(json!({"name": "Asia", "json": asia()})))
        .with_status(200)
        .with_body(json!({"id": "n-1", "name": "Asia", "json": asia()}).to_string())
        .create();

    thomas(&server)
        .arg("push")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""id": "n-1""#))
        .stdout(predicate::str::contains("RV").not());

    create.assert();
}

#[test]
fn test_push_save_as() {
    let mut server = Server::new();
    let dir = tempdir().unwrap();
    let file = dir.path().join("asia.json");
    std::fs::write(&file, asia().to_string()).unwrap();

    let save_as = server
        .mock("POST", "/network")
        .match_body(Matcher::Json(
            json!({"id": "asia-copy", "name": "Asia", "json": asia()}),
        ))
        .with_status(200)
        .with_body(json!({"id": "asia-copy", "name": "Asia", "json": asia()}).to_string())
        .create();

    thomas(&server)
        .arg("push")
        .arg(&file)
        .args(["--as", "asia-copy"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""id": "asia-copy""#));

    save_as.assert();
}

#[test]
fn test_server_error_is_reported() {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/network/missing")
        .with_status(404)
        .with_body(r#"{"message": "Network not found"}"#)
        .create();

    thomas(&server)
        .args(["show", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load network 'missing'"))
        .stderr(predicate::str::contains("HTTP 404: Network not found"));
}

#[test]
fn test_raw_request() {
    let mut server = Server::new();
    let mock = server
        .mock("DELETE", "/network/asia")
        .match_query(Matcher::UrlEncoded("force".into(), "1".into()))
        .with_status(200)
        .with_body(r#"{"deleted": true}"#)
        .create();

    thomas(&server)
        .args(["request", "delete", "network/asia", "-q", "force=1"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""deleted": true"#));

    mock.assert();
}
