use std::io::Write;
use std::net::TcpListener;
use std::time::Duration;

use reqwest::Client;
use serde_json::json;
use tempfile::NamedTempFile;
use tokio::time::{sleep, timeout};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Find an available port
fn get_available_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

/// Create a minimal valid config
fn minimal_config(port: u16) -> String {
    format!(
        r#"
[server]
host = "127.0.0.1"
port = {}
"#,
        port
    )
}

fn write_config(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(content.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

/// Spawn the server and return a handle
async fn spawn_server(config_path: &std::path::Path) -> tokio::process::Child {
    tokio::process::Command::new(env!("CARGO_BIN_EXE_streamhub"))
        .env("STREAMHUB_CONFIG", config_path)
        .env("RUST_LOG", "error") // Quiet logs during tests
        .kill_on_drop(true)
        .spawn()
        .expect("Failed to spawn server")
}

/// Wait for server to be ready
async fn wait_for_server(port: u16, max_attempts: u32) -> bool {
    let client = Client::new();
    for _ in 0..max_attempts {
        if client
            .get(format!("http://127.0.0.1:{}/api/v1/health", port))
            .send()
            .await
            .is_ok()
        {
            return true;
        }
        sleep(Duration::from_millis(50)).await;
    }
    false
}

async fn run_to_exit(config_path: &std::path::Path) -> std::process::Output {
    timeout(
        Duration::from_secs(5),
        tokio::process::Command::new(env!("CARGO_BIN_EXE_streamhub"))
            .env("STREAMHUB_CONFIG", config_path)
            .env("RUST_LOG", "error")
            .output(),
    )
    .await
    .expect("Command timed out")
    .expect("Failed to execute command")
}

#[tokio::test]
async fn test_health_endpoint() {
    let port = get_available_port();
    let temp_file = write_config(&minimal_config(port));

    // Start server
    let mut server = spawn_server(temp_file.path()).await;

    // Wait for server to be ready
    assert!(
        wait_for_server(port, 40).await,
        "Server did not start in time"
    );

    let client = Client::new();
    let response = client
        .get(format!("http://127.0.0.1:{}/api/v1/health", port))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let json: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["status"], "ok");

    // Cleanup
    server.kill().await.ok();
}

#[tokio::test]
async fn test_zero_addons_discover_serves_fallback() {
    let port = get_available_port();
    let temp_file = write_config(&minimal_config(port));
    let mut server = spawn_server(temp_file.path()).await;
    assert!(
        wait_for_server(port, 40).await,
        "Server did not start in time"
    );

    let response = Client::new()
        .get(format!(
            "http://127.0.0.1:{}/api/v1/discover/series/trending",
            port
        ))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let json: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(json["metadata"]["source"], "mock_fallback");
    assert!(!json["data"]["metas"].as_array().unwrap().is_empty());

    server.kill().await.ok();
}

#[tokio::test]
async fn test_config_endpoint_returns_sanitized() {
    let port = get_available_port();
    let config = format!(
        "{}\n[tmdb]\napi_key = \"do-not-leak\"\n",
        minimal_config(port)
    );
    let temp_file = write_config(&config);

    let mut server = spawn_server(temp_file.path()).await;
    assert!(
        wait_for_server(port, 40).await,
        "Server did not start in time"
    );

    let response = Client::new()
        .get(format!("http://127.0.0.1:{}/api/v1/config", port))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let text = response.text().await.expect("Failed to read body");
    assert!(!text.contains("do-not-leak"));
    let json: serde_json::Value = serde_json::from_str(&text).expect("Failed to parse JSON");
    assert_eq!(json["data"]["server"]["port"], port);
    assert_eq!(json["data"]["tmdb"]["api_key_configured"], true);

    server.kill().await.ok();
}

#[tokio::test]
async fn test_seed_addons_are_loaded_at_startup() {
    let addon = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/manifest.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "seeded",
            "name": "Seeded",
            "version": "1.0.0",
            "resources": ["catalog"],
            "types": ["movie"],
            "catalogs": [{"type": "movie", "id": "top"}]
        })))
        .mount(&addon)
        .await;

    let port = get_available_port();
    let config = format!(
        "{}\n[[addons.seeds]]\nid = \"seeded\"\nurl = \"{}\"\n",
        minimal_config(port),
        addon.uri()
    );
    let temp_file = write_config(&config);

    let mut server = spawn_server(temp_file.path()).await;
    assert!(
        wait_for_server(port, 40).await,
        "Server did not start in time"
    );

    let client = Client::new();
    let mut loaded = false;
    for _ in 0..40 {
        let json: serde_json::Value = client
            .get(format!("http://127.0.0.1:{}/api/v1/addons", port))
            .send()
            .await
            .expect("Failed to send request")
            .json()
            .await
            .expect("Failed to parse JSON");
        if json["data"][0]["id"] == "seeded" {
            loaded = true;
            break;
        }
        sleep(Duration::from_millis(50)).await;
    }
    assert!(loaded, "Seed addon was not registered");

    server.kill().await.ok();
}

#[tokio::test]
async fn test_missing_config_file_exits_with_error() {
    let result = run_to_exit(std::path::Path::new("/nonexistent/config.toml")).await;
    assert!(!result.status.success());
}

#[tokio::test]
async fn test_invalid_config_exits_with_error() {
    let temp_file = write_config(
        r#"
[server]
port = 8080

[cache]
ttl_secs = 0
"#,
    );

    let result = run_to_exit(temp_file.path()).await;
    assert!(!result.status.success());
}
