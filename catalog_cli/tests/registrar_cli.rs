//! End-to-end runs of the CLI against a mock Consul agent.

use clap::Parser;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use std::process::ExitCode;

use catalog_cli::{execute, run, Cli};
use catalog_shared_types::DesiredState;

fn cli_for(server: &MockServer, extra: &[&str]) -> Cli {
    let address = server.address();
    let host = address.ip().to_string();
    let port = address.port().to_string();
    let mut argv = vec![
        "consul-catalog",
        "--consul-host",
        host.as_str(),
        "--consul-port",
        port.as_str(),
        "--node",
        "db1.example.net",
        "--address",
        "10.0.0.5",
    ];
    argv.extend_from_slice(extra);
    Cli::try_parse_from(argv).unwrap()
}

async fn mount_listing(server: &MockServer, nodes: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/v1/catalog/nodes"))
        .and(query_param("dc", "dc1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(nodes))
        .mount(server)
        .await;
}

#[tokio::test]
async fn present_always_registers() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/v1/catalog/register"))
        .and(body_json(json!({
            "Datacenter": "dc1",
            "Node": "db1.example.net",
            "Address": "10.0.0.5",
            "Service": {"ID": "db1_postgres", "Service": "postgres", "Port": 5432}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string("true"))
        .expect(2)
        .mount(&server)
        .await;

    let cli = cli_for(
        &server,
        &["--service", "{'ID': 'db1_postgres', 'Service': 'postgres', 'Port': 5432}"],
    );

    for _ in 0..2 {
        let (request, outcome) = execute(&cli).await.unwrap();
        assert_eq!(request.state, DesiredState::Present);
        assert!(outcome.changed);
        assert_eq!(outcome.meta, json!(true));
    }
}

#[tokio::test]
async fn absent_skips_missing_node() {
    let server = MockServer::start().await;
    mount_listing(
        &server,
        json!([{"Node": "web1.example.net", "Address": "10.0.0.6", "Datacenter": "dc1"}]),
    )
    .await;
    Mock::given(method("PUT"))
        .and(path("/v1/catalog/deregister"))
        .respond_with(ResponseTemplate::new(200).set_body_string("true"))
        .expect(0)
        .mount(&server)
        .await;

    let cli = cli_for(&server, &["--state", "absent"]);
    let (_, outcome) = execute(&cli).await.unwrap();

    assert!(!outcome.changed);
    assert!(outcome.meta.is_null());
}

#[tokio::test]
async fn absent_deregisters_listed_node() {
    let server = MockServer::start().await;
    mount_listing(
        &server,
        json!([{"Node": "db1.example.net", "Address": "10.0.0.5", "Datacenter": "dc1"}]),
    )
    .await;
    Mock::given(method("PUT"))
        .and(path("/v1/catalog/deregister"))
        .and(body_json(json!({"Datacenter": "dc1", "Node": "db1.example.net"})))
        .respond_with(ResponseTemplate::new(200).set_body_string("true"))
        .expect(1)
        .mount(&server)
        .await;

    let cli = cli_for(&server, &["--state", "absent"]);
    let (_, outcome) = execute(&cli).await.unwrap();

    assert!(outcome.changed);
    assert_eq!(outcome.meta, json!(true));
}

#[tokio::test]
async fn api_failure_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/v1/catalog/register"))
        .respond_with(ResponseTemplate::new(500).set_body_string("rpc error"))
        .mount(&server)
        .await;

    let cli = cli_for(&server, &[]);
    let err = execute(&cli).await.unwrap_err();
    let msg = format!("{:#}", err);

    assert!(msg.contains("db1.example.net"), "{msg}");
    assert!(msg.contains("500"), "{msg}");
}

#[tokio::test]
async fn bad_host_fails_before_any_request() {
    let cli = Cli::try_parse_from([
        "consul-catalog",
        "--consul-host",
        "bad host",
        "--node",
        "db1",
        "--address",
        "10.0.0.5",
    ])
    .unwrap();

    let err = execute(&cli).await.unwrap_err();
    assert!(format!("{:#}", err).contains("failed to connect"));
}

#[tokio::test]
async fn unreachable_agent_prints_failure_document() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port().to_string();
    drop(listener);

    let cli = Cli::try_parse_from([
        "consul-catalog",
        "--consul-host",
        "127.0.0.1",
        "--consul-port",
        port.as_str(),
        "--node",
        "db1",
        "--address",
        "10.0.0.5",
    ])
    .unwrap();

    let (document, status) = run(&cli).await;
    let parsed: serde_json::Value = serde_json::from_str(&document).unwrap();

    assert_eq!(status, ExitCode::FAILURE);
    assert_eq!(parsed["failed"], json!(true));
    assert!(parsed["msg"].as_str().unwrap().contains("db1"), "{document}");
}

#[tokio::test]
async fn successful_run_prints_outcome_document() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/v1/catalog/register"))
        .respond_with(ResponseTemplate::new(200).set_body_string("true"))
        .mount(&server)
        .await;

    let (document, status) = run(&cli_for(&server, &[])).await;
    let parsed: serde_json::Value = serde_json::from_str(&document).unwrap();

    assert_eq!(status, ExitCode::SUCCESS);
    assert_eq!(parsed, json!({"changed": true, "meta": true}));
}
