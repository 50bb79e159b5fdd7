// Integration tests: HTTP endpoints over a live pipeline

mod common;

use axum_test::TestServer;
use common::*;
use edgemax_exporter::aggregator::Aggregator;
use edgemax_exporter::config::AppConfig;
use edgemax_exporter::exporter::Exporter;
use edgemax_exporter::models::StatSnapshot;
use edgemax_exporter::routes;
use edgemax_exporter::source::ChannelSource;
use std::time::Duration;
use tokio::sync::mpsc;

const TEST_CONFIG: &str = r#"
[server]
port = 9132
host = "127.0.0.1"
"#;

fn test_app_config() -> AppConfig {
    AppConfig::load_from_str(TEST_CONFIG).unwrap()
}

fn test_app(config: &AppConfig) -> (TestServer, mpsc::Sender<StatSnapshot>, Aggregator) {
    let (mut source, tx) = ChannelSource::new(8).unwrap();
    let (exporter, aggregator) = Exporter::new(&mut source, &config.metrics).unwrap();
    let registry = prometheus::Registry::new();
    registry.register(Box::new(exporter)).unwrap();
    let server = TestServer::new(routes::app(registry, &config.server)).unwrap();
    (server, tx, aggregator)
}

/// Scrapes `path` until `needle` shows up in the body, for up to two seconds.
async fn scrape_until(server: &TestServer, path: &str, needle: &str) -> String {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    loop {
        let body = server.get(path).await.text();
        if body.contains(needle) || tokio::time::Instant::now() >= deadline {
            return body;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

#[tokio::test]
async fn test_metrics_endpoint_exposes_ingested_values() {
    let config = test_app_config();
    let (server, tx, _aggregator) = test_app(&config);

    tx.send(StatSnapshot::Dpi(vec![dpi_stat("10.0.0.5", "web", "http", 1000, 200)]))
        .await
        .unwrap();
    tx.send(StatSnapshot::System(system_stats(42.5, Duration::from_secs(3661), 67.1)))
        .await
        .unwrap();

    let body = scrape_until(&server, "/metrics", "edgemax_system_uptime_seconds 3661").await;
    assert!(body.contains("# HELP edgemax_dpi_received_bytes Number of bytes received by devices (client download)"));
    assert!(body.contains("# TYPE edgemax_dpi_received_bytes gauge"));
    assert!(body.contains(
        r#"edgemax_dpi_received_bytes{category="web",client_ip="10.0.0.5",type="http"} 1000"#
    ));
    assert!(body.contains(
        r#"edgemax_dpi_transmitted_bytes{category="web",client_ip="10.0.0.5",type="http"} 200"#
    ));
    assert!(body.contains("edgemax_system_cpu_percent 42.5"));
    assert!(body.contains("edgemax_system_memory_percent 67.1"));
}

#[tokio::test]
async fn test_metrics_endpoint_sets_text_content_type() {
    let config = test_app_config();
    let (server, _tx, _aggregator) = test_app(&config);
    let response = server.get("/metrics").await;
    response.assert_status_ok();
    let content_type = response.header("content-type");
    assert!(content_type.to_str().unwrap().starts_with("text/plain"));
}

#[tokio::test]
async fn test_metrics_still_served_after_upstream_closes() {
    let config = test_app_config();
    let (server, tx, mut aggregator) = test_app(&config);

    tx.send(StatSnapshot::Interfaces(vec![interface_stat("eth0", "m0", 7, 8)]))
        .await
        .unwrap();
    drop(tx);
    assert!(aggregator.join_dispatch(Duration::from_secs(2)).await);

    let body = scrape_until(&server, "/metrics", "edgemax_interfaces_received_bytes").await;
    assert!(body.contains(r#"edgemax_interfaces_received_bytes{mac="m0",name="eth0"} 7"#));
    server.get("/metrics").await.assert_status_ok();
}

#[tokio::test]
async fn test_root_redirects_to_metrics_path() {
    let config = test_app_config();
    let (server, _tx, _aggregator) = test_app(&config);
    let response = server.get("/").await;
    assert_eq!(response.status_code().as_u16(), 301);
    assert_eq!(response.header("location").to_str().unwrap(), "/metrics");
}

#[tokio::test]
async fn test_custom_metrics_path() {
    let config = AppConfig::load_from_str(
        r#"
[server]
port = 9132
host = "127.0.0.1"
metrics_path = "/edgemax/metrics"
"#,
    )
    .unwrap();
    let (server, _tx, _aggregator) = test_app(&config);

    server.get("/edgemax/metrics").await.assert_status_ok();
    let response = server.get("/").await;
    assert_eq!(
        response.header("location").to_str().unwrap(),
        "/edgemax/metrics"
    );
}

#[tokio::test]
async fn test_version_endpoint() {
    let config = test_app_config();
    let (server, _tx, _aggregator) = test_app(&config);
    let response = server.get("/version").await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    assert_eq!(
        json.get("name").and_then(|v| v.as_str()),
        Some("edgemax-exporter")
    );
    assert!(json.get("version").and_then(|v| v.as_str()).is_some());
}
