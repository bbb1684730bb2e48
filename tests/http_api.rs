//! HTTP Boundary Tests
//!
//! Drives the API server over a real socket: health, predict, schema
//! rejection, and the degraded no-model path.

use std::net::SocketAddr;
use std::sync::Arc;

use linfa::prelude::*;
use linfa_trees::DecisionTree;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use irisserve::model::TreeModel;
use irisserve::server::{serve_api, serve_metrics};
use irisserve::service::Service;

fn trained_service() -> Arc<Service> {
    let dataset = linfa_datasets::iris();
    let model = TreeModel::new(DecisionTree::params().fit(&dataset).unwrap());
    Arc::new(Service::with_model(Arc::new(model)))
}

async fn spawn_api(service: Arc<Service>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let _ = serve_api(listener, service).await;
    });

    addr
}

async fn send_request(addr: SocketAddr, raw: String) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(raw.as_bytes()).await.unwrap();

    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    String::from_utf8_lossy(&response).into_owned()
}

fn get(path: &str) -> String {
    format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
}

fn post_json(path: &str, body: &str) -> String {
    format!(
        "POST {path} HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
}

#[tokio::test]
async fn test_health_endpoint() {
    let addr = spawn_api(trained_service()).await;

    let response = send_request(addr, get("/")).await;
    assert!(response.starts_with("HTTP/1.1 200"));
    assert!(response.contains("\"status\":\"healthy\""));
    assert!(response.contains("\"version\""));
}

#[tokio::test]
async fn test_health_endpoint_without_model() {
    let addr = spawn_api(Arc::new(Service::without_model())).await;

    let response = send_request(addr, get("/")).await;
    assert!(response.starts_with("HTTP/1.1 200"));
    assert!(response.contains("\"status\":\"healthy\""));
}

#[tokio::test]
async fn test_predict_endpoint() {
    let addr = spawn_api(trained_service()).await;

    let body = r#"{"sepal_length":5.1,"sepal_width":3.5,"petal_length":1.4,"petal_width":0.2}"#;
    let response = send_request(addr, post_json("/predict", body)).await;

    assert!(response.starts_with("HTTP/1.1 200"));
    assert!(response.contains("\"prediction\":0"));
    assert!(response.contains("\"class_name\":\"setosa\""));
}

#[tokio::test]
async fn test_predict_rejects_missing_field() {
    let addr = spawn_api(trained_service()).await;

    let body = r#"{"sepal_length":5.1,"sepal_width":3.5,"petal_length":1.4}"#;
    let response = send_request(addr, post_json("/predict", body)).await;

    assert!(response.starts_with("HTTP/1.1 422"));
    assert!(response.contains("\"detail\""));
    assert!(response.contains("petal_width"));
}

#[tokio::test]
async fn test_predict_rejects_non_numeric_field() {
    let addr = spawn_api(trained_service()).await;

    let body =
        r#"{"sepal_length":"long","sepal_width":3.5,"petal_length":1.4,"petal_width":0.2}"#;
    let response = send_request(addr, post_json("/predict", body)).await;

    assert!(response.starts_with("HTTP/1.1 422"));
}

#[tokio::test]
async fn test_predict_without_model_is_service_unavailable() {
    let addr = spawn_api(Arc::new(Service::without_model())).await;

    let body = r#"{"sepal_length":5.1,"sepal_width":3.5,"petal_length":1.4,"petal_width":0.2}"#;
    let response = send_request(addr, post_json("/predict", body)).await;

    assert!(response.starts_with("HTTP/1.1 503"));
    assert!(response.contains("\"detail\""));
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let addr = spawn_api(trained_service()).await;

    let response = send_request(addr, get("/nope")).await;
    assert!(response.starts_with("HTTP/1.1 404"));
}

#[tokio::test]
async fn test_metrics_exposition() {
    let api_addr = spawn_api(trained_service()).await;

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let metrics_addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = serve_metrics(listener).await;
    });

    // One served prediction so the counters have something to show.
    let body = r#"{"sepal_length":5.1,"sepal_width":3.5,"petal_length":1.4,"petal_width":0.2}"#;
    send_request(api_addr, post_json("/predict", body)).await;

    let response = send_request(metrics_addr, get("/metrics")).await;
    assert!(response.starts_with("HTTP/1.1 200"));
    assert!(response.contains("irisserve_predictions_total"));
    assert!(response.contains("irisserve_predict_duration_seconds"));
}
