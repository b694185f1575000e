//! HTTP surface tests, driven through the router without binding a socket

mod common;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use resume_screener::server::build_router;
use resume_screener::server::state::AppState;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

const BOUNDARY: &str = "screener-test-boundary";
const UPLOAD_LIMIT: usize = 1024 * 1024;

fn app(upload_dir: &TempDir, limit: usize) -> Router {
    let state = AppState::new(common::default_screener(), upload_dir.path().to_path_buf());
    build_router(state, limit)
}

fn multipart_body(field: &str, file_name: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health() {
    let upload_dir = TempDir::new().unwrap();
    let response = app(&upload_dir, UPLOAD_LIMIT)
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["model"], "hashing");
    assert_eq!(body["roles"], 5);
}

#[tokio::test]
async fn test_list_roles() {
    let upload_dir = TempDir::new().unwrap();
    let response = app(&upload_dir, UPLOAD_LIMIT)
        .oneshot(Request::builder().uri("/api/roles").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let roles = body.as_array().unwrap();
    assert_eq!(roles.len(), 5);
    assert_eq!(roles[3]["title"], "DevOps Engineer");
    assert_eq!(roles[3]["desc"], "AWS, Docker, Kubernetes, CI/CD");
}

#[tokio::test]
async fn test_upload_resume_ranks_roles() {
    let upload_dir = TempDir::new().unwrap();
    let resume = b"DevOps engineer running Docker and Kubernetes on AWS with CI/CD";
    let response = app(&upload_dir, UPLOAD_LIMIT)
        .oneshot(upload_request(
            "/upload_resume",
            multipart_body("resume", "my resume.txt", resume),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let scores = body["scores"].as_array().unwrap();
    assert_eq!(scores.len(), 5);
    assert_eq!(scores[0]["title"], "DevOps Engineer");
    assert_eq!(body["resume"], "my resume.txt");
    assert_eq!(body["resume_text"], std::str::from_utf8(resume).unwrap());
    assert_eq!(body["extraction"]["status"], "extracted");

    let saved: Vec<String> = std::fs::read_dir(upload_dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(saved.len(), 1);
    let (prefix, rest) = saved[0].split_once('_').unwrap();
    assert_eq!(prefix.len(), 8);
    assert!(prefix.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(rest, "my_resume.txt");
}

#[tokio::test]
async fn test_upload_corrupt_pdf_is_degraded_not_failed() {
    let upload_dir = TempDir::new().unwrap();
    let response = app(&upload_dir, UPLOAD_LIMIT)
        .oneshot(upload_request(
            "/upload_resume",
            multipart_body("resume", "cv.pdf", b"not a pdf"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["extraction"]["status"], "failed");
    assert_eq!(body["extraction"]["error_kind"], "pdf");
    assert_eq!(body["scores"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_upload_rejects_unsupported_extension() {
    let upload_dir = TempDir::new().unwrap();
    let response = app(&upload_dir, UPLOAD_LIMIT)
        .oneshot(upload_request(
            "/upload_resume",
            multipart_body("resume", "photo.png", b"\x89PNG"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "UNSUPPORTED_FILE_TYPE");
    assert_eq!(std::fs::read_dir(upload_dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_upload_without_resume_field() {
    let upload_dir = TempDir::new().unwrap();
    let response = app(&upload_dir, UPLOAD_LIMIT)
        .oneshot(upload_request(
            "/upload_resume",
            multipart_body("attachment", "cv.txt", b"python"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["message"], "No file uploaded");
}

#[tokio::test]
async fn test_upload_with_empty_filename() {
    let upload_dir = TempDir::new().unwrap();
    let response = app(&upload_dir, UPLOAD_LIMIT)
        .oneshot(upload_request(
            "/upload_resume",
            multipart_body("resume", "", b""),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"]["message"], "No selected file");
}

#[tokio::test]
async fn test_upload_over_limit() {
    let upload_dir = TempDir::new().unwrap();
    let response = app(&upload_dir, 256)
        .oneshot(upload_request(
            "/upload_resume",
            multipart_body("resume", "big.txt", &[b'a'; 4096]),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_extract_text_without_file() {
    let upload_dir = TempDir::new().unwrap();
    let response = app(&upload_dir, UPLOAD_LIMIT)
        .oneshot(upload_request(
            "/extract_text",
            multipart_body("other", "notes.txt", b"ignored"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body, serde_json::json!({ "text": "" }));
}

#[tokio::test]
async fn test_extract_text_returns_contents() {
    let upload_dir = TempDir::new().unwrap();
    let response = app(&upload_dir, UPLOAD_LIMIT)
        .oneshot(upload_request(
            "/extract_text",
            multipart_body("file", "cv.txt", b"Rust and Tokio"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["text"], "Rust and Tokio");
    assert!(body.get("warning").is_none());
}
