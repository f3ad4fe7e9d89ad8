//! Photo Upload API Tests

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::Value;

use crate::common::{body_bytes, json_body, TestApp};

const BOUNDARY: &str = "garage-test-boundary";

enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        field: &'a str,
        file_name: &'a str,
        content_type: &'a str,
        bytes: &'a [u8],
    },
}

fn multipart(parts: &[Part<'_>]) -> Request<Body> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n", name, value)
                        .as_bytes(),
                );
            }
            Part::File {
                field,
                file_name,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                        field, file_name, content_type
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
                body.extend_from_slice(b"\r\n");
            }
        }
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/upload")
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

fn photo<'a>(bytes: &'a [u8]) -> Part<'a> {
    Part::File {
        field: "photo",
        file_name: "dent.png",
        content_type: "image/png",
        bytes,
    }
}

const PNG: &[u8] = b"\x89PNG\r\n\x1a\nfake-image-data";

#[tokio::test]
async fn test_upload_photo_is_served_back() {
    let app = TestApp::new().await;

    let response = app.send(multipart(&[photo(PNG)])).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = json_body(response).await;
    let url = json["url"].as_str().unwrap();
    assert!(url.starts_with("/uploads/"));
    assert!(url.ends_with(".png"));
    assert_eq!(json["size"], PNG.len());

    let served = app.get(url).await;
    assert_eq!(served.status(), StatusCode::OK);
    assert_eq!(body_bytes(served).await, PNG);
}

#[tokio::test]
async fn test_upload_attaches_photo_to_order() {
    let app = TestApp::new().await;
    app.seed_order("9", "process");

    let response = app
        .send(multipart(&[Part::Text("orderId", "9"), photo(PNG)]))
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let url = json_body(response).await["url"].as_str().unwrap().to_string();

    let order = json_body(app.get("/api/orders/9").await).await;
    assert_eq!(order["photos"], Value::from(vec![url]));
}

#[tokio::test]
async fn test_upload_accepts_file_field_name() {
    let app = TestApp::new().await;

    let response = app
        .send(multipart(&[Part::File {
            field: "file",
            file_name: "engine.jpeg",
            content_type: "image/jpeg",
            bytes: PNG,
        }]))
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_upload_for_unknown_order() {
    let app = TestApp::new().await;

    let response = app
        .send(multipart(&[Part::Text("orderId", "ghost"), photo(PNG)]))
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_upload_rejects_non_images() {
    let app = TestApp::new().await;

    let response = app
        .send(multipart(&[Part::File {
            field: "photo",
            file_name: "notes.txt",
            content_type: "text/plain",
            bytes: b"hello",
        }]))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_without_file() {
    let app = TestApp::new().await;

    let response = app.send(multipart(&[Part::Text("orderId", "9")])).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_rejects_oversized_files() {
    let app = TestApp::new().await;
    let big = vec![0u8; app.settings.uploads.max_bytes + 1];

    let response = app.send(multipart(&[photo(&big)])).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_rejects_svg_with_script() {
    let app = TestApp::new().await;
    let svg = br#"<svg xmlns="http://www.w3.org/2000/svg"><script>fetch('/api/users')</script></svg>"#;

    let response = app
        .send(multipart(&[Part::File {
            field: "photo",
            file_name: "dent.svg",
            content_type: "image/svg+xml",
            bytes: svg,
        }]))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let stored = std::fs::read_dir(&app.settings.uploads.dir)
        .map(|entries| entries.count())
        .unwrap_or(0);
    assert_eq!(stored, 0);
}
