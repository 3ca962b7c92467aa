use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use std::fs;
use tempfile::TempDir;
use tower::ServiceExt; // for `oneshot`

use product_catalog::api::{self, App, models::Acknowledgement, state::AppState};
use product_catalog::config::Config;

fn products_fixture() -> Value {
    json!([
        {"id": "p-1", "name": "Lamp", "tags": [{"title": "home"}, {"title": "light"}]},
        {"id": "p-2", "name": "Desk", "tags": [{"title": "home"}]},
        {"id": "p-3", "name": "Torch", "tags": [{"title": "light"}, {"title": "outdoor"}]},
        {"id": "p-4", "name": "Tent", "tags": [{"title": "outdoor"}]},
        {"id": "42", "name": "Answer", "tags": []}
    ])
}

/// Writes the dataset and public assets into a temp dir and points config at them
fn create_test_config(dir: &TempDir, cache: bool) -> Config {
    let data_file = dir.path().join("products.json");
    let public_dir = dir.path().join("public");

    fs::write(&data_file, serde_json::to_vec(&products_fixture()).unwrap()).unwrap();
    fs::create_dir_all(&public_dir).unwrap();
    fs::write(public_dir.join("index.html"), "<h1>catalog</h1>").unwrap();
    fs::write(public_dir.join("hello.txt"), "hello").unwrap();

    let config_toml = format!(
        r#"
[server]
max_body_bytes = 64

[catalog]
data_file = '{}'
cache = {}

[assets]
public_dir = '{}'
        "#,
        data_file.display(),
        cache,
        public_dir.display()
    );

    toml::from_str(&config_toml).expect("Failed to parse test config")
}

/// Builds a test app with an isolated dataset
fn build_test_app() -> (App, AppState, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let state = AppState::new(create_test_config(&temp_dir, false));
    (api::router(state.clone()), state, temp_dir)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("GET")
        .body(Body::empty())
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method(method)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn ids(products: &Value) -> Vec<&str> {
    products
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect()
}

fn assert_cors(response: &axum::response::Response, origin: &str) {
    let headers = response.headers();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], origin);
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_METHODS],
        "POST, GET, PUT, DELETE, OPTIONS, XMODIFY"
    );
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    assert_eq!(headers[header::ACCESS_CONTROL_MAX_AGE], "86400");
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_HEADERS],
        "X-Requested-With, X-HTTP-Method-Override, Content-Type, Accept"
    );
}

#[tokio::test]
async fn test_list_products_defaults() {
    let (app, _state, _temp_dir) = build_test_app();

    let response = app.oneshot(get("/products")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_cors(&response, "*");

    let products = body_json(response).await;
    assert_eq!(ids(&products), vec!["p-1", "p-2", "p-3", "p-4", "42"]);
    assert_eq!(products[0]["name"], "Lamp");
}

#[tokio::test]
async fn test_list_products_tag_filter() {
    let (app, _state, _temp_dir) = build_test_app();

    let response = app.oneshot(get("/products?tag=light")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let products = body_json(response).await;
    assert_eq!(ids(&products), vec!["p-1", "p-3"]);
}

#[tokio::test]
async fn test_list_products_pagination() {
    let (app, _state, _temp_dir) = build_test_app();

    let response = ServiceExt::<Request<Body>>::oneshot(app.clone(), get("/products?offset=1&limit=2"))
        .await
        .unwrap();
    assert_eq!(ids(&body_json(response).await), vec!["p-2", "p-3"]);

    let response = ServiceExt::<Request<Body>>::oneshot(app.clone(), get("/products?offset=4&limit=10"))
        .await
        .unwrap();
    assert_eq!(ids(&body_json(response).await), vec!["42"]);

    let response = ServiceExt::<Request<Body>>::oneshot(app.clone(), get("/products?offset=50"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!([]));

    let response = ServiceExt::<Request<Body>>::oneshot(app, get("/products?tag=outdoor&offset=1"))
        .await
        .unwrap();
    assert_eq!(ids(&body_json(response).await), vec!["p-4"]);
}

#[tokio::test]
async fn test_list_products_non_numeric_limit() {
    let (app, _state, _temp_dir) = build_test_app();

    let response = app.oneshot(get("/products?limit=lots")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!([]));
}

#[tokio::test]
async fn test_list_products_non_numeric_offset() {
    let (app, _state, _temp_dir) = build_test_app();

    let response = app.oneshot(get("/products?offset=abc")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!([]));
}

#[tokio::test]
async fn test_list_products_repeated_keys() {
    let (app, _state, _temp_dir) = build_test_app();

    let response = ServiceExt::<Request<Body>>::oneshot(app.clone(), get("/products?tag=home&tag=light"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!([]));

    let response = ServiceExt::<Request<Body>>::oneshot(app, get("/products?limit=1&limit=2"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!([]));
}

#[tokio::test]
async fn test_trailing_slash_is_ignored() {
    let (app, _state, _temp_dir) = build_test_app();

    let response = ServiceExt::<Request<Body>>::oneshot(app.clone(), get("/products/"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 5);

    let response = ServiceExt::<Request<Body>>::oneshot(app, get("/products/p-2/"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["name"], "Desk");
}

#[tokio::test]
async fn test_get_product_success() {
    let (app, _state, _temp_dir) = build_test_app();

    let response = app.oneshot(get("/products/p-3")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let product = body_json(response).await;
    assert_eq!(
        product,
        json!({"id": "p-3", "name": "Torch", "tags": [{"title": "light"}, {"title": "outdoor"}]})
    );
}

#[tokio::test]
async fn test_get_product_not_found() {
    let (app, state, _temp_dir) = build_test_app();

    let response = app.oneshot(get("/products/nonexistent")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_cors(&response, "*");
    assert_eq!(body_json(response).await, json!({"error": "Not Found"}));
    assert_eq!(state.metrics.snapshot().not_found, 1);
}

#[tokio::test]
async fn test_create_product_echoes_without_persisting() {
    let (app, _state, _temp_dir) = build_test_app();

    let response = ServiceExt::<Request<Body>>::oneshot(
        app.clone(),
        json_request("POST", "/products", r#"{"name":"Widget"}"#),
    )
    .await
    .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"name": "Widget"}));

    let response = ServiceExt::<Request<Body>>::oneshot(app, get("/products?limit=100"))
        .await
        .unwrap();
    let products = body_json(response).await;
    assert_eq!(products.as_array().unwrap().len(), 5);
    assert!(products.as_array().unwrap().iter().all(|p| p["name"] != "Widget"));
}

#[tokio::test]
async fn test_create_product_without_json_content_type() {
    let (app, _state, _temp_dir) = build_test_app();

    let request = Request::builder()
        .uri("/products")
        .method("POST")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from("name=Widget"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({}));
}

#[tokio::test]
async fn test_create_product_malformed_json() {
    let (app, _state, _temp_dir) = build_test_app();

    let response = app
        .oneshot(json_request("POST", "/products", r#"{"name": "#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_cors(&response, "*");
    assert_eq!(
        body_json(response).await,
        json!({"error": "Internal Error Occurred"})
    );
}

#[tokio::test]
async fn test_create_product_payload_too_large() {
    let (app, _state, _temp_dir) = build_test_app();

    let oversized = json!({"name": "x".repeat(200)}).to_string();
    let response = app
        .oneshot(json_request("POST", "/products", &oversized))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({"error": "Internal Error Occurred"})
    );
}

#[tokio::test]
async fn test_edit_product_acknowledges() {
    let (app, _state, _temp_dir) = build_test_app();

    let response = app
        .oneshot(json_request("PUT", "/products/42", r#"{"name":"Question"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body, json!({"success": true, "message": "Product 42 updated"}));

    let ack: Acknowledgement = serde_json::from_value(body).unwrap();
    assert_eq!(ack, Acknowledgement::updated("42"));
}

#[tokio::test]
async fn test_delete_product_acknowledges_without_deleting() {
    let (app, _state, _temp_dir) = build_test_app();

    let request = Request::builder()
        .uri("/products/42")
        .method("DELETE")
        .body(Body::empty())
        .unwrap();
    let response = ServiceExt::<Request<Body>>::oneshot(app.clone(), request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    assert_eq!(
        body_json(response).await,
        json!({"success": true, "message": "Product 42 deleted"})
    );

    let response = ServiceExt::<Request<Body>>::oneshot(app, get("/products/42"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unmatched_routes_return_not_found() {
    let (app, _state, _temp_dir) = build_test_app();

    let requests = vec![
        get("/nowhere"),
        get("/products/p-1/reviews"),
        json_request("POST", "/nowhere", "{}"),
        json_request("PATCH", "/products/p-1", "{}"),
    ];

    for request in requests {
        let response = ServiceExt::<Request<Body>>::oneshot(app.clone(), request)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_cors(&response, "*");
        assert_eq!(body_json(response).await, json!({"error": "Not Found"}));
    }
}

#[tokio::test]
async fn test_unreadable_data_source_returns_internal_error() {
    let (app, state, temp_dir) = build_test_app();
    fs::remove_file(temp_dir.path().join("products.json")).unwrap();

    let response = ServiceExt::<Request<Body>>::oneshot(app.clone(), get("/products"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_cors(&response, "*");
    assert_eq!(
        body_json(response).await,
        json!({"error": "Internal Error Occurred"})
    );

    let response = ServiceExt::<Request<Body>>::oneshot(app, get("/products/p-1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    assert_eq!(state.metrics.snapshot().failed, 2);
}

#[tokio::test]
async fn test_malformed_data_source_returns_internal_error() {
    let (app, _state, temp_dir) = build_test_app();
    fs::write(temp_dir.path().join("products.json"), "{not json").unwrap();

    let response = app.oneshot(get("/products")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({"error": "Internal Error Occurred"})
    );
}

#[tokio::test]
async fn test_cors_mirrors_origin() {
    let (app, _state, _temp_dir) = build_test_app();

    let request = Request::builder()
        .uri("/products/p-1")
        .method("GET")
        .header(header::ORIGIN, "https://shop.example")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_cors(&response, "https://shop.example");
}

#[tokio::test]
async fn test_preflight_request() {
    let (app, _state, _temp_dir) = build_test_app();

    let request = Request::builder()
        .uri("/products/p-1")
        .method("OPTIONS")
        .header(header::ORIGIN, "https://shop.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PUT")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_cors(&response, "https://shop.example");
}

#[tokio::test]
async fn test_preflight_on_unknown_path() {
    let (app, _state, _temp_dir) = build_test_app();

    let request = Request::builder()
        .uri("/nowhere")
        .method("OPTIONS")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_cors(&response, "*");
}

#[tokio::test]
async fn test_root_serves_index_document() {
    let (app, _state, _temp_dir) = build_test_app();

    let response = app.oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_cors(&response, "*");
    assert!(
        response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/html")
    );
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"<h1>catalog</h1>");
}

#[tokio::test]
async fn test_root_without_index_document_is_internal_error() {
    let (app, _state, temp_dir) = build_test_app();
    fs::remove_file(temp_dir.path().join("public").join("index.html")).unwrap();

    let response = app.oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({"error": "Internal Error Occurred"})
    );
}

#[tokio::test]
async fn test_static_files_served_verbatim() {
    let (app, _state, _temp_dir) = build_test_app();

    let response = app.oneshot(get("/hello.txt")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_cors(&response, "*");
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"hello");
}

#[tokio::test]
async fn test_cached_catalog_picks_up_file_changes() {
    let temp_dir = TempDir::new().unwrap();
    let state = AppState::new(create_test_config(&temp_dir, true));
    let app = api::router(state);

    let response = ServiceExt::<Request<Body>>::oneshot(app.clone(), get("/products"))
        .await
        .unwrap();
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 5);

    fs::write(
        temp_dir.path().join("products.json"),
        r#"[{"id": "only-one", "tags": [{"title": "solo"}]}]"#,
    )
    .unwrap();

    let response = ServiceExt::<Request<Body>>::oneshot(app, get("/products?tag=solo"))
        .await
        .unwrap();
    assert_eq!(ids(&body_json(response).await), vec!["only-one"]);
}
